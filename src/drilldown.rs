// Area drill-down: prefecture list -> city list -> store list.
//
// Navigation joins on catalog ids; filter selection joins on display names.
// The two are independent, so a prefecture stays selected in the filter while
// the navigator shows another prefecture's stores.
use crate::catalog::Catalog;
use crate::filter::{FilterAction, FilterState};
use serde::Serialize;
use tabled::Tabled;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DrillLevel {
    Prefectures,
    Cities,
    Stores,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Tabled)]
pub struct AreaRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Selected")]
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AreaNavigator {
    prefecture_id: Option<String>,
    city_id: Option<String>,
}

impl AreaNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(&self) -> DrillLevel {
        match (&self.prefecture_id, &self.city_id) {
            (Some(_), Some(_)) => DrillLevel::Stores,
            (Some(_), None) => DrillLevel::Cities,
            _ => DrillLevel::Prefectures,
        }
    }

    pub fn prefecture_id(&self) -> Option<&str> {
        self.prefecture_id.as_deref()
    }

    pub fn city_id(&self) -> Option<&str> {
        self.city_id.as_deref()
    }

    /// Enter the city list of a prefecture. Returns `false` (and stays put)
    /// unless the prefecture list is showing and the id exists.
    pub fn open_prefecture(&mut self, catalog: &Catalog, prefecture_id: &str) -> bool {
        if self.level() != DrillLevel::Prefectures || catalog.prefecture_by_id(prefecture_id).is_none()
        {
            return false;
        }
        self.prefecture_id = Some(prefecture_id.to_string());
        true
    }

    /// Enter the store list of a city in the current prefecture.
    pub fn open_city(&mut self, catalog: &Catalog, city_id: &str) -> bool {
        let Some(pref) = self.prefecture_id.as_deref() else {
            return false;
        };
        if self.city_id.is_some() || catalog.city_by_id(pref, city_id).is_none() {
            return false;
        }
        self.city_id = Some(city_id.to_string());
        true
    }

    /// Pop one level. Leaving the store list keeps the prefecture scope;
    /// leaving the city list clears it.
    pub fn back(&mut self) {
        match self.level() {
            DrillLevel::Stores => self.city_id = None,
            DrillLevel::Cities => self.prefecture_id = None,
            DrillLevel::Prefectures => {}
        }
    }

    /// Rows of the list currently shown, flagged with the filter selection.
    pub fn rows(&self, catalog: &Catalog, filters: &FilterState) -> Vec<AreaRow> {
        let areas = &filters.areas;
        match self.level() {
            DrillLevel::Prefectures => catalog
                .prefectures
                .iter()
                .map(|p| AreaRow {
                    id: p.id.clone(),
                    name: p.name.clone(),
                    selected: areas.prefectures.contains(&p.name),
                })
                .collect(),
            DrillLevel::Cities => self
                .prefecture_id
                .as_deref()
                .and_then(|id| catalog.prefecture_by_id(id))
                .map(|p| {
                    p.cities
                        .iter()
                        .map(|c| AreaRow {
                            id: c.id.clone(),
                            name: c.name.clone(),
                            selected: areas.cities.contains(&c.name),
                        })
                        .collect()
                })
                .unwrap_or_default(),
            DrillLevel::Stores => match (self.prefecture_id.as_deref(), self.city_id.as_deref()) {
                (Some(p), Some(c)) => catalog
                    .city_by_id(p, c)
                    .map(|city| {
                        city.stores
                            .iter()
                            .map(|s| AreaRow {
                                id: s.id.clone(),
                                name: s.name.clone(),
                                selected: areas.stores.contains(&s.name),
                            })
                            .collect()
                    })
                    .unwrap_or_default(),
                _ => Vec::new(),
            },
        }
    }

    /// The filter update for ticking the checkbox of row `id` in the current
    /// list, or `None` if no such row is shown.
    pub fn toggle(&self, catalog: &Catalog, filters: &FilterState, id: &str) -> Option<FilterAction> {
        let row = self.rows(catalog, filters).into_iter().find(|r| r.id == id)?;
        Some(match self.level() {
            DrillLevel::Prefectures => FilterAction::TogglePrefecture(row.name),
            DrillLevel::Cities => FilterAction::ToggleCity(row.name),
            DrillLevel::Stores => FilterAction::ToggleStore(row.name),
        })
    }

    /// Display names of the scoped prefecture and city, outermost first.
    pub fn breadcrumb(&self, catalog: &Catalog) -> Vec<String> {
        let mut crumbs = Vec::new();
        if let Some(p) = self.prefecture_id.as_deref().and_then(|id| catalog.prefecture_by_id(id)) {
            crumbs.push(p.name.clone());
            if let Some(c) = self
                .city_id
                .as_deref()
                .and_then(|id| catalog.city_by_id(&p.id, id))
            {
                crumbs.push(c.name.clone());
            }
        }
        crumbs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::DateRange;
    use chrono::NaiveDate;

    fn filters() -> FilterState {
        FilterState::unrestricted(DateRange::last_days(
            NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
            30,
        ))
    }

    #[test]
    fn walks_down_and_back_up() {
        let c = Catalog::standard();
        let mut nav = AreaNavigator::new();
        assert_eq!(nav.level(), DrillLevel::Prefectures);
        assert!(nav.open_prefecture(c, "tokyo"));
        assert_eq!(nav.level(), DrillLevel::Cities);
        assert!(nav.open_city(c, "koto"));
        assert_eq!(nav.level(), DrillLevel::Stores);
        assert_eq!(nav.breadcrumb(c), vec!["東京都", "江東区"]);

        nav.back();
        assert_eq!(nav.level(), DrillLevel::Cities);
        assert_eq!(nav.prefecture_id(), Some("tokyo"));
        assert_eq!(nav.city_id(), None);

        nav.back();
        assert_eq!(nav.level(), DrillLevel::Prefectures);
        assert_eq!(nav.prefecture_id(), None);

        nav.back();
        assert_eq!(nav.level(), DrillLevel::Prefectures);
    }

    #[test]
    fn rejects_unknown_or_out_of_level_ids() {
        let c = Catalog::standard();
        let mut nav = AreaNavigator::new();
        assert!(!nav.open_prefecture(c, "okinawa"));
        assert!(!nav.open_city(c, "koto"));
        assert!(nav.open_prefecture(c, "tokyo"));
        assert!(!nav.open_city(c, "sapporo"));
        assert!(!nav.open_prefecture(c, "osaka"));
    }

    #[test]
    fn rows_reflect_current_list() {
        let c = Catalog::standard();
        let mut nav = AreaNavigator::new();
        assert_eq!(nav.rows(c, &filters()).len(), 7);
        nav.open_prefecture(c, "hokkaido");
        let cities: Vec<_> = nav.rows(c, &filters()).into_iter().map(|r| r.name).collect();
        assert_eq!(cities, vec!["札幌市", "旭川市"]);
        nav.open_city(c, "sapporo");
        assert_eq!(nav.rows(c, &filters()).len(), 3);
    }

    #[test]
    fn selection_is_independent_of_navigation() {
        let c = Catalog::standard();
        let mut nav = AreaNavigator::new();
        let state = filters().apply(nav.toggle(c, &filters(), "osaka").unwrap());
        assert!(state.areas.prefectures.contains("大阪府"));

        nav.open_prefecture(c, "hokkaido");
        nav.open_city(c, "sapporo");
        let rows = nav.rows(c, &state);
        assert!(rows.iter().all(|r| !r.selected));
        assert!(state.areas.prefectures.contains("大阪府"));

        let action = nav.toggle(c, &state, "sapporo-hassamu").unwrap();
        assert_eq!(action, FilterAction::ToggleStore("イオン札幌発寒店".into()));
        let state = state.apply(action);
        assert!(state.areas.prefectures.contains("大阪府"));
        assert!(nav.rows(c, &state)[0].selected);
    }

    #[test]
    fn toggle_ignores_rows_not_shown() {
        let c = Catalog::standard();
        let nav = AreaNavigator::new();
        assert!(nav.toggle(c, &filters(), "koto").is_none());
    }
}
