// Impact calculator: reduces a `FilterState` to scalar multipliers.
//
// Each dimension yields a factor; the product is the overall impact applied
// by every dataset transformer. An empty catalog at any level yields 1.
use crate::catalog::Catalog;
use crate::filter::{FilterState, Scope};

// Narrower area levels are weighted down on top of their share of the catalog.
const CITY_WEIGHT: f64 = 0.8;
const STORE_WEIGHT: f64 = 0.6;

/// Per-dimension factors, kept together for logging and display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpactBreakdown {
    pub date: f64,
    pub area: f64,
    pub segment: f64,
    pub device: f64,
}

impl ImpactBreakdown {
    pub fn of(filters: &FilterState, catalog: &Catalog) -> Self {
        ImpactBreakdown {
            date: date_range_impact(filters),
            area: area_match_factor(filters, catalog),
            segment: segment_match_factor(filters, catalog),
            device: device_match_factor(filters, catalog),
        }
    }

    pub fn overall(&self) -> f64 {
        self.date * self.area * self.segment * self.device
    }
}

/// 1 for ranges of 30 days or more, otherwise `0.7 + days / 100`.
///
/// The jump from 0.99 to 1 at 30 days is part of the fixture behavior. A
/// reversed range counts as zero days.
pub fn date_range_impact(filters: &FilterState) -> f64 {
    let days = filters.date_range.days().max(0);
    if days >= 30 {
        return 1.0;
    }
    0.7 + days as f64 / 100.0
}

/// Share of the catalog covered by the area selection. Prefectures take
/// priority over cities, cities over stores.
pub fn area_match_factor(filters: &FilterState, catalog: &Catalog) -> f64 {
    let areas = &filters.areas;
    if areas.is_unrestricted() {
        return 1.0;
    }
    if !areas.prefectures.is_empty() {
        return share(areas.prefectures.len(), catalog.total_prefectures());
    }
    if !areas.cities.is_empty() {
        return weighted_share(areas.cities.len(), catalog.total_cities(), CITY_WEIGHT);
    }
    weighted_share(areas.stores.len(), catalog.total_stores(), STORE_WEIGHT)
}

/// Selected segments over all catalog segments but one.
pub fn segment_match_factor(filters: &FilterState, catalog: &Catalog) -> f64 {
    scope_factor(&filters.segments, catalog.segments.len())
}

/// Selected device labels over all tier and OS entries but one.
pub fn device_match_factor(filters: &FilterState, catalog: &Catalog) -> f64 {
    scope_factor(
        &filters.device_types,
        catalog.device_tiers.len() + catalog.devices.len(),
    )
}

pub fn overall_impact(filters: &FilterState, catalog: &Catalog) -> f64 {
    ImpactBreakdown::of(filters, catalog).overall()
}

fn scope_factor(scope: &Scope, catalog_entries: usize) -> f64 {
    match scope {
        Scope::All => 1.0,
        Scope::Subset(selected) => share(selected.len(), catalog_entries.saturating_sub(1)),
    }
}

fn share(selected: usize, total: usize) -> f64 {
    if total == 0 {
        return 1.0;
    }
    selected as f64 / total as f64
}

fn weighted_share(selected: usize, total: usize, weight: f64) -> f64 {
    if total == 0 {
        return 1.0;
    }
    selected as f64 / total as f64 * weight
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{DateRange, FilterAction};
    use chrono::NaiveDate;
    use std::collections::BTreeSet;

    fn end() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
    }

    fn state(days: i64) -> FilterState {
        FilterState::unrestricted(DateRange::last_days(end(), days))
    }

    fn names(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn date_impact_is_one_from_30_days() {
        for days in [30, 31, 90, 365] {
            assert_eq!(date_range_impact(&state(days)), 1.0);
        }
    }

    #[test]
    fn date_impact_grows_with_range_below_30() {
        let mut prev = date_range_impact(&state(0));
        assert!(approx(prev, 0.7));
        for days in 1..30 {
            let cur = date_range_impact(&state(days));
            assert!(cur > prev, "not increasing at {days}");
            prev = cur;
        }
        assert!(approx(date_range_impact(&state(29)), 0.99));
    }

    #[test]
    fn reversed_range_counts_as_zero_days() {
        let reversed = FilterState::unrestricted(DateRange::new(
            end(),
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        ));
        assert!(reversed.date_range.days() < 0);
        assert!(approx(date_range_impact(&reversed), 0.7));
        assert!(overall_impact(&reversed, Catalog::standard()) > 0.0);
    }

    #[test]
    fn area_factor_by_level() {
        let c = Catalog::standard();
        let base = state(30);
        assert_eq!(area_match_factor(&base, c), 1.0);

        let one_pref = base.apply(FilterAction::SetPrefectures(names(&["北海道"])));
        assert!(approx(area_match_factor(&one_pref, c), 1.0 / 7.0));

        let two_cities = base.apply(FilterAction::SetCities(names(&["札幌市", "旭川市"])));
        assert!(approx(area_match_factor(&two_cities, c), 2.0 / 15.0 * 0.8));

        let one_store = base.apply(FilterAction::SetStores(names(&["イオン亀有店"])));
        assert!(approx(area_match_factor(&one_store, c), 1.0 / 26.0 * 0.6));
    }

    #[test]
    fn prefectures_take_priority_over_cities() {
        let c = Catalog::standard();
        let mut s = state(30);
        s.areas.prefectures = names(&["北海道", "東京都"]);
        s.areas.cities = names(&["札幌市"]);
        assert!(approx(area_match_factor(&s, c), 2.0 / 7.0));
    }

    #[test]
    fn segment_and_device_factors() {
        let c = Catalog::standard();
        let s = state(30)
            .apply(FilterAction::ToggleSegment("シニア層".into()))
            .apply(FilterAction::ToggleSegment("ファミリー層".into()))
            .apply(FilterAction::ToggleDeviceType("iOS".into()));
        assert!(approx(segment_match_factor(&s, c), 2.0 / 5.0));
        assert!(approx(device_match_factor(&s, c), 1.0 / 4.0));
        assert!(approx(overall_impact(&s, c), 2.0 / 5.0 * 1.0 / 4.0));
    }

    #[test]
    fn unrestricted_30_day_state_has_unit_impact() {
        assert_eq!(overall_impact(&state(30), Catalog::standard()), 1.0);
    }

    #[test]
    fn empty_catalog_never_divides_by_zero() {
        let mut empty = Catalog::standard().clone();
        empty.prefectures.clear();
        empty.stores.clear();
        empty.segments.clear();
        empty.devices.clear();
        empty.device_tiers.clear();

        let s = state(30)
            .apply(FilterAction::SetPrefectures(names(&["北海道"])))
            .apply(FilterAction::ToggleSegment("シニア層".into()))
            .apply(FilterAction::ToggleDeviceType("iOS".into()));
        let b = ImpactBreakdown::of(&s, &empty);
        assert_eq!(b, ImpactBreakdown { date: 1.0, area: 1.0, segment: 1.0, device: 1.0 });

        let cities = state(30).apply(FilterAction::SetCities(names(&["札幌市"])));
        assert_eq!(area_match_factor(&cities, &empty), 1.0);
    }
}
