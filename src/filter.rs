// Filter state and its update operations.
//
// A `FilterState` is an immutable value. Every update builds a new state
// (`apply` is a reducer over `FilterAction`), so a compute pass never sees a
// half-applied change.
use crate::util::days_between;
use chrono::{Duration, Local, NaiveDate};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// Label the filter panel uses for "no restriction".
pub const ALL_LABEL: &str = "All";

pub const DEFAULT_RANGE_DAYS: i64 = 30;

const DEFAULT_PREFECTURES: [&str; 3] = ["東京都", "千葉県", "神奈川県"];

/// Selection over one multi-select dimension (segments, device types).
///
/// `Subset` is never empty: deselecting the last label falls back to `All`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub enum Scope {
    #[default]
    All,
    Subset(BTreeSet<String>),
}

impl Scope {
    /// Build from panel labels. Empty input or any `"All"` label means `All`.
    pub fn from_labels<I, S>(labels: I) -> Scope
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set: BTreeSet<String> = labels.into_iter().map(Into::into).collect();
        if set.is_empty() || set.contains(ALL_LABEL) {
            Scope::All
        } else {
            Scope::Subset(set)
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Scope::All)
    }

    pub fn contains(&self, label: &str) -> bool {
        match self {
            Scope::All => false,
            Scope::Subset(set) => set.contains(label),
        }
    }

    /// Number of explicitly selected labels (0 for `All`).
    pub fn len(&self) -> usize {
        match self {
            Scope::All => 0,
            Scope::Subset(set) => set.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn labels(&self) -> Vec<&str> {
        match self {
            Scope::All => vec![ALL_LABEL],
            Scope::Subset(set) => set.iter().map(String::as_str).collect(),
        }
    }

    /// Toggle one label the way the filter panel does.
    ///
    /// - `"All"` always yields `All`.
    /// - A label toggled while `All` is active replaces it.
    /// - Removing the last label resets to `All`.
    pub fn toggle(&self, label: &str) -> Scope {
        if label == ALL_LABEL {
            return Scope::All;
        }
        match self {
            Scope::All => Scope::Subset(BTreeSet::from([label.to_string()])),
            Scope::Subset(set) => {
                let mut next = set.clone();
                if !next.remove(label) {
                    next.insert(label.to_string());
                }
                if next.is_empty() {
                    Scope::All
                } else {
                    Scope::Subset(next)
                }
            }
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.labels().join(", "))
    }
}

/// Inclusive date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        DateRange { start, end }
    }

    /// `[today - days, today]`.
    pub fn last_days(today: NaiveDate, days: i64) -> Self {
        DateRange {
            start: today - Duration::days(days),
            end: today,
        }
    }

    pub fn days(&self) -> i64 {
        days_between(self.start, self.end)
    }
}

/// Selected administrative areas, keyed by display name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AreaSelection {
    pub prefectures: BTreeSet<String>,
    pub cities: BTreeSet<String>,
    pub stores: BTreeSet<String>,
}

impl AreaSelection {
    pub fn is_unrestricted(&self) -> bool {
        self.prefectures.is_empty() && self.cities.is_empty() && self.stores.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterState {
    pub date_range: DateRange,
    pub areas: AreaSelection,
    pub segments: Scope,
    pub device_types: Scope,
}

/// Every way the session may change the filter state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterAction {
    SetDateRange(DateRange),
    /// Replaces the whole area selection without cascading.
    SetAreas(AreaSelection),
    SetPrefectures(BTreeSet<String>),
    SetCities(BTreeSet<String>),
    SetStores(BTreeSet<String>),
    TogglePrefecture(String),
    ToggleCity(String),
    ToggleStore(String),
    SetSegments(Scope),
    SetDeviceTypes(Scope),
    ToggleSegment(String),
    ToggleDeviceType(String),
    Reset,
}

impl Default for FilterState {
    fn default() -> Self {
        FilterState::default_at(Local::now().date_naive())
    }
}

impl FilterState {
    /// The startup state relative to `today`: last 30 days, the Kanto
    /// prefectures preselected, no segment or device restriction.
    pub fn default_at(today: NaiveDate) -> Self {
        FilterState {
            date_range: DateRange::last_days(today, DEFAULT_RANGE_DAYS),
            areas: AreaSelection {
                prefectures: DEFAULT_PREFECTURES.iter().map(|s| s.to_string()).collect(),
                ..AreaSelection::default()
            },
            segments: Scope::All,
            device_types: Scope::All,
        }
    }

    /// Full scope over `date_range`: no area, segment or device restriction.
    pub fn unrestricted(date_range: DateRange) -> Self {
        FilterState {
            date_range,
            areas: AreaSelection::default(),
            segments: Scope::All,
            device_types: Scope::All,
        }
    }

    /// Apply one update and return the resulting state. `Reset` goes back to
    /// the default anchored at the current range's end date.
    pub fn apply(&self, action: FilterAction) -> FilterState {
        let mut next = self.clone();
        match action {
            FilterAction::SetDateRange(range) => next.date_range = range,
            FilterAction::SetAreas(areas) => next.areas = areas,
            FilterAction::SetPrefectures(prefectures) => {
                next.areas = AreaSelection {
                    prefectures,
                    cities: BTreeSet::new(),
                    stores: BTreeSet::new(),
                };
            }
            FilterAction::SetCities(cities) => {
                next.areas.cities = cities;
                next.areas.stores.clear();
            }
            FilterAction::SetStores(stores) => next.areas.stores = stores,
            FilterAction::TogglePrefecture(name) => {
                return self.apply(FilterAction::SetPrefectures(toggled(
                    &self.areas.prefectures,
                    name,
                )));
            }
            FilterAction::ToggleCity(name) => {
                return self.apply(FilterAction::SetCities(toggled(&self.areas.cities, name)));
            }
            FilterAction::ToggleStore(name) => {
                return self.apply(FilterAction::SetStores(toggled(&self.areas.stores, name)));
            }
            FilterAction::SetSegments(scope) => next.segments = scope,
            FilterAction::SetDeviceTypes(scope) => next.device_types = scope,
            FilterAction::ToggleSegment(label) => next.segments = self.segments.toggle(&label),
            FilterAction::ToggleDeviceType(label) => {
                next.device_types = self.device_types.toggle(&label)
            }
            FilterAction::Reset => next = FilterState::default_at(self.date_range.end),
        }
        next
    }
}

fn toggled(set: &BTreeSet<String>, name: String) -> BTreeSet<String> {
    let mut next = set.clone();
    if !next.remove(&name) {
        next.insert(name);
    }
    next
}
