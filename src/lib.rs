// Filter-driven data layer of the foot-traffic dashboard.
//
// A `FilterState` is reduced to impact factors, which every dataset
// transformer applies to the static baseline catalog together with bounded
// random variation.
pub mod catalog;
pub mod config;
pub mod drilldown;
pub mod error;
pub mod filter;
pub mod impact;
pub mod output;
pub mod reports;
pub mod service;
pub mod transform;
pub mod trend;
pub mod types;
pub mod util;
pub mod variation;

pub use catalog::Catalog;
pub use error::{InsightsError, Result};
pub use filter::{AreaSelection, DateRange, FilterAction, FilterState, Scope};
pub use impact::{overall_impact, ImpactBreakdown};
pub use reports::DashboardReport;
