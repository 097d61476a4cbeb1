// Trend metrics and the forecast months appended to the monthly series.
//
// The "prediction" is a fixed compounding-growth extrapolation from the last
// observed month, not a statistical model.
use crate::filter::FilterState;
use crate::types::{MonthlyTrend, TrendMetrics};
use crate::util::{round_half_up, round_to};
use crate::variation::uniform;
use rand::Rng;

const BASE_MONTHLY_GROWTH: f64 = 3.8;
const BASE_DWELL_CHANGE: f64 = 2.2;
const BASE_SEASONALITY: f64 = 7.6;

pub const FORECAST_YEAR: i32 = 2024;
pub const FORECAST_MONTHS: usize = 3;

/// Headline trend figures; restricted dimensions add a random swing to the
/// monthly growth rate.
pub fn trend_metrics<R: Rng + ?Sized>(filters: &FilterState, rng: &mut R) -> TrendMetrics {
    let area_swing = if filters.areas.is_unrestricted() {
        0.0
    } else {
        uniform(rng, -2.0, 2.0)
    };
    let segment_swing = if filters.segments.is_all() {
        0.0
    } else {
        uniform(rng, -1.0, 4.0)
    };
    let device_swing = if filters.device_types.is_all() {
        0.0
    } else {
        uniform(rng, -1.0, 2.0)
    };
    let monthly_growth = round_to(
        BASE_MONTHLY_GROWTH + area_swing + segment_swing + device_swing,
        1,
    );
    let direction = if monthly_growth > 0.0 { -1.0 } else { 1.0 };
    let peak_time_change = round_to((-0.5 + uniform(rng, -1.5, 1.5)) * direction, 1);
    let avg_dwell_time_change = round_to(BASE_DWELL_CHANGE + uniform(rng, -2.0, 2.0), 1);
    let seasonality_score = round_to(BASE_SEASONALITY + uniform(rng, -1.0, 1.0), 1);
    TrendMetrics {
        monthly_growth,
        peak_time_change,
        avg_dwell_time_change,
        seasonality_score,
    }
}

/// Forecast rows for January to March of the following year, compounding the
/// monthly growth and dwell change from the last observed month.
pub fn forecast(series: &[MonthlyTrend], metrics: &TrendMetrics) -> Vec<MonthlyTrend> {
    let Some(last) = series.last() else {
        return Vec::new();
    };
    let growth = 1.0 + metrics.monthly_growth / 100.0;
    let dwell_growth = 1.0 + metrics.avg_dwell_time_change / 100.0;
    (1..=FORECAST_MONTHS)
        .map(|k| {
            let k = k as i32;
            MonthlyTrend {
                year: FORECAST_YEAR,
                month: format!("{}月", k),
                display_month: format!("{}年{}月(予測)", FORECAST_YEAR, k),
                visitors: round_half_up(last.visitors as f64 * growth.powi(k)) as i64,
                avg_dwell_time: round_half_up(last.avg_dwell_time as f64 * dwell_growth.powi(k))
                    as i64,
            }
        })
        .collect()
}

/// Observed series followed by the forecast rows.
pub fn with_forecast(series: &[MonthlyTrend], metrics: &TrendMetrics) -> Vec<MonthlyTrend> {
    let mut combined = series.to_vec();
    combined.extend(forecast(series, metrics));
    combined
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::filter::{DateRange, FilterAction};
    use crate::variation::testing::midpoint;
    use chrono::NaiveDate;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn unrestricted() -> FilterState {
        let end = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
        FilterState::unrestricted(DateRange::last_days(end, 30))
    }

    #[test]
    fn unrestricted_growth_is_base_rate() {
        for seed in 0..20 {
            let m = trend_metrics(&unrestricted(), &mut StdRng::seed_from_u64(seed));
            assert_eq!(m.monthly_growth, 3.8);
            assert!((0.2..=4.2).contains(&m.avg_dwell_time_change));
            assert!((6.6..=8.6).contains(&m.seasonality_score));
        }
    }

    #[test]
    fn restricted_growth_stays_in_swing_bounds() {
        let f = unrestricted()
            .apply(FilterAction::ToggleSegment("シニア層".into()))
            .apply(FilterAction::ToggleDeviceType("iOS".into()))
            .apply(FilterAction::TogglePrefecture("東京都".into()));
        for seed in 0..100 {
            let m = trend_metrics(&f, &mut StdRng::seed_from_u64(seed));
            assert!((-0.2..=11.8).contains(&m.monthly_growth), "{}", m.monthly_growth);
        }
    }

    #[test]
    fn midpoint_metrics() {
        let m = trend_metrics(&unrestricted(), &mut midpoint());
        assert_eq!(
            m,
            TrendMetrics {
                monthly_growth: 3.8,
                peak_time_change: 0.5,
                avg_dwell_time_change: 2.2,
                seasonality_score: 7.6,
            }
        );
    }

    #[test]
    fn forecast_compounds_from_last_month() {
        let series = Catalog::standard().monthly_trend.clone();
        let metrics = TrendMetrics {
            monthly_growth: 10.0,
            peak_time_change: 0.0,
            avg_dwell_time_change: 0.0,
            seasonality_score: 7.6,
        };
        let rows = forecast(&series, &metrics);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].visitors, 96800);
        assert_eq!(rows[1].visitors, 106480);
        assert_eq!(rows[2].visitors, 117128);
        assert!(rows.iter().all(|r| r.avg_dwell_time == 52));
        assert_eq!(rows[2].display_month, "2024年3月(予測)");

        let combined = with_forecast(&series, &metrics);
        assert_eq!(combined.len(), 15);
    }

    #[test]
    fn forecast_of_empty_series_is_empty() {
        let metrics = trend_metrics(&unrestricted(), &mut midpoint());
        assert!(forecast(&[], &metrics).is_empty());
    }
}
