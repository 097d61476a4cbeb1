// Dataset transformers.
//
// Every transformer follows the same pattern: compute the overall impact of
// the filter state, scale each base value by `impact * variation`, round,
// then apply any dataset-specific post-processing. Nothing is cached; two
// calls with the same filters usually differ.
use crate::catalog::Catalog;
use crate::filter::{FilterState, Scope};
use crate::impact::overall_impact;
use crate::types::{
    AreaDwell, ConnectivityPoint, DailyTraffic, DeviceShare, HeatmapCell, HourlyTraffic,
    JourneyStage, KpiSummary, LocationFlow, MonthlyTrend, MovementEdge, SegmentShare,
    VisitFrequencyShare,
};
use crate::util::{round_half_up, round_to};
use crate::variation::{random_variation, uniform, Spread};
use rand::Rng;
use tracing::debug;

/// Selected segments make up a narrower slice, so their raw shares are boosted
/// before renormalizing.
const SEGMENT_SUBSET_BOOST: f64 = 1.5;

const VISIT_FREQUENCY_JITTER: f64 = 0.1;

fn impact_for(dataset: &str, filters: &FilterState, catalog: &Catalog) -> f64 {
    let impact = overall_impact(filters, catalog);
    debug!(dataset, impact, "applying filter impact");
    impact
}

fn scaled<R: Rng + ?Sized>(value: i64, impact: f64, rng: &mut R, spread: Spread) -> i64 {
    round_half_up(value as f64 * impact * random_variation(rng, 1.0, spread)) as i64
}

/// Rescale so the values sum to roughly 100.
///
/// Each value is rounded on its own, so the sum may drift by a point or two.
/// If every input is zero the values are left untouched.
pub fn renormalize(values: &mut [i64]) {
    let total: i64 = values.iter().sum();
    if total <= 0 {
        return;
    }
    for v in values.iter_mut() {
        *v = round_half_up(*v as f64 / total as f64 * 100.0) as i64;
    }
}

pub fn traffic_by_time<R: Rng + ?Sized>(
    filters: &FilterState,
    catalog: &Catalog,
    rng: &mut R,
) -> Vec<HourlyTraffic> {
    let impact = impact_for("traffic_by_time", filters, catalog);
    catalog
        .hourly_traffic
        .iter()
        .map(|row| HourlyTraffic {
            volume: scaled(row.volume, impact, rng, Spread::Minor),
            ..row.clone()
        })
        .collect()
}

pub fn weekly_traffic<R: Rng + ?Sized>(
    filters: &FilterState,
    catalog: &Catalog,
    rng: &mut R,
) -> Vec<DailyTraffic> {
    let impact = impact_for("weekly_traffic", filters, catalog);
    catalog
        .weekly_traffic
        .iter()
        .map(|row| DailyTraffic {
            volume: scaled(row.volume, impact, rng, Spread::Minor),
            ..row.clone()
        })
        .collect()
}

/// Segment composition in percent.
///
/// With a segment subset selected only those segments are returned; the
/// impact multiplier is not applied in that case.
pub fn customer_segments<R: Rng + ?Sized>(
    filters: &FilterState,
    catalog: &Catalog,
    rng: &mut R,
) -> Vec<SegmentShare> {
    let mut rows: Vec<SegmentShare> = match &filters.segments {
        Scope::Subset(selected) => catalog
            .segments
            .iter()
            .filter(|s| selected.contains(&s.name))
            .map(|s| SegmentShare {
                value: round_half_up(
                    s.value as f64 * random_variation(rng, SEGMENT_SUBSET_BOOST, Spread::Medium),
                ) as i64,
                ..s.clone()
            })
            .collect(),
        Scope::All => {
            let impact = impact_for("customer_segments", filters, catalog);
            catalog
                .segments
                .iter()
                .map(|s| SegmentShare {
                    value: scaled(s.value, impact, rng, Spread::Medium),
                    ..s.clone()
                })
                .collect()
        }
    };
    let mut values: Vec<i64> = rows.iter().map(|r| r.value).collect();
    renormalize(&mut values);
    for (row, value) in rows.iter_mut().zip(values) {
        row.value = value;
    }
    rows
}

pub fn dwell_time_by_area<R: Rng + ?Sized>(
    filters: &FilterState,
    catalog: &Catalog,
    rng: &mut R,
) -> Vec<AreaDwell> {
    let impact = impact_for("dwell_time_by_area", filters, catalog);
    catalog
        .dwell_times
        .iter()
        .map(|row| AreaDwell {
            time: scaled(row.time, impact, rng, Spread::Minor),
            ..row.clone()
        })
        .collect()
}

fn fixed_split(ios: i64, android: i64) -> Vec<DeviceShare> {
    vec![
        DeviceShare {
            device_type: "iOS".into(),
            percentage: ios,
        },
        DeviceShare {
            device_type: "Android".into(),
            percentage: android,
        },
    ]
}

/// Fixed OS split for a device restriction, or `None` when the selection
/// does not pin one (e.g. both OS labels chosen).
fn device_override(selected: &Scope) -> Option<Vec<DeviceShare>> {
    let ios = selected.contains("iOS");
    let android = selected.contains("Android");
    if ios && !android {
        return Some(vec![DeviceShare {
            device_type: "iOS".into(),
            percentage: 100,
        }]);
    }
    if android && !ios {
        return Some(vec![DeviceShare {
            device_type: "Android".into(),
            percentage: 100,
        }]);
    }
    if selected.contains("ハイエンド") {
        return Some(fixed_split(75, 25));
    }
    if selected.contains("ミドルレンジ") {
        return Some(fixed_split(60, 40));
    }
    if selected.contains("ローエンド") {
        return Some(fixed_split(40, 60));
    }
    None
}

/// iOS / Android split in percent.
pub fn device_distribution<R: Rng + ?Sized>(
    filters: &FilterState,
    catalog: &Catalog,
    rng: &mut R,
) -> Vec<DeviceShare> {
    if let Some(fixed) = device_override(&filters.device_types) {
        debug!(scope = %filters.device_types, "device distribution pinned by selection");
        return fixed;
    }
    let impact = impact_for("device_distribution", filters, catalog);
    let mut rows: Vec<DeviceShare> = catalog
        .devices
        .iter()
        .map(|d| DeviceShare {
            percentage: scaled(d.percentage, impact, rng, Spread::Minor),
            ..d.clone()
        })
        .collect();
    let mut values: Vec<i64> = rows.iter().map(|r| r.percentage).collect();
    renormalize(&mut values);
    for (row, value) in rows.iter_mut().zip(values) {
        row.percentage = value;
    }
    rows
}

pub fn traffic_heatmap<R: Rng + ?Sized>(
    filters: &FilterState,
    catalog: &Catalog,
    rng: &mut R,
) -> Vec<HeatmapCell> {
    let impact = impact_for("traffic_heatmap", filters, catalog);
    catalog
        .heatmap
        .iter()
        .map(|cell| HeatmapCell {
            value: scaled(cell.value, impact, rng, Spread::Medium),
            ..cell.clone()
        })
        .collect()
}

/// KPI cards. The peak hour is never changed.
pub fn kpi_summary<R: Rng + ?Sized>(
    filters: &FilterState,
    catalog: &Catalog,
    rng: &mut R,
) -> KpiSummary {
    let impact = impact_for("kpi_summary", filters, catalog);
    let base = &catalog.kpi;
    KpiSummary {
        total_visitors: scaled(base.total_visitors, impact, rng, Spread::Minor),
        avg_dwell_time: scaled(base.avg_dwell_time, impact, rng, Spread::Minor),
        peak_hour: base.peak_hour.clone(),
        returning_visitors: scaled(base.returning_visitors, impact, rng, Spread::Minor),
        week_over_week_change: round_to(
            base.week_over_week_change * impact * random_variation(rng, 1.0, Spread::Medium),
            1,
        ),
    }
}

pub fn monthly_trend<R: Rng + ?Sized>(
    filters: &FilterState,
    catalog: &Catalog,
    rng: &mut R,
) -> Vec<MonthlyTrend> {
    let impact = impact_for("monthly_trend", filters, catalog);
    catalog
        .monthly_trend
        .iter()
        .map(|row| {
            let visitors = scaled(row.visitors, impact, rng, Spread::Minor);
            let avg_dwell_time = scaled(row.avg_dwell_time, impact, rng, Spread::Minor);
            MonthlyTrend {
                visitors,
                avg_dwell_time,
                ..row.clone()
            }
        })
        .collect()
}

pub fn movement<R: Rng + ?Sized>(
    filters: &FilterState,
    catalog: &Catalog,
    rng: &mut R,
) -> Vec<MovementEdge> {
    let impact = impact_for("movement", filters, catalog);
    catalog
        .movement
        .iter()
        .map(|edge| MovementEdge {
            value: scaled(edge.value, impact, rng, Spread::Medium),
            ..edge.clone()
        })
        .collect()
}

/// Inter-area flows. One variation sample drives both fields, but only the
/// absolute value carries the filter impact.
pub fn location_flows<R: Rng + ?Sized>(
    filters: &FilterState,
    catalog: &Catalog,
    rng: &mut R,
) -> Vec<LocationFlow> {
    let impact = impact_for("location_flows", filters, catalog);
    catalog
        .location_flows
        .iter()
        .map(|flow| {
            let variation = random_variation(rng, 1.0, Spread::Medium);
            LocationFlow {
                value: round_half_up(flow.value as f64 * impact * variation) as i64,
                percentage: round_half_up(flow.percentage as f64 * variation) as i64,
                ..flow.clone()
            }
        })
        .collect()
}

pub fn connectivity<R: Rng + ?Sized>(
    filters: &FilterState,
    catalog: &Catalog,
    rng: &mut R,
) -> Vec<ConnectivityPoint> {
    let impact = impact_for("connectivity", filters, catalog);
    catalog
        .connectivity
        .iter()
        .map(|row| {
            let lte = scaled(row.lte, impact, rng, Spread::Minor);
            let nr = scaled(row.nr, impact, rng, Spread::Minor);
            ConnectivityPoint {
                lte,
                nr,
                ..row.clone()
            }
        })
        .collect()
}

/// Journey funnel. Percentages are recomputed from the adjusted counts
/// relative to the first stage.
pub fn journey_stages<R: Rng + ?Sized>(
    filters: &FilterState,
    catalog: &Catalog,
    rng: &mut R,
) -> Vec<JourneyStage> {
    let impact = impact_for("journey_stages", filters, catalog);
    let counts: Vec<i64> = catalog
        .journey
        .iter()
        .enumerate()
        .map(|(i, stage)| {
            let spread = if i == 0 { Spread::Minor } else { Spread::Medium };
            scaled(stage.count, impact, rng, spread)
        })
        .collect();
    let first = counts.first().copied().unwrap_or(0);
    catalog
        .journey
        .iter()
        .zip(counts)
        .map(|(stage, count)| JourneyStage {
            count,
            percentage: if first == 0 {
                0.0
            } else {
                round_to(count as f64 / first as f64 * 100.0, 1)
            },
            ..stage.clone()
        })
        .collect()
}

/// Visit-frequency mix: each category jitters by up to +/-10% and is not
/// renormalized. The filter state does not affect this dataset.
pub fn visit_frequency<R: Rng + ?Sized>(
    _filters: &FilterState,
    catalog: &Catalog,
    rng: &mut R,
) -> Vec<VisitFrequencyShare> {
    catalog
        .visit_frequency
        .iter()
        .map(|row| {
            let jitter = uniform(rng, -VISIT_FREQUENCY_JITTER, VISIT_FREQUENCY_JITTER);
            VisitFrequencyShare {
                value: round_half_up(row.value as f64 * (1.0 + jitter)) as i64,
                ..row.clone()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{DateRange, FilterAction};
    use crate::variation::testing::{low_edge, midpoint};
    use chrono::NaiveDate;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::BTreeSet;

    fn unrestricted() -> FilterState {
        let end = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
        FilterState::unrestricted(DateRange::last_days(end, 30))
    }

    fn with_segments(labels: &[&str]) -> FilterState {
        unrestricted().apply(FilterAction::SetSegments(Scope::from_labels(
            labels.iter().copied(),
        )))
    }

    fn with_devices(labels: &[&str]) -> FilterState {
        unrestricted().apply(FilterAction::SetDeviceTypes(Scope::from_labels(
            labels.iter().copied(),
        )))
    }

    #[test]
    fn renormalize_rounds_each_share() {
        let mut v = vec![1, 1, 1];
        renormalize(&mut v);
        assert_eq!(v, vec![33, 33, 33]);

        let mut v = vec![50, 30, 20];
        renormalize(&mut v);
        assert_eq!(v, vec![50, 30, 20]);

        let mut zeros = vec![0, 0];
        renormalize(&mut zeros);
        assert_eq!(zeros, vec![0, 0]);
    }

    #[test]
    fn midpoint_variation_reproduces_base_data() {
        let c = Catalog::standard();
        let f = unrestricted();
        let mut rng = midpoint();
        let hourly = traffic_by_time(&f, c, &mut rng);
        assert_eq!(hourly, c.hourly_traffic);
        assert_eq!(weekly_traffic(&f, c, &mut rng), c.weekly_traffic);
        assert_eq!(dwell_time_by_area(&f, c, &mut rng), c.dwell_times);
        assert_eq!(traffic_heatmap(&f, c, &mut rng), c.heatmap);
        assert_eq!(monthly_trend(&f, c, &mut rng), c.monthly_trend);
        assert_eq!(movement(&f, c, &mut rng), c.movement);
        assert_eq!(location_flows(&f, c, &mut rng), c.location_flows);
        assert_eq!(connectivity(&f, c, &mut rng), c.connectivity);
        assert_eq!(customer_segments(&f, c, &mut rng), c.segments);
        assert_eq!(device_distribution(&f, c, &mut rng), c.devices);
        assert_eq!(visit_frequency(&f, c, &mut rng), c.visit_frequency);
    }

    #[test]
    fn impact_scales_counts() {
        let c = Catalog::standard();
        let f = unrestricted().apply(FilterAction::SetPrefectures(BTreeSet::from([
            "北海道".to_string(),
        ])));
        let rows = weekly_traffic(&f, c, &mut midpoint());
        for (row, base) in rows.iter().zip(&c.weekly_traffic) {
            assert_eq!(row.volume, round_half_up(base.volume as f64 / 7.0) as i64);
        }
    }

    #[test]
    fn segments_all_keeps_every_name_and_sums_near_100() {
        let c = Catalog::standard();
        let f = unrestricted();
        for seed in 0..200 {
            let rows = customer_segments(&f, c, &mut StdRng::seed_from_u64(seed));
            let names: Vec<_> = rows.iter().map(|r| r.name.as_str()).collect();
            assert_eq!(names, c.segment_names());
            let total: i64 = rows.iter().map(|r| r.value).sum();
            assert!((97..=103).contains(&total), "seed {seed}: sum {total}");
        }
    }

    #[test]
    fn segments_subset_only_returns_selection() {
        let c = Catalog::standard();
        let f = with_segments(&["シニア層", "週末来店層"]);
        for seed in 0..200 {
            let rows = customer_segments(&f, c, &mut StdRng::seed_from_u64(seed));
            assert_eq!(rows.len(), 2);
            assert!(rows.iter().all(|r| f.segments.contains(&r.name)));
            let total: i64 = rows.iter().map(|r| r.value).sum();
            assert!((99..=101).contains(&total), "seed {seed}: sum {total}");
        }
    }

    #[test]
    fn single_segment_is_always_100() {
        let rows = customer_segments(
            &with_segments(&["ファミリー層"]),
            Catalog::standard(),
            &mut StdRng::seed_from_u64(1),
        );
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].value, 100);
    }

    #[test]
    fn os_selection_pins_distribution() {
        let c = Catalog::standard();
        let mut rng = StdRng::seed_from_u64(3);
        let ios = device_distribution(&with_devices(&["iOS"]), c, &mut rng);
        assert_eq!(
            ios,
            vec![DeviceShare {
                device_type: "iOS".into(),
                percentage: 100
            }]
        );
        let android = device_distribution(&with_devices(&["Android"]), c, &mut rng);
        assert_eq!(
            android,
            vec![DeviceShare {
                device_type: "Android".into(),
                percentage: 100
            }]
        );
    }

    #[test]
    fn tier_selection_uses_lookup_table() {
        let c = Catalog::standard();
        let mut rng = StdRng::seed_from_u64(3);
        let split = |labels: &[&str], rng: &mut StdRng| {
            device_distribution(&with_devices(labels), c, rng)
                .iter()
                .map(|d| d.percentage)
                .collect::<Vec<_>>()
        };
        assert_eq!(split(&["ハイエンド"], &mut rng), vec![75, 25]);
        assert_eq!(split(&["ミドルレンジ"], &mut rng), vec![60, 40]);
        assert_eq!(split(&["ローエンド"], &mut rng), vec![40, 60]);
        assert_eq!(split(&["ハイエンド", "ローエンド"], &mut rng), vec![75, 25]);
    }

    #[test]
    fn both_os_labels_fall_back_to_scaled_split() {
        let c = Catalog::standard();
        let rows = device_distribution(&with_devices(&["iOS", "Android"]), c, &mut midpoint());
        assert_eq!(rows, c.devices);
    }

    #[test]
    fn kpi_keeps_peak_hour() {
        let c = Catalog::standard();
        let f = with_segments(&["シニア層"]);
        let kpi = kpi_summary(&f, c, &mut StdRng::seed_from_u64(11));
        assert_eq!(kpi.peak_hour, "18:00");
        assert_eq!(kpi.week_over_week_change, round_to(kpi.week_over_week_change, 1));
    }

    #[test]
    fn kpi_at_midpoint() {
        let c = Catalog::standard();
        let kpi = kpi_summary(&unrestricted(), c, &mut midpoint());
        assert_eq!(kpi, c.kpi);
    }

    #[test]
    fn journey_percentages_follow_counts() {
        let c = Catalog::standard();
        for seed in 0..50 {
            let f = with_segments(&["シニア層", "平日夜間層"]);
            let rows = journey_stages(&f, c, &mut StdRng::seed_from_u64(seed));
            assert_eq!(rows.len(), c.journey.len());
            assert_eq!(rows[0].percentage, 100.0);
            for row in &rows {
                let expected = round_to(row.count as f64 / rows[0].count as f64 * 100.0, 1);
                assert_eq!(row.percentage, expected);
            }
        }
    }

    #[test]
    fn location_flow_percentage_ignores_impact() {
        let c = Catalog::standard();
        let f = with_segments(&["シニア層"]);
        let rows = location_flows(&f, c, &mut low_edge());
        for (row, base) in rows.iter().zip(&c.location_flows) {
            assert_eq!(row.percentage, round_half_up(base.percentage as f64 * 0.7) as i64);
            assert_eq!(
                row.value,
                round_half_up(base.value as f64 * 0.2 * 0.7) as i64
            );
        }
    }

    #[test]
    fn visit_frequency_jitter_is_bounded() {
        let c = Catalog::standard();
        let f = with_segments(&["シニア層"]);
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..100 {
            for (row, base) in visit_frequency(&f, c, &mut rng).iter().zip(&c.visit_frequency) {
                let lo = round_half_up(base.value as f64 * 0.9) as i64;
                let hi = round_half_up(base.value as f64 * 1.1) as i64;
                assert!((lo..=hi).contains(&row.value));
            }
        }
    }
}
