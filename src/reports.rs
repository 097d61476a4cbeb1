// Dashboard report: one snapshot of every dataset for a filter state, plus
// the export to CSV/JSON files.
use crate::catalog::Catalog;
use crate::error::Result;
use crate::filter::FilterState;
use crate::impact::ImpactBreakdown;
use crate::output::{write_csv, write_json};
use crate::transform;
use crate::trend::{trend_metrics, with_forecast};
use crate::types::{
    AreaDwell, ConnectivityPoint, DailyTraffic, DeviceShare, HeatmapCell, HourlyTraffic,
    JourneyStage, KpiSummary, LocationFlow, MonthlyTrend, MovementEdge, SegmentShare,
    TrendMetrics, VisitFrequencyShare,
};
use rand::Rng;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardReport {
    pub impact: f64,
    pub traffic_by_time: Vec<HourlyTraffic>,
    pub weekly_traffic: Vec<DailyTraffic>,
    pub customer_segments: Vec<SegmentShare>,
    pub dwell_time_by_area: Vec<AreaDwell>,
    pub device_distribution: Vec<DeviceShare>,
    pub traffic_heatmap: Vec<HeatmapCell>,
    pub kpi: KpiSummary,
    /// Observed months followed by the forecast rows.
    pub monthly_trend: Vec<MonthlyTrend>,
    pub movement: Vec<MovementEdge>,
    pub location_flows: Vec<LocationFlow>,
    pub connectivity: Vec<ConnectivityPoint>,
    pub journey: Vec<JourneyStage>,
    pub visit_frequency: Vec<VisitFrequencyShare>,
    pub trend: TrendMetrics,
}

/// Files written by [`DashboardReport::export`].
#[derive(Debug, Clone, Default)]
pub struct ExportSummary {
    pub files: Vec<PathBuf>,
}

impl DashboardReport {
    /// Run every transformer once against `filters`, drawing from `rng`.
    pub fn generate<R: Rng + ?Sized>(filters: &FilterState, catalog: &Catalog, rng: &mut R) -> Self {
        let breakdown = ImpactBreakdown::of(filters, catalog);
        info!(
            date = breakdown.date,
            area = breakdown.area,
            segment = breakdown.segment,
            device = breakdown.device,
            "generating dashboard report"
        );
        let monthly = transform::monthly_trend(filters, catalog, rng);
        let trend = trend_metrics(filters, rng);
        DashboardReport {
            impact: breakdown.overall(),
            traffic_by_time: transform::traffic_by_time(filters, catalog, rng),
            weekly_traffic: transform::weekly_traffic(filters, catalog, rng),
            customer_segments: transform::customer_segments(filters, catalog, rng),
            dwell_time_by_area: transform::dwell_time_by_area(filters, catalog, rng),
            device_distribution: transform::device_distribution(filters, catalog, rng),
            traffic_heatmap: transform::traffic_heatmap(filters, catalog, rng),
            kpi: transform::kpi_summary(filters, catalog, rng),
            monthly_trend: with_forecast(&monthly, &trend),
            movement: transform::movement(filters, catalog, rng),
            location_flows: transform::location_flows(filters, catalog, rng),
            connectivity: transform::connectivity(filters, catalog, rng),
            journey: transform::journey_stages(filters, catalog, rng),
            visit_frequency: transform::visit_frequency(filters, catalog, rng),
            trend,
        }
    }

    /// Write one CSV per dataset plus the KPI and trend JSON files into `dir`,
    /// creating it if needed.
    pub fn export(&self, dir: &Path) -> Result<ExportSummary> {
        std::fs::create_dir_all(dir)?;
        let mut summary = ExportSummary::default();
        let files = &mut summary.files;
        export_csv(dir, "traffic_by_time", &self.traffic_by_time, files)?;
        export_csv(dir, "weekly_traffic", &self.weekly_traffic, files)?;
        export_csv(dir, "customer_segments", &self.customer_segments, files)?;
        export_csv(dir, "dwell_time_by_area", &self.dwell_time_by_area, files)?;
        export_csv(dir, "device_distribution", &self.device_distribution, files)?;
        export_csv(dir, "traffic_heatmap", &self.traffic_heatmap, files)?;
        export_csv(dir, "monthly_trend", &self.monthly_trend, files)?;
        export_csv(dir, "movement", &self.movement, files)?;
        export_csv(dir, "location_flows", &self.location_flows, files)?;
        export_csv(dir, "connectivity", &self.connectivity, files)?;
        export_csv(dir, "journey_stages", &self.journey, files)?;
        export_csv(dir, "visit_frequency", &self.visit_frequency, files)?;

        let kpi = dir.join("kpi_summary.json");
        write_json(&kpi, &self.kpi)?;
        summary.files.push(kpi);
        let trend = dir.join("trend_metrics.json");
        write_json(&trend, &self.trend)?;
        summary.files.push(trend);

        info!(dir = %dir.display(), files = summary.files.len(), "exported dashboard report");
        Ok(summary)
    }
}

fn export_csv<T: Serialize>(
    dir: &Path,
    name: &str,
    rows: &[T],
    files: &mut Vec<PathBuf>,
) -> Result<()> {
    let path = dir.join(format!("{}.csv", name));
    write_csv(&path, rows)?;
    files.push(path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::DateRange;
    use crate::variation::testing::midpoint;
    use chrono::NaiveDate;

    fn unrestricted() -> FilterState {
        let end = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
        FilterState::unrestricted(DateRange::last_days(end, 30))
    }

    #[test]
    fn midpoint_report_matches_baseline() {
        let c = Catalog::standard();
        let report = DashboardReport::generate(&unrestricted(), c, &mut midpoint());
        assert_eq!(report.impact, 1.0);
        assert_eq!(report.traffic_by_time, c.hourly_traffic);
        assert_eq!(report.weekly_traffic, c.weekly_traffic);
        assert_eq!(report.kpi, c.kpi);
        assert_eq!(report.monthly_trend.len(), c.monthly_trend.len() + 3);
        assert!(report.monthly_trend[c.monthly_trend.len()..]
            .iter()
            .all(|m| m.display_month.ends_with("(予測)")));
    }

    #[test]
    fn export_writes_every_dataset() {
        let dir = std::env::temp_dir().join(format!("footfall-report-{}", std::process::id()));
        let report = DashboardReport::generate(&unrestricted(), Catalog::standard(), &mut midpoint());
        let summary = report.export(&dir).unwrap();
        assert_eq!(summary.files.len(), 14);
        assert!(summary.files.iter().all(|f| f.exists()));

        let kpi: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(dir.join("kpi_summary.json")).unwrap())
                .unwrap();
        assert!(kpi.get("totalVisitors").is_some());
        let connectivity = std::fs::read_to_string(dir.join("connectivity.csv")).unwrap();
        assert!(connectivity.starts_with("time,4G,5G"));
        std::fs::remove_dir_all(&dir).ok();
    }
}
