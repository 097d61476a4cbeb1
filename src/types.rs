// Record types shared by the static catalogs and the derived datasets.
//
// A derived dataset has the same shape as its base dataset; the transformers
// clone the base rows and overwrite the numeric fields.
use serde::Serialize;
use tabled::Tabled;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Store {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct City {
    pub id: String,
    pub name: String,
    pub stores: Vec<Store>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Prefecture {
    pub id: String,
    pub name: String,
    pub cities: Vec<City>,
}

/// Flattened store row, used when looking stores up without walking the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Tabled)]
pub struct StoreRef {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Store")]
    pub name: String,
    #[tabled(rename = "City")]
    pub city: String,
    #[tabled(rename = "Prefecture")]
    pub prefecture: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct HourlyTraffic {
    #[tabled(rename = "Time")]
    pub time: String,
    #[tabled(rename = "Volume")]
    pub volume: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct DailyTraffic {
    #[tabled(rename = "Day")]
    pub day: String,
    #[tabled(rename = "Volume")]
    pub volume: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct SegmentShare {
    #[tabled(rename = "Segment")]
    pub name: String,
    #[tabled(rename = "Value")]
    pub value: i64,
    #[tabled(rename = "Color")]
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct AreaDwell {
    #[tabled(rename = "Area")]
    pub area: String,
    #[tabled(rename = "Minutes")]
    pub time: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct DeviceShare {
    #[serde(rename = "type")]
    #[tabled(rename = "Type")]
    pub device_type: String,
    #[tabled(rename = "Percentage")]
    pub percentage: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct DeviceTierShare {
    #[tabled(rename = "Tier")]
    pub tier: String,
    #[tabled(rename = "Percentage")]
    pub percentage: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyTrend {
    #[tabled(rename = "Year")]
    pub year: i32,
    #[tabled(rename = "Month")]
    pub month: String,
    #[tabled(rename = "Label")]
    pub display_month: String,
    #[tabled(rename = "Visitors")]
    pub visitors: i64,
    #[tabled(rename = "AvgDwell")]
    pub avg_dwell_time: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct HeatmapCell {
    #[tabled(rename = "Day")]
    pub day: String,
    #[tabled(rename = "Hour")]
    pub hour: u32,
    #[tabled(rename = "Value")]
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct MovementEdge {
    #[tabled(rename = "Source")]
    pub source: String,
    #[tabled(rename = "Target")]
    pub target: String,
    #[tabled(rename = "Value")]
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct LocationFlow {
    #[tabled(rename = "Source")]
    pub source: String,
    #[tabled(rename = "Target")]
    pub target: String,
    #[tabled(rename = "Value")]
    pub value: i64,
    #[tabled(rename = "Percentage")]
    pub percentage: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct ConnectivityPoint {
    #[tabled(rename = "Time")]
    pub time: String,
    #[serde(rename = "4G")]
    #[tabled(rename = "4G")]
    pub lte: i64,
    #[serde(rename = "5G")]
    #[tabled(rename = "5G")]
    pub nr: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
#[serde(rename_all = "camelCase")]
pub struct KpiSummary {
    #[tabled(rename = "TotalVisitors")]
    pub total_visitors: i64,
    #[tabled(rename = "AvgDwellTime")]
    pub avg_dwell_time: i64,
    #[tabled(rename = "PeakHour")]
    pub peak_hour: String,
    #[tabled(rename = "ReturningVisitors")]
    pub returning_visitors: i64,
    #[tabled(rename = "WoWChange")]
    pub week_over_week_change: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct JourneyStage {
    #[tabled(rename = "Stage")]
    pub stage: String,
    #[tabled(rename = "Count")]
    pub count: i64,
    #[tabled(rename = "Percentage")]
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct VisitFrequencyShare {
    #[tabled(rename = "Frequency")]
    pub name: String,
    #[tabled(rename = "Value")]
    pub value: i64,
    #[tabled(rename = "Color")]
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
#[serde(rename_all = "camelCase")]
pub struct TrendMetrics {
    #[tabled(rename = "MonthlyGrowth")]
    pub monthly_growth: f64,
    #[tabled(rename = "PeakTimeChange")]
    pub peak_time_change: f64,
    #[tabled(rename = "AvgDwellChange")]
    pub avg_dwell_time_change: f64,
    #[tabled(rename = "Seasonality")]
    pub seasonality_score: f64,
}
