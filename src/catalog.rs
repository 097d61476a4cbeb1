// Static reference data: the prefecture -> city -> store tree and the
// unfiltered baseline of every dataset the dashboard shows.
//
// Everything here is built once and never mutated. Transformers read the
// baseline and return fresh copies.
use crate::types::{
    AreaDwell, City, ConnectivityPoint, DailyTraffic, DeviceShare, DeviceTierShare, HeatmapCell,
    HourlyTraffic, JourneyStage, KpiSummary, LocationFlow, MonthlyTrend, MovementEdge, Prefecture,
    SegmentShare, Store, StoreRef, VisitFrequencyShare,
};
use once_cell::sync::Lazy;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const WEEKDAYS: [&str; 7] = ["月", "火", "水", "木", "金", "土", "日"];

// The heatmap baseline is itself randomized; a fixed seed keeps it stable
// across runs so it behaves like the other fixtures.
const HEATMAP_SEED: u64 = 0x5EED_F00D;

static STANDARD: Lazy<Catalog> = Lazy::new(Catalog::build);

#[derive(Debug, Clone)]
pub struct Catalog {
    pub prefectures: Vec<Prefecture>,
    pub stores: Vec<StoreRef>,
    pub hourly_traffic: Vec<HourlyTraffic>,
    pub weekly_traffic: Vec<DailyTraffic>,
    pub segments: Vec<SegmentShare>,
    pub dwell_times: Vec<AreaDwell>,
    pub devices: Vec<DeviceShare>,
    pub device_tiers: Vec<DeviceTierShare>,
    pub monthly_trend: Vec<MonthlyTrend>,
    pub heatmap: Vec<HeatmapCell>,
    pub movement: Vec<MovementEdge>,
    pub location_flows: Vec<LocationFlow>,
    pub connectivity: Vec<ConnectivityPoint>,
    pub kpi: KpiSummary,
    pub journey: Vec<JourneyStage>,
    pub visit_frequency: Vec<VisitFrequencyShare>,
}

impl Catalog {
    /// The shared fixture catalog.
    pub fn standard() -> &'static Catalog {
        &STANDARD
    }

    pub fn total_prefectures(&self) -> usize {
        self.prefectures.len()
    }

    pub fn total_cities(&self) -> usize {
        self.prefectures.iter().map(|p| p.cities.len()).sum()
    }

    pub fn total_stores(&self) -> usize {
        self.stores.len()
    }

    /// Segment names selectable in the filter panel.
    pub fn segment_names(&self) -> Vec<&str> {
        self.segments.iter().map(|s| s.name.as_str()).collect()
    }

    /// Device labels selectable in the filter panel: tiers first, then OS.
    pub fn device_labels(&self) -> Vec<&str> {
        self.device_tiers
            .iter()
            .map(|t| t.tier.as_str())
            .chain(self.devices.iter().map(|d| d.device_type.as_str()))
            .collect()
    }

    pub fn prefecture_by_id(&self, id: &str) -> Option<&Prefecture> {
        self.prefectures.iter().find(|p| p.id == id)
    }

    /// City ids are only unique inside their prefecture, so the lookup is scoped.
    pub fn city_by_id(&self, prefecture_id: &str, city_id: &str) -> Option<&City> {
        self.prefecture_by_id(prefecture_id)?
            .cities
            .iter()
            .find(|c| c.id == city_id)
    }

    fn build() -> Catalog {
        let prefectures = area_tree();
        let stores = flatten_stores(&prefectures);
        Catalog {
            prefectures,
            stores,
            hourly_traffic: hourly_traffic(),
            weekly_traffic: WEEKDAYS
                .iter()
                .zip([8500, 8200, 8600, 8700, 9500, 12000, 11200])
                .map(|(day, volume)| DailyTraffic {
                    day: day.to_string(),
                    volume,
                })
                .collect(),
            segments: [
                ("週末来店層", 28, "#0066CC"),
                ("平日夜間層", 22, "#00BF80"),
                ("高頻度来店層", 16, "#E53935"),
                ("モバイルヘビーユーザー", 14, "#F59E0B"),
                ("シニア層", 10, "#8B5CF6"),
                ("ファミリー層", 10, "#10B981"),
            ]
            .iter()
            .map(|(name, value, color)| SegmentShare {
                name: name.to_string(),
                value: *value,
                color: color.to_string(),
            })
            .collect(),
            dwell_times: [
                ("モールエントランス", 12),
                ("フードコート", 45),
                ("スーパーマーケット", 30),
                ("アパレルゾーン", 35),
                ("家電エリア", 28),
                ("レストランエリア", 60),
            ]
            .iter()
            .map(|(area, time)| AreaDwell {
                area: area.to_string(),
                time: *time,
            })
            .collect(),
            devices: vec![
                DeviceShare {
                    device_type: "iOS".into(),
                    percentage: 65,
                },
                DeviceShare {
                    device_type: "Android".into(),
                    percentage: 35,
                },
            ],
            device_tiers: [("ハイエンド", 38), ("ミドルレンジ", 42), ("ローエンド", 20)]
                .iter()
                .map(|(tier, percentage)| DeviceTierShare {
                    tier: tier.to_string(),
                    percentage: *percentage,
                })
                .collect(),
            monthly_trend: monthly_trend(),
            heatmap: heatmap(HEATMAP_SEED),
            movement: movement(),
            location_flows: location_flows(),
            connectivity: connectivity(),
            kpi: KpiSummary {
                total_visitors: 78342,
                avg_dwell_time: 45,
                peak_hour: "18:00".into(),
                returning_visitors: 42,
                week_over_week_change: 8.5,
            },
            journey: [
                ("認知", 100000, 100.0),
                ("来店", 78342, 78.3),
                ("商品閲覧", 62500, 62.5),
                ("購入", 28900, 28.9),
                ("再来店", 18700, 18.7),
            ]
            .iter()
            .map(|(stage, count, percentage)| JourneyStage {
                stage: stage.to_string(),
                count: *count,
                percentage: *percentage,
            })
            .collect(),
            visit_frequency: [
                ("初回", 38, "#42A5F5"),
                ("月1回未満", 22, "#66BB6A"),
                ("月1-3回", 28, "#FFA726"),
                ("週1回以上", 12, "#EF5350"),
            ]
            .iter()
            .map(|(name, value, color)| VisitFrequencyShare {
                name: name.to_string(),
                value: *value,
                color: color.to_string(),
            })
            .collect(),
        }
    }
}

fn store(id: &str, name: &str) -> Store {
    Store {
        id: id.into(),
        name: name.into(),
    }
}

fn city(id: &str, name: &str, stores: Vec<Store>) -> City {
    City {
        id: id.into(),
        name: name.into(),
        stores,
    }
}

fn prefecture(id: &str, name: &str, cities: Vec<City>) -> Prefecture {
    Prefecture {
        id: id.into(),
        name: name.into(),
        cities,
    }
}

fn area_tree() -> Vec<Prefecture> {
    vec![
        prefecture(
            "hokkaido",
            "北海道",
            vec![
                city(
                    "sapporo",
                    "札幌市",
                    vec![
                        store("sapporo-hassamu", "イオン札幌発寒店"),
                        store("sapporo-hinode", "イオン札幌桑園店"),
                        store("sapporo-shinoro", "イオン札幌篠路店"),
                    ],
                ),
                city(
                    "asahikawa",
                    "旭川市",
                    vec![
                        store("asahikawa-nishi", "イオン旭川西店"),
                        store("asahikawa-miyamae", "イオン旭川宮前店"),
                    ],
                ),
            ],
        ),
        prefecture(
            "tokyo",
            "東京都",
            vec![
                city(
                    "koto",
                    "江東区",
                    vec![
                        store("koto-shinonome", "イオン東雲店"),
                        store("koto-toyosu", "イオンスタイル豊洲"),
                    ],
                ),
                city("katsushika", "葛飾区", vec![store("kameari", "イオン亀有店")]),
                city(
                    "edogawa",
                    "江戸川区",
                    vec![store("edogawa-kasai", "イオン葛西店")],
                ),
            ],
        ),
        prefecture(
            "kanagawa",
            "神奈川県",
            vec![
                city(
                    "yokohama",
                    "横浜市",
                    vec![
                        store("yokohama-honmoku", "イオン本牧店"),
                        store("yokohama-higashi", "イオン東神奈川店"),
                    ],
                ),
                city(
                    "kawasaki",
                    "川崎市",
                    vec![
                        store("kawasaki-daishi", "イオン川崎大師店"),
                        store("kawasaki-shinmaruko", "イオン新百合ヶ丘店"),
                    ],
                ),
            ],
        ),
        prefecture(
            "chiba",
            "千葉県",
            vec![
                city(
                    "chiba",
                    "千葉市",
                    vec![
                        store("chiba-makuhari", "イオン幕張店"),
                        store("chiba-shinyatsumiya", "イオン新八千代店"),
                    ],
                ),
                city(
                    "ichikawa",
                    "市川市",
                    vec![store("ichikawa-minami", "イオン市川妙典店")],
                ),
            ],
        ),
        prefecture(
            "osaka",
            "大阪府",
            vec![
                city(
                    "osaka",
                    "大阪市",
                    vec![
                        store("osaka-dainichi", "イオン大日店"),
                        store("osaka-dome", "イオンスタイル茨木"),
                    ],
                ),
                city(
                    "sakai",
                    "堺市",
                    vec![
                        store("sakai-kita", "イオン堺北花田店"),
                        store("sakai-minami", "イオン堺南花田店"),
                    ],
                ),
            ],
        ),
        prefecture(
            "aichi",
            "愛知県",
            vec![
                city(
                    "nagoya",
                    "名古屋市",
                    vec![
                        store("nagoya-dome", "イオンナゴヤドーム前店"),
                        store("nagoya-hoshigaoka", "イオン星ヶ丘店"),
                    ],
                ),
                city(
                    "toyohashi",
                    "豊橋市",
                    vec![store("toyohashi", "イオン豊橋南店")],
                ),
            ],
        ),
        prefecture(
            "fukuoka",
            "福岡県",
            vec![
                city(
                    "fukuoka",
                    "福岡市",
                    vec![
                        store("fukuoka-kashii", "イオン香椎浜店"),
                        store("fukuoka-noke", "イオン野芥店"),
                    ],
                ),
                city(
                    "kitakyushu",
                    "北九州市",
                    vec![store("kitakyushu-yawata", "イオン八幡東店")],
                ),
            ],
        ),
    ]
}

fn flatten_stores(prefectures: &[Prefecture]) -> Vec<StoreRef> {
    prefectures
        .iter()
        .flat_map(|p| {
            p.cities.iter().flat_map(move |c| {
                c.stores.iter().map(move |s| StoreRef {
                    id: s.id.clone(),
                    name: s.name.clone(),
                    city: c.name.clone(),
                    prefecture: p.name.clone(),
                })
            })
        })
        .collect()
}

fn hourly_traffic() -> Vec<HourlyTraffic> {
    const VOLUMES: [i64; 18] = [
        1200, 1800, 2400, 2800, 3200, 3600, 3800, 3500, 3300, 3400, 3700, 4200, 4500, 4100, 3700,
        3200, 2500, 1800,
    ];
    VOLUMES
        .iter()
        .enumerate()
        .map(|(i, volume)| HourlyTraffic {
            time: format!("{:02}:00", i + 6),
            volume: *volume,
        })
        .collect()
}

fn monthly_trend() -> Vec<MonthlyTrend> {
    const ROWS: [(i64, i64); 12] = [
        (62000, 42),
        (58000, 40),
        (65000, 45),
        (68000, 44),
        (75000, 46),
        (70000, 43),
        (78000, 48),
        (82000, 50),
        (76000, 47),
        (73000, 46),
        (80000, 49),
        (88000, 52),
    ];
    ROWS.iter()
        .enumerate()
        .map(|(i, (visitors, dwell))| MonthlyTrend {
            year: 2023,
            month: format!("{}月", i + 1),
            display_month: format!("2023年{}月", i + 1),
            visitors: *visitors,
            avg_dwell_time: *dwell,
        })
        .collect()
}

/// 7 x 24 cells: weekend daytime and weekday evening peaks.
fn heatmap(seed: u64) -> Vec<HeatmapCell> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut cells = Vec::with_capacity(7 * 24);
    for (day_index, day) in WEEKDAYS.iter().enumerate() {
        for hour in 0..24u32 {
            let value = if day_index >= 5 {
                if (10..=19).contains(&hour) {
                    60 + rng.gen_range(0..40)
                } else {
                    10 + rng.gen_range(0..30)
                }
            } else if (17..=21).contains(&hour) {
                50 + rng.gen_range(0..40)
            } else if (9..=16).contains(&hour) {
                30 + rng.gen_range(0..30)
            } else {
                5 + rng.gen_range(0..15)
            };
            cells.push(HeatmapCell {
                day: day.to_string(),
                hour,
                value,
            });
        }
    }
    cells
}

fn movement() -> Vec<MovementEdge> {
    [
        ("エントランス", "フードコート", 250),
        ("エントランス", "スーパーマーケット", 500),
        ("エントランス", "アパレルゾーン", 350),
        ("フードコート", "スーパーマーケット", 200),
        ("フードコート", "アパレルゾーン", 150),
        ("フードコート", "家電エリア", 100),
        ("スーパーマーケット", "フードコート", 180),
        ("スーパーマーケット", "アパレルゾーン", 120),
        ("スーパーマーケット", "家電エリア", 90),
        ("アパレルゾーン", "フードコート", 220),
        ("アパレルゾーン", "家電エリア", 140),
        ("家電エリア", "フードコート", 110),
        ("家電エリア", "スーパーマーケット", 80),
    ]
    .iter()
    .map(|(source, target, value)| MovementEdge {
        source: source.to_string(),
        target: target.to_string(),
        value: *value,
    })
    .collect()
}

fn location_flows() -> Vec<LocationFlow> {
    [
        ("エントランス", "フードコート", 1250, 42),
        ("アパレル", "フードコート", 980, 33),
        ("エントランス", "アパレル", 830, 28),
        ("フードコート", "キッズ", 650, 22),
        ("アパレル", "キッズ", 520, 18),
        ("エントランス", "雑貨", 480, 16),
        ("フードコート", "アパレル", 420, 14),
    ]
    .iter()
    .map(|(source, target, value, percentage)| LocationFlow {
        source: source.to_string(),
        target: target.to_string(),
        value: *value,
        percentage: *percentage,
    })
    .collect()
}

fn connectivity() -> Vec<ConnectivityPoint> {
    const ROWS: [(i64, i64); 18] = [
        (950, 250),
        (1400, 400),
        (1800, 600),
        (2000, 800),
        (2200, 1000),
        (2400, 1200),
        (2500, 1300),
        (2300, 1200),
        (2200, 1100),
        (2300, 1100),
        (2500, 1200),
        (2800, 1400),
        (3000, 1500),
        (2800, 1300),
        (2500, 1200),
        (2200, 1000),
        (1800, 700),
        (1300, 500),
    ];
    ROWS.iter()
        .enumerate()
        .map(|(i, (lte, nr))| ConnectivityPoint {
            time: format!("{:02}:00", i + 6),
            lte: *lte,
            nr: *nr,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn area_tree_counts() {
        let c = Catalog::standard();
        assert_eq!(c.total_prefectures(), 7);
        assert_eq!(c.total_cities(), 15);
        assert_eq!(c.total_stores(), 26);
    }

    #[test]
    fn ids_are_unique_within_their_level() {
        let c = Catalog::standard();
        let pref_ids: HashSet<_> = c.prefectures.iter().map(|p| &p.id).collect();
        assert_eq!(pref_ids.len(), c.prefectures.len());
        for p in &c.prefectures {
            let city_ids: HashSet<_> = p.cities.iter().map(|c| &c.id).collect();
            assert_eq!(city_ids.len(), p.cities.len());
        }
        let store_ids: HashSet<_> = c.stores.iter().map(|s| &s.id).collect();
        assert_eq!(store_ids.len(), c.stores.len());
    }

    #[test]
    fn city_lookup_is_scoped_by_prefecture() {
        // "chiba" is both a prefecture id and a city id.
        let c = Catalog::standard();
        assert_eq!(c.city_by_id("chiba", "chiba").map(|c| c.name.as_str()), Some("千葉市"));
        assert!(c.city_by_id("tokyo", "chiba").is_none());
    }

    #[test]
    fn percentage_fixtures_sum_to_100() {
        let c = Catalog::standard();
        assert_eq!(c.segments.iter().map(|s| s.value).sum::<i64>(), 100);
        assert_eq!(c.devices.iter().map(|d| d.percentage).sum::<i64>(), 100);
        assert_eq!(c.device_tiers.iter().map(|d| d.percentage).sum::<i64>(), 100);
        assert_eq!(c.visit_frequency.iter().map(|v| v.value).sum::<i64>(), 100);
    }

    #[test]
    fn heatmap_is_stable_and_bounded() {
        let c = Catalog::standard();
        assert_eq!(c.heatmap.len(), 7 * 24);
        assert_eq!(c.heatmap, heatmap(HEATMAP_SEED));
        assert!(c.heatmap.iter().all(|cell| (5..100).contains(&cell.value)));
    }

    #[test]
    fn device_labels_list_tiers_then_os() {
        let c = Catalog::standard();
        assert_eq!(
            c.device_labels(),
            vec!["ハイエンド", "ミドルレンジ", "ローエンド", "iOS", "Android"]
        );
    }
}
