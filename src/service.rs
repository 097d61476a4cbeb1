// Mock customer data service.
//
// Stands in for the request/response API behind the segment, customer-list
// and personal-profile screens: every call waits the configured latency and
// then answers from fixtures (or synthesizes rows). Lookups by an unknown
// segment id fail with `SegmentNotFound`.
use crate::error::{InsightsError, Result};
use crate::util::round_half_up;
use crate::variation::uniform;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use std::thread;
use tabled::Tabled;
use tracing::{info, warn};

const MAX_LISTED_CUSTOMERS: u64 = 1000;

const LAST_NAMES: [&str; 30] = [
    "佐藤", "鈴木", "高橋", "田中", "伊藤", "渡辺", "山本", "中村", "小林", "加藤", "吉田", "山田",
    "佐々木", "山口", "松本", "井上", "木村", "林", "斎藤", "清水", "山崎", "阿部", "森", "池田",
    "橋本", "石川", "前田", "後藤", "宮崎", "中島",
];
const MALE_FIRST_NAMES: [&str; 20] = [
    "大翔", "蓮", "陽翔", "樹", "悠真", "悠人", "陸", "颯真", "悠斗", "翔", "大和", "大輝", "陽太",
    "健太", "隼人", "和也", "拓海", "直樹", "翔太", "健",
];
const FEMALE_FIRST_NAMES: [&str; 20] = [
    "陽菜", "凛", "葵", "結菜", "結衣", "杏", "莉子", "美咲", "楓", "美月", "彩花", "遥", "桜", "愛",
    "美優", "真央", "奈々", "千尋", "菜々子", "優花",
];
const FREQUENCY_LABELS: [&str; 4] = ["月1-2回", "週1回", "週2-3回", "週4回以上"];
const CATEGORIES: [&str; 10] = [
    "食品", "アパレル", "家電", "日用品", "化粧品", "書籍", "家具", "レストラン", "医薬品",
    "スポーツ用品",
];
const LOYALTY_TIERS: [&str; 4] = ["一般", "シルバー", "ゴールド", "プラチナ"];

/// Optional inclusive ranges a segment must fall into.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    pub visit_frequency: Option<(f64, f64)>,
    pub spending_range: Option<(f64, f64)>,
}

impl FilterCriteria {
    fn matches(&self, segment: &CustomerSegment) -> bool {
        let within = |range: Option<(f64, f64)>, v: f64| match range {
            Some((min, max)) => v >= min && v <= max,
            None => true,
        };
        within(self.visit_frequency, segment.avg_visit_frequency)
            && within(self.spending_range, segment.avg_spending)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSegment {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Segment")]
    pub name: String,
    #[tabled(skip)]
    pub description: String,
    #[tabled(rename = "Customers")]
    pub total_customers: u64,
    #[tabled(rename = "Visits/mo")]
    pub avg_visit_frequency: f64,
    #[tabled(rename = "AvgSpend")]
    pub avg_spending: f64,
    #[tabled(skip)]
    pub top_categories: Vec<String>,
    #[tabled(rename = "Age")]
    pub dominant_age_group: String,
    #[tabled(rename = "Gender")]
    pub dominant_gender: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct NamedValue {
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Value")]
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DemographicBreakdown {
    pub age_groups: Vec<NamedValue>,
    pub genders: Vec<NamedValue>,
    pub marital_status: Vec<NamedValue>,
    pub occupations: Vec<NamedValue>,
    pub income_ranges: Vec<NamedValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BehavioralPatterns {
    pub visit_frequency: Vec<NamedValue>,
    pub visit_times: Vec<NamedValue>,
    pub preferred_areas: Vec<NamedValue>,
    pub purchase_categories: Vec<NamedValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentDetails {
    pub segment: CustomerSegment,
    pub demographic_breakdown: DemographicBreakdown,
    pub behavioral_patterns: BehavioralPatterns,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct PeriodValue {
    #[tabled(rename = "Period")]
    pub period: String,
    #[tabled(rename = "Index")]
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentMetrics {
    pub total_customers: u64,
    pub avg_ltv: i64,
    pub churn_rate: i64,
    pub growth_rate: i64,
    pub avg_visit_frequency: f64,
    pub avg_order_value: f64,
    pub visit_trend: Vec<PeriodValue>,
    pub spending_trend: Vec<PeriodValue>,
}

#[allow(clippy::ptr_arg)]
fn join_labels(labels: &Vec<String>) -> String {
    labels.join("/")
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
#[serde(rename_all = "camelCase")]
pub struct CustomerProfileSummary {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "LTV")]
    pub ltv_score: u32,
    #[tabled(rename = "ChurnRisk")]
    pub churn_risk: u32,
    #[tabled(rename = "Frequency")]
    pub visit_frequency: String,
    #[tabled(rename = "LastVisit")]
    pub last_visit: NaiveDate,
    #[tabled(rename = "AvgSpend")]
    pub avg_spending: String,
    #[tabled(rename = "Categories", display_with = "join_labels")]
    pub main_categories: Vec<String>,
    #[tabled(rename = "Tier")]
    pub loyalty_tier: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: u64,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
#[serde(rename_all = "camelCase")]
pub struct AreaPreference {
    #[tabled(rename = "Area")]
    pub area: String,
    #[tabled(rename = "Visit%")]
    pub visit_percentage: i64,
}

/// Individual profile shown on the personal-analysis screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDetail {
    pub id: String,
    pub nickname: String,
    pub ltv_score: u32,
    pub churn_risk: u32,
    pub loyalty_tier: String,
    pub first_visit_date: NaiveDate,
    pub last_visit_date: NaiveDate,
    pub visit_average: String,
    pub dwell_average: String,
    pub average_spend: String,
    pub preferred_areas: Vec<AreaPreference>,
    pub typical_visit_times: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationKind {
    Product,
    Store,
    Event,
    Offer,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub kind: RecommendationKind,
    pub name: String,
    pub confidence: u32,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BehaviorPrediction {
    pub next_visit_date: NaiveDate,
    pub next_visit_confidence: u32,
    pub likely_areas: Vec<String>,
    pub next_purchase_category: String,
    pub next_purchase_confidence: u32,
    pub predicted_amount: String,
    pub likely_stores: Vec<String>,
    pub churn_risk: String,
    pub churn_factors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessInfo {
    pub user_id: String,
    pub reason: String,
    pub timestamp: NaiveDateTime,
}

/// Sequence number of an issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

/// Last-write-wins guard for responses: only the most recently issued
/// ticket may deliver a result.
#[derive(Debug, Default)]
pub struct RequestTracker {
    latest: u64,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self) -> Ticket {
        self.latest += 1;
        Ticket(self.latest)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.latest
    }

    /// Hand back `response` if `ticket` is still current, otherwise drop it.
    pub fn accept<T>(&self, ticket: Ticket, response: T) -> Option<T> {
        if self.is_current(ticket) {
            Some(response)
        } else {
            warn!(ticket = ticket.0, latest = self.latest, "discarding superseded response");
            None
        }
    }
}

pub struct DataService {
    latency: std::time::Duration,
    default_page_size: usize,
}

impl DataService {
    pub fn new(latency_ms: u64, default_page_size: usize) -> Self {
        DataService {
            latency: std::time::Duration::from_millis(latency_ms),
            default_page_size: default_page_size.max(1),
        }
    }

    fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            thread::sleep(self.latency);
        }
    }

    pub fn segments(&self, criteria: &FilterCriteria) -> Vec<CustomerSegment> {
        info!(?criteria, "fetching segments");
        self.simulate_latency();
        segment_fixtures()
            .into_iter()
            .filter(|s| criteria.matches(s))
            .collect()
    }

    fn find_segment(&self, segment_id: &str) -> Result<CustomerSegment> {
        segment_fixtures()
            .into_iter()
            .find(|s| s.id == segment_id)
            .ok_or_else(|| InsightsError::SegmentNotFound(segment_id.to_string()))
    }

    pub fn segment_details(&self, segment_id: &str) -> Result<SegmentDetails> {
        info!(segment_id, "fetching segment details");
        self.simulate_latency();
        let segment = self.find_segment(segment_id)?;
        Ok(SegmentDetails {
            segment,
            demographic_breakdown: DemographicBreakdown {
                age_groups: named(&[
                    ("~19歳", 5),
                    ("20-29歳", 15),
                    ("30-39歳", 25),
                    ("40-49歳", 30),
                    ("50-59歳", 15),
                    ("60歳~", 10),
                ]),
                genders: named(&[("男性", 35), ("女性", 65)]),
                marital_status: named(&[("未婚", 30), ("既婚", 60), ("その他", 10)]),
                occupations: named(&[
                    ("会社員", 45),
                    ("公務員", 10),
                    ("自営業", 15),
                    ("主婦/主夫", 20),
                    ("その他", 10),
                ]),
                income_ranges: named(&[
                    ("~300万円", 10),
                    ("300-500万円", 25),
                    ("500-700万円", 30),
                    ("700-1000万円", 25),
                    ("1000万円~", 10),
                ]),
            },
            behavioral_patterns: BehavioralPatterns {
                visit_frequency: named(&[
                    ("週1回未満", 20),
                    ("週1-2回", 40),
                    ("週3-4回", 30),
                    ("週5回以上", 10),
                ]),
                visit_times: named(&[
                    ("平日午前", 15),
                    ("平日午後", 25),
                    ("平日夕方/夜", 30),
                    ("週末午前", 10),
                    ("週末午後", 20),
                ]),
                preferred_areas: named(&[
                    ("食品", 30),
                    ("アパレル", 25),
                    ("家電", 15),
                    ("レストラン", 15),
                    ("その他", 15),
                ]),
                purchase_categories: named(&[
                    ("食品", 35),
                    ("アパレル", 20),
                    ("日用品", 15),
                    ("家電", 10),
                    ("その他", 20),
                ]),
            },
        })
    }

    pub fn segment_metrics<R: Rng + ?Sized>(
        &self,
        segment_id: &str,
        rng: &mut R,
    ) -> Result<SegmentMetrics> {
        info!(segment_id, "fetching segment metrics");
        self.simulate_latency();
        let segment = self.find_segment(segment_id)?;
        let periods = ["2023-04", "2023-05", "2023-06", "2023-07", "2023-08", "2023-09"];
        let trend = |values: [i64; 6]| -> Vec<PeriodValue> {
            periods
                .iter()
                .zip(values)
                .map(|(period, value)| PeriodValue {
                    period: period.to_string(),
                    value,
                })
                .collect()
        };
        Ok(SegmentMetrics {
            total_customers: segment.total_customers,
            avg_ltv: round_half_up(segment.avg_spending * 12.0 * 3.5) as i64,
            churn_rate: rounded_uniform(rng, 5.0, 15.0),
            growth_rate: rounded_uniform(rng, -2.0, 8.0),
            avg_visit_frequency: segment.avg_visit_frequency,
            avg_order_value: segment.avg_spending,
            visit_trend: trend([95, 97, 100, 102, 105, 108]),
            spending_trend: trend([94, 98, 100, 103, 107, 110]),
        })
    }

    /// One page of synthetic customer rows for a segment. The listing is
    /// capped at 1000 customers; `page` is 1-based.
    pub fn customer_profiles<R: Rng + ?Sized>(
        &self,
        segment_id: &str,
        page: Option<usize>,
        page_size: Option<usize>,
        today: NaiveDate,
        rng: &mut R,
    ) -> Result<Page<CustomerProfileSummary>> {
        info!(segment_id, ?page, ?page_size, "fetching customer profiles");
        self.simulate_latency();
        let segment = self.find_segment(segment_id)?;
        let page = page.filter(|p| *p > 0).unwrap_or(1);
        let page_size = page_size.filter(|s| *s > 0).unwrap_or(self.default_page_size);
        let total = segment.total_customers.min(MAX_LISTED_CUSTOMERS);
        let start = (page as u64 - 1).saturating_mul(page_size as u64);
        let count = (page_size as u64).min(total.saturating_sub(start));
        let items = (0..count).map(|_| synth_profile(today, rng)).collect();
        Ok(Page {
            items,
            total_count: total,
            page,
            page_size,
            total_pages: total.div_ceil(page_size as u64),
        })
    }

    /// Detailed profile; unknown ids fall back to the first fixture customer.
    pub fn customer_detail(&self, customer_id: &str) -> CustomerDetail {
        info!(customer_id, "fetching customer detail");
        self.simulate_latency();
        let mut profiles = customer_fixtures();
        match profiles.iter().position(|c| c.id == customer_id) {
            Some(i) => profiles.swap_remove(i),
            None => {
                warn!(customer_id, "unknown customer, showing default profile");
                profiles.swap_remove(0)
            }
        }
    }

    pub fn recommendations(&self, customer_id: &str) -> Vec<Recommendation> {
        use RecommendationKind::*;
        let rows: &[(RecommendationKind, &str, u32, &str)] = match customer_id {
            "CUST10025489" => &[
                (Product, "秋物アウターコレクション", 92, "過去の購買パターンと季節トレンドに基づく"),
                (Store, "ZARA", 85, "類似顧客の行動傾向と購買履歴に基づく"),
                (Event, "ホームスタイリングフェア", 78, "最近の雑貨購入増加と来店パターンに基づく"),
                (Offer, "金曜夕方限定クーポン", 95, "来店傾向と実際の購買確率に基づく"),
            ],
            "CUST10032175" => &[
                (Product, "最新オーディオ機器フェア", 88, "過去の購買パターンと興味領域に基づく"),
                (Store, "Apple Store", 82, "デジタル製品への関心と類似顧客の行動に基づく"),
                (Event, "アウトドアグッズコレクション", 75, "スポーツ用品購入履歴とライフスタイルに基づく"),
                (Offer, "週末午前限定クーポン", 90, "来店時間帯と購買意欲に基づく"),
            ],
            "CUST10018734" => &[
                (Product, "秋の新作コスメコレクション", 90, "過去の購買パターンと最近のブランド興味に基づく"),
                (Store, "カフェ併設ブックストア", 80, "長時間滞在傾向と関連購入に基づく"),
                (Event, "カジュアルファッションフェア", 85, "購入履歴とトレンド親和性に基づく"),
                (Offer, "SNS投稿特典クーポン", 88, "同世代層のエンゲージメント傾向に基づく"),
            ],
            _ => &[
                (Product, "秋の新作ファッションコレクション", 88, "季節トレンドとユーザー属性に基づく"),
                (Store, "ユニクロ", 82, "人気店舗と購買傾向に基づく"),
                (Event, "ホームライフスタイルフェア", 75, "類似顧客の関心傾向に基づく"),
                (Offer, "週末限定10%オフクーポン", 90, "来店頻度と購買履歴に基づく"),
            ],
        };
        rows.iter()
            .map(|(kind, name, confidence, reason)| Recommendation {
                kind: *kind,
                name: name.to_string(),
                confidence: *confidence,
                reason: reason.to_string(),
            })
            .collect()
    }

    pub fn predictions(&self, customer_id: &str) -> BehaviorPrediction {
        let strings = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        match customer_id {
            "CUST10025489" => BehaviorPrediction {
                next_visit_date: ymd(2023, 10, 5),
                next_visit_confidence: 85,
                likely_areas: strings(&["アパレルエリア", "コスメエリア", "フードコート"]),
                next_purchase_category: "アウター・ジャケット".into(),
                next_purchase_confidence: 78,
                predicted_amount: "12,000円 - 15,000円".into(),
                likely_stores: strings(&["AEON STYLE", "ZARA", "ユニクロ"]),
                churn_risk: "低".into(),
                churn_factors: strings(&["安定した来店頻度", "増加傾向の滞在時間", "直近の決済増加"]),
            },
            "CUST10032175" => BehaviorPrediction {
                next_visit_date: ymd(2023, 10, 7),
                next_visit_confidence: 65,
                likely_areas: strings(&["家電エリア", "スポーツコーナー", "フードコート"]),
                next_purchase_category: "家電製品".into(),
                next_purchase_confidence: 70,
                predicted_amount: "10,000円 - 18,000円".into(),
                likely_stores: strings(&["ヤマダ電機", "ビックカメラ"]),
                churn_risk: "中".into(),
                churn_factors: strings(&[
                    "来店頻度の微減",
                    "モール外店舗での決済増加",
                    "競合施設での決済記録",
                ]),
            },
            "CUST10018734" => BehaviorPrediction {
                next_visit_date: ymd(2023, 10, 1),
                next_visit_confidence: 90,
                likely_areas: strings(&["カフェエリア", "アパレルエリア", "コスメエリア"]),
                next_purchase_category: "コスメ・美容".into(),
                next_purchase_confidence: 85,
                predicted_amount: "3,000円 - 5,000円".into(),
                likely_stores: strings(&["DHC", "ロフト", "PLAZA"]),
                churn_risk: "低".into(),
                churn_factors: strings(&[
                    "増加傾向の来店頻度",
                    "長い滞在時間",
                    "SNSでのイオンモール関連投稿",
                ]),
            },
            _ => BehaviorPrediction {
                next_visit_date: ymd(2023, 10, 10),
                next_visit_confidence: 75,
                likely_areas: strings(&["アパレルエリア", "フードコート", "書籍エリア"]),
                next_purchase_category: "カジュアルウェア".into(),
                next_purchase_confidence: 70,
                predicted_amount: "8,000円 - 12,000円".into(),
                likely_stores: strings(&["ユニクロ", "GU", "AEON STYLE"]),
                churn_risk: "中".into(),
                churn_factors: strings(&[
                    "不定期な来店パターン",
                    "競合店舗での購入履歴",
                    "直近の来店頻度の低下",
                ]),
            },
        }
    }

    /// Record a view of personal data on the audit target.
    pub fn log_access(&self, customer_id: &str, access: &AccessInfo) {
        info!(
            target: "audit",
            customer_id,
            user_id = %access.user_id,
            reason = %access.reason,
            timestamp = %access.timestamp,
            "personal data accessed"
        );
    }
}

fn rounded_uniform<R: Rng + ?Sized>(rng: &mut R, low: f64, high: f64) -> i64 {
    round_half_up(uniform(rng, low, high)) as i64
}

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn named(rows: &[(&str, i64)]) -> Vec<NamedValue> {
    rows.iter()
        .map(|(name, value)| NamedValue {
            name: name.to_string(),
            value: *value,
        })
        .collect()
}

fn pick<'a, R: Rng + ?Sized>(items: &[&'a str], rng: &mut R) -> &'a str {
    items.choose(rng).copied().unwrap_or_default()
}

fn synth_profile<R: Rng + ?Sized>(today: NaiveDate, rng: &mut R) -> CustomerProfileSummary {
    let id = format!("CUST{}", rng.gen_range(10_000_000..100_000_000u64));
    let first_names: &[&str] = if rng.gen_bool(0.5) {
        &MALE_FIRST_NAMES
    } else {
        &FEMALE_FIRST_NAMES
    };
    let name = format!("{} {}", pick(&LAST_NAMES, rng), pick(first_names, rng));
    let category_count = rng.gen_range(1..=3);
    let mut main_categories: Vec<String> = Vec::with_capacity(category_count);
    for _ in 0..category_count {
        let category = pick(&CATEGORIES, rng).to_string();
        if !main_categories.contains(&category) {
            main_categories.push(category);
        }
    }
    CustomerProfileSummary {
        id,
        name,
        ltv_score: rng.gen_range(40..100),
        churn_risk: rng.gen_range(1..=40),
        visit_frequency: pick(&FREQUENCY_LABELS, rng).to_string(),
        last_visit: today - Duration::days(rng.gen_range(0..30)),
        avg_spending: format!("{}円", rng.gen_range(0..20) * 1000 + 5000),
        main_categories,
        loyalty_tier: pick(&LOYALTY_TIERS, rng).to_string(),
    }
}

fn segment_fixtures() -> Vec<CustomerSegment> {
    let rows: [(&str, &str, &str, u64, f64, f64, [&str; 3], &str, &str); 6] = [
        (
            "seg_regular_visitors",
            "常連来店客",
            "月に4回以上来店する顧客層",
            1_250_000,
            5.2,
            12800.0,
            ["食品", "アパレル", "日用品"],
            "30-40代",
            "女性",
        ),
        (
            "seg_high_spenders",
            "高額支出層",
            "1回の来店で平均15,000円以上使う顧客層",
            850_000,
            2.8,
            24500.0,
            ["家電", "ラグジュアリー", "家具"],
            "40-50代",
            "男性",
        ),
        (
            "seg_family_shoppers",
            "ファミリー層",
            "子供関連商品を定期的に購入する顧客層",
            1_650_000,
            3.5,
            18200.0,
            ["子供服", "食品", "おもちゃ"],
            "30-40代",
            "女性",
        ),
        (
            "seg_weekend_visitors",
            "週末来店層",
            "主に週末に買い物をする顧客層",
            2_300_000,
            1.5,
            14300.0,
            ["アパレル", "レストラン", "エンタメ"],
            "20-30代",
            "混合",
        ),
        (
            "seg_online_offline",
            "オンライン・オフライン併用層",
            "ECと実店舗の両方を利用する顧客層",
            980_000,
            2.2,
            16700.0,
            ["家電", "アパレル", "書籍"],
            "20-40代",
            "混合",
        ),
        (
            "seg_senior_shoppers",
            "シニア層",
            "60歳以上の顧客層",
            1_450_000,
            3.8,
            9500.0,
            ["食品", "健康", "日用品"],
            "60代以上",
            "混合",
        ),
    ];
    rows.iter()
        .map(
            |(id, name, description, total, freq, spend, categories, age, gender)| {
                CustomerSegment {
                    id: id.to_string(),
                    name: name.to_string(),
                    description: description.to_string(),
                    total_customers: *total,
                    avg_visit_frequency: *freq,
                    avg_spending: *spend,
                    top_categories: categories.iter().map(|c| c.to_string()).collect(),
                    dominant_age_group: age.to_string(),
                    dominant_gender: gender.to_string(),
                }
            },
        )
        .collect()
}

fn customer_fixtures() -> Vec<CustomerDetail> {
    let areas = |rows: &[(&str, i64)]| -> Vec<AreaPreference> {
        rows.iter()
            .map(|(area, pct)| AreaPreference {
                area: area.to_string(),
                visit_percentage: *pct,
            })
            .collect()
    };
    vec![
        CustomerDetail {
            id: "CUST10025489".into(),
            nickname: "高橋 花子".into(),
            ltv_score: 92,
            churn_risk: 8,
            loyalty_tier: "プラチナ".into(),
            first_visit_date: ymd(2022, 5, 12),
            last_visit_date: ymd(2023, 9, 28),
            visit_average: "週2.3回".into(),
            dwell_average: "74分".into(),
            average_spend: "15,800円/月".into(),
            preferred_areas: areas(&[
                ("アパレルゾーン", 65),
                ("フードコート", 45),
                ("コスメエリア", 30),
                ("雑貨エリア", 25),
            ]),
            typical_visit_times: vec!["平日夕方".into(), "週末午後".into()],
        },
        CustomerDetail {
            id: "CUST10032175".into(),
            nickname: "佐藤 大輔".into(),
            ltv_score: 78,
            churn_risk: 15,
            loyalty_tier: "ゴールド".into(),
            first_visit_date: ymd(2021, 11, 15),
            last_visit_date: ymd(2023, 9, 25),
            visit_average: "週1.5回".into(),
            dwell_average: "45分".into(),
            average_spend: "22,500円/月".into(),
            preferred_areas: areas(&[
                ("家電エリア", 70),
                ("スポーツコーナー", 50),
                ("フードコート", 35),
                ("書籍・文具", 20),
            ]),
            typical_visit_times: vec!["週末午前".into(), "金曜夕方".into()],
        },
        CustomerDetail {
            id: "CUST10018734".into(),
            nickname: "鈴木 美咲".into(),
            ltv_score: 85,
            churn_risk: 12,
            loyalty_tier: "ゴールド".into(),
            first_visit_date: ymd(2022, 8, 3),
            last_visit_date: ymd(2023, 9, 29),
            visit_average: "週3.1回".into(),
            dwell_average: "92分".into(),
            average_spend: "18,200円/月".into(),
            preferred_areas: areas(&[
                ("カフェエリア", 75),
                ("コスメエリア", 60),
                ("アパレルゾーン", 40),
                ("書籍エリア", 30),
            ]),
            typical_visit_times: vec!["平日午後".into(), "週末午後".into()],
        },
    ]
}
