// Entry point and high-level CLI flow.
//
// The console front-end of the dashboard:
// - Options [1]-[3] inspect and edit the filter state, including the
//   prefecture -> city -> store drill-down.
// - Option [4] regenerates every dataset, exports CSV/JSON and prints previews.
// - Option [5] browses customer segments and individual profiles through the
//   mock data service.
use anyhow::Context;
use chrono::Local;
use footfall_insights::catalog::Catalog;
use footfall_insights::config::{load_config, Config};
use footfall_insights::drilldown::{AreaNavigator, DrillLevel};
use footfall_insights::filter::{AreaSelection, DateRange, FilterAction, FilterState, ALL_LABEL};
use footfall_insights::impact::ImpactBreakdown;
use footfall_insights::output;
use footfall_insights::reports::DashboardReport;
use footfall_insights::service::{AccessInfo, DataService, FilterCriteria, RequestTracker};
use footfall_insights::util;
use footfall_insights::variation::session_rng;
use rand::rngs::StdRng;
use std::io::{self, Write};
use std::path::Path;

/// Everything the menu loop mutates, owned by `main` and passed down.
struct Session {
    config: Config,
    catalog: &'static Catalog,
    filters: FilterState,
    navigator: AreaNavigator,
    rng: StdRng,
    service: DataService,
    tracker: RequestTracker,
}

impl Session {
    fn new(config: Config) -> Self {
        Session {
            catalog: Catalog::standard(),
            filters: FilterState::default(),
            navigator: AreaNavigator::new(),
            rng: session_rng(config.random.seed),
            service: DataService::new(config.service.latency_ms, config.service.page_size),
            tracker: RequestTracker::new(),
            config,
        }
    }

    fn dispatch(&mut self, action: FilterAction) {
        tracing::debug!(?action, "filter update");
        self.filters = self.filters.apply(action);
    }
}

/// Read a single line of input after printing `prompt`.
fn read_line(prompt: &str) -> String {
    print!("{}", prompt);
    let _ = io::stdout().flush();
    let mut buf = String::new();
    if let Ok(0) = io::stdin().read_line(&mut buf) {
        // stdin closed
        println!("\nExiting the program.");
        std::process::exit(0);
    }
    buf.trim().to_string()
}

/// Read a single line of input after printing the common "Enter choice:" prompt.
fn read_choice() -> String {
    read_line("Enter choice: ")
}

/// Ask the user whether to go back to the main menu after generating reports.
///
/// Returns `true` if the user chose `Y`, `false` if they chose `N`.
fn prompt_back_to_menu() -> bool {
    loop {
        let resp = read_line("Back to Main Menu (Y/N): ").to_uppercase();
        match resp.as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

fn init_tracing(config: &Config) -> anyhow::Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let file_layer = match config.logging.file_path() {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            let log_file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("opening log file {}", path.display()))?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::sync::Arc::new(log_file))
                    .with_ansi(false),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .init();
    Ok(())
}

/// Handle option [1]: print the current filter state and its impact factors.
fn handle_show_filters(session: &Session) {
    let f = &session.filters;
    let join = |set: &std::collections::BTreeSet<String>| {
        if set.is_empty() {
            "-".to_string()
        } else {
            set.iter().cloned().collect::<Vec<_>>().join(", ")
        }
    };
    println!("\nCurrent filters");
    println!(
        "  Date range : {} .. {} ({} days)",
        f.date_range.start,
        f.date_range.end,
        f.date_range.days()
    );
    println!("  Prefectures: {}", join(&f.areas.prefectures));
    println!("  Cities     : {}", join(&f.areas.cities));
    println!("  Stores     : {}", join(&f.areas.stores));
    println!("  Segments   : {}", f.segments);
    println!("  Devices    : {}", f.device_types);

    let b = ImpactBreakdown::of(f, session.catalog);
    println!(
        "  Impact     : date {} x area {} x segment {} x device {} = {}\n",
        util::format_number(b.date, 3),
        util::format_number(b.area, 3),
        util::format_number(b.segment, 3),
        util::format_number(b.device, 3),
        util::format_number(b.overall(), 3)
    );
}

/// Pick one label from a numbered list; `0` selects "All".
fn pick_label<'a>(title: &str, labels: &[&'a str]) -> Option<&'a str> {
    println!("\n{}", title);
    println!("[0] {}", ALL_LABEL);
    for (i, label) in labels.iter().enumerate() {
        println!("[{}] {}", i + 1, label);
    }
    match util::parse_usize_safe(Some(read_choice().as_str())) {
        Some(0) => Some(ALL_LABEL),
        Some(n) if n <= labels.len() => Some(labels[n - 1]),
        _ => {
            println!("Invalid choice.\n");
            None
        }
    }
}

/// Handle option [2]: the filter editing submenu.
fn handle_edit_filters(session: &mut Session) {
    let catalog = session.catalog;
    loop {
        println!("\nEdit filters:");
        println!("[1] Date range");
        println!("[2] Toggle customer segment");
        println!("[3] Toggle device type");
        println!("[4] Clear area selection");
        println!("[5] Reset to defaults");
        println!("[0] Back\n");
        match read_choice().as_str() {
            "1" => {
                let start = util::parse_date_safe(Some(read_line("Start (YYYY-MM-DD): ").as_str()));
                let end = util::parse_date_safe(Some(read_line("End (YYYY-MM-DD): ").as_str()));
                match (start, end) {
                    (Some(s), Some(e)) if s <= e => {
                        session.dispatch(FilterAction::SetDateRange(DateRange::new(s, e)))
                    }
                    _ => println!("Invalid date range.\n"),
                }
            }
            "2" => {
                let names = catalog.segment_names();
                if let Some(label) = pick_label("Customer segments", &names) {
                    session.dispatch(FilterAction::ToggleSegment(label.to_string()));
                }
            }
            "3" => {
                let labels = catalog.device_labels();
                if let Some(label) = pick_label("Device types", &labels) {
                    session.dispatch(FilterAction::ToggleDeviceType(label.to_string()));
                }
            }
            "4" => session.dispatch(FilterAction::SetAreas(AreaSelection::default())),
            "5" => session.dispatch(FilterAction::Reset),
            "0" => return,
            _ => println!("Invalid choice.\n"),
        }
        handle_show_filters(session);
    }
}

/// Handle option [3]: drill down through prefectures, cities and stores.
fn handle_browse_areas(session: &mut Session) {
    loop {
        let crumbs = session.navigator.breadcrumb(session.catalog);
        let heading = match session.navigator.level() {
            DrillLevel::Prefectures => "Prefectures".to_string(),
            DrillLevel::Cities => format!("Cities in {}", crumbs.join(" > ")),
            DrillLevel::Stores => format!("Stores in {}", crumbs.join(" > ")),
        };
        let rows = session.navigator.rows(session.catalog, &session.filters);
        output::preview_table(&heading, None, &rows, rows.len());
        println!("Enter an ID to open, +ID to toggle selection, '..' to go up, blank to return.");
        let input = read_line("> ");
        match input.as_str() {
            "" => return,
            ".." => session.navigator.back(),
            _ => {
                if let Some(id) = input.strip_prefix('+') {
                    match session
                        .navigator
                        .toggle(session.catalog, &session.filters, id.trim())
                    {
                        Some(action) => session.dispatch(action),
                        None => println!("No row with ID {}.\n", id.trim()),
                    }
                    continue;
                }
                let opened = match session.navigator.level() {
                    DrillLevel::Prefectures => {
                        session.navigator.open_prefecture(session.catalog, &input)
                    }
                    DrillLevel::Cities => session.navigator.open_city(session.catalog, &input),
                    DrillLevel::Stores => false,
                };
                if !opened {
                    println!("Cannot open {} here.\n", input);
                }
            }
        }
    }
}

/// Handle option [4]: generate every dataset, export and preview it.
///
/// This function is intentionally side-effectful:
/// - writes one CSV per dataset,
/// - writes the KPI and trend-metric JSON files,
/// - and prints Markdown previews of the main datasets to the console.
fn handle_generate_reports(session: &mut Session) -> anyhow::Result<()> {
    println!("Generating reports...");
    let report = DashboardReport::generate(&session.filters, session.catalog, &mut session.rng);
    let dir = Path::new(&session.config.output.dir);
    let summary = report
        .export(dir)
        .with_context(|| format!("exporting reports to {}", dir.display()))?;
    println!(
        "Outputs saved to {} ({} files)\n",
        dir.display(),
        summary.files.len()
    );

    let n = session.config.output.preview_rows;
    let kpi = &report.kpi;
    println!("KPI Summary (kpi_summary.json):");
    println!(
        "  Visitors {}  Avg dwell {} min  Peak {}  Returning {}%  WoW {}%\n",
        util::format_int(kpi.total_visitors),
        kpi.avg_dwell_time,
        kpi.peak_hour,
        kpi.returning_visitors,
        util::format_number(kpi.week_over_week_change, 1)
    );
    output::preview_table("Traffic by Time", None, &report.traffic_by_time, n);
    output::preview_table("Weekly Traffic", None, &report.weekly_traffic, n);
    output::preview_table("Customer Segments", None, &report.customer_segments, n);
    output::preview_table("Dwell Time by Area", None, &report.dwell_time_by_area, n);
    output::preview_table("Device Distribution", None, &report.device_distribution, n);
    output::preview_table(
        "Monthly Trend",
        Some("last three rows are forecast"),
        &report.monthly_trend,
        report.monthly_trend.len(),
    );
    output::preview_table("Location Flows", None, &report.location_flows, n);
    output::preview_table("Customer Journey", None, &report.journey, n);
    let t = &report.trend;
    println!(
        "Trend Metrics (trend_metrics.json): growth {}%/mo, peak shift {}h, dwell {}%, seasonality {}\n",
        t.monthly_growth, t.peak_time_change, t.avg_dwell_time_change, t.seasonality_score
    );
    Ok(())
}

/// Handle option [5]: segment list, segment drill-in and customer profiles.
fn handle_segments(session: &mut Session) -> anyhow::Result<()> {
    println!("\nFilter segments by visits/month (min,max), blank for any:");
    let visit_frequency = read_range();
    println!("Filter by average spending (min,max), blank for any:");
    let spending_range = read_range();
    let criteria = FilterCriteria {
        visit_frequency,
        spending_range,
    };

    let ticket = session.tracker.issue();
    let segments = session.service.segments(&criteria);
    let Some(segments) = session.tracker.accept(ticket, segments) else {
        return Ok(());
    };
    output::preview_table("Customer Segments", None, &segments, segments.len());
    if segments.is_empty() {
        return Ok(());
    }

    let choice = read_line("Segment ID (blank to return): ");
    if choice.is_empty() {
        return Ok(());
    }
    let ticket = session.tracker.issue();
    let details = session.service.segment_details(&choice)?;
    let metrics = session.service.segment_metrics(&choice, &mut session.rng)?;
    let Some((details, metrics)) = session.tracker.accept(ticket, (details, metrics)) else {
        return Ok(());
    };
    println!("\n{} - {}", details.segment.name, details.segment.description);
    println!(
        "  Customers {}  LTV {}  Churn {}%  Growth {}%",
        util::format_int(metrics.total_customers),
        util::format_int(metrics.avg_ltv),
        metrics.churn_rate,
        metrics.growth_rate
    );
    output::preview_table(
        "Age Groups",
        None,
        &details.demographic_breakdown.age_groups,
        usize::MAX,
    );
    output::preview_table("Visit Trend", None, &metrics.visit_trend, usize::MAX);

    let page = util::parse_usize_safe(Some(read_line("Customer list page (blank = 1): ").as_str()));
    let profiles = session.service.customer_profiles(
        &choice,
        page,
        None,
        Local::now().date_naive(),
        &mut session.rng,
    )?;
    output::preview_table(
        &format!(
            "Customers (page {}/{}, {} total)",
            profiles.page, profiles.total_pages, profiles.total_count
        ),
        None,
        &profiles.items,
        profiles.items.len(),
    );

    let customer = read_line("Customer ID to open (blank to return): ");
    if customer.is_empty() {
        return Ok(());
    }
    show_customer(session, &customer);
    Ok(())
}

fn read_range() -> Option<(f64, f64)> {
    let line = read_line("> ");
    let (min, max) = line.split_once(',')?;
    match (
        util::parse_f64_safe(Some(min)),
        util::parse_f64_safe(Some(max)),
    ) {
        (Some(min), Some(max)) if min <= max => Some((min, max)),
        _ => {
            println!("Ignoring invalid range.");
            None
        }
    }
}

fn show_customer(session: &Session, customer_id: &str) {
    let user_id = std::env::var("USER").unwrap_or_else(|_| "console".into());
    session.service.log_access(
        customer_id,
        &AccessInfo {
            user_id,
            reason: "customer analysis".into(),
            timestamp: Local::now().naive_local(),
        },
    );
    let detail = session.service.customer_detail(customer_id);
    println!("\n{} ({})  {}", detail.nickname, detail.id, detail.loyalty_tier);
    println!(
        "  LTV {}  Churn risk {}%  Visits {}  Dwell {}  Spend {}",
        detail.ltv_score,
        detail.churn_risk,
        detail.visit_average,
        detail.dwell_average,
        detail.average_spend
    );
    println!(
        "  First visit {}  Last visit {}",
        detail.first_visit_date, detail.last_visit_date
    );
    output::preview_table("Preferred Areas", None, &detail.preferred_areas, usize::MAX);

    println!("Recommendations:");
    for r in session.service.recommendations(&detail.id) {
        println!("  [{:?}] {} ({}%) - {}", r.kind, r.name, r.confidence, r.reason);
    }
    let p = session.service.predictions(&detail.id);
    println!(
        "\nNext visit {} ({}%), next purchase {} ({}%), {}",
        p.next_visit_date,
        p.next_visit_confidence,
        p.next_purchase_category,
        p.next_purchase_confidence,
        p.predicted_amount
    );
    println!("Churn risk {}: {}\n", p.churn_risk, p.churn_factors.join(", "));
}

fn main() -> anyhow::Result<()> {
    let (config, source) = load_config().context("loading configuration")?;
    init_tracing(&config)?;
    tracing::info!("Loading config from: {}", source);
    tracing::info!(?config, "starting footfall console");

    let mut session = Session::new(config);
    loop {
        println!("Foot-Traffic Dashboard:");
        println!("[1] Show filters      [2] Edit filters      [3] Browse areas");
        println!("[4] Generate reports  [5] Segments & customers  [0] Exit\n");
        match read_choice().as_str() {
            "1" => handle_show_filters(&session),
            "2" => handle_edit_filters(&mut session),
            "3" => handle_browse_areas(&mut session),
            "4" => {
                println!();
                if let Err(e) = handle_generate_reports(&mut session) {
                    eprintln!("Report error: {:#}\n", e);
                }
                if !prompt_back_to_menu() {
                    println!("Exiting the program.");
                    break;
                }
            }
            "5" => {
                if let Err(e) = handle_segments(&mut session) {
                    eprintln!("Error: {:#}\n", e);
                }
            }
            "0" => {
                println!("Exiting the program.");
                break;
            }
            _ => println!("Invalid choice. Please enter 0-5.\n"),
        }
    }
    Ok(())
}
