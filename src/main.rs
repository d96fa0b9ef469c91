// Entry point and high-level CLI flow.
//
// - Option [1] loads and normalizes the project file, printing diagnostics.
// - Option [2] builds the portfolio report, writes it to disk and previews
//   the main tables.
// - After generating reports, the user can choose to go back to the
//   selection menu or exit.
use once_cell::sync::Lazy;
use portfolio_insights::config::Config;
use portfolio_insights::loader::repository_for_path;
use portfolio_insights::types::ProjectRecord;
use portfolio_insights::{build_portfolio_report, output, reports, util, SeriesOptions};
use std::io::{self, Write};
use std::sync::Mutex;
use tracing::{error, info};

// Records are loaded once and can be reported on repeatedly in a single run.
static APP_STATE: Lazy<Mutex<AppState>> = Lazy::new(|| Mutex::new(AppState { data: None }));

struct AppState {
    data: Option<Vec<ProjectRecord>>,
}

const REPORT_FILE: &str = "portfolio_report.json";
const TRENDS_FILE: &str = "portfolio_trends.csv";

/// Read a single line of input after printing the common "Enter choice:" prompt.
///
/// Returns `None` once stdin is closed.
fn read_choice() -> Option<String> {
    print!("Enter choice: ");
    let _ = io::stdout().flush();
    let mut buf = String::new();
    match io::stdin().read_line(&mut buf) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(buf.trim().to_string()),
    }
}

/// Returns `true` if the user chose `Y`, `false` if they chose `N`.
fn prompt_back_to_menu() -> bool {
    loop {
        print!("Back to Report Selection (Y/N): ");
        let _ = io::stdout().flush();
        let mut buf = String::new();
        if io::stdin().read_line(&mut buf).unwrap_or(0) == 0 {
            return false;
        }
        match buf.trim().to_uppercase().as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

/// Handle option [1]: load records through the configured repository.
fn handle_load(config: &Config) {
    let result = repository_for_path(&config.data_path).and_then(|repo| repo.load());
    match result {
        Ok((data, load_report)) => {
            println!(
                "Loaded {} projects from {}.",
                util::format_int(load_report.total_rows),
                config.data_path.display()
            );
            if load_report.malformed_rows > 0 {
                println!(
                    "Note: {} malformed rows were loaded with default values.",
                    util::format_int(load_report.malformed_rows)
                );
            }
            if load_report.defaulted_scores > 0 {
                println!(
                    "Note: {} projects had no valid readiness score and count as 0.",
                    util::format_int(load_report.defaulted_scores)
                );
            }
            if load_report.status_fallbacks > 0 || load_report.type_fallbacks > 0 {
                println!(
                    "Info: {} unrecognized statuses treated as Planning, {} unrecognized types treated as Other.",
                    util::format_int(load_report.status_fallbacks),
                    util::format_int(load_report.type_fallbacks)
                );
            }
            println!();
            info!(projects = data.len(), "projects loaded");
            let mut state = APP_STATE.lock().unwrap_or_else(|e| e.into_inner());
            state.data = Some(data);
        }
        Err(e) => {
            error!("failed to load projects: {e}");
            eprintln!("Failed to load file: {}\n", e);
        }
    }
}

/// Handle option [2]: build the report, write it out, and preview it.
fn handle_generate_reports(config: &Config) {
    let data = {
        let state = APP_STATE.lock().unwrap_or_else(|e| e.into_inner());
        state.data.clone()
    };
    let Some(data) = data else {
        println!("Error: No projects loaded. Please load the project file first (option 1).\n");
        return;
    };

    let opts = SeriesOptions {
        historical_periods: config.historical_periods,
        forecast_periods: config.forecast_periods,
        as_of: chrono::Local::now().date_naive(),
    };
    let report = build_portfolio_report(&data, &opts);

    let report_path = config.output_dir.join(REPORT_FILE);
    if let Err(e) = output::write_json(&report_path, &report) {
        error!(path = %report_path.display(), "write failed: {e}");
        eprintln!("Write error: {}", e);
    }
    let series = reports::series_rows(&report.dashboard.series);
    let trends_path = config.output_dir.join(TRENDS_FILE);
    if let Err(e) = output::write_csv(&trends_path, &series) {
        error!(path = %trends_path.display(), "write failed: {e}");
        eprintln!("Write error: {}", e);
    }

    let m = &report.dashboard.metrics;
    println!("Portfolio Summary\n");
    println!("{}\n", report.insights.summary);
    println!(
        "Projects: {} | Active: {} | Completed: {} | Overall readiness: {}%\n",
        util::format_int(m.total_projects),
        util::format_int(m.active_projects),
        util::format_int(m.completed_projects),
        util::format_number(m.overall_readiness, 1)
    );

    let rows = config.preview_rows;
    output::preview_table(
        "Department Breakdown",
        Some("By project count"),
        &reports::department_rows(&report.insights),
        rows,
    );
    output::preview_table(
        "Readiness Trend",
        Some("Monthly, forecast periods marked"),
        &series,
        series.len(),
    );
    output::preview_table(
        "Recommendations",
        None,
        &reports::recommendation_rows(&report.insights),
        rows,
    );
    output::preview_table("Risk Factors", None, &reports::risk_rows(&report.insights), rows);

    println!(
        "(Full report exported to {} and {})\n",
        report_path.display(),
        trends_path.display()
    );
}

fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("invalid configuration: {e}");
            eprintln!("Configuration error: {}", e);
            std::process::exit(2);
        }
    };

    loop {
        println!("Portfolio Insights");
        println!("[1] Load projects");
        println!("[2] Generate insights\n");
        let Some(choice) = read_choice() else {
            break;
        };
        match choice.as_str() {
            "1" => {
                handle_load(&config);
            }
            "2" => {
                println!();
                handle_generate_reports(&config);
                if !prompt_back_to_menu() {
                    println!("Exiting the program.");
                    break;
                }
            }
            _ => {
                println!("Invalid choice. Please enter 1 or 2.\n");
            }
        }
    }
}
