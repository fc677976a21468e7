mod logging;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;

use logging::LogDestination;
use orders_engine::{
    default_login_url, run_blocking, FetchSettings, OutputManifest, PipelineConfig, SinkTargets,
};

const DEFAULT_BASE_URL: &str = "https://www.ybsnow.com/";

/// Log in and scrape the orders table to CSV, XLSX, JSON and SQLite.
#[derive(Parser, Debug)]
#[command(name = "orders_scrape", version)]
struct Args {
    /// Base site URL, fetched once to establish session cookies.
    #[arg(long, env = "ORDERS_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Login URL; defaults to the base URL joined with "index.php".
    #[arg(long, env = "ORDERS_LOGIN_URL")]
    login_url: Option<String>,

    /// Authenticated orders page URL.
    #[arg(long, env = "ORDERS_URL")]
    orders_url: String,

    /// Login email.
    #[arg(long, env = "ORDERS_EMAIL")]
    email: String,

    /// Login password.
    #[arg(long, env = "ORDERS_PASSWORD", hide_env_values = true)]
    password: String,

    /// Path for the CSV output.
    #[arg(long, default_value = "orders.csv")]
    out_csv: PathBuf,

    /// Path for the XLSX output.
    #[arg(long, default_value = "orders.xlsx")]
    out_xlsx: PathBuf,

    /// Path for the JSON output.
    #[arg(long, default_value = "orders.json")]
    out_json: PathBuf,

    /// Path for the SQLite database file.
    #[arg(long, default_value = "orders.db")]
    db_file: PathBuf,

    /// HTTP request timeout in seconds.
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Where log output goes.
    #[arg(long, value_enum, default_value_t = LogDestination::Terminal)]
    log: LogDestination,

    /// Enable debug-level logging.
    #[arg(long)]
    verbose: bool,
}

fn main() -> ExitCode {
    // Populate the process environment from a local .env, if any, before
    // clap reads env-backed flags.
    let _ = dotenvy::dotenv();
    let args = Args::parse();
    logging::initialize(args.log, args.verbose);

    let config = match build_config(args) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err:#}");
            return ExitCode::from(1);
        }
    };

    match run_blocking(&config) {
        Ok(manifest) => {
            print_manifest(&manifest);
            if manifest.all_sinks_succeeded() {
                ExitCode::SUCCESS
            } else {
                // Partial success: some sinks wrote, some failed.
                ExitCode::from(2)
            }
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(1)
        }
    }
}

fn build_config(args: Args) -> anyhow::Result<PipelineConfig> {
    let login_url = match args.login_url {
        Some(url) => url,
        None => default_login_url(&args.base_url).context("could not derive the login url")?,
    };

    Ok(PipelineConfig {
        base_url: args.base_url,
        login_url,
        orders_url: args.orders_url,
        email: args.email,
        password: args.password,
        targets: SinkTargets {
            csv_path: args.out_csv,
            xlsx_path: args.out_xlsx,
            json_path: args.out_json,
            db_path: args.db_file,
        },
        fetch: FetchSettings {
            request_timeout: Duration::from_secs(args.timeout),
            ..FetchSettings::default()
        },
    })
}

fn print_manifest(manifest: &OutputManifest) {
    println!(
        "Fetched {} rows x {} columns at {}",
        manifest.row_count, manifest.column_count, manifest.fetched_utc
    );
    for report in &manifest.sinks {
        match &report.outcome {
            Ok(location) => println!("  {:<6} {}", report.sink.to_string(), location),
            Err(err) => eprintln!("  {:<6} FAILED: {}", report.sink.to_string(), err),
        }
    }
    println!();
    println!(
        "Preview (first {} of {} rows):",
        manifest.preview.rows.len(),
        manifest.preview.total_rows
    );
    print!("{}", manifest.preview.render());
}
