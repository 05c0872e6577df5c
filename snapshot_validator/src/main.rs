mod bootstrap;
mod config;
mod report;

use std::env;
use std::process;

use anyhow::Result;
use dotenvy::dotenv;
use env_logger::Env;
use getopts::Options;
use snapshot_core::sheets::SheetsSnapshotSource;
use snapshot_core::{ValidationReport, load_snapshot, validate_snapshot};

use crate::config::Config;
use crate::report::render_report;

const EXIT_FATAL: i32 = 1;
const EXIT_VALIDATION_FAILED: i32 = 2;

fn print_usage(program: &str, opts: Options) {
    let brief = format!("Usage: {} [OPTIONS] [SPREADSHEET_ID]", program);
    print!("{}", opts.usage(&brief));
    println!("\nExit status:");
    println!("  0  snapshot is valid (or --report-only)");
    println!("  1  run aborted: no node, no block chosen, no snapshot rows, lost connection");
    println!("  2  snapshot validation failed");
    println!("\nEnvironment variables:");
    println!("  LOCAL_NODE_URL          JSON-RPC node tried first (default http://localhost:8545)");
    println!("  REMOTE_NODE_URL         Fallback endpoint; prompted for when unset");
    println!("  TOKEN_ADDRESS           Token contract; read from TOKEN_ARTIFACT when unset");
    println!("  TOKEN_ARTIFACT          Truffle artifact (default build/contracts/TrueDeckToken.json)");
    println!("  GOOGLE_CREDENTIALS_PATH OAuth client file (default credentials.json)");
    println!("  GOOGLE_TOKEN_PATH       Stored OAuth token (default token.json)");
    println!("  BLOCK_RANGE             Cell holding the block number (default Sheet1!A3)");
    println!("  HOLDERS_RANGE           Holder rows (default Sheet1!A5:B1004)");
    println!("  EXPECTED_TOKEN_NAME     Default TrueDeck");
    println!("  EXPECTED_TOKEN_SYMBOL   Default TDP");
    println!("  EXPECTED_TOTAL_SUPPLY   Base units (default 2e+26)");
    println!("  MAX_CONCURRENT_QUERIES  Balance queries in flight (default 8)");
    println!("  RPC_TIMEOUT_SECS        Per-request node timeout (default 30)");
}

async fn run(config: &Config) -> Result<ValidationReport> {
    let rpc = bootstrap::connect_node(config).await?;
    let ledger = bootstrap::open_ledger(config, rpc).await?;

    println!("Reading snapshot spreadsheet...");
    let access_token = bootstrap::authorize_sheets(config).await?;
    let source = SheetsSnapshotSource::new(&config.spreadsheet_id, &access_token)
        .with_api_url(&config.sheets_api_url)
        .with_ranges(&config.block_range, &config.holders_range);

    let snapshot = load_snapshot(&source).await?;

    let report =
        validate_snapshot(&ledger, &snapshot, &config.expectations, &config.validation).await?;
    Ok(report)
}

#[tokio::main(flavor = "multi_thread", worker_threads = 4)]
async fn main() -> Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    let program = args[0].clone();

    let mut opts = Options::new();
    opts.optflag("j", "json", "Print the report as JSON");
    opts.optflag(
        "r",
        "report-only",
        "Exit with status 0 even when validation fails",
    );
    opts.optflag("h", "help", "Show this help message");

    let matches = match opts.parse(&args[1..]) {
        Ok(m) => m,
        Err(f) => {
            eprintln!("Error parsing arguments: {}", f);
            print_usage(&program, opts);
            process::exit(EXIT_FATAL);
        }
    };

    if matches.opt_present("h") {
        print_usage(&program, opts);
        return Ok(());
    }

    if matches.free.len() > 1 {
        eprintln!("Error: expected at most one spreadsheet id");
        print_usage(&program, opts);
        process::exit(EXIT_FATAL);
    }

    let config = match Config::from_env(matches.free.first().cloned()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            process::exit(EXIT_FATAL);
        }
    };

    let report = match run(&config).await {
        Ok(report) => report,
        Err(e) => {
            eprintln!("{:#}", e);
            process::exit(EXIT_FATAL);
        }
    };

    if matches.opt_present("j") {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", render_report(&report));
    }

    if !report.overall_passed && !matches.opt_present("r") {
        process::exit(EXIT_VALIDATION_FAILED);
    }

    Ok(())
}
