// vindecoder command line
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;

use vindecoder_lib::commands::{self, AppState};
use vindecoder_lib::config::Config;
use vindecoder_lib::error::CommandError;

#[derive(Parser)]
#[command(name = "vindecoder")]
#[command(about = "Decode, generate and validate Vehicle Identification Numbers")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// SQLite database file [env: VINDECODER_DB]
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Directory holding the wmi_*.json source files [env: VINDECODER_DATA_DIR]
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Countries dataset URL [env: VINDECODER_COUNTRIES_URL]
    #[arg(long, global = true)]
    countries_url: Option<String>,

    /// Countries dataset cache file [env: VINDECODER_COUNTRIES_CACHE]
    #[arg(long, global = true)]
    countries_cache: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Load the sources, build the tables and store them
    Seed,
    /// Audit the stored country tier for overlaps and gaps
    Validate,
    /// Decode one or more VINs
    Decode {
        #[arg(required = true)]
        vins: Vec<String>,
    },
    /// Generate random VINs with valid check digits
    Generate {
        #[arg(long, short = 'n', default_value = "1")]
        count: usize,
    },
    /// Show stored row counts
    Stats,
}

impl Cli {
    fn config(&self) -> Config {
        let mut config = Config::from_env();
        if let Some(db) = &self.db {
            config.db_path = db.clone();
        }
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        if let Some(url) = &self.countries_url {
            config.countries_url = url.clone();
        }
        if let Some(cache) = &self.countries_cache {
            config.countries_cache = Some(cache.clone());
        }
        config
    }
}

/// One entry of `decode` output
#[derive(Serialize)]
#[serde(untagged)]
enum DecodeResult {
    Decoded(vindecoder_lib::vin::DecodedVin),
    Failed { vin: String, error: String },
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Failed to serialize output: {}", e),
    }
}

async fn run(cli: Cli) -> Result<ExitCode, CommandError> {
    let state = AppState::open(cli.config()).await?;

    match cli.command {
        Command::Seed => {
            let report = commands::seed_database(&state).await?;
            print_json(&report);
        }
        Command::Validate => {
            let report = commands::validate_tables(&state);
            print_json(&report);
            if !report.is_clean() {
                return Ok(ExitCode::from(2));
            }
        }
        Command::Decode { vins } => {
            let results: Vec<DecodeResult> = vins
                .into_iter()
                .map(|vin| match commands::decode_vin(&state, &vin) {
                    Ok(decoded) => DecodeResult::Decoded(decoded),
                    Err(e) => DecodeResult::Failed { vin, error: e.to_string() },
                })
                .collect();
            let failed = results.iter().any(|r| matches!(r, DecodeResult::Failed { .. }));
            print_json(&results);
            if failed {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Generate { count } => {
            let vins = commands::generate_vins(&state, count)?;
            print_json(&vins);
        }
        Command::Stats => {
            let stats = commands::get_db_stats(&state).await?;
            print_json(&serde_json::json!({
                "database": stats,
                "tables": commands::table_summary(&state),
            }));
        }
    }

    Ok(ExitCode::SUCCESS)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging - default to info level for our crate
    let default_filter = if cli.verbose {
        "vindecoder=debug,vindecoder_lib=debug"
    } else {
        "vindecoder=info,vindecoder_lib=info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
