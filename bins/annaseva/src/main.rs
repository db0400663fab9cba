//! Anna Seva - food surplus and shortage map
//!
//! Runs the HTTP API and offers the same generation and proximity logic on
//! the command line.

use annaseva_core::config::Config;
use annaseva_core::error::exit_codes;
use annaseva_core::ErrorCode;
use annaseva_telemetry::TelemetryConfig;
use clap::{Parser, Subcommand, ValueEnum};
use owo_colors::OwoColorize;
use std::process::ExitCode;

mod commands;
mod output;

use commands::{distance, generate, nearby, serve, stats};

/// Food surplus and shortage map
#[derive(Parser)]
#[command(name = "annaseva")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Configuration file (else ANNASEVA_CONFIG, else ./annaseva.toml when present)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve {
        /// Interface to bind (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind (overrides config and PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Generate synthetic surplus and shortage sites
    Generate {
        /// Which kind of site to generate
        #[arg(value_enum, default_value_t = generate::KindArg::Both)]
        kind: generate::KindArg,

        /// Center latitude (falls back to the configured default)
        #[arg(long, allow_hyphen_values = true)]
        lat: Option<String>,

        /// Center longitude (falls back to the configured default)
        #[arg(long, allow_hyphen_values = true)]
        lng: Option<String>,

        /// Sites per kind (defaults to the configured counts)
        #[arg(short = 'n', long)]
        count: Option<usize>,

        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Great-circle distance between two points
    Distance {
        /// First point as "lat,lng"
        #[arg(allow_hyphen_values = true)]
        from: String,

        /// Second point as "lat,lng"
        #[arg(allow_hyphen_values = true)]
        to: String,
    },

    /// Merge every provider around a point and rank by distance
    Nearby {
        /// Center latitude (falls back to the configured default)
        #[arg(long, allow_hyphen_values = true)]
        lat: Option<String>,

        /// Center longitude (falls back to the configured default)
        #[arg(long, allow_hyphen_values = true)]
        lng: Option<String>,

        /// Search radius in kilometers
        #[arg(short, long)]
        radius: Option<f64>,

        /// Near-duplicate threshold in kilometers
        #[arg(short, long)]
        threshold: Option<f64>,

        /// Maximum number of results
        #[arg(short, long)]
        limit: Option<usize>,

        /// Search term for remote providers
        #[arg(short, long)]
        query: Option<String>,
    },

    /// Show dashboard figures
    Stats {
        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let format = cli.format;

    let result = run(cli).await;

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match (format, e.downcast_ref::<annaseva_core::Error>()) {
                (Format::Json, Some(err)) => match serde_json::to_string(&err.to_report()) {
                    Ok(report) => eprintln!("{report}"),
                    Err(_) => eprintln!("{} {}", "Error:".red().bold(), e),
                },
                _ => eprintln!("{} {}", "Error:".red().bold(), e),
            }
            ExitCode::from(exit_code_for(&e))
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load(cli.config.as_deref())?;

    let serving = matches!(cli.command, Commands::Serve { .. });
    if serving || cli.verbose {
        let mut telemetry = TelemetryConfig::from(&config.schema.logging);
        if cli.verbose {
            telemetry.log_level = "debug".to_string();
        }
        annaseva_telemetry::init_with_config(telemetry)?;
    }

    let schema = config.schema;
    let format = cli.format;

    match cli.command {
        Commands::Serve { host, port } => serve::run(schema, host, port).await,

        Commands::Generate {
            kind,
            lat,
            lng,
            count,
            seed,
        } => generate::run(&schema, kind, lat.as_deref(), lng.as_deref(), count, seed, format),

        Commands::Distance { from, to } => distance::run(&from, &to, format),

        Commands::Nearby {
            lat,
            lng,
            radius,
            threshold,
            limit,
            query,
        } => {
            let options = nearby::Options {
                lat,
                lng,
                radius,
                threshold,
                limit,
                query,
            };
            nearby::run(&schema, options, format).await
        }

        Commands::Stats { seed } => stats::run(seed, format),
    }
}

fn exit_code_for(err: &anyhow::Error) -> u8 {
    let code = match err.downcast_ref::<annaseva_core::Error>().map(|e| e.code) {
        Some(
            ErrorCode::ValidationError | ErrorCode::InvalidInput | ErrorCode::InvalidCoordinate,
        ) => exit_codes::VALIDATION_ERROR,
        Some(code) if code.category() == "Configuration" => exit_codes::CONFIG_ERROR,
        _ => exit_codes::FAILURE,
    };
    u8::try_from(code).unwrap_or(1)
}
