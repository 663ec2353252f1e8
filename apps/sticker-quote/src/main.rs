//! sticker-quote - price sticker orders from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Quote a request read from stdin
//! echo '{"variantId":"STICKER-DIECUT","quantity":500}' | sticker-quote quote
//!
//! # Quote a request file against a specific settings file
//! sticker-quote --config ./pricing.toml quote --request cart.json
//!
//! # Show the effective tier table of a variant
//! sticker-quote tiers --variant STICKER-DIECUT
//!
//! # Load and validate settings
//! sticker-quote check-config
//! ```
//!
//! Responses go to stdout as JSON, logs go to stderr.
//!
//! # Exit Codes
//!
//! - `0` - success
//! - `1` - the request was rejected (error JSON on stdout)
//! - `2` - settings could not be loaded

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use sticker_config::PricingSettings;
use sticker_core::ConfigProvider;
use sticker_quote::{ApiError, QuoteHandler};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sticker-quote")]
#[command(author, version, about = "Sticker pricing quotes")]
struct Cli {
    /// Settings file (defaults to the platform config directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Price a JSON request
    Quote {
        /// Request file, or `-` for stdin
        #[arg(short, long, default_value = "-")]
        request: String,
    },
    /// Print the effective tier table as JSON
    Tiers {
        /// Variant to resolve; omit for the default table
        #[arg(short, long)]
        variant: Option<String>,
    },
    /// Load and validate settings
    CheckConfig,
}

fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();

    let settings = match PricingSettings::load(cli.config) {
        Ok(settings) => settings,
        Err(e) => {
            error!("Failed to load settings: {e}");
            if matches!(cli.command, Commands::Quote { .. }) {
                print_json(&ApiError::from(e));
            }
            return ExitCode::from(2);
        }
    };

    match run(cli.command, &settings) {
        Ok(code) => code,
        Err(e) => {
            error!("Command failed: {e}");
            ExitCode::from(2)
        }
    }
}

fn run(command: Commands, settings: &PricingSettings) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let (store, handler) = QuoteHandler::from_settings(settings)?;

    match command {
        Commands::Quote { request } => {
            let body = read_request(&request)?;
            match handler.handle_json(&body) {
                Ok(response) => {
                    print_json(&response);
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => {
                    print_json(&e);
                    Ok(ExitCode::from(1))
                }
            }
        }
        Commands::Tiers { variant } => {
            let tiers = match variant {
                Some(id) => handler.engine().tiers_for_variant(&id),
                None => store
                    .default_tiers()
                    .ok_or_else(|| sticker_core::CoreError::UnknownVariant("default".into())),
            };
            match tiers {
                Ok(tiers) => {
                    print_json(&tiers);
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => {
                    print_json(&ApiError::from(e));
                    Ok(ExitCode::from(1))
                }
            }
        }
        Commands::CheckConfig => {
            info!(
                products = store.len(),
                moq = settings.pricing.minimum_order_quantity,
                scaling = %settings.scaling.model,
                listed_variants = settings.classifier.variant_ids.len(),
                "Settings OK"
            );
            println!("ok: {} products", store.len());
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn read_request(source: &str) -> std::io::Result<String> {
    if source == "-" {
        let mut body = String::new();
        std::io::stdin().read_to_string(&mut body)?;
        Ok(body)
    } else {
        std::fs::read_to_string(source)
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(e) => error!("Failed to serialize response: {e}"),
    }
}

/// Initializes the tracing subscriber on stderr.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=sticker_config=trace` - Narrow to one crate
/// - Default: `info,sticker=debug`
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sticker=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
