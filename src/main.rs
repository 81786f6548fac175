//! PhoneBill command line
//!
//! Generates the telephone invoice of one subscriber for a billing period
//! from a CSV file of calls, printing the invoice JSON to stdout.

use anyhow::{Context, Result};
use clap::Parser;
use phonebill_core::config::{AppConfig, LogFormat, LoggingConfig};
use phonebill_core::models::BillingPeriod;
use phonebill_core::traits::SubscriberFinder;
use phonebill_core::InvoiceError;
use phonebill_directory::{HttpSubscriberDirectory, InMemoryDirectory};
use phonebill_services::{parse_calls, InvoiceService};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "phonebill")]
#[command(about = "Generate a telephone invoice from a CSV of calls", long_about = None)]
#[command(version)]
struct Cli {
    /// Subscriber phone number (e.g. +5491167950940)
    telephone: String,

    /// Billing period start, AAAA-MM-DD
    billing_start: String,

    /// Billing period end, AAAA-MM-DD
    billing_end: String,

    /// Calls CSV file
    calls_csv_file: String,

    /// Configuration file (defaults to config/default and PHONEBILL__ env vars)
    #[arg(short, long)]
    config: Option<String>,
}

/// Initialize tracing/logging on stderr so stdout stays pipeable
fn init_tracing(config: &LoggingConfig) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Pretty => registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init(),
    }
}

async fn run<F: SubscriberFinder>(cli: &Cli, config: &AppConfig, finder: Arc<F>) -> Result<String> {
    let billing_period = BillingPeriod::from_dates(&cli.billing_start, &cli.billing_end)
        .context("invalid billing period format")?;

    let content = std::fs::read_to_string(&cli.calls_csv_file)
        .with_context(|| format!("reading calls: invalid csv path {}", cli.calls_csv_file))?;
    let calls = parse_calls(&content, config.billing.invalid_records).context("reading calls")?;

    let service = InvoiceService::new(finder, config.billing.clone());
    let invoice = service
        .generate(&cli.telephone, billing_period, &calls)
        .await
        .context("generating invoice")?;

    serde_json::to_string(&invoice).context("invoice json marshal")
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::from_file(path),
        None => AppConfig::load(),
    }
    .context("loading configuration")?;

    init_tracing(&config.logging);

    let result = match &config.directory.fixtures_path {
        Some(path) => {
            let directory = InMemoryDirectory::from_file(path)
                .with_context(|| format!("loading subscribers from {}", path))?;
            run(&cli, &config, Arc::new(directory)).await
        }
        None => {
            let directory = HttpSubscriberDirectory::from_config(&config.directory)?;
            run(&cli, &config, Arc::new(directory)).await
        }
    };

    match result {
        Ok(invoice) => {
            info!("Generated invoice successfully");
            println!("{}", invoice);
            Ok(())
        }
        Err(e) => {
            let cause = invoice_error(&e);
            let code = cause.map(|err| err.error_code()).unwrap_or("internal_error");
            error!(code, "{:#}", e);
            std::process::exit(exit_code(cause));
        }
    }
}

fn invoice_error(err: &anyhow::Error) -> Option<&InvoiceError> {
    err.chain().find_map(|cause| cause.downcast_ref::<InvoiceError>())
}

/// 2 for bad input, 1 for everything else
fn exit_code(cause: Option<&InvoiceError>) -> i32 {
    match cause {
        Some(err) if err.is_input_error() => 2,
        _ => 1,
    }
}
