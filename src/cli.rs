//! Command line interface

use std::{io, path::PathBuf};

use clap::{Parser, ValueEnum};
use rust_decimal::Decimal;
use serde::Serialize;
use tally::{
    config::{ConfigError, TallyConfig},
    invoice::{InvoiceBreakdown, OrderSavings},
    loader::{LoadError, load_orders},
    orders::Order,
    pricing::PricingPolicy,
    receipt::{InvoiceReceipt, ReceiptError},
};
use thiserror::Error;
use tracing::info;

use crate::observability::LoggingConfig;

/// Errors surfaced by the command line tool.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Order file error
    #[error("{}: {source}", path.display())]
    Load {
        /// File being loaded
        path: PathBuf,

        /// Underlying error
        source: LoadError,
    },

    /// Receipt rendering error
    #[error(transparent)]
    Receipt(#[from] ReceiptError),

    /// JSON output error
    #[error("Failed to write JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Printable receipts.
    Table,

    /// One JSON breakdown per line.
    Json,
}

/// Tally: reconcile order exports into invoice breakdowns
#[derive(Debug, Parser)]
#[command(name = "tally", about = "Reconcile order exports into invoice breakdowns", long_about = None)]
pub struct Cli {
    /// Order export files (JSON, or YAML with a `.yaml`/`.yml` extension)
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// YAML configuration file
    #[arg(short, long, env = "TALLY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Display currency code, overrides the configuration file
    #[arg(long)]
    pub currency: Option<String>,

    /// VAT rate as a fraction (e.g. 0.05), overrides the configuration file
    #[arg(long)]
    pub vat_rate: Option<Decimal>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,
}

impl Cli {
    /// Build the effective configuration: file (or defaults), then flag overrides.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file cannot be loaded or the result is invalid.
    pub fn resolve_config(&self) -> Result<TallyConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => TallyConfig::from_file(path)?,
            None => TallyConfig::default(),
        };

        if let Some(currency) = &self.currency {
            config.currency.clone_from(currency);
        }

        if let Some(vat_rate) = self.vat_rate {
            config.vat_rate = vat_rate;
        }

        config.validate()?;

        Ok(config)
    }
}

/// JSON line written per order.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OrderReport<'a> {
    id: Option<&'a str>,
    breakdown: InvoiceBreakdown,
    savings: OrderSavings,
}

impl<'a> OrderReport<'a> {
    fn new(order: &'a Order, policy: &PricingPolicy) -> Self {
        Self {
            id: order.id.as_deref(),
            breakdown: InvoiceBreakdown::from_order(order, policy),
            savings: OrderSavings::from_items(&order.order_items),
        }
    }
}

/// Reconcile every order in every file and write the results.
///
/// # Errors
///
/// Returns a [`CliError`] on the first file, render or write failure.
pub fn run(cli: &Cli, mut out: impl io::Write) -> Result<(), CliError> {
    let config = cli.resolve_config()?;
    let policy = config.policy();
    let currency = config.currency()?;

    for path in &cli.files {
        let orders = load_orders(path).map_err(|source| CliError::Load {
            path: path.clone(),
            source,
        })?;

        info!(path = %path.display(), orders = orders.len(), "reconciling orders");

        for order in &orders {
            match cli.format {
                OutputFormat::Table => {
                    InvoiceReceipt::new(order, &policy, currency).write_to(&mut out)?;
                }
                OutputFormat::Json => {
                    let line = serde_json::to_string(&OrderReport::new(order, &policy))?;
                    writeln!(out, "{line}")?;
                }
            }
        }
    }

    out.flush()?;

    Ok(())
}
