//! Order document loading
//!
//! Exports come straight from the admin API, so a file may hold a single
//! order, a list of orders, or the list endpoint's `{ "orders": [...] }`
//! envelope.

use std::{fs, path::Path};

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::orders::Order;

/// Order loading errors
#[derive(Debug, Error)]
pub enum LoadError {
    /// IO error reading the export file
    #[error("Failed to read order file: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// The document holds neither an order nor a list of orders
    #[error("Unsupported document shape: expected an order, a list of orders or an `orders` list")]
    UnsupportedShape,
}

/// Document encoding, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// JSON
    Json,

    /// YAML
    Yaml,
}

impl DocumentFormat {
    /// `.yaml` and `.yml` are YAML, everything else is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Self::Yaml
            }
            _ => Self::Json,
        }
    }
}

/// Load every order from an export file.
///
/// # Errors
///
/// Returns a [`LoadError`] if the file cannot be read or parsed, or if it does
/// not contain orders.
pub fn load_orders(path: impl AsRef<Path>) -> Result<Vec<Order>, LoadError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let orders = parse_orders(&contents, DocumentFormat::from_path(path))?;

    debug!(path = %path.display(), orders = orders.len(), "loaded order document");

    Ok(orders)
}

/// Parse orders from a document string.
///
/// # Errors
///
/// Returns a [`LoadError`] if the document cannot be parsed or does not
/// contain orders.
pub fn parse_orders(contents: &str, format: DocumentFormat) -> Result<Vec<Order>, LoadError> {
    let document: Value = match format {
        DocumentFormat::Json => serde_json::from_str(contents)?,
        DocumentFormat::Yaml => serde_norway::from_str(contents)?,
    };

    orders_from_value(document)
}

fn orders_from_value(document: Value) -> Result<Vec<Order>, LoadError> {
    match document {
        Value::Array(orders) => orders
            .into_iter()
            .map(|order| Order::deserialize(order).map_err(LoadError::from))
            .collect(),
        Value::Object(mut map) => match map.remove("orders") {
            Some(Value::Array(orders)) => orders_from_value(Value::Array(orders)),
            Some(_) => Err(LoadError::UnsupportedShape),
            None => Ok(vec![Order::deserialize(Value::Object(map))?]),
        },
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {
            Err(LoadError::UnsupportedShape)
        }
    }
}
