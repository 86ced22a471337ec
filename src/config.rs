//! Configuration file

use std::{fs, path::Path};

use rust_decimal::Decimal;
use rusty_money::iso::{self, Currency};
use serde::Deserialize;
use thiserror::Error;

use crate::pricing::{DEFAULT_VAT_RATE, DEFAULT_VAT_SCALE, PricingPolicy};

/// Largest scale a `Decimal` can represent.
const MAX_VAT_SCALE: u32 = 28;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error reading the configuration file
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// VAT rate outside of `[0, 1]`
    #[error("Invalid VAT rate {0}; expected a fraction between 0 and 1")]
    InvalidVatRate(Decimal),

    /// VAT rounding scale too large
    #[error("Invalid VAT scale {0}; expected at most 28")]
    InvalidVatScale(u32),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),
}

/// Tally configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TallyConfig {
    /// VAT rate assumed for orders without a stored tax, as a fraction (e.g. `0.05`)
    pub vat_rate: Decimal,

    /// Decimal places derived VAT is rounded to
    pub vat_scale: u32,

    /// ISO 4217 currency code amounts are displayed in
    pub currency: String,
}

impl Default for TallyConfig {
    fn default() -> Self {
        Self {
            vat_rate: DEFAULT_VAT_RATE,
            vat_scale: DEFAULT_VAT_SCALE,
            currency: "AED".to_string(),
        }
    }
}

impl TallyConfig {
    /// Load configuration from a YAML file.
    ///
    /// Missing keys take their default values.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file cannot be read or parsed, or if
    /// it holds invalid values.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;

        Self::from_yaml(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the YAML is malformed or holds invalid values.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_norway::from_str(yaml)?;

        config.validate()?;

        Ok(config)
    }

    /// Check rate bounds, scale and currency code.
    ///
    /// # Errors
    ///
    /// Returns the first invalid value found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.vat_rate < Decimal::ZERO || self.vat_rate > Decimal::ONE {
            return Err(ConfigError::InvalidVatRate(self.vat_rate));
        }

        if self.vat_scale > MAX_VAT_SCALE {
            return Err(ConfigError::InvalidVatScale(self.vat_scale));
        }

        self.currency()?;

        Ok(())
    }

    /// Pricing policy described by this configuration.
    pub fn policy(&self) -> PricingPolicy {
        PricingPolicy::new(self.vat_rate, self.vat_scale)
    }

    /// Display currency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownCurrency`] if the code is not an ISO 4217 currency.
    pub fn currency(&self) -> Result<&'static Currency, ConfigError> {
        let code = self.currency.trim().to_ascii_uppercase();

        iso::find(&code).ok_or_else(|| ConfigError::UnknownCurrency(self.currency.clone()))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn empty_yaml_uses_defaults() -> TestResult {
        let config = TallyConfig::from_yaml("{}")?;

        assert_eq!(config, TallyConfig::default());
        assert_eq!(config.currency()?, iso::AED);

        Ok(())
    }

    #[test]
    fn overrides_from_yaml() -> TestResult {
        let config = TallyConfig::from_yaml("vat_rate: 0.15\nvat_scale: 3\ncurrency: sar\n")?;

        assert_eq!(config.vat_rate, Decimal::new(15, 2));
        assert_eq!(config.policy().vat_scale(), 3);
        assert_eq!(config.currency()?, iso::SAR);

        Ok(())
    }

    #[test]
    fn rejects_out_of_range_rate() {
        let result = TallyConfig::from_yaml("vat_rate: 5\n");

        assert!(
            matches!(result, Err(ConfigError::InvalidVatRate(rate)) if rate == Decimal::from(5))
        );
    }

    #[test]
    fn rejects_large_scale() {
        let result = TallyConfig::from_yaml("vat_scale: 40\n");

        assert!(matches!(result, Err(ConfigError::InvalidVatScale(40))));
    }

    #[test]
    fn rejects_unknown_currency() {
        let result = TallyConfig::from_yaml("currency: ABC\n");

        assert!(matches!(result, Err(ConfigError::UnknownCurrency(code)) if code == "ABC"));
    }

    #[test]
    fn rejects_unknown_keys() {
        let result = TallyConfig::from_yaml("vat: 0.05\n");

        assert!(matches!(result, Err(ConfigError::Yaml(_))));
    }

    #[test]
    fn loads_from_file() -> TestResult {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "currency: USD")?;

        let config = TallyConfig::from_file(file.path())?;

        assert_eq!(config.currency()?, iso::USD);
        assert_eq!(config.vat_rate, DEFAULT_VAT_RATE);

        Ok(())
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = TallyConfig::from_file("/nonexistent/tally.yaml");

        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
