//! Application configuration management.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::types::Currency;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Financial clearance configuration.
    #[serde(default)]
    pub finance: FinanceConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Financial clearance configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FinanceConfig {
    /// Clearance percentage separating probation from defaulter.
    #[serde(default = "default_probation_pct")]
    pub probation_pct: Decimal,
    /// Currency amounts are displayed in.
    #[serde(default = "default_currency")]
    pub currency: Currency,
}

impl Default for FinanceConfig {
    fn default() -> Self {
        Self {
            probation_pct: default_probation_pct(),
            currency: default_currency(),
        }
    }
}

fn default_probation_pct() -> Decimal {
    Decimal::from(80)
}

fn default_currency() -> Currency {
    Currency::Ugx
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("SCHOLA").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_defaults() {
        let server = ServerConfig::default();
        assert_eq!(server.host, "0.0.0.0");
        assert_eq!(server.port, 8080);
    }

    #[test]
    fn test_finance_defaults() {
        let finance = FinanceConfig::default();
        assert_eq!(finance.probation_pct, Decimal::from(80));
        assert_eq!(finance.currency, Currency::Ugx);
    }
}
