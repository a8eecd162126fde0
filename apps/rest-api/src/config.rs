//! API server configuration.
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults that suit a single-store deployment. The company block feeds
//! the seller section of every composed invoice.

use std::env;

use kirana_core::CompanyInfo;

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// HTTP listen port.
    pub port: u16,

    /// Path to the SQLite database file.
    pub database_path: String,

    /// Seller identity printed on invoices.
    pub company: CompanyInfo,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let config = ApiConfig {
            port: env::var("KIRANA_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("KIRANA_PORT".to_string()))?,

            database_path: env::var("KIRANA_DB_PATH")
                .unwrap_or_else(|_| "./data/kirana.db".to_string()),

            company: CompanyInfo {
                name: env::var("KIRANA_COMPANY_NAME")
                    .unwrap_or_else(|_| "Kings Mobile & Accessories".to_string()),
                address: env::var("KIRANA_COMPANY_ADDRESS")
                    .unwrap_or_else(|_| "Shop No. 12, Main Market Road".to_string()),
                gstin: env::var("KIRANA_COMPANY_GSTIN")
                    .unwrap_or_else(|_| "27AAAAA0000A1Z5".to_string()),
                phone: env::var("KIRANA_COMPANY_PHONE")
                    .unwrap_or_else(|_| "+91 98765 43210".to_string()),
                email: env::var("KIRANA_COMPANY_EMAIL")
                    .unwrap_or_else(|_| "kingsmobile@example.com".to_string()),
                state_code: env::var("KIRANA_COMPANY_STATE_CODE")
                    .unwrap_or_else(|_| "27".to_string()),
                state_name: env::var("KIRANA_COMPANY_STATE_NAME")
                    .unwrap_or_else(|_| "Maharashtra".to_string()),
            },
        };

        Ok(config)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_load_without_env() {
        let config = ApiConfig::load().unwrap();
        assert!(config.port > 0);
        assert!(!config.company.gstin.is_empty());
    }
}
