//! Application configuration module.
//!
//! Configuration is loaded from environment variables once at startup
//! and passed into components explicitly. Business logic never reads the
//! environment ad hoc; the recognized fields are enumerated here.

use serde::{Deserialize, Serialize};
use std::env;

use crate::numbering::DocumentKind;
use crate::types::ShareToken;

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Bearer credential the staff API surface checks requests against.
    /// Held here so the gate receives it from configuration, not from a
    /// lookup buried in a handler.
    pub staff_token: String,

    /// Public base URL share links are built under, without a trailing
    /// slash (e.g. `https://booking.autow-services.co.uk`).
    pub public_base_url: String,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let config = AppConfig {
            staff_token: env::var("AUTOW_STAFF_TOKEN")
                .map_err(|_| ConfigError::MissingRequired("AUTOW_STAFF_TOKEN".to_string()))?,

            public_base_url: env::var("AUTOW_PUBLIC_BASE_URL")
                .unwrap_or_else(|_| "https://booking.autow-services.co.uk".to_string()),
        };

        if config.public_base_url.ends_with('/') {
            return Err(ConfigError::InvalidValue("AUTOW_PUBLIC_BASE_URL".to_string()));
        }

        Ok(config)
    }

    /// Explicit construction for tests and embedding.
    pub fn new(staff_token: impl Into<String>, public_base_url: impl Into<String>) -> Self {
        AppConfig {
            staff_token: staff_token.into(),
            public_base_url: public_base_url.into(),
        }
    }

    /// Builds the public share URL for a document's token.
    ///
    /// ## Example
    /// ```rust
    /// use autow_core::config::AppConfig;
    /// use autow_core::numbering::DocumentKind;
    /// use autow_core::types::ShareToken;
    ///
    /// let config = AppConfig::new("secret", "https://booking.example.co.uk");
    /// let token = ShareToken::parse("550e8400-e29b-41d4-a716-446655440000").unwrap();
    /// assert_eq!(
    ///     config.share_url(DocumentKind::Invoice, &token),
    ///     "https://booking.example.co.uk/share/invoice/550e8400-e29b-41d4-a716-446655440000"
    /// );
    /// ```
    pub fn share_url(&self, kind: DocumentKind, token: &ShareToken) -> String {
        format!(
            "{}/share/{}/{}",
            self.public_base_url,
            kind.share_segment(),
            token
        )
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_share_url_per_kind() {
        let config = AppConfig::new("secret", "https://booking.example.co.uk");
        let token = ShareToken::from_uuid(Uuid::nil());

        assert_eq!(
            config.share_url(DocumentKind::VehicleReport, &token),
            format!("https://booking.example.co.uk/share/vehicle-report/{token}")
        );
        assert_eq!(
            config.share_url(DocumentKind::Disclaimer, &token),
            format!("https://booking.example.co.uk/share/disclaimer/{token}")
        );
    }
}
