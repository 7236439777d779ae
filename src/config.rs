//! Configuration types for cep-race

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, time::Duration};

/// Placeholder replaced by the (percent-encoded) postal code in source URL templates
pub const POSTAL_CODE_PLACEHOLDER: &str = "{postal_code}";

/// Top-level race configuration
///
/// Everything a race needs is carried here and handed to the
/// [`Racer`](crate::Racer); nothing is read from globals.
///
/// # Example
///
/// ```
/// use cep_race::config::{Config, SourceConfig};
/// use std::time::Duration;
///
/// let config = Config {
///     postal_code: "20040002".to_string(),
///     timeout: Duration::from_millis(500),
///     sources: vec![SourceConfig::via_cep()],
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Postal code raced by [`Racer::race`](crate::Racer::race) (default: "01153000")
    #[serde(default = "default_postal_code")]
    pub postal_code: String,

    /// Race-wide deadline, serialized as milliseconds (default: 1 second)
    #[serde(default = "default_timeout", with = "duration_millis_serde")]
    pub timeout: Duration,

    /// Sources raced against each other, one fetcher per entry
    /// (default: BrasilAPI and ViaCEP)
    #[serde(default = "default_sources")]
    pub sources: Vec<SourceConfig>,

    /// User-Agent header sent with every lookup
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            postal_code: default_postal_code(),
            timeout: default_timeout(),
            sources: default_sources(),
            user_agent: default_user_agent(),
        }
    }
}

impl Config {
    /// Check the configuration for values that would make a race meaningless
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] naming the offending key when:
    /// - no sources are configured
    /// - the timeout is zero
    /// - a source name is empty or used twice
    /// - a URL template lacks the `{postal_code}` placeholder
    pub fn validate(&self) -> Result<()> {
        if self.sources.is_empty() {
            return Err(Error::config("at least one source is required", "sources"));
        }

        if self.timeout.is_zero() {
            return Err(Error::config("timeout must be greater than zero", "timeout"));
        }

        let mut seen = HashSet::with_capacity(self.sources.len());
        for source in &self.sources {
            if source.name.trim().is_empty() {
                return Err(Error::config("source name must not be empty", "sources.name"));
            }
            if !seen.insert(source.name.as_str()) {
                return Err(Error::config(
                    format!("duplicate source name '{}'", source.name),
                    "sources.name",
                ));
            }
            if !source.url_template.contains(POSTAL_CODE_PLACEHOLDER) {
                return Err(Error::config(
                    format!(
                        "URL template for '{}' must contain {}",
                        source.name, POSTAL_CODE_PLACEHOLDER
                    ),
                    "sources.url_template",
                ));
            }
        }

        Ok(())
    }
}

/// One address-lookup service taking part in the race
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Name reported in outcomes and verdicts (e.g., "ViaCEP")
    pub name: String,

    /// Endpoint URL containing `{postal_code}`
    pub url_template: String,

    /// JSON shape returned by this service
    pub format: SourceFormat,
}

impl SourceConfig {
    /// BrasilAPI CEP v1 endpoint
    pub fn brasil_api() -> Self {
        Self {
            name: "BrasilAPI".to_string(),
            url_template: "https://brasilapi.com.br/api/cep/v1/{postal_code}".to_string(),
            format: SourceFormat::BrasilApi,
        }
    }

    /// ViaCEP JSON endpoint
    pub fn via_cep() -> Self {
        Self {
            name: "ViaCEP".to_string(),
            url_template: "http://viacep.com.br/ws/{postal_code}/json/".to_string(),
            format: SourceFormat::ViaCep,
        }
    }

    /// Substitute the postal code into the URL template
    ///
    /// The postal code is percent-encoded, so arbitrary input cannot alter the
    /// path structure of the request.
    pub fn render_url(&self, postal_code: &str) -> String {
        self.url_template
            .replace(POSTAL_CODE_PLACEHOLDER, &urlencoding::encode(postal_code))
    }
}

/// Wire format of a source's JSON response
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceFormat {
    /// ViaCEP keys: cep, logradouro, complemento, bairro, localidade, uf
    ViaCep,
    /// BrasilAPI keys: cep, street, neighborhood, city, state
    BrasilApi,
}

fn default_postal_code() -> String {
    "01153000".to_string()
}

fn default_timeout() -> Duration {
    Duration::from_secs(1)
}

fn default_sources() -> Vec<SourceConfig> {
    vec![SourceConfig::brasil_api(), SourceConfig::via_cep()]
}

fn default_user_agent() -> String {
    format!("cep-race/{}", env!("CARGO_PKG_VERSION"))
}

// Duration serialization helper (milliseconds; sub-second deadlines are common)
mod duration_millis_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let millis = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        serializer.serialize_u64(millis)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
