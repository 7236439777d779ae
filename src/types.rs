//! Core types for cep-race

use crate::config::SourceFormat;
use crate::error::{Error, FetchError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A resolved postal address, normalized across sources
///
/// Fields a source does not provide are empty strings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Postal code as echoed by the source (e.g., "01153-000")
    pub postal_code: String,
    /// Street name
    pub street: String,
    /// Complement (building, block, side of street)
    pub complement: String,
    /// District / neighborhood
    pub district: String,
    /// City
    pub city: String,
    /// Two-letter state code (e.g., "SP")
    pub state_code: String,
}

impl Address {
    /// Decode a response body in the given source format
    ///
    /// The body must be a JSON object whose known keys, when present, hold
    /// strings (or null). An object with none of the known address keys is a
    /// schema mismatch, so a foreign payload can never pass as an empty
    /// address.
    ///
    /// # Errors
    ///
    /// - [`FetchError::Decode`] for non-JSON, non-object, or mismatched bodies
    /// - [`FetchError::NotFound`] when ViaCEP answers `{"erro": true}`
    pub fn decode(format: SourceFormat, body: &[u8]) -> Result<Self, FetchError> {
        let object: serde_json::Map<String, serde_json::Value> = serde_json::from_slice(body)
            .map_err(|e| FetchError::Decode(format!("expected a JSON object: {}", e)))?;
        let value = serde_json::Value::Object(object);

        let address = match format {
            SourceFormat::ViaCep => {
                let wire: ViaCepAddress = serde_json::from_value(value)?;
                if wire.reports_not_found() {
                    return Err(FetchError::NotFound);
                }
                Address::from(wire)
            }
            SourceFormat::BrasilApi => Address::from(serde_json::from_value::<BrasilApiAddress>(
                value,
            )?),
        };

        if address == Address::default() {
            return Err(FetchError::Decode(
                "response carries no address fields".to_string(),
            ));
        }

        Ok(address)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let street = [self.street.as_str(), self.complement.as_str()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", ");
        let locality = match (self.city.is_empty(), self.state_code.is_empty()) {
            (false, false) => format!("{}/{}", self.city, self.state_code),
            (false, true) => self.city.clone(),
            (true, false) => self.state_code.clone(),
            (true, true) => String::new(),
        };

        let parts: Vec<&str> = [
            street.as_str(),
            self.district.as_str(),
            locality.as_str(),
            self.postal_code.as_str(),
        ]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect();

        write!(f, "{}", parts.join(" - "))
    }
}

// ViaCEP response shape
#[derive(Debug, Deserialize)]
struct ViaCepAddress {
    #[serde(default)]
    cep: Option<String>,
    #[serde(default)]
    logradouro: Option<String>,
    #[serde(default)]
    complemento: Option<String>,
    #[serde(default)]
    bairro: Option<String>,
    #[serde(default)]
    localidade: Option<String>,
    #[serde(default)]
    uf: Option<String>,
    // Unknown codes come back as 200 {"erro": true}; older deployments send "true"
    #[serde(default)]
    erro: Option<serde_json::Value>,
}

impl ViaCepAddress {
    fn reports_not_found(&self) -> bool {
        match &self.erro {
            Some(serde_json::Value::Bool(flag)) => *flag,
            Some(serde_json::Value::String(flag)) => flag.eq_ignore_ascii_case("true"),
            _ => false,
        }
    }
}

impl From<ViaCepAddress> for Address {
    fn from(wire: ViaCepAddress) -> Self {
        Self {
            postal_code: wire.cep.unwrap_or_default(),
            street: wire.logradouro.unwrap_or_default(),
            complement: wire.complemento.unwrap_or_default(),
            district: wire.bairro.unwrap_or_default(),
            city: wire.localidade.unwrap_or_default(),
            state_code: wire.uf.unwrap_or_default(),
        }
    }
}

// BrasilAPI CEP v1 response shape
#[derive(Debug, Deserialize)]
struct BrasilApiAddress {
    #[serde(default)]
    cep: Option<String>,
    #[serde(default)]
    street: Option<String>,
    #[serde(default)]
    neighborhood: Option<String>,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    state: Option<String>,
}

impl From<BrasilApiAddress> for Address {
    fn from(wire: BrasilApiAddress) -> Self {
        Self {
            postal_code: wire.cep.unwrap_or_default(),
            street: wire.street.unwrap_or_default(),
            complement: String::new(),
            district: wire.neighborhood.unwrap_or_default(),
            city: wire.city.unwrap_or_default(),
            state_code: wire.state.unwrap_or_default(),
        }
    }
}

/// The single report a fetcher sends for its lookup
#[derive(Debug)]
pub enum Outcome {
    /// The source answered with a usable address
    Success {
        /// Name of the source that answered
        source_name: String,
        /// The normalized address
        address: Address,
    },
    /// The lookup failed
    Failure {
        /// Name of the source that failed
        source_name: String,
        /// What went wrong
        error: FetchError,
    },
}

impl Outcome {
    /// Name of the source this outcome came from
    pub fn source_name(&self) -> &str {
        match self {
            Outcome::Success { source_name, .. } | Outcome::Failure { source_name, .. } => {
                source_name
            }
        }
    }

    /// Returns true for [`Outcome::Success`]
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }

    /// Turn this outcome into a race verdict
    pub fn into_verdict(self) -> Verdict {
        match self {
            Outcome::Success {
                source_name,
                address,
            } => Ok(Resolved {
                source_name,
                address,
            }),
            Outcome::Failure { source_name, error } => Err(Error::Fetch { source_name, error }),
        }
    }
}

/// Successful race result: which source won and what it returned
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolved {
    /// Name of the winning source
    pub source_name: String,
    /// The address it returned
    pub address: Address,
}

/// The race's single final decision
pub type Verdict = crate::error::Result<Resolved>;
