//! Single-source address lookup.
//!
//! A [`Fetcher`] performs exactly one HTTP GET against one source and reports
//! exactly one [`Outcome`]. It never retries; the first failure is terminal.

use crate::config::{SourceConfig, SourceFormat};
use crate::error::FetchError;
use crate::types::{Address, Outcome};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use url::Url;

/// One lookup against one source
#[derive(Clone, Debug)]
pub struct Fetcher {
    source_name: String,
    url: String,
    format: SourceFormat,
    client: reqwest::Client,
}

impl Fetcher {
    /// Prepare a lookup of `postal_code` against `source`
    ///
    /// The URL is rendered here but only parsed when the fetch runs, so a bad
    /// template surfaces as a request-construction [`Outcome`] instead of a panic.
    pub fn new(source: &SourceConfig, postal_code: &str, client: reqwest::Client) -> Self {
        Self {
            source_name: source.name.clone(),
            url: source.render_url(postal_code),
            format: source.format,
            client,
        }
    }

    /// Name of the source this fetcher queries
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    /// Fully-formed request URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Run the lookup, giving up as soon as `cancel` fires
    ///
    /// When the token fires mid-request the in-flight request future is
    /// dropped, which closes its connection.
    pub async fn fetch(&self, cancel: &CancellationToken) -> Outcome {
        debug!(source = %self.source_name, url = %self.url, "fetching address");

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(FetchError::Canceled),
            result = self.lookup() => result,
        };

        match result {
            Ok(address) => {
                debug!(source = %self.source_name, "address lookup succeeded");
                Outcome::Success {
                    source_name: self.source_name.clone(),
                    address,
                }
            }
            Err(error) => {
                debug!(source = %self.source_name, error = %error, "address lookup failed");
                Outcome::Failure {
                    source_name: self.source_name.clone(),
                    error,
                }
            }
        }
    }

    async fn lookup(&self) -> Result<Address, FetchError> {
        let url = Url::parse(&self.url).map_err(|e| FetchError::InvalidUrl {
            url: self.url.clone(),
            reason: e.to_string(),
        })?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(FetchError::Connection)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(FetchError::Body)?;
        Address::decode(self.format, &body)
    }

    /// Run the lookup as a detached task that reports into `tx`
    ///
    /// The task sends its outcome once, without waiting for capacity, and
    /// exits. The channel must have room for every fetcher of the race; if the
    /// receiver is already gone the outcome is dropped.
    pub fn spawn(self, cancel: CancellationToken, tx: mpsc::Sender<Outcome>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let outcome = self.fetch(&cancel).await;

            match tx.try_send(outcome) {
                Ok(()) => {}
                Err(TrySendError::Closed(outcome)) => {
                    debug!(
                        source = %outcome.source_name(),
                        success = outcome.is_success(),
                        "race already decided, discarding outcome"
                    );
                }
                Err(TrySendError::Full(outcome)) => {
                    warn!(
                        source = %outcome.source_name(),
                        "result channel full, discarding outcome"
                    );
                }
            }
        })
    }
}
