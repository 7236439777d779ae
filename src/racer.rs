//! First-response-wins orchestration.
//!
//! A race spawns one [`Fetcher`] per configured source, all sharing one
//! [`RaceContext`], and decides on whichever comes first: an [`Outcome`] on the
//! result channel or the deadline. The first arrival decides even when it is a
//! failure; the remaining fetchers are never awaited.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::fetcher::Fetcher;
use crate::types::{Outcome, Verdict};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Per-race deadline and cancellation token
///
/// Fetchers hold child handles of the token. Dropping the context cancels it,
/// so every way out of a race (success, failure, timeout) tears it down.
#[derive(Debug)]
pub struct RaceContext {
    token: CancellationToken,
    deadline: Instant,
    timeout: Duration,
}

impl RaceContext {
    /// Start the clock for a race bounded by `timeout`
    pub fn new(timeout: Duration) -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: Instant::now() + timeout,
            timeout,
        }
    }

    /// Token handed to a fetcher; fires when the race ends
    pub fn token(&self) -> CancellationToken {
        self.token.child_token()
    }

    /// Instant at which the race is lost to the timeout
    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// The configured race-wide timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns true once the race has been torn down
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolves at the deadline, cancelling the token on the way out
    pub async fn expired(&self) {
        tokio::time::sleep_until(self.deadline).await;
        self.token.cancel();
    }
}

impl Drop for RaceContext {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Races the configured sources against each other
///
/// # Example
///
/// ```no_run
/// use cep_race::{Config, Racer};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let racer = Racer::new(Config::default())?;
///     let resolved = racer.race().await?;
///     println!("{}: {}", resolved.source_name, resolved.address);
///     Ok(())
/// }
/// ```
#[derive(Clone, Debug)]
pub struct Racer {
    config: Config,
    client: reqwest::Client,
}

impl Racer {
    /// Validate `config` and build the HTTP client shared by all fetchers
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for an invalid configuration or
    /// [`Error::HttpClient`] if the client cannot be built.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(Error::HttpClient)?;

        Ok(Self { config, client })
    }

    /// The configuration this racer was built with
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Race the configured postal code
    pub async fn race(&self) -> Verdict {
        self.race_postal_code(&self.config.postal_code).await
    }

    /// Race `postal_code` against every configured source
    ///
    /// Produces exactly one verdict within the configured timeout (plus
    /// scheduling latency):
    /// - the first outcome to arrive, success or failure
    /// - [`Error::Timeout`] if nothing arrives before the deadline
    pub async fn race_postal_code(&self, postal_code: &str) -> Verdict {
        let context = RaceContext::new(self.config.timeout);
        let (tx, mut rx) = mpsc::channel::<Outcome>(self.config.sources.len());

        for source in &self.config.sources {
            let fetcher = Fetcher::new(source, postal_code, self.client.clone());
            // Detached; the task ends after its single send (or drop)
            fetcher.spawn(context.token(), tx.clone());
        }
        // Only fetchers hold senders now, so a race with no outcomes falls through to the deadline
        drop(tx);

        let verdict = tokio::select! {
            biased;
            Some(outcome) = rx.recv() => outcome.into_verdict(),
            () = context.expired() => Err(Error::Timeout {
                timeout: context.timeout(),
            }),
        };

        match &verdict {
            Ok(resolved) => {
                info!(
                    postal_code = %postal_code,
                    source = %resolved.source_name,
                    "race won"
                );
            }
            Err(e) => {
                warn!(postal_code = %postal_code, error = %e, "race failed");
            }
        }

        verdict
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SourceConfig, SourceFormat};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn new_rejects_invalid_config() {
        let config = Config {
            sources: vec![],
            ..Default::default()
        };

        let err = Racer::new(config).unwrap_err();

        assert!(matches!(err, Error::Config { .. }), "got {err:?}");
    }

    #[tokio::test]
    async fn dropping_context_cancels_fetcher_tokens() {
        let context = RaceContext::new(Duration::from_secs(60));
        let token = context.token();
        assert!(!token.is_cancelled());

        drop(context);

        assert!(token.is_cancelled());
    }

    #[tokio::test]
    async fn context_expires_at_deadline() {
        let context = RaceContext::new(Duration::from_millis(50));
        let token = context.token();

        context.expired().await;

        assert!(Instant::now() >= context.deadline());
        assert!(context.is_cancelled());
        assert!(token.is_cancelled());
    }

    #[tokio::test]
    async fn racer_is_reusable_across_postal_codes() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cep/01153000"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"city": "São Paulo"})),
            )
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/cep/50030000"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"city": "Recife"})),
            )
            .mount(&mock_server)
            .await;

        let racer = Racer::new(Config {
            sources: vec![SourceConfig {
                name: "Alpha".to_string(),
                url_template: format!("{}/cep/{{postal_code}}", mock_server.uri()),
                format: SourceFormat::BrasilApi,
            }],
            ..Default::default()
        })
        .unwrap();

        let first = racer.race().await.unwrap();
        let second = racer.race_postal_code("50030000").await.unwrap();

        assert_eq!(first.address.city, "São Paulo");
        assert_eq!(second.address.city, "Recife");
        assert_eq!(racer.config().postal_code, "01153000");
    }
}
