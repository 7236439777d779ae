//! Mock lookup services and racer construction helpers

use cep_race::{Config, Racer, SourceConfig, SourceFormat};
use serde_json::Value;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A mock service answering `GET /cep/{postal_code}` with `status` and `body` after `delay`
pub async fn mock_service(status: u16, body: Value, delay: Duration) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/cep/{}", super::POSTAL_CODE)))
        .respond_with(
            ResponseTemplate::new(status)
                .set_body_json(body)
                .set_delay(delay),
        )
        .mount(&server)
        .await;
    server
}

/// A mock service answering with a raw, non-JSON body
pub async fn mock_raw_service(body: &str, delay: Duration) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .set_delay(delay),
        )
        .mount(&server)
        .await;
    server
}

/// Source pointing at a mock service
pub fn source_for(name: &str, server: &MockServer, format: SourceFormat) -> SourceConfig {
    SourceConfig {
        name: name.to_string(),
        url_template: format!("{}/cep/{{postal_code}}", server.uri()),
        format,
    }
}

/// Source pointing at a local port nothing listens on
pub fn refused_source(name: &str) -> SourceConfig {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);

    SourceConfig {
        name: name.to_string(),
        url_template: format!("http://127.0.0.1:{port}/cep/{{postal_code}}"),
        format: SourceFormat::ViaCep,
    }
}

/// Build a racer over `sources` with the given deadline
pub fn racer(sources: Vec<SourceConfig>, timeout: Duration) -> Racer {
    Racer::new(Config {
        postal_code: super::POSTAL_CODE.to_string(),
        timeout,
        sources,
        ..Default::default()
    })
    .expect("test config must be valid")
}
