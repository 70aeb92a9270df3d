//! Tests for server construction and readiness signalling.

use super::create_server;
#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetricsBuilder;
use super::server::ServerConfig;
use actix_web::web;
use reqwest::Url;
use rstest::{fixture, rstest};
use std::time::Duration;
use stocksync::inbound::http::health::HealthState;
use stocksync::settings::ValidatedSettings;
use zeroize::Zeroizing;

#[fixture]
fn health_state() -> web::Data<HealthState> {
    web::Data::new(HealthState::new())
}

#[fixture]
fn settings() -> ValidatedSettings {
    ValidatedSettings {
        bind_addr: "127.0.0.1:0".parse().expect("loopback address"),
        payment_secret_key: Zeroizing::new("sk_test_1".to_owned()),
        webhook_secret: Zeroizing::new("whsec_1".to_owned()),
        catalog_url: Url::parse("http://127.0.0.1:1337").expect("catalog url"),
        catalog_token: Zeroizing::new("cms-token".to_owned()),
        payment_api_url: Url::parse("http://127.0.0.1:12111").expect("payment url"),
        signature_tolerance: Duration::from_secs(300),
        request_timeout: Some(Duration::from_secs(5)),
    }
}

#[rstest]
#[actix_rt::test]
async fn create_server_marks_ready(
    health_state: web::Data<HealthState>,
    settings: ValidatedSettings,
) {
    assert!(!health_state.is_ready(), "state should start unready");

    let _server = create_server(health_state.clone(), ServerConfig::new(settings))
        .expect("server should build");

    assert!(
        health_state.is_ready(),
        "server creation should mark readiness"
    );
}

#[cfg(feature = "metrics")]
#[rstest]
#[actix_rt::test]
async fn create_server_marks_ready_with_metrics(
    health_state: web::Data<HealthState>,
    settings: ValidatedSettings,
) {
    let prometheus = PrometheusMetricsBuilder::new("test")
        .endpoint("/metrics")
        .build()
        .expect("metrics should build for tests");
    let config = ServerConfig::new(settings).with_metrics(Some(prometheus));

    let _server = create_server(health_state.clone(), config).expect("server should build");

    assert!(
        health_state.is_ready(),
        "server creation should mark readiness"
    );
}
