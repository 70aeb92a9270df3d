//! Request metrics for the webhook listener (feature `metrics`).
//!
//! The exporter counts requests under the `stocksync` namespace and serves
//! them at `/metrics`. Probe traffic is excluded so scrape data reflects
//! provider deliveries. When the exporter cannot be built the server still
//! starts, wrapped in a pass-through layer.

use actix_service::{
    Service, ServiceExt as _, Transform,
    boxed::{self, BoxService},
};
use actix_web::body::{BoxBody, MessageBody};
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::middleware::Compat;
use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};
use futures_util::future::LocalBoxFuture;
use std::sync::Arc;
use tracing::warn;

const NAMESPACE: &str = "stocksync";
const ENDPOINT: &str = "/metrics";
const UNCOUNTED_PATHS: [&str; 3] = ["/health", "/health/live", "/health/ready"];

/// Keep the exporter when `make` succeeds; log and drop it otherwise.
pub(crate) fn initialize_metrics<F, E>(make: F) -> Option<PrometheusMetrics>
where
    F: FnOnce() -> Result<PrometheusMetrics, E>,
    E: std::fmt::Display,
{
    make()
        .inspect_err(|error| warn!(error = %error, "Prometheus exporter disabled"))
        .ok()
}

/// Build the request exporter for the webhook listener.
pub(crate) fn webhook_exporter() -> Option<PrometheusMetrics> {
    initialize_metrics(|| {
        UNCOUNTED_PATHS
            .into_iter()
            .fold(
                PrometheusMetricsBuilder::new(NAMESPACE).endpoint(ENDPOINT),
                |builder, path| builder.exclude(path),
            )
            .build()
    })
}

/// Request-counting middleware, or a pass-through when no exporter exists.
///
/// Both arms produce the same boxed service so the app factory has one type.
#[derive(Clone)]
pub(crate) enum RequestMetrics {
    Exported(Arc<PrometheusMetrics>),
    PassThrough,
}

impl RequestMetrics {
    #[must_use]
    pub(crate) fn new(exporter: Option<PrometheusMetrics>) -> Self {
        exporter.map_or(Self::PassThrough, |exporter| {
            Self::Exported(Arc::new(exporter))
        })
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequestMetrics
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = BoxService<ServiceRequest, ServiceResponse<BoxBody>, actix_web::Error>;
    type Future = LocalBoxFuture<'static, Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        match self {
            Self::Exported(exporter) => {
                let counted = Compat::new(exporter.as_ref().clone()).new_transform(service);
                Box::pin(async move { Ok(boxed::service(counted.await?)) })
            }
            Self::PassThrough => {
                let plain = service.map(ServiceResponse::<B>::map_into_boxed_body);
                Box::pin(async move { Ok(boxed::service(plain)) })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test, web};

    #[test]
    fn failed_construction_yields_no_exporter() {
        assert!(initialize_metrics(|| -> Result<_, &str> { Err("boom") }).is_none());
    }

    #[test]
    fn successful_construction_keeps_exporter() {
        let exporter = initialize_metrics(|| {
            PrometheusMetricsBuilder::new("test").endpoint(ENDPOINT).build()
        });
        assert!(exporter.is_some());
    }

    #[actix_web::test]
    async fn pass_through_leaves_responses_untouched() {
        let app = test::init_service(
            App::new()
                .wrap(RequestMetrics::new(None))
                .route("/webhook", web::post().to(HttpResponse::Ok)),
        )
        .await;

        let res = test::call_service(
            &app,
            test::TestRequest::post().uri("/webhook").to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn exported_layer_serves_scrape_endpoint() {
        let exporter = PrometheusMetricsBuilder::new("layer_test")
            .endpoint(ENDPOINT)
            .build()
            .expect("exporter builds");
        let app = test::init_service(
            App::new()
                .wrap(RequestMetrics::new(Some(exporter)))
                .route("/webhook", web::post().to(HttpResponse::Ok)),
        )
        .await;

        test::call_service(
            &app,
            test::TestRequest::post().uri("/webhook").to_request(),
        )
        .await;
        let res = test::call_service(&app, test::TestRequest::get().uri(ENDPOINT).to_request())
            .await;

        assert_eq!(res.status(), StatusCode::OK);
        let body = test::read_body(res).await;
        let text = std::str::from_utf8(&body).expect("utf8 scrape");
        assert!(text.contains("layer_test_http_requests_total"));
    }
}
