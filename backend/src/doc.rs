//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers the webhook and health endpoints plus the schema
//! wrappers for domain types. Swagger UI serves it at `/docs` in debug builds.

use crate::inbound::http::health::HealthStatus;
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema, WebhookEventSchema};
use crate::inbound::http::webhooks::WebhookAck;
use utoipa::OpenApi;

/// OpenAPI document for the HTTP surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "stocksync",
        description = "Payment webhook receiver applying inventory decrements to a product catalog."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::webhooks::receive_webhook,
        crate::inbound::http::health::health,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        WebhookEventSchema,
        WebhookAck,
        HealthStatus
    )),
    tags(
        (name = "webhooks", description = "Signed payment-provider notifications"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
