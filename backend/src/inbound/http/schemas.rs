//! OpenAPI schema definitions for domain types.
//!
//! Domain types stay framework-agnostic by not deriving `ToSchema`; these
//! wrappers mirror their wire shape for the generated document.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The delivery is malformed or failed signature verification.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Processing failed; the provider should redeliver.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Human-readable message; internal failures are redacted.
    #[schema(example = "invalid webhook signature")]
    message: String,
    /// Correlation identifier, also sent in the `trace-id` header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary details, e.g. `{"reason": "mismatch"}`.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for the provider's event envelope.
#[derive(ToSchema)]
#[schema(as = crate::domain::WebhookEvent)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct WebhookEventSchema {
    /// Provider event id, stable across redeliveries.
    #[schema(example = "evt_1")]
    id: String,
    /// Event type.
    #[schema(rename = "type", example = "checkout.session.completed")]
    event_type: String,
    /// Kind-specific payload; checkout events carry the session in `object`.
    #[schema(value_type = Object)]
    data: serde_json::Value,
}
