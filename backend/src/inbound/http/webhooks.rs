//! Payment webhook endpoint.
//!
//! ```text
//! POST /webhook
//! Stripe-Signature: t=1700000000,v1=5257a869...
//! {"id":"evt_1","type":"checkout.session.completed","data":{"object":{...}}}
//! ```
//!
//! The body is read raw so the signature is checked over the exact bytes the
//! provider signed. Nothing is parsed or recorded until verification passes.

use actix_web::{HttpRequest, post, web};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::warn;
use utoipa::ToSchema;

use crate::domain::{Error, WebhookEvent};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, WebhookEventSchema};
use crate::inbound::http::signature::{SIGNATURE_HEADER, SignatureError};
use crate::inbound::http::state::HttpState;

/// Event envelope as sent by the provider.
#[derive(Debug, Deserialize)]
struct WebhookEventDto {
    id: String,
    #[serde(rename = "type")]
    event_type: String,
    #[serde(default)]
    data: Value,
}

impl From<WebhookEventDto> for WebhookEvent {
    fn from(dto: WebhookEventDto) -> Self {
        Self {
            id: dto.id,
            event_type: dto.event_type,
            data: dto.data,
        }
    }
}

/// Acknowledgement returned for every accepted delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct WebhookAck {
    #[schema(example = true)]
    pub received: bool,
    /// What the receiver did with the event.
    #[schema(example = "fulfilled")]
    pub outcome: String,
}

fn signature_header(req: &HttpRequest) -> Result<Option<&str>, SignatureError> {
    req.headers()
        .get(SIGNATURE_HEADER)
        .map(|value| {
            value
                .to_str()
                .map_err(|_| SignatureError::MalformedHeader("header is not visible ASCII"))
        })
        .transpose()
}

fn map_signature_error(err: &SignatureError) -> Error {
    warn!(reason = err.reason(), error = %err, "webhook signature rejected");
    Error::invalid_request("invalid webhook signature")
        .with_details(json!({ "reason": err.reason() }))
}

fn parse_event(body: &[u8]) -> Result<WebhookEvent, Error> {
    serde_json::from_slice::<WebhookEventDto>(body)
        .map(WebhookEvent::from)
        .map_err(|err| {
            warn!(error = %err, "verified webhook payload is not an event");
            Error::invalid_request("webhook payload is not a valid event")
                .with_details(json!({ "reason": "invalid_payload" }))
        })
}

/// Receive a signed payment-provider event.
#[utoipa::path(
    post,
    path = "/webhook",
    request_body(content = WebhookEventSchema, content_type = "application/json"),
    params(
        ("Stripe-Signature" = String, Header, description = "`t=<unix seconds>,v1=<hex HMAC-SHA256>`")
    ),
    responses(
        (status = 200, description = "Event acknowledged, processed or skipped", body = WebhookAck),
        (status = 400, description = "Signature or payload rejected", body = ErrorSchema),
        (status = 500, description = "Processing failed; redeliver", body = ErrorSchema)
    ),
    tags = ["webhooks"],
    operation_id = "receiveWebhook"
)]
#[post("/webhook")]
pub async fn receive_webhook(
    state: web::Data<HttpState>,
    req: HttpRequest,
    body: web::Bytes,
) -> ApiResult<web::Json<WebhookAck>> {
    let header = signature_header(&req).map_err(|err| map_signature_error(&err))?;
    state
        .signatures
        .verify(&body, header)
        .map_err(|err| map_signature_error(&err))?;

    let event = parse_event(&body)?;
    let outcome = state.webhooks.receive(event).await?;

    Ok(web::Json(WebhookAck {
        received: true,
        outcome: outcome.label().to_owned(),
    }))
}
