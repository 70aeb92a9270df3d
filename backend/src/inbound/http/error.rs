//! Delivery failures rendered for the payment provider.
//!
//! Only two statuses leave this service on failure: 400 tells the provider
//! the delivery is unusable as sent, 500 asks it to redeliver. A 500 body is
//! reduced to a fixed message plus the trace id; the receiver has already
//! logged the cause under that id.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Result type returned by webhook and probe handlers.
pub type ApiResult<T> = Result<T, Error>;

const REDELIVER_MESSAGE: &str = "Internal server error";

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Body sent over the wire. Rejections keep their reason; processing
/// failures keep only the trace id.
fn wire_body(error: &Error) -> Error {
    match error.code() {
        ErrorCode::InvalidRequest => error.clone(),
        ErrorCode::InternalError => {
            let body = Error::internal(REDELIVER_MESSAGE);
            match error.trace_id() {
                Some(id) => body.with_trace_id(id.to_owned()),
                None => body,
            }
        }
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let mut response = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            response.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        response.json(wire_body(self))
    }
}
