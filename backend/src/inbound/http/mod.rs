//! HTTP inbound adapter exposing the webhook and health endpoints.

pub mod error;
pub mod health;
pub mod schemas;
pub mod signature;
pub mod state;
pub mod webhooks;

pub use error::ApiResult;
