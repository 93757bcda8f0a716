//! Node webhook intake primitives.
//!
//! - [`WebhookRequest`] - headers and raw body of an inbound delivery
//! - [`SignatureValidator`] - HMAC-SHA256 signature validation
//!
//! Event payload types live in [`crate::events`].

mod receiver;
mod validation;

pub use receiver::{WebhookRequest, EVENT_TYPE_HEADER, SIGNATURE_HEADER};
pub use validation::SignatureValidator;
