//! Transport layer: wire-format details (query assembly and response decoding).

mod account;
mod send_sms;

pub use account::{decode_balance_response, encode_balance_query};
pub use send_sms::{
    assemble_send_query, decode_send_sms_response, encode_message, encode_send_sms_query,
    escape_reserved,
};

use crate::domain::GatewayStatusCode;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("empty response body")]
    EmptyBody,

    #[error("response contains no message id: {body}")]
    NoMessageIds { body: String },

    #[error("response is not a balance: {body}")]
    InvalidBalance { body: String },
}

/// Decoded gateway reply: either the expected payload or a status code sent in its place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayReply<T> {
    Ok(T),
    Status(GatewayStatusCode),
}

/// Trim the body and split off replies that are bare status codes.
fn classify_body(body: &str) -> Result<GatewayReply<&str>, TransportError> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Err(TransportError::EmptyBody);
    }
    if GatewayStatusCode::looks_like_code(trimmed) {
        return Ok(GatewayReply::Status(GatewayStatusCode::new(trimmed)));
    }
    Ok(GatewayReply::Ok(trimmed))
}
