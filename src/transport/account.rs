use super::{GatewayReply, TransportError, classify_body};
use crate::domain::{BalanceResponse, Credentials};

const USER_FIELD: &str = "user";
const PASS_FIELD: &str = "pass";

/// Query for the balance endpoint. Credentials are alphanumeric, so no encoding is needed.
pub fn encode_balance_query(credentials: &Credentials) -> String {
    format!(
        "{USER_FIELD}={}&{PASS_FIELD}={}",
        credentials.username().as_str(),
        credentials.password().as_str()
    )
}

pub fn decode_balance_response(
    body: &str,
) -> Result<GatewayReply<BalanceResponse>, TransportError> {
    let trimmed = match classify_body(body)? {
        GatewayReply::Ok(trimmed) => trimmed,
        GatewayReply::Status(code) => return Ok(GatewayReply::Status(code)),
    };

    if !trimmed.parse::<f64>().is_ok_and(f64::is_finite) {
        return Err(TransportError::InvalidBalance {
            body: trimmed.to_owned(),
        });
    }

    Ok(GatewayReply::Ok(BalanceResponse {
        balance: trimmed.to_owned(),
    }))
}
