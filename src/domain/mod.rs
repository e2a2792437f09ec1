//! Domain layer: strong types with validation and invariants (no I/O).

pub mod charset;
mod request;
mod response;
pub mod unicode;
mod validation;
mod value;

pub use charset::{Alphabet, requires_unicode};
pub use request::{
    MessageBody, MessageType, MessageTypeSelection, PLAIN_TEXT_MAX_LEN, SEND_SMS_MAX_RECIPIENTS,
    SendSms, SmsDraft, UNICODE_MAX_UNITS,
};
pub use response::{BalanceResponse, SendSmsResponse};
pub use unicode::CodecError;
pub use validation::{MissingReason, ValidationError};
pub use value::{
    Credentials, GatewayStatusCode, KnownGatewayStatusCode, MobileNumber, Password, PhoneNumber,
    SenderId, Username,
};
