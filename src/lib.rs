//! Typed Rust client for the 1s2u bulk SMS HTTP API.
//!
//! The crate is split into a domain layer of strong types (validation, character-set
//! classification, the 16-bit Unicode codec), a transport layer for wire-format quirks, and a
//! small client layer orchestrating requests.
//!
//! ```rust,no_run
//! use bulksms::{BulkSmsClient, GatewayConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), bulksms::BulkSmsError> {
//!     let client = BulkSmsClient::from_config(&GatewayConfig::from_env()?)?;
//!     let mut draft = client.draft();
//!     draft
//!         .append_mobile_number("00447911123456")?
//!         .set_sender_id("MyShop")?
//!         .set_body("Hello world");
//!     let _resp = client.send(&draft).await?;
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod config;
pub mod domain;
mod transport;

pub use client::{BulkSmsClient, BulkSmsClientBuilder, BulkSmsError, HttpResponse, HttpTransport};
pub use config::{ConfigError, GatewayConfig};
pub use domain::{
    Alphabet, BalanceResponse, CodecError, Credentials, GatewayStatusCode,
    KnownGatewayStatusCode, MessageBody, MessageType, MessageTypeSelection, MissingReason,
    MobileNumber, Password, PhoneNumber, SendSms, SendSmsResponse, SenderId, SmsDraft, Username,
    ValidationError, requires_unicode,
};
pub use transport::{assemble_send_query, encode_message, escape_reserved};
