use std::str::FromStr;

use crate::domain::charset::Alphabet;
use crate::domain::validation::{MissingReason, ValidationError};
use crate::domain::value::{Credentials, MobileNumber, Password, SenderId, Username};

pub const SEND_SMS_MAX_RECIPIENTS: usize = 30;

/// Maximum characters of a plain-text body.
pub const PLAIN_TEXT_MAX_LEN: usize = 160;

/// Maximum UTF-16 code units of a Unicode body: one UCS-2 segment, the gateway's limit for a
/// single `mt=1` message.
pub const UNICODE_MAX_UNITS: usize = 70;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
/// How the body travels on the wire (`mt`).
pub enum MessageType {
    /// Form-encoded 7-bit text (`mt=0`).
    #[default]
    PlainText,
    /// Hex-encoded 16-bit code units (`mt=1`).
    Unicode,
}

impl MessageType {
    /// Query field name used by the gateway (`mt`).
    pub const FIELD: &'static str = "mt";

    /// Wire code of this type.
    pub fn code(self) -> u8 {
        match self {
            Self::PlainText => 0,
            Self::Unicode => 1,
        }
    }

    /// Inverse of [`MessageType::code`].
    pub fn from_code(code: u8) -> Result<Self, ValidationError> {
        match code {
            0 => Ok(Self::PlainText),
            1 => Ok(Self::Unicode),
            other => Err(ValidationError::UnsupportedMessageType {
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
/// Requested message type: detected from the body, or forced by the caller.
pub enum MessageTypeSelection {
    #[default]
    Auto,
    Explicit(MessageType),
}

impl MessageTypeSelection {
    /// Resolve the effective type for `text`.
    ///
    /// Explicit selections are never reclassified.
    pub fn resolve(self, text: &str, alphabet: &Alphabet) -> MessageType {
        match self {
            Self::Explicit(message_type) => message_type,
            Self::Auto if alphabet.requires_unicode(text) => MessageType::Unicode,
            Self::Auto => MessageType::PlainText,
        }
    }
}

impl From<MessageType> for MessageTypeSelection {
    fn from(value: MessageType) -> Self {
        Self::Explicit(value)
    }
}

impl FromStr for MessageTypeSelection {
    type Err = ValidationError;

    /// Accepts `auto`, `text` and `unicode` (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "text" => Ok(Self::Explicit(MessageType::PlainText)),
            "unicode" => Ok(Self::Explicit(MessageType::Unicode)),
            _ => Err(ValidationError::UnsupportedMessageType {
                value: s.to_owned(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Message text checked against the rules of its resolved type (`msg`).
pub struct MessageBody {
    text: String,
    message_type: MessageType,
}

impl MessageBody {
    /// Query field name used by the gateway (`msg`).
    pub const FIELD: &'static str = "msg";

    /// Validate `text` for `message_type`.
    ///
    /// Plain text is limited to [`PLAIN_TEXT_MAX_LEN`] characters of `alphabet`; Unicode text
    /// to [`UNICODE_MAX_UNITS`] UTF-16 code units.
    pub fn new(
        text: impl Into<String>,
        message_type: MessageType,
        alphabet: &Alphabet,
    ) -> Result<Self, ValidationError> {
        let text = text.into();
        if text.is_empty() {
            return Err(ValidationError::required(Self::FIELD));
        }

        match message_type {
            MessageType::PlainText => {
                let actual = text.chars().count();
                if actual > PLAIN_TEXT_MAX_LEN {
                    return Err(ValidationError::ValueTooLong {
                        field: Self::FIELD,
                        max: PLAIN_TEXT_MAX_LEN,
                        actual,
                    });
                }
                if let Some(character) = alphabet.first_unsupported(&text) {
                    return Err(ValidationError::InvalidCharacter {
                        field: Self::FIELD,
                        character,
                    });
                }
            }
            MessageType::Unicode => {
                let actual = text.encode_utf16().count();
                if actual > UNICODE_MAX_UNITS {
                    return Err(ValidationError::ValueTooLong {
                        field: Self::FIELD,
                        max: UNICODE_MAX_UNITS,
                        actual,
                    });
                }
            }
        }

        Ok(Self { text, message_type })
    }

    /// Text as provided, before any wire escaping.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn message_type(&self) -> MessageType {
        self.message_type
    }
}

#[derive(Debug, Clone, Default)]
/// Mutable draft of an outbound message.
///
/// Field setters validate their argument immediately and leave the draft untouched on error.
/// Body rules depend on the resolved message type and are only enforced by
/// [`SmsDraft::build`], which produces an immutable [`SendSms`].
pub struct SmsDraft {
    username: Option<Username>,
    password: Option<Password>,
    recipients: Vec<MobileNumber>,
    sender_id: Option<SenderId>,
    body: String,
    selection: MessageTypeSelection,
    alphabet: Alphabet,
    flash: bool,
}

impl SmsDraft {
    /// Empty draft without credentials.
    pub fn new() -> Self {
        Self::default()
    }

    /// Draft seeded with default credentials.
    pub fn with_credentials(credentials: &Credentials) -> Self {
        let mut draft = Self::default();
        draft.set_credentials(credentials);
        draft
    }

    pub fn set_credentials(&mut self, credentials: &Credentials) -> &mut Self {
        self.username = Some(credentials.username().clone());
        self.password = Some(credentials.password().clone());
        self
    }

    pub fn set_username(&mut self, value: impl Into<String>) -> Result<&mut Self, ValidationError> {
        self.username = Some(Username::new(value)?);
        Ok(self)
    }

    pub fn set_password(&mut self, value: impl Into<String>) -> Result<&mut Self, ValidationError> {
        self.password = Some(Password::new(value)?);
        Ok(self)
    }

    /// Add one recipient after the existing ones.
    pub fn append_mobile_number(
        &mut self,
        value: impl Into<String>,
    ) -> Result<&mut Self, ValidationError> {
        let number = MobileNumber::new(value)?;
        check_recipient_cap(self.recipients.len() + 1)?;
        self.recipients.push(number);
        Ok(self)
    }

    /// Replace all recipients.
    ///
    /// Every number is validated before the list is replaced, so a failure keeps the previous
    /// recipients.
    pub fn set_mobile_numbers<I, S>(&mut self, values: I) -> Result<&mut Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let recipients = values
            .into_iter()
            .map(MobileNumber::new)
            .collect::<Result<Vec<_>, _>>()?;
        check_recipient_cap(recipients.len())?;
        self.recipients = recipients;
        Ok(self)
    }

    pub fn set_sender_id(&mut self, value: impl Into<String>) -> Result<&mut Self, ValidationError> {
        self.sender_id = Some(SenderId::new(value)?);
        Ok(self)
    }

    pub fn clear_sender_id(&mut self) -> &mut Self {
        self.sender_id = None;
        self
    }

    /// Set the body and detect its type.
    pub fn set_body(&mut self, text: impl Into<String>) -> &mut Self {
        self.set_body_with_type(text, MessageTypeSelection::Auto)
    }

    /// Set the body with an explicit or automatic type selection.
    pub fn set_body_with_type(
        &mut self,
        text: impl Into<String>,
        selection: impl Into<MessageTypeSelection>,
    ) -> &mut Self {
        self.body = text.into();
        self.selection = selection.into();
        self
    }

    /// Alphabet used for detection and plain-text validation. Defaults to
    /// [`Alphabet::GSM_SAFE`].
    pub fn set_alphabet(&mut self, alphabet: Alphabet) -> &mut Self {
        self.alphabet = alphabet;
        self
    }

    pub fn set_flash(&mut self, flash: bool) -> &mut Self {
        self.flash = flash;
        self
    }

    pub fn username(&self) -> Option<&Username> {
        self.username.as_ref()
    }

    pub fn password(&self) -> Option<&Password> {
        self.password.as_ref()
    }

    pub fn mobile_numbers(&self) -> &[MobileNumber] {
        &self.recipients
    }

    pub fn sender_id(&self) -> Option<&SenderId> {
        self.sender_id.as_ref()
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Effective type of the current body.
    pub fn message_type(&self) -> MessageType {
        self.selection.resolve(&self.body, &self.alphabet)
    }

    pub fn is_flash(&self) -> bool {
        self.flash
    }

    /// Validate the whole draft.
    ///
    /// Checks run in a fixed order and the first failure is returned: username, password,
    /// recipient count, non-empty body, then body length and characters for the resolved type.
    pub fn build(&self) -> Result<SendSms, ValidationError> {
        let username = self
            .username
            .clone()
            .ok_or_else(|| ValidationError::required(Username::FIELD))?;
        let password = self
            .password
            .clone()
            .ok_or_else(|| ValidationError::required(Password::FIELD))?;

        if self.recipients.is_empty() {
            return Err(ValidationError::required(MobileNumber::FIELD));
        }
        check_recipient_cap(self.recipients.len())?;

        let body = MessageBody::new(self.body.clone(), self.message_type(), &self.alphabet)?;

        Ok(SendSms {
            credentials: Credentials::from_parts(username, password),
            recipients: self.recipients.clone(),
            sender_id: self.sender_id.clone(),
            body,
            flash: self.flash,
        })
    }
}

fn check_recipient_cap(actual: usize) -> Result<(), ValidationError> {
    if actual > SEND_SMS_MAX_RECIPIENTS {
        return Err(ValidationError::ArgumentMissing {
            field: MobileNumber::FIELD,
            reason: MissingReason::TooMany {
                max: SEND_SMS_MAX_RECIPIENTS,
                actual,
            },
        });
    }
    Ok(())
}

#[derive(Debug, Clone)]
/// Fully validated outbound message, ready to be assembled for the wire.
pub struct SendSms {
    credentials: Credentials,
    recipients: Vec<MobileNumber>,
    sender_id: Option<SenderId>,
    body: MessageBody,
    flash: bool,
}

impl SendSms {
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn recipients(&self) -> &[MobileNumber] {
        &self.recipients
    }

    pub fn sender_id(&self) -> Option<&SenderId> {
        self.sender_id.as_ref()
    }

    pub fn body(&self) -> &MessageBody {
        &self.body
    }

    pub fn message_type(&self) -> MessageType {
        self.body.message_type()
    }

    pub fn is_flash(&self) -> bool {
        self.flash
    }
}

impl TryFrom<&SmsDraft> for SendSms {
    type Error = ValidationError;

    fn try_from(draft: &SmsDraft) -> Result<Self, Self::Error> {
        draft.build()
    }
}
