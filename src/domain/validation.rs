use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Why a required argument is considered missing.
pub enum MissingReason {
    /// The value was never set or is empty.
    Required,
    /// More values were supplied than the gateway accepts.
    TooMany { max: usize, actual: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    ValueTooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },
    InvalidCharacter {
        field: &'static str,
        character: char,
    },
    UnsupportedMessageType {
        value: String,
    },
    ArgumentMissing {
        field: &'static str,
        reason: MissingReason,
    },
    InvalidPhoneNumber {
        input: String,
    },
}

impl ValidationError {
    pub(crate) fn required(field: &'static str) -> Self {
        Self::ArgumentMissing {
            field,
            reason: MissingReason::Required,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ValueTooLong { field, max, actual } => {
                write!(f, "{field} is too long: {actual} characters (max {max})")
            }
            Self::InvalidCharacter { field, character } => {
                write!(f, "{field} contains unsupported character {character:?}")
            }
            Self::UnsupportedMessageType { value } => {
                write!(f, "unsupported message type: {value}")
            }
            Self::ArgumentMissing {
                field,
                reason: MissingReason::Required,
            } => write!(f, "{field} is required"),
            Self::ArgumentMissing {
                field,
                reason: MissingReason::TooMany { max, actual },
            } => write!(f, "too many {field} values: {actual} (max {max})"),
            Self::InvalidPhoneNumber { input } => write!(f, "invalid phone number: {input}"),
        }
    }
}

impl std::error::Error for ValidationError {}
