use crate::domain::validation::ValidationError;

use phonenumber::country;

fn check_length(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    let actual = value.chars().count();
    if actual > max {
        return Err(ValidationError::ValueTooLong { field, max, actual });
    }
    Ok(())
}

fn check_charset(
    field: &'static str,
    value: &str,
    allowed: fn(&char) -> bool,
) -> Result<(), ValidationError> {
    match value.chars().find(|ch| !allowed(ch)) {
        Some(character) => Err(ValidationError::InvalidCharacter { field, character }),
        None => Ok(()),
    }
}

/// Shared rule for username and password: non-empty, bounded, ASCII alphanumeric.
fn alphanumeric_credential(
    field: &'static str,
    value: &str,
    max: usize,
) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::required(field));
    }
    check_length(field, value, max)?;
    check_charset(field, value, char::is_ascii_alphanumeric)
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Gateway account username (`username`).
///
/// Invariant: 1..=20 ASCII alphanumeric characters.
pub struct Username(String);

impl Username {
    /// Query field name used by the gateway (`username`).
    pub const FIELD: &'static str = "username";

    /// Maximum number of characters.
    pub const MAX_LEN: usize = 20;

    /// Create a validated [`Username`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        alphanumeric_credential(Self::FIELD, &value, Self::MAX_LEN)?;
        Ok(Self(value))
    }

    /// Borrow the validated username.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, PartialEq, Eq, Hash)]
/// Gateway account password (`password`).
///
/// Invariant: 1..=20 ASCII alphanumeric characters.
pub struct Password(String);

impl Password {
    /// Query field name used by the gateway (`password`).
    pub const FIELD: &'static str = "password";

    /// Maximum number of characters.
    pub const MAX_LEN: usize = 20;

    /// Create a validated [`Password`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        alphanumeric_credential(Self::FIELD, &value, Self::MAX_LEN)?;
        Ok(Self(value))
    }

    /// Borrow the password as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Password(***)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Username and password pair sent with every gateway call.
pub struct Credentials {
    username: Username,
    password: Password,
}

impl Credentials {
    /// Validate both parts.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            username: Username::new(username)?,
            password: Password::new(password)?,
        })
    }

    pub fn from_parts(username: Username, password: Password) -> Self {
        Self { username, password }
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn password(&self) -> &Password {
        &self.password
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Recipient number as sent to the gateway (`mno`).
///
/// Invariant: 1..=20 ASCII digits. International numbers use the `00` prefix
/// instead of `+`; parse into [`PhoneNumber`] and convert if you have an E.164 value.
pub struct MobileNumber(String);

impl MobileNumber {
    /// Query field name used by the gateway (`mno`).
    pub const FIELD: &'static str = "mno";

    /// Maximum number of digits.
    pub const MAX_LEN: usize = 20;

    /// Create a validated [`MobileNumber`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::required(Self::FIELD));
        }
        check_length(Self::FIELD, &value, Self::MAX_LEN)?;
        check_charset(Self::FIELD, &value, char::is_ascii_digit)?;
        Ok(Self(value))
    }

    /// Digits as sent to the gateway.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<PhoneNumber> for MobileNumber {
    /// Rewrite the E.164 form (`+447911123456`) into the gateway's `00447911123456` form.
    fn from(value: PhoneNumber) -> Self {
        let digits = value.e164.trim_start_matches('+');
        Self(format!("00{digits}"))
    }
}

#[derive(Debug, Clone)]
/// Parsed phone number with an E.164 representation.
///
/// Equality and hashing are based on the E.164 form.
pub struct PhoneNumber {
    raw: String,
    e164: String,
    parsed: phonenumber::PhoneNumber,
}

impl PhoneNumber {
    /// Parse and normalize a phone number into E.164.
    ///
    /// `default_region` is used when the input does not contain an explicit country prefix.
    pub fn parse(
        default_region: Option<country::Id>,
        input: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let input = input.into();
        let raw = input.trim().to_owned();
        if raw.is_empty() {
            return Err(ValidationError::required(MobileNumber::FIELD));
        }

        let parsed = phonenumber::parse(default_region, &raw)
            .map_err(|_| ValidationError::InvalidPhoneNumber { input: raw.clone() })?;

        let e164 = phonenumber::format(&parsed)
            .mode(phonenumber::Mode::E164)
            .to_string();

        Ok(Self { raw, e164, parsed })
    }

    /// Raw input after trimming.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Normalized E.164 representation.
    pub fn e164(&self) -> &str {
        &self.e164
    }

    /// The parsed phone number from the `phonenumber` crate.
    pub fn parsed(&self) -> &phonenumber::PhoneNumber {
        &self.parsed
    }
}

impl PartialEq for PhoneNumber {
    fn eq(&self, other: &Self) -> bool {
        self.e164 == other.e164
    }
}

impl Eq for PhoneNumber {}

impl std::hash::Hash for PhoneNumber {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.e164.hash(state);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Sender identity shown on the handset (`sid`).
///
/// Invariant: either up to 16 digits (a phone number or short code) or up to 11 ASCII
/// alphanumeric characters (a brand name).
pub struct SenderId(String);

impl SenderId {
    /// Query field name used by the gateway (`sid`).
    pub const FIELD: &'static str = "sid";

    /// Maximum length of a numeric sender id.
    pub const MAX_NUMERIC_LEN: usize = 16;
    /// Maximum length of an alphanumeric sender id.
    pub const MAX_ALPHANUMERIC_LEN: usize = 11;

    /// Create a validated [`SenderId`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::required(Self::FIELD));
        }

        if value.chars().all(|ch| ch.is_ascii_digit()) {
            check_length(Self::FIELD, &value, Self::MAX_NUMERIC_LEN)?;
        } else {
            check_charset(Self::FIELD, &value, char::is_ascii_alphanumeric)?;
            check_length(Self::FIELD, &value, Self::MAX_ALPHANUMERIC_LEN)?;
        }
        Ok(Self(value))
    }

    /// Returns `true` for the numeric form.
    pub fn is_numeric(&self) -> bool {
        self.0.chars().all(|ch| ch.is_ascii_digit())
    }

    /// Borrow the validated sender id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Status code the gateway returns in place of a result.
///
/// The code is kept as text because leading zeros are significant (`00` and `0020` differ).
/// Unknown codes are preserved as-is.
pub struct GatewayStatusCode(String);

impl GatewayStatusCode {
    /// Wrap a code exactly as returned by the gateway.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Returns `true` when `token` has the shape of a gateway status code.
    pub(crate) fn looks_like_code(token: &str) -> bool {
        (2..=4).contains(&token.len())
            && token.starts_with("00")
            && token.bytes().all(|b| b.is_ascii_digit())
    }

    /// The code as returned by the gateway.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Map this code to a known variant, if one exists.
    pub fn known(&self) -> Option<KnownGatewayStatusCode> {
        KnownGatewayStatusCode::from_code(&self.0)
    }

    /// Returns `true` if the credentials were rejected.
    pub fn is_auth_error(&self) -> bool {
        self.known() == Some(KnownGatewayStatusCode::InvalidCredentials)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
/// Known gateway status codes.
pub enum KnownGatewayStatusCode {
    InvalidCredentials,
    InsufficientCredit,
    InvalidSenderId,
    InvalidMobileNumber,
    NetworkNotSupported,
    InvalidMessage,
    InvalidQuantity,
    NetworkNotCovered,
}

impl KnownGatewayStatusCode {
    /// Convert a raw gateway code into a known variant.
    pub fn from_code(code: &str) -> Option<Self> {
        Some(match code {
            "00" => Self::InvalidCredentials,
            "0020" => Self::InsufficientCredit,
            "0030" => Self::InvalidSenderId,
            "0041" => Self::InvalidMobileNumber,
            "0042" => Self::NetworkNotSupported,
            "0050" => Self::InvalidMessage,
            "0060" => Self::InvalidQuantity,
            "0066" => Self::NetworkNotCovered,
            _ => return None,
        })
    }
}
