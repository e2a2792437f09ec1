//! 16-bit hexadecimal codec used for Unicode (`mt=1`) message bodies.

/// Length of the token the gateway puts in front of hex payloads it returns.
pub const RESPONSE_PREFIX_LEN: usize = 2;

const HEX_DIGITS_PER_UNIT: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    #[error("payload is shorter than the 2-character response prefix")]
    MissingPrefix,

    #[error("hex length {len} is not a multiple of 4")]
    InvalidLength { len: usize },

    #[error("invalid hex digits at offset {offset}")]
    InvalidHex { offset: usize },

    #[error("code units do not form valid UTF-16")]
    InvalidUtf16,
}

/// Encode `text` as big-endian UTF-16 code units, four uppercase hex digits per unit.
///
/// Characters outside the Basic Multilingual Plane become surrogate pairs, so the output is
/// plain UCS-2 for every text the gateway can display.
pub fn encode(text: &str) -> String {
    let mut out = String::with_capacity(text.len() * HEX_DIGITS_PER_UNIT);
    for unit in text.encode_utf16() {
        out.push_str(&format!("{unit:04X}"));
    }
    out
}

/// Decode a payload as returned by the gateway: drop the response prefix, then decode the hex.
pub fn decode(payload: &str) -> Result<String, CodecError> {
    let hex = payload
        .get(RESPONSE_PREFIX_LEN..)
        .ok_or(CodecError::MissingPrefix)?;
    decode_hex(hex)
}

/// Inverse of [`encode`]. Upper- and lowercase digits are accepted.
pub fn decode_hex(hex: &str) -> Result<String, CodecError> {
    if hex.len() % HEX_DIGITS_PER_UNIT != 0 {
        return Err(CodecError::InvalidLength { len: hex.len() });
    }

    let units = hex
        .as_bytes()
        .chunks(HEX_DIGITS_PER_UNIT)
        .enumerate()
        .map(|(idx, chunk)| {
            let offset = idx * HEX_DIGITS_PER_UNIT;
            std::str::from_utf8(chunk)
                .ok()
                .filter(|digits| digits.bytes().all(|b| b.is_ascii_hexdigit()))
                .and_then(|digits| u16::from_str_radix(digits, 16).ok())
                .ok_or(CodecError::InvalidHex { offset })
        })
        .collect::<Result<Vec<u16>, CodecError>>()?;

    String::from_utf16(&units).map_err(|_| CodecError::InvalidUtf16)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_big_endian_uppercase_units() {
        assert_eq!(encode("A"), "0041");
        assert_eq!(encode("héllo"), "006800E9006C006C006F");
        assert_eq!(encode("日本"), "65E5672C");
        assert_eq!(encode(""), "");
    }

    #[test]
    fn encodes_astral_characters_as_surrogate_pairs() {
        assert_eq!(encode("👍"), "D83DDC4D");
    }

    #[test]
    fn decode_hex_inverts_encode() {
        for text in [
            "",
            "plain ascii",
            "héllo wörld",
            "Привет, мир",
            "混合 text 👍🏽",
            "%26 already escaped %0A",
        ] {
            assert_eq!(decode_hex(&encode(text)).unwrap(), text);
        }
    }

    #[test]
    fn decode_hex_accepts_lowercase_digits() {
        assert_eq!(decode_hex("006800e9").unwrap(), "hé");
    }

    #[test]
    fn decode_strips_response_prefix() {
        let payload = format!("OK{}", encode("héllo"));
        assert_eq!(decode(&payload).unwrap(), "héllo");
    }

    #[test]
    fn decode_rejects_short_payload() {
        assert_eq!(decode("O"), Err(CodecError::MissingPrefix));
    }

    #[test]
    fn decode_rejects_length_not_multiple_of_four() {
        assert_eq!(
            decode("OK00410"),
            Err(CodecError::InvalidLength { len: 5 })
        );
        assert_eq!(decode_hex("004"), Err(CodecError::InvalidLength { len: 3 }));
    }

    #[test]
    fn decode_rejects_non_hex_digits() {
        assert_eq!(
            decode_hex("0041zz41"),
            Err(CodecError::InvalidHex { offset: 4 })
        );
        assert_eq!(decode_hex("+041"), Err(CodecError::InvalidHex { offset: 0 }));
    }

    #[test]
    fn decode_rejects_unpaired_surrogate() {
        assert_eq!(decode_hex("D83D0041"), Err(CodecError::InvalidUtf16));
    }
}
