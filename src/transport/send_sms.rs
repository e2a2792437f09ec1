use url::form_urlencoded;

use super::{GatewayReply, TransportError, classify_body};
use crate::domain::{
    MessageBody, MessageType, MobileNumber, Password, SendSms, SendSmsResponse, SenderId,
    SmsDraft, Username, ValidationError, unicode,
};

const FLASH_FIELD: &str = "fl";

/// Escape the characters the gateway reserves inside `msg`.
///
/// `%` is handled in the same pass as the others, so the `%` introduced by an escape is never
/// escaped again.
pub fn escape_reserved(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '%' => out.push_str("%25"),
            '&' => out.push_str("%26"),
            '+' => out.push_str("%2B"),
            '#' => out.push_str("%23"),
            '=' => out.push_str("%3D"),
            '\n' => out.push_str("%0A"),
            other => out.push(other),
        }
    }
    out
}

/// Wire form of a validated body (`msg`).
///
/// The body is escaped first. Unicode bodies are then hex-encoded; plain-text bodies are
/// form-urlencoded, so a space becomes `+`.
pub fn encode_message(body: &MessageBody) -> String {
    let escaped = escape_reserved(body.as_str());
    match body.message_type() {
        MessageType::Unicode => unicode::encode(&escaped),
        MessageType::PlainText => form_urlencoded::byte_serialize(escaped.as_bytes()).collect(),
    }
}

/// Serialize a validated request in the gateway's fixed key order:
/// `username, password, mno, [sid], msg, mt, fl`.
pub fn encode_send_sms_query(request: &SendSms) -> String {
    let mno = request
        .recipients()
        .iter()
        .map(MobileNumber::as_str)
        .collect::<Vec<_>>()
        .join(",");

    let mut pairs = vec![
        (
            Username::FIELD,
            request.credentials().username().as_str().to_owned(),
        ),
        (
            Password::FIELD,
            request.credentials().password().as_str().to_owned(),
        ),
        (MobileNumber::FIELD, mno),
    ];
    if let Some(sender_id) = request.sender_id() {
        pairs.push((SenderId::FIELD, sender_id.as_str().to_owned()));
    }
    pairs.push((MessageBody::FIELD, encode_message(request.body())));
    pairs.push((
        MessageType::FIELD,
        request.message_type().code().to_string(),
    ));
    pairs.push((FLASH_FIELD, u8::from(request.is_flash()).to_string()));

    pairs
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&")
}

/// Validate `draft` and serialize it. Nothing is assembled when validation fails.
pub fn assemble_send_query(draft: &SmsDraft) -> Result<String, ValidationError> {
    let request = draft.build()?;
    Ok(encode_send_sms_query(&request))
}

/// Decode a send reply: message ids (optionally prefixed with `OK:`) or a status code.
pub fn decode_send_sms_response(
    body: &str,
) -> Result<GatewayReply<SendSmsResponse>, TransportError> {
    let trimmed = match classify_body(body)? {
        GatewayReply::Ok(trimmed) => trimmed,
        GatewayReply::Status(code) => return Ok(GatewayReply::Status(code)),
    };

    let ids = strip_ok_prefix(trimmed);
    let message_ids = ids
        .split(|ch: char| ch == ',' || ch.is_whitespace())
        .filter(|id| !id.is_empty())
        .map(str::to_owned)
        .collect::<Vec<_>>();

    if message_ids.is_empty() {
        return Err(TransportError::NoMessageIds {
            body: trimmed.to_owned(),
        });
    }

    Ok(GatewayReply::Ok(SendSmsResponse {
        message_ids,
        raw: trimmed.to_owned(),
    }))
}

fn strip_ok_prefix(body: &str) -> &str {
    match body.get(..2) {
        Some(prefix) if prefix.eq_ignore_ascii_case("OK") => {
            body[2..].trim_start_matches(':').trim_start()
        }
        _ => body,
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::{
        Credentials, GatewayStatusCode, KnownGatewayStatusCode, MessageType, SmsDraft,
        ValidationError,
    };

    use super::*;

    fn draft(body: &str) -> SmsDraft {
        let credentials = Credentials::new("tester1", "secret1").unwrap();
        let mut draft = SmsDraft::with_credentials(&credentials);
        draft
            .set_mobile_numbers(["00447911123456"])
            .unwrap()
            .set_body(body);
        draft
    }

    #[test]
    fn escape_replaces_every_reserved_character() {
        let escaped = escape_reserved("50% & 1+1 #tag a=b\nnext");
        assert_eq!(escaped, "50%25 %26 1%2B1 %23tag a%3Db%0Anext");
        for reserved in ['&', '+', '#', '=', '\n'] {
            assert!(!escaped.contains(reserved), "{reserved:?} left unescaped");
        }
        let stray_percent = escaped.match_indices('%').any(|(idx, _)| {
            !matches!(
                escaped.get(idx + 1..idx + 3),
                Some("25" | "26" | "2B" | "23" | "3D" | "0A")
            )
        });
        assert!(!stray_percent);
    }

    #[test]
    fn escape_does_not_double_escape_percent() {
        assert_eq!(escape_reserved("%26"), "%2526");
        assert_eq!(escape_reserved("plain"), "plain");
    }

    #[test]
    fn plain_text_query_has_fixed_key_order() {
        let query = assemble_send_query(&draft("Hello world")).unwrap();
        assert_eq!(
            query,
            "username=tester1&password=secret1&mno=00447911123456&msg=Hello+world&mt=0&fl=0"
        );
        assert!(query.ends_with("&msg=Hello+world&mt=0&fl=0"));
    }

    #[test]
    fn sender_id_and_flash_are_included_when_set() {
        let mut draft = draft("Hi");
        draft
            .append_mobile_number("00447911654321")
            .unwrap()
            .set_sender_id("MyShop")
            .unwrap()
            .set_flash(true);
        let query = assemble_send_query(&draft).unwrap();
        assert_eq!(
            query,
            "username=tester1&password=secret1&mno=00447911123456,00447911654321\
             &sid=MyShop&msg=Hi&mt=0&fl=1"
        );
    }

    #[test]
    fn plain_text_body_is_escaped_then_form_encoded() {
        let query = assemble_send_query(&draft("a+b=c & 10%")).unwrap();
        assert!(query.ends_with("&msg=a%252Bb%253Dc+%2526+10%2525&mt=0&fl=0"));
    }

    #[test]
    fn unicode_body_is_hex_encoded() {
        let query = assemble_send_query(&draft("héllo")).unwrap();
        assert!(query.ends_with("&msg=006800E9006C006C006F&mt=1&fl=0"));

        let msg = query
            .split('&')
            .find_map(|pair| pair.strip_prefix("msg="))
            .unwrap();
        assert_eq!(msg.len() % 4, 0);
        assert!(msg.chars().all(|ch| ch.is_ascii_digit() || ch.is_ascii_uppercase()));
    }

    #[test]
    fn unicode_body_is_escaped_before_hex_encoding() {
        let mut draft = draft("x");
        draft.set_body_with_type("a&b", MessageType::Unicode);
        let query = assemble_send_query(&draft).unwrap();
        let expected = unicode::encode("a%26b");
        assert!(query.ends_with(&format!("&msg={expected}&mt=1&fl=0")));
    }

    #[test]
    fn assembling_twice_yields_identical_output() {
        let draft = draft("50% off & more");
        let request = draft.build().unwrap();
        assert_eq!(encode_send_sms_query(&request), encode_send_sms_query(&request));
        assert_eq!(request.body().as_str(), "50% off & more");
    }

    #[test]
    fn assemble_fails_fast_on_invalid_draft() {
        assert_eq!(
            assemble_send_query(&draft("")).unwrap_err(),
            ValidationError::required(MessageBody::FIELD)
        );
    }

    #[test]
    fn decode_send_response_collects_message_ids() {
        let reply = decode_send_sms_response("OK: 4a1b2c3d, 5e6f7a8b\n").unwrap();
        match reply {
            GatewayReply::Ok(response) => {
                assert_eq!(response.message_ids, vec!["4a1b2c3d", "5e6f7a8b"]);
                assert_eq!(response.raw, "OK: 4a1b2c3d, 5e6f7a8b");
            }
            other => panic!("unexpected reply: {other:?}"),
        }

        if let GatewayReply::Ok(response) = decode_send_sms_response("123456789").unwrap() {
            assert_eq!(response.message_ids, vec!["123456789"]);
        } else {
            panic!("expected message ids");
        }
    }

    #[test]
    fn decode_send_response_maps_status_codes() {
        let reply = decode_send_sms_response(" 0020 ").unwrap();
        assert_eq!(reply, GatewayReply::Status(GatewayStatusCode::new("0020")));

        if let GatewayReply::Status(code) = decode_send_sms_response("00").unwrap() {
            assert_eq!(code.known(), Some(KnownGatewayStatusCode::InvalidCredentials));
        } else {
            panic!("expected status reply");
        }
    }

    #[test]
    fn decode_send_response_rejects_empty_bodies() {
        assert!(matches!(
            decode_send_sms_response("  "),
            Err(TransportError::EmptyBody)
        ));
        assert!(matches!(
            decode_send_sms_response("OK:"),
            Err(TransportError::NoMessageIds { .. })
        ));
    }
}
