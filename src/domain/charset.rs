/// Punctuation the gateway transmits unchanged on the 7-bit route.
const SAFE_PUNCTUATION: &str = "-/|_*#.,;:<>?{}&()[]`=@'\"!+%^$";

/// Space, tab, line feed, carriage return, vertical tab and form feed.
const SAFE_WHITESPACE: &str = " \t\n\r\u{0B}\u{0C}";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Character set accepted on the plain-text (7-bit) route.
///
/// The same alphabet decides both whether a body must be sent as Unicode and whether a
/// plain-text body passes validation, so the two checks can never disagree.
pub struct Alphabet {
    extra: &'static str,
}

impl Alphabet {
    /// ASCII letters, digits, whitespace and common punctuation. This is the default.
    pub const GSM_SAFE: Self = Self { extra: "" };

    /// [`Alphabet::GSM_SAFE`] plus the accented Latin letters some 7-bit routes accept.
    pub const LATIN_ACCENTS: Self = Self {
        extra: "éçèàïüûôâêëö",
    };

    /// Returns `true` if `ch` can be sent on the plain-text route.
    pub fn contains(&self, ch: char) -> bool {
        ch.is_ascii_alphanumeric()
            || SAFE_WHITESPACE.contains(ch)
            || SAFE_PUNCTUATION.contains(ch)
            || self.extra.contains(ch)
    }

    /// First character of `text` outside this alphabet, if any.
    pub fn first_unsupported(&self, text: &str) -> Option<char> {
        text.chars().find(|&ch| !self.contains(ch))
    }

    /// Returns `true` when `text` has at least one character outside this alphabet and
    /// therefore has to travel as 16-bit Unicode.
    pub fn requires_unicode(&self, text: &str) -> bool {
        self.first_unsupported(text).is_some()
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::GSM_SAFE
    }
}

/// Classify `text` against the default [`Alphabet`].
pub fn requires_unicode(text: &str) -> bool {
    Alphabet::default().requires_unicode(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_safe_text_stays_plain() {
        for text in [
            "Hello world",
            "Order #42: 3 x 10.50 = 31.50!",
            "mail me @ home (or not) [ok] {yes} <no>?",
            "line one\nline two\ttabbed\r\n",
            "50% off + free_shipping | a/b; c:d ^ $5 `q` 'x' \"y\" & more",
        ] {
            assert!(!requires_unicode(text), "{text:?} should be plain text");
        }
    }

    #[test]
    fn characters_outside_the_alphabet_require_unicode() {
        for text in ["héllo", "日本語", "ok 👍", "Привет", "price: 5€", "back\\slash", "~"] {
            assert!(requires_unicode(text), "{text:?} should require unicode");
        }
    }

    #[test]
    fn empty_text_has_nothing_to_escalate() {
        assert!(!requires_unicode(""));
    }

    #[test]
    fn latin_accents_alphabet_admits_listed_letters_only() {
        let alphabet = Alphabet::LATIN_ACCENTS;
        assert!(!alphabet.requires_unicode("héllo çà và"));
        assert!(alphabet.requires_unicode("ñandú"));
        assert_eq!(alphabet.first_unsupported("crème brûlée ñ"), Some('ñ'));
    }

    #[test]
    fn first_unsupported_reports_the_earliest_offender() {
        assert_eq!(Alphabet::GSM_SAFE.first_unsupported("abc é 日"), Some('é'));
        assert_eq!(Alphabet::GSM_SAFE.first_unsupported("abc"), None);
    }
}
