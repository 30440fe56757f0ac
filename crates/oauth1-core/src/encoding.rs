//! Percent-encoding and Base64 rules used by OAuth 1.0a (RFC 5849 Section 3.6).

use base64::Engine;
use base64::prelude::BASE64_STANDARD;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str};

/// OAuth unreserved characters: A-Z a-z 0-9 - . _ ~
const OAUTH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encode every UTF-8 octet outside the unreserved set.
///
/// Space becomes `%20`, never `+`. Already-encoded input is encoded again.
pub fn percent_encode(input: &str) -> String {
    percent_encoding::percent_encode(input.as_bytes(), OAUTH_ENCODE_SET).to_string()
}

/// Standard percent-decoding. Invalid UTF-8 is replaced with U+FFFD.
pub fn percent_decode(input: &str) -> String {
    percent_decode_str(input).decode_utf8_lossy().into_owned()
}

/// Standard Base64 with padding and no line wrapping.
pub fn base64_encode(data: &[u8]) -> String {
    BASE64_STANDARD.encode(data)
}

/// Decode one component of an `application/x-www-form-urlencoded` string.
pub(crate) fn form_decode(input: &str) -> String {
    if input.contains('+') {
        percent_decode(&input.replace('+', " "))
    } else {
        percent_decode(input)
    }
}

/// Split a query string or form body into decoded pairs.
///
/// A name without `=` gets an empty value (RFC 5849 Section 3.4.1.3.1).
pub(crate) fn form_pairs(input: &str) -> Vec<(String, String)> {
    input
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (form_decode(key), form_decode(value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_encode_unreserved() {
        assert_eq!(percent_encode("abc123"), "abc123");
        assert_eq!(percent_encode("ABC"), "ABC");
        assert_eq!(percent_encode("-._~"), "-._~");
    }

    #[test]
    fn test_encode_reserved() {
        assert_eq!(percent_encode(" "), "%20");
        assert_eq!(percent_encode("&"), "%26");
        assert_eq!(percent_encode("="), "%3D");
        assert_eq!(percent_encode("/"), "%2F");
        assert_eq!(percent_encode("+"), "%2B");
        assert_eq!(percent_encode("*"), "%2A");
    }

    #[test]
    fn test_encode_mixed() {
        assert_eq!(percent_encode("a b&c=d"), "a%20b%26c%3Dd");
    }

    #[test]
    fn test_encode_utf8_octets() {
        assert_eq!(percent_encode("\u{e9}"), "%C3%A9");
        assert_eq!(percent_encode("\u{2603}"), "%E2%98%83");
    }

    #[test]
    fn test_encode_does_not_normalize_encoded_input() {
        assert_eq!(percent_encode("%20"), "%2520");
    }

    #[test]
    fn test_decode_roundtrip_printable_ascii() {
        let printable: String = (0x20u8..0x7f).map(char::from).collect();
        assert_eq!(percent_decode(&percent_encode(&printable)), printable);
    }

    #[test]
    fn test_decode_roundtrip_utf8() {
        for input in ["a b&c=d", "caf\u{e9}", "\u{65e5}\u{672c}\u{8a9e}", "\u{1f600} ok"] {
            assert_eq!(percent_decode(&percent_encode(input)), input);
        }
    }

    #[test]
    fn test_decode_keeps_plus() {
        assert_eq!(percent_decode("a+b"), "a+b");
    }

    #[test]
    fn test_base64_padding() {
        assert_eq!(base64_encode(b"f"), "Zg==");
        assert_eq!(base64_encode(b"fo"), "Zm8=");
        assert_eq!(base64_encode(b"foo"), "Zm9v");
    }

    #[test]
    fn test_base64_not_wrapped() {
        let encoded = base64_encode(&[0xAB; 200]);
        assert!(!encoded.contains('\n'));
    }

    #[test]
    fn test_form_pairs() {
        let pairs = form_pairs("file=vacation.jpg&size=original&q=a+b%21&flag");
        assert_eq!(
            pairs,
            vec![
                ("file".to_owned(), "vacation.jpg".to_owned()),
                ("size".to_owned(), "original".to_owned()),
                ("q".to_owned(), "a b!".to_owned()),
                ("flag".to_owned(), String::new()),
            ]
        );
    }

    #[test]
    fn test_form_pairs_skips_empty_segments() {
        assert_eq!(form_pairs("&&a=1&"), vec![("a".to_owned(), "1".to_owned())]);
        assert!(form_pairs("").is_empty());
    }
}
