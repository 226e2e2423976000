//! RFC 3986 percent-encoding as required by OAuth 1.0a (RFC 5849 §3.6)

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use super::error::SigningError;

/// Everything except the unreserved set `A-Z a-z 0-9 - . _ ~`
const OAUTH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encode a string for use in a signature base string or header
///
/// Non-ASCII input is encoded byte-wise from its UTF-8 form with uppercase
/// hex digits. Space becomes `%20`, never `+`.
pub fn percent_encode(input: &str) -> String {
    utf8_percent_encode(input, OAUTH_ENCODE_SET).to_string()
}

/// Reverse [`percent_encode`]
pub fn percent_decode(input: &str) -> Result<String, SigningError> {
    percent_decode_str(input)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|e| SigningError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unreserved_characters_pass_through() {
        let unreserved = "ABCXYZabcxyz0123456789-._~";
        assert_eq!(percent_encode(unreserved), unreserved);
    }

    #[test]
    fn test_reserved_characters_are_encoded() {
        assert_eq!(percent_encode("a b"), "a%20b");
        assert_eq!(percent_encode("a+b"), "a%2Bb");
        assert_eq!(percent_encode("a&b=c"), "a%26b%3Dc");
        assert_eq!(percent_encode("100%"), "100%25");
        assert_eq!(percent_encode("!*'()"), "%21%2A%27%28%29");
        assert_eq!(
            percent_encode("https://api.twitter.com/2/tweets"),
            "https%3A%2F%2Fapi.twitter.com%2F2%2Ftweets"
        );
    }

    #[test]
    fn test_utf8_is_encoded_bytewise_uppercase() {
        assert_eq!(percent_encode("☃"), "%E2%98%83");
        assert_eq!(percent_encode("é"), "%C3%A9");
    }

    #[test]
    fn test_round_trip() {
        let samples = [
            "",
            "plain",
            "a&b=c d%e",
            "Hello Ladies + Gentlemen, a signed OAuth request!",
            "ünïcödé & emoji 🎮 = 100%",
            "%20 already encoded",
        ];
        for sample in samples {
            assert_eq!(percent_decode(&percent_encode(sample)).unwrap(), sample);
        }
    }

    #[test]
    fn test_decode_rejects_invalid_utf8() {
        assert!(matches!(
            percent_decode("%FF%FE"),
            Err(SigningError::Decode(_))
        ));
    }
}
