//! Response header values for streamed downloads.

/// Stored packages never change under a given key.
pub const CACHE_CONTROL: &str = "public, max-age=31536000, immutable";

/// Percent-encode everything except `A-Z a-z 0-9 - _ . ! ~ * ' ( )`.
#[must_use]
pub fn encode_uri_component(input: &str) -> String {
    const UNRESERVED: &[u8] = b"-_.!~*'()";

    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        if byte.is_ascii_alphanumeric() || UNRESERVED.contains(&byte) {
            out.push(char::from(byte));
        } else {
            out.push_str(&format!("%{byte:02X}"));
        }
    }
    out
}

/// `Content-Disposition` forcing a download under the original name.
#[must_use]
pub fn content_disposition(file_name: &str) -> String {
    format!("attachment; filename=\"{}\"", encode_uri_component(file_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_encode_uri_component() {
        assert_eq!(encode_uri_component("app-release.apk"), "app-release.apk");
        assert_eq!(encode_uri_component("my app (1).apk"), "my%20app%20(1).apk");
        assert_eq!(encode_uri_component("a\"b;c.ipa"), "a%22b%3Bc.ipa");
        assert_eq!(encode_uri_component("é.apk"), "%C3%A9.apk");
    }

    #[test]
    fn test_content_disposition() {
        assert_eq!(
            content_disposition("Notes App.apk"),
            "attachment; filename=\"Notes%20App.apk\""
        );
    }

    proptest! {
        #[test]
        fn prop_encoded_is_header_safe(input in ".*") {
            let encoded = encode_uri_component(&input);
            prop_assert!(encoded.is_ascii());
            prop_assert!(!encoded.contains('"'));
            prop_assert!(!encoded.contains(' '));
        }
    }
}
