use regex::Regex;
use std::sync::LazyLock;

static NON_ALPHANUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9]+").expect("valid regex"));

/// Convert free text into a lower camel case identifier token.
///
/// Anything outside `[A-Za-z0-9]` separates words, and words are split again
/// at case boundaries (`VerifiedUser` -> `verified`, `user`; acronym runs such
/// as `HTMLParser` stay together as `html`, `parser`).
pub fn to_camel_case(input: &str) -> String {
    let cleaned = NON_ALPHANUMERIC.replace_all(input, " ");
    let mut result = String::with_capacity(cleaned.len());

    let words = cleaned.split_whitespace().flat_map(split_case_boundaries);
    for (index, word) in words.enumerate() {
        let lower = word.to_ascii_lowercase();
        if index == 0 {
            result.push_str(&lower);
        } else {
            let mut chars = lower.chars();
            if let Some(first) = chars.next() {
                result.push(first.to_ascii_uppercase());
                result.push_str(chars.as_str());
            }
        }
    }

    result
}

// Input is ASCII alphanumeric only, so byte offsets are char boundaries.
pub(crate) fn split_case_boundaries(word: &str) -> Vec<&str> {
    let bytes = word.as_bytes();
    let mut parts = Vec::new();
    let mut start = 0;

    for i in 1..bytes.len() {
        let prev = bytes[i - 1];
        let current = bytes[i];
        let next_is_lower = bytes.get(i + 1).is_some_and(|b| b.is_ascii_lowercase());

        let boundary = current.is_ascii_uppercase()
            && (prev.is_ascii_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_ascii_uppercase() && next_is_lower));
        if boundary {
            parts.push(&word[start..i]);
            start = i;
        }
    }

    parts.push(&word[start..]);
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_separators() {
        assert_eq!(to_camel_case("menu-open"), "menuOpen");
        assert_eq!(to_camel_case("user_name"), "userName");
        assert_eq!(to_camel_case("  Submit   Now "), "submitNow");
        assert_eq!(to_camel_case("first.last@mail"), "firstLastMail");
    }

    #[test]
    fn test_case_boundaries() {
        assert_eq!(to_camel_case("VerifiedUser"), "verifiedUser");
        assert_eq!(to_camel_case("HTMLParser"), "htmlParser");
        assert_eq!(to_camel_case("loginBTN"), "loginBtn");
        assert_eq!(to_camel_case("step2Done"), "step2Done");
        assert_eq!(to_camel_case("email"), "email");
    }

    #[test]
    fn test_nothing_usable() {
        assert_eq!(to_camel_case(""), "");
        assert_eq!(to_camel_case("—//—"), "");
        assert_eq!(to_camel_case("日本語"), "");
    }
}
