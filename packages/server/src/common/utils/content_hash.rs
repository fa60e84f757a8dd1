use sha2::{Digest, Sha256};

/// Lower-case, strip punctuation and collapse whitespace. Typographic
/// apostrophes fold into `'` so "don’t" stays one word.
///
/// Shared by review de-duplication and the keyword matchers so that
/// "Great   service!!" and "great service" are treated the same.
pub fn normalize_text(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| {
            if matches!(c, '\u{2019}' | '\u{2018}') {
                '\''
            } else if c.is_alphanumeric() || c.is_whitespace() || c == '\'' {
                c
            } else {
                ' '
            }
        })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Hash identifying a review within a company.
///
/// The same text posted on two platforms is two reviews, so the source is
/// part of the hash.
pub fn review_content_hash(source: &str, text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(source.trim().to_lowercase().as_bytes());
    hasher.update(b"\n");
    hasher.update(normalize_text(text).as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_ignores_case_punctuation_and_spacing() {
        assert_eq!(
            normalize_text("  Great   SERVICE!!  Fast-payout "),
            "great service fast payout"
        );
    }

    #[test]
    fn normalization_keeps_apostrophes() {
        assert_eq!(normalize_text("Don't bother."), "don't bother");
        assert_eq!(normalize_text("Don\u{2019}t bother."), "don't bother");
        assert_eq!(normalize_text("\u{2018}Won\u{2019}t\u{2019} help"), "'won't' help");
    }

    #[test]
    fn same_review_same_hash() {
        assert_eq!(
            review_content_hash("trustpilot", "Great service!"),
            review_content_hash("Trustpilot ", "great service")
        );
    }

    #[test]
    fn source_changes_hash() {
        assert_ne!(
            review_content_hash("trustpilot", "Great service"),
            review_content_hash("google", "Great service")
        );
    }

    #[test]
    fn hash_is_sha256_hex() {
        let hash = review_content_hash("yelp", "ok");
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
