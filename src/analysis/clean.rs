use regex::Regex;
use std::sync::LazyLock;

/// Mentions, anything outside `[0-9A-Za-z \t]`, and `scheme://` tokens.
static NOISE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(@[A-Za-z0-9]+)|([^0-9A-Za-z \t])|(\w+://\S+)").expect("static pattern")
});

/// Strip a tweet down to plain words separated by single spaces.
pub fn clean(text: &str) -> String {
    NOISE
        .replace_all(text, " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_clean_output(output: &str) {
        assert!(output
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == ' '));
        assert!(!output.starts_with(' ') && !output.ends_with(' '));
        assert!(!output.contains("  "));
    }

    #[test]
    fn test_mixed_tweet() {
        assert_eq!(
            clean("Check this out! https://x.co @elon #great"),
            "Check this out great"
        );
    }

    #[test]
    fn test_empty() {
        assert_eq!(clean(""), "");
        assert_eq!(clean("   \t\n "), "");
    }

    #[test]
    fn test_mentions_removed_entirely() {
        assert_eq!(clean("@rustlang @tokio_rs thanks"), "rs thanks");
        assert_eq!(clean("hi @bob42!"), "hi");
    }

    #[test]
    fn test_urls_removed() {
        assert_eq!(
            clean("docs at https://doc.rust-lang.org/std/ and ftp://files.example.com/a.txt"),
            "docs at and"
        );
    }

    #[test]
    fn test_whitespace_collapsed() {
        assert_eq!(clean("  so\t\tmuch\n\nspace  "), "so much space");
    }

    #[test]
    fn test_non_ascii_dropped() {
        assert_eq!(clean("caf\u{e9} \u{1f600} na\u{ef}ve"), "caf na ve");
    }

    #[test]
    fn test_output_properties() {
        let inputs = [
            "RT @user: wow!!! http://t.co/abc #rust\u{1f980} is <great>",
            "email me: a@b.com",
            "ends with url https://example.com/path?q=1",
            "tabs\tand\r\nnewlines",
            "@@@ ::// ##",
        ];
        for input in inputs {
            let output = clean(input);
            assert_clean_output(&output);
            assert!(!output.contains("://"));
            assert!(!output.contains('@'));
        }
    }

    #[test]
    fn test_idempotent() {
        let once = clean("Loving the new release!! @dev https://t.co/x");
        assert_eq!(clean(&once), once);
    }
}
