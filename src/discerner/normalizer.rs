use std::collections::HashSet;

/// Generic malware-class words, too common to identify any one family.
///
/// Default denylist for [`LabelNormalizer`]: these tokens are dropped from
/// labels before matching, and a query reduced to one of them never
/// resolves.
pub const GENERIC_CLASS_WORDS: &[&str] = &[
    "encrypted",
    "malware",
    "phishing",
    "ransomware",
    "threat",
    "trojan",
    "backdoor",
    "loader",
    "worm",
    "stealer",
];

/// Canonicalizes labels for comparison.
///
/// Normalization is deterministic and total: two spellings that differ only
/// in casing, separators, or generic class words normalize identically.
#[derive(Debug, Clone)]
pub struct LabelNormalizer {
    denylist: HashSet<String>,
}

impl Default for LabelNormalizer {
    fn default() -> Self {
        Self {
            denylist: GENERIC_CLASS_WORDS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl LabelNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the default denylist, e.g. for a galaxy whose canonical
    /// values legitimately contain class words.
    pub fn with_denylist<I>(denylist: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        Self {
            denylist: denylist
                .into_iter()
                .map(|s| s.as_ref().to_lowercase())
                .collect(),
        }
    }

    /// Whether the string is exactly one of the denylisted class words.
    pub fn is_generic(&self, label: &str) -> bool {
        self.denylist.contains(label)
    }

    /// Normalize a label: trim and lowercase, drop denylisted tokens, then
    /// strip every character that is not an ASCII letter or digit.
    pub fn normalize(&self, label: &str) -> String {
        label
            .trim()
            .to_lowercase()
            .split_whitespace()
            .filter(|token| !self.denylist.contains(*token))
            .flat_map(|token| token.chars())
            .filter(|c| c.is_ascii_alphanumeric())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_and_separator_invariance() {
        let normalizer = LabelNormalizer::new();
        assert_eq!(normalizer.normalize("Black-Matter"), "blackmatter");
        assert_eq!(normalizer.normalize("BLACKMATTER"), "blackmatter");
        assert_eq!(normalizer.normalize("black matter"), "blackmatter");
        assert_eq!(normalizer.normalize(" 888_RAT "), "888rat");
    }

    #[test]
    fn test_idempotent() {
        let normalizer = LabelNormalizer::new();
        for label in ["BlackMatter (ELF)", "888 RAT", "Venom Loader", ""] {
            let once = normalizer.normalize(label);
            assert_eq!(normalizer.normalize(&once), once);
        }
    }

    #[test]
    fn test_class_words_removed() {
        let normalizer = LabelNormalizer::new();
        assert_eq!(normalizer.normalize("Venom Loader"), "venom");
        assert_eq!(normalizer.normalize("Conti ransomware"), "conti");
        assert_eq!(normalizer.normalize("Malware"), "");
        // class word only recognized as a standalone token
        assert_eq!(normalizer.normalize("acbackdoor"), "acbackdoor");
    }

    #[test]
    fn test_custom_denylist() {
        let normalizer = LabelNormalizer::with_denylist(["RAT"]);
        assert_eq!(normalizer.normalize("888 RAT"), "888");
        assert!(normalizer.is_generic("rat"));
        assert!(!normalizer.is_generic("trojan"));
    }
}
