use std::collections::{HashMap, HashSet};

use lazy_static::lazy_static;
use regex::Regex;

use super::normalizer::LabelNormalizer;
use crate::galaxy::ClusterEntry;

lazy_static! {
    // Parenthesized or square-bracketed qualifier segments, e.g. the
    // "(Windows)" in "BlackMatter (Windows)"
    static ref BRACKET_QUALIFIER: Regex = Regex::new(r"[\(\[].*?[\)\]]").unwrap();
}

/// Remove bracketed qualifier segments from a display value.
pub(crate) fn strip_qualifier(value: &str) -> String {
    BRACKET_QUALIFIER
        .replace_all(value, "")
        .trim_matches(' ')
        .to_string()
}

/// Immutable per-galaxy lookup structure mapping normalized labels to
/// cluster entries.
///
/// Entries keep their position in the galaxy's `values` array; that
/// registration order is the tie-break order wherever one candidate must be
/// picked deterministically.
#[derive(Debug)]
pub struct GalaxyIndex {
    entries: Vec<ClusterEntry>,
    by_norm_label: HashMap<String, usize>,
}

impl GalaxyIndex {
    /// Build the index for one galaxy.
    ///
    /// Never fails: entries without synonyms or metadata simply contribute
    /// fewer keys.
    pub fn build(values: &[ClusterEntry], normalizer: &LabelNormalizer) -> Self {
        let entries: Vec<ClusterEntry> = values.to_vec();
        let mut by_norm_label: HashMap<String, usize> = HashMap::new();

        // First pass: canonical values. Track every display value and its
        // qualifier-stripped form so a synonym that spells out a sibling
        // entry (e.g. "BlackMatter" listed as a synonym of DarkSide while
        // "BlackMatter (Windows)" exists) is not indexed and cannot shadow
        // that sibling.
        let mut unique_labels: HashSet<String> = HashSet::new();
        for (idx, entry) in entries.iter().enumerate() {
            by_norm_label.insert(normalizer.normalize(&entry.value), idx);
            unique_labels.insert(entry.value.clone());
            unique_labels.insert(strip_qualifier(&entry.value));
        }

        // Second pass: synonyms. On key collision the synonym wins, even
        // over a canonical key from the first pass; downstream data relies
        // on these historical merge semantics.
        let mut by_norm_synonym: HashMap<String, usize> = HashMap::new();
        for (idx, entry) in entries.iter().enumerate() {
            for synonym in &entry.meta.synonyms {
                if !unique_labels.contains(synonym) {
                    by_norm_synonym.insert(normalizer.normalize(synonym), idx);
                }
            }
        }
        by_norm_label.extend(by_norm_synonym);

        Self {
            entries,
            by_norm_label,
        }
    }

    /// Look up the entry position registered for a normalized label.
    pub fn lookup(&self, normalized: &str) -> Option<usize> {
        self.by_norm_label.get(normalized).copied()
    }

    /// The entry at a registration position returned by [`lookup`] or
    /// [`normalized_keys`].
    ///
    /// [`lookup`]: GalaxyIndex::lookup
    /// [`normalized_keys`]: GalaxyIndex::normalized_keys
    pub fn entry(&self, idx: usize) -> &ClusterEntry {
        &self.entries[idx]
    }

    /// Every normalized key with the registration position of its entry.
    pub fn normalized_keys(&self) -> impl Iterator<Item = (&str, usize)> {
        self.by_norm_label.iter().map(|(k, idx)| (k.as_str(), *idx))
    }

    pub fn len(&self) -> usize {
        self.by_norm_label.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_norm_label.is_empty()
    }
}
