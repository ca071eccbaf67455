use serde_json::json;

use super::Discerner;
use crate::galaxy::{Galaxy, GalaxyStore};

fn malpedia_galaxy() -> Galaxy {
    serde_json::from_value(json!({
        "type": "malpedia",
        "name": "Malpedia",
        "values": [
            {"value": "FastCash", "meta": {"synonyms": []}},
            {"value": "888 RAT", "meta": {"synonyms": ["888 ROT"]}},
            {"value": "777 RAT (Win)", "meta": {"synonyms": []}},
            {"value": "777 RAT (ELF)", "meta": {"synonyms": []}},
            {"value": "BlackMatter (ELF)", "meta": {"synonyms": []}},
            {"value": "BlackMatter (Windows)", "meta": {"synonyms": []}},
            {"value": "DarkSide", "meta": {"synonyms": ["BlackMatter"]}},
            {"value": "Venom RAT", "meta": {"synonyms": []}},
            {"value": "QNAPCrypt", "meta": {"synonyms": ["ech0raix"]}},
            {"value": "XAgent", "meta": {"synonyms": []}},
        ],
    }))
    .unwrap()
}

fn discerner() -> Discerner {
    Discerner::new("malpedia", &malpedia_galaxy(), "malpedia")
}

#[test]
fn test_exact_match() {
    let d = discerner();
    let result = d.discern("888 RAT", false, None).unwrap();
    assert_eq!(result.discerned_name, "888 RAT");
    assert_eq!(result.label, "888 RAT");
    assert_eq!(result.source, "malpedia");
    assert_eq!(result.galaxy, "malpedia");
}

#[test]
fn test_synonym_resolves_to_canonical() {
    let d = discerner();
    let result = d.discern("888 ROT", false, None).unwrap();
    assert_eq!(result.discerned_name, "888 RAT");
    assert_eq!(result.entry.meta.synonyms, vec!["888 ROT"]);
}

#[test]
fn test_exact_match_is_case_and_separator_insensitive() {
    let d = discerner();
    for label in ["888-RAT", "888_rat", "  888 rat  ", "888RAT"] {
        assert_eq!(d.discern(label, false, None).unwrap().discerned_name, "888 RAT");
    }
}

#[test]
fn test_no_partial_matches_without_opt_in() {
    let d = discerner();
    assert!(d.discern("888", false, None).is_err());
    assert!(d.discern("blackmatter", false, None).is_err());
}

#[test]
fn test_partial_match() {
    let d = discerner();
    let result = d.discern("888", true, None).unwrap();
    assert_eq!(result.discerned_name, "888 RAT");
}

#[test]
fn test_partial_match_tolerates_trailing_typo() {
    let d = discerner();
    let result = d.discern("fastcashx", true, None).unwrap();
    assert_eq!(result.discerned_name, "FastCash");
}

#[test]
fn test_class_word_removal_enables_match() {
    // "Loader" is a generic class word; stripping it leaves "venom",
    // which partial-matches the Venom RAT key.
    let d = discerner();
    let result = d.discern("Venom Loader", true, None).unwrap();
    assert_eq!(result.discerned_name, "Venom RAT");
}

#[test]
fn test_generic_class_words_never_resolve() {
    let d = discerner();
    assert!(d.discern("Malware", true, None).is_err());
    assert!(d.discern("trojan", true, None).is_err());
    // separators inside a class word survive token filtering but still hit
    // the generic guard after normalization
    assert!(d.discern("mal-ware", true, None).is_err());
}

#[test]
fn test_blank_input_never_resolves() {
    let d = discerner();
    assert!(d.discern("", true, None).is_err());
    assert!(d.discern("   ", true, None).is_err());
    assert!(d.discern("!!!", true, None).is_err());
}

#[test]
fn test_exact_match_precedence_over_partial() {
    // an exact key hit must return that single entry even when close
    // siblings exist and partial matching is enabled
    let d = discerner();
    let result = d.discern("777 RAT (Win)", true, None).unwrap();
    assert_eq!(result.discerned_name, "777 RAT (Win)");
}

#[test]
fn test_bracket_disjoint_entries_stay_distinct() {
    // querying the shared stem finds both qualified entries; the synonym
    // "BlackMatter" on DarkSide must not have collapsed them
    let d = discerner();
    let result = d.discern("blackmatter", true, None).unwrap();
    assert_eq!(result.discerned_name, "BlackMatter (ELF)");
    let result = d.discern("777 RAT", true, None).unwrap();
    assert_eq!(result.discerned_name, "777 RAT (Win)");
}

#[test]
fn test_multi_candidate_fallback_is_deterministic() {
    let d = discerner();
    for _ in 0..20 {
        let result = d.discern("777 RAT", true, None).unwrap();
        assert_eq!(result.discerned_name, "777 RAT (Win)");
    }
}

#[test]
fn test_hint_disambiguation() {
    let d = discerner();
    let result = d.discern("blackmatter", true, Some("elf")).unwrap();
    assert_eq!(result.discerned_name, "BlackMatter (ELF)");
    let result = d.discern("blackmatter", true, Some("win")).unwrap();
    assert_eq!(result.discerned_name, "BlackMatter (Windows)");
    let result = d.discern("777 RAT", true, Some("elf")).unwrap();
    assert_eq!(result.discerned_name, "777 RAT (ELF)");
}

#[test]
fn test_hint_is_case_insensitive() {
    let d = discerner();
    let result = d.discern("blackmatter", true, Some("ELF")).unwrap();
    assert_eq!(result.discerned_name, "BlackMatter (ELF)");
}

#[test]
fn test_unmatched_hint_is_ignored() {
    // the hint occurs in no candidate, so the default choice stands
    let d = discerner();
    let result = d.discern("777 RAT", true, Some("zzz")).unwrap();
    assert_eq!(result.discerned_name, "777 RAT (Win)");
}

#[test]
fn test_hint_has_no_effect_on_single_candidate() {
    let d = discerner();
    let result = d.discern("fastcash", true, Some("elf")).unwrap();
    assert_eq!(result.discerned_name, "FastCash");
}

#[test]
fn test_prefix_guard_rejects_suffix_similarity() {
    // "agent" scores high against the XAgent key on similarity alone, but
    // shares no leading substring with it
    let d = discerner();
    assert!(d.discern("agent", true, None).is_err());
}

#[test]
fn test_short_fragment_does_not_fuzzy_match_long_key() {
    let d = discerner();
    assert!(d.discern("mat", true, None).is_err());
    assert!(d.discern("rat", true, None).is_err());
}

#[test]
fn test_synonym_exact_hit() {
    let d = discerner();
    let result = d.discern("ech0raix", true, None).unwrap();
    assert_eq!(result.discerned_name, "QNAPCrypt");
}

#[test]
fn test_tag_format() {
    let d = discerner();
    let result = d.discern("888 ROT", false, None).unwrap();
    assert_eq!(result.tag(), "misp-galaxy:malpedia=\"888 RAT\"");
}

#[test]
fn test_aggregation_isolates_failures_per_galaxy() {
    let tool_galaxy: Galaxy = serde_json::from_value(json!({
        "type": "tool",
        "name": "Tool",
        "values": [
            {"value": "Cobalt Strike", "meta": {"synonyms": ["cobaltstrike"]}},
        ],
    }))
    .unwrap();

    let mut store = GalaxyStore::new();
    store.insert("malpedia", malpedia_galaxy());
    store.insert("tool", tool_galaxy);
    let discerners = store.create_discerners(Some("misp"));
    assert_eq!(discerners.len(), 2);

    // "888 RAT" exists only in malpedia; the tool galaxy's NoMatch is
    // swallowed per galaxy
    let results = crate::get_discernments(&discerners, "888 RAT", false, None);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].galaxy, "malpedia");
    assert_eq!(results[0].source, "misp");

    let tags = crate::get_discerned_tags(&discerners, "Cobalt Strike", false, None);
    assert_eq!(tags, vec!["misp-galaxy:tool=\"Cobalt Strike\""]);

    assert!(crate::get_discernments(&discerners, "", true, None).is_empty());
    assert!(crate::get_discernments(&discerners, "nonexistent", false, None).is_empty());
}
