use std::cmp::Ordering;

use strsim::{jaro_winkler, normalized_levenshtein};

use super::index::GalaxyIndex;
use super::normalizer::LabelNormalizer;
use crate::galaxy::ClusterEntry;

// Jaro-Winkler floor for an indexed key to count as close to the query.
const CLOSE_MATCH_THRESHOLD: f64 = 0.85;

// Shortlist size for close keys, before the prefix filter.
const CLOSE_MATCH_LIMIT: usize = 3;

// A close key must start with at least this share of the query.
const PREFIX_PERCENTAGE: usize = 90;

/// One possible resolution of a query: the entry's display value plus its
/// registration position in the galaxy.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Candidate<'a> {
    pub name: &'a str,
    pub entry: &'a ClusterEntry,
    pub order: usize,
}

/// Find the candidate entries for an already-normalized query.
///
/// The exact path wins outright: an index hit returns a single candidate
/// and the approximate path is never consulted. The approximate path runs
/// only on an index miss with `include_partial_matches` set. Results are
/// ordered by entry registration position and deduplicated per entry.
pub(crate) fn find_candidates<'a>(
    index: &'a GalaxyIndex,
    normalizer: &LabelNormalizer,
    normalized_query: &str,
    include_partial_matches: bool,
) -> Vec<Candidate<'a>> {
    // A blank query or a bare class word never resolves, even when a key
    // happens to exist for it.
    if normalized_query.is_empty() || normalizer.is_generic(normalized_query) {
        return Vec::new();
    }
    if let Some(order) = index.lookup(normalized_query) {
        let entry = index.entry(order);
        return vec![Candidate {
            name: &entry.value,
            entry,
            order,
        }];
    }
    if include_partial_matches {
        return close_candidates(index, normalized_query);
    }
    Vec::new()
}

/// Approximate path: shortlist keys by Jaro-Winkler score, then require
/// each shortlisted key to start with the leading 90% of the query. The
/// prefix filter rejects keys that scored well on a short, uninformative
/// fragment.
fn close_candidates<'a>(index: &'a GalaxyIndex, normalized_query: &str) -> Vec<Candidate<'a>> {
    let mut scored: Vec<(f64, &str, usize)> = index
        .normalized_keys()
        .filter_map(|(key, order)| {
            let score = jaro_winkler(key, normalized_query);
            (score >= CLOSE_MATCH_THRESHOLD).then_some((score, key, order))
        })
        .collect();
    // Best score first; equal scores fall back to registration order, then
    // key text, so the shortlist is reproducible.
    scored.sort_by(|a, b| {
        b.0.partial_cmp(&a.0)
            .unwrap_or(Ordering::Equal)
            .then(a.2.cmp(&b.2))
            .then(a.1.cmp(b.1))
    });
    scored.truncate(CLOSE_MATCH_LIMIT);

    // Normalized keys are pure ASCII, so byte slicing is safe here.
    let prefix_len = normalized_query.len() * PREFIX_PERCENTAGE / 100;
    let prefix = &normalized_query[..prefix_len];
    let mut candidates: Vec<Candidate<'a>> = scored
        .into_iter()
        .filter(|(_, key, _)| key.starts_with(prefix))
        .map(|(_, _, order)| {
            let entry = index.entry(order);
            Candidate {
                name: &entry.value,
                entry,
                order,
            }
        })
        .collect();
    // A canonical key and a synonym key may point at the same entry; report
    // it once.
    candidates.sort_by_key(|c| c.order);
    candidates.dedup_by_key(|c| c.order);
    candidates
}

/// Pick one candidate, optionally steered by a hint.
///
/// The hint is honored only when it occurs, case-insensitively, inside at
/// least one candidate's display value; a hint that matches nothing must
/// not override the default choice. Candidates arrive in registration
/// order, so position 0 is the documented no-hint fallback.
pub(crate) fn select_candidate<'a>(
    candidates: &[Candidate<'a>],
    hint: Option<&str>,
    normalizer: &LabelNormalizer,
) -> Candidate<'a> {
    let hint = match hint {
        Some(h) if candidates.len() > 1 => h,
        _ => return candidates[0],
    };
    let folded_hint = hint.to_lowercase();
    if !candidates
        .iter()
        .any(|c| c.name.to_lowercase().contains(&folded_hint))
    {
        return candidates[0];
    }
    let normalized_hint = normalizer.normalize(hint);
    let mut best = candidates[0];
    let mut best_score = f64::MIN;
    for candidate in candidates {
        let score = normalized_levenshtein(&normalizer.normalize(candidate.name), &normalized_hint);
        // strict comparison keeps the earliest candidate on ties
        if score > best_score {
            best = *candidate;
            best_score = score;
        }
    }
    best
}
