//! The discernment engine: resolves free-text labels (malware families,
//! threat-actor aliases, tool names) to canonical galaxy entries.

pub mod index;
mod matcher;
pub mod normalizer;

#[cfg(test)]
mod tests;

pub use index::GalaxyIndex;
pub use normalizer::{LabelNormalizer, GENERIC_CLASS_WORDS};

use tracing::debug;

use crate::error::NoMatch;
use crate::galaxy::{ClusterEntry, Galaxy};
use crate::{TAG_NAMESPACE, TARGET_DISCERN};

/// The resolved mapping from an input label to one galaxy entry.
///
/// A plain value: produced per query, never updated afterwards.
#[derive(Debug, Clone)]
pub struct Discernment {
    /// Original query label, untouched.
    pub label: String,
    /// Resolved canonical display value.
    pub discerned_name: String,
    /// Where the discerner's galaxy data came from, e.g. "misp".
    pub source: String,
    /// Galaxy name the discerner is bound to, e.g. "malpedia".
    pub galaxy: String,
    /// The galaxy's `type` field, used in the tag string.
    pub galaxy_type: String,
    /// The matched cluster entry, metadata included.
    pub entry: ClusterEntry,
}

impl Discernment {
    /// Tag string consumed verbatim by downstream tagging systems, e.g.
    /// `misp-galaxy:malpedia="888 RAT"`. The embedded double quotes are
    /// part of the format.
    pub fn tag(&self) -> String {
        format!(
            "{}:{}=\"{}\"",
            TAG_NAMESPACE, self.galaxy_type, self.discerned_name
        )
    }
}

/// Discernment engine bound to exactly one galaxy.
///
/// Construction builds the label index once; after that the discerner is
/// immutable, performs no I/O, and can be shared freely across threads.
/// Callers wanting results across several galaxies build one discerner per
/// galaxy (see [`GalaxyStore::create_discerners`]) and merge the results.
///
/// [`GalaxyStore::create_discerners`]: crate::galaxy::GalaxyStore::create_discerners
pub struct Discerner {
    galaxy_name: String,
    galaxy_type: String,
    source: String,
    normalizer: LabelNormalizer,
    index: GalaxyIndex,
}

impl Discerner {
    pub fn new(galaxy_name: &str, galaxy: &Galaxy, source: &str) -> Self {
        Self::with_normalizer(galaxy_name, galaxy, source, LabelNormalizer::new())
    }

    /// Build a discerner with a custom normalizer, e.g. one carrying a
    /// per-galaxy denylist override.
    pub fn with_normalizer(
        galaxy_name: &str,
        galaxy: &Galaxy,
        source: &str,
        normalizer: LabelNormalizer,
    ) -> Self {
        let index = GalaxyIndex::build(&galaxy.values, &normalizer);
        Self {
            galaxy_name: galaxy_name.to_string(),
            galaxy_type: galaxy.galaxy_type.clone(),
            source: source.to_string(),
            normalizer,
            index,
        }
    }

    pub fn galaxy(&self) -> &str {
        &self.galaxy_name
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Resolve a label to one galaxy entry.
    ///
    /// `include_partial_matches` opts into the approximate path when no
    /// exact normalized match exists; `hint` breaks ties when several
    /// entries qualify. Fails with [`NoMatch`] when nothing qualifies.
    pub fn discern(
        &self,
        label: &str,
        include_partial_matches: bool,
        hint: Option<&str>,
    ) -> Result<Discernment, NoMatch> {
        let normalized = self.normalizer.normalize(label);
        let candidates = matcher::find_candidates(
            &self.index,
            &self.normalizer,
            &normalized,
            include_partial_matches,
        );
        if candidates.is_empty() {
            return Err(NoMatch::new(label));
        }
        let chosen = matcher::select_candidate(&candidates, hint, &self.normalizer);
        debug!(
            target: TARGET_DISCERN,
            "Discern - Input={}, Hint={:?}, Output={}, Choices={:?}",
            label,
            hint,
            chosen.name,
            candidates.iter().map(|c| c.name).collect::<Vec<_>>()
        );
        Ok(Discernment {
            label: label.to_string(),
            discerned_name: chosen.name.to_string(),
            source: self.source.clone(),
            galaxy: self.galaxy_name.clone(),
            galaxy_type: self.galaxy_type.clone(),
            entry: chosen.entry.clone(),
        })
    }
}
