//! Galaxy acquisition and registry: loading cluster files from disk,
//! fetching them on demand, and handing out discerners bound to them.

pub mod fetch;
pub mod types;

pub use types::{ClusterEntry, ClusterMeta, Galaxy};

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::discerner::Discerner;
use crate::error::GalaxyError;
use crate::{TAG_NAMESPACE, TARGET_GALAXY};

/// Every cluster file published in the MISP galaxy repository.
pub const KNOWN_GALAXY_NAMES: &[&str] = &[
    "360net",
    "android",
    "atrm",
    "attck4fraud",
    "backdoor",
    "banker",
    "bhadra-framework",
    "botnet",
    "branded_vulnerability",
    "cancer",
    "cert-eu-govsector",
    "china-defence-universities",
    "cmtmf-attack-pattern",
    "country",
    "cryptominers",
    "election-guidelines",
    "exploit-kit",
    "handicap",
    "malpedia",
    "microsoft-activity-group",
    "misinfosec-amitt-misinformation-pattern",
    "mitre-attack-pattern",
    "mitre-course-of-action",
    "mitre-enterprise-attack-attack-pattern",
    "mitre-enterprise-attack-course-of-action",
    "mitre-enterprise-attack-intrusion-set",
    "mitre-enterprise-attack-malware",
    "mitre-enterprise-attack-tool",
    "mitre-ics-assets",
    "mitre-ics-groups",
    "mitre-ics-levels",
    "mitre-ics-software",
    "mitre-ics-tactics",
    "mitre-ics-techniques",
    "mitre-intrusion-set",
    "mitre-malware",
    "mitre-mobile-attack-attack-pattern",
    "mitre-mobile-attack-course-of-action",
    "mitre-mobile-attack-intrusion-set",
    "mitre-mobile-attack-malware",
    "mitre-mobile-attack-tool",
    "mitre-pre-attack-attack-pattern",
    "mitre-pre-attack-intrusion-set",
    "mitre-tool",
    "o365-exchange-techniques",
    "preventive-measure",
    "ransomware",
    "rat",
    "region",
    "rsit",
    "sector",
    "social-dark-patterns",
    "sod-matrix",
    "stealer",
    "surveillance-vendor",
    "target-information",
    "tds",
    "tea-matrix",
    "threat-actor",
    "tool",
];

/// Cache file name for a galaxy, carrying the short commit hash when the
/// galaxy data is pinned.
pub(crate) fn cache_file_name(name: &str, commit: Option<&str>) -> String {
    match commit {
        Some(hash) => format!("{}.{}.json", name, &hash[..hash.len().min(7)]),
        None => format!("{}.json", name),
    }
}

/// Registry of loaded galaxies, keyed by galaxy name.
///
/// Galaxy names iterate in sorted order, so discerners created from a store
/// always come out in the same sequence.
#[derive(Debug, Default)]
pub struct GalaxyStore {
    galaxies: BTreeMap<String, Galaxy>,
}

impl GalaxyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject any requested name that is not in the known catalog.
    pub(crate) fn check_names(names: &[String]) -> Result<(), GalaxyError> {
        for name in names {
            if !KNOWN_GALAXY_NAMES.contains(&name.as_str()) {
                return Err(GalaxyError::UnknownGalaxy(name.clone()));
            }
        }
        Ok(())
    }

    /// Load `<name>.json` (or `<name>.<commit7>.json` when pinned) files
    /// from a directory. Files missing on disk are logged and skipped;
    /// unreadable or malformed files fail the load.
    pub fn from_directory(
        directory: &Path,
        names: &[String],
        commit: Option<&str>,
    ) -> Result<Self, GalaxyError> {
        Self::check_names(names)?;
        let mut store = Self::new();
        for name in names {
            let path = directory.join(cache_file_name(name, commit));
            if !path.exists() {
                warn!(
                    target: TARGET_GALAXY,
                    "Galaxy '{}' missing at {}", name, path.display()
                );
                continue;
            }
            let galaxy: Galaxy = serde_json::from_str(&fs::read_to_string(&path)?)?;
            debug!(
                target: TARGET_GALAXY,
                "Loaded galaxy '{}' with {} values", name, galaxy.values.len()
            );
            store.galaxies.insert(name.clone(), galaxy);
        }
        Ok(store)
    }

    /// Register an in-memory galaxy, e.g. custom data not published in the
    /// MISP repository.
    pub fn insert(&mut self, name: &str, galaxy: Galaxy) {
        self.galaxies.insert(name.to_string(), galaxy);
    }

    pub fn galaxy_names(&self) -> impl Iterator<Item = &str> {
        self.galaxies.keys().map(String::as_str)
    }

    pub fn get(&self, name: &str) -> Result<&Galaxy, GalaxyError> {
        self.galaxies
            .get(name)
            .ok_or_else(|| GalaxyError::UnknownGalaxy(name.to_string()))
    }

    /// Tag prefix of a loaded galaxy, e.g. `misp-galaxy:malpedia`.
    pub fn tag_prefix(&self, name: &str) -> Result<String, GalaxyError> {
        Ok(format!("{}:{}", TAG_NAMESPACE, self.get(name)?.galaxy_type))
    }

    /// Build one discerner per loaded galaxy, in galaxy-name order.
    pub fn create_discerners(&self, source: Option<&str>) -> Vec<Discerner> {
        let source = source.unwrap_or("custom");
        self.galaxies
            .iter()
            .map(|(name, galaxy)| Discerner::new(name, galaxy, source))
            .collect()
    }
}
