pub mod discerner;
pub mod error;
pub mod galaxy;
pub mod logging;

use std::collections::HashMap;

use discerner::{Discerner, Discernment};
use galaxy::Galaxy;

pub const TARGET_DISCERN: &str = "discern";
pub const TARGET_GALAXY: &str = "galaxy";

/// Namespace prefix shared by every tag this crate emits.
pub const TAG_NAMESPACE: &str = "misp-galaxy";

/// Query every discerner with one label and collect the successful
/// resolutions.
///
/// Each galaxy is queried independently: a `NoMatch` from one discerner
/// never affects the others. A blank label resolves to nothing.
pub fn get_discernments(
    discerners: &[Discerner],
    label: &str,
    include_partial_matches: bool,
    hint: Option<&str>,
) -> Vec<Discernment> {
    if label.trim().is_empty() {
        return Vec::new();
    }
    discerners
        .iter()
        .filter_map(|d| d.discern(label, include_partial_matches, hint).ok())
        .collect()
}

/// Resolve a label across every discerner and return the resulting tag
/// strings.
pub fn get_discerned_tags(
    discerners: &[Discerner],
    label: &str,
    include_partial_matches: bool,
    hint: Option<&str>,
) -> Vec<String> {
    get_discernments(discerners, label, include_partial_matches, hint)
        .iter()
        .map(|d| d.tag())
        .collect()
}

/// Map technique IDs to tags for ATT&CK-style galaxies whose values look
/// like `"Drive-by Compromise - T1189"`.
pub fn mitre_technique_mapping(galaxy: &Galaxy) -> HashMap<String, String> {
    galaxy
        .values
        .iter()
        .filter_map(|entry| {
            let (_, technique_id) = entry.value.rsplit_once('-')?;
            Some((
                technique_id.trim().to_string(),
                format!(
                    "{}:{}=\"{}\"",
                    TAG_NAMESPACE, galaxy.galaxy_type, entry.value
                ),
            ))
        })
        .collect()
}
