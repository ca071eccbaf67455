use thiserror::Error;

/// Errors raised while loading or fetching galaxy data.
#[derive(Debug, Error)]
pub enum GalaxyError {
    /// The requested galaxy name is not in the known catalog, or is not
    /// loaded in the store.
    #[error("galaxy '{0}' not found")]
    UnknownGalaxy(String),

    #[error("failed to read galaxy file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse galaxy JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to download galaxy cluster: {0}")]
    Download(#[from] reqwest::Error),
}

/// The discerner could not resolve a label against its galaxy.
///
/// This is a routine outcome, not a fault: callers querying many galaxies
/// with the same label are expected to catch it per galaxy and move on.
#[derive(Debug, Error)]
#[error("no galaxy entry matches label '{label}'")]
pub struct NoMatch {
    pub label: String,
}

impl NoMatch {
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
        }
    }
}
