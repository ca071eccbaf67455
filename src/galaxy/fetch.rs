//! On-demand download of galaxy cluster files from the MISP galaxy GitHub
//! repository, with local caching and commit pinning.

use std::path::Path;

use tokio::fs;
use tracing::{debug, info};

use super::GalaxyStore;
use crate::error::GalaxyError;
use crate::TARGET_GALAXY;

const GH_MAIN_BRANCH: &str = "main";

fn cluster_url(reference: &str, name: &str) -> String {
    format!(
        "https://raw.githubusercontent.com/MISP/misp-galaxy/{}/clusters/{}.json",
        reference, name
    )
}

/// Download one cluster file into the cache directory.
///
/// A cached copy is reused unless `force` is set. `commit` pins the
/// download to a specific misp-galaxy commit; otherwise the main branch is
/// fetched.
pub async fn download_galaxy(
    client: &reqwest::Client,
    cache_dir: &Path,
    name: &str,
    commit: Option<&str>,
    force: bool,
) -> Result<(), GalaxyError> {
    let target = cache_dir.join(super::cache_file_name(name, commit));
    if !force && target.exists() {
        debug!(
            target: TARGET_GALAXY,
            "Using cached galaxy '{}' at {}", name, target.display()
        );
        return Ok(());
    }
    let url = cluster_url(commit.unwrap_or(GH_MAIN_BRANCH), name);
    info!(target: TARGET_GALAXY, "Downloading galaxy '{}' from {}", name, url);
    let response = client.get(&url).send().await?.error_for_status()?;
    let body = response.bytes().await?;
    fs::write(&target, &body).await?;
    Ok(())
}

/// Fetch the requested galaxies (honoring the cache) and load them into a
/// store.
pub async fn fetch_galaxies(
    cache_dir: &Path,
    names: &[String],
    commit: Option<&str>,
    force: bool,
) -> Result<GalaxyStore, GalaxyError> {
    GalaxyStore::check_names(names)?;
    let client = reqwest::Client::builder().gzip(true).build()?;
    for name in names {
        download_galaxy(&client, cache_dir, name, commit, force).await?;
    }
    GalaxyStore::from_directory(cache_dir, names, commit)
}
