use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use galaxy_parser::galaxy::fetch;
use tracing::info;

/// Query MISP galaxies and resolve labels to canonical tags.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Label to resolve
    #[arg(short, long)]
    query: String,

    /// Galaxy clusters to query
    #[arg(
        short,
        long,
        num_args = 1..,
        default_values = ["mitre-intrusion-set", "mitre-malware", "mitre-tool"]
    )]
    galaxy_list: Vec<String>,

    /// Directory for cached cluster files
    #[arg(short, long, default_value = "/tmp")]
    cache_dir: PathBuf,

    /// Pin the galaxy data to a misp-galaxy commit hash
    #[arg(long)]
    commit: Option<String>,

    /// Re-download cluster files even when cached
    #[arg(short, long)]
    force_download: bool,

    /// Allow approximate matches when no exact match exists
    #[arg(short = 'm', long)]
    include_partial_matches: bool,

    /// Hint used to pick among multiple matches
    #[arg(short = 'i', long)]
    hint: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    galaxy_parser::logging::configure_logging();
    let cli = Cli::parse();

    let store = fetch::fetch_galaxies(
        &cli.cache_dir,
        &cli.galaxy_list,
        cli.commit.as_deref(),
        cli.force_download,
    )
    .await?;
    let discerners = store.create_discerners(None);
    info!(
        "Querying {} galaxies for '{}'",
        discerners.len(),
        cli.query
    );

    let tags = galaxy_parser::get_discerned_tags(
        &discerners,
        &cli.query,
        cli.include_partial_matches,
        cli.hint.as_deref(),
    );
    if tags.is_empty() {
        println!("No tags found for '{}'", cli.query);
    } else {
        for tag in tags {
            println!("{}", tag);
        }
    }
    Ok(())
}
