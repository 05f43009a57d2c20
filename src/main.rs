// plugin-list: generate the pytest plugin list page.
// Entry point: parses arguments, sets up logging and runs one generation pass.

mod app;
mod cache;
mod config;
mod error;
mod plugin;
mod pypi;
mod render;
mod version;

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::App;
use crate::config::{Config, DEFAULT_INDEX_URL, DEFAULT_OUTPUT};

/// Build the pytest plugin list page from the PyPI JSON API
#[derive(Parser, Debug)]
#[command(name = "plugin-list")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Where to write the generated page
    #[arg(short, long, env = "PLUGIN_LIST_OUTPUT", default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Base URL of the package index
    #[arg(long, env = "PLUGIN_LIST_INDEX_URL", default_value = DEFAULT_INDEX_URL)]
    index_url: String,

    /// Directory for cached HTTP responses (defaults to the user cache dir)
    #[arg(long, env = "PLUGIN_LIST_CACHE_DIR")]
    cache_dir: Option<PathBuf>,

    /// Neither read nor write the response cache
    #[arg(long)]
    no_cache: bool,

    /// Delete all cached responses before running
    #[arg(long)]
    clear_cache: bool,

    /// Extra project to include even without a pytest prefix (repeatable)
    #[arg(long = "additional-project", value_name = "NAME")]
    additional_projects: Vec<String>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let config = Config::new(
        &args.index_url,
        args.output,
        args.cache_dir,
        !args.no_cache,
        args.additional_projects,
    )?;

    let app = App::new(config);
    if args.clear_cache {
        app.clear_cache()?;
    }

    let summary = app.run().await?;
    println!(
        "Wrote {} plugins to {}",
        summary.plugins,
        summary.output.display()
    );

    Ok(())
}
