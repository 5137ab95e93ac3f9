//! `vite-tags` - print the HTML tags or asset URLs for Vite manifest entries.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use vite_tags::{AssetContext, ViteBuilder, ViteOptions};

#[derive(Parser)]
#[command(name = "vite-tags")]
#[command(about = "Resolve Vite manifest entries into script and link tags", long_about = None)]
#[command(version)]
struct Cli {
    /// JSON options file (defaults to ./vite-tags.json when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding the build output and the hot file
    #[arg(long)]
    public_dir: Option<PathBuf>,

    /// Build directory relative to the public directory
    #[arg(long)]
    build_dir: Option<String>,

    /// Dev server sentinel file
    #[arg(long)]
    hotfile: Option<PathBuf>,

    /// Manifest file name inside <build-dir>/.vite/
    #[arg(long)]
    manifest_filename: Option<String>,

    /// Chunk field holding the integrity hash
    #[arg(long, conflicts_with = "no_integrity")]
    integrity_key: Option<String>,

    /// Never emit integrity attributes
    #[arg(long)]
    no_integrity: bool,

    /// Nonce added to every tag
    #[arg(long, conflicts_with = "generate_nonce")]
    nonce: Option<String>,

    /// Generate a random nonce
    #[arg(long)]
    generate_nonce: bool,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the tags for one or more entries
    Tags {
        /// Manifest keys, e.g. resources/js/app.js
        #[arg(required = true)]
        entries: Vec<String>,
    },

    /// Print the served URL of a single entry
    Asset {
        /// Manifest key
        path: String,
    },

    /// Report whether the dev server is running
    Hot,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let options = match &cli.config {
        Some(path) => ViteOptions::from_path(path)
            .with_context(|| format!("failed to load options from {}", path.display()))?,
        None => ViteOptions::discover(&std::env::current_dir()?)?,
    };

    let vite = apply_flags(ViteBuilder::from_options(&options)?, &cli)
        .build()
        .context("failed to configure vite resolver")?;

    match cli.command {
        Commands::Tags { entries } => {
            let html = vite.render(&entries, None)?;
            print!("{html}");
        }
        Commands::Asset { path } => {
            println!("{}", vite.asset(&path, None, &AssetContext::new())?);
        }
        Commands::Hot => {
            if vite.is_running_hot() {
                let base_url = vite_tags::HotFile::new(vite.hotfile()).base_url()?;
                println!("hot {base_url}");
            } else {
                println!("cold");
            }
        }
    }

    Ok(())
}

fn apply_flags(mut builder: ViteBuilder, cli: &Cli) -> ViteBuilder {
    if let Some(public_dir) = &cli.public_dir {
        builder = builder.public_dir(public_dir);
    }
    if let Some(build_dir) = &cli.build_dir {
        builder = builder.build_dir(build_dir);
    }
    if let Some(hotfile) = &cli.hotfile {
        builder = builder.hotfile(hotfile);
    }
    if let Some(filename) = &cli.manifest_filename {
        builder = builder.manifest_filename(filename);
    }
    if let Some(key) = &cli.integrity_key {
        builder = builder.integrity_key(key);
    }
    if cli.no_integrity {
        builder = builder.disable_integrity();
    }
    if let Some(nonce) = &cli.nonce {
        builder = builder.nonce(nonce);
    }
    if cli.generate_nonce {
        builder = builder.generate_nonce();
    }
    builder
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("vite_tags=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("vite_tags=warn"))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
