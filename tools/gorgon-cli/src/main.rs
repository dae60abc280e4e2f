//! Gorgon CLI - inspect GORGON resource containers
//!
//! # Commands
//!
//! - `gorgon info` - Header fields and node counts per kind
//! - `gorgon tree` - Print the resource tree
//! - `gorgon find` - Look up a node by identifier
//! - `gorgon frames` - Which animation frame shows at a given time
//! - `gorgon extract` - Export an image as PNG
//!
//! # Usage
//!
//! ```bash
//! gorgon tree ui.gor
//! gorgon find ui.gor 00000000000000a1
//! gorgon extract ui.gor 00000000000000a1 -o button.png
//! RUST_LOG=debug gorgon info ui.gor --config loader.toml
//! ```
//!
//! # Config (loader.toml)
//!
//! ```toml
//! [load]
//! load_names = true
//! strict_image_size = false
//! ```

mod container;
mod extract;
mod find;
mod frames;
mod info;
mod tree;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// Gorgon CLI - inspect GORGON resource containers
#[derive(Parser)]
#[command(name = "gorgon")]
#[command(about = "Inspect GORGON resource containers")]
#[command(version)]
struct Cli {
    /// Log at debug level unless RUST_LOG is set
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show header fields and node counts
    Info(info::InfoArgs),

    /// Print the resource tree
    Tree(tree::TreeArgs),

    /// Look up a node by identifier
    Find(find::FindArgs),

    /// Show which animation frame is visible at a time
    Frames(frames::FramesArgs),

    /// Export an image as PNG
    Extract(extract::ExtractArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Info(args) => info::execute(args),
        Commands::Tree(args) => tree::execute(args),
        Commands::Find(args) => find::execute(args),
        Commands::Frames(args) => frames::execute(args),
        Commands::Extract(args) => extract::execute(args),
    }
}
