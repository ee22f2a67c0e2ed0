//! nih CLI - native bundle tool
//!
//! Commands:
//! - `nih platform` - Print the platform subpath of this machine
//! - `nih manifest` - List the natives a bundle carries
//! - `nih extract` - Extract natives for this platform and print the directory
//! - `nih resolve` - Print the path a native file resolves to
//! - `nih pack` - Build a bundle from a directory tree

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod extract;
mod inspect;
mod pack;
mod source;

#[derive(Parser)]
#[command(name = "nih")]
#[command(author, version, about = "Native bundle extraction tool", long_about = None)]
struct Cli {
    /// Log extraction steps
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Where natives are read from and how they are extracted
#[derive(Args)]
struct BundleArgs {
    /// Bundle archive (.zip) or directory holding the natives
    #[arg(short, long)]
    bundle: PathBuf,

    /// Platform subpath to extract instead of the detected one
    #[arg(short, long)]
    subpath: Option<String>,

    /// Parent directory for a cache directory reused across runs
    #[arg(long)]
    static_parent: Option<PathBuf>,

    /// Prefix prepended to manifest locations to form resource names
    #[arg(long)]
    prefix: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the platform subpath of this machine
    Platform,

    /// List the natives a bundle carries
    Manifest {
        /// Bundle archive (.zip) or directory
        bundle: PathBuf,

        /// Only list entries for this platform subpath
        #[arg(short, long)]
        subpath: Option<String>,
    },

    /// Extract natives for this platform and print the directory
    Extract {
        #[command(flatten)]
        bundle: BundleArgs,
    },

    /// Print the path a native file resolves to
    Resolve {
        #[command(flatten)]
        bundle: BundleArgs,

        /// Native file name, e.g. libpty.so
        file_name: String,
    },

    /// Build a bundle from a directory tree laid out by platform subpath
    Pack {
        /// Directory containing e.g. linux/x86-64/libpty.so
        tree: PathBuf,

        /// Output bundle archive
        #[arg(short, long, default_value = "natives.zip")]
        output: PathBuf,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Platform => {
            println!("{}", nih_bundle::Platform::current()?.subpath());
        }
        Commands::Manifest { bundle, subpath } => {
            inspect::run(&bundle, subpath.as_deref())?;
        }
        Commands::Extract { bundle } => {
            let dir = extract::run(&bundle)?;
            println!("{}", dir.display());
        }
        Commands::Resolve { bundle, file_name } => {
            let path = extract::resolve(&bundle, &file_name)?;
            println!("{}", path.display());
        }
        Commands::Pack { tree, output } => {
            pack::run(&tree, &output)?;
        }
    }

    Ok(())
}
