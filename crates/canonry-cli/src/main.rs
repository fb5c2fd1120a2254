//! Canonry CLI - fingerprint JSON records and deduplicate them through a registry.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod input;
mod output;
mod record;

use commands::{canonicalize, dedup, fingerprint};

#[derive(Parser)]
#[command(name = "canonry")]
#[command(about = "Content fingerprinting and canonicalization CLI")]
struct Cli {
    /// Log resolve activity at debug level (overrides RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show canonical content bytes for input JSON
    Canonicalize {
        /// Input JSON file (or stdin if not provided or `-`)
        input: Option<String>,
        /// Comma-separated top-level fields left out of the content
        #[arg(long, value_delimiter = ',')]
        exclude: Vec<String>,
    },
    /// Show the content fingerprint for input JSON
    Fingerprint {
        /// Input JSON file (or stdin if not provided or `-`)
        input: Option<String>,
        /// Comma-separated top-level fields left out of the content
        #[arg(long, value_delimiter = ',')]
        exclude: Vec<String>,
        /// Print base64url instead of hex
        #[arg(long)]
        b64: bool,
    },
    /// Resolve every record of a JSON Lines file and report duplicates
    Dedup {
        /// JSON Lines file (or stdin if `-`)
        input: String,
        /// Comma-separated top-level fields left out of the content
        #[arg(long, value_delimiter = ',')]
        exclude: Vec<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
        /// Registry options file (JSON)
        #[arg(long)]
        options: Option<String>,
        /// Entries to reserve up front
        #[arg(long)]
        capacity: Option<usize>,
        /// Number of map shards (power of two)
        #[arg(long)]
        shards: Option<usize>,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Canonicalize { input, exclude } => canonicalize::run(input, exclude),
        Commands::Fingerprint {
            input,
            exclude,
            b64,
        } => fingerprint::run(input, exclude, b64),
        Commands::Dedup {
            input,
            exclude,
            json,
            options,
            capacity,
            shards,
        } => dedup::run(dedup::DedupArgs {
            input,
            exclude,
            json,
            options,
            capacity,
            shards,
        }),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
