//! lruc - command-line front end for the lrucache metadata cache

mod dedup;
mod demo;
mod stat;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use lrucache::CacheConfig;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Seed four files into a small cache and query it
    Demo {
        /// Cache capacity (number of items)
        #[arg(short, long, default_value_t = 3)]
        capacity: usize,
    },

    /// Look up file metadata through the cache
    Stat {
        /// Files to look up
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Cache capacity (number of items)
        #[arg(short, long, default_value_t = 1024)]
        capacity: usize,

        /// Bucket table length (defaults to capacity)
        #[arg(short, long)]
        buckets: Option<usize>,

        /// Number of passes over the paths
        #[arg(short, long, default_value_t = 1)]
        passes: usize,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Count the unique integers in a whitespace-separated file
    Dedup {
        /// Input file
        file: PathBuf,

        /// Worker threads
        #[arg(short, long, default_value_t = 4)]
        threads: usize,

        /// Lock shards in the unique set
        #[arg(short, long, default_value_t = 64)]
        shards: usize,

        /// Print every unique value, sorted
        #[arg(long)]
        print: bool,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();

    info!("lruc v{}", env!("CARGO_PKG_VERSION"));

    match args.command {
        Command::Demo { capacity } => demo::run(capacity),
        Command::Stat {
            paths,
            capacity,
            buckets,
            passes,
            json,
        } => {
            let mut config = CacheConfig::new(capacity);
            if let Some(buckets) = buckets {
                config = config.with_buckets(buckets);
            }
            stat::run(config, &paths, passes, json)
        }
        Command::Dedup {
            file,
            threads,
            shards,
            print,
        } => dedup::run(&file, threads, shards, print),
    }
}
