// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// clap is a popular Rust library for parsing command-line arguments.
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// Rust concepts:
// - Structs: Custom data types that group related data
// - Enums: Types that can be one of several variants
// - Derive macros: Automatically generate code for our types
// =============================================================================

use clap::{Parser, Subcommand};

// This struct represents our entire CLI application
//
// #[derive(Parser)] tells clap to automatically generate parsing code
// The #[command(...)] attributes configure how the CLI behaves
#[derive(Parser, Debug)]
#[command(
    name = "linkmap",
    version = "0.1.0",
    about = "A CLI tool that maps the reachable link graph of a website",
    long_about = "linkmap crawls a website concurrently, following links up to a maximum \
                  depth and visiting every page at most once, then prints the pages it found."
)]
pub struct Cli {
    // The #[command(subcommand)] attribute tells clap that this field
    // will hold one of the subcommands defined in the Commands enum
    #[command(subcommand)]
    pub command: Commands,
}

// This enum defines our subcommands (site, demo)
//
// Each variant represents a different subcommand the user can run
// The fields inside each variant become the arguments for that subcommand
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Crawl a live website, restricted to the starting URL's domain
    ///
    /// Example: linkmap site https://example.com --max-depth 2
    Site {
        /// Website URL to start crawling from (e.g., https://example.com)
        ///
        /// This is a positional argument (required)
        website_url: String,

        /// Output the crawl report in JSON format instead of a table
        ///
        /// This is an optional flag: --json
        #[arg(long)]
        json: bool,

        /// Maximum link-distance from the starting page (default: 1)
        ///
        /// Depth 0 = just the starting page
        /// Depth 1 = starting page + every page it links to
        /// etc.
        ///
        /// #[arg(long, default_value_t = 1)] creates --max-depth flag with default value
        #[arg(long, default_value_t = 1)]
        max_depth: usize,
    },

    /// Crawl a built-in in-memory demo site (no network needed)
    ///
    /// Example: linkmap demo --max-depth 3
    Demo {
        /// Output the crawl report in JSON format instead of a table
        #[arg(long)]
        json: bool,

        /// Maximum link-distance from the demo root (default: 3)
        #[arg(long, default_value_t = 3)]
        max_depth: usize,
    },
}
