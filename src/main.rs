// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Build the right Fetcher (real HTTP, or the in-memory demo site)
// 3. Run the crawl and print the report
// 4. Exit with proper code (0 = success, 1 = some fetches failed, 2 = error)
//
// Rust concepts used:
// - async/await: Because fetches at different tree positions overlap
// - Result<T, E>: For error handling (T = success type, E = error type)
// - match: Pattern matching to handle different subcommands
// =============================================================================

// Module declarations - tells Rust about our other source files
mod cli; // src/cli.rs - command-line parsing
mod crawl; // src/crawl/ - the concurrent traversal engine
mod fetch; // src/fetch/ - how pages are fetched (HTTP or fixture)

// Import items we need from our modules
use clap::Parser; // Parser trait enables the parse() method
use cli::{Cli, Commands};
use std::sync::Arc;

use fetch::{sample_site, Fetcher, HttpFetcher};

// anyhow::Result is like std::result::Result but simpler for applications
// It lets us return any error type with the ? operator
use anyhow::Result;

// The #[tokio::main] attribute transforms our async main into a real main function
// It creates a tokio runtime and runs our async code inside it
#[tokio::main]
async fn main() {
    // Log level comes from RUST_LOG (e.g. RUST_LOG=linkmap=debug)
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Run our application logic and capture the exit code
    // std::process::exit() terminates the program with the given code
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // If an unexpected error occurred, print it and exit with code 2
            eprintln!("Error: {}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// This is the main application logic
// Returns:
//   Ok(0) = every reachable page fetched
//   Ok(1) = crawl completed but some fetches failed
//   Err = unexpected error (exit code 2)
async fn run() -> Result<i32> {
    // Parse command-line arguments into our Cli struct
    // This will automatically handle --help, --version, etc.
    let cli = Cli::parse();

    // Match on which subcommand was used
    match cli.command {
        Commands::Site {
            website_url,
            json,
            max_depth,
        } => {
            println!("🔍 Mapping website: {}", website_url);
            println!("📊 Max crawl depth: {}", max_depth);

            // The HTTP fetcher is locked to the starting URL's domain
            let fetcher = Arc::new(HttpFetcher::new(&website_url)?) as Arc<dyn Fetcher>;
            run_crawl(&website_url, max_depth, fetcher, json).await
        }
        Commands::Demo { json, max_depth } => {
            println!("🔍 Mapping built-in demo site (max depth {})", max_depth);

            let fetcher = Arc::new(sample_site()) as Arc<dyn Fetcher>;
            run_crawl("https://example.com/", max_depth, fetcher, json).await
        }
    }
}

// Runs one crawl and prints its report
// Parameters:
//   root_url: where the crawl starts
//   max_depth: maximum link-distance to follow
//   fetcher: HTTP or fixture, the crawl doesn't care
//   json: whether to output JSON format
async fn run_crawl(
    root_url: &str,
    max_depth: usize,
    fetcher: Arc<dyn Fetcher>,
    json: bool,
) -> Result<i32> {
    let report = crawl::crawl(root_url, max_depth, fetcher).await;

    print_report(&report, json)?;

    if report.is_clean() {
        Ok(0) // Exit code 0 = everything fetched
    } else {
        Ok(1) // Exit code 1 = some branches failed
    }
}

// Prints the report either as a table or JSON
fn print_report(report: &crawl::CrawlReport, json: bool) -> Result<()> {
    if json {
        // Serialize the report to JSON and print
        let json_output = serde_json::to_string_pretty(report)?;
        println!("{}", json_output);
    } else {
        // Print human-readable table
        print_table(report);
    }
    Ok(())
}

// Prints the report as a human-readable table in the terminal
fn print_table(report: &crawl::CrawlReport) {
    // Print table header
    println!("{:<70} {:<6} {:<10}", "URL", "DEPTH", "SIZE");
    println!("{}", "=".repeat(86));

    // Print each crawled page
    for page in &report.pages {
        // Truncate URL if too long for display
        let url_display = if page.url.len() > 67 {
            format!("{}...", &page.url[..67])
        } else {
            page.url.clone()
        };

        println!(
            "{:<70} {:<6} {:<10}",
            url_display,
            page.depth,
            page.content.len()
        );
    }

    println!();

    // Print summary
    println!("📊 Summary:");
    println!("   ✅ Pages crawled: {}", report.pages.len());
    println!("   ❌ Failed fetches: {}", report.failed);
}
