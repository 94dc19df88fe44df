// src/fetch/mod.rs
// =============================================================================
// This module defines how pages are fetched.
//
// The crawler itself never talks to the network directly. Instead it is given
// something that implements the Fetcher trait: "turn one URL into its content
// plus the links found on it, or fail". That separation is what lets us run
// the exact same crawl engine against:
// - a real website (HttpFetcher, uses reqwest)
// - an in-memory canned site (FixtureFetcher, used by tests and `demo`)
//
// Rust concepts:
// - Traits: Define shared behavior (like interfaces in other languages)
// - async-trait: Allows async methods in traits that can be used as
//   trait objects (Arc<dyn Fetcher>)
// - thiserror: Derive macro that generates Display/Error impls for our
//   error enum
// =============================================================================

mod fixture;
mod http;

// Re-export public items from submodules
pub use fixture::{sample_site, FixtureFetcher};
pub use http::HttpFetcher;

use async_trait::async_trait;
use thiserror::Error;

// What fetching one page produces: the page content and every link
// discovered on it, in document order.
//
// The crawler never looks inside `content` - it only stores it. The `links`
// order matters: children of a page are visited in exactly this order.
#[derive(Debug, Clone)]
pub struct FetchResult {
    /// The page body (HTML for real sites, any string for fixtures)
    pub content: String,
    /// URLs discovered on the page, in the order they appeared
    pub links: Vec<String>,
}

// Typed error for a failed fetch
//
// A fetch failure is always recoverable from the crawler's point of view:
// it ends one branch of the crawl, nothing else.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The URL is not part of the site being fetched (fixtures return this
    /// for unknown URLs, like a 404 would)
    #[error("not found: {0}")]
    NotFound(String),

    /// The server answered with a non-success HTTP status
    #[error("HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    /// The request itself failed (connection, timeout, TLS, DNS, ...)
    #[error("request failed for {url}: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The URL could not be parsed or resolved
    #[error("invalid URL '{0}'")]
    InvalidUrl(String),
}

// The capability the crawl engine depends on
//
// Contract:
// - May be called concurrently from many crawl branches, each with a
//   different URL. Implementations must be safe for that (Send + Sync).
// - May be slow (network) and may fail (FetchError) - the engine treats
//   both as normal.
//
// #[async_trait] rewrites the async method so the trait stays object-safe,
// which is what lets the engine hold an Arc<dyn Fetcher>.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch one URL, returning its content and discovered links
    async fn fetch(&self, url: &str) -> Result<FetchResult, FetchError>;
}
