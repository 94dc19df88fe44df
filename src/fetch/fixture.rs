// src/fetch/fixture.rs
// =============================================================================
// This module implements the Fetcher trait over an in-memory table.
//
// Why have a fake fetcher?
// - The crawl engine is all about concurrency, deduplication and depth -
//   none of which needs a network to be exercised
// - Tests build a small FixtureFetcher describing exactly the graph shape
//   they want (a chain, a diamond, a cycle...) and get deterministic runs
// - The `demo` subcommand crawls a built-in fixture so you can watch the
//   crawler work without hitting any real site
//
// Each fixture is constructed where it's used and owned by its crawl -
// there is no shared global table.
// =============================================================================

use async_trait::async_trait;
use std::collections::HashMap;

use super::{FetchError, FetchResult, Fetcher};

// A canned site: URL -> (content, links)
//
// Unknown URLs fail with FetchError::NotFound, the fixture equivalent of
// a broken link.
#[derive(Debug, Default)]
pub struct FixtureFetcher {
    pages: HashMap<String, FetchResult>,
}

impl FixtureFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    // Adds one page to the fixture
    //
    // Takes and returns `self` so fixtures read as a chain:
    //   FixtureFetcher::new().page("/a", "A", &["/b"]).page("/b", "B", &[])
    pub fn page(mut self, url: &str, content: &str, links: &[&str]) -> Self {
        self.pages.insert(
            url.to_string(),
            FetchResult {
                content: content.to_string(),
                links: links.iter().map(|l| l.to_string()).collect(),
            },
        );
        self
    }
}

#[async_trait]
impl Fetcher for FixtureFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchResult, FetchError> {
        match self.pages.get(url) {
            Some(result) => Ok(result.clone()),
            None => Err(FetchError::NotFound(url.to_string())),
        }
    }
}

// The built-in site crawled by `linkmap demo`
//
// A small site with a cycle (every page links back to the root) and one
// dangling link (/careers has no page), so the demo shows deduplication
// and failure isolation as well as plain traversal.
pub fn sample_site() -> FixtureFetcher {
    FixtureFetcher::new()
        .page(
            "https://example.com/",
            "Example Inc. home page",
            &["https://example.com/docs", "https://example.com/blog"],
        )
        .page(
            "https://example.com/docs",
            "Documentation index",
            &[
                "https://example.com/",
                "https://example.com/docs/install",
                "https://example.com/docs/faq",
            ],
        )
        .page(
            "https://example.com/blog",
            "Blog index",
            &["https://example.com/", "https://example.com/careers"],
        )
        .page(
            "https://example.com/docs/install",
            "Installation guide",
            &["https://example.com/docs"],
        )
        .page(
            "https://example.com/docs/faq",
            "Frequently asked questions",
            &["https://example.com/", "https://example.com/docs"],
        )
}
