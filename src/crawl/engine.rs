// src/crawl/engine.rs
// =============================================================================
// This module implements the concurrent crawl itself.
//
// How one branch works (visit):
// 1. Stop if this URL is deeper than max_depth, or some other branch
//    already claimed it (try_mark)
// 2. Spawn a task that fetches the page and pushes each not-yet-visited
//    link onto a private channel, then closes it
// 3. Meanwhile, read links off that channel one at a time and recurse
//    into each with depth + 1
//
// Where does the concurrency come from?
// - Step 3 is sequential: we finish recursing into one child before we
//   read the next
// - But each recursive call immediately spawns its OWN fetch task (step 2),
//   so fetches at different positions in the tree overlap - the slow
//   network I/O runs in parallel even though each branch walks its
//   children in order
//
// The channel has capacity 1, so a fetch task can park at most one
// discovered link while the parent is busy recursing - backpressure for
// free, and no unbounded buffering.
//
// Rust concepts:
// - tokio::spawn: Run a future concurrently on the runtime
// - mpsc channel: Hand values from the fetch task to the recursing parent
// - BoxFuture: An async fn cannot call itself directly (the future type
//   would be infinitely large), so the recursion goes through a boxed,
//   type-erased future
// =============================================================================

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

use super::visited::VisitedSet;
use crate::fetch::Fetcher;

// One successfully crawled page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageRecord {
    /// The page URL
    pub url: String,
    /// Link-distance from the starting URL (root = 0)
    pub depth: usize,
    /// The fetched content
    pub content: String,
}

// Everything a finished crawl produced
//
// Page order reflects when each branch's fetch completed, so it varies
// between runs - only the SET of pages is deterministic.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CrawlReport {
    /// Every page that was fetched successfully
    pub pages: Vec<PageRecord>,
    /// How many fetches failed (each failure ends one branch)
    pub failed: usize,
}

impl CrawlReport {
    /// True when no branch failed to fetch
    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

// State shared by every branch of one crawl
//
// Cloning is cheap: each field is an Arc. The VisitedSet is the only
// mutable state branches contend on, and only through its lock.
#[derive(Clone)]
struct CrawlContext {
    fetcher: Arc<dyn Fetcher>,
    visited: Arc<VisitedSet>,
    pages: Arc<Mutex<Vec<PageRecord>>>,
    failed: Arc<AtomicUsize>,
    max_depth: usize,
}

// Crawls the graph reachable from a starting URL
//
// Parameters:
//   root_url: Where to start
//   max_depth: Maximum link-distance from the root to follow
//              (0 = just the root, 1 = root + pages it links to, ...)
//   fetcher: How to turn a URL into content + links
//
// Every reachable URL within the depth limit is fetched at most once.
// The report is complete when this returns: no crawl task outlives the call.
pub async fn crawl(root_url: &str, max_depth: usize, fetcher: Arc<dyn Fetcher>) -> CrawlReport {
    // Fresh shared state per crawl: re-running from scratch never sees
    // a previous run's visited URLs
    let ctx = CrawlContext {
        fetcher,
        visited: Arc::new(VisitedSet::new()),
        pages: Arc::new(Mutex::new(Vec::new())),
        failed: Arc::new(AtomicUsize::new(0)),
        max_depth,
    };

    visit(ctx.clone(), root_url.to_string(), 0).await;

    let pages = std::mem::take(&mut *ctx.pages.lock().unwrap());
    let failed = ctx.failed.load(Ordering::Relaxed);
    CrawlReport { pages, failed }
}

// Visits one URL at the given link-distance from the root
//
// Returns a boxed future because the function is recursive (see the
// module header). The future resolves only when this branch's entire
// subtree is exhausted.
fn visit(ctx: CrawlContext, url: String, depth: usize) -> BoxFuture<'static, ()> {
    Box::pin(async move {
        // Base case: past the depth limit, nothing to do
        if depth > ctx.max_depth {
            return;
        }

        // Claim the URL. Exactly one branch ever gets `true` here, so a
        // URL reachable along several paths is still fetched once.
        if !ctx.visited.try_mark(&url) {
            return;
        }

        // Private channel between this branch's fetch task and us.
        // Capacity 1 = at most one link parked while we recurse.
        let (tx, mut rx) = mpsc::channel::<String>(1);

        // The fetch task: fetch, record the page, hand over the links
        let fetch_task = {
            let ctx = ctx.clone();
            let url = url.clone();
            tokio::spawn(async move {
                match ctx.fetcher.fetch(&url).await {
                    Ok(result) => {
                        tracing::debug!(%url, depth, links = result.links.len(), "fetched");

                        ctx.pages.lock().unwrap().push(PageRecord {
                            url,
                            depth,
                            content: result.content,
                        });

                        // Offer links in document order. is_visited() is
                        // only an optimization - a link that slips through
                        // is caught by its own try_mark above.
                        for link in result.links {
                            if !ctx.visited.is_visited(&link) {
                                // Blocks until the parent is ready; if the
                                // parent is gone, stop producing
                                if tx.send(link).await.is_err() {
                                    break;
                                }
                            }
                        }
                    }
                    Err(e) => {
                        // A failed fetch ends this branch and nothing else
                        ctx.failed.fetch_add(1, Ordering::Relaxed);
                        tracing::warn!(%url, error = %e, "fetch failed, abandoning branch");
                    }
                }
                // tx dropped here -> channel closes -> the loop below ends
            })
        };

        // Recurse into each discovered link, one at a time, in the order
        // the fetch task offered them
        while let Some(link) = rx.recv().await {
            visit(ctx.clone(), link, depth + 1).await;
        }

        // The channel closing means the fetch task is done producing;
        // join it so the page record is committed before we report Done
        if let Err(e) = fetch_task.await {
            tracing::error!(%url, error = %e, "fetch task panicked");
        }
    })
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why spawn a task instead of just awaiting fetch() inline?
//    - Awaiting inline would make the whole crawl sequential: fetch, then
//      children, then siblings, one at a time
//    - With a spawned task per branch, a parent can be recursing into
//      child #1 while child #2's fetch is already on the wire
//
// 2. Why is the channel per-branch and not global?
//    - Each channel connects exactly one fetch task to exactly one
//      reader, so branches never contend on each other's channels
//    - Closing it (dropping the sender) is an unambiguous "this subtree
//      has no more children" signal to exactly the right reader
//
// 3. Why try_mark BEFORE spawning the fetch?
//    - Marking inside the fetch task would leave a window where two
//      branches both start fetching the same URL
//    - Claiming first means the losing branch returns before spending
//      any I/O
//
// 4. What happens on fetch failure?
//    - The task logs it, bumps the counter and closes the channel
//    - The parent's read loop ends immediately, the branch completes,
//      and every other branch carries on untouched
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::{sample_site, FetchError, FetchResult, FixtureFetcher};
    use async_trait::async_trait;
    use std::collections::{HashMap, HashSet};
    use std::time::Duration;

    // Wraps a fixture and records the order in which URLs were fetched
    struct RecordingFetcher {
        inner: FixtureFetcher,
        calls: Mutex<Vec<String>>,
    }

    impl RecordingFetcher {
        fn new(inner: FixtureFetcher) -> Self {
            Self {
                inner,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Fetcher for RecordingFetcher {
        async fn fetch(&self, url: &str) -> Result<FetchResult, FetchError> {
            self.calls.lock().unwrap().push(url.to_string());
            self.inner.fetch(url).await
        }
    }

    // Wraps a fixture and injects latency into every fetch
    struct SlowFetcher {
        inner: FixtureFetcher,
        delay: Duration,
    }

    #[async_trait]
    impl Fetcher for SlowFetcher {
        async fn fetch(&self, url: &str) -> Result<FetchResult, FetchError> {
            tokio::time::sleep(self.delay).await;
            self.inner.fetch(url).await
        }
    }

    fn page_urls(report: &CrawlReport) -> HashSet<String> {
        report.pages.iter().map(|p| p.url.clone()).collect()
    }

    #[tokio::test]
    async fn test_diamond_converging_page_fetched_once() {
        // root -> left, right; both -> join. Two paths, one fetch.
        let fixture = FixtureFetcher::new()
            .page("root", "r", &["left", "right"])
            .page("left", "l", &["join"])
            .page("right", "r", &["join"])
            .page("join", "j", &[]);
        let fetcher = Arc::new(RecordingFetcher::new(fixture));

        let report = crawl("root", 3, Arc::clone(&fetcher) as Arc<dyn Fetcher>).await;

        let mut counts: HashMap<String, usize> = HashMap::new();
        for url in fetcher.calls() {
            *counts.entry(url).or_insert(0) += 1;
        }
        assert_eq!(counts.get("join"), Some(&1));
        assert!(counts.values().all(|&c| c == 1), "no URL fetched twice");
        assert_eq!(report.pages.len(), 4);
        assert!(report.is_clean());
    }

    #[tokio::test]
    async fn test_depth_bound_on_chain() {
        // a -> b -> c -> d -> e with max_depth 2: only a, b, c fetched
        let fixture = FixtureFetcher::new()
            .page("a", "", &["b"])
            .page("b", "", &["c"])
            .page("c", "", &["d"])
            .page("d", "", &["e"])
            .page("e", "", &[]);
        let fetcher = Arc::new(RecordingFetcher::new(fixture));

        let report = crawl("a", 2, Arc::clone(&fetcher) as Arc<dyn Fetcher>).await;

        let fetched: HashSet<String> = fetcher.calls().into_iter().collect();
        assert_eq!(
            fetched,
            ["a", "b", "c"].iter().map(|s| s.to_string()).collect()
        );
        assert_eq!(page_urls(&report), fetched);
    }

    #[tokio::test]
    async fn test_depth_zero_fetches_only_root() {
        let fetcher = Arc::new(RecordingFetcher::new(sample_site()));

        let report = crawl(
            "https://example.com/",
            0,
            Arc::clone(&fetcher) as Arc<dyn Fetcher>,
        )
        .await;

        assert_eq!(fetcher.calls(), vec!["https://example.com/".to_string()]);
        assert_eq!(report.pages.len(), 1);
        assert_eq!(report.pages[0].depth, 0);
    }

    #[tokio::test]
    async fn test_children_visited_in_link_order() {
        // Siblings under one parent are recursed into in document order
        let fixture = FixtureFetcher::new()
            .page("root", "", &["one", "two", "three"])
            .page("one", "", &[])
            .page("two", "", &[])
            .page("three", "", &[]);
        let fetcher = Arc::new(RecordingFetcher::new(fixture));

        crawl("root", 1, Arc::clone(&fetcher) as Arc<dyn Fetcher>).await;

        assert_eq!(
            fetcher.calls(),
            vec![
                "root".to_string(),
                "one".to_string(),
                "two".to_string(),
                "three".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_failed_branch_does_not_stop_siblings() {
        // root -> x, y; x is missing, y leads to z. The x failure must
        // not cost us y or z.
        let fixture = FixtureFetcher::new()
            .page("root", "", &["x", "y"])
            .page("y", "", &["z"])
            .page("z", "", &[]);
        let fetcher = Arc::new(RecordingFetcher::new(fixture));

        let report = crawl("root", 3, Arc::clone(&fetcher) as Arc<dyn Fetcher>).await;

        assert_eq!(report.failed, 1);
        assert!(!report.is_clean());
        assert_eq!(
            page_urls(&report),
            ["root", "y", "z"].iter().map(|s| s.to_string()).collect()
        );
        // x was attempted exactly once, and nothing beneath it
        let attempts: Vec<_> = fetcher.calls().into_iter().filter(|u| u == "x").collect();
        assert_eq!(attempts.len(), 1);
    }

    #[tokio::test]
    async fn test_cyclic_graph_terminates_under_latency() {
        // sample_site() links back to the root from several pages; with
        // injected latency a lost or duplicated handoff would blow well
        // past this timeout
        let fetcher = Arc::new(SlowFetcher {
            inner: sample_site(),
            delay: Duration::from_millis(10),
        });

        let report = tokio::time::timeout(
            Duration::from_secs(5),
            crawl("https://example.com/", 5, fetcher as Arc<dyn Fetcher>),
        )
        .await
        .expect("crawl did not terminate");

        // 5 real pages; the dangling /careers link counts as one failure
        assert_eq!(report.pages.len(), 5);
        assert_eq!(report.failed, 1);
    }

    #[tokio::test]
    async fn test_rerun_reproduces_same_visitation_set() {
        // A fresh VisitedSet per crawl: nothing leaks across runs
        let first = crawl(
            "https://example.com/",
            3,
            Arc::new(sample_site()) as Arc<dyn Fetcher>,
        )
        .await;
        let second = crawl(
            "https://example.com/",
            3,
            Arc::new(sample_site()) as Arc<dyn Fetcher>,
        )
        .await;

        assert_eq!(page_urls(&first), page_urls(&second));
        assert_eq!(first.failed, second.failed);
    }

    #[tokio::test]
    async fn test_depth_recorded_as_distance_from_root() {
        let fixture = FixtureFetcher::new()
            .page("root", "", &["mid"])
            .page("mid", "", &["leaf"])
            .page("leaf", "", &[]);

        let report = crawl("root", 2, Arc::new(fixture) as Arc<dyn Fetcher>).await;

        let depths: HashMap<String, usize> = report
            .pages
            .iter()
            .map(|p| (p.url.clone(), p.depth))
            .collect();
        assert_eq!(depths.get("root"), Some(&0));
        assert_eq!(depths.get("mid"), Some(&1));
        assert_eq!(depths.get("leaf"), Some(&2));
    }
}
