// src/crawl/visited.rs
// =============================================================================
// This module owns the set of URLs the crawler has already claimed.
//
// Every branch of a crawl shares ONE VisitedSet (behind an Arc), so this is
// the only place where concurrent branches touch shared mutable state. All
// access goes through the lock - nothing else in the crate can reach the
// inner HashSet.
//
// The important method is try_mark(): check membership AND insert in a
// single critical section. Doing those as two separate calls would let two
// branches both see "not visited" for the same URL and both fetch it.
//
// Rust concepts:
// - Mutex: Mutual exclusion lock guarding the inner set
// - Interior mutability: &self methods that still mutate, safely
// =============================================================================

use std::collections::HashSet;
use std::sync::Mutex;

// Lock-guarded set of visited URLs
//
// Invariant: monotonic. Once a URL is in the set it never leaves; a fresh
// crawl gets a fresh VisitedSet.
#[derive(Debug, Default)]
pub struct VisitedSet {
    urls: Mutex<HashSet<String>>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a URL as visited. Idempotent.
    pub fn mark_visited(&self, url: &str) {
        let mut urls = self.urls.lock().unwrap();
        urls.insert(url.to_string());
    }

    /// Returns whether a URL has been visited.
    ///
    /// Note: a check followed by a later mark_visited() is NOT atomic -
    /// another branch can mark the URL in between. Use this only as a
    /// best-effort filter; use try_mark() when the answer must be exact.
    pub fn is_visited(&self, url: &str) -> bool {
        let urls = self.urls.lock().unwrap();
        urls.contains(url)
    }

    /// Atomically marks a URL, returning true iff it was newly marked.
    ///
    /// This is the at-most-once guarantee: for any URL, exactly one caller
    /// across all branches ever gets `true` back.
    pub fn try_mark(&self, url: &str) -> bool {
        let mut urls = self.urls.lock().unwrap();
        urls.insert(url.to_string())
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why Mutex and not RwLock?
//    - Every useful operation here writes (insert), so reader/writer
//      separation buys nothing
//    - The critical sections are a single HashSet operation, held for
//      nanoseconds and never across an .await
//
// 2. Why is .lock().unwrap() okay when we avoid unwrap elsewhere?
//    - lock() only fails if another thread panicked while holding the lock
//      (a "poisoned" mutex)
//    - At that point the crawl is already broken; propagating the panic is
//      the standard thing to do
//
// 3. Why does try_mark return bool?
//    - HashSet::insert already tells us "was this new?" - we just pass
//      that through, still inside the one critical section
// -----------------------------------------------------------------------------
