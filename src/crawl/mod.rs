// src/crawl/mod.rs
// =============================================================================
// This module is the crawl core.
//
// Submodules:
// - visited: The lock-guarded set of URLs already claimed by a branch
// - engine: The recursive, concurrent traversal itself
//
// This file (mod.rs) is the module root - it re-exports the public API so
// callers can write `crawl::crawl(...)` without knowing the internal layout.
// =============================================================================

mod engine;
mod visited;

// Re-export public items from submodules
pub use engine::{crawl, CrawlReport, PageRecord};
pub use visited::VisitedSet;
