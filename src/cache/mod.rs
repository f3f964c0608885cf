//! Client-side cache for API responses
//!
//! Provides an in-memory TTL cache with a tag index and a caching wrapper
//! around any [`ForgeApi`](crate::client::ForgeApi) implementation. The cache
//! lives as long as the client that owns it.

pub mod client;
pub mod key;
pub mod storage;

use std::time::Duration;

/// Cache TTL configuration per endpoint
///
/// Endpoints without an entry here are never cached: training status and
/// logs must reflect live state, downloads are binary, and writes invalidate
/// instead.
pub struct CacheTtl;

impl CacheTtl {
    // Project data - generation status is polled
    pub const PROJECT_STATUS: Duration = Duration::from_secs(30); // 30 sec
    pub const PROJECT_LIST: Duration = Duration::from_secs(2 * 60); // 2 min

    // Training summaries are immutable once the AI summary exists
    pub const SUMMARY_COMPLETED: Duration = Duration::from_secs(30 * 60); // 30 min
    pub const SUMMARY_GENERATING: Duration = Duration::from_secs(10); // 10 sec

    // Near-static reference data
    pub const CONFIG_OPTIONS: Duration = Duration::from_secs(30 * 60); // 30 min

    // Everything else that is cacheable
    pub const DEFAULT: Duration = Duration::from_secs(5 * 60); // 5 min
}

// Re-export main types
pub use client::CachedForgeClient;
pub use key::{CacheTag, cache_key};
pub use storage::{CacheStats, TtlCache};
