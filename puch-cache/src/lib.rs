//! TTL cache for Puch tools.
//!
//! In-memory cache keyed by string. Freshness is decided at read time by the
//! TTL the caller passes to `get`, so two callers can apply different windows
//! to the same key. The clock is injectable for tests.

mod cache;
mod clock;

pub use cache::{CacheConfig, CacheStats, TtlCache};
pub use clock::{Clock, ManualClock, SystemClock};
