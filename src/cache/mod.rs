//! Cache Module
//!
//! Provides a memory-bounded in-memory cache with TTL expiration and admission control.

mod entry;
mod estimate;
mod size;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use estimate::{estimate_size, EstimateSize};
pub use size::{
    format_size, parse_size, ByteSize, B, DEFAULT_MAX_MEMORY, DEFAULT_MAX_MEMORY_STR, EB, GB, KB,
    MB, PB, TB,
};
pub use stats::CacheStats;
pub use store::CacheStore;

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;
