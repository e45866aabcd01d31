//! Mem Cache - A memory-bounded in-process cache
//!
//! Key-value storage with per-entry TTL and a total byte budget. Writes that
//! would exceed the budget are rejected rather than evicting other entries, and
//! expired entries are removed lazily on access or by a background reaper.
//!
//! ```
//! use std::time::Duration;
//! use mem_cache::cache::CacheStore;
//!
//! let cache = CacheStore::new();
//! cache.set_max_memory_str("1KB");
//!
//! assert!(cache.set("greeting", "hello".to_string(), Duration::ZERO));
//! assert_eq!(cache.get("greeting"), Some("hello".to_string()));
//! assert!(!cache.set("blob", "x".repeat(2048), Duration::ZERO));
//! assert_eq!(cache.keys(), 1);
//! ```

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::{CacheStore, EstimateSize};
pub use config::Config;
pub use tasks::{spawn_reaper, ReaperHandle};
