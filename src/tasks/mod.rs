//! Background Tasks Module
//!
//! Contains background tasks that run periodically alongside the cache.
//!
//! # Tasks
//! - TTL Reaper: Removes expired cache entries at a configured interval

mod reaper;

pub use reaper::{spawn_reaper, ReaperHandle};
