//! Background Tasks Module
//!
//! Helpers for hosts that share one cache between async tasks.
//!
//! # Tasks
//! - Expiry purge: Removes expired cache entries at configured intervals

mod purge;

pub use purge::{shared, spawn_purge_task, SharedCache};
