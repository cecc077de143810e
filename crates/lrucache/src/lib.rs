//! # lrucache
//!
//! Fixed-capacity LRU cache for file metadata.
//!
//! ## Architecture
//! - **Index**: fixed bucket table with collision chains (DJB2 by default)
//! - **Usage list**: intrusive doubly-linked list, head = most recently used
//! - **Arena**: both structures address entries by slot index
//! - **MetadataCache**: single-lock shared front over filesystem metadata
//!
//! Bucket count defaults to the capacity and never changes, so lookups
//! cost one chain walk.

#![warn(missing_docs)]

mod cache;
mod config;
mod entry;
mod error;
mod file_info;
mod hash;
mod index;
mod list;
mod lru;
mod stats;

pub use cache::MetadataCache;
pub use config::CacheConfig;
pub use error::{Error, Result};
pub use file_info::FileInfo;
pub use hash::{Djb2Hasher, Djb2State};
pub use lru::LruCache;
pub use stats::{CacheStats, StatsSnapshot};
