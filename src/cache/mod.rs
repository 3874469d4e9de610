//! Per-slot markup memo keyed by widget identity.

mod core;

pub use self::core::{CacheEntry, MarkupCache, fingerprint};
