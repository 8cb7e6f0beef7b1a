// SQLite-backed key-value store
// Keeps the last good catalog around so the app works offline

pub mod cache;

pub use cache::{CacheError, CacheManager};
