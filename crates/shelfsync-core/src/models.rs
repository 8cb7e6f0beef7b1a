use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

pub use shelfsync_api::{Product, Rating};

/// The last catalog that was fetched in full, with when it was captured
///
/// Stored as one record. Only a successful fetch ever writes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    pub products: Vec<Product>,
    /// Unix epoch milliseconds
    pub timestamp: i64,
}

impl CatalogSnapshot {
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products,
            timestamp: Utc::now().timestamp_millis(),
        }
    }

    pub fn captured_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.timestamp).single()
    }

    /// How old the snapshot is; handy for "cached 5 minutes ago" banners
    pub fn age(&self) -> Option<chrono::Duration> {
        self.captured_at().map(|at| Utc::now() - at)
    }
}

/// Where a successful load came from
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome<T> {
    /// Fresh from the network
    Fetched(T),
    /// The network failed and the last cached copy was used instead
    FallbackToCache(T),
}

impl<T> FetchOutcome<T> {
    pub fn is_fallback(&self) -> bool {
        matches!(self, FetchOutcome::FallbackToCache(_))
    }

    pub fn as_ref(&self) -> FetchOutcome<&T> {
        match self {
            FetchOutcome::Fetched(value) => FetchOutcome::Fetched(value),
            FetchOutcome::FallbackToCache(value) => FetchOutcome::FallbackToCache(value),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> FetchOutcome<U> {
        match self {
            FetchOutcome::Fetched(value) => FetchOutcome::Fetched(f(value)),
            FetchOutcome::FallbackToCache(value) => FetchOutcome::FallbackToCache(f(value)),
        }
    }

    pub fn into_inner(self) -> T {
        match self {
            FetchOutcome::Fetched(value) | FetchOutcome::FallbackToCache(value) => value,
        }
    }
}

/// What the synchronizer is doing right now
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncPhase {
    #[default]
    Idle,
    LoadingCache,
    Fetching,
    Refreshing,
    Offline,
    Error,
}

impl std::fmt::Display for SyncPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncPhase::Idle => write!(f, "idle"),
            SyncPhase::LoadingCache => write!(f, "loading cache"),
            SyncPhase::Fetching => write!(f, "fetching"),
            SyncPhase::Refreshing => write!(f, "refreshing"),
            SyncPhase::Offline => write!(f, "offline"),
            SyncPhase::Error => write!(f, "error"),
        }
    }
}
