//! Diagnostic settings cache
//!
//! Memoizes "does resource X have diagnostic settings" for the lifetime of one
//! scan. The first query for a resource id performs the remote lookup; every
//! later query for the same id returns the stored answer.
//!
//! Lookups are single-flight: concurrent first queries for the same id share
//! one remote call. Failed lookups are memoized as well, so a failing id is
//! queried at most once per scan.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use tokio::sync::OnceCell;

use crate::error::{ProviderError, ScanError};

/// Remote query answering whether a resource has diagnostic settings.
#[async_trait]
pub trait DiagnosticsLookup: Send + Sync {
    async fn has_diagnostics(&self, resource_id: &str) -> Result<bool, ProviderError>;
}

type Entry = Arc<OnceCell<Result<bool, String>>>;

/// Per-scan memoizing cache over a [`DiagnosticsLookup`].
pub struct DiagnosticsCache {
    lookup: Arc<dyn DiagnosticsLookup>,

    /// Entries keyed by lower-cased resource id (ARM ids are case-insensitive)
    entries: RwLock<HashMap<String, Entry>>,

    remote_queries: AtomicUsize,
}

impl DiagnosticsCache {
    pub fn new(lookup: Arc<dyn DiagnosticsLookup>) -> Self {
        Self {
            lookup,
            entries: RwLock::new(HashMap::new()),
            remote_queries: AtomicUsize::new(0),
        }
    }

    /// Whether the resource has diagnostic settings.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::RemoteLookup`] when the remote query failed. The
    /// failure is cached like a success.
    pub async fn has_diagnostics(&self, resource_id: &str) -> Result<bool, ScanError> {
        let entry = self.entry(resource_id);

        let outcome = entry
            .get_or_init(|| async {
                self.remote_queries.fetch_add(1, Ordering::SeqCst);
                tracing::debug!(resource = resource_id, "Diagnostics cache miss");
                self.lookup
                    .has_diagnostics(resource_id)
                    .await
                    .map_err(|e| e.to_string())
            })
            .await;

        match outcome {
            Ok(has) => Ok(*has),
            Err(message) => Err(ScanError::RemoteLookup {
                resource_id: resource_id.to_string(),
                message: message.clone(),
            }),
        }
    }

    fn entry(&self, resource_id: &str) -> Entry {
        let key = resource_id.to_lowercase();

        {
            let entries = match self.entries.read() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            if let Some(entry) = entries.get(&key) {
                return Arc::clone(entry);
            }
        }

        let mut entries = match self.entries.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        Arc::clone(entries.entry(key).or_default())
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        let entries = match self.entries.read() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        };

        CacheStats {
            total_entries: entries,
            remote_queries: self.remote_queries.load(Ordering::SeqCst),
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of resource ids seen
    pub total_entries: usize,
    /// Number of remote lookups performed
    pub remote_queries: usize,
}
