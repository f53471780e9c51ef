//! Query cache with staleness windows and optimistic mutations.
//!
//! Reads are fetch-on-demand with a per-call staleness window; resources that
//! need near-realtime freshness poll on a fixed interval in the background.
//! Writes follow the three-phase optimistic protocol once, generically:
//!
//! 1. snapshot the cached value and apply the anticipated result immediately;
//! 2. on failure restore the snapshot verbatim;
//! 3. either way, invalidate the affected keys so the next read reconciles
//!    against the server.
//!
//! The optimistic value must derive purely from the previous cached value and
//! the mutation input; nothing here waits on the network to guess.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::gateway::GatewayError;
use crate::key::QueryKey;

/// Background poll interval for booking lists.
pub const BOOKINGS_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Background poll interval for notification lists; tighter because the
/// realtime feed only covers inserts while the app is connected.
pub const NOTIFICATIONS_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Failures surfaced by cache operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CacheError {
    /// The fetcher failed; no fresh value is available.
    #[error("fetch failed: {source}")]
    Fetch {
        /// The underlying gateway failure.
        #[source]
        source: GatewayError,
    },
    /// A cached or fetched value failed to (de)serialise.
    #[error("cache codec failure: {message}")]
    Codec {
        /// Serde error text.
        message: String,
    },
}

#[derive(Clone)]
struct Entry {
    value: Value,
    fetched_at: Instant,
    stale: bool,
}

/// Shared cache keyed by hierarchical [`QueryKey`]s.
///
/// Values are stored as JSON so one cache serves every resource type; typed
/// access happens at the edges via serde.
#[derive(Clone, Default)]
pub struct QueryCache {
    entries: Arc<Mutex<HashMap<QueryKey, Entry>>>,
}

impl QueryCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<QueryKey, Entry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn encode<T: Serialize>(value: &T) -> Result<Value, CacheError> {
        serde_json::to_value(value).map_err(|err| CacheError::Codec {
            message: err.to_string(),
        })
    }

    fn decode<T: DeserializeOwned>(value: Value) -> Result<T, CacheError> {
        serde_json::from_value(value).map_err(|err| CacheError::Codec {
            message: err.to_string(),
        })
    }

    /// Read the cached value without fetching, regardless of staleness.
    #[must_use]
    pub fn peek<T: DeserializeOwned>(&self, key: &QueryKey) -> Option<T> {
        let value = self.lock().get(key).map(|entry| entry.value.clone())?;
        Self::decode(value).ok()
    }

    /// Store a value, marking the entry fresh.
    pub fn put<T: Serialize>(&self, key: &QueryKey, value: &T) -> Result<(), CacheError> {
        let encoded = Self::encode(value)?;
        self.lock().insert(
            key.clone(),
            Entry {
                value: encoded,
                fetched_at: Instant::now(),
                stale: false,
            },
        );
        Ok(())
    }

    /// Drop an entry entirely.
    pub fn remove(&self, key: &QueryKey) {
        self.lock().remove(key);
    }

    /// Mark every entry under the prefix stale, forcing the next read to
    /// refetch. Parent keys cascade to children.
    pub fn invalidate(&self, prefix: &QueryKey) {
        for (key, entry) in self.lock().iter_mut() {
            if key.starts_with(prefix) {
                entry.stale = true;
            }
        }
    }

    /// Return the cached value when fresh, otherwise run the fetcher and
    /// cache its result.
    ///
    /// An entry is fresh while it is not invalidated and younger than
    /// `staleness`.
    pub async fn fetch<T, F, Fut>(
        &self,
        key: &QueryKey,
        staleness: Duration,
        fetcher: F,
    ) -> Result<T, CacheError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, GatewayError>>,
    {
        let cached = {
            let entries = self.lock();
            entries.get(key).and_then(|entry| {
                (!entry.stale && entry.fetched_at.elapsed() < staleness)
                    .then(|| entry.value.clone())
            })
        };
        if let Some(value) = cached {
            return Self::decode(value);
        }

        let fetched = fetcher()
            .await
            .map_err(|source| CacheError::Fetch { source })?;
        self.put(key, &fetched)?;
        Ok(fetched)
    }

    /// Run a mutation under the three-phase optimistic protocol.
    ///
    /// `apply` computes the anticipated post-mutation value from the previous
    /// cached value alone. On operation failure the pre-mutation snapshot is
    /// restored verbatim; on either outcome the key's subtree is invalidated
    /// so the next read reconciles with the server.
    pub async fn mutate<T, R, A, F, Fut>(
        &self,
        key: &QueryKey,
        apply: A,
        operation: F,
    ) -> Result<R, GatewayError>
    where
        T: Serialize + DeserializeOwned,
        A: FnOnce(Option<T>) -> T,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<R, GatewayError>>,
    {
        // Phase 1: snapshot, then apply the optimistic guess.
        let snapshot = self.lock().get(key).cloned();
        let previous: Option<T> = snapshot
            .as_ref()
            .and_then(|entry| Self::decode(entry.value.clone()).ok());
        let optimistic = apply(previous);
        if let Err(err) = self.put(key, &optimistic) {
            debug!(key = %key, error = %err, "optimistic value not cacheable");
        }

        let result = operation().await;

        // Phase 2: on failure, restore the snapshot verbatim.
        if result.is_err() {
            let mut entries = self.lock();
            match snapshot {
                Some(entry) => {
                    entries.insert(key.clone(), entry);
                }
                None => {
                    entries.remove(key);
                }
            }
        }

        // Phase 3: reconcile either way.
        self.invalidate(key);
        result
    }

    /// Poll a key on a fixed interval until the returned handle drops.
    ///
    /// Polling continues in the background regardless of reads; each round
    /// overwrites the entry with a fresh value. Fetch failures keep the last
    /// value and log at debug level.
    pub fn spawn_poll<T, F, Fut>(
        &self,
        key: QueryKey,
        interval: Duration,
        fetcher: F,
    ) -> PollHandle
    where
        T: Serialize + DeserializeOwned + Send + 'static,
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, GatewayError>> + Send + 'static,
    {
        let cache = self.clone();
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                match fetcher().await {
                    Ok(value) => {
                        if let Err(err) = cache.put(&key, &value) {
                            debug!(key = %key, error = %err, "poll result not cacheable");
                        }
                    }
                    Err(err) => {
                        debug!(key = %key, error = %err, "background poll failed");
                    }
                }
            }
        });
        PollHandle { handle }
    }
}

/// Handle owning a background polling task; dropping it stops the poll.
pub struct PollHandle {
    handle: JoinHandle<()>,
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
