//! Keyed query cache with request deduplication and generation tracking.
//!
//! Each [`QueryKey`] owns one slot. A slot remembers the last good value, the
//! last error, and a generation counter bumped by every request it starts.
//! When a response arrives for a generation that is no longer current, it is
//! handed back to its own caller but never written into the slot, so an older
//! in-flight response cannot overwrite a newer one.
//!
//! The slot map sits behind a `std::sync::Mutex` that is only held for
//! bookkeeping, never across an `.await`.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use pulse_client::ApiError;
use pulse_core::entities::UserId;
use pulse_core::projection::TaskFilters;
use tokio::sync::Notify;
use tokio::time::Instant;

use crate::error::SyncError;

// ---------------------------------------------------------------------------
// QueryKey
// ---------------------------------------------------------------------------

/// Ordered list of string segments identifying a query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    #[must_use]
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// `["tasks"]`: prefix of every task list key.
    #[must_use]
    pub fn tasks_root() -> Self {
        Self::new(["tasks"])
    }

    /// `["tasks", <filters>]`.
    #[must_use]
    pub fn tasks(filters: &TaskFilters) -> Self {
        Self::new(["tasks".to_string(), filters.cache_segment()])
    }

    /// `["conversation", <peer id>]`.
    #[must_use]
    pub fn conversation(peer: UserId) -> Self {
        Self::new(["conversation".to_string(), peer.to_string()])
    }

    #[must_use]
    pub fn executors() -> Self {
        Self::new(["executors"])
    }

    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Whether `prefix` matches this key segment by segment.
    #[must_use]
    pub fn starts_with(&self, prefix: &Self) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(", "))
    }
}

// ---------------------------------------------------------------------------
// Slots
// ---------------------------------------------------------------------------

/// Read-only view of one slot.
#[derive(Debug)]
pub struct QueryState<V> {
    pub data: Option<Arc<V>>,
    pub error: Option<String>,
    pub is_fetching: bool,
    pub is_stale: bool,
    pub updated_at: Option<Instant>,
}

impl<V> Default for QueryState<V> {
    fn default() -> Self {
        Self {
            data: None,
            error: None,
            is_fetching: false,
            is_stale: true,
            updated_at: None,
        }
    }
}

#[derive(Debug, Clone)]
struct SlotError {
    message: String,
    auth_expired: bool,
}

#[derive(Debug)]
struct Slot<V> {
    data: Option<Arc<V>>,
    error: Option<SlotError>,
    stale: bool,
    in_flight: bool,
    generation: u64,
    /// Newest generation started before the last invalidation.
    invalidated: u64,
    updated_at: Option<Instant>,
    notify: Arc<Notify>,
}

impl<V> Default for Slot<V> {
    fn default() -> Self {
        Self {
            data: None,
            error: None,
            stale: true,
            in_flight: false,
            generation: 0,
            invalidated: 0,
            updated_at: None,
            notify: Arc::new(Notify::new()),
        }
    }
}

impl<V> Slot<V> {
    fn is_stale(&self, stale_after: Option<Duration>) -> bool {
        if self.stale || self.data.is_none() {
            return true;
        }
        match (stale_after, self.updated_at) {
            (Some(limit), Some(at)) => at.elapsed() >= limit,
            _ => false,
        }
    }

    /// Whether the running request was started before an invalidation.
    const fn in_flight_is_outdated(&self) -> bool {
        self.in_flight && self.generation <= self.invalidated
    }

    fn begin(&mut self) -> u64 {
        self.generation += 1;
        self.in_flight = true;
        self.generation
    }

    fn settle(&mut self) {
        self.in_flight = false;
        self.notify.notify_waiters();
    }

    fn outcome(&self, key: &QueryKey) -> Result<Arc<V>, SyncError> {
        if let Some(data) = &self.data {
            if self.error.is_none() {
                return Ok(Arc::clone(data));
            }
        }
        match &self.error {
            Some(error) => Err(SyncError::Shared {
                message: error.message.clone(),
                auth_expired: error.auth_expired,
            }),
            None => Err(SyncError::Abandoned(key.to_string())),
        }
    }
}

enum Plan<V> {
    Cached(Arc<V>),
    Join,
    Load(u64),
}

// ---------------------------------------------------------------------------
// QueryCache
// ---------------------------------------------------------------------------

/// Cache of query results of type `V`.
#[derive(Debug)]
pub struct QueryCache<V> {
    slots: Mutex<HashMap<QueryKey, Slot<V>>>,
    stale_after: Option<Duration>,
}

impl<V> Default for QueryCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> QueryCache<V> {
    /// Cache whose entries stay fresh until invalidated.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
            stale_after: None,
        }
    }

    /// Cache whose entries also go stale `stale_after` after their last update.
    #[must_use]
    pub fn with_stale_after(stale_after: Duration) -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
            stale_after: Some(stale_after),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<QueryKey, Slot<V>>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Return fresh cached data, join an in-flight request for `key`, or run
    /// `loader` as a new generation.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Api`] when this call's own request failed, or
    /// [`SyncError::Shared`] when the joined request failed.
    pub async fn fetch<F, Fut>(&self, key: &QueryKey, loader: F) -> Result<Arc<V>, SyncError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, ApiError>>,
    {
        let plan = {
            let mut slots = self.lock();
            let slot = slots.entry(key.clone()).or_default();
            let cached = slot
                .data
                .as_ref()
                .filter(|_| !slot.is_stale(self.stale_after))
                .map(Arc::clone);
            match cached {
                Some(data) => Plan::Cached(data),
                None if slot.in_flight && !slot.in_flight_is_outdated() => Plan::Join,
                None => Plan::Load(slot.begin()),
            }
        };

        match plan {
            Plan::Cached(data) => {
                tracing::trace!(%key, "cache hit");
                Ok(data)
            }
            Plan::Join => {
                tracing::trace!(%key, "joining in-flight request");
                self.wait_for(key).await
            }
            Plan::Load(generation) => self.run(key, generation, loader).await,
        }
    }

    /// Start a new generation for `key` regardless of cached state.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Api`] when the request failed.
    pub async fn refetch<F, Fut>(&self, key: &QueryKey, loader: F) -> Result<Arc<V>, SyncError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, ApiError>>,
    {
        let generation = self.lock().entry(key.clone()).or_default().begin();
        self.run(key, generation, loader).await
    }

    /// Mark every slot whose key starts with `prefix` as stale. Returns how
    /// many slots were marked.
    ///
    /// A request already running for a marked slot still lands its data, but
    /// the slot stays stale and the next read starts a new request.
    pub fn invalidate_prefix(&self, prefix: &QueryKey) -> usize {
        let mut slots = self.lock();
        let mut marked = 0;
        for (key, slot) in slots.iter_mut() {
            if key.starts_with(prefix) {
                slot.stale = true;
                slot.invalidated = slot.generation;
                marked += 1;
            }
        }
        tracing::debug!(%prefix, marked, "invalidated queries");
        marked
    }

    /// Current state of `key`.
    #[must_use]
    pub fn snapshot(&self, key: &QueryKey) -> QueryState<V> {
        self.lock().get(key).map_or_else(QueryState::default, |slot| QueryState {
            data: slot.data.clone(),
            error: slot.error.as_ref().map(|e| e.message.clone()),
            is_fetching: slot.in_flight,
            is_stale: slot.is_stale(self.stale_after),
            updated_at: slot.updated_at,
        })
    }

    /// Current generation of `key` (0 if never requested).
    #[must_use]
    pub fn generation(&self, key: &QueryKey) -> u64 {
        self.lock().get(key).map_or(0, |slot| slot.generation)
    }

    /// Drop every slot. Waiters on in-flight requests are released.
    pub fn clear(&self) {
        let mut slots = self.lock();
        for slot in slots.values() {
            slot.notify.notify_waiters();
        }
        slots.clear();
    }

    async fn run<F, Fut>(&self, key: &QueryKey, generation: u64, loader: F) -> Result<Arc<V>, SyncError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, ApiError>>,
    {
        let mut guard = InFlight {
            cache: self,
            key,
            generation,
            armed: true,
        };
        let result = loader().await;
        guard.armed = false;

        let mut slots = self.lock();
        let slot = slots.entry(key.clone()).or_default();
        let current = slot.generation == generation;
        if !current {
            tracing::debug!(
                %key,
                generation,
                current = slot.generation,
                "discarding superseded response"
            );
        }

        match result {
            Ok(value) => {
                let value = Arc::new(value);
                if current {
                    slot.data = Some(Arc::clone(&value));
                    slot.error = None;
                    slot.stale = generation <= slot.invalidated;
                    slot.updated_at = Some(Instant::now());
                    slot.settle();
                }
                Ok(value)
            }
            Err(error) => {
                if current {
                    tracing::debug!(%key, %error, "query failed");
                    slot.error = Some(SlotError {
                        message: error.to_string(),
                        auth_expired: error.is_auth_expired(),
                    });
                    slot.settle();
                }
                Err(SyncError::Api(error))
            }
        }
    }

    async fn wait_for(&self, key: &QueryKey) -> Result<Arc<V>, SyncError> {
        loop {
            let notify = {
                let slots = self.lock();
                match slots.get(key) {
                    None => return Err(SyncError::Abandoned(key.to_string())),
                    Some(slot) if !slot.in_flight => return slot.outcome(key),
                    Some(slot) => Arc::clone(&slot.notify),
                }
            };

            let notified = notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            {
                let slots = self.lock();
                match slots.get(key) {
                    None => return Err(SyncError::Abandoned(key.to_string())),
                    Some(slot) if !slot.in_flight => return slot.outcome(key),
                    Some(_) => {}
                }
            }

            notified.await;
        }
    }
}

/// Releases the slot if the loader future is dropped before completing.
struct InFlight<'a, V> {
    cache: &'a QueryCache<V>,
    key: &'a QueryKey,
    generation: u64,
    armed: bool,
}

impl<V> Drop for InFlight<'_, V> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut slots = self.cache.lock();
        if let Some(slot) = slots.get_mut(self.key) {
            if slot.generation == self.generation && slot.in_flight {
                tracing::debug!(key = %self.key, generation = self.generation, "request cancelled");
                slot.settle();
            }
        }
    }
}
