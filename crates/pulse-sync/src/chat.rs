//! Per-peer chat threads with polling and optimistic sends.
//!
//! A [`ChatThread`] watches one conversation (viewer, peer). Fetches go
//! through the shared [`QueryCache`] under `["conversation", <peer>]`, so
//! several views of the same peer share one request. Sends are shown as
//! pending entries with negative ids until the backend confirms them.

use std::future::Future;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use pulse_client::{ApiError, PulseClient};
use pulse_core::chat::{MessageDraft, ThreadEntry, thread_view};
use pulse_core::entities::{ChatMessage, MessageId, TaskId, UserId};
use pulse_core::enums::UserRole;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::cache::{QueryCache, QueryKey};
use crate::error::{SendError, SyncError};

/// Default polling period for an open conversation.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(5000);

/// Transport for conversation messages.
pub trait ConversationSource: Send + Sync {
    fn fetch_conversation(
        &self,
        peer: UserId,
    ) -> impl Future<Output = Result<Vec<ChatMessage>, ApiError>> + Send;

    fn post_message(
        &self,
        draft: &MessageDraft,
    ) -> impl Future<Output = Result<ChatMessage, ApiError>> + Send;
}

impl ConversationSource for PulseClient {
    fn fetch_conversation(
        &self,
        peer: UserId,
    ) -> impl Future<Output = Result<Vec<ChatMessage>, ApiError>> + Send {
        self.conversation(peer)
    }

    fn post_message(
        &self,
        draft: &MessageDraft,
    ) -> impl Future<Output = Result<ChatMessage, ApiError>> + Send {
        self.send_message(draft)
    }
}

#[derive(Debug, Clone)]
struct Pending {
    message: ChatMessage,
    /// The stored message, once the backend accepted the send.
    confirmed: Option<ChatMessage>,
}

/// Renderable state of a thread.
#[derive(Debug, Clone, Default)]
pub struct ThreadView {
    pub entries: Vec<ThreadEntry>,
    /// Last fetch error; `entries` still holds the previous data.
    pub error: Option<String>,
    pub is_fetching: bool,
}

/// One conversation with one peer.
#[derive(Debug)]
pub struct ChatThread<S> {
    source: Arc<S>,
    cache: Arc<QueryCache<Vec<ChatMessage>>>,
    role: UserRole,
    sender_name: String,
    peer: Option<UserId>,
    task: Option<TaskId>,
    pending: Mutex<Vec<Pending>>,
    next_temp_id: AtomicI64,
}

impl<S: ConversationSource> ChatThread<S> {
    #[must_use]
    pub fn new(source: Arc<S>, cache: Arc<QueryCache<Vec<ChatMessage>>>, role: UserRole) -> Self {
        Self {
            source,
            cache,
            role,
            sender_name: String::new(),
            peer: None,
            task: None,
            pending: Mutex::new(Vec::new()),
            next_temp_id: AtomicI64::new(-1),
        }
    }

    #[must_use]
    pub const fn with_peer(mut self, peer: UserId) -> Self {
        self.peer = Some(peer);
        self
    }

    /// Narrow the rendered thread to one task. Fetching is unaffected.
    #[must_use]
    pub const fn with_task(mut self, task: TaskId) -> Self {
        self.task = Some(task);
        self
    }

    /// Name shown on pending entries.
    #[must_use]
    pub fn with_sender_name(mut self, name: impl Into<String>) -> Self {
        self.sender_name = name.into();
        self
    }

    /// Switch to another peer (or none). Pending entries of the old peer are dropped.
    pub fn set_peer(&mut self, peer: Option<UserId>) {
        if self.peer != peer {
            self.peer = peer;
            self.pending_lock().clear();
        }
    }

    #[must_use]
    pub const fn peer(&self) -> Option<UserId> {
        self.peer
    }

    /// Cache key, `None` while no peer is selected.
    #[must_use]
    pub fn key(&self) -> Option<QueryKey> {
        self.peer.map(QueryKey::conversation)
    }

    /// Load the conversation, reusing fresh cached data. No-op without a peer.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError`] if the fetch failed.
    pub async fn load(&self) -> Result<(), SyncError> {
        let Some(peer) = self.peer else {
            return Ok(());
        };
        let key = QueryKey::conversation(peer);
        let source = Arc::clone(&self.source);
        self.cache
            .fetch(&key, || async move { source.fetch_conversation(peer).await })
            .await
            .map(drop)
    }

    /// Fetch the conversation now. No-op without a peer.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError`] if the fetch failed.
    pub async fn refresh(&self) -> Result<(), SyncError> {
        let Some(peer) = self.peer else {
            return Ok(());
        };
        let key = QueryKey::conversation(peer);
        let source = Arc::clone(&self.source);
        self.cache
            .refetch(&key, || async move { source.fetch_conversation(peer).await })
            .await
            .map(drop)
    }

    /// Send `draft`, showing it as pending until confirmed.
    ///
    /// On success the conversation is invalidated and refetched. If that
    /// refetch fails the confirmed message stays in [`view`](Self::view)
    /// until a later fetch contains it. On failure the pending entry is
    /// removed and the draft is returned unchanged.
    ///
    /// A draft addressed to another peer is sent without a pending entry here.
    ///
    /// # Errors
    ///
    /// Returns [`SendError`] carrying the draft when validation or the request fails.
    pub async fn send(&self, mut draft: MessageDraft) -> Result<ChatMessage, SendError> {
        if draft.task.is_none() {
            draft.task = self.task;
        }
        if let Err(error) = draft.validate() {
            return Err(SendError {
                draft,
                source: error.into(),
            });
        }

        let shown = self.peer == Some(draft.peer);
        let temp_id = self.next_temp_id.fetch_sub(1, Ordering::Relaxed);
        if shown {
            self.pending_lock().push(Pending {
                message: draft.pending_message(temp_id, self.role, &self.sender_name),
                confirmed: None,
            });
        }

        match self.source.post_message(&draft).await {
            Ok(message) => {
                self.cache.invalidate_prefix(&QueryKey::conversation(draft.peer));
                if shown {
                    self.confirm(temp_id, &message);
                    match self.refresh().await {
                        Ok(()) => self.discard(temp_id),
                        Err(error) => {
                            tracing::warn!(%error, id = message.id, "refetch after send failed");
                        }
                    }
                }
                Ok(message)
            }
            Err(source) => {
                tracing::debug!(%source, temp_id, "send failed");
                self.discard(temp_id);
                Err(SendError { draft, source })
            }
        }
    }

    /// Messages to render: fetched data plus any pending entries, ordered and
    /// attributed to the viewer.
    #[must_use]
    pub fn view(&self) -> ThreadView {
        let Some(key) = self.key() else {
            return ThreadView::default();
        };
        let state = self.cache.snapshot(&key);
        let mut messages: Vec<ChatMessage> = state.data.as_deref().cloned().unwrap_or_default();

        let mut pending = self.pending_lock();
        pending.retain(|entry| {
            entry
                .confirmed
                .as_ref()
                .is_none_or(|sent| messages.iter().all(|m| m.id != sent.id))
        });
        let extra: Vec<ChatMessage> = pending
            .iter()
            .map(|entry| entry.confirmed.as_ref().unwrap_or(&entry.message).clone())
            .collect();
        drop(pending);
        messages.extend(extra);

        ThreadView {
            entries: thread_view(messages, self.task, self.role),
            error: state.error,
            is_fetching: state.is_fetching,
        }
    }

    fn confirm(&self, temp_id: MessageId, sent: &ChatMessage) {
        if let Some(entry) = self
            .pending_lock()
            .iter_mut()
            .find(|entry| entry.message.id == temp_id)
        {
            entry.confirmed = Some(sent.clone());
        }
    }

    fn discard(&self, temp_id: MessageId) {
        self.pending_lock().retain(|entry| entry.message.id != temp_id);
    }

    fn pending_lock(&self) -> MutexGuard<'_, Vec<Pending>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<S: ConversationSource + 'static> ChatThread<S> {
    /// Refetch every `interval` on a background task until the handle is
    /// stopped or dropped. The first tick fires immediately.
    #[must_use]
    pub fn spawn_polling(self: &Arc<Self>, interval: Duration) -> PollHandle {
        let thread = Arc::clone(self);
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if let Err(error) = thread.refresh().await {
                    tracing::warn!(%error, peer = ?thread.peer, "chat poll failed");
                }
            }
        });
        PollHandle { handle }
    }
}

/// Stops a polling task when stopped or dropped.
#[derive(Debug)]
pub struct PollHandle {
    handle: JoinHandle<()>,
}

impl PollHandle {
    pub fn stop(self) {
        drop(self);
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
