//! Chat thread ordering and ownership.

use chrono::Utc;

use crate::entities::{ChatMessage, MessageId, TaskId, Upload, UserId};
use crate::enums::UserRole;
use crate::errors::CoreError;

/// An outgoing message before the backend has seen it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageDraft {
    pub peer: UserId,
    pub task: Option<TaskId>,
    pub text: String,
    pub file: Option<Upload>,
}

impl MessageDraft {
    #[must_use]
    pub fn text(peer: UserId, text: impl Into<String>) -> Self {
        Self {
            peer,
            task: None,
            text: text.into(),
            file: None,
        }
    }

    #[must_use]
    pub const fn for_task(mut self, task: TaskId) -> Self {
        self.task = Some(task);
        self
    }

    #[must_use]
    pub fn with_file(mut self, file: Upload) -> Self {
        self.file = Some(file);
        self
    }

    /// Trimmed text, `None` when blank.
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        Some(self.text.trim()).filter(|text| !text.is_empty())
    }

    /// A draft needs text unless a file is attached.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` when both are empty.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.body().is_none() && self.file.is_none() {
            return Err(CoreError::Validation("message needs text or a file".into()));
        }
        Ok(())
    }

    /// Placeholder shown while the send is in flight.
    #[must_use]
    pub fn pending_message(&self, id: MessageId, role: UserRole, sender_name: &str) -> ChatMessage {
        ChatMessage {
            id,
            task: self.task,
            task_title: None,
            sender: None,
            sender_name: sender_name.to_string(),
            is_from_creator: role == UserRole::Creator,
            is_from_executor: role == UserRole::Executor,
            text: self.body().map(str::to_string),
            file_url: self.file.as_ref().map(|file| file.file_name.clone()),
            created_at: Utc::now(),
        }
    }
}

/// A message ready to render, with ownership resolved for the viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadEntry {
    pub message: ChatMessage,
    pub is_mine: bool,
}

impl ThreadEntry {
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.message.is_pending()
    }
}

/// Sort messages ascending by `created_at`, breaking ties by id.
///
/// The result depends only on the set of messages, not on input order.
pub fn order_messages(messages: &mut [ChatMessage]) {
    messages.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
}

/// Whether `message` belongs to a viewer acting as `role`.
///
/// Attribution follows the viewer's role, not the sender id.
#[must_use]
pub const fn is_mine(message: &ChatMessage, role: UserRole) -> bool {
    match role {
        UserRole::Creator => message.is_from_creator,
        UserRole::Executor => message.is_from_executor,
    }
}

/// Narrow a conversation to messages tagged with `task`. `None` keeps everything.
#[must_use]
pub fn for_task(messages: Vec<ChatMessage>, task: Option<TaskId>) -> Vec<ChatMessage> {
    match task {
        None => messages,
        Some(id) => messages.into_iter().filter(|m| m.task == Some(id)).collect(),
    }
}

/// Order, narrow, and attribute a conversation for rendering.
#[must_use]
pub fn thread_view(messages: Vec<ChatMessage>, task: Option<TaskId>, role: UserRole) -> Vec<ThreadEntry> {
    let mut messages = for_task(messages, task);
    order_messages(&mut messages);
    messages
        .into_iter()
        .map(|message| ThreadEntry {
            is_mine: is_mine(&message, role),
            message,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn msg(id: i64, secs: i64, from_creator: bool) -> ChatMessage {
        ChatMessage {
            id,
            task: None,
            task_title: None,
            sender: Some(if from_creator { 1 } else { 2 }),
            sender_name: String::new(),
            is_from_creator: from_creator,
            is_from_executor: !from_creator,
            text: Some(format!("m{id}")),
            file_url: None,
            created_at: Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap(),
        }
    }

    fn ids(messages: &[ChatMessage]) -> Vec<i64> {
        messages.iter().map(|m| m.id).collect()
    }

    #[test]
    fn orders_by_timestamp_regardless_of_arrival() {
        let mut messages = vec![msg(3, 30, true), msg(1, 10, false), msg(2, 20, true)];
        order_messages(&mut messages);
        assert_eq!(ids(&messages), vec![1, 2, 3]);
    }

    #[test]
    fn every_permutation_gives_the_same_order() {
        let base = [msg(5, 10, true), msg(4, 10, false), msg(9, 5, true)];
        let permutations = [[0, 1, 2], [0, 2, 1], [1, 0, 2], [1, 2, 0], [2, 0, 1], [2, 1, 0]];
        let expected = vec![9, 4, 5];
        for perm in permutations {
            let mut messages: Vec<ChatMessage> = perm.iter().map(|&i| base[i].clone()).collect();
            order_messages(&mut messages);
            assert_eq!(ids(&messages), expected, "permutation {perm:?}");
        }
    }

    #[rstest]
    #[case(UserRole::Creator, true, true)]
    #[case(UserRole::Creator, false, false)]
    #[case(UserRole::Executor, true, false)]
    #[case(UserRole::Executor, false, true)]
    fn ownership_follows_viewer_role(#[case] role: UserRole, #[case] from_creator: bool, #[case] mine: bool) {
        assert_eq!(is_mine(&msg(1, 0, from_creator), role), mine);
    }

    #[test]
    fn task_filter_is_client_side() {
        let mut tagged = msg(1, 0, true);
        tagged.task = Some(42);
        let untagged = msg(2, 1, false);
        let messages = vec![tagged, untagged];

        assert_eq!(ids(&for_task(messages.clone(), Some(42))), vec![1]);
        assert_eq!(ids(&for_task(messages, None)), vec![1, 2]);
    }

    #[test]
    fn blank_draft_without_file_is_rejected() {
        let draft = MessageDraft::text(2, "   ");
        assert!(matches!(draft.validate(), Err(CoreError::Validation(_))));

        let with_file = draft.with_file(Upload::new("scan.pdf", vec![1, 2, 3]));
        assert!(with_file.validate().is_ok());
        assert_eq!(with_file.body(), None);
    }

    #[test]
    fn pending_message_is_owned_by_sender_role() {
        let draft = MessageDraft::text(2, "  привет ").for_task(9);
        let pending = draft.pending_message(-1, UserRole::Executor, "Я");
        assert!(pending.is_pending());
        assert_eq!(pending.text.as_deref(), Some("привет"));
        assert_eq!(pending.task, Some(9));
        assert!(is_mine(&pending, UserRole::Executor));
    }

    #[test]
    fn thread_view_marks_ownership() {
        let view = thread_view(vec![msg(2, 5, false), msg(1, 1, true)], None, UserRole::Executor);
        let flags: Vec<(i64, bool)> = view.iter().map(|e| (e.message.id, e.is_mine)).collect();
        assert_eq!(flags, vec![(1, false), (2, true)]);
    }
}
