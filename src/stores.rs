//! Storage traits for the two state slices of a conversation.
//!
//! Every conversation owns exactly one pair of stores:
//!
//! - [`ConversationStore`] - Append-only log of rendered entries, visible to
//!   the user. Entries are never mutated or removed once appended.
//! - [`ContextStore`] - Single mutable record tracking whether an action is
//!   in flight, plus accumulated context notes from prior actions.
//!
//! Call sites never mutate either store directly; all writes go through the
//! runner so the ordering contract holds.
//!
//! # Built-in Implementations
//!
//! [`InMemoryConversation`] and [`InMemoryContext`] are suitable for testing
//! and single-process deployments. For durable conversations, implement the
//! traits against your own backend.

use anyhow::{Context as _, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::RwLock;

use crate::card::ConversationEntry;

/// Append-only log of rendered conversation entries.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Append an entry as the new final element.
    ///
    /// # Errors
    /// Returns an error if the entry cannot be stored.
    async fn append(&self, entry: ConversationEntry) -> Result<()>;

    /// All entries, oldest first.
    ///
    /// # Errors
    /// Returns an error if the log cannot be read.
    async fn entries(&self) -> Result<Vec<ConversationEntry>>;

    /// Number of entries appended so far.
    ///
    /// # Errors
    /// Returns an error if the log cannot be read.
    async fn len(&self) -> Result<usize> {
        Ok(self.entries().await?.len())
    }
}

/// The agent-context record: a coarse in-flight flag plus accumulated
/// notes. One per conversation, mutated in place for its whole lifetime.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AgentContext {
    /// `false` while an action is in flight. A coarse semaphore, not a
    /// queue: overlapping actions share it (see crate docs on ordering).
    pub finished: bool,
    /// One line per settled action, oldest first.
    pub notes: Vec<String>,
}

impl Default for AgentContext {
    fn default() -> Self {
        Self {
            finished: true,
            notes: Vec::new(),
        }
    }
}

/// Mutable store for the agent-context record.
#[async_trait]
pub trait ContextStore: Send + Sync {
    /// Set the in-flight flag.
    ///
    /// # Errors
    /// Returns an error if the record cannot be written.
    async fn set_finished(&self, finished: bool) -> Result<()>;

    /// Read the in-flight flag.
    ///
    /// # Errors
    /// Returns an error if the record cannot be read.
    async fn is_finished(&self) -> Result<bool>;

    /// Append a context note for a settled action.
    ///
    /// # Errors
    /// Returns an error if the record cannot be written.
    async fn push_note(&self, note: String) -> Result<()>;

    /// Snapshot of the whole record.
    ///
    /// # Errors
    /// Returns an error if the record cannot be read.
    async fn context(&self) -> Result<AgentContext>;
}

/// In-memory append-only conversation log.
#[derive(Default)]
pub struct InMemoryConversation {
    entries: RwLock<Vec<ConversationEntry>>,
}

impl InMemoryConversation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConversationStore for InMemoryConversation {
    async fn append(&self, entry: ConversationEntry) -> Result<()> {
        self.entries
            .write()
            .ok()
            .context("lock poisoned")?
            .push(entry);
        Ok(())
    }

    async fn entries(&self) -> Result<Vec<ConversationEntry>> {
        let entries = self.entries.read().ok().context("lock poisoned")?;
        Ok(entries.clone())
    }
}

/// In-memory agent-context record, initialized not-busy.
#[derive(Default)]
pub struct InMemoryContext {
    state: RwLock<AgentContext>,
}

impl InMemoryContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ContextStore for InMemoryContext {
    async fn set_finished(&self, finished: bool) -> Result<()> {
        self.state
            .write()
            .ok()
            .context("lock poisoned")?
            .finished = finished;
        Ok(())
    }

    async fn is_finished(&self) -> Result<bool> {
        let state = self.state.read().ok().context("lock poisoned")?;
        Ok(state.finished)
    }

    async fn push_note(&self, note: String) -> Result<()> {
        self.state
            .write()
            .ok()
            .context("lock poisoned")?
            .notes
            .push(note);
        Ok(())
    }

    async fn context(&self) -> Result<AgentContext> {
        let state = self.state.read().ok().context("lock poisoned")?;
        Ok(state.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn conversation_appends_in_order() -> Result<()> {
        let store = InMemoryConversation::new();

        assert_eq!(store.len().await?, 0);

        let first = ConversationEntry::error("first");
        let second = ConversationEntry::error("second");
        let first_id = first.id;

        store.append(first).await?;
        store.append(second).await?;

        let entries = store.entries().await?;
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, first_id);
        assert!(entries[0].render().contains("first"));
        assert!(entries[1].render().contains("second"));

        Ok(())
    }

    #[tokio::test]
    async fn context_starts_not_busy() -> Result<()> {
        let store = InMemoryContext::new();
        assert!(store.is_finished().await?);
        assert!(store.context().await?.notes.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn busy_flag_round_trips() -> Result<()> {
        let store = InMemoryContext::new();

        store.set_finished(false).await?;
        assert!(!store.is_finished().await?);

        store.set_finished(true).await?;
        assert!(store.is_finished().await?);

        Ok(())
    }

    #[tokio::test]
    async fn notes_accumulate_in_order() -> Result<()> {
        let store = InMemoryContext::new();

        store.push_note("ran a search".into()).await?;
        store.push_note("ran a forecast".into()).await?;

        let context = store.context().await?;
        assert_eq!(context.notes, vec!["ran a search", "ran a forecast"]);

        Ok(())
    }
}
