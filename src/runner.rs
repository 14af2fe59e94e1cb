//! The dual-state synchronizer.
//!
//! [`ActionRunner::run_action`] is the single entry point through which an
//! action touches the two state slices. The observable effects of one run
//! are strictly ordered:
//!
//! 1. The agent-context store is marked busy (`finished = false`) before
//!    the invoker is dispatched - any concurrent reader sees "busy" for the
//!    full duration of the call.
//! 2. The invoker is awaited (the only suspension point).
//! 3. The conversation store receives an appended entry - a result card on
//!    success, a visible error entry on failure. Appends only; the existing
//!    tail is never touched.
//! 4. A context note is recorded and `finished` returns to `true`.
//!
//! Overlapping runs are not serialized against each other; both busy-flag
//! writes and both appends race, and conversation order reflects completion
//! order. Callers who want serialization use [`ActionRunner::try_run_action`],
//! which rejects a trigger while another is in flight.

use std::sync::Arc;

use anyhow::Result;
use log::{info, warn};

use crate::card::{ConversationEntry, ResultCard};
use crate::invoker::ActionInvoker;
use crate::stores::{ContextStore, ConversationStore};
use crate::types::Action;

/// Outcome of a gated trigger (see [`ActionRunner::try_run_action`]).
#[derive(Debug)]
pub enum TriggerOutcome {
    /// The action ran and this entry was appended.
    Ran(ConversationEntry),
    /// Another action was in flight; nothing was dispatched.
    Busy,
}

impl TriggerOutcome {
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        matches!(self, Self::Busy)
    }
}

/// Coordinates one conversation's invoker and state-store pair.
pub struct ActionRunner<I, C, X> {
    invoker: Arc<I>,
    conversation: Arc<C>,
    context: Arc<X>,
}

impl<I, C, X> ActionRunner<I, C, X>
where
    I: ActionInvoker,
    C: ConversationStore,
    X: ContextStore,
{
    #[must_use]
    pub fn new(invoker: Arc<I>, conversation: Arc<C>, context: Arc<X>) -> Self {
        Self {
            invoker,
            conversation,
            context,
        }
    }

    /// Run one action through the full lifecycle and return the entry that
    /// was appended.
    ///
    /// A failed invocation still appends a visible error entry - the
    /// conversation never silently loses a turn - and every path through
    /// this function restores `finished = true` at settlement.
    ///
    /// # Errors
    /// Returns an error only when a store operation fails; invocation
    /// failures surface as error entries, not as `Err`.
    pub async fn run_action(&self, action: Action) -> Result<ConversationEntry> {
        info!("request received for {} action", action.kind());

        // Busy before dispatch, not after: a reader that observes the
        // appended entry must have been able to observe the busy flag first.
        self.context.set_finished(false).await?;

        let outcome = self.invoker.invoke(&action).await;

        let entry = match outcome {
            Ok(output) => ConversationEntry::card(ResultCard::from_output(output)),
            Err(error) => {
                warn!("{} action failed: {error}", action.kind());
                ConversationEntry::error(error.to_string())
            }
        };

        let appended = entry.clone();
        let append_result = self.conversation.append(entry).await;

        // Settlement runs even when the append failed; the context store
        // must not be left permanently busy.
        let note = settlement_note(&action, &appended);
        if let Err(error) = self.context.push_note(note).await {
            warn!("failed to record context note: {error}");
        }
        self.context.set_finished(true).await?;

        append_result?;
        Ok(appended)
    }

    /// Gated variant of [`run_action`](Self::run_action): rejects the
    /// trigger without dispatching anything while another action is in
    /// flight.
    ///
    /// This serializes triggers behind the busy flag instead of letting
    /// them race; it is an explicit opt-in, not the default behavior.
    ///
    /// # Errors
    /// Returns an error when a store operation fails.
    pub async fn try_run_action(&self, action: Action) -> Result<TriggerOutcome> {
        if !self.context.is_finished().await? {
            return Ok(TriggerOutcome::Busy);
        }
        Ok(TriggerOutcome::Ran(self.run_action(action).await?))
    }
}

fn settlement_note(action: &Action, entry: &ConversationEntry) -> String {
    if entry.is_error() {
        format!("failed: {}", action.describe())
    } else {
        format!("completed: {}", action.describe())
    }
}
