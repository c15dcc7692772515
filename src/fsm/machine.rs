//! State machine that commits legal moves for one conversation.

use super::commit::Commit;
use super::error::FsmError;
use crate::core::{CommittedMove, MoveLog, State, Transition};
use crate::table::{TransitionSet, TransitionTable};
use chrono::Utc;
use std::sync::Arc;

/// Finite state machine for one conversation.
///
/// Checking whether a move is legal is pure and uses the transition table.
/// Recording the move is delegated to the injected [`Commit`]. A move is
/// all-or-nothing: the current state only advances once the commit
/// succeeded.
pub struct Fsm<'t, C: Commit> {
    current: State,
    table: TableRef<'t>,
    on_commit: C,
    history: MoveLog,
}

enum TableRef<'t> {
    Shared(Arc<TransitionTable>),
    Borrowed(&'t TransitionTable),
}

impl TableRef<'_> {
    fn get(&self) -> &TransitionTable {
        match self {
            Self::Shared(table) => table,
            Self::Borrowed(table) => table,
        }
    }
}

impl<C: Commit> Fsm<'static, C> {
    /// Create a machine over the standard conversation graph.
    pub fn new(initial: State, on_commit: C) -> Self {
        Self {
            current: initial,
            table: TableRef::Shared(TransitionTable::standard()),
            on_commit,
            history: MoveLog::new(),
        }
    }
}

impl<'t, C: Commit> Fsm<'t, C> {
    /// Create a machine over a caller-supplied table.
    pub fn with_table(table: &'t TransitionTable, initial: State, on_commit: C) -> Self {
        Self {
            current: initial,
            table: TableRef::Borrowed(table),
            on_commit,
            history: MoveLog::new(),
        }
    }

    /// Get current state (pure)
    pub fn current_state(&self) -> State {
        self.current
    }

    /// Moves committed by this machine so far (pure)
    pub fn history(&self) -> &MoveLog {
        &self.history
    }

    /// Check if `transition` is legal from the current state (pure)
    pub fn can(&self, transition: Transition) -> bool {
        !transition.is_refresh() && self.table.get().permits(self.current, transition).is_some()
    }

    /// Transitions legal from the current state, wildcard edges included (pure)
    pub fn available_transitions(&self) -> TransitionSet {
        self.table.get().available(self.current)
    }

    /// Fire `transition`.
    ///
    /// Fails without side effects when the transition has no edge from the
    /// current state. Otherwise the commit callback runs exactly once; if it
    /// fails the call fails and the current state is left unchanged. Returns
    /// the new state.
    pub async fn event(&mut self, transition: Transition) -> Result<State, FsmError> {
        if transition.is_refresh() {
            return Err(FsmError::Refresh(transition));
        }

        let from = self.current;
        let dest = self
            .table
            .get()
            .permits(from, transition)
            .ok_or(FsmError::Rejected { from, transition })?;

        self.on_commit
            .commit(dest)
            .await
            .map_err(|source| FsmError::Commit {
                from,
                to: dest,
                source,
            })?;

        self.history = self.history.record(CommittedMove {
            from,
            to: dest,
            via: transition,
            timestamp: Utc::now(),
        });
        self.current = dest;

        tracing::debug!(
            from = from.name(),
            to = dest.name(),
            via = transition.name(),
            "Committed transition"
        );
        Ok(dest)
    }
}
