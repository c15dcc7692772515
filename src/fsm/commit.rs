//! The injected commit callback.

use super::error::CommitError;
use crate::core::State;
use async_trait::async_trait;

/// Durably records a move to `dest`.
///
/// The FSM decides whether a move is legal; a `Commit` decides how it is
/// stored. Any `FnMut(State) -> Result<(), CommitError>` is a `Commit`,
/// which keeps the machine testable without I/O.
///
/// # Example
///
/// ```rust
/// use chatflow::core::{State, Transition};
/// use chatflow::fsm::{CommitError, Fsm};
///
/// # tokio_test_block(async {
/// let mut written = Vec::new();
/// let mut fsm = Fsm::new(State::Empty, |dest: State| -> Result<(), CommitError> {
///     written.push(dest);
///     Ok(())
/// });
///
/// fsm.event(Transition::EmptyToNewUser).await.unwrap();
/// assert_eq!(fsm.current_state(), State::NewUser);
/// drop(fsm);
/// assert_eq!(written, vec![State::NewUser]);
/// # });
/// # fn tokio_test_block<F: std::future::Future>(f: F) {
/// #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f);
/// # }
/// ```
#[async_trait]
pub trait Commit: Send {
    async fn commit(&mut self, dest: State) -> Result<(), CommitError>;
}

#[async_trait]
impl<F> Commit for F
where
    F: FnMut(State) -> Result<(), CommitError> + Send,
{
    async fn commit(&mut self, dest: State) -> Result<(), CommitError> {
        (self)(dest)
    }
}
