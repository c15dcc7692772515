//! Property-based tests for the codec, the transition table and the FSM.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated inputs.

use chatflow::core::{State, Transition};
use chatflow::fsm::{CommitError, Fsm, FsmError};
use chatflow::payload::{self, Params};
use chatflow::table::TransitionTable;
use proptest::prelude::*;
use std::future::Future;

fn block_on<F: Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
        .block_on(future)
}

prop_compose! {
    fn arbitrary_state()(index in 0..State::ALL.len()) -> State {
        State::ALL[index]
    }
}

prop_compose! {
    fn arbitrary_transition()(index in 0..Transition::ALL.len()) -> Transition {
        Transition::ALL[index]
    }
}

prop_compose! {
    fn arbitrary_params()(
        params in prop::collection::btree_map("[a-z_]{1,8}", "\\PC{0,16}", 0..5)
    ) -> Params {
        params
    }
}

proptest! {
    #[test]
    fn codec_roundtrip(transition in arbitrary_transition(), params in arbitrary_params()) {
        let encoded = payload::encode(transition, &params);
        let decoded = payload::decode(&encoded).unwrap();

        prop_assert_eq!(decoded.transition, transition);
        prop_assert_eq!(decoded.params, params);
    }

    #[test]
    fn empty_params_use_bare_id(transition in arbitrary_transition()) {
        let encoded = payload::encode(transition, &Params::new());
        prop_assert_eq!(&encoded, &transition.id().to_string());

        let decoded = payload::decode(&encoded).unwrap();
        prop_assert!(decoded.params.is_empty());
    }

    #[test]
    fn encoded_payload_is_single_token(
        transition in arbitrary_transition(),
        params in arbitrary_params(),
    ) {
        let encoded = payload::encode(transition, &params);
        prop_assert!(!encoded.contains(' '));
        prop_assert!(encoded.matches('?').count() <= 1);
    }

    #[test]
    fn reset_is_available_everywhere(state in arbitrary_state()) {
        let available = TransitionTable::standard().available(state);
        prop_assert!(available.contains(&Transition::Reset));
        prop_assert!(!available.contains(&Transition::Loop));
        prop_assert!(!available.contains(&Transition::Error));
    }

    #[test]
    fn event_succeeds_iff_table_permits(
        state in arbitrary_state(),
        transition in arbitrary_transition(),
    ) {
        let table = TransitionTable::standard();
        let expected = if transition.is_refresh() {
            None
        } else {
            table.permits(state, transition)
        };

        let mut commits = Vec::new();
        let result = block_on(async {
            let mut fsm = Fsm::new(state, |dest: State| -> Result<(), CommitError> {
                commits.push(dest);
                Ok(())
            });
            let result = fsm.event(transition).await;
            (result, fsm.current_state())
        });

        match expected {
            Some(dest) => {
                let moved_to_dest = matches!(result.0, Ok(s) if s == dest);
                prop_assert!(moved_to_dest, "expected move to {:?}, got {:?}", dest, result.0);
                prop_assert_eq!(result.1, dest);
                prop_assert_eq!(commits, vec![dest]);
            }
            None => {
                prop_assert!(result.0.is_err());
                prop_assert_eq!(result.1, state);
                prop_assert!(commits.is_empty());
            }
        }
    }

    #[test]
    fn failed_commit_never_advances(state in arbitrary_state(), transition in arbitrary_transition()) {
        let (result, current) = block_on(async {
            let mut fsm = Fsm::new(state, |_: State| -> Result<(), CommitError> {
                Err(CommitError::Refused("read-only".to_string()))
            });
            let result = fsm.event(transition).await;
            (result, fsm.current_state())
        });

        prop_assert!(result.is_err());
        prop_assert_eq!(current, state);
        if TransitionTable::standard().permits(state, transition).is_some() && !transition.is_refresh() {
            let is_commit_failure = matches!(result, Err(FsmError::Commit { .. }));
            prop_assert!(is_commit_failure, "expected commit failure, got {:?}", result);
        }
    }

    #[test]
    fn history_follows_committed_moves(
        transitions in prop::collection::vec(arbitrary_transition(), 0..20)
    ) {
        let (path, current, committed) = block_on(async move {
            let mut fsm = Fsm::new(State::Empty, |_: State| -> Result<(), CommitError> { Ok(()) });
            let mut committed = 0usize;
            for transition in transitions {
                if fsm.event(transition).await.is_ok() {
                    committed += 1;
                }
            }
            (fsm.history().get_path(), fsm.current_state(), committed)
        });

        prop_assert_eq!(path.len(), if committed == 0 { 0 } else { committed + 1 });
        if let Some(last) = path.last() {
            prop_assert_eq!(*last, current);
        }
    }
}

#[test]
fn state_ids_roundtrip_through_strings() {
    for state in State::ALL {
        assert_eq!(state.to_string().parse::<State>(), Ok(*state));
    }
}
