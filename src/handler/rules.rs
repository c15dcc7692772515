//! Parameter rules for callback payloads, using `Validation`.
//!
//! Every rule runs and ALL violations are reported together, so the user
//! sees every problem with their input in one message.

use super::outcome::Outcome;
use crate::core::Transition;
use crate::payload::Params;
use crate::table::TransitionSet;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use thiserror::Error;

/// A parameter failed a rule.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParamViolation {
    #[error("'{key}' is missing")]
    Missing { key: String },

    #[error("'{key}' must be a positive number, got '{value}'")]
    NotPositiveInt { key: String, value: String },

    #[error("{message}")]
    Custom { key: String, message: String },
}

/// Type alias for parameter check functions
pub type ParamCheck =
    Box<dyn Fn(&Params) -> Validation<(), NonEmptyVec<ParamViolation>> + Send + Sync>;

/// Rules a handler applies to the parameters of `Move` and `Stay` outcomes.
///
/// Rules cover every outcome unless narrowed with [`ParamRules::only_on`].
/// A `Move` along `Reset` is never checked, so every state can always
/// return to `Empty`.
///
/// # Example
///
/// ```rust
/// use chatflow::core::Transition;
/// use chatflow::handler::{Outcome, ParamRules};
/// use chatflow::payload::Params;
///
/// let rules = ParamRules::new()
///     .require_positive_int("page")
///     .only_on(Transition::Loop);
///
/// let mut params = Params::new();
/// params.insert("page".to_string(), "0".to_string());
///
/// let outcome = rules.apply(Outcome::Stay { params });
/// assert!(matches!(outcome, Outcome::Reject { .. }));
///
/// let back = rules.apply(Outcome::moving(Transition::EventsToMainMenu));
/// assert_eq!(back, Outcome::moving(Transition::EventsToMainMenu));
/// ```
#[derive(Default)]
pub struct ParamRules {
    checks: Vec<ParamCheck>,
    scope: Option<TransitionSet>,
}

impl ParamRules {
    pub fn new() -> Self {
        Self {
            checks: Vec::new(),
            scope: None,
        }
    }

    /// Only check outcomes along `transition`. `Transition::Loop` selects
    /// `Stay`. May be called repeatedly to widen the scope.
    pub fn only_on(mut self, transition: Transition) -> Self {
        self.scope
            .get_or_insert_with(TransitionSet::new)
            .insert(transition);
        self
    }

    /// Whether `outcome` is subject to these rules.
    pub fn covers(&self, outcome: &Outcome) -> bool {
        match outcome {
            Outcome::Reject { .. } => false,
            _ => {
                let transition = outcome.transition();
                transition != Transition::Reset
                    && self
                        .scope
                        .as_ref()
                        .map_or(true, |scope| scope.contains(&transition))
            }
        }
    }

    /// Require `key` to be present.
    pub fn require(self, key: &str) -> Self {
        let key = key.to_string();
        self.check(move |params| {
            if params.contains_key(&key) {
                Validation::success(())
            } else {
                Validation::fail(ParamViolation::Missing { key: key.clone() })
            }
        })
    }

    /// Require `key` to be present and a positive integer.
    pub fn require_positive_int(self, key: &str) -> Self {
        let key = key.to_string();
        self.check(move |params| match params.get(&key) {
            None => Validation::fail(ParamViolation::Missing { key: key.clone() }),
            Some(value) if value.parse::<u32>().is_ok_and(|n| n > 0) => Validation::success(()),
            Some(value) => Validation::fail(ParamViolation::NotPositiveInt {
                key: key.clone(),
                value: value.clone(),
            }),
        })
    }

    /// When `key` is present, require `predicate` to hold for its value.
    pub fn require_pred<F>(self, key: &str, predicate: F, message: impl Into<String>) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        let key = key.to_string();
        let message = message.into();
        self.check(move |params| match params.get(&key) {
            Some(value) if !predicate(value) => Validation::fail(ParamViolation::Custom {
                key: key.clone(),
                message: message.clone(),
            }),
            _ => Validation::success(()),
        })
    }

    /// Add a custom validation check
    pub fn check<F>(mut self, check: F) -> Self
    where
        F: Fn(&Params) -> Validation<(), NonEmptyVec<ParamViolation>> + Send + Sync + 'static,
    {
        self.checks.push(Box::new(check));
        self
    }

    /// Run every rule, accumulating ALL violations.
    pub fn validate(&self, params: &Params) -> Validation<(), NonEmptyVec<ParamViolation>> {
        let checks: Vec<_> = self.checks.iter().map(|check| check(params)).collect();
        Validation::all_vec(checks).map(|_| ())
    }

    /// Turn a covered `Move` or `Stay` whose parameters break a rule into a
    /// `Reject` listing every violation. Other outcomes pass through.
    pub fn apply(&self, outcome: Outcome) -> Outcome {
        if !self.covers(&outcome) {
            return outcome;
        }
        match self.validate(outcome.params()) {
            Validation::Success(_) => outcome,
            Validation::Failure(violations) => Outcome::Reject {
                params: Params::new(),
                message: Some(
                    violations
                        .iter()
                        .map(|v| v.to_string())
                        .collect::<Vec<_>>()
                        .join("; "),
                ),
            },
        }
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }
}
