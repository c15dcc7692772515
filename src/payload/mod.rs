//! Payload codec: carries transition intent across one UI round-trip.
//!
//! A payload is embedded in a button when a state renders and comes back
//! verbatim when the user presses it. The wire format is fixed:
//!
//! ```text
//! <transition id>
//! <transition id>?<key1>=<value1>&<key2>=<value2>...
//! ```
//!
//! Parameters are `application/x-www-form-urlencoded`. An empty parameter
//! map is encoded as the bare id with no trailing `?`. Keys are emitted in
//! sorted order so equal inputs always produce equal payloads.

mod error;

pub use error::DecodeError;

use crate::core::Transition;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use url::form_urlencoded;

/// Parameters carried alongside a transition.
pub type Params = BTreeMap<String, String>;

/// A transition plus its parameters, as carried by one button.
///
/// # Example
///
/// ```rust
/// use chatflow::core::Transition;
/// use chatflow::payload::Payload;
///
/// let payload = Payload::new(Transition::Loop).with_param("page", "2");
/// assert_eq!(payload.to_string(), "22?page=2");
///
/// let decoded: Payload = "22?page=2".parse().unwrap();
/// assert_eq!(decoded, payload);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Payload {
    pub transition: Transition,
    pub params: Params,
}

impl Payload {
    pub fn new(transition: Transition) -> Self {
        Self {
            transition,
            params: Params::new(),
        }
    }

    pub fn with_params(transition: Transition, params: Params) -> Self {
        Self { transition, params }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn encode(&self) -> String {
        encode(self.transition, &self.params)
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for Payload {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode(s)
    }
}

/// Serialize a transition and its parameters into one payload string.
pub fn encode(transition: Transition, params: &Params) -> String {
    if params.is_empty() {
        return transition.to_string();
    }

    let mut query = form_urlencoded::Serializer::new(String::new());
    for (key, value) in params {
        query.append_pair(key, value);
    }
    format!("{}?{}", transition, query.finish())
}

/// Parse a payload string back into a transition and its parameters.
///
/// Only the part before the first `?` can fail to decode. When a key
/// repeats, its first occurrence wins. A payload without parameters yields
/// an empty map.
pub fn decode(payload: &str) -> Result<Payload, DecodeError> {
    let (id, query) = match payload.split_once('?') {
        Some((id, query)) => (id, Some(query)),
        None => (payload, None),
    };

    let transition = id
        .parse::<Transition>()
        .map_err(|source| DecodeError::Transition {
            payload: payload.to_string(),
            source,
        })?;

    let mut params = Params::new();
    if let Some(query) = query {
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            params
                .entry(key.into_owned())
                .or_insert_with(|| value.into_owned());
        }
    }

    Ok(Payload { transition, params })
}
