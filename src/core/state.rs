//! Conversation states.
//!
//! A state is the persisted cursor telling which prompt or menu a user is
//! currently looking at. Ids are stored as decimal strings and must never be
//! renumbered.

crate::wire_enum! {
    /// Position of one user in the conversation graph.
    ///
    /// # Example
    ///
    /// ```rust
    /// use chatflow::core::State;
    ///
    /// let state: State = "8".parse().unwrap();
    /// assert_eq!(state, State::Events);
    /// assert_eq!(State::default(), State::Empty);
    /// ```
    pub enum State {
        /// Never seen before; assigned to every new user.
        Empty = 0,
        NewUser = 1,
        SelectRole = 2,
        MainMenu = 3,
        Verifications = 4,
        About = 5,
        Applications = 6,
        PersonalEvents = 7,
        Events = 8,
        Event = 9,
        CategoriesFilter = 10,
        GeoFilter = 11,
        EditGeoFilter = 12,
        Verification = 13,
        ReplyVerification = 14,
        EditVerification = 15,
    }
}

impl State {
    /// The state assigned to users at first contact.
    pub const INITIAL: State = State::Empty;

    /// Check if this is the initial state.
    pub fn is_initial(self) -> bool {
        self == Self::INITIAL
    }
}

impl Default for State {
    fn default() -> Self {
        Self::INITIAL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_match_storage_format() {
        assert_eq!(State::Empty.to_string(), "0");
        assert_eq!(State::MainMenu.to_string(), "3");
        assert_eq!(State::Events.to_string(), "8");
        assert_eq!(State::EditVerification.to_string(), "15");
    }

    #[test]
    fn every_state_parses_back() {
        for state in State::ALL {
            assert_eq!(state.to_string().parse::<State>().unwrap(), *state);
        }
        assert_eq!(State::ALL.len(), 16);
    }

    #[test]
    fn out_of_range_id_is_rejected() {
        assert!("16".parse::<State>().is_err());
        assert!("".parse::<State>().is_err());
        assert!(" 3".parse::<State>().is_err());
    }

    #[test]
    fn default_is_initial() {
        assert!(State::default().is_initial());
        assert!(!State::MainMenu.is_initial());
    }
}
