//! Named edges of the conversation graph.

crate::wire_enum! {
    /// A named, directed edge of the conversation graph, plus the reserved
    /// pseudo-transitions.
    ///
    /// Ids `0..=22` are the deployed wire values; edges added later are
    /// appended after the pseudo ids so no existing callback payload changes
    /// meaning.
    pub enum Transition {
        EmptyToNewUser = 0,
        NewUserToSelectRole = 1,
        SelectRoleToMainMenu = 2,

        MainMenuToSelectRole = 3,
        MainMenuToAbout = 4,
        MainMenuToApplications = 5,
        MainMenuToEvents = 6,
        MainMenuToPersonalEvents = 7,
        MainMenuToVerifications = 8,

        PersonalEventsToEvents = 9,

        EventsToCategoriesFilter = 10,
        EventsToGeoFilter = 11,
        EventsToEvent = 12,

        GeoFilterToEditGeoFilter = 13,

        VerificationsToVerification = 14,
        VerificationToReplyVerification = 15,
        VerificationToEditVerification = 16,
        VerificationToVerifications = 17,
        ReplyVerificationToVerification = 18,
        EditVerificationToVerification = 19,

        /// Return to `Empty` from any state.
        Reset = 20,
        /// Input rejected; re-render the current state with a message.
        Error = 21,
        /// Stay in the current state and re-render it.
        Loop = 22,

        EventsToMainMenu = 23,
        EventsToPersonalEvents = 24,
        CategoriesFilterToEvents = 25,
        GeoFilterToEvents = 26,
        EditGeoFilterToGeoFilter = 27,
        EventToEvents = 28,
    }
}

impl Transition {
    /// `Loop` and `Error` re-render the current state and never reach the
    /// transition table.
    pub fn is_refresh(self) -> bool {
        matches!(self, Self::Loop | Self::Error)
    }
}
