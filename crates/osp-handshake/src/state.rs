//! Handshake steps and runner states.

use std::fmt;

/// One HTTP exchange of the handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Step {
    /// Step 1: partial capabilities from the service provider.
    PartialCapabilities,
    /// Step 2: complete capabilities, expected to redirect to the IdP.
    FullCapabilities,
    /// Step 3: unauthenticated request to the IdP.
    SsoProbe,
    /// Step 4: authenticated request to the IdP.
    SsoAuthentication,
    /// Step 5: authentication response posted back to the service provider.
    PostAssertion,
    /// Step 6: capabilities fetched again inside the established session.
    SessionReauth,
}

impl Step {
    /// All steps in execution order.
    pub const ALL: [Self; 6] = [
        Self::PartialCapabilities,
        Self::FullCapabilities,
        Self::SsoProbe,
        Self::SsoAuthentication,
        Self::PostAssertion,
        Self::SessionReauth,
    ];

    /// Returns the 1-based step number.
    #[must_use]
    pub const fn number(&self) -> u8 {
        match self {
            Self::PartialCapabilities => 1,
            Self::FullCapabilities => 2,
            Self::SsoProbe => 3,
            Self::SsoAuthentication => 4,
            Self::PostAssertion => 5,
            Self::SessionReauth => 6,
        }
    }

    /// Returns a short description of the step.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::PartialCapabilities => "partial capabilities",
            Self::FullCapabilities => "complete capabilities",
            Self::SsoProbe => "SSO challenge",
            Self::SsoAuthentication => "SSO authentication",
            Self::PostAssertion => "authentication response post",
            Self::SessionReauth => "session capabilities",
        }
    }

    /// Returns the state the runner enters once this step has passed.
    #[must_use]
    pub const fn completed_state(&self) -> HandshakeState {
        match self {
            Self::PartialCapabilities => HandshakeState::PartialCaps,
            Self::FullCapabilities => HandshakeState::FullCaps,
            Self::SsoProbe => HandshakeState::SsoProbe,
            Self::SsoAuthentication => HandshakeState::SsoAuth,
            Self::PostAssertion => HandshakeState::PostAssertion,
            Self::SessionReauth => HandshakeState::SessionReauth,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "step {} ({})", self.number(), self.label())
    }
}

/// Position of the runner in the handshake.
///
/// Each state names the last step that passed. `Failed` is terminal and is
/// entered from any non-terminal state when a check fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HandshakeState {
    /// Nothing has been requested yet.
    #[default]
    Start,
    /// Step 1 passed.
    PartialCaps,
    /// Step 2 passed.
    FullCaps,
    /// Step 3 passed.
    SsoProbe,
    /// Step 4 passed.
    SsoAuth,
    /// Step 5 passed.
    PostAssertion,
    /// Step 6 passed.
    SessionReauth,
    /// The handshake completed.
    Done,
    /// A check failed at the given step, or before any request for `None`.
    Failed(Option<Step>),
}

impl HandshakeState {
    /// Returns the step that may run from this state.
    #[must_use]
    pub const fn next_step(&self) -> Option<Step> {
        match self {
            Self::Start => Some(Step::PartialCapabilities),
            Self::PartialCaps => Some(Step::FullCapabilities),
            Self::FullCaps => Some(Step::SsoProbe),
            Self::SsoProbe => Some(Step::SsoAuthentication),
            Self::SsoAuth => Some(Step::PostAssertion),
            Self::PostAssertion => Some(Step::SessionReauth),
            Self::SessionReauth | Self::Done | Self::Failed(_) => None,
        }
    }

    /// Returns `true` for `Done` and `Failed`.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed(_))
    }
}
