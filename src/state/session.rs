//! Auth-session state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Read by user-aware components; written only by `AuthSessionStore`. The
//! phase is a tagged variant so a finished login can never leave the session
//! marked as loading.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use crate::net::types::UserProfile;

/// Where the session stands with respect to authentication.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum SessionPhase {
    #[default]
    Anonymous,
    /// A login request is in flight.
    Authenticating,
    Authenticated(UserProfile),
    /// The last login attempt failed with this message.
    Failed(String),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionState {
    pub phase: SessionPhase,
    /// A registration request is in flight. Registration never changes the
    /// phase.
    pub registering: bool,
}

impl SessionState {
    pub fn user(&self) -> Option<&UserProfile> {
        match &self.phase {
            SessionPhase::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.phase, SessionPhase::Authenticated(_))
    }

    pub fn is_loading(&self) -> bool {
        self.registering || matches!(self.phase, SessionPhase::Authenticating)
    }

    /// Message from the last failed login, until the next attempt.
    pub fn login_error(&self) -> Option<&str> {
        match &self.phase {
            SessionPhase::Failed(message) => Some(message),
            _ => None,
        }
    }
}
