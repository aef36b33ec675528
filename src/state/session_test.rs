use super::*;
use serde_json::Map;

fn alice() -> UserProfile {
    UserProfile { id: 1, username: "alice".to_owned(), extra: Map::new() }
}

// =============================================================
// Defaults
// =============================================================

#[test]
fn session_state_default_is_anonymous() {
    let state = SessionState::default();
    assert_eq!(state.phase, SessionPhase::Anonymous);
    assert!(state.user().is_none());
    assert!(!state.is_authenticated());
    assert!(!state.is_loading());
}

// =============================================================
// Derived flags
// =============================================================

#[test]
fn authenticating_is_loading_but_not_authenticated() {
    let state = SessionState { phase: SessionPhase::Authenticating, registering: false };
    assert!(state.is_loading());
    assert!(!state.is_authenticated());
}

#[test]
fn authenticated_exposes_user() {
    let state = SessionState { phase: SessionPhase::Authenticated(alice()), registering: false };
    assert!(state.is_authenticated());
    assert_eq!(state.user().map(|u| u.id), Some(1));
    assert!(!state.is_loading());
}

#[test]
fn registering_is_loading_without_changing_identity() {
    let state = SessionState { phase: SessionPhase::Authenticated(alice()), registering: true };
    assert!(state.is_loading());
    assert!(state.is_authenticated());
}

#[test]
fn failed_carries_login_error() {
    let state = SessionState { phase: SessionPhase::Failed("Invalid credentials".to_owned()), registering: false };
    assert_eq!(state.login_error(), Some("Invalid credentials"));
    assert!(!state.is_authenticated());
    assert!(!state.is_loading());
}
