//! Auth-session store: login, registration, logout, and hydration.
//!
//! SYSTEM CONTEXT
//! ==============
//! The session signal says who the user is; the credential pair in storage
//! says what the server will accept. This store is the only writer of both
//! and keeps them in agreement: `Authenticated` is entered only after the
//! pair is persisted, and the pair is erased in the same call that leaves it.
//!
//! ERROR HANDLING
//! ==============
//! Operations never panic or propagate transport errors. Every outcome is
//! `Ok(..)` or `Err(message)`, with the message taken from the server's
//! `detail` field or a fixed fallback.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::sync::Arc;

use leptos::prelude::*;

use crate::net::api::{ApiClient, CURRENT_USER_PATH, LOGIN_PATH, REGISTER_PATH, RequestBody, decode, encode};
use crate::net::types::{LoginResponse, RegisterRequest, UserProfile};
use crate::state::session::{SessionPhase, SessionState};
use crate::store::coordinator::SessionCoordinator;
use crate::store::in_flight::{InFlight, Sequencer};
use crate::util::storage::{KeyValueStorage, StoredSession, clear_session, load_session, save_session, save_user_info};

pub const LOGIN_FAILED: &str = "Login failed";
pub const REGISTER_FAILED: &str = "Registration failed";
pub const FETCH_CURRENT_USER_FAILED: &str = "Failed to fetch current user";
pub const NOT_SIGNED_IN: &str = "Not signed in";

/// Phase to fall back to when a login attempt ends without success.
///
/// An existing session survives a failed re-login; anything else becomes
/// anonymous.
fn phase_without_login(previous: SessionPhase) -> SessionPhase {
    match previous {
        SessionPhase::Authenticated(user) => SessionPhase::Authenticated(user),
        _ => SessionPhase::Anonymous,
    }
}

fn phase_after_failed_login(previous: SessionPhase, message: &str) -> SessionPhase {
    match phase_without_login(previous) {
        SessionPhase::Anonymous => SessionPhase::Failed(message.to_owned()),
        kept => kept,
    }
}

pub struct AuthSessionStore<A, S> {
    state: ArcRwSignal<SessionState>,
    login_seq: Sequencer,
    register_seq: Sequencer,
    refresh_seq: Sequencer,
    api: Arc<A>,
    storage: Arc<S>,
    coordinator: Arc<SessionCoordinator>,
}

impl<A: ApiClient, S: KeyValueStorage> AuthSessionStore<A, S> {
    pub fn new(api: Arc<A>, storage: Arc<S>, coordinator: Arc<SessionCoordinator>) -> Self {
        Self {
            state: ArcRwSignal::new(SessionState::default()),
            login_seq: Sequencer::new(),
            register_seq: Sequencer::new(),
            refresh_seq: Sequencer::new(),
            api,
            storage,
            coordinator,
        }
    }

    /// Signal for reactive reads.
    pub fn state(&self) -> ArcRwSignal<SessionState> {
        self.state.clone()
    }

    /// Current state without subscribing.
    pub fn snapshot(&self) -> SessionState {
        self.state.get_untracked()
    }

    pub fn user(&self) -> Option<UserProfile> {
        self.state.with(|s| s.user().cloned())
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.with(SessionState::is_authenticated)
    }

    pub fn is_loading(&self) -> bool {
        self.state.with(SessionState::is_loading)
    }

    /// Hydrate the session from storage without a network call.
    ///
    /// A complete credential pair restores the cached profile as-is. A
    /// half-written or unreadable pair is erased so the route guard and the
    /// session agree. Safe to call repeatedly.
    pub fn init(&self) {
        match load_session(&*self.storage) {
            StoredSession::Complete { user, .. } => {
                self.state.update(|s| {
                    if !matches!(s.phase, SessionPhase::Authenticating) {
                        s.phase = SessionPhase::Authenticated(user);
                    }
                });
            }
            StoredSession::Empty => {}
            StoredSession::Inconsistent => {
                leptos::logging::warn!("session storage inconsistent; clearing credential pair");
                clear_session(&*self.storage);
                self.state.update(|s| {
                    if s.is_authenticated() {
                        s.phase = SessionPhase::Anonymous;
                    }
                });
            }
        }
    }

    /// Exchange username and password for a credential.
    ///
    /// On success the credential pair is persisted before the session turns
    /// `Authenticated`.
    ///
    /// A response superseded by a newer login or a logout still yields
    /// `Ok(user)`, but nothing is persisted and the session is not changed,
    /// so the route guard will not admit the caller on its account.
    ///
    /// # Errors
    ///
    /// Returns the server `detail` or `"Login failed"`, also when the
    /// response carries a blank token or the credential pair cannot be
    /// stored. The session is left unauthenticated unless a previous session
    /// was already active.
    pub async fn login(&self, username: &str, password: &str) -> Result<UserProfile, String> {
        self.refresh_seq.invalidate();
        let previous = self.state.with_untracked(|s| s.phase.clone());
        let restore = previous.clone();
        let flight = InFlight::begin(
            &self.state,
            &self.login_seq,
            |s| s.phase = SessionPhase::Authenticating,
            move |s| s.phase = phase_without_login(restore),
        );

        let body = RequestBody::form(&[("username", username), ("password", password)]);
        let result = async { decode::<LoginResponse>(self.api.post(LOGIN_PATH, body).await?) }.await;

        match result {
            Ok(LoginResponse { access_token, user, .. }) => {
                if access_token.trim().is_empty() {
                    leptos::logging::warn!("login: response carried a blank access token");
                    flight.settle(|s| s.phase = phase_after_failed_login(previous, LOGIN_FAILED));
                    return Err(LOGIN_FAILED.to_owned());
                }
                if !flight.is_current() {
                    leptos::logging::log!("login: dropped superseded response");
                    return Ok(user);
                }
                if let Err(e) = save_session(&*self.storage, &access_token, &user) {
                    leptos::logging::warn!("login: credential pair not persisted: {e}");
                    flight.settle(|s| s.phase = phase_after_failed_login(previous, LOGIN_FAILED));
                    return Err(LOGIN_FAILED.to_owned());
                }
                flight.settle(|s| s.phase = SessionPhase::Authenticated(user.clone()));
                leptos::logging::log!("login succeeded: user {}", user.id);
                Ok(user)
            }
            Err(err) => {
                let message = err.user_message(LOGIN_FAILED);
                leptos::logging::warn!("login failed: {err}");
                flight.settle(|s| s.phase = phase_after_failed_login(previous, &message));
                Err(message)
            }
        }
    }

    /// Create an account. Success does not sign the user in.
    ///
    /// # Errors
    ///
    /// Returns the server `detail` or `"Registration failed"`.
    pub async fn register(&self, request: &RegisterRequest) -> Result<UserProfile, String> {
        let flight = InFlight::begin(
            &self.state,
            &self.register_seq,
            |s| s.registering = true,
            |s| s.registering = false,
        );

        let result = async {
            let body = encode(request)?;
            decode::<UserProfile>(self.api.post(REGISTER_PATH, RequestBody::Json(body)).await?)
        }
        .await;
        flight.settle(|s| s.registering = false);

        match result {
            Ok(user) => {
                leptos::logging::log!("registration succeeded: user {}", user.id);
                Ok(user)
            }
            Err(err) => {
                leptos::logging::warn!("registration failed: {err}");
                Err(err.user_message(REGISTER_FAILED))
            }
        }
    }

    /// End the session: erase the credential pair, reset this and every
    /// other session-scoped store, and navigate to the landing route.
    ///
    /// Responses to requests issued before the logout are discarded.
    pub fn logout(&self) {
        self.login_seq.invalidate();
        self.register_seq.invalidate();
        self.refresh_seq.invalidate();
        clear_session(&*self.storage);
        self.state.set(SessionState::default());
        self.coordinator.end_session();
        leptos::logging::log!("session ended");
    }

    /// Re-read the signed-in user's profile from the server.
    ///
    /// A 401 means the stored credential is no longer valid and ends the
    /// session as `logout` does.
    ///
    /// # Errors
    ///
    /// Returns `"Not signed in"` without a request when anonymous, otherwise
    /// the server `detail` or `"Failed to fetch current user"`.
    pub async fn refresh_user(&self) -> Result<UserProfile, String> {
        if !self.state.with_untracked(SessionState::is_authenticated) {
            return Err(NOT_SIGNED_IN.to_owned());
        }
        let flight = InFlight::begin(&self.state, &self.refresh_seq, |_| {}, |_| {});

        match async { decode::<UserProfile>(self.api.get(CURRENT_USER_PATH).await?) }.await {
            Ok(user) => {
                if flight.is_current() && self.state.with_untracked(SessionState::is_authenticated) {
                    if let Err(e) = save_user_info(&*self.storage, &user) {
                        leptos::logging::warn!("refresh_user: profile not persisted: {e}");
                    }
                    flight.settle(|s| s.phase = SessionPhase::Authenticated(user.clone()));
                }
                Ok(user)
            }
            Err(err) => {
                let message = err.user_message(FETCH_CURRENT_USER_FAILED);
                leptos::logging::warn!("refresh_user failed: {err}");
                if err.status() == Some(401) && flight.is_current() {
                    drop(flight);
                    self.logout();
                }
                Err(message)
            }
        }
    }
}
