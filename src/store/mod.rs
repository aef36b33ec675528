//! Async stores that own writes to client state.
//!
//! SYSTEM CONTEXT
//! ==============
//! `Stores` is built once at startup and shared by handle. Each store owns
//! its signal; the UI reads signals and invokes operations, never writing
//! state directly. The coordinator ties the stores' lifetimes to the session.


pub mod characters;
pub mod coordinator;
pub mod in_flight;
pub mod resource;
pub mod session;

use std::sync::Arc;

use crate::config::ClientConfig;
use crate::net::api::ApiClient;
use crate::util::guard::RouteGuard;
use crate::util::storage::KeyValueStorage;

use self::characters::CharacterStore;
use self::coordinator::SessionCoordinator;
use self::session::AuthSessionStore;

/// Every store the application shares, wired to one API and one storage.
pub struct Stores<A, S> {
    pub session: Arc<AuthSessionStore<A, S>>,
    pub characters: Arc<CharacterStore<A>>,
    pub guard: RouteGuard<S>,
    pub coordinator: Arc<SessionCoordinator>,
}

impl<A, S> Clone for Stores<A, S> {
    fn clone(&self) -> Self {
        Self {
            session: Arc::clone(&self.session),
            characters: Arc::clone(&self.characters),
            guard: self.guard.clone(),
            coordinator: Arc::clone(&self.coordinator),
        }
    }
}

impl<A: ApiClient, S: KeyValueStorage> Stores<A, S> {
    /// Construct the stores. The session is not hydrated until
    /// `session.init()` is called.
    pub fn new(config: &ClientConfig, api: Arc<A>, storage: Arc<S>) -> Self {
        let coordinator = Arc::new(SessionCoordinator::new(config.landing_route.clone()));
        let characters = Arc::new(CharacterStore::new(Arc::clone(&api), &coordinator));
        let guard = RouteGuard::new(Arc::clone(&storage), config.login_route.clone());
        let session = Arc::new(AuthSessionStore::new(api, storage, Arc::clone(&coordinator)));
        Self { session, characters, guard, coordinator }
    }
}
