//! Session lifecycle coordinator.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every session-scoped store registers a reset hook at construction. Ending
//! the session runs all hooks, then publishes the landing route on a signal
//! that the router layer turns into a navigation. Nothing in memory survives
//! a logout, and no page reload is involved.

#[cfg(test)]
#[path = "coordinator_test.rs"]
mod coordinator_test;

use std::sync::{Mutex, PoisonError};

use leptos::prelude::*;

type ResetHook = Box<dyn Fn() + Send + Sync>;

pub struct SessionCoordinator {
    hooks: Mutex<Vec<ResetHook>>,
    landing_route: String,
    redirect: ArcRwSignal<Option<String>>,
}

impl SessionCoordinator {
    pub fn new(landing_route: impl Into<String>) -> Self {
        Self {
            hooks: Mutex::new(Vec::new()),
            landing_route: landing_route.into(),
            redirect: ArcRwSignal::new(None),
        }
    }

    /// Register a hook that returns a store to its initial state.
    pub fn register_reset(&self, hook: impl Fn() + Send + Sync + 'static) {
        self.hooks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Box::new(hook));
    }

    /// Reset every registered store.
    pub fn reset_all(&self) {
        let hooks = self.hooks.lock().unwrap_or_else(PoisonError::into_inner);
        for hook in hooks.iter() {
            hook();
        }
    }

    /// Reset all stores and request navigation to the landing route.
    pub fn end_session(&self) {
        self.reset_all();
        self.redirect.set(Some(self.landing_route.clone()));
    }

    /// Pending post-logout navigation, observed by the router layer.
    pub fn redirect(&self) -> ArcRwSignal<Option<String>> {
        self.redirect.clone()
    }

    /// Consume the pending navigation, if any.
    pub fn take_redirect(&self) -> Option<String> {
        let mut taken = None;
        self.redirect.update(|pending| taken = pending.take());
        taken
    }
}
