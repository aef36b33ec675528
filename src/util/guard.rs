//! Navigation guard for protected routes.
//!
//! SYSTEM CONTEXT
//! ==============
//! Route components declare whether they require auth and install the guard
//! on mount. The decision reads credential presence straight from storage so
//! it is synchronous and available before the session store has hydrated.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use std::sync::Arc;

use leptos::prelude::*;
use leptos_router::NavigateOptions;

use crate::util::storage::{KeyValueStorage, has_credential};

/// Access requirement declared by a route.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RouteMeta {
    pub requires_auth: bool,
}

impl RouteMeta {
    pub const PUBLIC: Self = Self { requires_auth: false };
    pub const PROTECTED: Self = Self { requires_auth: true };
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardOutcome {
    Proceed,
    /// Cancel the transition and go here instead.
    Redirect(String),
}

/// Decide a transition from the route's requirement and credential presence.
pub fn evaluate(meta: RouteMeta, has_credential: bool, login_route: &str) -> GuardOutcome {
    if meta.requires_auth && !has_credential {
        GuardOutcome::Redirect(login_route.to_owned())
    } else {
        GuardOutcome::Proceed
    }
}

pub struct RouteGuard<S> {
    storage: Arc<S>,
    login_route: String,
}

impl<S> Clone for RouteGuard<S> {
    fn clone(&self) -> Self {
        Self { storage: Arc::clone(&self.storage), login_route: self.login_route.clone() }
    }
}

impl<S: KeyValueStorage> RouteGuard<S> {
    pub fn new(storage: Arc<S>, login_route: impl Into<String>) -> Self {
        Self { storage, login_route: login_route.into() }
    }

    pub fn login_route(&self) -> &str {
        &self.login_route
    }

    pub fn check(&self, meta: RouteMeta) -> GuardOutcome {
        evaluate(meta, has_credential(&*self.storage), &self.login_route)
    }
}

/// Redirect to the login route on mount when `meta` requires a credential
/// that storage does not hold.
pub fn install_route_guard<S, F>(guard: RouteGuard<S>, meta: RouteMeta, navigate: F)
where
    S: KeyValueStorage + 'static,
    F: Fn(&str, NavigateOptions) + Clone + 'static,
{
    Effect::new(move || {
        if let GuardOutcome::Redirect(route) = guard.check(meta) {
            navigate(&route, NavigateOptions { replace: true, ..NavigateOptions::default() });
        }
    });
}
