//! # persona-client
//!
//! Leptos + WASM state layer for the persona web client.
//!
//! This crate owns the client's view of server truth: the authenticated
//! session, the character roster, and the navigation guard that keeps
//! anonymous users out of protected routes. Presentation components are
//! pure consumers; they invoke store operations and read store signals.
//!
//! SYSTEM CONTEXT
//! ==============
//! UI action -> store operation -> `ApiClient` call -> response normalized
//! into a store signal -> UI re-renders. The route guard sits beside this
//! flow and is consulted on every navigation.

pub mod app;
pub mod config;
pub mod net;
pub mod state;
pub mod store;
pub mod util;

#[cfg(test)]
mod test_support;
