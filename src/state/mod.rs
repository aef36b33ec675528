//! Plain state containers observed by the UI.
//!
//! SYSTEM CONTEXT
//! ==============
//! These types hold no behavior beyond pure transitions. Stores wrap them in
//! signals and own every write.

pub mod resource;
pub mod session;
