//! Browser-facing helpers shared by the stores.
//!
//! SYSTEM CONTEXT
//! ==============
//! Utility modules isolate browser/environment concerns from store logic to
//! improve reuse and testability.

pub mod guard;
pub mod storage;
