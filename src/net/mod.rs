//! Networking modules for the REST API.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` defines the transport capability and its browser implementation,
//! and `types` defines the shared wire schema.

pub mod api;
pub mod types;
