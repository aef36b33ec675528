//! Wire DTOs for the auth and character endpoints.
//!
//! DESIGN
//! ======
//! Server records are mirrored verbatim: the client names the fields it reads
//! and carries everything else in a flattened map so a profile written to
//! storage round-trips without loss.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The authenticated user's profile as returned by the server.
///
/// Opaque to the client apart from `id` (equality) and `username` (display).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    #[serde(default)]
    pub username: String,
    /// Remaining server fields, preserved as-is.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Successful `POST /api/auth/login` payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    pub user: UserProfile,
}

/// Body for `POST /api/auth/register`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// A character record owned by the server.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_public: bool,
    /// Remaining server fields (persona prompt, avatar, owner, timestamps...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body for `POST /api/characters/`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NewCharacter {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub is_public: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body for `PUT /api/characters/{id}`. Absent fields are left unchanged.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CharacterUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
