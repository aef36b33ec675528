//! Character roster store.
//!
//! SYSTEM CONTEXT
//! ==============
//! One shared `ResourceStore<Character, _>` serves the roster pages. Owned and
//! public listings write the same `items` slot, so switching tabs replaces the
//! list rather than merging it.

#[cfg(test)]
#[path = "characters_test.rs"]
mod characters_test;

use crate::net::api::{ApiClient, CHARACTERS_PATH, PUBLIC_CHARACTERS_PATH, character_path};
use crate::net::types::{Character, CharacterUpdate, NewCharacter};
use crate::state::resource::Resource;
use crate::store::resource::ResourceStore;

pub const FETCH_USER_CHARACTERS_FAILED: &str = "Failed to fetch character list";
pub const FETCH_PUBLIC_CHARACTERS_FAILED: &str = "Failed to fetch public characters";
pub const CREATE_CHARACTER_FAILED: &str = "Failed to create character";
pub const FETCH_CHARACTER_FAILED: &str = "Failed to fetch character details";
pub const UPDATE_CHARACTER_FAILED: &str = "Failed to update character";
pub const DELETE_CHARACTER_FAILED: &str = "Failed to delete character";

pub type CharacterStore<A> = ResourceStore<Character, A>;

impl Resource for Character {
    type Id = i64;

    fn resource_id(&self) -> i64 {
        self.id
    }
}

impl<A: ApiClient> ResourceStore<Character, A> {
    /// Characters created by the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns the server `detail` or a fixed fallback message.
    pub async fn fetch_user_characters(&self) -> Result<Vec<Character>, String> {
        self.fetch_collection("fetch_user_characters", CHARACTERS_PATH, FETCH_USER_CHARACTERS_FAILED)
            .await
    }

    /// Characters shared publicly by any user.
    ///
    /// # Errors
    ///
    /// Returns the server `detail` or a fixed fallback message.
    pub async fn fetch_public_characters(&self) -> Result<Vec<Character>, String> {
        self.fetch_collection("fetch_public_characters", PUBLIC_CHARACTERS_PATH, FETCH_PUBLIC_CHARACTERS_FAILED)
            .await
    }

    /// # Errors
    ///
    /// Returns the server `detail` or a fixed fallback message.
    pub async fn create_character(&self, character: &NewCharacter) -> Result<Character, String> {
        self.create_item("create_character", CHARACTERS_PATH, character, CREATE_CHARACTER_FAILED)
            .await
    }

    /// Load one character into `focused`.
    ///
    /// # Errors
    ///
    /// Returns the server `detail` or a fixed fallback message.
    pub async fn fetch_character_detail(&self, id: i64) -> Result<Character, String> {
        self.fetch_item("fetch_character_detail", &character_path(id), FETCH_CHARACTER_FAILED)
            .await
    }

    /// # Errors
    ///
    /// Returns the server `detail` or a fixed fallback message.
    pub async fn update_character(&self, id: i64, update: &CharacterUpdate) -> Result<Character, String> {
        self.update_item("update_character", &character_path(id), update, UPDATE_CHARACTER_FAILED)
            .await
    }

    /// # Errors
    ///
    /// Returns the server `detail` or a fixed fallback message.
    pub async fn delete_character(&self, id: i64) -> Result<(), String> {
        self.delete_item("delete_character", &character_path(id), id, DELETE_CHARACTER_FAILED)
            .await
    }
}
