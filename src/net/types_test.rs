use super::*;
use serde_json::json;

#[test]
fn user_profile_preserves_unknown_fields() {
    let raw = json!({ "id": 1, "username": "alice", "email": "a@example.com", "is_active": true });
    let user: UserProfile = serde_json::from_value(raw.clone()).unwrap();
    assert_eq!(user.id, 1);
    assert_eq!(user.username, "alice");
    assert_eq!(user.extra.get("email"), Some(&json!("a@example.com")));
    assert_eq!(serde_json::to_value(&user).unwrap(), raw);
}

#[test]
fn user_profile_username_defaults_when_missing() {
    let user: UserProfile = serde_json::from_value(json!({ "id": 1, "name": "alice" })).unwrap();
    assert_eq!(user.username, "");
    assert_eq!(user.extra.get("name"), Some(&json!("alice")));
}

#[test]
fn login_response_parses_token_and_user() {
    let resp: LoginResponse = serde_json::from_value(json!({
        "access_token": "T1",
        "token_type": "bearer",
        "user": { "id": 1, "username": "alice" }
    }))
    .unwrap();
    assert_eq!(resp.access_token, "T1");
    assert_eq!(resp.token_type.as_deref(), Some("bearer"));
    assert_eq!(resp.user.id, 1);
}

#[test]
fn login_response_without_user_is_rejected() {
    let parsed = serde_json::from_value::<LoginResponse>(json!({ "access_token": "T1" }));
    assert!(parsed.is_err());
}

#[test]
fn character_defaults_optional_fields() {
    let c: Character = serde_json::from_value(json!({ "id": 7, "name": "X" })).unwrap();
    assert_eq!(c.description, None);
    assert!(!c.is_public);
    assert!(c.extra.is_empty());
}

#[test]
fn new_character_omits_absent_description() {
    let body = serde_json::to_value(NewCharacter { name: "X".to_owned(), ..NewCharacter::default() }).unwrap();
    assert_eq!(body, json!({ "name": "X", "is_public": false }));
}

#[test]
fn character_update_serializes_only_present_fields() {
    let body = serde_json::to_value(CharacterUpdate {
        description: Some("calm".to_owned()),
        ..CharacterUpdate::default()
    })
    .unwrap();
    assert_eq!(body, json!({ "description": "calm" }));
}

#[test]
fn register_request_omits_missing_email() {
    let body = serde_json::to_value(RegisterRequest {
        username: "alice".to_owned(),
        password: "pw".to_owned(),
        email: None,
    })
    .unwrap();
    assert_eq!(body, json!({ "username": "alice", "password": "pw" }));
}
