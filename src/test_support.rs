//! Scripted `ApiClient` and fixtures for store tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use futures::channel::oneshot;
use serde_json::{Map, Value, json};

use crate::net::api::{ApiClient, ApiError, RequestBody};
use crate::net::types::{Character, UserProfile};
use crate::util::storage::{KeyValueStorage, MemoryStorage};

type Reply = Result<Value, ApiError>;

enum Scripted {
    Ready(Reply),
    Deferred(oneshot::Receiver<Reply>),
}

/// One request observed by `MockApi`.
#[derive(Clone, Debug, PartialEq)]
pub struct Call {
    pub method: &'static str,
    pub path: String,
    pub body: Option<RequestBody>,
}

/// `ApiClient` that answers from per-route reply queues and records calls.
#[derive(Default)]
pub struct MockApi {
    replies: Mutex<HashMap<String, VecDeque<Scripted>>>,
    calls: Mutex<Vec<Call>>,
}

fn route_key(method: &str, path: &str) -> String {
    format!("{method} {path}")
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, method: &str, path: &str, scripted: Scripted) {
        self.replies
            .lock()
            .unwrap()
            .entry(route_key(method, path))
            .or_default()
            .push_back(scripted);
    }

    pub fn ok(&self, method: &str, path: &str, value: Value) {
        self.push(method, path, Scripted::Ready(Ok(value)));
    }

    pub fn fail(&self, method: &str, path: &str, error: ApiError) {
        self.push(method, path, Scripted::Ready(Err(error)));
    }

    /// Queue an HTTP error whose body carried `detail` (or none).
    pub fn fail_status(&self, method: &str, path: &str, status: u16, detail: Option<&str>) {
        self.fail(method, path, ApiError::Status { status, detail: detail.map(str::to_owned) });
    }

    /// Queue a reply that resolves when the returned sender fires.
    pub fn deferred(&self, method: &str, path: &str) -> oneshot::Sender<Reply> {
        let (tx, rx) = oneshot::channel();
        self.push(method, path, Scripted::Deferred(rx));
        tx
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    async fn respond(&self, method: &'static str, path: &str, body: Option<RequestBody>) -> Reply {
        self.calls.lock().unwrap().push(Call { method, path: path.to_owned(), body });
        let next = self
            .replies
            .lock()
            .unwrap()
            .get_mut(&route_key(method, path))
            .and_then(VecDeque::pop_front);
        match next {
            Some(Scripted::Ready(reply)) => reply,
            Some(Scripted::Deferred(rx)) => rx
                .await
                .unwrap_or_else(|_| Err(ApiError::Transport("reply sender dropped".to_owned()))),
            None => Err(ApiError::Transport(format!("no scripted reply for {method} {path}"))),
        }
    }
}

impl ApiClient for MockApi {
    async fn get(&self, path: &str) -> Result<Value, ApiError> {
        self.respond("GET", path, None).await
    }

    async fn post(&self, path: &str, body: RequestBody) -> Result<Value, ApiError> {
        self.respond("POST", path, Some(body)).await
    }

    async fn put(&self, path: &str, body: Value) -> Result<Value, ApiError> {
        self.respond("PUT", path, Some(RequestBody::Json(body))).await
    }

    async fn delete(&self, path: &str) -> Result<Value, ApiError> {
        self.respond("DELETE", path, None).await
    }
}

/// `MemoryStorage` that rejects every write to one key, like a full
/// `localStorage`.
pub struct RejectingStorage {
    inner: MemoryStorage,
    rejected_key: &'static str,
}

impl RejectingStorage {
    pub fn new(rejected_key: &'static str) -> Self {
        Self { inner: MemoryStorage::new(), rejected_key }
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl KeyValueStorage for RejectingStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), String> {
        if key == self.rejected_key {
            return Err(format!("quota exceeded writing {key}"));
        }
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) {
        self.inner.remove(key);
    }
}

pub fn alice() -> UserProfile {
    UserProfile { id: 1, username: "alice".to_owned(), extra: Map::new() }
}

pub fn alice_json() -> Value {
    json!({ "id": 1, "username": "alice" })
}

pub fn login_json(token: &str) -> Value {
    json!({ "access_token": token, "token_type": "bearer", "user": alice_json() })
}

pub fn character(id: i64, name: &str) -> Character {
    Character { id, name: name.to_owned(), description: None, is_public: false, extra: Map::new() }
}

pub fn character_json(id: i64, name: &str) -> Value {
    json!({ "id": id, "name": name, "description": null, "is_public": false })
}
