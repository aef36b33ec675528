//! Generic async store for a server-owned collection.
//!
//! DESIGN
//! ======
//! Every operation follows one template: raise `loading` and clear `error`,
//! call the API, write the result into `items` or `focused` on success or
//! into `error` on failure, then lower `loading`. Operations differ only in
//! the request they make and the state field they write.
//!
//! Overlapping calls are sequenced: the most recently issued operation owns
//! the state, and superseded responses are returned to their callers without
//! being written.

#[cfg(test)]
#[path = "resource_test.rs"]
mod resource_test;

use std::future::Future;
use std::sync::Arc;

use leptos::prelude::*;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::net::api::{ApiClient, ApiError, RequestBody, decode, encode};
use crate::state::resource::{Resource, ResourceState};
use crate::store::coordinator::SessionCoordinator;
use crate::store::in_flight::{InFlight, Sequencer};

pub struct ResourceStore<T, A> {
    state: ArcRwSignal<ResourceState<T>>,
    sequencer: Sequencer,
    api: Arc<A>,
}

impl<T, A> ResourceStore<T, A>
where
    T: Resource + DeserializeOwned + Send + Sync + 'static,
    A: ApiClient,
{
    /// Create an empty store and register it for session resets.
    pub fn new(api: Arc<A>, coordinator: &SessionCoordinator) -> Self {
        let state = ArcRwSignal::new(ResourceState::default());
        let sequencer = Sequencer::new();

        let reset_state = state.clone();
        let reset_sequencer = sequencer.clone();
        coordinator.register_reset(move || {
            reset_sequencer.invalidate();
            reset_state.set(ResourceState::default());
        });

        Self { state, sequencer, api }
    }

    /// Signal for reactive reads.
    pub fn state(&self) -> ArcRwSignal<ResourceState<T>> {
        self.state.clone()
    }

    /// Current state without subscribing.
    pub fn snapshot(&self) -> ResourceState<T> {
        self.state.get_untracked()
    }

    pub fn is_loading(&self) -> bool {
        self.state.with(|s| s.loading)
    }

    pub fn error(&self) -> Option<String> {
        self.state.with(|s| s.error.clone())
    }

    /// Dismiss the displayed error without retrying.
    pub fn clear_error(&self) {
        self.state.update(ResourceState::clear_error);
    }

    /// `GET path` and replace `items` wholesale.
    ///
    /// # Errors
    ///
    /// Returns the server `detail` or `fallback`.
    pub async fn fetch_collection(&self, operation: &str, path: &str, fallback: &str) -> Result<Vec<T>, String> {
        let request = async { decode::<Vec<T>>(self.api.get(path).await?) };
        self.run(operation, fallback, request, |s, items| s.replace_items(items.clone()))
            .await
    }

    /// `GET path` and replace `focused`. `items` is untouched.
    ///
    /// # Errors
    ///
    /// Returns the server `detail` or `fallback`.
    pub async fn fetch_item(&self, operation: &str, path: &str, fallback: &str) -> Result<T, String> {
        let request = async { decode::<T>(self.api.get(path).await?) };
        self.run(operation, fallback, request, |s, item| s.set_focused(item.clone()))
            .await
    }

    /// `POST path` and append the server's record to `items` without
    /// re-fetching.
    ///
    /// # Errors
    ///
    /// Returns the server `detail` or `fallback`.
    pub async fn create_item<B: Serialize + ?Sized>(
        &self,
        operation: &str,
        path: &str,
        body: &B,
        fallback: &str,
    ) -> Result<T, String> {
        let request = async {
            let body = encode(body)?;
            decode::<T>(self.api.post(path, RequestBody::Json(body)).await?)
        };
        self.run(operation, fallback, request, |s, item| s.push_item(item.clone()))
            .await
    }

    /// `PUT path` and swap the server's record in by id.
    ///
    /// # Errors
    ///
    /// Returns the server `detail` or `fallback`.
    pub async fn update_item<B: Serialize + ?Sized>(
        &self,
        operation: &str,
        path: &str,
        body: &B,
        fallback: &str,
    ) -> Result<T, String> {
        let request = async {
            let body = encode(body)?;
            decode::<T>(self.api.put(path, body).await?)
        };
        self.run(operation, fallback, request, ResourceState::replace_item).await
    }

    /// `DELETE path` and drop the record with `id`.
    ///
    /// # Errors
    ///
    /// Returns the server `detail` or `fallback`.
    pub async fn delete_item(&self, operation: &str, path: &str, id: T::Id, fallback: &str) -> Result<(), String> {
        let request = async { self.api.delete(path).await.map(|_| ()) };
        self.run(operation, fallback, request, move |s, _| s.remove_item(id)).await
    }

    async fn run<R>(
        &self,
        operation: &str,
        fallback: &str,
        request: impl Future<Output = Result<R, ApiError>>,
        apply: impl FnOnce(&mut ResourceState<T>, &R),
    ) -> Result<R, String> {
        let flight = InFlight::begin(&self.state, &self.sequencer, ResourceState::begin, |s: &mut ResourceState<T>| {
            s.loading = false;
        });

        match request.await {
            Ok(data) => {
                let written = flight.settle(|s| {
                    apply(s, &data);
                    s.loading = false;
                });
                if !written {
                    leptos::logging::log!("{operation}: dropped superseded response");
                }
                Ok(data)
            }
            Err(err) => {
                let message = err.user_message(fallback);
                leptos::logging::warn!("{operation} failed: {err}");
                flight.settle(|s| {
                    s.fail(message.clone());
                    s.loading = false;
                });
                Err(message)
            }
        }
    }
}
