//! Request sequencing and scoped release of loading flags.
//!
//! Every store operation takes a ticket from its store's `Sequencer` before
//! awaiting the network. Only the holder of the latest ticket may write its
//! outcome; earlier responses still reach their caller but leave state alone.
//! If an operation is dropped before it settles, the guard runs its abandon
//! hook so no flag stays raised.

#[cfg(test)]
#[path = "in_flight_test.rs"]
mod in_flight_test;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use leptos::prelude::*;

/// Monotonic request counter shared by one store's operations.
#[derive(Clone, Debug, Default)]
pub struct Sequencer(Arc<AtomicU64>);

impl Sequencer {
    pub fn new() -> Self {
        Self::default()
    }

    fn issue(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, ticket: u64) -> bool {
        self.0.load(Ordering::SeqCst) == ticket
    }

    /// Make every outstanding ticket stale.
    pub fn invalidate(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

/// One in-flight operation against a signal-backed state.
pub struct InFlight<S: Send + Sync + 'static> {
    state: ArcRwSignal<S>,
    sequencer: Sequencer,
    ticket: u64,
    on_abandon: Option<Box<dyn FnOnce(&mut S)>>,
}

impl<S: Send + Sync + 'static> InFlight<S> {
    /// Take a ticket and apply `start` to the state.
    ///
    /// `on_abandon` runs if the guard is dropped unsettled while still the
    /// latest operation.
    pub fn begin(
        state: &ArcRwSignal<S>,
        sequencer: &Sequencer,
        start: impl FnOnce(&mut S),
        on_abandon: impl FnOnce(&mut S) + 'static,
    ) -> Self {
        let ticket = sequencer.issue();
        state.update(start);
        Self {
            state: state.clone(),
            sequencer: sequencer.clone(),
            ticket,
            on_abandon: Some(Box::new(on_abandon)),
        }
    }

    pub fn is_current(&self) -> bool {
        self.sequencer.is_current(self.ticket)
    }

    /// Write the outcome if this is still the latest operation.
    ///
    /// Returns `false` when a newer operation or a reset superseded it.
    pub fn settle(mut self, apply: impl FnOnce(&mut S)) -> bool {
        self.on_abandon = None;
        if !self.is_current() {
            return false;
        }
        self.state.update(apply);
        true
    }
}

impl<S: Send + Sync + 'static> Drop for InFlight<S> {
    fn drop(&mut self) {
        if let Some(on_abandon) = self.on_abandon.take() {
            if self.is_current() {
                self.state.update(on_abandon);
            }
        }
    }
}
