//! Application wiring: store construction, context, and session navigation.

#[cfg(test)]
#[path = "app_test.rs"]
mod app_test;

use std::sync::Arc;

use leptos::prelude::*;
use leptos_router::NavigateOptions;

use crate::config::ClientConfig;
use crate::net::api::HttpApiClient;
use crate::store::Stores;
use crate::store::coordinator::SessionCoordinator;
use crate::util::storage::BrowserStorage;

/// Stores backed by the HTTP API and browser `localStorage`.
pub type BrowserStores = Stores<HttpApiClient<BrowserStorage>, BrowserStorage>;

pub fn browser_stores(config: &ClientConfig) -> BrowserStores {
    let storage = Arc::new(BrowserStorage);
    let api = Arc::new(HttpApiClient::new(config, Arc::clone(&storage)));
    Stores::new(config, api, storage)
}

/// Build the stores, restore any persisted session, and provide them as
/// context for every component below the caller.
pub fn provide_stores(config: &ClientConfig) -> BrowserStores {
    let stores = browser_stores(config);
    stores.session.init();
    provide_context(stores.clone());
    stores
}

/// # Panics
///
/// Panics when called outside a component tree set up by `provide_stores`.
pub fn use_stores() -> BrowserStores {
    expect_context::<BrowserStores>()
}

/// Navigate wherever the coordinator points after a session ends.
pub fn install_logout_navigation<F>(coordinator: Arc<SessionCoordinator>, navigate: F)
where
    F: Fn(&str, NavigateOptions) + Clone + 'static,
{
    let redirect = coordinator.redirect();
    Effect::new(move || {
        redirect.track();
        if let Some(route) = coordinator.take_redirect() {
            navigate(&route, NavigateOptions { replace: true, ..NavigateOptions::default() });
        }
    });
}

/// Route `log` output to the browser console and install the panic hook.
#[cfg(feature = "hydrate")]
pub fn init_browser_logging() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Debug).is_err() {
        leptos::logging::warn!("console logger already installed");
    }
}
