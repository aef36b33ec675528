//! Client configuration resolved at build time.
//!
//! Browser code has no process environment, so values are baked in through
//! `option_env!` when the WASM bundle is compiled.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

pub const DEFAULT_API_BASE_URL: &str = "";
pub const DEFAULT_LOGIN_ROUTE: &str = "/login";
pub const DEFAULT_LANDING_ROUTE: &str = "/";
pub const DEFAULT_REQUEST_TIMEOUT_MS: u32 = 30_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Prefix for every API path. Empty means same origin.
    pub api_base_url: String,
    /// Route the guard redirects anonymous users to.
    pub login_route: String,
    /// Route navigated to after logout.
    pub landing_route: String,
    /// Per-request timeout enforced by the browser HTTP client.
    pub request_timeout_ms: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_owned(),
            login_route: DEFAULT_LOGIN_ROUTE.to_owned(),
            landing_route: DEFAULT_LANDING_ROUTE.to_owned(),
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
        }
    }
}

impl ClientConfig {
    /// Build config from compile-time environment variables.
    ///
    /// Optional:
    /// - `PERSONA_API_BASE_URL`: default same origin
    /// - `PERSONA_LOGIN_ROUTE`: default `/login`
    /// - `PERSONA_LANDING_ROUTE`: default `/`
    /// - `PERSONA_REQUEST_TIMEOUT_MS`: default 30000
    pub fn from_build_env() -> Self {
        Self::from_values(
            option_env!("PERSONA_API_BASE_URL"),
            option_env!("PERSONA_LOGIN_ROUTE"),
            option_env!("PERSONA_LANDING_ROUTE"),
            option_env!("PERSONA_REQUEST_TIMEOUT_MS"),
        )
    }

    /// Resolve config from raw optional values, applying defaults.
    pub fn from_values(
        api_base_url: Option<&str>,
        login_route: Option<&str>,
        landing_route: Option<&str>,
        request_timeout_ms: Option<&str>,
    ) -> Self {
        let api_base_url = api_base_url
            .map(str::trim)
            .unwrap_or(DEFAULT_API_BASE_URL)
            .trim_end_matches('/')
            .to_owned();
        Self {
            api_base_url,
            login_route: normalize_route(login_route, DEFAULT_LOGIN_ROUTE),
            landing_route: normalize_route(landing_route, DEFAULT_LANDING_ROUTE),
            request_timeout_ms: parse_timeout(request_timeout_ms),
        }
    }
}

fn normalize_route(raw: Option<&str>, default: &str) -> String {
    match raw.map(str::trim) {
        None | Some("") => default.to_owned(),
        Some(route) if route.starts_with('/') => route.to_owned(),
        Some(route) => format!("/{route}"),
    }
}

fn parse_timeout(raw: Option<&str>) -> u32 {
    raw.and_then(|v| v.trim().parse::<u32>().ok())
        .filter(|ms| *ms > 0)
        .unwrap_or(DEFAULT_REQUEST_TIMEOUT_MS)
}
