//! Client configuration baked in from the build environment.
//!
//! The WASM bundle has no process environment at runtime, so values are read
//! with `option_env!` when the crate is compiled:
//!
//! - `API_URL`: backend base URL (default `http://localhost:8000`)
//! - `API_TIMEOUT_MS`: per-request timeout (default 15000)

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_REQUEST_TIMEOUT_MS: u32 = 15_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub request_timeout_ms: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self { api_base_url: DEFAULT_API_BASE_URL.to_owned(), request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS }
    }
}

impl ClientConfig {
    /// Build from the compile-time environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| match key {
            "API_URL" => option_env!("API_URL"),
            "API_TIMEOUT_MS" => option_env!("API_TIMEOUT_MS"),
            _ => None,
        })
    }

    /// Build from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<'a, F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<&'a str>,
    {
        let read = |key: &str| lookup(key).map(str::trim).filter(|v| !v.is_empty());

        let api_base_url = read("API_URL").unwrap_or(DEFAULT_API_BASE_URL).trim_end_matches('/').to_owned();
        let request_timeout_ms = read("API_TIMEOUT_MS")
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|ms| *ms > 0)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_MS);

        Self { api_base_url, request_timeout_ms }
    }

    /// Absolute URL for an API path such as `/api/auth/login`.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_base_url, path.trim_start_matches('/'))
    }
}
