//! Frontend Configuration
//!
//! Backend location and UI timings. The base URL is baked in at build time
//! from `INVENTORY_API_URL`; relative values resolve against the page origin.

/// Used when `INVENTORY_API_URL` is not set at build time
pub const DEFAULT_API_BASE: &str = "/api";

/// Quiet period before search text triggers a fetch
pub const SEARCH_DEBOUNCE_MS: u32 = 300;

/// How long a toast stays on screen
pub const TOAST_DURATION_MS: u32 = 4000;

/// Page size choices offered in the toolbar
pub const PAGE_SIZES: &[u32] = &[5, 10, 20, 50];

pub const DEFAULT_PAGE_SIZE: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Absolute base URL without trailing slash, e.g. `https://host/api`
    pub base_url: String,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Build from the compile-time environment, resolving relative bases against `origin`
    pub fn from_build_env(origin: &str) -> Self {
        let raw = option_env!("INVENTORY_API_URL").unwrap_or(DEFAULT_API_BASE);
        Self::new(resolve_base(raw, origin))
    }
}

/// Join a possibly relative base onto the page origin
fn resolve_base(raw: &str, origin: &str) -> String {
    let raw = raw.trim();
    if raw.starts_with("http://") || raw.starts_with("https://") {
        return raw.to_string();
    }
    let origin = origin.trim_end_matches('/');
    if raw.is_empty() {
        origin.to_string()
    } else if raw.starts_with('/') {
        format!("{}{}", origin, raw)
    } else {
        format!("{}/{}", origin, raw)
    }
}
