//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// API defaults
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3001/api";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const HEALTH_CHECK_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_USER_AGENT: &str = concat!("visadesk/", env!("CARGO_PKG_VERSION"));

// Credential storage keys
pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";
pub const USER_PROFILE_KEY: &str = "user_profile";
pub const REMEMBER_ME_KEY: &str = "remember_me";
pub const DEFAULT_KEYCHAIN_SERVICE: &str = "visadesk";
pub const DEFAULT_CREDENTIALS_FILE: &str = "visadesk-session.json";

/// Paths reachable without credentials. A trailing `/` marks a prefix.
pub const PUBLIC_PATHS: &[&str] =
    &["/auth/login", "/auth/refresh", "/auth/forgot-password", "/health", "/client/"];

// Query cache
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;
pub const DEFAULT_CACHE_MAX_ENTRIES: u64 = 1_000;

// Validation
pub const MIN_PASSWORD_LENGTH: usize = 6;
pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;
pub const UPLOAD_CHUNK_BYTES: usize = 64 * 1024;

/// Whether `path` may be called without a bearer token
pub fn is_public_path(path: &str) -> bool {
    let path = path.split('?').next().unwrap_or(path);
    PUBLIC_PATHS.iter().any(|public| {
        if public.ends_with('/') {
            path.starts_with(public)
        } else {
            path == *public
        }
    })
}
