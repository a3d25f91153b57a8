//! Configuration loader
//!
//! ## Loading Strategy
//! 1. `.env` in the working directory is read into the process environment
//! 2. A config file is loaded if one is found: `VISADESK_CONFIG` names it
//!    explicitly, otherwise standard locations are searched. Defaults apply
//!    when there is none.
//! 3. `VISADESK_*` environment variables override individual values
//!
//! ## Environment Variables
//! - `VISADESK_API_URL`: Backend base URL
//! - `VISADESK_HTTP_TIMEOUT_SECS`: Default request timeout in seconds
//! - `VISADESK_USER_AGENT`: User agent sent with every request
//! - `VISADESK_CREDENTIALS_BACKEND`: `memory`, `file` or `keychain`
//! - `VISADESK_CREDENTIALS_PATH`: Session file for the `file` backend
//! - `VISADESK_KEYCHAIN_SERVICE`: Service name for the `keychain` backend
//! - `VISADESK_CACHE_TTL_SECS`: Query cache time-to-live in seconds
//! - `VISADESK_CACHE_MAX_ENTRIES`: Query cache capacity
//! - `VISADESK_TRANSPORT`: `http` or `fake`

use std::path::{Path, PathBuf};
use std::str::FromStr;

use url::Url;
use visadesk_domain::{Config, CredentialBackend, Result, TransportMode, VisadeskError};

use crate::errors::InfraError;

/// Load configuration from `.env`, an optional file and the environment
///
/// # Errors
/// Returns `VisadeskError::Config` if the named config file is missing or
/// malformed, or any override holds an invalid value.
pub fn load() -> Result<Config> {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
        Err(err) if err.not_found() => {}
        Err(err) => return Err(VisadeskError::Config(format!("invalid .env file: {err}"))),
    }

    let mut config = match std::env::var_os("VISADESK_CONFIG") {
        Some(path) => load_from_file(Some(PathBuf::from(path)))?,
        None => match discover_config_path() {
            Some(path) => load_from_file(Some(path))?,
            None => {
                tracing::debug!("no config file found, using defaults");
                Config::default()
            }
        },
    };

    apply_overrides(&mut config, |key| std::env::var(key).ok())?;
    validate(&config)?;

    tracing::info!(
        base_url = %config.api.base_url,
        transport = %config.transport,
        credentials = %config.storage.backend,
        "configuration loaded"
    );
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, searches the standard locations. Format is detected
/// by extension (`.json` or `.toml`).
///
/// # Errors
/// Returns `VisadeskError::Config` if no file is found, it cannot be read,
/// or its contents are invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(VisadeskError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => discover_config_path().ok_or_else(|| {
            VisadeskError::Config("No config file found in any of the standard locations".into())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| VisadeskError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents).map_err(|e| InfraError::from(e).into()),
        "json" => serde_json::from_str(contents)
            .map_err(|e| VisadeskError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(VisadeskError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// First existing `visadesk.{toml,json}` in the working directory, its
/// parent, or next to the executable
pub fn discover_config_path() -> Option<PathBuf> {
    let mut dirs = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd.join(".."));
        dirs.insert(0, cwd);
    }
    if let Some(exe_dir) = std::env::current_exe().ok().and_then(|p| p.parent().map(Path::to_path_buf)) {
        dirs.push(exe_dir);
    }

    dirs.iter()
        .flat_map(|dir| [dir.join("visadesk.toml"), dir.join("visadesk.json")])
        .find(|path| path.exists())
}

/// Apply `VISADESK_*` overrides read through `lookup`
///
/// # Errors
/// Returns `VisadeskError::Config` naming the first variable with an invalid
/// value
pub fn apply_overrides<F>(config: &mut Config, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    if let Some(url) = var("VISADESK_API_URL") {
        config.api.base_url = url;
    }
    if let Some(secs) = var("VISADESK_HTTP_TIMEOUT_SECS") {
        config.api.timeout_secs = parse_value("VISADESK_HTTP_TIMEOUT_SECS", &secs)?;
    }
    if let Some(agent) = var("VISADESK_USER_AGENT") {
        config.api.user_agent = agent;
    }
    if let Some(backend) = var("VISADESK_CREDENTIALS_BACKEND") {
        config.storage.backend =
            parse_value::<CredentialBackend>("VISADESK_CREDENTIALS_BACKEND", &backend)?;
    }
    if let Some(path) = var("VISADESK_CREDENTIALS_PATH") {
        config.storage.path = path;
    }
    if let Some(service) = var("VISADESK_KEYCHAIN_SERVICE") {
        config.storage.service_name = service;
    }
    if let Some(ttl) = var("VISADESK_CACHE_TTL_SECS") {
        config.cache.ttl_secs = parse_value("VISADESK_CACHE_TTL_SECS", &ttl)?;
    }
    if let Some(max) = var("VISADESK_CACHE_MAX_ENTRIES") {
        config.cache.max_entries = parse_value("VISADESK_CACHE_MAX_ENTRIES", &max)?;
    }
    if let Some(mode) = var("VISADESK_TRANSPORT") {
        config.transport = parse_value::<TransportMode>("VISADESK_TRANSPORT", &mode)?;
    }
    Ok(())
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse::<T>().map_err(|e| VisadeskError::Config(format!("Invalid {key} '{raw}': {e}")))
}

/// Reject values that would only fail later, at request time
///
/// # Errors
/// Returns `VisadeskError::Config` describing the first invalid value
pub fn validate(config: &Config) -> Result<()> {
    let url = Url::parse(&config.api.base_url)
        .map_err(|e| VisadeskError::Config(format!("Invalid API base URL: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(VisadeskError::Config(format!(
            "API base URL must use http or https, got {}",
            url.scheme()
        )));
    }
    if config.api.timeout_secs == 0 {
        return Err(VisadeskError::Config("Request timeout must be positive".into()));
    }
    if config.cache.max_entries == 0 {
        return Err(VisadeskError::Config("Cache capacity must be positive".into()));
    }
    if config.storage.backend == CredentialBackend::File && config.storage.path.trim().is_empty() {
        return Err(VisadeskError::Config("Credentials path must not be empty".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> =
            pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_overrides_replace_file_values() {
        let mut config = Config::default();
        apply_overrides(
            &mut config,
            lookup(&[
                ("VISADESK_API_URL", "https://api.example.com/api"),
                ("VISADESK_HTTP_TIMEOUT_SECS", "12"),
                ("VISADESK_CREDENTIALS_BACKEND", "Keychain"),
                ("VISADESK_TRANSPORT", "fake"),
                ("VISADESK_CACHE_TTL_SECS", " 60 "),
            ]),
        )
        .unwrap();

        assert_eq!(config.api.base_url, "https://api.example.com/api");
        assert_eq!(config.api.timeout_secs, 12);
        assert_eq!(config.storage.backend, CredentialBackend::Keychain);
        assert_eq!(config.transport, TransportMode::Fake);
        assert_eq!(config.cache.ttl_secs, 60);
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_blank_overrides_are_ignored() {
        let mut config = Config::default();
        apply_overrides(&mut config, lookup(&[("VISADESK_API_URL", "  ")])).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_invalid_number_is_config_error() {
        let mut config = Config::default();
        let err = apply_overrides(&mut config, lookup(&[("VISADESK_HTTP_TIMEOUT_SECS", "soon")]))
            .unwrap_err();
        assert!(matches!(err, VisadeskError::Config(ref m) if m.contains("VISADESK_HTTP_TIMEOUT_SECS")));
    }

    #[test]
    fn test_invalid_backend_is_config_error() {
        let mut config = Config::default();
        let result = apply_overrides(&mut config, lookup(&[("VISADESK_CREDENTIALS_BACKEND", "vault")]));
        assert!(matches!(result, Err(VisadeskError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.api.base_url = "not a url".into();
        assert!(validate(&config).is_err());

        let mut config = Config::default();
        config.api.base_url = "ftp://example.com".into();
        assert!(validate(&config).is_err());

        let mut config = Config::default();
        config.api.timeout_secs = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_load_from_file_toml() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
transport = "fake"

[api]
base_url = "https://staging.example.com/api"

[storage]
backend = "memory"
"#
        )
        .unwrap();

        let config = load_from_file(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.api.base_url, "https://staging.example.com/api");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.storage.backend, CredentialBackend::Memory);
        assert_eq!(config.transport, TransportMode::Fake);
    }

    #[test]
    fn test_load_from_file_json() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"cache": {{"ttl_secs": 10, "max_entries": 5}}}}"#).unwrap();

        let config = load_from_file(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.cache.ttl_secs, 10);
        assert_eq!(config.cache.max_entries, 5);
    }

    #[test]
    fn test_load_from_file_invalid_toml() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[api\nbase_url = ").unwrap();

        let result = load_from_file(Some(file.path().to_path_buf()));
        assert!(matches!(result, Err(VisadeskError::Config(_))));
    }

    #[test]
    fn test_load_from_file_missing() {
        let result = load_from_file(Some(PathBuf::from("/nonexistent/visadesk.toml")));
        assert!(matches!(result, Err(VisadeskError::Config(_))));
    }

    #[test]
    fn test_unsupported_extension() {
        let file = NamedTempFile::new().unwrap();
        let path = file.path().with_extension("yaml");
        std::fs::write(&path, "api: {}").unwrap();

        let result = load_from_file(Some(path.clone()));
        assert!(matches!(result, Err(VisadeskError::Config(ref m)) if m.contains("yaml")));
        std::fs::remove_file(path).unwrap();
    }
}
