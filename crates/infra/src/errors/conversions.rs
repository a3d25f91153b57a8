//! Conversions from external infrastructure errors into domain errors.

use keyring::Error as KeyringError;
use reqwest::Error as HttpError;
use visadesk_domain::VisadeskError;

use crate::http::TransportError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub VisadeskError);

impl From<InfraError> for VisadeskError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<VisadeskError> for InfraError {
    fn from(value: VisadeskError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoVisadeskError {
    fn into_visadesk(self) -> VisadeskError;
}

/* -------------------------------------------------------------------------- */
/* TransportError → VisadeskError */
/* -------------------------------------------------------------------------- */

impl IntoVisadeskError for TransportError {
    fn into_visadesk(self) -> VisadeskError {
        match self {
            TransportError::Connect(message) => {
                VisadeskError::Network(format!("connection failed: {message}"))
            }
            TransportError::Io(message) => VisadeskError::Network(message),
            TransportError::Timeout(after) => VisadeskError::Timeout(after),
            TransportError::Build(message) => {
                VisadeskError::Internal(format!("invalid request: {message}"))
            }
        }
    }
}

impl From<TransportError> for InfraError {
    fn from(value: TransportError) -> Self {
        InfraError(value.into_visadesk())
    }
}

/* -------------------------------------------------------------------------- */
/* keyring::Error → VisadeskError */
/* -------------------------------------------------------------------------- */

impl IntoVisadeskError for KeyringError {
    fn into_visadesk(self) -> VisadeskError {
        use KeyringError::{
            Ambiguous, BadEncoding, Invalid, NoEntry, NoStorageAccess, PlatformFailure, TooLong,
        };

        let description = self.to_string();

        match self {
            NoEntry => VisadeskError::Storage("keychain entry not found".into()),
            BadEncoding(_) => {
                VisadeskError::Storage("credential in keychain is not valid UTF-8".into())
            }
            TooLong(name, limit) => VisadeskError::Storage(format!(
                "keychain attribute '{name}' exceeds platform limit ({limit})"
            )),
            Invalid(attr, reason) => {
                VisadeskError::Storage(format!("keychain attribute '{attr}' is invalid: {reason}"))
            }
            Ambiguous(entries) => VisadeskError::Storage(format!(
                "multiple keychain entries matched request ({} results)",
                entries.len()
            )),
            PlatformFailure(err) => {
                VisadeskError::Storage(format!("keychain platform error: {err}"))
            }
            NoStorageAccess(err) => {
                VisadeskError::Storage(format!("unable to access secure storage: {err}"))
            }
            _ => VisadeskError::Storage(description),
        }
    }
}

impl From<KeyringError> for InfraError {
    fn from(value: KeyringError) -> Self {
        InfraError(value.into_visadesk())
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → VisadeskError */
/* -------------------------------------------------------------------------- */

impl IntoVisadeskError for HttpError {
    fn into_visadesk(self) -> VisadeskError {
        if self.is_timeout() {
            return VisadeskError::Network("HTTP request timed out".into());
        }

        #[cfg(not(target_arch = "wasm32"))]
        if self.is_connect() {
            return VisadeskError::Network("HTTP connection failure".into());
        }

        if self.is_builder() {
            return VisadeskError::Config(format!("invalid HTTP client configuration: {self}"));
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message = status.canonical_reason().unwrap_or("unknown status").to_string();
            return match code {
                401 => VisadeskError::AuthExpired,
                _ => VisadeskError::api(code, message),
            };
        }

        VisadeskError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_visadesk())
    }
}

/* -------------------------------------------------------------------------- */
/* std::io / serialization → VisadeskError */
/* -------------------------------------------------------------------------- */

impl From<std::io::Error> for InfraError {
    fn from(value: std::io::Error) -> Self {
        InfraError(VisadeskError::Storage(format!("I/O error: {value}")))
    }
}

impl From<serde_json::Error> for InfraError {
    fn from(value: serde_json::Error) -> Self {
        InfraError(VisadeskError::Decode(value.to_string()))
    }
}

impl From<toml::de::Error> for InfraError {
    fn from(value: toml::de::Error) -> Self {
        InfraError(VisadeskError::Config(format!("invalid TOML: {}", value.message())))
    }
}

impl From<url::ParseError> for InfraError {
    fn from(value: url::ParseError) -> Self {
        InfraError(VisadeskError::Config(format!("invalid URL: {value}")))
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use reqwest::{Client, StatusCode};
    use tokio::runtime::Runtime;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[test]
    fn transport_failures_are_network_class() {
        let connect: VisadeskError =
            InfraError::from(TransportError::Connect("refused".into())).into();
        let timeout: VisadeskError =
            InfraError::from(TransportError::Timeout(Duration::from_secs(30))).into();

        assert!(connect.is_network());
        assert!(timeout.is_network());
        assert!(!matches!(connect, VisadeskError::Api { .. }));
    }

    #[test]
    fn keyring_no_entry_maps_to_storage() {
        let err = KeyringError::NoEntry;
        let mapped: VisadeskError = InfraError::from(err).into();
        match mapped {
            VisadeskError::Storage(msg) => assert!(msg.contains("keychain")),
            other => panic!("expected storage error, got {other:?}"),
        }
    }

    #[test]
    fn io_and_json_errors_map_to_storage_and_decode() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert!(matches!(VisadeskError::from(InfraError::from(io)), VisadeskError::Storage(_)));

        let json = serde_json::from_str::<u32>("nope").unwrap_err();
        assert!(matches!(VisadeskError::from(InfraError::from(json)), VisadeskError::Decode(_)));
    }

    #[test]
    fn http_status_404_maps_to_api_error() {
        Runtime::new().unwrap().block_on(async {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .respond_with(ResponseTemplate::new(StatusCode::NOT_FOUND))
                .mount(&server)
                .await;

            let client = Client::builder().no_proxy().build().unwrap();
            let error =
                client.get(server.uri()).send().await.unwrap().error_for_status().unwrap_err();

            let mapped: VisadeskError = InfraError::from(error).into();
            assert_eq!(mapped.status(), Some(404));
        });
    }
}
