//! Conversions from external infrastructure errors into domain errors.

use ausmass_domain::AusmassError;
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub AusmassError);

impl From<InfraError> for AusmassError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<AusmassError> for InfraError {
    fn from(value: AusmassError) -> Self {
        InfraError(value)
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(http_error_to_domain(value))
    }
}

fn http_error_to_domain(err: HttpError) -> AusmassError {
    if err.is_timeout() {
        return AusmassError::Network("HTTP request timed out".into());
    }

    if err.is_connect() {
        return AusmassError::Network("HTTP connection failure".into());
    }

    if let Some(status) = err.status() {
        let code = status.as_u16();
        let message =
            format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

        return match code {
            401 | 403 => AusmassError::Auth(message),
            404 => AusmassError::NotFound(message),
            400..=499 => AusmassError::InvalidInput(message),
            _ => AusmassError::Network(message),
        };
    }

    AusmassError::Network(err.to_string())
}
