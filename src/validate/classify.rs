//! Error classification - pure mapping from client signals to outcomes
//!
//! No I/O happens here, so every branch of the taxonomy is unit-testable
//! without a live service.

use crate::config::env_keys;
use crate::error::ClientError;
use crate::types::Service;
use crate::validate::result::{Remediation, ValidationResult};

/// Messages services use for rejected credentials
const AUTH_FAILURE_MARKERS: &[&str] = &["bad credentials", "invalid identifier or password"];

/// Whether a client error means the credential itself was rejected
pub fn is_auth_failure(err: &ClientError) -> bool {
    match err {
        ClientError::Status { status: 401, .. } => true,
        ClientError::Status { message, .. } | ClientError::Other { message, .. } => {
            let message = message.to_lowercase();
            AUTH_FAILURE_MARKERS.iter().any(|m| message.contains(m))
        }
        ClientError::Network(_) => false,
    }
}

/// Classify a connection-phase failure
///
/// Every branch is fatal; the variant decides the remediation shown.
pub fn classify_connection_error(
    service: Service,
    base_url: &str,
    err: &ClientError,
) -> ValidationResult {
    if is_auth_failure(err) {
        let what = match service {
            Service::GitHub | Service::GitLab => "Invalid API key",
            Service::Bluesky => "Invalid handle or app password",
        };
        return ValidationResult::AuthenticationError {
            message: format!("Authentication failed: {what} ({err})"),
            remediation: auth_remediation(service),
        };
    }

    match err {
        ClientError::Network(detail) => ValidationResult::ConnectionError {
            message: format!("Connection failed: Could not reach {base_url} ({detail})"),
            remediation: connection_remediation(service),
        },
        ClientError::Status { status: 403, message } => ValidationResult::UnexpectedError {
            kind: "Access forbidden".to_string(),
            message: message.clone(),
            remediation: Some(Remediation::new(
                "This might indicate",
                ["Rate limit exceeded", "Insufficient permissions"],
            )),
        },
        ClientError::Status { status, message } => ValidationResult::UnexpectedError {
            kind: format!("{service} API error (HTTP {status})"),
            message: message.clone(),
            remediation: None,
        },
        ClientError::Other { kind, message } => ValidationResult::UnexpectedError {
            kind: kind.clone(),
            message: message.clone(),
            remediation: None,
        },
    }
}

/// Advice for a missing or malformed configuration
pub fn config_remediation(service: Service) -> Remediation {
    let keys = env_keys(service);
    let mut steps = vec![
        "A .env file exists in the project root".to_string(),
        format!("{} is set in the .env file", keys.secret),
    ];
    if let Some((var, default)) = keys.handle {
        steps.push(format!("{var} is set (default: {default})"));
    }
    Remediation::new("Please ensure", steps)
}

/// Advice for a rejected credential
pub fn auth_remediation(service: Service) -> Remediation {
    match service {
        Service::GitHub => Remediation::new(
            "Please check",
            [
                "Your API key is correct",
                "The API key hasn't expired",
                "The API key has the required permissions",
            ],
        ),
        Service::GitLab => Remediation::new(
            "Please check",
            [
                "Your API key is correct",
                "The API key hasn't expired",
                "The API key has the required scopes",
            ],
        ),
        Service::Bluesky => Remediation::new(
            "Please check",
            [
                "Your Bluesky handle is correct (e.g., sallocat.bsky.social)",
                "You're using an App Password, not your regular password",
                "The app password hasn't been revoked",
                "To create an App Password, go to https://bsky.app/settings/app-passwords",
            ],
        ),
    }
}

/// Advice for an unreachable service
pub fn connection_remediation(service: Service) -> Remediation {
    let url_var = env_keys(service).base_url.0;
    match service {
        Service::GitHub => Remediation::new(
            "Please check",
            [
                "Your internet connection".to_string(),
                format!("{url_var} is correct"),
            ],
        ),
        Service::GitLab => Remediation::new(
            "Please check",
            [
                "Your internet connection".to_string(),
                format!("The GitLab URL ({url_var}) is correct"),
                "If using self-hosted GitLab, ensure it's accessible".to_string(),
            ],
        ),
        Service::Bluesky => Remediation::new(
            "Please check",
            [
                "Your internet connection".to_string(),
                format!("The Bluesky service ({url_var}) is accessible"),
            ],
        ),
    }
}

/// Advice for a failed permission probe
pub fn permission_remediation(service: Service) -> Remediation {
    match service {
        Service::GitHub => Remediation::new(
            "Your API key works but may be missing some permissions",
            ["Consider adding: repo, read:user, read:org"],
        ),
        Service::GitLab => Remediation::new(
            "Your API key works but may be missing some scopes",
            ["Consider adding: api, read_api, read_user"],
        ),
        Service::Bluesky => Remediation::new(
            "Your credentials work but may have limited permissions",
            Vec::<String>::new(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(code: u16, message: &str) -> ClientError {
        ClientError::Status {
            status: code,
            message: message.to_string(),
        }
    }

    #[test]
    fn test_401_is_authentication_error() {
        let result = classify_connection_error(
            Service::GitHub,
            "https://api.github.com",
            &status(401, "Bad credentials"),
        );
        assert!(matches!(result, ValidationResult::AuthenticationError { .. }));
        assert_eq!(result.exit_code(), 1);
    }

    #[test]
    fn test_bluesky_invalid_password_message_is_authentication_error() {
        // Some PDS versions answer 400 for a bad identifier/password pair
        let err = status(400, "Invalid identifier or password");
        let result = classify_connection_error(Service::Bluesky, "https://bsky.social", &err);
        match result {
            ValidationResult::AuthenticationError {
                message,
                remediation,
            } => {
                assert!(message.contains("Invalid handle or app password"));
                assert!(
                    remediation
                        .steps
                        .iter()
                        .any(|s| s.contains("app-passwords"))
                );
            }
            other => panic!("expected AuthenticationError, got {other:?}"),
        }
    }

    #[test]
    fn test_network_is_connection_error() {
        let err = ClientError::Network("connection refused".to_string());
        let result = classify_connection_error(Service::GitLab, "https://gitlab.example.com", &err);
        match result {
            ValidationResult::ConnectionError { message, .. } => {
                assert!(message.contains("https://gitlab.example.com"));
            }
            other => panic!("expected ConnectionError, got {other:?}"),
        }
    }

    #[test]
    fn test_403_is_forbidden_with_remediation() {
        let result = classify_connection_error(
            Service::GitHub,
            "https://api.github.com",
            &status(403, "API rate limit exceeded"),
        );
        match result {
            ValidationResult::UnexpectedError {
                kind, remediation, ..
            } => {
                assert_eq!(kind, "Access forbidden");
                assert!(remediation.is_some());
            }
            other => panic!("expected UnexpectedError, got {other:?}"),
        }
    }

    #[test]
    fn test_other_status_is_unexpected() {
        let result = classify_connection_error(
            Service::GitLab,
            "https://gitlab.com",
            &status(500, "Internal Server Error"),
        );
        match result {
            ValidationResult::UnexpectedError {
                kind,
                message,
                remediation,
            } => {
                assert!(kind.contains("HTTP 500"));
                assert_eq!(message, "Internal Server Error");
                assert!(remediation.is_none());
            }
            other => panic!("expected UnexpectedError, got {other:?}"),
        }
    }

    #[test]
    fn test_other_keeps_raw_kind() {
        let err = ClientError::other("DecodeError", "expected value at line 1");
        let result = classify_connection_error(Service::Bluesky, "https://bsky.social", &err);
        assert!(matches!(
            result,
            ValidationResult::UnexpectedError { ref kind, .. } if kind == "DecodeError"
        ));
    }

    #[test]
    fn test_network_never_auth_failure() {
        assert!(!is_auth_failure(&ClientError::Network(
            "bad credentials".to_string()
        )));
    }

    #[test]
    fn test_config_remediation_mentions_handle_for_bluesky() {
        let remediation = config_remediation(Service::Bluesky);
        assert_eq!(remediation.steps.len(), 3);
        assert!(remediation.steps[1].contains("BLUESKY_PASSWORD"));

        let remediation = config_remediation(Service::GitHub);
        assert_eq!(remediation.steps.len(), 2);
    }
}
