//! The three-phase validation flow (EFFECTFUL)
//!
//! Configuration -> authenticated connection -> permission probe, stopping
//! at the first fatal failure. All classification is delegated to the pure
//! functions in [`classify`](crate::validate::classify).

use crate::config::CredentialConfig;
use crate::error::{ClientError, Error};
use crate::service::{ClientResult, CredentialClient};
use crate::types::{Identity, PermissionPolicy};
use crate::validate::checks::format_warnings;
use crate::validate::classify::{
    classify_connection_error, config_remediation, permission_remediation,
};
use crate::validate::result::ValidationResult;
use tracing::debug;

/// Granted capability recorded when the profile can be re-read
const PROFILE_READ: &str = "Can read profile information";

/// Validate the configured credential
///
/// `client_factory` is only invoked once the configuration phase has
/// passed, so a missing secret never leads to a request.
pub async fn validate<F>(config: &CredentialConfig, client_factory: F) -> ValidationResult
where
    F: FnOnce(&CredentialConfig) -> ClientResult<Box<dyn CredentialClient>>,
{
    let service = config.service;

    // Phase 1: configuration
    let secret = match config.require_secret() {
        Ok(secret) => secret,
        Err(e) => {
            let message = match e {
                Error::Config(message) => message,
                other => other.to_string(),
            };
            debug!(%service, "configuration phase failed");
            return ValidationResult::ConfigurationError {
                message,
                remediation: config_remediation(service),
            };
        }
    };
    let warnings = format_warnings(config);
    for warning in &warnings {
        debug!(%service, %warning, "credential format warning");
    }

    // Phase 2: authenticated connection
    let mut client = match client_factory(config) {
        Ok(client) => client,
        Err(e) => return classify_connection_error(service, &config.base_url, &e),
    };

    let identity = match client
        .authenticate(config.handle.as_deref(), secret.expose())
        .await
    {
        Ok(identity) => identity,
        Err(e) => {
            debug!(%service, error = %e, "connection phase failed");
            return classify_connection_error(service, &config.base_url, &e);
        }
    };
    debug!(%service, handle = %identity.handle, "authenticated");

    // Phase 3: permission probe
    let identity = match client.get_identity().await {
        Ok(profile) => profile,
        Err(e) => return permission_failure(config, identity, warnings, &e),
    };

    match client.probe_read_permission().await {
        Ok(mut permissions) => {
            permissions.granted.insert(0, PROFILE_READ.to_string());
            debug!(%service, granted = permissions.granted.len(), "permission probe passed");
            ValidationResult::Success {
                identity,
                permissions,
                warnings,
            }
        }
        Err(e) => permission_failure(config, identity, warnings, &e),
    }
}

/// Downgrade (or not, under the strict policy) a failed permission probe
fn permission_failure(
    config: &CredentialConfig,
    identity: Identity,
    warnings: Vec<String>,
    err: &ClientError,
) -> ValidationResult {
    debug!(service = %config.service, error = %err, policy = ?config.permission_policy, "permission probe failed");
    let remediation = permission_remediation(config.service);
    match config.permission_policy {
        PermissionPolicy::Lenient => ValidationResult::PartialSuccess {
            identity,
            permission_warning: format!("Permission warning: {err}"),
            remediation,
            warnings,
        },
        PermissionPolicy::Strict => ValidationResult::InsufficientPermissions {
            identity,
            message: format!("Permission check failed: {err}"),
            remediation,
        },
    }
}
