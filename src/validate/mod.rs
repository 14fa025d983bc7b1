//! Credential validation
//!
//! One generic validator drives any [`CredentialClient`](crate::service::CredentialClient)
//! through the configuration, connection and permission phases.

mod checks;
mod classify;
mod result;
mod run;

pub use checks::format_warnings;
pub use classify::{
    auth_remediation, classify_connection_error, config_remediation, connection_remediation,
    is_auth_failure, permission_remediation,
};
pub use result::{Phase, Remediation, ValidationResult};
pub use run::validate;
