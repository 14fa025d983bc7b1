//! Validation outcome types

use crate::types::{Identity, PermissionReport};

/// Phase of the validation flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    /// Configuration presence and format checks
    Configuration,
    /// Authenticated connection
    Connection,
    /// Read permission probe
    Permission,
}

impl Phase {
    /// 1-based step number shown in reports
    pub const fn step(self) -> u8 {
        match self {
            Self::Configuration => 1,
            Self::Connection => 2,
            Self::Permission => 3,
        }
    }
}

/// Actionable advice attached to a failure or warning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Remediation {
    /// Lead-in line, e.g. "Please check"
    pub heading: String,
    /// Numbered steps
    pub steps: Vec<String>,
}

impl Remediation {
    /// Build a remediation from a heading and steps
    pub fn new<I, S>(heading: impl Into<String>, steps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            heading: heading.into(),
            steps: steps.into_iter().map(Into::into).collect(),
        }
    }
}

/// Result of one validation run
///
/// Exactly one variant describes the run. Fatal variants map to exit code 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    /// Required configuration is missing or malformed; no request was made
    ConfigurationError {
        /// What is wrong
        message: String,
        /// How to fix it
        remediation: Remediation,
    },
    /// The service rejected the credential
    AuthenticationError {
        /// What is wrong
        message: String,
        /// How to fix it
        remediation: Remediation,
    },
    /// The service could not be reached
    ConnectionError {
        /// What is wrong
        message: String,
        /// How to fix it
        remediation: Remediation,
    },
    /// Any other connection-phase failure
    UnexpectedError {
        /// Failure type
        kind: String,
        /// Raw error message
        message: String,
        /// Advice, when the failure is recognizable
        remediation: Option<Remediation>,
    },
    /// Authenticated, but the read probe failed under the strict policy
    InsufficientPermissions {
        /// Authenticated principal
        identity: Identity,
        /// Probe failure
        message: String,
        /// Scopes to add
        remediation: Remediation,
    },
    /// Authenticated and the read probe succeeded
    Success {
        /// Authenticated principal
        identity: Identity,
        /// Capabilities confirmed by the probe
        permissions: PermissionReport,
        /// Non-fatal credential format warnings
        warnings: Vec<String>,
    },
    /// Authenticated, but the read probe failed (lenient policy)
    PartialSuccess {
        /// Authenticated principal
        identity: Identity,
        /// Probe failure, downgraded to a warning
        permission_warning: String,
        /// Scopes to add
        remediation: Remediation,
        /// Non-fatal credential format warnings
        warnings: Vec<String>,
    },
}

impl ValidationResult {
    /// Whether the credential counts as valid
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Success { .. } | Self::PartialSuccess { .. })
    }

    /// Process exit code for this result
    pub const fn exit_code(&self) -> u8 {
        if self.is_valid() { 0 } else { 1 }
    }

    /// Last phase that ran
    pub const fn phase(&self) -> Phase {
        match self {
            Self::ConfigurationError { .. } => Phase::Configuration,
            Self::AuthenticationError { .. }
            | Self::ConnectionError { .. }
            | Self::UnexpectedError { .. } => Phase::Connection,
            Self::InsufficientPermissions { .. }
            | Self::Success { .. }
            | Self::PartialSuccess { .. } => Phase::Permission,
        }
    }

    /// Variant name, for logging and comparisons
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ConfigurationError { .. } => "ConfigurationError",
            Self::AuthenticationError { .. } => "AuthenticationError",
            Self::ConnectionError { .. } => "ConnectionError",
            Self::UnexpectedError { .. } => "UnexpectedError",
            Self::InsufficientPermissions { .. } => "InsufficientPermissions",
            Self::Success { .. } => "Success",
            Self::PartialSuccess { .. } => "PartialSuccess",
        }
    }

    /// Format warnings carried by a valid result
    ///
    /// `None` for fatal results, which do not record them.
    pub fn warnings(&self) -> Option<&[String]> {
        match self {
            Self::Success { warnings, .. } | Self::PartialSuccess { warnings, .. } => {
                Some(warnings)
            }
            _ => None,
        }
    }

    /// The authenticated principal, when authentication succeeded
    pub const fn identity(&self) -> Option<&Identity> {
        match self {
            Self::InsufficientPermissions { identity, .. }
            | Self::Success { identity, .. }
            | Self::PartialSuccess { identity, .. } => Some(identity),
            _ => None,
        }
    }
}
