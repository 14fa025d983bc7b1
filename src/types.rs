//! Core types for cred-check

use serde::{Deserialize, Serialize};

/// External service whose credentials are validated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Service {
    /// GitHub or GitHub Enterprise
    GitHub,
    /// GitLab or self-hosted GitLab
    GitLab,
    /// Bluesky (AT Protocol)
    Bluesky,
}

impl Service {
    /// Noun used for the credential in reports ("API key", "credentials")
    pub const fn credential_noun(self) -> &'static str {
        match self {
            Self::GitHub | Self::GitLab => "API key",
            Self::Bluesky => "credentials",
        }
    }
}

impl std::fmt::Display for Service {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GitHub => write!(f, "GitHub"),
            Self::GitLab => write!(f, "GitLab"),
            Self::Bluesky => write!(f, "Bluesky"),
        }
    }
}

/// Authenticated principal as reported by the service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Login, username or handle
    pub handle: String,
    /// Unique id (numeric user id, or DID for Bluesky)
    pub id: String,
    /// Display name, if the profile has one
    pub display_name: Option<String>,
    /// Email, if visible to the token
    pub email: Option<String>,
    /// Service-specific profile facts in display order (label, value)
    pub facts: Vec<(String, String)>,
}

impl Identity {
    /// Create an identity with just a handle and id
    pub fn new(handle: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            handle: handle.into(),
            id: id.into(),
            display_name: None,
            email: None,
            facts: Vec::new(),
        }
    }

    /// Set the display name
    #[must_use]
    pub fn with_display_name(mut self, name: Option<String>) -> Self {
        self.display_name = name.filter(|n| !n.is_empty());
        self
    }

    /// Set the email
    #[must_use]
    pub fn with_email(mut self, email: Option<String>) -> Self {
        self.email = email.filter(|e| !e.is_empty());
        self
    }

    /// Append a profile fact
    #[must_use]
    pub fn with_fact(mut self, label: impl Into<String>, value: impl ToString) -> Self {
        self.facts.push((label.into(), value.to_string()));
        self
    }
}

/// Outcome of a successful permission probe
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionReport {
    /// Read capabilities confirmed by the probe
    pub granted: Vec<String>,
    /// Extra information gathered along the way (rate limit, scopes)
    pub notes: Vec<String>,
}

/// What to do when the permission probe fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PermissionPolicy {
    /// Report a warning; the credential still counts as valid
    #[default]
    Lenient,
    /// Treat missing read scope as a validation failure
    Strict,
}

/// Reference to a record created on Bluesky
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRef {
    /// AT URI of the record
    pub uri: String,
    /// Content id of the record
    pub cid: String,
}
