//! Credential configuration loaded from the environment
//!
//! Values are looked up in the process environment first and then in an
//! optional `.env` file. The process environment is never modified.

use crate::error::{Error, Result};
use crate::types::{PermissionPolicy, Service};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;
use url::Url;

/// Default location of the dotenv file, relative to the working directory
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Variable selecting the permission policy
pub const STRICT_PERMISSIONS_VAR: &str = "CREDCHECK_STRICT_PERMISSIONS";

/// Environment variable names and defaults for one service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvKeys {
    /// Variable holding the secret (required)
    pub secret: &'static str,
    /// Variable holding the handle, with its default
    pub handle: Option<(&'static str, &'static str)>,
    /// Variable holding the base URL, with its default
    pub base_url: (&'static str, &'static str),
}

/// Variable names and defaults for a service
pub const fn env_keys(service: Service) -> EnvKeys {
    match service {
        Service::GitHub => EnvKeys {
            secret: "GITHUB_API_KEY",
            handle: None,
            base_url: ("GITHUB_URL", "https://api.github.com"),
        },
        Service::GitLab => EnvKeys {
            secret: "GITLAB_API_KEY",
            handle: None,
            base_url: ("GITLAB_URL", "https://gitlab.com"),
        },
        Service::Bluesky => EnvKeys {
            secret: "BLUESKY_PASSWORD",
            handle: Some(("BLUESKY_HANDLE", "sallocat.bsky.social")),
            base_url: ("BLUESKY_SERVICE", "https://bsky.social"),
        },
    }
}

/// A credential string that never shows up in debug output
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    /// Wrap a raw secret
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw secret, for handing to a client
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Length in characters
    pub fn len(&self) -> usize {
        self.0.chars().count()
    }

    /// Whether the secret is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Masked form showing the first ten and last four characters
    ///
    /// Secrets of 14 characters or fewer are fully hidden.
    pub fn masked(&self) -> String {
        if self.len() <= 14 {
            return "****".to_string();
        }
        let head: String = self.0.chars().take(10).collect();
        format!("{head}...{}", self.tail())
    }

    /// Masked form that hides the head entirely, as used for passwords
    pub fn masked_password(&self) -> String {
        let tail = if self.len() > 14 {
            self.tail()
        } else {
            "****".to_string()
        };
        format!("{}...{tail}", "*".repeat(10))
    }

    fn tail(&self) -> String {
        let skip = self.len().saturating_sub(4);
        self.0.chars().skip(skip).collect()
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Secret(<redacted>)")
    }
}

/// Credential configuration for one service
///
/// Built once at startup and passed explicitly to the validator.
#[derive(Debug, Clone)]
pub struct CredentialConfig {
    /// Target service
    pub service: Service,
    /// Handle or username (Bluesky only)
    pub handle: Option<String>,
    /// The credential; `None` when the variable is unset or blank
    pub secret: Option<Secret>,
    /// Service base URL
    pub base_url: String,
    /// How to treat a failed permission probe
    pub permission_policy: PermissionPolicy,
}

impl CredentialConfig {
    /// Build a configuration from an arbitrary variable lookup
    ///
    /// A missing secret is not an error here so the validator can report it;
    /// malformed optional values (base URL, policy flag) are.
    pub fn from_lookup<F>(service: Service, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let keys = env_keys(service);
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let secret = get(keys.secret).map(Secret::new);
        let handle = keys
            .handle
            .map(|(name, default)| get(name).unwrap_or_else(|| default.to_string()));

        let (url_var, url_default) = keys.base_url;
        let base_url = get(url_var).unwrap_or_else(|| url_default.to_string());
        validate_base_url(url_var, &base_url)?;

        let permission_policy = match get(STRICT_PERMISSIONS_VAR) {
            Some(raw) => parse_policy(&raw)?,
            None => PermissionPolicy::default(),
        };

        Ok(Self {
            service,
            handle,
            secret,
            base_url,
            permission_policy,
        })
    }

    /// Build a configuration from the process environment and a dotenv file
    ///
    /// Variables already set in the process take precedence over the file.
    /// A missing file is not an error.
    pub fn from_env(service: Service, env_file: Option<&Path>) -> Result<Self> {
        let file_vars = match env_file {
            Some(path) => read_env_file(path)?,
            None => HashMap::new(),
        };

        Self::from_lookup(service, |name| {
            std::env::var(name)
                .ok()
                .or_else(|| file_vars.get(name).cloned())
        })
    }

    /// The secret, or a configuration error naming the variable to set
    pub fn require_secret(&self) -> Result<&Secret> {
        self.secret
            .as_ref()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| Error::Config(missing_secret_message(self.service)))
    }

    /// Builder-style policy override (used by `--strict`)
    #[must_use]
    pub const fn with_permission_policy(mut self, policy: PermissionPolicy) -> Self {
        self.permission_policy = policy;
        self
    }
}

/// Load configuration and fail fast when the secret is missing
pub fn load(service: Service, env_file: Option<&Path>) -> Result<CredentialConfig> {
    let config = CredentialConfig::from_env(service, env_file)?;
    config.require_secret()?;
    Ok(config)
}

/// Message reported when the secret variable is unset
pub fn missing_secret_message(service: Service) -> String {
    let var = env_keys(service).secret;
    let what = match service {
        Service::GitHub => "GitHub API key",
        Service::GitLab => "GitLab API key",
        Service::Bluesky => "Bluesky app password",
    };
    format!(
        "{var} not found in environment variables. Please create a .env file with your {what}."
    )
}

/// Read `KEY=value` pairs from a dotenv file without touching the environment
pub fn read_env_file(path: &Path) -> Result<HashMap<String, String>> {
    let iter = match dotenvy::from_path_iter(path) {
        Ok(iter) => iter,
        Err(e) if e.not_found() => {
            debug!(path = %path.display(), "no env file found");
            return Ok(HashMap::new());
        }
        Err(e) => {
            return Err(Error::Config(format!(
                "failed to read {}: {e}",
                path.display()
            )));
        }
    };

    let mut vars = HashMap::new();
    for item in iter {
        let (key, value) = item
            .map_err(|e| Error::Config(format!("failed to parse {}: {e}", path.display())))?;
        vars.insert(key, value);
    }
    debug!(path = %path.display(), count = vars.len(), "loaded env file");
    Ok(vars)
}

fn validate_base_url(var: &str, raw: &str) -> Result<()> {
    let url = Url::parse(raw)
        .map_err(|e| Error::Config(format!("{var} is not a valid URL ({raw}): {e}")))?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(Error::Config(format!(
            "{var} must be an http(s) URL, got {raw}"
        )));
    }
    Ok(())
}

fn parse_policy(raw: &str) -> Result<PermissionPolicy> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(PermissionPolicy::Strict),
        "0" | "false" | "no" | "off" => Ok(PermissionPolicy::Lenient),
        _ => Err(Error::Config(format!(
            "{STRICT_PERMISSIONS_VAR} must be a boolean (true/false), got {raw}"
        ))),
    }
}
