//! Report formatting - pure conversion from a validation result to lines
//!
//! No printing happens here; the CLI styles each line by its level.

use crate::config::CredentialConfig;
use crate::types::{Identity, Service};
use crate::validate::{Phase, Remediation, ValidationResult, format_warnings};
use std::fmt;

/// Width of the banner rule
const RULE_WIDTH: usize = 60;

/// Kind of report line, used for prefixes and styling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Horizontal rule
    Rule,
    /// Report title
    Title,
    /// Phase heading, e.g. `[2/3] Testing GitHub connection...`
    Phase,
    /// Passed check
    Ok,
    /// Non-fatal problem
    Warning,
    /// Fatal problem
    Error,
    /// Lead-in for remediation steps
    Advice,
    /// Numbered remediation step
    Step,
    /// Final verdict, valid
    Success,
    /// Final verdict, invalid
    Failure,
}

/// One line of a report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// Line kind
    pub level: Level,
    /// Text without prefix
    pub text: String,
}

/// Human-readable validation report
#[derive(Debug, Clone, Default)]
pub struct Report {
    lines: Vec<Line>,
}

impl Report {
    /// Build the report for one validation run
    ///
    /// `config` is `None` when configuration could not even be parsed.
    pub fn new(service: Service, config: Option<&CredentialConfig>, result: &ValidationResult) -> Self {
        let mut report = Self::default();
        let title = match service {
            Service::GitHub | Service::GitLab => format!("{service} API Key Validation"),
            Service::Bluesky => format!("{service} API Credentials Validation"),
        };
        report.rule();
        report.push(Level::Title, title);
        report.rule();

        report.phase(Phase::Configuration, "Checking configuration...".to_string());
        if let ValidationResult::ConfigurationError {
            message,
            remediation,
        } = result
        {
            report.push(Level::Error, format!("Configuration error: {message}"));
            report.remediation(remediation);
            report.verdict(service, result);
            return report;
        }
        if let Some(config) = config {
            report.config_summary(config, result);
        }

        report.phase(Phase::Connection, format!("Testing {service} connection..."));
        if result.phase() == Phase::Connection {
            report.lines.extend(failure_lines(result));
            report.verdict(service, result);
            return report;
        }
        if let Some(identity) = result.identity() {
            report.identity(service, identity);
        }

        report.phase(Phase::Permission, "Testing API permissions...".to_string());
        match result {
            ValidationResult::Success { permissions, .. } => {
                for granted in &permissions.granted {
                    report.push(Level::Ok, granted.clone());
                }
                for note in &permissions.notes {
                    report.push(Level::Ok, note.clone());
                }
            }
            ValidationResult::PartialSuccess {
                permission_warning,
                remediation,
                ..
            } => {
                report.push(Level::Warning, permission_warning.clone());
                report.remediation(remediation);
            }
            ValidationResult::InsufficientPermissions {
                message,
                remediation,
                ..
            } => {
                report.push(Level::Error, message.clone());
                report.remediation(remediation);
            }
            _ => {}
        }
        report.verdict(service, result);
        report
    }

    /// All lines in order
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    fn push(&mut self, level: Level, text: String) {
        self.lines.push(Line { level, text });
    }

    fn rule(&mut self) {
        self.push(Level::Rule, "=".repeat(RULE_WIDTH));
    }

    fn phase(&mut self, phase: Phase, text: String) {
        self.push(Level::Phase, format!("[{}/3] {text}", phase.step()));
    }

    fn config_summary(&mut self, config: &CredentialConfig, result: &ValidationResult) {
        self.push(Level::Ok, "Configuration loaded".to_string());
        let secret = config.secret.as_ref();
        match config.service {
            Service::GitHub => {
                self.push(Level::Ok, format!("GitHub API URL: {}", config.base_url));
                if let Some(secret) = secret {
                    self.push(Level::Ok, format!("API Key: {}", secret.masked()));
                }
            }
            Service::GitLab => {
                self.push(Level::Ok, format!("GitLab URL: {}", config.base_url));
                if let Some(secret) = secret {
                    self.push(Level::Ok, format!("API Key: {}", secret.masked()));
                }
            }
            Service::Bluesky => {
                if let Some(handle) = &config.handle {
                    self.push(Level::Ok, format!("Bluesky Handle: {handle}"));
                }
                self.push(Level::Ok, format!("Bluesky Service: {}", config.base_url));
                if let Some(secret) = secret {
                    self.push(Level::Ok, format!("App Password: {}", secret.masked_password()));
                }
            }
        }
        // Fatal results do not carry warnings, so recompute them from config
        let warnings = result
            .warnings()
            .map_or_else(|| format_warnings(config), <[String]>::to_vec);
        for warning in warnings {
            self.push(Level::Warning, warning);
        }
    }

    fn identity(&mut self, service: Service, identity: &Identity) {
        self.push(Level::Ok, format!("Successfully connected to {service}"));
        let display_name = identity.display_name.as_deref().unwrap_or("N/A");
        match service {
            Service::Bluesky => {
                self.push(Level::Ok, format!("Authenticated as: {}", identity.handle));
                self.push(Level::Ok, format!("DID: {}", identity.id));
                self.push(Level::Ok, format!("Display Name: {display_name}"));
            }
            Service::GitHub | Service::GitLab => {
                self.push(
                    Level::Ok,
                    format!("Authenticated as: {} ({display_name})", identity.handle),
                );
                self.push(Level::Ok, format!("User ID: {}", identity.id));
                self.push(
                    Level::Ok,
                    format!(
                        "Email: {}",
                        identity.email.as_deref().unwrap_or("N/A (private)")
                    ),
                );
            }
        }
        for (label, value) in &identity.facts {
            self.push(Level::Ok, format!("{label}: {value}"));
        }
    }

    fn remediation(&mut self, remediation: &Remediation) {
        self.lines.extend(remediation_lines(remediation));
    }

    fn verdict(&mut self, service: Service, result: &ValidationResult) {
        let noun = service.credential_noun();
        let verb = if noun.ends_with('s') { "are" } else { "is" };
        self.rule();
        match result {
            ValidationResult::Success { .. } => self.push(
                Level::Success,
                format!("Validation successful! Your {service} {noun} {verb} working."),
            ),
            ValidationResult::PartialSuccess { .. } => self.push(
                Level::Success,
                format!(
                    "Validation successful with warnings. Your {service} {noun} {verb} working \
                     but permissions are limited."
                ),
            ),
            other => self.push(
                Level::Failure,
                format!("Validation failed ({}).", other.name()),
            ),
        }
        self.rule();
    }
}

/// Lead-in and numbered steps for a remediation
pub fn remediation_lines(remediation: &Remediation) -> Vec<Line> {
    let mut lines = vec![Line {
        level: Level::Advice,
        text: format!("{}:", remediation.heading),
    }];
    lines.extend(remediation.steps.iter().enumerate().map(|(i, step)| Line {
        level: Level::Step,
        text: format!("{}. {step}", i + 1),
    }));
    lines
}

/// Error line plus remediation for a connection-phase failure
///
/// Returns nothing for results that did not fail while connecting.
pub fn failure_lines(result: &ValidationResult) -> Vec<Line> {
    let (message, remediation) = match result {
        ValidationResult::AuthenticationError {
            message,
            remediation,
        }
        | ValidationResult::ConnectionError {
            message,
            remediation,
        } => (message.clone(), Some(remediation)),
        ValidationResult::UnexpectedError {
            kind,
            message,
            remediation,
        } => (
            format!("Unexpected error: {kind}: {message}"),
            remediation.as_ref(),
        ),
        _ => return Vec::new(),
    };

    let mut lines = vec![Line {
        level: Level::Error,
        text: message,
    }];
    if let Some(remediation) = remediation {
        lines.extend(remediation_lines(remediation));
    }
    lines
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.level {
            Level::Rule | Level::Title => write!(f, "{}", self.text),
            Level::Phase => write!(f, "\n{}", self.text),
            Level::Ok => write!(f, "   [OK] {}", self.text),
            Level::Warning => write!(f, "   [WARNING] {}", self.text),
            Level::Error => write!(f, "   [ERROR] {}", self.text),
            Level::Advice => write!(f, "\n   {}", self.text),
            Level::Step => write!(f, "   {}", self.text),
            Level::Success => write!(f, "[SUCCESS] {}", self.text),
            Level::Failure => write!(f, "[FAILED] {}", self.text),
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Secret;
    use crate::types::{PermissionPolicy, PermissionReport};
    use crate::validate::{auth_remediation, config_remediation, permission_remediation};

    fn github_config(secret: Option<&str>) -> CredentialConfig {
        CredentialConfig {
            service: Service::GitHub,
            handle: None,
            secret: secret.map(Secret::new),
            base_url: "https://api.github.com".to_string(),
            permission_policy: PermissionPolicy::Lenient,
        }
    }

    fn alice() -> Identity {
        Identity::new("alice", "42").with_fact("Public Repos", 0)
    }

    #[test]
    fn test_success_report() {
        let config = github_config(Some("ghp_abcdef1234567890"));
        let result = ValidationResult::Success {
            identity: alice(),
            permissions: PermissionReport {
                granted: vec!["Can read repositories (repo scope working)".to_string()],
                notes: vec!["API rate limit: 4999/5000 remaining".to_string()],
            },
            warnings: Vec::new(),
        };
        let text = Report::new(Service::GitHub, Some(&config), &result).to_string();

        assert!(text.contains("GitHub API Key Validation"));
        assert!(text.contains("[1/3] Checking configuration..."));
        assert!(text.contains("API Key: ghp_abcdef...7890"));
        assert!(text.contains("Authenticated as: alice (N/A)"));
        assert!(text.contains("User ID: 42"));
        assert!(text.contains("[3/3] Testing API permissions..."));
        assert!(text.contains("[SUCCESS] Validation successful! Your GitHub API key is working."));
        assert!(!text.contains("1234567890"));
    }

    #[test]
    fn test_configuration_error_stops_after_phase_one() {
        let config = github_config(None);
        let result = ValidationResult::ConfigurationError {
            message: "GITHUB_API_KEY not found".to_string(),
            remediation: config_remediation(Service::GitHub),
        };
        let report = Report::new(Service::GitHub, Some(&config), &result);
        let text = report.to_string();

        assert!(text.contains("[ERROR] Configuration error: GITHUB_API_KEY not found"));
        assert!(text.contains("GITHUB_API_KEY is set in the .env file"));
        assert!(!text.contains("[2/3]"));
        assert_eq!(report.lines().last().map(|l| l.level), Some(Level::Rule));
        assert!(report.lines().iter().any(|l| l.level == Level::Failure));
    }

    #[test]
    fn test_authentication_error_has_no_permission_phase() {
        let config = github_config(Some("bad-token"));
        let result = ValidationResult::AuthenticationError {
            message: "Authentication failed: Invalid API key (HTTP 401: Bad credentials)"
                .to_string(),
            remediation: auth_remediation(Service::GitHub),
        };
        let text = Report::new(Service::GitHub, Some(&config), &result).to_string();

        assert!(text.contains("[WARNING] Token format doesn't match"));
        assert!(text.contains("[2/3] Testing GitHub connection..."));
        assert!(text.contains("Authentication failed"));
        assert!(text.contains("1. Your API key is correct"));
        assert!(!text.contains("[3/3]"));
        assert!(text.contains("[FAILED]"));
    }

    #[test]
    fn test_partial_success_shows_warning_and_succeeds() {
        let config = github_config(Some("ghp_abcdef1234567890"));
        let result = ValidationResult::PartialSuccess {
            identity: alice(),
            permission_warning: "Permission warning: HTTP 403: Resource not accessible".to_string(),
            remediation: permission_remediation(Service::GitHub),
            warnings: Vec::new(),
        };
        let text = Report::new(Service::GitHub, Some(&config), &result).to_string();

        assert!(text.contains("[WARNING] Permission warning"));
        assert!(text.contains("Consider adding: repo, read:user, read:org"));
        assert!(text.contains("[SUCCESS]"));
    }

    #[test]
    fn test_success_report_renders_carried_warnings() {
        // Result warnings win over a recomputation from config
        let config = github_config(Some("ghp_abcdef1234567890"));
        let result = ValidationResult::Success {
            identity: alice(),
            permissions: PermissionReport::default(),
            warnings: vec!["This looks like a GitLab token".to_string()],
        };
        let report = Report::new(Service::GitHub, Some(&config), &result);

        let warnings: Vec<_> = report
            .lines()
            .iter()
            .filter(|l| l.level == Level::Warning)
            .map(|l| l.text.as_str())
            .collect();
        assert_eq!(warnings, ["This looks like a GitLab token"]);
    }

    #[test]
    fn test_bluesky_report_masks_password_and_labels_did() {
        let config = CredentialConfig {
            service: Service::Bluesky,
            handle: Some("alice.bsky.social".to_string()),
            secret: Some(Secret::new("abcd-efgh-ijkl-mnop")),
            base_url: "https://bsky.social".to_string(),
            permission_policy: PermissionPolicy::Lenient,
        };
        let result = ValidationResult::Success {
            identity: Identity::new("alice.bsky.social", "did:plc:abc")
                .with_display_name(Some("Alice".to_string())),
            permissions: PermissionReport::default(),
            warnings: Vec::new(),
        };
        let text = Report::new(Service::Bluesky, Some(&config), &result).to_string();

        assert!(text.contains("App Password: **********...mnop"));
        assert!(text.contains("Authenticated as: alice.bsky.social\n"));
        assert!(text.contains("DID: did:plc:abc"));
        assert!(text.contains("Display Name: Alice"));
        assert!(!text.contains("Email:"));
        assert!(text.contains("Your Bluesky credentials are working."));
    }
}
