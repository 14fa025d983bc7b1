//! Validate command - check one service's credentials

use crate::cli::print_line;
use crate::cli::style::spinner_style;
use cred_check::config::CredentialConfig;
use cred_check::error::Error;
use cred_check::report::Report;
use cred_check::service::create_client;
use cred_check::types::{PermissionPolicy, Service};
use cred_check::validate::{ValidationResult, config_remediation, validate};
use indicatif::ProgressBar;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Run validation for `service` and print the report
///
/// Returns the process exit code; every failure is reported, not raised.
pub async fn run_validate(service: Service, env_file: Option<&Path>, strict: bool) -> u8 {
    let config = match CredentialConfig::from_env(service, env_file) {
        Ok(config) if strict => config.with_permission_policy(PermissionPolicy::Strict),
        Ok(config) => config,
        Err(e) => {
            let message = match e {
                Error::Config(message) => message,
                other => other.to_string(),
            };
            let result = ValidationResult::ConfigurationError {
                message,
                remediation: config_remediation(service),
            };
            print_report(&Report::new(service, None, &result));
            return result.exit_code();
        }
    };

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(spinner_style());
    spinner.set_message(format!("Validating {service} credentials..."));
    spinner.enable_steady_tick(Duration::from_millis(80));

    let result = validate(&config, create_client).await;

    spinner.finish_and_clear();
    debug!(%service, outcome = result.name(), "validation finished");

    print_report(&Report::new(service, Some(&config), &result));
    result.exit_code()
}

fn print_report(report: &Report) {
    for line in report.lines() {
        print_line(line);
    }
}
