//! Shared test utilities

#![allow(dead_code)]

mod mock_client;

pub use mock_client::{CallLog, MockCredentialClient};

use cred_check::config::CredentialConfig;
use cred_check::error::ClientError;
use cred_check::types::Service;
use std::collections::HashMap;

/// Build a configuration from literal variable pairs
pub fn config_for(service: Service, vars: &[(&str, &str)]) -> CredentialConfig {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    CredentialConfig::from_lookup(service, |name| vars.get(name).cloned())
        .expect("test config should parse")
}

/// GitHub configuration with an optional token
pub fn github_config(token: Option<&str>) -> CredentialConfig {
    match token {
        Some(token) => config_for(Service::GitHub, &[("GITHUB_API_KEY", token)]),
        None => config_for(Service::GitHub, &[]),
    }
}

/// Status error helper
pub fn status(code: u16, message: &str) -> ClientError {
    ClientError::Status {
        status: code,
        message: message.to_string(),
    }
}
