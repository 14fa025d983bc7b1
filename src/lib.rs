//! cred-check: validate API credentials for GitHub, GitLab and Bluesky
//!
//! Each run loads configuration from the environment, authenticates once
//! against the service and probes a read permission, then reports the
//! outcome as a [`validate::ValidationResult`].

pub mod config;
pub mod error;
pub mod report;
pub mod service;
pub mod types;
pub mod validate;
