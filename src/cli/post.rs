//! Post command - publish a text post to Bluesky

use crate::cli::print_line;
use crate::cli::style::{Stylize, check, cross};
use anstream::println;
use cred_check::config::load;
use cred_check::error::{Error, Result};
use cred_check::report::failure_lines;
use cred_check::service::{BlueskyClient, CredentialClient};
use cred_check::types::Service;
use cred_check::validate::{ValidationResult, classify_connection_error};
use dialoguer::Confirm;
use std::path::Path;

/// Bluesky's post length limit (graphemes; counted here as chars)
const MAX_POST_CHARS: usize = 300;

/// Publish `message` as the configured Bluesky account
///
/// Returns the process exit code.
pub async fn run_post(message: &str, env_file: Option<&Path>, assume_yes: bool) -> Result<u8> {
    let message = message.trim();
    if message.is_empty() {
        println!("{} Post text is empty", cross());
        return Ok(1);
    }
    if message.chars().count() > MAX_POST_CHARS {
        println!(
            "{} Post is longer than {MAX_POST_CHARS} characters",
            cross()
        );
        return Ok(1);
    }

    let config = match load(Service::Bluesky, env_file) {
        Ok(config) => config,
        Err(Error::Config(msg)) => {
            println!("{} Configuration error: {msg}", cross());
            println!("Please ensure BLUESKY_PASSWORD is set in your .env file");
            return Ok(1);
        }
        Err(e) => return Err(e),
    };
    println!("{}", "Configuration validated successfully.".muted());

    let secret = config.require_secret()?;
    let handle = config.handle.clone().unwrap_or_default();
    println!("Connecting to Bluesky as {}...", handle.accent());

    let mut client = match BlueskyClient::new(&config.base_url) {
        Ok(client) => client,
        Err(e) => {
            report_failure(&classify_connection_error(Service::Bluesky, &config.base_url, &e));
            return Ok(1);
        }
    };
    let identity = match client.authenticate(Some(handle.as_str()), secret.expose()).await {
        Ok(identity) => identity,
        Err(e) => {
            report_failure(&classify_connection_error(Service::Bluesky, &config.base_url, &e));
            return Ok(1);
        }
    };
    println!(
        "{} Successfully authenticated as: {}",
        check(),
        identity.handle.accent()
    );

    println!();
    println!("{} '{message}'", "Publishing post:".emphasis());
    if !assume_yes
        && !Confirm::new()
            .with_prompt("Publish this post?")
            .default(false)
            .interact()
            .map_err(|e| Error::Internal(format!("Failed to read confirmation: {e}")))?
    {
        println!("{}", "Aborted".muted());
        return Ok(0);
    }

    match client.create_post(message).await {
        Ok(post) => {
            println!();
            println!("{} Post published successfully!", "[SUCCESS]".success());
            println!("Post URI: {}", post.uri.accent());
            println!("Post CID: {}", post.cid.muted());
            println!(
                "\nView your post at: {}",
                format!("https://bsky.app/profile/{}", identity.handle).accent()
            );
            Ok(0)
        }
        Err(e) => {
            println!("{} Failed to publish post: {e}", cross());
            Ok(1)
        }
    }
}

fn report_failure(result: &ValidationResult) {
    for line in failure_lines(result) {
        print_line(&line);
    }
}
