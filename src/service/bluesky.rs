//! Bluesky client implementation (AT Protocol XRPC over reqwest)

use crate::error::ClientError;
use crate::service::{
    ClientResult, CredentialClient, DEFAULT_TIMEOUT_SECS, USER_AGENT, join_url,
    not_authenticated, status_error,
};
use crate::types::{Identity, PermissionReport, PostRef, Service};
use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Collection NSID for feed posts
const POST_COLLECTION: &str = "app.bsky.feed.post";

#[derive(Serialize)]
struct CreateSessionPayload<'a> {
    identifier: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Session {
    access_jwt: String,
    did: String,
    handle: String,
    email: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Profile {
    did: String,
    handle: String,
    display_name: Option<String>,
    description: Option<String>,
    followers_count: Option<u64>,
    follows_count: Option<u64>,
    posts_count: Option<u64>,
}

impl From<Profile> for Identity {
    fn from(profile: Profile) -> Self {
        let mut identity =
            Self::new(profile.handle, profile.did).with_display_name(profile.display_name);
        if let Some(description) = profile.description.filter(|d| !d.is_empty()) {
            identity = identity.with_fact("Description", description);
        }
        for (label, count) in [
            ("Followers", profile.followers_count),
            ("Following", profile.follows_count),
            ("Posts", profile.posts_count),
        ] {
            if let Some(count) = count {
                identity = identity.with_fact(label, count);
            }
        }
        identity
    }
}

#[derive(Deserialize)]
struct Timeline {
    #[serde(default)]
    feed: Vec<serde_json::Value>,
}

#[derive(Serialize)]
struct CreateRecordPayload<'a> {
    repo: &'a str,
    collection: &'a str,
    record: PostRecord<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PostRecord<'a> {
    #[serde(rename = "$type")]
    record_type: &'a str,
    text: &'a str,
    created_at: String,
}

/// Bluesky client speaking XRPC with reqwest
pub struct BlueskyClient {
    client: Client,
    service_url: String,
    session: Option<Session>,
}

impl BlueskyClient {
    /// Create a client for the given PDS / entryway URL
    pub fn new(service_url: &str) -> ClientResult<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| ClientError::other("ClientBuildError", e.to_string()))?;

        Ok(Self {
            client,
            service_url: service_url.to_string(),
            session: None,
        })
    }

    fn xrpc_url(&self, nsid: &str) -> String {
        join_url(&self.service_url, &format!("/xrpc/{nsid}"))
    }

    fn session(&self) -> ClientResult<&Session> {
        self.session
            .as_ref()
            .ok_or_else(|| not_authenticated(Service::Bluesky))
    }

    async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> ClientResult<T> {
        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(status_error(response).await);
        }
        Ok(response.json().await?)
    }

    async fn query<T: DeserializeOwned>(&self, nsid: &str, params: &[(&str, &str)]) -> ClientResult<T> {
        let session = self.session()?;
        Self::send_json(
            self.client
                .get(self.xrpc_url(nsid))
                .bearer_auth(&session.access_jwt)
                .query(params),
        )
        .await
    }

    /// Publish a text post as the authenticated account
    pub async fn create_post(&self, text: &str) -> ClientResult<PostRef> {
        #[derive(Deserialize)]
        struct CreateRecordOutput {
            uri: String,
            cid: String,
        }

        let session = self.session()?;
        debug!(did = %session.did, "creating post");

        let payload = CreateRecordPayload {
            repo: &session.did,
            collection: POST_COLLECTION,
            record: PostRecord {
                record_type: POST_COLLECTION,
                text,
                created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            },
        };

        let output: CreateRecordOutput = Self::send_json(
            self.client
                .post(self.xrpc_url("com.atproto.repo.createRecord"))
                .bearer_auth(&session.access_jwt)
                .json(&payload),
        )
        .await?;

        debug!(uri = %output.uri, "created post");
        Ok(PostRef {
            uri: output.uri,
            cid: output.cid,
        })
    }
}

#[async_trait]
impl CredentialClient for BlueskyClient {
    fn service(&self) -> Service {
        Service::Bluesky
    }

    async fn authenticate(&mut self, handle: Option<&str>, secret: &str) -> ClientResult<Identity> {
        let identifier = handle.ok_or_else(|| {
            ClientError::other("MissingHandle", "Bluesky login requires a handle")
        })?;
        debug!(identifier, service = %self.service_url, "creating Bluesky session");

        let session: Session = Self::send_json(
            self.client
                .post(self.xrpc_url("com.atproto.server.createSession"))
                .json(&CreateSessionPayload {
                    identifier,
                    password: secret,
                }),
        )
        .await?;

        let identity = Identity::new(session.handle.clone(), session.did.clone())
            .with_email(session.email.clone());
        debug!(handle = %identity.handle, "created Bluesky session");
        self.session = Some(session);
        Ok(identity)
    }

    async fn get_identity(&self) -> ClientResult<Identity> {
        let actor = self.session()?.handle.clone();
        let profile: Profile = self
            .query("app.bsky.actor.getProfile", &[("actor", actor.as_str())])
            .await?;
        Ok(profile.into())
    }

    async fn probe_read_permission(&self) -> ClientResult<PermissionReport> {
        debug!("reading timeline");
        let timeline: Timeline = self
            .query("app.bsky.feed.getTimeline", &[("limit", "1")])
            .await?;
        debug!(count = timeline.feed.len(), "read timeline");

        Ok(PermissionReport {
            granted: vec!["Can read timeline (read permissions working)".to_string()],
            notes: Vec::new(),
        })
    }
}
