//! Mock credential client for testing

use async_trait::async_trait;
use cred_check::config::CredentialConfig;
use cred_check::error::ClientError;
use cred_check::service::{ClientResult, CredentialClient};
use cred_check::types::{Identity, PermissionReport, Service};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Calls observed across every client built from one mock
#[derive(Debug, Default)]
pub struct CallLog {
    factory: AtomicUsize,
    authenticate: Mutex<Vec<(Option<String>, String)>>,
    get_identity: AtomicUsize,
    probe: AtomicUsize,
}

impl CallLog {
    /// Number of clients constructed
    pub fn factory_calls(&self) -> usize {
        self.factory.load(Ordering::SeqCst)
    }

    /// Arguments of each `authenticate` call
    pub fn authenticate_calls(&self) -> Vec<(Option<String>, String)> {
        self.authenticate.lock().unwrap().clone()
    }

    /// Number of `get_identity` calls
    pub fn get_identity_calls(&self) -> usize {
        self.get_identity.load(Ordering::SeqCst)
    }

    /// Number of `probe_read_permission` calls
    pub fn probe_calls(&self) -> usize {
        self.probe.load(Ordering::SeqCst)
    }

    /// Total calls made to any client operation
    pub fn total_client_calls(&self) -> usize {
        self.authenticate_calls().len() + self.get_identity_calls() + self.probe_calls()
    }
}

/// Deterministic client stub
///
/// Manually implements `CredentialClient` with canned responses and
/// shared call tracking, so the same mock can back several validation runs.
#[derive(Clone)]
pub struct MockCredentialClient {
    service: Service,
    authenticate_response: Result<Identity, ClientError>,
    identity_response: Option<Result<Identity, ClientError>>,
    probe_response: Result<PermissionReport, ClientError>,
    factory_error: Option<ClientError>,
    calls: Arc<CallLog>,
}

impl MockCredentialClient {
    /// A mock where every call succeeds as `alice` (id 42)
    pub fn new(service: Service) -> Self {
        Self {
            service,
            authenticate_response: Ok(Identity::new("alice", "42")),
            identity_response: None,
            probe_response: Ok(PermissionReport {
                granted: vec!["Can read repositories (repo scope working)".to_string()],
                notes: Vec::new(),
            }),
            factory_error: None,
            calls: Arc::new(CallLog::default()),
        }
    }

    // === Response configuration ===

    /// Identity returned by `authenticate` (and `get_identity` by default)
    pub fn with_identity(mut self, identity: Identity) -> Self {
        self.authenticate_response = Ok(identity);
        self
    }

    /// Identity returned by `get_identity` only
    pub fn with_profile(mut self, identity: Identity) -> Self {
        self.identity_response = Some(Ok(identity));
        self
    }

    /// Permission report returned by the probe
    pub fn with_permissions(mut self, report: PermissionReport) -> Self {
        self.probe_response = Ok(report);
        self
    }

    // === Error injection ===

    /// Make client construction fail
    pub fn fail_factory(mut self, err: ClientError) -> Self {
        self.factory_error = Some(err);
        self
    }

    /// Make `authenticate` fail
    pub fn fail_authenticate(mut self, err: ClientError) -> Self {
        self.authenticate_response = Err(err);
        self
    }

    /// Make `get_identity` fail
    pub fn fail_get_identity(mut self, err: ClientError) -> Self {
        self.identity_response = Some(Err(err));
        self
    }

    /// Make `probe_read_permission` fail
    pub fn fail_probe(mut self, err: ClientError) -> Self {
        self.probe_response = Err(err);
        self
    }

    // === Call tracking ===

    /// Shared call log
    pub fn calls(&self) -> Arc<CallLog> {
        Arc::clone(&self.calls)
    }

    /// Client factory handing out a copy of this mock
    pub fn factory(
        &self,
    ) -> impl FnOnce(&CredentialConfig) -> ClientResult<Box<dyn CredentialClient>> + use<> {
        let mock = self.clone();
        move |_config| {
            mock.calls.factory.fetch_add(1, Ordering::SeqCst);
            if let Some(err) = mock.factory_error.clone() {
                return Err(err);
            }
            Ok(Box::new(mock) as Box<dyn CredentialClient>)
        }
    }
}

#[async_trait]
impl CredentialClient for MockCredentialClient {
    fn service(&self) -> Service {
        self.service
    }

    async fn authenticate(&mut self, handle: Option<&str>, secret: &str) -> ClientResult<Identity> {
        self.calls
            .authenticate
            .lock()
            .unwrap()
            .push((handle.map(ToString::to_string), secret.to_string()));
        self.authenticate_response.clone()
    }

    async fn get_identity(&self) -> ClientResult<Identity> {
        self.calls.get_identity.fetch_add(1, Ordering::SeqCst);
        match &self.identity_response {
            Some(response) => response.clone(),
            None => self.authenticate_response.clone(),
        }
    }

    async fn probe_read_permission(&self) -> ClientResult<PermissionReport> {
        self.calls.probe.fetch_add(1, Ordering::SeqCst);
        self.probe_response.clone()
    }
}
