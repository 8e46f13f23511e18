use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use thiserror::Error;

use crate::models::CurrentUser;

/// ResolveError
///
/// The failure taxonomy of the session resolver. All three variants are
/// recovered identically by the interceptor (redirect to sign-in); the
/// distinction exists for logging, never for the user.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// No bearer credential was presented with the request.
    #[error("no credential presented")]
    NoCredential,
    /// The identity service did not answer with a success status.
    #[error("identity service unreachable: {0}")]
    IdentityUnreachable(String),
    /// The identity service answered 2xx but the payload is unusable
    /// (malformed body, out-of-contract role, or an empty id).
    #[error("identity payload invalid: {0}")]
    InvalidIdentity(String),
}

// 1. IdentityService Contract
/// IdentityService
///
/// Defines the abstract contract for resolving a bearer credential into an
/// authenticated user snapshot. This trait allows swapping the concrete
/// implementation, from the real HTTP client (HttpIdentityClient) in
/// production to the in-memory Mock (MockIdentityService) during testing,
/// without affecting the interceptor.
#[async_trait]
pub trait IdentityService: Send + Sync {
    /// Resolves the credential into a user snapshot, or a definitive failure.
    ///
    /// Exactly one upstream call per invocation: no caching, no retry. A slow
    /// or failing identity service degrades every protected request equally,
    /// and the interceptor fails closed on every error.
    async fn resolve(&self, token: Option<&str>) -> Result<CurrentUser, ResolveError>;
}

/// IdentityState
///
/// The concrete type used to share the identity service across the application state.
pub type IdentityState = Arc<dyn IdentityService>;

// 2. The Real Implementation (HTTP identity lookup)
/// HttpIdentityClient
///
/// The concrete implementation backed by the external identity endpoint:
/// `GET {base}/api/me` with `Authorization: Bearer <token>`. Any non-success
/// status is a resolver failure; the token is forwarded verbatim and never
/// validated or logged locally.
#[derive(Clone)]
pub struct HttpIdentityClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpIdentityClient {
    /// Constructs the client against the configured identity base URL.
    ///
    /// No request timeout is set beyond the transport default; whether the
    /// lookup should carry a bounded timeout is an open policy question, and
    /// this constructor is where such a value would be applied.
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl IdentityService for HttpIdentityClient {
    async fn resolve(&self, token: Option<&str>) -> Result<CurrentUser, ResolveError> {
        let token = token.ok_or(ResolveError::NoCredential)?;

        // Single attempt, fail closed. Retrying here would multiply identity
        // load for every protected request during an outage.
        let response = self
            .http
            .get(format!("{}/api/me", self.base_url))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| ResolveError::IdentityUnreachable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ResolveError::IdentityUnreachable(format!(
                "identity lookup answered {}",
                response.status()
            )));
        }

        let user = response
            .json::<CurrentUser>()
            .await
            .map_err(|e| ResolveError::InvalidIdentity(e.to_string()))?;

        // A 2xx with no usable id is still an unauthenticated request.
        if user.id.is_empty() {
            return Err(ResolveError::InvalidIdentity("empty user id".to_string()));
        }

        Ok(user)
    }
}

// 3. The Mock Implementation (For Unit Tests)
/// MockIdentityService
///
/// A mock implementation of `IdentityService` used exclusively for testing.
/// It returns a pre-canned snapshot (or failure) without any network call and
/// counts invocations, so tests can assert that unprotected paths never
/// trigger a resolver call at all.
pub struct MockIdentityService {
    user_to_return: Option<CurrentUser>,
    calls: AtomicUsize,
}

impl MockIdentityService {
    /// A mock that successfully resolves every credential to `user`.
    pub fn returning(user: CurrentUser) -> Self {
        Self {
            user_to_return: Some(user),
            calls: AtomicUsize::new(0),
        }
    }

    /// A mock that simulates an unreachable identity service.
    pub fn failing() -> Self {
        Self {
            user_to_return: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of times `resolve` has been invoked on this mock.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityService for MockIdentityService {
    async fn resolve(&self, token: Option<&str>) -> Result<CurrentUser, ResolveError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        token.ok_or(ResolveError::NoCredential)?;

        match &self.user_to_return {
            Some(user) => Ok(user.clone()),
            None => Err(ResolveError::IdentityUnreachable(
                "mock identity failure requested".to_string(),
            )),
        }
    }
}
