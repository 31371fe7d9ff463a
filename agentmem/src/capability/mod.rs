//! Capability registry: which tools need user authorization, and the
//! authorization lifecycle for them.
//!
//! The turn processor asks `requires_auth` when routing a turn and drives
//! `authorize` → `wait_for_auth` → `is_authorized` for each pending tool.

mod static_registry;

use async_trait::async_trait;
use thiserror::Error;

pub use static_registry::StaticCapabilityRegistry;

/// Status of an authorization request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStatus {
    /// The user still has to visit the URL.
    Pending,
    /// Already granted; no wait needed.
    Completed,
    /// Rejected by the user or the provider.
    Failed,
}

/// Handle returned by [`CapabilityRegistry::authorize`].
#[derive(Debug, Clone, PartialEq)]
pub struct AuthHandle {
    pub id: String,
    pub status: AuthStatus,
    /// Where the user grants access. Absent when the status is `Completed`.
    pub url: Option<String>,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("unknown authorization id: {0}")]
    UnknownAuthorization(String),
    #[error("authorization provider error: {0}")]
    Provider(String),
}

/// External service that knows which tools require authorization and manages it.
#[async_trait]
pub trait CapabilityRegistry: Send + Sync {
    /// Pure lookup, no side effect.
    fn requires_auth(&self, tool_name: &str) -> bool;

    /// Starts (or reuses) an authorization for `tool_name` on behalf of `user_id`.
    /// May return an already-completed handle when access was granted before.
    async fn authorize(&self, tool_name: &str, user_id: &str) -> Result<AuthHandle, AuthError>;

    /// Suspends until the provider signals that the authorization finished
    /// (granted or not). Callers bound this with their own timeout.
    async fn wait_for_auth(&self, auth_id: &str) -> Result<(), AuthError>;

    /// Final check after waiting.
    async fn is_authorized(&self, auth_id: &str) -> Result<bool, AuthError>;
}
