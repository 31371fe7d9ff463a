use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::Notify;
use tracing::{debug, warn};

use super::{AuthError, AuthHandle, AuthStatus, CapabilityRegistry};

#[derive(Debug, Clone)]
struct HandleState {
    user_id: String,
    tool_name: String,
    rejected: bool,
}

#[derive(Default)]
struct RegistryState {
    grants: HashSet<(String, String)>,
    handles: HashMap<String, HandleState>,
}

impl RegistryState {
    fn is_granted(&self, h: &HandleState) -> bool {
        self.grants.contains(&(h.user_id.clone(), h.tool_name.clone()))
    }
}

/// In-process capability registry with a fixed set of auth-requiring tools.
///
/// Grants are per `(user, tool)`. `grant` and `reject` finish pending
/// authorizations and wake every `wait_for_auth` caller.
///
/// **Interaction**: Used by tests and by the CLI (`AUTH_REQUIRED_TOOLS`); stands in for
/// a hosted authorization provider.
pub struct StaticCapabilityRegistry {
    requires: HashSet<String>,
    url_base: String,
    state: Mutex<RegistryState>,
    notify: Notify,
}

impl StaticCapabilityRegistry {
    pub fn new<I, S>(tools_requiring_auth: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            requires: tools_requiring_auth.into_iter().map(Into::into).collect(),
            url_base: "https://auth.example.com/authorize".to_string(),
            state: Mutex::new(RegistryState::default()),
            notify: Notify::new(),
        }
    }

    /// Base of the URLs handed out for pending authorizations.
    pub fn with_url_base(mut self, url_base: impl Into<String>) -> Self {
        self.url_base = url_base.into();
        self
    }

    /// Grants `tool_name` to `user_id` and completes matching pending authorizations.
    ///
    /// Returns `false` when the registry state is unavailable and nothing changed.
    pub fn grant(&self, user_id: &str, tool_name: &str) -> bool {
        let Ok(mut state) = self.state.lock() else {
            warn!(user_id, tool_name, "grant skipped: registry lock poisoned");
            return false;
        };
        state
            .grants
            .insert((user_id.to_string(), tool_name.to_string()));
        drop(state);
        debug!(user_id, tool_name, "authorization granted");
        self.notify.notify_waiters();
        true
    }

    /// Marks a pending authorization as rejected and wakes its waiters.
    ///
    /// Returns `false` for unknown ids or when the registry state is unavailable.
    pub fn reject(&self, auth_id: &str) -> bool {
        let Ok(mut state) = self.state.lock() else {
            warn!(auth_id, "reject skipped: registry lock poisoned");
            return false;
        };
        let Some(h) = state.handles.get_mut(auth_id) else {
            return false;
        };
        h.rejected = true;
        drop(state);
        debug!(auth_id, "authorization rejected");
        self.notify.notify_waiters();
        true
    }

    /// Ids of authorizations that are neither granted nor rejected.
    pub fn pending_ids(&self) -> Vec<String> {
        self.state
            .lock()
            .map(|s| {
                s.handles
                    .iter()
                    .filter(|(_, h)| !h.rejected && !s.is_granted(h))
                    .map(|(id, _)| id.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn lookup(&self, auth_id: &str) -> Result<(HandleState, bool), AuthError> {
        let state = self
            .state
            .lock()
            .map_err(|e| AuthError::Provider(format!("registry lock poisoned: {}", e)))?;
        let h = state
            .handles
            .get(auth_id)
            .cloned()
            .ok_or_else(|| AuthError::UnknownAuthorization(auth_id.to_string()))?;
        let granted = state.is_granted(&h);
        Ok((h, granted))
    }
}

#[async_trait]
impl CapabilityRegistry for StaticCapabilityRegistry {
    fn requires_auth(&self, tool_name: &str) -> bool {
        self.requires.contains(tool_name)
    }

    async fn authorize(&self, tool_name: &str, user_id: &str) -> Result<AuthHandle, AuthError> {
        let mut state = self
            .state
            .lock()
            .map_err(|e| AuthError::Provider(format!("registry lock poisoned: {}", e)))?;
        let granted = state
            .grants
            .contains(&(user_id.to_string(), tool_name.to_string()));
        let id = uuid::Uuid::new_v4().to_string();
        state.handles.insert(
            id.clone(),
            HandleState {
                user_id: user_id.to_string(),
                tool_name: tool_name.to_string(),
                rejected: false,
            },
        );
        if granted {
            return Ok(AuthHandle {
                id,
                status: AuthStatus::Completed,
                url: None,
            });
        }
        let url = format!("{}?tool={}&id={}", self.url_base, tool_name, id);
        Ok(AuthHandle {
            id,
            status: AuthStatus::Pending,
            url: Some(url),
        })
    }

    async fn wait_for_auth(&self, auth_id: &str) -> Result<(), AuthError> {
        loop {
            let notified = self.notify.notified();
            let (h, granted) = self.lookup(auth_id)?;
            if granted || h.rejected {
                return Ok(());
            }
            notified.await;
        }
    }

    async fn is_authorized(&self, auth_id: &str) -> Result<bool, AuthError> {
        let (h, granted) = self.lookup(auth_id)?;
        Ok(granted && !h.rejected)
    }
}
