//! Transport ports consumed by the session store and cache consumers.
//!
//! Front-end state never talks HTTP directly; it goes through these traits so
//! tests substitute deterministic doubles and the reqwest implementation in
//! [`crate::http`] stays a thin adapter.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Failures surfaced by gateway implementations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    /// The server rejected the request with a stable error code.
    #[error("request rejected ({code}): {message}")]
    Rejected {
        /// Machine-readable error code from the API envelope.
        code: String,
        /// Human-readable message.
        message: String,
    },
    /// The request never completed (network, timeout).
    #[error("transport failure: {message}")]
    Transport {
        /// Underlying transport error text.
        message: String,
    },
    /// The response arrived but could not be decoded.
    #[error("response undecodable: {message}")]
    Decode {
        /// Decoder error text.
        message: String,
    },
}

impl GatewayError {
    /// Construct a rejection from envelope fields.
    pub fn rejected(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Rejected {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Construct a transport failure.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Construct a decode failure.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }
}

/// The identity as the API presents it, tagged by kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Identity {
    /// Phone-verified consumer identity.
    #[serde(rename = "client")]
    Client {
        /// Stable identifier.
        id: String,
        /// Registered phone number.
        phone: String,
        /// Display name.
        name: String,
    },
    /// Back-office identity.
    #[serde(rename = "admin")]
    Admin {
        /// Stable identifier.
        id: String,
        /// Login name.
        username: String,
        /// Display name.
        name: String,
        /// Role string.
        role: String,
    },
}

impl Identity {
    /// The subject identifier regardless of kind.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Client { id, .. } | Self::Admin { id, .. } => id,
        }
    }
}

/// Which flow a verification code is requested for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodePurpose {
    /// Creating a new account.
    Signup,
    /// Logging into an existing account.
    Login,
}

impl CodePurpose {
    /// Wire form of the purpose.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Signup => "signup",
            Self::Login => "login",
        }
    }
}

/// Port for the authentication endpoints.
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Request a one-time verification code for a phone.
    async fn request_code(&self, phone: &str, purpose: CodePurpose) -> Result<(), GatewayError>;

    /// Verify a phone/code pair against an existing account.
    async fn client_login(&self, phone: &str, code: &str) -> Result<Identity, GatewayError>;

    /// Verify a phone/code pair and create an account.
    async fn client_signup(
        &self,
        phone: &str,
        name: &str,
        code: &str,
    ) -> Result<Identity, GatewayError>;

    /// The authoritative server-side identity check.
    ///
    /// Returns `None` when the server reports no valid session; any cached or
    /// persisted identity is advisory next to this.
    async fn current_user(&self) -> Result<Option<Identity>, GatewayError>;

    /// Clear the server-managed session cookies.
    async fn logout(&self) -> Result<(), GatewayError>;
}

/// Port for the persisted identity cache.
///
/// The presence marker is the client-readable counterpart of the session
/// cookie: routing shells use it for coarse allow/deny decisions before a
/// page loads. It is a presence check only, never a security boundary.
pub trait IdentityStorage: Send + Sync {
    /// Load the persisted identity, if any.
    fn load(&self) -> Option<Identity>;

    /// Persist the identity.
    fn store(&self, identity: &Identity);

    /// Clear the persisted identity and scrub the presence marker.
    fn clear(&self);

    /// Read the advisory presence marker.
    fn presence_marker(&self) -> Option<String>;

    /// Write the advisory presence marker.
    fn set_presence_marker(&self, subject: &str);
}

/// In-memory [`IdentityStorage`] used by tests and non-persistent shells.
#[derive(Default)]
pub struct MemoryStorage {
    state: Mutex<(Option<Identity>, Option<String>)>,
}

impl MemoryStorage {
    /// Create empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, (Option<Identity>, Option<String>)> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl IdentityStorage for MemoryStorage {
    fn load(&self) -> Option<Identity> {
        self.lock().0.clone()
    }

    fn store(&self, identity: &Identity) {
        self.lock().0 = Some(identity.clone());
    }

    fn clear(&self) {
        let mut state = self.lock();
        state.0 = None;
        state.1 = None;
    }

    fn presence_marker(&self) -> Option<String> {
        self.lock().1.clone()
    }

    fn set_presence_marker(&self, subject: &str) {
        self.lock().1 = Some(subject.to_owned());
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    #[test]
    fn identity_decodes_the_tagged_union() {
        let client: Identity = serde_json::from_str(
            r#"{"type":"client","id":"u-1","phone":"01012345678","name":"Jihye","createdAt":"2025-01-01T00:00:00Z"}"#,
        )
        .expect("decode client");
        assert_eq!(client.id(), "u-1");

        let admin: Identity = serde_json::from_str(
            r#"{"type":"admin","id":"a-1","username":"manager","name":"Manager","role":"admin"}"#,
        )
        .expect("decode admin");
        assert!(matches!(admin, Identity::Admin { .. }));
    }

    #[test]
    fn memory_storage_round_trips() {
        let storage = MemoryStorage::new();
        assert!(storage.load().is_none());
        let identity = Identity::Client {
            id: "u-1".into(),
            phone: "01012345678".into(),
            name: "Jihye".into(),
        };
        storage.store(&identity);
        storage.set_presence_marker("u-1");
        assert_eq!(storage.load(), Some(identity));
        assert_eq!(storage.presence_marker().as_deref(), Some("u-1"));

        storage.clear();
        assert!(storage.load().is_none());
        assert!(storage.presence_marker().is_none());
    }
}
