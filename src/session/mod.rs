//! Authentication state
//!
//! The token and the user record are always written and cleared together.
//! Role checks here drive navigation only; the server enforces access.

pub mod store;

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{decode, DecodingKey, Validation};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::error::Result;
use crate::models::{LoginResponse, Role, User};

pub use store::{FileSessionStore, MemorySessionStore, SessionStore, StoredSession};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    LoggedIn { username: String, role: Role },
    LoggedOut,
    /// The server answered 401; the session was cleared and the UI must go to login.
    Expired,
}

/// Unverified claims read from the bearer token, for display only.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenClaims {
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub exp: Option<i64>,
    #[serde(default)]
    pub iat: Option<i64>,
}

impl TokenClaims {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|exp| Utc.timestamp_opt(exp, 0).single())
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        matches!(self.expires_at(), Some(exp) if exp <= now)
    }
}

pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    current: RwLock<Option<StoredSession>>,
    events: broadcast::Sender<SessionEvent>,
    // Keeps the channel open so sends never fail for lack of subscribers.
    _events_rx: broadcast::Receiver<SessionEvent>,
}

impl SessionManager {
    /// Restore any persisted session from `store`.
    pub fn new(store: Arc<dyn SessionStore>) -> Result<Self> {
        let current = store.load()?;
        let (events, _events_rx) = broadcast::channel(16);
        Ok(Self {
            store,
            current: RwLock::new(current),
            events,
            _events_rx,
        })
    }

    pub fn in_memory() -> Self {
        let (events, _events_rx) = broadcast::channel(16);
        Self {
            store: Arc::new(MemorySessionStore::new()),
            current: RwLock::new(None),
            events,
            _events_rx,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub fn establish(&self, login: &LoginResponse) -> Result<User> {
        let session = StoredSession {
            token: login.token.clone(),
            user: login.user(),
        };
        self.store.save(&session)?;
        let user = session.user.clone();
        *self.current.write() = Some(session);

        tracing::info!(username = %user.username, role = %user.role, "Session established");
        let _ = self.events.send(SessionEvent::LoggedIn {
            username: user.username.clone(),
            role: user.role,
        });
        Ok(user)
    }

    /// Replace the stored user record, keeping the token.
    pub fn update_user(&self, user: User) -> Result<()> {
        let mut guard = self.current.write();
        if let Some(session) = guard.as_mut() {
            session.user = user;
            self.store.save(session)?;
        }
        Ok(())
    }

    pub fn logout(&self) -> Result<()> {
        self.clear_all()?;
        let _ = self.events.send(SessionEvent::LoggedOut);
        Ok(())
    }

    pub fn expire(&self) -> Result<()> {
        self.clear_all()?;
        tracing::warn!("Session rejected by server, cleared local credentials");
        let _ = self.events.send(SessionEvent::Expired);
        Ok(())
    }

    fn clear_all(&self) -> Result<()> {
        *self.current.write() = None;
        self.store.clear()
    }

    pub fn token(&self) -> Option<String> {
        self.current.read().as_ref().map(|s| s.token.clone())
    }

    pub fn current_user(&self) -> Option<User> {
        self.current.read().as_ref().map(|s| s.user.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.read().is_some()
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.current
            .read()
            .as_ref()
            .map(|s| s.user.has_role(role))
            .unwrap_or(false)
    }

    pub fn is_inventory_team(&self) -> bool {
        self.has_role(Role::InvTeam)
    }

    pub fn is_delivery_team(&self) -> bool {
        self.has_role(Role::DlTeam)
    }

    pub fn token_claims(&self) -> Option<TokenClaims> {
        self.token().and_then(|t| decode_claims(&t))
    }
}

/// Read the payload of a JWT without checking its signature.
pub fn decode_claims(token: &str) -> Option<TokenClaims> {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    decode::<TokenClaims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map(|data| data.claims)
        .ok()
}
