//! Session store.

use async_trait::async_trait;
use jiff::{SignedDuration, Timestamp};
use mockall::automock;
use rustc_hash::FxHashMap;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::sessions::{
    errors::SessionsError,
    records::{Session, SessionKey},
};

/// Default session lifetime.
pub const DEFAULT_SESSION_TTL: SignedDuration = SignedDuration::from_mins(60 * 24 * 14);

/// Process-local session store.
#[derive(Debug)]
pub struct MemorySessionStore {
    sessions: RwLock<FxHashMap<SessionKey, Session>>,
    ttl: SignedDuration,
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_TTL)
    }
}

impl MemorySessionStore {
    #[must_use]
    pub fn new(ttl: SignedDuration) -> Self {
        Self {
            sessions: RwLock::default(),
            ttl,
        }
    }

    /// Build a store whose sessions live for `minutes` after their last save.
    ///
    /// # Errors
    ///
    /// Returns [`SessionsError::InvalidTtl`] when the lifetime does not fit a duration.
    pub fn from_minutes(minutes: u64) -> Result<Self, SessionsError> {
        let seconds = i64::try_from(minutes)
            .ok()
            .and_then(|minutes| minutes.checked_mul(60))
            .ok_or(SessionsError::InvalidTtl(minutes))?;

        Ok(Self::new(SignedDuration::from_secs(seconds)))
    }

    fn expiry(&self, now: Timestamp) -> Result<Timestamp, SessionsError> {
        now.checked_add(self.ttl).map_err(SessionsError::Expiry)
    }

    /// Drop every expired session. Returns how many were removed.
    pub async fn purge_expired(&self) -> usize {
        evict_expired(&mut *self.sessions.write().await, Timestamp::now())
    }
}

fn evict_expired(sessions: &mut FxHashMap<SessionKey, Session>, now: Timestamp) -> usize {
    let before = sessions.len();

    sessions.retain(|_, session| !session.is_expired(now));

    before - sessions.len()
}

/// Clone the live session under `key`, dropping it instead when it has expired.
fn take_live(
    sessions: &mut FxHashMap<SessionKey, Session>,
    key: SessionKey,
    now: Timestamp,
) -> Option<Session> {
    match sessions.get(&key) {
        Some(session) if !session.is_expired(now) => Some(session.clone()),
        Some(_) => {
            sessions.remove(&key);
            debug!(session_key = %key, "discarded expired session");

            None
        }
        None => None,
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self, key: SessionKey) -> Result<Session, SessionsError> {
        let now = Timestamp::now();

        {
            let sessions = self.sessions.read().await;

            if let Some(session) = sessions.get(&key).filter(|session| !session.is_expired(now)) {
                return Ok(session.clone());
            }
        }

        // A save may have landed between the two locks.
        if let Some(session) = take_live(&mut *self.sessions.write().await, key, now) {
            return Ok(session);
        }

        Ok(Session::anonymous(key, self.expiry(now)?))
    }

    async fn save(&self, mut session: Session) -> Result<Session, SessionsError> {
        let now = Timestamp::now();
        session.expires_at = self.expiry(now)?;

        let mut sessions = self.sessions.write().await;
        let evicted = evict_expired(&mut sessions, now);

        if evicted > 0 {
            debug!(evicted, "evicted expired sessions");
        }

        sessions.insert(session.key, session.clone());

        Ok(session)
    }

    async fn delete(&self, key: SessionKey) -> Result<(), SessionsError> {
        self.sessions.write().await.remove(&key);

        Ok(())
    }
}

#[automock]
#[async_trait]
/// Keeps sessions between requests.
pub trait SessionStore: Send + Sync {
    /// Fetch the session stored under `key`.
    ///
    /// An unknown or expired key yields a fresh signed-out session under the same key with
    /// an empty cart. Nothing is stored until the session is saved.
    async fn load(&self, key: SessionKey) -> Result<Session, SessionsError>;

    /// Store the session and push its expiry out by the store's lifetime.
    ///
    /// Implementations may drop other expired sessions while they hold the store.
    async fn save(&self, session: Session) -> Result<Session, SessionsError>;

    /// Forget the session, cart included. Unknown keys are ignored.
    async fn delete(&self, key: SessionKey) -> Result<(), SessionsError>;
}
