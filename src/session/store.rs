//! Process-wide registry of sessions.

use super::state::Session;
use crate::user::domain::UserId;
use crate::user::ports::IdentityResolver;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};

/// Registry of one session per identity, created lazily and never evicted.
///
/// Each session sits behind its own mutex so events of one identity are
/// serialized while events of different identities run in parallel.
pub struct SessionStore<I>
where
    I: IdentityResolver,
{
    resolver: Arc<I>,
    sessions: RwLock<HashMap<UserId, Arc<Mutex<Session>>>>,
}

impl<I> SessionStore<I>
where
    I: IdentityResolver,
{
    /// Creates an empty store.
    #[must_use]
    pub fn new(resolver: Arc<I>) -> Self {
        Self {
            resolver,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the session of `identity`, creating it on first contact.
    ///
    /// Creation performs a best-effort identity lookup; a failed lookup
    /// yields a session without a user snapshot.
    pub async fn get_or_create(&self, identity: UserId) -> Arc<Mutex<Session>> {
        {
            let sessions = self.sessions.read().await;
            if let Some(session) = sessions.get(&identity) {
                return Arc::clone(session);
            }
        }

        let user = match self.resolver.resolve(identity).await {
            Ok(resolved) => resolved.into_user(),
            Err(err) => {
                warn!(identity = %identity, error = %err, "identity lookup failed");
                None
            }
        };

        let mut sessions = self.sessions.write().await;
        if let Some(session) = sessions.get(&identity) {
            return Arc::clone(session);
        }
        let session = Arc::new(Mutex::new(Session::new(identity, user)));
        sessions.insert(identity, Arc::clone(&session));
        debug!(identity = %identity, "session created");
        session
    }

    /// Returns the number of sessions created so far.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Returns `true` before the first session is created.
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
