use super::context::BoothContext;
use super::usecase::BoothSession;
use artbooth_core::error::Result;
use artbooth_core::session::SessionSnapshot;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory registry of booth sessions.
///
/// Sessions share one `BoothContext` and never share mutable state. Nothing
/// expires on its own: the host drops a visitor's session with `finish` once
/// the visit is over, or with `remove` when it is abandoned mid-run.
pub struct SessionRegistry {
    context: Arc<BoothContext>,
    sessions: Arc<RwLock<HashMap<String, Arc<BoothSession>>>>,
}

impl SessionRegistry {
    pub fn new(context: Arc<BoothContext>) -> Self {
        Self {
            context,
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Creates a session with a fresh id and registers it.
    pub async fn create(&self) -> Arc<BoothSession> {
        let id = Uuid::new_v4().to_string();
        let session = Arc::new(BoothSession::new(id.clone(), Arc::clone(&self.context)));

        let mut sessions = self.sessions.write().await;
        sessions.insert(id.clone(), Arc::clone(&session));
        tracing::debug!("[SessionRegistry] Created session {}", id);

        session
    }

    /// Gets a session by id.
    pub async fn get(&self, session_id: &str) -> Option<Arc<BoothSession>> {
        let sessions = self.sessions.read().await;
        sessions.get(session_id).cloned()
    }

    /// Removes a session; an in-flight run finishes against the detached session.
    pub async fn remove(&self, session_id: &str) -> Option<Arc<BoothSession>> {
        let mut sessions = self.sessions.write().await;
        sessions.remove(session_id)
    }

    /// Starts the session over and drops it from the registry.
    ///
    /// Only a finished (`Complete` or `Failed`) session can be finished; a
    /// session with a run in progress stays registered and the transition
    /// error is returned.
    pub async fn finish(&self, session_id: &str) -> Result<Option<SessionSnapshot>> {
        let Some(session) = self.get(session_id).await else {
            return Ok(None);
        };

        let snapshot = session.reset().await?;
        self.remove(session_id).await;
        tracing::debug!("[SessionRegistry] Finished session {}", session_id);

        Ok(Some(snapshot))
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}
