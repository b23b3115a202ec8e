use super::machine::{Action, SessionState};
use crate::error::TransitionError;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Shared handle to the session state
///
/// All mutation goes through [`InterviewStore::dispatch`], which applies one
/// action at a time under the write lock. Readers get cloned snapshots.
#[derive(Clone, Default)]
pub struct InterviewStore {
    state: Arc<RwLock<SessionState>>,
}

impl InterviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an action and return the resulting state
    pub async fn dispatch(&self, action: Action) -> Result<SessionState, TransitionError> {
        let name = action.name();
        let mut state = self.state.write().await;
        let from = state.status;

        match state.apply(action) {
            Ok(()) => {
                if from != state.status {
                    info!("{}: {} -> {}", name, from, state.status);
                } else {
                    debug!("{} applied in {}", name, from);
                }
                Ok(state.clone())
            }
            Err(e) => {
                warn!("{} rejected: {}", name, e);
                Err(e)
            }
        }
    }

    /// Snapshot of the current state
    pub async fn snapshot(&self) -> SessionState {
        self.state.read().await.clone()
    }

    /// Read a value from the state without cloning all of it
    pub async fn read<T>(&self, f: impl FnOnce(&SessionState) -> T) -> T {
        let state = self.state.read().await;
        f(&state)
    }
}
