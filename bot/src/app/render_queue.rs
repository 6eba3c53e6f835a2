//! Per-tournament render queue
//!
//! Serializes render jobs per tournament key and coalesces bursts: while
//! a job runs, at most one follow-up is kept pending and any further
//! trigger is dropped, since the pending run will pick up all
//! intermediate state changes anyway. Jobs for different tournaments run
//! independently.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::entities::TournamentId;
use crate::error::AppError;

/// The work a render job performs; implemented by the view sync service.
#[async_trait]
pub trait RenderExecutor: Send + Sync {
    async fn execute(&self, id: TournamentId) -> Result<(), AppError>;
}

#[async_trait]
impl<TR, PR, MG> RenderExecutor for super::sync::ViewSyncService<TR, PR, MG>
where
    TR: crate::domain::ports::TournamentRepository,
    PR: crate::domain::ports::ParticipantRepository,
    MG: crate::domain::ports::MessageGateway,
{
    async fn execute(&self, id: TournamentId) -> Result<(), AppError> {
        self.render_pass(id).await
    }
}

#[derive(Default)]
struct KeyState {
    running: bool,
    pending: usize,
}

/// Queue of render jobs, keyed by tournament
pub struct RenderQueue {
    executor: Arc<dyn RenderExecutor>,
    states: Arc<Mutex<HashMap<TournamentId, KeyState>>>,
    /// Maximum pending jobs per key beyond the running one
    backlog: usize,
}

impl RenderQueue {
    pub fn new(executor: Arc<dyn RenderExecutor>) -> Arc<Self> {
        Arc::new(Self {
            executor,
            states: Arc::new(Mutex::new(HashMap::new())),
            backlog: 1,
        })
    }

    /// Enqueue a render job for a tournament. Starts immediately when the
    /// key is idle; otherwise the job waits, or is dropped when the
    /// backlog for the key is already full.
    pub async fn enqueue(&self, id: TournamentId) {
        {
            let mut states = self.states.lock().await;
            let state = states.entry(id).or_default();
            if state.running {
                if state.pending >= self.backlog {
                    tracing::trace!(%id, "render backlog full, dropping trigger");
                } else {
                    state.pending += 1;
                }
                return;
            }
            state.running = true;
        }
        let executor = self.executor.clone();
        let states = self.states.clone();
        tokio::spawn(async move {
            Self::drive(executor, states, id).await;
        });
    }

    /// Run jobs for one key until the backlog drains. A failing job is
    /// logged and discarded; the next trigger schedules a fresh attempt.
    async fn drive(
        executor: Arc<dyn RenderExecutor>,
        states: Arc<Mutex<HashMap<TournamentId, KeyState>>>,
        id: TournamentId,
    ) {
        loop {
            if let Err(e) = executor.execute(id).await {
                tracing::error!(%id, error = %e, "render job failed, discarding");
            }
            let mut guard = states.lock().await;
            match guard.get_mut(&id) {
                Some(state) if state.pending > 0 => {
                    state.pending -= 1;
                }
                _ => {
                    guard.remove(&id);
                    return;
                }
            }
        }
    }

    /// Whether a job is currently running or pending for the key.
    pub async fn is_busy(&self, id: &TournamentId) -> bool {
        self.states.lock().await.contains_key(id)
    }
}
