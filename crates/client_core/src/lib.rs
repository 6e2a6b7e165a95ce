use std::sync::Arc;

use async_trait::async_trait;
use shared::{
    domain::FieldSet,
    protocol::{PredictRequest, PredictionResult},
};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, error, info, warn};

pub mod error;
pub mod form;
pub mod transport;

pub use error::{FailureKind, SubmitError};
pub use form::FormController;
pub use transport::{HttpPredictionService, DEFAULT_REQUEST_TIMEOUT};

const STATE_EVENT_CAPACITY: usize = 32;

#[async_trait]
pub trait PredictionService: Send + Sync {
    async fn predict(&self, request: &PredictRequest) -> Result<PredictionResult, SubmitError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub kind: FailureKind,
    pub message: String,
}

impl From<&SubmitError> for Failure {
    fn from(err: &SubmitError) -> Self {
        Self {
            kind: err.kind(),
            message: err.user_message(),
        }
    }
}

/// View lifecycle of a prediction submission.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    Pending,
    Succeeded(PredictionResult),
    Failed(Failure),
}

impl SubmissionState {
    pub fn is_pending(&self) -> bool {
        matches!(self, SubmissionState::Pending)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SubmissionState::Succeeded(_) | SubmissionState::Failed(_)
        )
    }
}

/// What a call to [`SubmissionCoordinator::submit`] amounted to.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The request ran and the coordinator moved to this terminal state.
    Completed(SubmissionState),
    /// A request was already in flight or the coordinator was disposed.
    Ignored,
    /// The coordinator was disposed while the request was in flight.
    Discarded,
}

struct CoordinatorState {
    state: SubmissionState,
    disposed: bool,
}

/// State cell and event channel, shared with in-flight request tasks.
struct SharedState {
    inner: Mutex<CoordinatorState>,
    events: broadcast::Sender<SubmissionState>,
}

impl SharedState {
    fn transition(&self, inner: &mut CoordinatorState, next: SubmissionState) {
        inner.state = next.clone();
        // No subscribers is fine; the state cell is the source of truth.
        let _ = self.events.send(next);
    }

    async fn complete(&self, next: SubmissionState) -> SubmitOutcome {
        let mut inner = self.inner.lock().await;
        if inner.disposed {
            info!("coordinator disposed while pending; discarding response");
            return SubmitOutcome::Discarded;
        }
        self.transition(&mut inner, next.clone());
        SubmitOutcome::Completed(next)
    }
}

/// Drives one prediction request at a time through the submission lifecycle.
pub struct SubmissionCoordinator {
    service: Arc<dyn PredictionService>,
    shared: Arc<SharedState>,
}

impl SubmissionCoordinator {
    pub fn new(service: Arc<dyn PredictionService>) -> Arc<Self> {
        let (events, _) = broadcast::channel(STATE_EVENT_CAPACITY);
        Arc::new(Self {
            service,
            shared: Arc::new(SharedState {
                inner: Mutex::new(CoordinatorState {
                    state: SubmissionState::Idle,
                    disposed: false,
                }),
                events,
            }),
        })
    }

    pub async fn state(&self) -> SubmissionState {
        self.shared.inner.lock().await.state.clone()
    }

    /// Receives every state the coordinator enters from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<SubmissionState> {
        self.shared.events.subscribe()
    }

    /// Submits `fields` unless a request is already in flight.
    ///
    /// The request and its terminal transition run on a spawned task, so the
    /// state leaves `Pending` even if the returned future is dropped. Concurrent
    /// callers observe `Pending` and return [`SubmitOutcome::Ignored`] without
    /// issuing a second request.
    pub async fn submit(&self, fields: FieldSet) -> SubmitOutcome {
        {
            let mut inner = self.shared.inner.lock().await;
            if inner.disposed {
                debug!("submit after dispose ignored");
                return SubmitOutcome::Ignored;
            }
            if inner.state.is_pending() {
                debug!("prediction already in flight; submit ignored");
                return SubmitOutcome::Ignored;
            }
            self.shared.transition(&mut inner, SubmissionState::Pending);
        }

        info!(genotype_id = %fields.genotype_id, "submitting prediction request");
        let service = Arc::clone(&self.service);
        let shared = Arc::clone(&self.shared);
        let request = tokio::spawn(async move {
            let next = match service.predict(&fields).await {
                Ok(result) => {
                    info!(
                        predicted_yield = result.predicted_yield,
                        "prediction received"
                    );
                    SubmissionState::Succeeded(result)
                }
                Err(err) => {
                    warn!(error = %err, kind = ?err.kind(), "prediction request failed");
                    SubmissionState::Failed(Failure::from(&err))
                }
            };
            shared.complete(next).await
        });

        match request.await {
            Ok(outcome) => outcome,
            Err(err) => {
                error!(error = %err, "prediction task aborted");
                let failure = Failure {
                    kind: FailureKind::Transport,
                    message: "The prediction request was interrupted. Please retry.".to_string(),
                };
                self.shared.complete(SubmissionState::Failed(failure)).await
            }
        }
    }

    /// Returns a terminal state to `Idle`. Returns `false` when the state was not
    /// terminal and nothing changed.
    pub async fn reset(&self) -> bool {
        let mut inner = self.shared.inner.lock().await;
        if inner.disposed || !inner.state.is_terminal() {
            return false;
        }
        self.shared.transition(&mut inner, SubmissionState::Idle);
        true
    }

    /// Tears the coordinator down. Later submits are ignored and an in-flight
    /// response is dropped when it arrives.
    pub async fn dispose(&self) {
        let mut inner = self.shared.inner.lock().await;
        if inner.disposed {
            return;
        }
        inner.disposed = true;
        self.shared.transition(&mut inner, SubmissionState::Idle);
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
