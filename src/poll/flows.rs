//! Ready-made polls for each long-running ForgeML job

use std::sync::Arc;

use super::{PollHandle, PollKey, PollPolicy, PollRegistry, PollResource};
use crate::client::ForgeApi;
use crate::client::models::{
    DatasetAnalysis, LogEntry, ProjectResponse, TrainingLogs, TrainingResponse,
};
use crate::notify::Notifier;

/// Poll project generation until the project is `ready` or `error`
pub fn watch_project<C, O>(
    registry: &PollRegistry,
    client: Arc<C>,
    project_id: &str,
    notifier: Arc<dyn Notifier>,
    observe: O,
) -> Option<PollHandle<ProjectResponse>>
where
    C: ForgeApi + 'static,
    O: FnMut(&ProjectResponse) + Send + 'static,
{
    let id = project_id.to_string();
    registry.start(
        PollKey::new(PollResource::Project, project_id),
        PollPolicy::PROJECT_GENERATION,
        notifier,
        move || {
            let client = client.clone();
            let id = id.clone();
            async move { client.get_project_status_fresh(&id).await }
        },
        observe,
    )
}

/// Poll dataset analysis until it is `completed` or `failed`
pub fn watch_dataset_analysis<C, O>(
    registry: &PollRegistry,
    client: Arc<C>,
    project_id: &str,
    notifier: Arc<dyn Notifier>,
    observe: O,
) -> Option<PollHandle<DatasetAnalysis>>
where
    C: ForgeApi + 'static,
    O: FnMut(&DatasetAnalysis) + Send + 'static,
{
    let id = project_id.to_string();
    registry.start(
        PollKey::new(PollResource::DatasetAnalysis, project_id),
        PollPolicy::DATASET_ANALYSIS,
        notifier,
        move || {
            let client = client.clone();
            let id = id.clone();
            async move { client.get_dataset_analysis_fresh(&id).await }
        },
        observe,
    )
}

/// Poll a training run until it completes, fails or is cancelled
pub fn watch_training<C, O>(
    registry: &PollRegistry,
    client: Arc<C>,
    project_id: &str,
    training_id: &str,
    notifier: Arc<dyn Notifier>,
    observe: O,
) -> Option<PollHandle<TrainingResponse>>
where
    C: ForgeApi + 'static,
    O: FnMut(&TrainingResponse) + Send + 'static,
{
    let project = project_id.to_string();
    let training = training_id.to_string();
    registry.start(
        PollKey::new(PollResource::Training, training_id),
        PollPolicy::TRAINING_STATUS,
        notifier,
        move || {
            let client = client.clone();
            let project = project.clone();
            let training = training.clone();
            async move { client.get_training_status(&project, &training).await }
        },
        observe,
    )
}

/// Tail a training run's log until the run ends.
///
/// Independent of [`watch_training`]: both may run for the same training.
pub fn watch_training_logs<C, O>(
    registry: &PollRegistry,
    client: Arc<C>,
    project_id: &str,
    training_id: &str,
    last_n: usize,
    notifier: Arc<dyn Notifier>,
    observe: O,
) -> Option<PollHandle<TrainingLogs>>
where
    C: ForgeApi + 'static,
    O: FnMut(&TrainingLogs) + Send + 'static,
{
    let project = project_id.to_string();
    let training = training_id.to_string();
    registry.start(
        PollKey::new(PollResource::TrainingLogs, training_id),
        PollPolicy::TRAINING_LOGS,
        notifier,
        move || {
            let client = client.clone();
            let project = project.clone();
            let training = training.clone();
            async move {
                client
                    .get_training_logs(&project, &training, last_n)
                    .await
            }
        },
        observe,
    )
}

/// Tracks which log lines have already been shown while tailing.
///
/// Each fetch returns the last N lines plus the total line count so far;
/// only lines past the previous total are new.
#[derive(Debug, Default, Clone)]
pub struct LogCursor {
    seen: u64,
}

impl LogCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines in `logs` not returned by an earlier call
    pub fn advance<'a>(&mut self, logs: &'a TrainingLogs) -> &'a [LogEntry] {
        let total = logs.total_logs.max(logs.logs.len() as u64);
        if total < self.seen {
            // Log was reset server-side
            self.seen = 0;
        }

        let fresh = (total - self.seen).min(logs.logs.len() as u64) as usize;
        self.seen = total;
        &logs.logs[logs.logs.len() - fresh..]
    }
}
