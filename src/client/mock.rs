//! Mock ForgeML API client for testing
//!
//! Provides a mock implementation of the API traits for unit testing
//! without making real API calls.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::api::{DatasetApi, ProjectApi, TrainingApi};
use super::models::{
    DatasetAnalysis, DatasetUpload, ProjectListItem, ProjectResponse, ProjectStatus,
    StartTrainingResponse, SummaryStatus, TrainingConfigOptions, TrainingLogs, TrainingRequest,
    TrainingResponse, TrainingStatus, TrainingSummary, UploadResponse,
};
use crate::error::{ApiError, Result};

/// Ordered responses for one endpoint.
///
/// Steps are consumed front to back; the last step repeats forever.
struct Script<T> {
    steps: VecDeque<std::result::Result<T, ApiError>>,
}

impl<T: Clone> Script<T> {
    fn new() -> Self {
        Self {
            steps: VecDeque::new(),
        }
    }

    fn next_or(&mut self, default: impl FnOnce() -> Result<T>) -> Result<T> {
        let step = if self.steps.len() > 1 {
            self.steps.pop_front()
        } else {
            self.steps.front().cloned()
        };

        match step {
            Some(step) => step.map_err(Into::into),
            None => default(),
        }
    }
}

/// Mock API client for testing.
///
/// Configure expected responses via builder methods, then use in tests.
///
/// # Example
/// ```ignore
/// let mock = MockForgeClient::new()
///     .with_training_statuses(vec![Ok(running), Ok(running), Ok(completed)])
///     .await;
///
/// let status = mock.get_training_status("p1", "t1").await?;
/// ```
pub struct MockForgeClient {
    /// Responses for get_project_status
    project_statuses: Arc<Mutex<Script<ProjectResponse>>>,
    /// Projects to return from list_projects
    projects: Arc<Mutex<Vec<ProjectListItem>>>,
    /// Responses for get_dataset_analysis
    analyses: Arc<Mutex<Script<DatasetAnalysis>>>,
    /// Responses for get_training_status
    training_statuses: Arc<Mutex<Script<TrainingResponse>>>,
    /// Responses for get_training_logs
    training_logs: Arc<Mutex<Script<TrainingLogs>>>,
    /// Responses for get_training_summary
    summaries: Arc<Mutex<Script<TrainingSummary>>>,
    /// Error to return (if any) - consumed on first use
    error: Arc<Mutex<Option<ApiError>>>,
    /// Track number of calls for verification
    call_count: Arc<Mutex<CallCounts>>,
    /// Training requests as received, for assertions
    training_requests: Arc<Mutex<Vec<TrainingRequest>>>,
}

impl Default for MockForgeClient {
    fn default() -> Self {
        Self {
            project_statuses: Arc::new(Mutex::new(Script::new())),
            projects: Arc::new(Mutex::new(Vec::new())),
            analyses: Arc::new(Mutex::new(Script::new())),
            training_statuses: Arc::new(Mutex::new(Script::new())),
            training_logs: Arc::new(Mutex::new(Script::new())),
            summaries: Arc::new(Mutex::new(Script::new())),
            error: Arc::new(Mutex::new(None)),
            call_count: Arc::new(Mutex::new(CallCounts::default())),
            training_requests: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

/// Tracks API call counts for test verification
#[derive(Default, Debug, Clone)]
pub struct CallCounts {
    pub create_project: usize,
    pub get_project_status: usize,
    pub list_projects: usize,
    pub delete_project: usize,
    pub download_project_code: usize,
    pub upload_dataset: usize,
    pub get_dataset_analysis: usize,
    pub start_training: usize,
    pub get_training_status: usize,
    pub get_training_logs: usize,
    pub get_training_summary: usize,
    pub download_model_weights: usize,
    pub get_training_config_options: usize,
}

impl CallCounts {
    /// Get total number of API calls made.
    pub fn total(&self) -> usize {
        self.create_project
            + self.get_project_status
            + self.list_projects
            + self.delete_project
            + self.download_project_code
            + self.upload_dataset
            + self.get_dataset_analysis
            + self.start_training
            + self.get_training_status
            + self.get_training_logs
            + self.get_training_summary
            + self.download_model_weights
            + self.get_training_config_options
    }
}

/// Build a training status response for tests
pub fn training(status: TrainingStatus) -> TrainingResponse {
    TrainingResponse {
        training_id: "t1".to_string(),
        project_id: "p1".to_string(),
        status,
        progress: None,
        current_epoch: None,
        total_epochs: None,
        metrics: Default::default(),
        message: None,
        started_at: None,
        completed_at: None,
    }
}

/// Build a project status response for tests
pub fn project(id: &str, status: ProjectStatus) -> ProjectResponse {
    ProjectResponse {
        id: id.to_string(),
        status,
        message: None,
    }
}

/// Build a training summary for tests
pub fn summary(ai_summary_status: SummaryStatus) -> TrainingSummary {
    TrainingSummary {
        training_id: "t1".to_string(),
        project_id: "p1".to_string(),
        status: TrainingStatus::Completed,
        ai_summary_status,
        ai_summary: None,
        final_metrics: Default::default(),
        duration_seconds: None,
        model_size_bytes: None,
        completed_at: None,
    }
}

/// Build a project listing row for tests
pub fn list_item(id: &str, name: &str) -> ProjectListItem {
    ProjectListItem {
        id: id.to_string(),
        name: name.to_string(),
        status: ProjectStatus::Ready,
        created_at: None,
        updated_at: None,
        has_dataset: false,
        training_count: 0,
    }
}

impl MockForgeClient {
    /// Create a new mock client with default responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Script responses for get_project_status.
    pub async fn with_project_statuses(
        self,
        steps: Vec<std::result::Result<ProjectResponse, ApiError>>,
    ) -> Self {
        self.project_statuses.lock().await.steps = steps.into();
        self
    }

    /// Configure projects to return from list_projects.
    pub async fn with_projects(self, projects: Vec<ProjectListItem>) -> Self {
        *self.projects.lock().await = projects;
        self
    }

    /// Script responses for get_dataset_analysis.
    pub async fn with_analyses(
        self,
        steps: Vec<std::result::Result<DatasetAnalysis, ApiError>>,
    ) -> Self {
        self.analyses.lock().await.steps = steps.into();
        self
    }

    /// Script responses for get_training_status.
    pub async fn with_training_statuses(
        self,
        steps: Vec<std::result::Result<TrainingResponse, ApiError>>,
    ) -> Self {
        self.training_statuses.lock().await.steps = steps.into();
        self
    }

    /// Script responses for get_training_logs.
    pub async fn with_training_logs(
        self,
        steps: Vec<std::result::Result<TrainingLogs, ApiError>>,
    ) -> Self {
        self.training_logs.lock().await.steps = steps.into();
        self
    }

    /// Script responses for get_training_summary.
    pub async fn with_summaries(
        self,
        steps: Vec<std::result::Result<TrainingSummary, ApiError>>,
    ) -> Self {
        self.summaries.lock().await.steps = steps.into();
        self
    }

    /// Configure an error to return on the next API call.
    /// The error is consumed after one use.
    pub async fn with_error(self, error: ApiError) -> Self {
        *self.error.lock().await = Some(error);
        self
    }

    /// Get the call counts for verification in tests.
    pub async fn call_counts(&self) -> CallCounts {
        self.call_count.lock().await.clone()
    }

    /// Training requests received by start_training.
    pub async fn training_requests(&self) -> Vec<TrainingRequest> {
        self.training_requests.lock().await.clone()
    }

    /// Check if there's a pending error and consume it.
    async fn check_error(&self) -> Result<()> {
        let mut error = self.error.lock().await;
        if let Some(e) = error.take() {
            return Err(e.into());
        }
        Ok(())
    }
}

// ============================================================================
// ProjectApi Implementation
// ============================================================================

#[async_trait]
impl ProjectApi for MockForgeClient {
    async fn create_project(&self, _name: &str, _prompt: &str) -> Result<ProjectResponse> {
        self.call_count.lock().await.create_project += 1;
        self.check_error().await?;

        Ok(project("p-new", ProjectStatus::Created))
    }

    async fn get_project_status(&self, project_id: &str) -> Result<ProjectResponse> {
        self.call_count.lock().await.get_project_status += 1;
        self.check_error().await?;

        self.project_statuses
            .lock()
            .await
            .next_or(|| Ok(project(project_id, ProjectStatus::Ready)))
    }

    async fn list_projects(&self, limit: usize, offset: usize) -> Result<Vec<ProjectListItem>> {
        self.call_count.lock().await.list_projects += 1;
        self.check_error().await?;

        let projects = self.projects.lock().await;
        Ok(projects.iter().skip(offset).take(limit).cloned().collect())
    }

    async fn delete_project(&self, project_id: &str) -> Result<ProjectResponse> {
        self.call_count.lock().await.delete_project += 1;
        self.check_error().await?;

        self.projects.lock().await.retain(|p| p.id != project_id);
        Ok(ProjectResponse {
            id: project_id.to_string(),
            status: ProjectStatus::Unknown,
            message: Some("Project deleted".to_string()),
        })
    }

    async fn download_project_code(&self, _project_id: &str) -> Result<Vec<u8>> {
        self.call_count.lock().await.download_project_code += 1;
        self.check_error().await?;

        Ok(b"PK\x03\x04mock-archive".to_vec())
    }
}

// ============================================================================
// DatasetApi Implementation
// ============================================================================

#[async_trait]
impl DatasetApi for MockForgeClient {
    async fn upload_dataset(
        &self,
        _project_id: &str,
        upload: DatasetUpload,
    ) -> Result<UploadResponse> {
        self.call_count.lock().await.upload_dataset += 1;
        self.check_error().await?;

        Ok(UploadResponse {
            id: format!("ds-{}", upload.file_name),
            status: "uploaded".to_string(),
            message: None,
        })
    }

    async fn get_dataset_analysis(&self, project_id: &str) -> Result<DatasetAnalysis> {
        self.call_count.lock().await.get_dataset_analysis += 1;
        self.check_error().await?;

        self.analyses.lock().await.next_or(|| {
            Err(ApiError::NotFound(format!("No dataset uploaded for {}", project_id)).into())
        })
    }
}

// ============================================================================
// TrainingApi Implementation
// ============================================================================

#[async_trait]
impl TrainingApi for MockForgeClient {
    async fn start_training(&self, request: TrainingRequest) -> Result<StartTrainingResponse> {
        self.call_count.lock().await.start_training += 1;
        self.check_error().await?;
        request.validate()?;

        let response = StartTrainingResponse {
            training_id: "t1".to_string(),
            project_id: request.project_id.clone(),
            status: TrainingStatus::Queued,
            message: None,
        };
        self.training_requests.lock().await.push(request);
        Ok(response)
    }

    async fn get_training_status(
        &self,
        _project_id: &str,
        _training_id: &str,
    ) -> Result<TrainingResponse> {
        self.call_count.lock().await.get_training_status += 1;
        self.check_error().await?;

        self.training_statuses
            .lock()
            .await
            .next_or(|| Ok(training(TrainingStatus::Completed)))
    }

    async fn get_training_logs(
        &self,
        _project_id: &str,
        _training_id: &str,
        _last_n: usize,
    ) -> Result<TrainingLogs> {
        self.call_count.lock().await.get_training_logs += 1;
        self.check_error().await?;

        self.training_logs.lock().await.next_or(|| {
            Ok(TrainingLogs {
                logs: Vec::new(),
                total_logs: 0,
                status: TrainingStatus::Completed,
                last_updated: None,
            })
        })
    }

    async fn get_training_summary(
        &self,
        _project_id: &str,
        _training_id: &str,
    ) -> Result<TrainingSummary> {
        self.call_count.lock().await.get_training_summary += 1;
        self.check_error().await?;

        self.summaries
            .lock()
            .await
            .next_or(|| Ok(summary(SummaryStatus::Completed)))
    }

    async fn download_model_weights(
        &self,
        _project_id: &str,
        _training_id: &str,
    ) -> Result<Vec<u8>> {
        self.call_count.lock().await.download_model_weights += 1;
        self.check_error().await?;

        Ok(vec![0u8; 16])
    }

    async fn get_training_config_options(&self) -> Result<TrainingConfigOptions> {
        self.call_count.lock().await.get_training_config_options += 1;
        self.check_error().await?;

        Ok(TrainingConfigOptions {
            model_types: vec!["bert-base".to_string(), "resnet50".to_string()],
            gpu_types: vec!["t4".to_string(), "a10g".to_string()],
            dataset_types: vec!["text".to_string(), "image".to_string()],
            default_epochs: Some(3),
            default_batch_size: Some(16),
            default_learning_rate: Some(2e-5),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_script_repeats_last_step() {
        let mock = MockForgeClient::new()
            .with_training_statuses(vec![
                Ok(training(TrainingStatus::Running)),
                Ok(training(TrainingStatus::Completed)),
            ])
            .await;

        let first = mock.get_training_status("p1", "t1").await.unwrap();
        let second = mock.get_training_status("p1", "t1").await.unwrap();
        let third = mock.get_training_status("p1", "t1").await.unwrap();

        assert_eq!(first.status, TrainingStatus::Running);
        assert_eq!(second.status, TrainingStatus::Completed);
        assert_eq!(third.status, TrainingStatus::Completed);
        assert_eq!(mock.call_counts().await.get_training_status, 3);
    }

    #[tokio::test]
    async fn test_one_shot_error() {
        let mock = MockForgeClient::new()
            .with_error(ApiError::Network("down".to_string()))
            .await;

        assert!(mock.list_projects(10, 0).await.is_err());
        assert!(mock.list_projects(10, 0).await.is_ok());
        assert_eq!(mock.call_counts().await.total(), 2);
    }

    #[tokio::test]
    async fn test_list_projects_pages() {
        let mock = MockForgeClient::new()
            .with_projects(vec![
                list_item("p1", "A"),
                list_item("p2", "B"),
                list_item("p3", "C"),
            ])
            .await;

        let page = mock.list_projects(2, 1).await.unwrap();
        let ids: Vec<_> = page.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["p2", "p3"]);
    }
}
