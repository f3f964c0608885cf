//! Training API trait

use async_trait::async_trait;

use crate::client::models::{
    StartTrainingResponse, TrainingConfigOptions, TrainingLogs, TrainingRequest,
    TrainingResponse, TrainingSummary,
};
use crate::error::Result;

/// Training operations for the ForgeML API
#[async_trait]
pub trait TrainingApi: Send + Sync {
    // ========================================================================
    // Write Operations
    // ========================================================================

    /// Start a training run for the request's project
    async fn start_training(&self, request: TrainingRequest) -> Result<StartTrainingResponse>;

    // ========================================================================
    // Live State
    // ========================================================================

    /// Get the live state of a training run
    async fn get_training_status(
        &self,
        project_id: &str,
        training_id: &str,
    ) -> Result<TrainingResponse>;

    /// Get the last `last_n` log lines of a training run
    async fn get_training_logs(
        &self,
        project_id: &str,
        training_id: &str,
        last_n: usize,
    ) -> Result<TrainingLogs>;

    // ========================================================================
    // Results & Reference Data
    // ========================================================================

    /// Get the post-training summary, including the AI-written analysis
    async fn get_training_summary(
        &self,
        project_id: &str,
        training_id: &str,
    ) -> Result<TrainingSummary>;

    /// Download trained model weights
    async fn download_model_weights(&self, project_id: &str, training_id: &str)
    -> Result<Vec<u8>>;

    /// Get the selectable model types, GPU types and default hyperparameters
    async fn get_training_config_options(&self) -> Result<TrainingConfigOptions>;
}
