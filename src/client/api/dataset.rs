//! Dataset API trait

use async_trait::async_trait;

use crate::client::models::{DatasetAnalysis, DatasetUpload, UploadResponse};
use crate::error::Result;

/// Dataset operations for the ForgeML API
#[async_trait]
pub trait DatasetApi: Send + Sync {
    /// Upload a dataset file for a project (multipart)
    async fn upload_dataset(&self, project_id: &str, upload: DatasetUpload)
    -> Result<UploadResponse>;

    /// Get the analysis of a project's dataset.
    ///
    /// Fails with `NotFound` while the project has no dataset.
    async fn get_dataset_analysis(&self, project_id: &str) -> Result<DatasetAnalysis>;

    /// Get the dataset analysis, bypassing the cache.
    ///
    /// The default implementation just calls `get_dataset_analysis()`.
    async fn get_dataset_analysis_fresh(&self, project_id: &str) -> Result<DatasetAnalysis> {
        self.get_dataset_analysis(project_id).await
    }
}
