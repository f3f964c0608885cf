//! Project API trait

use async_trait::async_trait;

use crate::client::models::{ProjectListItem, ProjectResponse};
use crate::error::Result;

/// Project lifecycle operations for the ForgeML API
#[async_trait]
pub trait ProjectApi: Send + Sync {
    /// Create a project from a natural-language prompt.
    ///
    /// Generation continues server-side; poll `get_project_status` until the
    /// project is `ready` or `error`.
    async fn create_project(&self, name: &str, prompt: &str) -> Result<ProjectResponse>;

    /// Get the current generation status of a project.
    ///
    /// May return cached data if caching is enabled.
    async fn get_project_status(&self, project_id: &str) -> Result<ProjectResponse>;

    /// Get project status, bypassing the cache.
    ///
    /// Pollers use this so that a cached status cannot hide a transition.
    /// The default implementation just calls `get_project_status()` since
    /// only the cached wrapper needs special handling.
    async fn get_project_status_fresh(&self, project_id: &str) -> Result<ProjectResponse> {
        self.get_project_status(project_id).await
    }

    /// List projects, newest first
    async fn list_projects(&self, limit: usize, offset: usize) -> Result<Vec<ProjectListItem>>;

    /// Delete a project and everything attached to it
    async fn delete_project(&self, project_id: &str) -> Result<ProjectResponse>;

    /// Download the generated project source as an archive
    async fn download_project_code(&self, project_id: &str) -> Result<Vec<u8>>;
}
