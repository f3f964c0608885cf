//! Project models

use serde::{Deserialize, Serialize};

use crate::notify::Notice;
use crate::poll::PolledStatus;

/// Project lifecycle: `created → generating → ready | error`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Created,
    Generating,
    Ready,
    Error,
    #[serde(other)]
    Unknown,
}

impl ProjectStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ProjectStatus::Ready | ProjectStatus::Error)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Created => "created",
            ProjectStatus::Generating => "generating",
            ProjectStatus::Ready => "ready",
            ProjectStatus::Error => "error",
            ProjectStatus::Unknown => "unknown",
        }
    }
}

/// Request body for project creation
#[derive(Debug, Clone, Serialize)]
pub struct CreateProjectRequest {
    pub name: String,
    /// Natural-language description the project is generated from
    pub prompt: String,
}

/// Project state as returned by create, status and delete endpoints.
///
/// A `status` of `error` is a business-level failure: the request itself
/// succeeded and `message` explains what went wrong.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectResponse {
    pub id: String,

    pub status: ProjectStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// One row of the project listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectListItem {
    pub id: String,

    pub name: String,

    pub status: ProjectStatus,

    /// ISO-8601 creation timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,

    #[serde(default)]
    pub has_dataset: bool,

    #[serde(default)]
    pub training_count: u32,
}

impl PolledStatus for ProjectResponse {
    fn status_label(&self) -> &str {
        self.status.as_str()
    }

    fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    fn terminal_notice(&self) -> Notice {
        match self.status {
            ProjectStatus::Error => Notice::error(format!(
                "Project {} failed to generate: {}",
                self.id,
                self.message.as_deref().unwrap_or("unknown error")
            )),
            _ => Notice::success(format!("Project {} is ready", self.id)),
        }
    }
}
