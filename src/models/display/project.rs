//! Project display models

use serde::Serialize;
use tabled::Tabled;

use super::common::truncate_string;
use crate::client::models::{ProjectListItem, ProjectResponse};
use crate::output::formatters::format_timestamp_local;

/// Project listing row
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct ProjectDisplay {
    #[tabled(rename = "PROJECT ID")]
    pub id: String,

    #[tabled(rename = "NAME")]
    pub name: String,

    #[tabled(rename = "STATUS")]
    pub status: String,

    /// Checkmark when a dataset has been uploaded
    #[tabled(rename = "DATASET")]
    pub dataset: String,

    #[tabled(rename = "TRAININGS")]
    pub trainings: u32,

    #[tabled(rename = "CREATED")]
    pub created: String,
}

impl From<ProjectListItem> for ProjectDisplay {
    fn from(item: ProjectListItem) -> Self {
        Self {
            id: item.id,
            name: truncate_string(&item.name, 40),
            status: item.status.as_str().to_string(),
            dataset: if item.has_dataset {
                "\u{2713}".to_string()
            } else {
                String::new()
            },
            trainings: item.training_count,
            created: item
                .created_at
                .as_deref()
                .map(format_timestamp_local)
                .unwrap_or_else(|| "--".to_string()),
        }
    }
}

/// Project status row
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct ProjectStatusDisplay {
    #[tabled(rename = "PROJECT ID")]
    pub id: String,

    #[tabled(rename = "STATUS")]
    pub status: String,

    #[tabled(rename = "MESSAGE")]
    pub message: String,
}

impl From<&ProjectResponse> for ProjectStatusDisplay {
    fn from(resp: &ProjectResponse) -> Self {
        Self {
            id: resp.id.clone(),
            status: resp.status.as_str().to_string(),
            message: resp.message.clone().unwrap_or_default(),
        }
    }
}
