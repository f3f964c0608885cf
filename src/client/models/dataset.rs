//! Dataset upload and analysis models

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::notify::Notice;
use crate::poll::PolledStatus;

/// A file to upload as a project's dataset
#[derive(Debug, Clone)]
pub struct DatasetUpload {
    pub file_name: String,
    pub content: Vec<u8>,
    /// Dataset kind understood by the backend (e.g. `text`, `image`, `tabular`)
    pub dataset_type: String,
    /// Optional instruction for the generated visualizations
    pub visualization_prompt: Option<String>,
}

impl DatasetUpload {
    /// Read a dataset file from disk
    pub fn from_path(
        path: &Path,
        dataset_type: &str,
        visualization_prompt: Option<String>,
    ) -> std::io::Result<Self> {
        let content = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "dataset".to_string());

        Ok(Self {
            file_name,
            content,
            dataset_type: dataset_type.to_string(),
            visualization_prompt,
        })
    }
}

/// Response to a dataset upload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub id: String,

    pub status: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Dataset analysis lifecycle: `pending → analyzing → completed | failed`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisStatus {
    Pending,
    Analyzing,
    Completed,
    Failed,
    #[serde(other)]
    Unknown,
}

impl AnalysisStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisStatus::Pending => "pending",
            AnalysisStatus::Analyzing => "analyzing",
            AnalysisStatus::Completed => "completed",
            AnalysisStatus::Failed => "failed",
            AnalysisStatus::Unknown => "unknown",
        }
    }
}

/// Server-side analysis of an uploaded dataset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetAnalysis {
    pub project_id: String,

    pub status: AnalysisStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_rows: Option<u64>,

    #[serde(default)]
    pub columns: Vec<String>,

    /// Short natural-language summary of the dataset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(default)]
    pub recommendations: Vec<String>,

    /// URLs of generated visualization images
    #[serde(default)]
    pub visualizations: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl PolledStatus for DatasetAnalysis {
    fn status_label(&self) -> &str {
        self.status.as_str()
    }

    fn is_terminal(&self) -> bool {
        matches!(
            self.status,
            AnalysisStatus::Completed | AnalysisStatus::Failed
        )
    }

    fn terminal_notice(&self) -> Notice {
        match self.status {
            AnalysisStatus::Failed => Notice::error(format!(
                "Dataset analysis failed: {}",
                self.message.as_deref().unwrap_or("unknown error")
            )),
            _ => Notice::success("Dataset analysis complete"),
        }
    }
}
