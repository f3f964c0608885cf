//! Training models

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::TrainingDefaults;
use crate::error::ApiError;
use crate::notify::Notice;
use crate::poll::PolledStatus;

/// Training lifecycle: `queued → running → completed | failed | cancelled`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrainingStatus {
    Queued,
    Running,
    Completed,
    Failed,
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl TrainingStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TrainingStatus::Completed | TrainingStatus::Failed | TrainingStatus::Cancelled
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TrainingStatus::Queued => "queued",
            TrainingStatus::Running => "running",
            TrainingStatus::Completed => "completed",
            TrainingStatus::Failed => "failed",
            TrainingStatus::Cancelled => "cancelled",
            TrainingStatus::Unknown => "unknown",
        }
    }
}

/// Request to start a training run
#[derive(Debug, Clone, Default, Serialize)]
pub struct TrainingRequest {
    /// Path parameter, not part of the body
    #[serde(skip)]
    pub project_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub gpu_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub epochs: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub learning_rate: Option<f64>,
}

impl TrainingRequest {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            ..Default::default()
        }
    }

    /// Fill unset fields from deployment defaults.
    ///
    /// When the deployment does not accept `model_type`, the field is dropped
    /// even if the caller set it.
    pub fn with_defaults(mut self, defaults: &TrainingDefaults) -> Self {
        if self.gpu_type.is_none() {
            self.gpu_type = defaults.gpu_type.clone();
        }
        if defaults.send_model_type {
            if self.model_type.is_none() {
                self.model_type = defaults.model_type.clone();
            }
        } else {
            self.model_type = None;
        }
        self
    }

    /// Reject obviously invalid requests before they reach the server
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.project_id.trim().is_empty() {
            return Err(ApiError::Validation("project ID is required".to_string()));
        }
        if self.epochs == Some(0) {
            return Err(ApiError::Validation("epochs must be at least 1".to_string()));
        }
        if self.batch_size == Some(0) {
            return Err(ApiError::Validation(
                "batch size must be at least 1".to_string(),
            ));
        }
        if let Some(lr) = self.learning_rate
            && !(lr > 0.0 && lr.is_finite())
        {
            return Err(ApiError::Validation(
                "learning rate must be a positive number".to_string(),
            ));
        }
        Ok(())
    }
}

/// Response to a training start request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartTrainingResponse {
    pub training_id: String,

    pub project_id: String,

    pub status: TrainingStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Live state of a training run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingResponse {
    pub training_id: String,

    pub project_id: String,

    pub status: TrainingStatus,

    /// Completion fraction in percent (0-100)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_epoch: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_epochs: Option<u32>,

    #[serde(default)]
    pub metrics: BTreeMap<String, f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
}

impl PolledStatus for TrainingResponse {
    fn status_label(&self) -> &str {
        self.status.as_str()
    }

    fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    fn terminal_notice(&self) -> Notice {
        match self.status {
            TrainingStatus::Completed => {
                Notice::success(format!("Training {} completed", self.training_id))
            }
            TrainingStatus::Cancelled => {
                Notice::warning(format!("Training {} was cancelled", self.training_id))
            }
            _ => Notice::error(format!(
                "Training {} failed: {}",
                self.training_id,
                self.message.as_deref().unwrap_or("unknown error")
            )),
        }
    }
}

/// A single training log line.
///
/// The backend sends either structured entries or bare strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawLogEntry")]
pub struct LogEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,

    pub message: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawLogEntry {
    Text(String),
    Entry {
        #[serde(default)]
        timestamp: Option<String>,
        #[serde(default)]
        level: Option<String>,
        message: String,
    },
}

impl From<RawLogEntry> for LogEntry {
    fn from(raw: RawLogEntry) -> Self {
        match raw {
            RawLogEntry::Text(message) => Self {
                timestamp: None,
                level: None,
                message,
            },
            RawLogEntry::Entry {
                timestamp,
                level,
                message,
            } => Self {
                timestamp,
                level,
                message,
            },
        }
    }
}

/// Tail of a training run's log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingLogs {
    #[serde(default)]
    pub logs: Vec<LogEntry>,

    /// Total lines the run has produced so far
    #[serde(default)]
    pub total_logs: u64,

    pub status: TrainingStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

impl PolledStatus for TrainingLogs {
    fn status_label(&self) -> &str {
        self.status.as_str()
    }

    fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    fn terminal_notice(&self) -> Notice {
        Notice::info(format!(
            "Log stream ended ({} lines, training {})",
            self.total_logs,
            self.status.as_str()
        ))
    }
}

/// AI summary generation state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryStatus {
    Pending,
    Generating,
    Completed,
    Failed,
    #[serde(other)]
    Unknown,
}

/// Post-training summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingSummary {
    pub training_id: String,

    pub project_id: String,

    pub status: TrainingStatus,

    pub ai_summary_status: SummaryStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_summary: Option<String>,

    #[serde(default)]
    pub final_metrics: BTreeMap<String, f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_size_bytes: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
}

/// Reference data for the training form
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrainingConfigOptions {
    #[serde(default)]
    pub model_types: Vec<String>,

    #[serde(default)]
    pub gpu_types: Vec<String>,

    #[serde(default)]
    pub dataset_types: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_epochs: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_batch_size: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_learning_rate: Option<f64>,
}
