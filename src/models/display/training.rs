//! Training display models

use serde::Serialize;
use tabled::Tabled;

use super::common::truncate_string;
use crate::client::models::{LogEntry, TrainingResponse};

/// Training status row
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct TrainingDisplay {
    #[tabled(rename = "TRAINING ID")]
    pub id: String,

    #[tabled(rename = "STATUS")]
    pub status: String,

    #[tabled(rename = "PROGRESS")]
    pub progress: String,

    #[tabled(rename = "EPOCH")]
    pub epoch: String,

    /// Latest metrics, `name=value` pairs
    #[tabled(rename = "METRICS")]
    pub metrics: String,
}

impl From<&TrainingResponse> for TrainingDisplay {
    fn from(resp: &TrainingResponse) -> Self {
        let epoch = match (resp.current_epoch, resp.total_epochs) {
            (Some(current), Some(total)) => format!("{}/{}", current, total),
            (Some(current), None) => current.to_string(),
            _ => "--".to_string(),
        };

        let metrics = resp
            .metrics
            .iter()
            .map(|(name, value)| format!("{}={:.4}", name, value))
            .collect::<Vec<_>>()
            .join(" ");

        Self {
            id: resp.training_id.clone(),
            status: resp.status.as_str().to_string(),
            progress: resp
                .progress
                .map(|p| format!("{:.0}%", p))
                .unwrap_or_else(|| "--".to_string()),
            epoch,
            metrics: truncate_string(&metrics, 60),
        }
    }
}

/// One metric of a training summary
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct MetricDisplay {
    #[tabled(rename = "METRIC")]
    pub name: String,

    #[tabled(rename = "VALUE")]
    pub value: String,
}

impl From<(&String, &f64)> for MetricDisplay {
    fn from((name, value): (&String, &f64)) -> Self {
        Self {
            name: name.clone(),
            value: format!("{:.4}", value),
        }
    }
}

/// One training log line
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct LogDisplay {
    #[tabled(rename = "TIME")]
    pub timestamp: String,

    #[tabled(rename = "LEVEL")]
    pub level: String,

    #[tabled(rename = "MESSAGE")]
    pub message: String,
}

impl From<&LogEntry> for LogDisplay {
    fn from(entry: &LogEntry) -> Self {
        Self {
            timestamp: entry.timestamp.clone().unwrap_or_default(),
            level: entry.level.clone().unwrap_or_default(),
            message: entry.message.clone(),
        }
    }
}

impl LogDisplay {
    /// Single-line rendering for streamed output
    pub fn line(&self) -> String {
        match (self.timestamp.is_empty(), self.level.is_empty()) {
            (true, true) => self.message.clone(),
            (true, false) => format!("{:<5} {}", self.level, self.message),
            (false, true) => format!("{} {}", self.timestamp, self.message),
            (false, false) => format!("{} {:<5} {}", self.timestamp, self.level, self.message),
        }
    }
}

/// One kind of training option and its accepted values
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct OptionDisplay {
    #[tabled(rename = "OPTION")]
    pub option: String,

    #[tabled(rename = "VALUES")]
    pub values: String,
}

impl OptionDisplay {
    pub fn new(option: &str, values: &[String]) -> Self {
        Self {
            option: option.to_string(),
            values: if values.is_empty() {
                "--".to_string()
            } else {
                values.join(", ")
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock::training;
    use crate::client::models::TrainingStatus;

    #[test]
    fn test_training_display_formats_progress() {
        let mut resp = training(TrainingStatus::Running);
        resp.progress = Some(42.4);
        resp.current_epoch = Some(3);
        resp.total_epochs = Some(10);
        resp.metrics.insert("loss".to_string(), 0.25);
        resp.metrics.insert("accuracy".to_string(), 0.9);

        let display = TrainingDisplay::from(&resp);

        assert_eq!(display.status, "running");
        assert_eq!(display.progress, "42%");
        assert_eq!(display.epoch, "3/10");
        assert_eq!(display.metrics, "accuracy=0.9000 loss=0.2500");
    }

    #[test]
    fn test_training_display_without_progress() {
        let display = TrainingDisplay::from(&training(TrainingStatus::Queued));

        assert_eq!(display.progress, "--");
        assert_eq!(display.epoch, "--");
        assert_eq!(display.metrics, "");
    }

    #[test]
    fn test_log_line_rendering() {
        let bare = LogDisplay::from(&LogEntry {
            timestamp: None,
            level: None,
            message: "epoch 1".to_string(),
        });
        let full = LogDisplay::from(&LogEntry {
            timestamp: Some("12:00:01".to_string()),
            level: Some("INFO".to_string()),
            message: "loss=0.4".to_string(),
        });

        assert_eq!(bare.line(), "epoch 1");
        assert_eq!(full.line(), "12:00:01 INFO  loss=0.4");
    }

    #[test]
    fn test_option_display() {
        let display = OptionDisplay::new("gpu_type", &["t4".to_string(), "a10g".to_string()]);
        assert_eq!(display.values, "t4, a10g");
        assert_eq!(OptionDisplay::new("model_type", &[]).values, "--");
    }
}
