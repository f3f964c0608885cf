//! JSON envelope for `--format json`
//!
//! Every JSON document the CLI prints has the shape
//! `{"data": ..., "meta": {"timestamp": ..., "version": ...}}`.

use chrono::Utc;
use serde::Serialize;

/// Envelope around a command's result
#[derive(Debug, Serialize)]
pub struct JsonOutput<'a, T: ?Sized> {
    pub data: &'a T,
    pub meta: Metadata,
}

/// When and by which CLI version a document was produced
#[derive(Debug, Serialize)]
pub struct Metadata {
    pub timestamp: String,
    pub version: String,
}

impl Metadata {
    pub fn now() -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Wrap `data` in the envelope and pretty-print it
pub fn format_json<T: Serialize + ?Sized>(data: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&JsonOutput {
        data,
        meta: Metadata::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock::{project, training};
    use crate::client::models::{ProjectStatus, TrainingStatus};

    #[test]
    fn test_envelope_carries_version_and_timestamp() {
        let json = format_json(&project("p1", ProjectStatus::Ready)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["data"]["id"], "p1");
        assert_eq!(value["data"]["status"], "ready");
        assert_eq!(value["meta"]["version"], env!("CARGO_PKG_VERSION"));
        assert!(
            chrono::DateTime::parse_from_rfc3339(value["meta"]["timestamp"].as_str().unwrap())
                .is_ok()
        );
    }

    #[test]
    fn test_lists_become_arrays() {
        let runs = vec![
            training(TrainingStatus::Running),
            training(TrainingStatus::Completed),
        ];

        let value: serde_json::Value = serde_json::from_str(&format_json(&runs).unwrap()).unwrap();

        let data = value["data"].as_array().unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data[1]["status"], "completed");
    }

    #[test]
    fn test_empty_list() {
        let none: Vec<String> = Vec::new();
        assert!(format_json(&none).unwrap().contains("\"data\": []"));
    }
}
