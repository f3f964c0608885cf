//! Display model implementations for table and JSON output
//!
//! Display models transform API response types into CLI-friendly formats
//! with appropriate column names and serialization.

mod common;
mod project;
mod training;

pub use common::FieldDisplay;
pub use project::{ProjectDisplay, ProjectStatusDisplay};
pub use training::{LogDisplay, MetricDisplay, OptionDisplay, TrainingDisplay};
