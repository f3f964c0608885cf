//! API trait definitions split by responsibility
//!
//! This module organizes the ForgeML API surface into focused sub-traits:
//! - [`ProjectApi`] - Project lifecycle and project-level downloads
//! - [`DatasetApi`] - Dataset upload and analysis
//! - [`TrainingApi`] - Training runs, logs, summaries and artifacts
//!
//! The [`ForgeApi`](super::ForgeApi) super-trait combines all three.

mod dataset;
mod project;
mod training;

pub use dataset::DatasetApi;
pub use project::ProjectApi;
pub use training::TrainingApi;
