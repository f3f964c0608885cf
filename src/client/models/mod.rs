//! ForgeML API data models
//!
//! Domain types exchanged with the ForgeML API, organized by resource.

mod dataset;
mod project;
mod training;

pub use dataset::{AnalysisStatus, DatasetAnalysis, DatasetUpload, UploadResponse};
pub use project::{CreateProjectRequest, ProjectListItem, ProjectResponse, ProjectStatus};
#[allow(unused_imports)] // statuses are matched in tests
pub use training::{
    LogEntry, StartTrainingResponse, SummaryStatus, TrainingConfigOptions, TrainingLogs,
    TrainingRequest, TrainingResponse, TrainingStatus, TrainingSummary,
};
