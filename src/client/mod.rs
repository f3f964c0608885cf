//! ForgeML API client
//!
//! The API surface is split into focused sub-traits (see [`api`]). Anything
//! implementing all of them is a [`ForgeApi`]: the HTTP client, the caching
//! wrapper, and the test mock.

pub mod api;
pub mod forge;
#[cfg(test)]
pub mod mock;
pub mod models;

pub use api::{DatasetApi, ProjectApi, TrainingApi};
pub use forge::ForgeClient;
#[cfg(test)]
pub use mock::MockForgeClient;

/// Combined ForgeML API.
///
/// Blanket-implemented for every type implementing all sub-traits.
pub trait ForgeApi: ProjectApi + DatasetApi + TrainingApi {}

impl<T: ProjectApi + DatasetApi + TrainingApi> ForgeApi for T {}
