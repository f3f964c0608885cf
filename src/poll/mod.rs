//! Status polling for long-running remote jobs
//!
//! A poll repeatedly fetches a resource's status until it reaches a terminal
//! state. Successful non-terminal fetches are spaced by a slowly growing
//! interval; failed fetches back off multiplicatively up to a cap. Each poll
//! runs as its own task and is stopped through its [`PollHandle`].

pub mod flows;
pub mod registry;

use std::fmt;
use std::time::Duration;

use crate::notify::Notice;
use crate::error::ApiError;

pub use flows::{LogCursor, watch_dataset_analysis, watch_project, watch_training, watch_training_logs};
pub use registry::{PollHandle, PollRegistry};

/// A status payload a poll can inspect
pub trait PolledStatus {
    /// Raw status string, for progress output
    fn status_label(&self) -> &str;

    /// Whether polling should stop at this status
    fn is_terminal(&self) -> bool;

    /// The one notice fired when a terminal status is observed
    fn terminal_notice(&self) -> Notice;
}

/// Timing parameters of one kind of poll
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PollPolicy {
    /// Wait before the first fetch
    pub initial_delay: Duration,
    /// Wait after the first successful non-terminal fetch
    pub interval: Duration,
    /// Multiplier applied to the success interval after each success
    pub growth: f64,
    pub max_interval: Duration,
    /// Multiplier applied to the failure delay after each failed fetch
    pub backoff_factor: f64,
    pub max_backoff: Duration,
    /// Consecutive failures tolerated before giving up (`None` = never)
    pub max_failures: Option<u32>,
    /// Back off on 404 instead of giving up; the resource may not exist yet
    pub retry_not_found: bool,
}

impl PollPolicy {
    /// Project code generation
    pub const PROJECT_GENERATION: PollPolicy = PollPolicy {
        initial_delay: Duration::from_secs(2),
        interval: Duration::from_secs(3),
        growth: 1.2,
        max_interval: Duration::from_secs(10),
        backoff_factor: 1.5,
        max_backoff: Duration::from_secs(30),
        max_failures: Some(10),
        retry_not_found: false,
    };

    /// Dataset analysis after upload
    pub const DATASET_ANALYSIS: PollPolicy = PollPolicy {
        initial_delay: Duration::from_secs(3),
        interval: Duration::from_secs(5),
        growth: 1.0,
        max_interval: Duration::from_secs(5),
        backoff_factor: 1.5,
        max_backoff: Duration::from_secs(20),
        max_failures: Some(10),
        retry_not_found: true,
    };

    /// Training status
    pub const TRAINING_STATUS: PollPolicy = PollPolicy {
        initial_delay: Duration::from_secs(2),
        interval: Duration::from_secs(5),
        growth: 1.0,
        max_interval: Duration::from_secs(5),
        backoff_factor: 1.5,
        max_backoff: Duration::from_secs(30),
        max_failures: None,
        retry_not_found: false,
    };

    /// Training log tail
    pub const TRAINING_LOGS: PollPolicy = PollPolicy {
        initial_delay: Duration::from_secs(2),
        interval: Duration::from_secs(3),
        growth: 1.2,
        max_interval: Duration::from_secs(5),
        backoff_factor: 1.2,
        max_backoff: Duration::from_secs(20),
        max_failures: None,
        retry_not_found: false,
    };
}

/// Mutable timing state of one running poll
#[derive(Debug, Clone)]
pub struct PollState {
    policy: PollPolicy,
    interval: Duration,
    failure_delay: Duration,
    failure_count: u32,
}

impl PollState {
    pub fn new(policy: PollPolicy) -> Self {
        Self {
            policy,
            interval: policy.interval,
            failure_delay: policy.interval,
            failure_count: 0,
        }
    }

    /// Record a successful fetch.
    ///
    /// Returns the delay before the next fetch, or `None` once the status
    /// is terminal. Resets the failure backoff.
    pub fn on_success(&mut self, terminal: bool) -> Option<Duration> {
        self.failure_count = 0;
        if terminal {
            return None;
        }

        let delay = self.interval;
        self.interval = self
            .interval
            .mul_f64(self.policy.growth)
            .min(self.policy.max_interval);
        self.failure_delay = self.interval;
        Some(delay)
    }

    /// Record a failed fetch.
    ///
    /// Returns the backed-off delay before the next attempt, or `None` when
    /// the failure budget is exhausted.
    pub fn on_failure(&mut self) -> Option<Duration> {
        self.failure_count += 1;
        self.failure_delay = self
            .failure_delay
            .mul_f64(self.policy.backoff_factor)
            .min(self.policy.max_backoff);

        match self.policy.max_failures {
            Some(max) if self.failure_count >= max => None,
            _ => Some(self.failure_delay),
        }
    }

    pub fn failure_count(&self) -> u32 {
        self.failure_count
    }
}

/// Kind of resource being polled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PollResource {
    Project,
    DatasetAnalysis,
    Training,
    TrainingLogs,
}

impl fmt::Display for PollResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PollResource::Project => "project",
            PollResource::DatasetAnalysis => "dataset-analysis",
            PollResource::Training => "training",
            PollResource::TrainingLogs => "training-logs",
        };
        f.write_str(name)
    }
}

/// At most one poll per key is active at a time
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PollKey {
    pub resource: PollResource,
    pub id: String,
}

impl PollKey {
    pub fn new(resource: PollResource, id: impl Into<String>) -> Self {
        Self {
            resource,
            id: id.into(),
        }
    }
}

impl fmt::Display for PollKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.resource, self.id)
    }
}

/// How a poll ended
#[derive(Debug)]
pub enum PollExit<T> {
    /// A terminal status was observed
    Finished(T),
    /// Stopped by its owner
    Cancelled,
    /// Fetching failed for good
    GaveUp(ApiError),
}

impl<T> PollExit<T> {
    #[allow(dead_code)]
    pub fn finished(self) -> Option<T> {
        match self {
            PollExit::Finished(value) => Some(value),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_interval_grows_to_cap() {
        let mut state = PollState::new(PollPolicy::PROJECT_GENERATION);

        let delays: Vec<Duration> = (0..10).filter_map(|_| state.on_success(false)).collect();

        assert_eq!(delays[0], Duration::from_secs(3));
        assert!(delays.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(*delays.last().unwrap(), Duration::from_secs(10));
    }

    #[test]
    fn test_fixed_interval_policy() {
        let mut state = PollState::new(PollPolicy::TRAINING_STATUS);

        assert_eq!(state.on_success(false), Some(Duration::from_secs(5)));
        assert_eq!(state.on_success(false), Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_terminal_stops_scheduling() {
        let mut state = PollState::new(PollPolicy::TRAINING_STATUS);

        assert!(state.on_success(false).is_some());
        assert_eq!(state.on_success(true), None);
    }

    #[test]
    fn test_failure_backoff_monotone_and_capped() {
        let policy = PollPolicy::TRAINING_STATUS;
        let mut state = PollState::new(policy);

        let first = state.on_failure().unwrap();
        let second = state.on_failure().unwrap();
        let third = state.on_failure().unwrap();

        assert!(first > policy.interval);
        assert!(first < second && second < third);
        assert!(third <= policy.max_backoff);

        for _ in 0..10 {
            let next = state.on_failure().unwrap();
            assert!(next >= third);
            assert!(next <= policy.max_backoff);
        }
        assert_eq!(state.on_failure(), Some(policy.max_backoff));
    }

    #[test]
    fn test_success_resets_failures() {
        let mut state = PollState::new(PollPolicy::DATASET_ANALYSIS);

        state.on_failure();
        state.on_failure();
        assert_eq!(state.failure_count(), 2);

        assert_eq!(state.on_success(false), Some(Duration::from_secs(5)));
        assert_eq!(state.failure_count(), 0);
        assert_eq!(state.on_failure(), Some(Duration::from_millis(7500)));
    }

    #[test]
    fn test_failure_budget() {
        let mut state = PollState::new(PollPolicy {
            max_failures: Some(3),
            ..PollPolicy::PROJECT_GENERATION
        });

        assert!(state.on_failure().is_some());
        assert!(state.on_failure().is_some());
        assert!(state.on_failure().is_none());
    }

    #[test]
    fn test_poll_key_display() {
        let key = PollKey::new(PollResource::TrainingLogs, "t1");
        assert_eq!(key.to_string(), "training-logs:t1");
    }
}
