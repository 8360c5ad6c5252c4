//! Job port and keyed job tracking.
//!
//! Settlement file preparation, webhook test sends and document uploads
//! all follow one shape: submit, observe progress, succeed or fail. Failed
//! jobs stay failed until the user retries.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::Hash;

use crate::error::{ConsoleError, Result};

/// One attempt at a job.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JobRequest {
    /// What is being processed, e.g. a file name or a settlement id.
    pub name: String,
    /// One-based attempt number.
    pub attempt: u32,
}

/// Runs jobs to completion, reporting progress in percent.
pub trait JobRunner {
    /// Runs one attempt. Failures are returned as [`ConsoleError::JobFailed`].
    fn run(&mut self, job: &JobRequest, progress: &mut dyn FnMut(u8)) -> Result<()>;
}

/// Deterministic stand-in for a remote job.
///
/// Progress advances in fixed steps to 100. The first attempt of a job
/// whose name contains `fail` (case-insensitive), or that was registered
/// with [`fail_first`](Self::fail_first), fails; later attempts succeed.
#[derive(Clone, Debug)]
pub struct SimulatedRunner {
    step: u8,
    fail_first: HashSet<String>,
}

impl Default for SimulatedRunner {
    fn default() -> Self {
        SimulatedRunner {
            step: 20,
            fail_first: HashSet::new(),
        }
    }
}

impl SimulatedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Progress increment per step, at least 1.
    pub fn step(mut self, percent: u8) -> Self {
        self.step = percent.clamp(1, 100);
        self
    }

    /// Makes the first attempt of this job fail.
    pub fn fail_first(mut self, name: impl Into<String>) -> Self {
        self.fail_first.insert(name.into());
        self
    }

    fn should_fail(&self, job: &JobRequest) -> bool {
        job.attempt == 1
            && (job.name.to_lowercase().contains("fail") || self.fail_first.contains(&job.name))
    }
}

impl JobRunner for SimulatedRunner {
    fn run(&mut self, job: &JobRequest, progress: &mut dyn FnMut(u8)) -> Result<()> {
        let mut percent = 0u8;
        while percent < 100 {
            percent = percent.saturating_add(self.step).min(100);
            progress(percent);
        }
        if self.should_fail(job) {
            return Err(ConsoleError::JobFailed(format!("{} failed", job.name)));
        }
        Ok(())
    }
}

/// State of a keyed job.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum JobState {
    #[default]
    Idle,
    Preparing,
    Failed(String),
}

/// Per-key job state, e.g. one settlement file download per settlement.
///
/// A key that is already preparing rejects a second start.
#[derive(Debug)]
pub struct JobTracker<K> {
    states: HashMap<K, JobState>,
    attempts: HashMap<K, u32>,
}

impl<K> Default for JobTracker<K> {
    fn default() -> Self {
        JobTracker {
            states: HashMap::new(),
            attempts: HashMap::new(),
        }
    }
}

impl<K> JobTracker<K>
where
    K: Eq + Hash + Clone + fmt::Display,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, key: &K) -> JobState {
        self.states.get(key).cloned().unwrap_or_default()
    }

    pub fn attempts(&self, key: &K) -> u32 {
        self.attempts.get(key).copied().unwrap_or(0)
    }

    /// Marks the key as preparing and returns the attempt to run.
    pub fn begin(&mut self, key: &K) -> Result<JobRequest> {
        if self.state(key) == JobState::Preparing {
            return Err(ConsoleError::JobInFlight(key.to_string()));
        }
        let attempt = self.attempts.entry(key.clone()).or_insert(0);
        *attempt += 1;
        self.states.insert(key.clone(), JobState::Preparing);
        tracing::debug!(job = %key, attempt = *attempt, "job started");
        Ok(JobRequest {
            name: key.to_string(),
            attempt: *attempt,
        })
    }

    /// Records the outcome of the attempt started by [`begin`](Self::begin).
    pub fn finish(&mut self, key: &K, outcome: &Result<()>) {
        let state = match outcome {
            Ok(()) => JobState::Idle,
            Err(err) => {
                tracing::warn!(job = %key, error = %err, "job failed");
                JobState::Failed(err.to_string())
            }
        };
        self.states.insert(key.clone(), state);
    }

    /// Begins, runs and finishes one attempt.
    pub fn run(&mut self, key: &K, runner: &mut dyn JobRunner) -> Result<()> {
        let job = self.begin(key)?;
        let outcome = runner.run(&job, &mut |_| {});
        self.finish(key, &outcome);
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simulated_runner_steps_progress() {
        let mut seen = Vec::new();
        let job = JobRequest {
            name: "registration.pdf".into(),
            attempt: 1,
        };
        SimulatedRunner::new().run(&job, &mut |p| seen.push(p)).unwrap();
        assert_eq!(seen, [20, 40, 60, 80, 100]);
    }

    #[test]
    fn fail_marker_only_fails_first_attempt() {
        let mut runner = SimulatedRunner::new();
        let mut job = JobRequest {
            name: "FAIL-scan.png".into(),
            attempt: 1,
        };
        assert!(matches!(runner.run(&job, &mut |_| {}), Err(ConsoleError::JobFailed(_))));
        job.attempt = 2;
        assert!(runner.run(&job, &mut |_| {}).is_ok());
    }

    #[test]
    fn tracker_rejects_duplicate_in_flight() {
        let mut tracker = JobTracker::<String>::new();
        let key = "STL-202312-003".to_string();
        let job = tracker.begin(&key).unwrap();
        assert_eq!(job.attempt, 1);
        assert_eq!(tracker.state(&key), JobState::Preparing);
        assert!(matches!(tracker.begin(&key), Err(ConsoleError::JobInFlight(_))));
        tracker.finish(&key, &Ok(()));
        assert_eq!(tracker.state(&key), JobState::Idle);
    }

    #[test]
    fn tracker_fails_then_retries() {
        let mut runner = SimulatedRunner::new().fail_first("STL-202312-003");
        let mut tracker = JobTracker::new();
        let key = "STL-202312-003".to_string();
        assert!(tracker.run(&key, &mut runner).is_err());
        assert!(matches!(tracker.state(&key), JobState::Failed(_)));
        tracker.run(&key, &mut runner).unwrap();
        assert_eq!(tracker.state(&key), JobState::Idle);
        assert_eq!(tracker.attempts(&key), 2);

        let other = "STL-202312-001".to_string();
        tracker.run(&other, &mut runner).unwrap();
        assert_eq!(tracker.attempts(&other), 1);
    }
}
