//! Document upload queue with validation and manual retry.

use serde::{Deserialize, Serialize};

use crate::error::{ConsoleError, Result};
use crate::jobs::{JobRequest, JobRunner};

/// Upload limits.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Accepted extensions, lowercase, without the dot.
    pub extensions: Vec<String>,
    pub max_bytes: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        UploadConfig {
            extensions: ["pdf", "jpg", "jpeg", "png"].map(String::from).to_vec(),
            max_bytes: 5 * 1024 * 1024,
        }
    }
}

impl UploadConfig {
    /// Checks a file before it is queued.
    pub fn check(&self, name: &str, size: u64) -> Result<()> {
        let ext = name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
            .unwrap_or_default();
        if !self.extensions.iter().any(|e| *e == ext) {
            return Err(ConsoleError::rejected(
                name,
                format!("only {} files are accepted", self.extensions.join("/")),
            ));
        }
        if size > self.max_bytes {
            return Err(ConsoleError::rejected(
                name,
                format!("larger than {} MB", self.max_bytes / (1024 * 1024)),
            ));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadStatus {
    Queued,
    Uploading,
    Done,
    Failed,
}

impl UploadStatus {
    fn as_str(self) -> &'static str {
        match self {
            UploadStatus::Queued => "queued",
            UploadStatus::Uploading => "uploading",
            UploadStatus::Done => "done",
            UploadStatus::Failed => "failed",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UploadEntry {
    pub id: u64,
    pub name: String,
    pub size: u64,
    pub status: UploadStatus,
    pub percent: u8,
    pub attempts: u32,
    pub error: Option<String>,
}

#[derive(Debug, Default)]
pub struct UploadQueue {
    config: UploadConfig,
    entries: Vec<UploadEntry>,
    next_id: u64,
}

impl UploadQueue {
    pub fn new(config: UploadConfig) -> Self {
        UploadQueue {
            config,
            entries: Vec::new(),
            next_id: 1,
        }
    }

    pub fn entries(&self) -> &[UploadEntry] {
        &self.entries
    }

    pub fn get(&self, id: u64) -> Option<&UploadEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    fn entry_mut(&mut self, id: u64) -> Result<&mut UploadEntry> {
        self.entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| ConsoleError::not_found(id))
    }

    /// Validates and queues a file. Rejected files are not listed.
    pub fn add(&mut self, name: impl Into<String>, size: u64) -> Result<u64> {
        let name = name.into();
        self.config.check(&name, size).inspect_err(|err| {
            tracing::debug!(error = %err, "upload rejected");
        })?;
        let id = self.next_id.max(1);
        self.next_id = id + 1;
        self.entries.push(UploadEntry {
            id,
            name,
            size,
            status: UploadStatus::Queued,
            percent: 0,
            attempts: 0,
            error: None,
        });
        Ok(id)
    }

    pub fn remove(&mut self, id: u64) -> Result<UploadEntry> {
        let pos = self
            .entries
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| ConsoleError::not_found(id))?;
        Ok(self.entries.remove(pos))
    }

    /// Uploads a queued file. A failed attempt sets the `Failed` status and
    /// is not an `Err`; retry with [`retry`](Self::retry).
    pub fn upload(&mut self, id: u64, runner: &mut dyn JobRunner) -> Result<UploadStatus> {
        let status = self.entry_mut(id)?.status;
        if status != UploadStatus::Queued {
            return Err(invalid(id, "upload", status));
        }
        self.attempt(id, runner)
    }

    /// Re-runs a failed upload from zero.
    pub fn retry(&mut self, id: u64, runner: &mut dyn JobRunner) -> Result<UploadStatus> {
        let status = self.entry_mut(id)?.status;
        if status != UploadStatus::Failed {
            return Err(invalid(id, "retry", status));
        }
        self.attempt(id, runner)
    }

    fn attempt(&mut self, id: u64, runner: &mut dyn JobRunner) -> Result<UploadStatus> {
        let entry = self.entry_mut(id)?;
        entry.attempts += 1;
        entry.status = UploadStatus::Uploading;
        entry.percent = 0;
        entry.error = None;
        let job = JobRequest {
            name: entry.name.clone(),
            attempt: entry.attempts,
        };

        let outcome = runner.run(&job, &mut |percent: u8| entry.percent = percent.min(100));
        match outcome {
            Ok(()) => {
                entry.status = UploadStatus::Done;
                entry.percent = 100;
            }
            Err(err) => {
                tracing::warn!(
                    file = %entry.name,
                    attempt = entry.attempts,
                    error = %err,
                    "upload failed"
                );
                entry.status = UploadStatus::Failed;
                entry.error = Some(err.to_string());
            }
        }
        Ok(entry.status)
    }

    /// Form check before submit: at least one file, none in flight, none
    /// failed.
    pub fn validate(&self) -> Result<()> {
        let field = "documents";
        if self.entries.is_empty() {
            return Err(ConsoleError::validation(field, "upload at least one document"));
        }
        let has = |s: UploadStatus| self.entries.iter().any(|e| e.status == s);
        if has(UploadStatus::Uploading) || has(UploadStatus::Queued) {
            return Err(ConsoleError::validation(field, "wait for uploads to finish"));
        }
        if has(UploadStatus::Failed) {
            return Err(ConsoleError::validation(field, "retry failed uploads"));
        }
        Ok(())
    }
}

fn invalid(id: u64, action: &'static str, status: UploadStatus) -> ConsoleError {
    ConsoleError::InvalidState {
        id: id.to_string(),
        action,
        state: status.as_str(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::SimulatedRunner;

    const MB: u64 = 1024 * 1024;

    #[test]
    fn rejects_bad_extension_and_size() {
        let mut q = UploadQueue::new(UploadConfig::default());
        assert!(matches!(q.add("contract.docx", MB), Err(ConsoleError::FileRejected { .. })));
        assert!(matches!(q.add("noext", MB), Err(ConsoleError::FileRejected { .. })));
        assert!(matches!(q.add("scan.PNG", 6 * MB), Err(ConsoleError::FileRejected { .. })));
        assert!(q.add("scan.PNG", 5 * MB).is_ok());
        assert_eq!(q.entries().len(), 1);
    }

    #[test]
    fn upload_succeeds() {
        let mut q = UploadQueue::new(UploadConfig::default());
        let id = q.add("registration.pdf", MB).unwrap();
        assert_eq!(q.upload(id, &mut SimulatedRunner::new()).unwrap(), UploadStatus::Done);
        let e = q.get(id).unwrap();
        assert_eq!((e.percent, e.attempts), (100, 1));
        assert!(q.validate().is_ok());
    }

    #[test]
    fn failed_upload_needs_manual_retry() {
        let mut runner = SimulatedRunner::new();
        let mut q = UploadQueue::new(UploadConfig::default());
        let id = q.add("fail-license.jpg", MB).unwrap();
        assert_eq!(q.upload(id, &mut runner).unwrap(), UploadStatus::Failed);
        assert_eq!(q.get(id).unwrap().percent, 100);
        assert!(matches!(q.validate(), Err(ConsoleError::Validation { .. })));
        assert!(matches!(q.upload(id, &mut runner), Err(ConsoleError::InvalidState { .. })));

        assert_eq!(q.retry(id, &mut runner).unwrap(), UploadStatus::Done);
        assert_eq!(q.get(id).unwrap().attempts, 2);
        assert!(matches!(q.retry(id, &mut runner), Err(ConsoleError::InvalidState { .. })));
    }

    #[test]
    fn empty_queue_fails_validation() {
        let q = UploadQueue::new(UploadConfig::default());
        assert!(matches!(q.validate(), Err(ConsoleError::Validation { .. })));
    }

    #[test]
    fn remove_unknown() {
        let mut q = UploadQueue::new(UploadConfig::default());
        assert!(matches!(q.remove(9), Err(ConsoleError::NotFound(_))));
    }
}
