//! Destinations for finished export files.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use super::ExportFile;
use crate::error::Result;

/// Receives export files, the way a browser receives a download.
pub trait DownloadSink {
    fn deliver(&self, file: &ExportFile) -> Result<()>;
}

/// Writes each export into a directory under its file name.
#[derive(Clone, Debug)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        DirectorySink { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DownloadSink for DirectorySink {
    fn deliver(&self, file: &ExportFile) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(&file.file_name);
        fs::write(&path, &file.bytes)?;
        tracing::debug!(path = %path.display(), bytes = file.bytes.len(), "export written");
        Ok(())
    }
}

/// Keeps delivered files in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    files: RefCell<Vec<ExportFile>>,
}

impl MemorySink {
    pub fn new() -> Self {
        MemorySink::default()
    }

    pub fn files(&self) -> Vec<ExportFile> {
        self.files.borrow().clone()
    }

    pub fn last(&self) -> Option<ExportFile> {
        self.files.borrow().last().cloned()
    }
}

impl DownloadSink for MemorySink {
    fn deliver(&self, file: &ExportFile) -> Result<()> {
        self.files.borrow_mut().push(file.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file() -> ExportFile {
        ExportFile {
            file_name: "settlements.csv".into(),
            mime: crate::export::CSV_MIME,
            bytes: b"\"a\"".to_vec(),
        }
    }

    #[test]
    fn directory_sink_writes_file() {
        let tmp = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(tmp.path().join("downloads"));
        sink.deliver(&file()).unwrap();
        let written = fs::read(tmp.path().join("downloads/settlements.csv")).unwrap();
        assert_eq!(written, b"\"a\"");
    }

    #[test]
    fn memory_sink_records() {
        let sink = MemorySink::new();
        sink.deliver(&file()).unwrap();
        assert_eq!(sink.files().len(), 1);
        assert_eq!(sink.last().map(|f| f.file_name), Some("settlements.csv".into()));
    }
}
