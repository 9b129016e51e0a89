//! Output sinks: where encoded icons end up
//!
//! The renderer never touches the filesystem directly; it hands bytes to an
//! `OutputSink`. `FileSink` writes real files, `MemorySink` keeps them in
//! memory for tests.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::{Error, Result};

pub trait OutputSink {
    /// Store `data` at `path`, replacing anything already there.
    fn write(&mut self, path: &Path, data: &[u8]) -> Result<()>;
}

/// Writes to the filesystem relative to the working directory
#[derive(Debug, Clone)]
pub struct FileSink {
    create_dirs: bool,
}

impl FileSink {
    pub fn new() -> Self {
        FileSink { create_dirs: true }
    }

    /// Fail instead of creating missing parent directories
    pub fn without_create_dirs(mut self) -> Self {
        self.create_dirs = false;
        self
    }
}

impl Default for FileSink {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputSink for FileSink {
    fn write(&mut self, path: &Path, data: &[u8]) -> Result<()> {
        let io_err = |source| Error::Io {
            path: path.to_path_buf(),
            source,
        };
        if self.create_dirs {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(io_err)?;
            }
        }
        fs::write(path, data).map_err(io_err)
    }
}

/// Keeps written files in memory, keyed by path
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    files: BTreeMap<PathBuf, Vec<u8>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: impl AsRef<Path>) -> Option<&[u8]> {
        self.files.get(path.as_ref()).map(|v| v.as_slice())
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.files.keys().map(|p| p.as_path())
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl OutputSink for MemorySink {
    fn write(&mut self, path: &Path, data: &[u8]) -> Result<()> {
        self.files.insert(path.to_path_buf(), data.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_sink_overwrites() {
        let mut sink = MemorySink::new();
        sink.write(Path::new("a/b.png"), b"one").unwrap();
        sink.write(Path::new("a/b.png"), b"two").unwrap();
        assert_eq!(sink.len(), 1);
        assert_eq!(sink.get("a/b.png"), Some(&b"two"[..]));
    }

    #[test]
    fn file_sink_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("assets/icon/app_icon.png");
        FileSink::new().write(&path, b"png").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"png");
    }

    #[test]
    fn file_sink_without_create_dirs_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing/app_icon.png");
        let err = FileSink::new().without_create_dirs().write(&path, b"png").unwrap_err();
        match err {
            Error::Io { path: p, .. } => assert_eq!(p, path),
            other => panic!("unexpected error {:?}", other),
        }
    }
}
