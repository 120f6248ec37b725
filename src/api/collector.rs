//! Directory enumeration and per-file parsing of capture exports.
//!
//! This is the only stage that touches the filesystem or parses JSON. A file
//! that cannot be read or parsed is reported as a [`Diagnostic`] and skipped;
//! it never aborts collection of the remaining files. Only a failure to list
//! the directory itself is returned as an error.

use std::fs;
use std::path::{Path, PathBuf};

#[cfg(feature = "parallel-normalization")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::core::RawEntry;
use crate::error::{ScanError, ScanResult};

use super::diagnostics::{Diagnostic, json_kind};

/// Naming convention for capture export files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectorConfig {
    /// File extension without the leading dot, compared case-insensitively.
    #[serde(default = "default_extension")]
    pub extension: String,
    /// Optional file name prefix, e.g. `Kismet-`.
    #[serde(default)]
    pub file_prefix: Option<String>,
}

fn default_extension() -> String {
    "json".to_owned()
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            extension: default_extension(),
            file_prefix: None,
        }
    }
}

/// Entries of one successfully parsed capture file, in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureFile {
    pub path: PathBuf,
    pub entries: Vec<RawEntry>,
}

/// What happened to a single capture file.
#[derive(Debug, Clone, PartialEq)]
pub enum FileOutcome {
    /// Parsed; `diagnostics` lists skipped elements, if any.
    Loaded {
        capture: CaptureFile,
        diagnostics: Vec<Diagnostic>,
    },
    /// The whole file was skipped.
    Skipped(Diagnostic),
}

/// Per-file view of a directory pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectedFiles {
    pub files: Vec<CaptureFile>,
    pub diagnostics: Vec<Diagnostic>,
}

impl CollectedFiles {
    /// Total number of entries across all loaded files.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.files.iter().map(|file| file.entries.len()).sum()
    }

    /// Flattens every loaded file into one entry list, keeping file order.
    #[must_use]
    pub fn into_entries(self) -> CollectedEntries {
        CollectedEntries {
            entries: self
                .files
                .into_iter()
                .flat_map(|file| file.entries)
                .collect(),
            diagnostics: self.diagnostics,
        }
    }
}

/// Flat view of a directory pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectedEntries {
    pub entries: Vec<RawEntry>,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone, Default)]
pub struct FileCollector {
    config: CollectorConfig,
}

impl FileCollector {
    #[must_use]
    pub fn new(config: CollectorConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &CollectorConfig {
        &self.config
    }

    /// `true` when `path`'s file name follows the capture naming convention.
    #[must_use]
    pub fn matches(&self, path: &Path) -> bool {
        let extension_ok = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(&self.config.extension));
        let prefix_ok = match &self.config.file_prefix {
            Some(prefix) => path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with(prefix.as_str())),
            None => true,
        };
        extension_ok && prefix_ok
    }

    /// Capture files directly inside `dir`, sorted by path.
    pub fn capture_paths(&self, dir: &Path) -> ScanResult<Vec<PathBuf>> {
        let listing = fs::read_dir(dir).map_err(|err| ScanError::io(dir, err))?;
        let mut paths = Vec::new();
        for dir_entry in listing {
            let dir_entry = dir_entry.map_err(|err| ScanError::io(dir, err))?;
            let path = dir_entry.path();
            if path.is_file() && self.matches(&path) {
                paths.push(path);
            }
        }
        paths.sort();
        debug!(dir = %dir.display(), files = paths.len(), "listed capture files");
        Ok(paths)
    }

    /// Lazily reads and parses each capture file in `dir`, one per iteration.
    pub fn files(&self, dir: &Path) -> ScanResult<CaptureFiles> {
        Ok(CaptureFiles {
            paths: self.capture_paths(dir)?.into_iter(),
        })
    }

    /// Reads every capture file in `dir`, grouping entries per file.
    pub fn collect_files(&self, dir: &Path) -> ScanResult<CollectedFiles> {
        let paths = self.capture_paths(dir)?;

        #[cfg(feature = "parallel-normalization")]
        let outcomes: Vec<FileOutcome> = paths.par_iter().map(|path| read_capture(path)).collect();

        #[cfg(not(feature = "parallel-normalization"))]
        let outcomes: Vec<FileOutcome> = paths.iter().map(|path| read_capture(path)).collect();

        let mut collected = CollectedFiles::default();
        for outcome in outcomes {
            match outcome {
                FileOutcome::Loaded {
                    capture,
                    diagnostics,
                } => {
                    collected.diagnostics.extend(diagnostics);
                    collected.files.push(capture);
                }
                FileOutcome::Skipped(diagnostic) => collected.diagnostics.push(diagnostic),
            }
        }
        debug!(
            files = collected.files.len(),
            entries = collected.entry_count(),
            diagnostics = collected.diagnostics.len(),
            "collected capture files"
        );
        Ok(collected)
    }

    /// Reads every capture file in `dir` into one flat entry list.
    pub fn collect(&self, dir: &Path) -> ScanResult<CollectedEntries> {
        Ok(self.collect_files(dir)?.into_entries())
    }
}

/// Lazy per-file iterator returned by [`FileCollector::files`].
#[derive(Debug)]
pub struct CaptureFiles {
    paths: std::vec::IntoIter<PathBuf>,
}

impl Iterator for CaptureFiles {
    type Item = FileOutcome;

    fn next(&mut self) -> Option<Self::Item> {
        self.paths.next().map(|path| read_capture(&path))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.paths.size_hint()
    }
}

/// Reads and parses one capture file. Never fails; problems become diagnostics.
#[must_use]
pub fn read_capture(path: &Path) -> FileOutcome {
    match fs::read_to_string(path) {
        Ok(text) => parse_capture_str(path, &text),
        Err(err) => {
            warn!(file = %path.display(), error = %err, "skipping unreadable capture file");
            FileOutcome::Skipped(Diagnostic::FileUnreadable {
                file: path.to_path_buf(),
                reason: err.to_string(),
            })
        }
    }
}

/// Parses capture text: a sequence is flattened, a single object is one entry.
#[must_use]
pub fn parse_capture_str(path: &Path, text: &str) -> FileOutcome {
    let value: Value = match serde_json::from_str(text) {
        Ok(value) => value,
        Err(err) => {
            warn!(file = %path.display(), error = %err, "skipping malformed capture file");
            return FileOutcome::Skipped(Diagnostic::FileParseFailed {
                file: path.to_path_buf(),
                reason: err.to_string(),
            });
        }
    };

    let mut diagnostics = Vec::new();
    let entries = match value {
        Value::Object(entry) => vec![entry],
        Value::Array(items) => {
            let mut entries = Vec::with_capacity(items.len());
            for (index, item) in items.into_iter().enumerate() {
                match item {
                    Value::Object(entry) => entries.push(entry),
                    other => {
                        trace!(file = %path.display(), index, "skipping non-object entry");
                        diagnostics.push(Diagnostic::NonObjectEntry {
                            file: path.to_path_buf(),
                            index,
                            found: json_kind(&other).to_owned(),
                        });
                    }
                }
            }
            entries
        }
        other => {
            warn!(
                file = %path.display(),
                found = json_kind(&other),
                "skipping capture file with unsupported top-level value"
            );
            return FileOutcome::Skipped(Diagnostic::UnsupportedTopLevel {
                file: path.to_path_buf(),
                found: json_kind(&other).to_owned(),
            });
        }
    };

    trace!(file = %path.display(), entries = entries.len(), "parsed capture file");
    FileOutcome::Loaded {
        capture: CaptureFile {
            path: path.to_path_buf(),
            entries,
        },
        diagnostics,
    }
}
