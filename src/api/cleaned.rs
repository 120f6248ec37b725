//! Persisted normalized copies of capture files.
//!
//! Each input file gets one JSON array of canonical records, written to a
//! separate directory as `<stem>-cleaned.json`. The copy is a cache artifact:
//! it re-normalizes to the same records through the flattened layout.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::core::{CanonicalDeviceRecord, RecordNormalizer};
use crate::error::{ScanError, ScanResult};

use super::collector::CaptureFile;

/// Suffix appended to the input file stem.
pub const CLEANED_SUFFIX: &str = "-cleaned";

/// Output path for the cleaned copy of `input` inside `output_dir`.
#[must_use]
pub fn cleaned_file_name(input: &Path, output_dir: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "capture".to_owned());
    output_dir.join(format!("{stem}{CLEANED_SUFFIX}.json"))
}

/// One written cleaned copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanedFile {
    pub source: PathBuf,
    pub output: PathBuf,
    pub records: usize,
}

/// Normalizes `capture` and writes the result as pretty JSON.
pub fn write_cleaned(
    normalizer: &RecordNormalizer,
    capture: &CaptureFile,
    output_dir: &Path,
) -> ScanResult<CleanedFile> {
    let records = normalizer.normalize_all(&capture.entries);
    let output = cleaned_file_name(&capture.path, output_dir);
    write_records(&output, &records)?;
    debug!(
        source = %capture.path.display(),
        output = %output.display(),
        records = records.len(),
        "wrote cleaned copy"
    );
    Ok(CleanedFile {
        source: capture.path.clone(),
        output,
        records: records.len(),
    })
}

/// Writes a cleaned copy for every capture, creating `output_dir` if needed.
pub fn write_cleaned_all(
    normalizer: &RecordNormalizer,
    captures: &[CaptureFile],
    output_dir: &Path,
) -> ScanResult<Vec<CleanedFile>> {
    fs::create_dir_all(output_dir).map_err(|err| ScanError::io(output_dir, err))?;
    let written = captures
        .iter()
        .map(|capture| write_cleaned(normalizer, capture, output_dir))
        .collect::<ScanResult<Vec<_>>>()?;
    info!(
        output_dir = %output_dir.display(),
        files = written.len(),
        "cleaned copies saved"
    );
    Ok(written)
}

/// Serializes `records` to `path` as a pretty JSON array.
pub fn write_records(path: &Path, records: &[CanonicalDeviceRecord]) -> ScanResult<()> {
    let json = serde_json::to_string_pretty(records).map_err(|e| {
        ScanError::InvalidData(format!("failed to serialize cleaned records: {e}"))
    })?;
    fs::write(path, format!("{json}\n")).map_err(|err| ScanError::io(path, err))
}

/// Reads a cleaned copy back into records.
pub fn read_records(path: &Path) -> ScanResult<Vec<CanonicalDeviceRecord>> {
    let text = fs::read_to_string(path).map_err(|err| ScanError::io(path, err))?;
    serde_json::from_str(&text).map_err(|e| {
        ScanError::InvalidData(format!(
            "failed to parse cleaned records `{}`: {e}",
            path.display()
        ))
    })
}
