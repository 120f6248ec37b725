use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::{CanonicalDeviceRecord, RecordNormalizer};
use crate::error::{ScanError, ScanResult};

use super::aggregator::Aggregates;
use super::cache::{ResultCache, fingerprint_directory};
use super::cleaned::{CleanedFile, write_cleaned_all};
use super::collector::{CollectedFiles, FileCollector};
use super::diagnostics::Diagnostic;
use super::engine_config::ScanEngineConfig;
use super::route::{Route, RouteReconstructor};
use super::spatial::SpatialSummary;

/// Everything one directory pass produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanReport {
    pub generated_at: DateTime<Utc>,
    pub files_scanned: usize,
    pub entries_seen: usize,
    pub records: Vec<CanonicalDeviceRecord>,
    pub aggregates: Aggregates,
    /// `None` when no record carried a valid location.
    pub spatial: Option<SpatialSummary>,
    pub routes: Vec<Route>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ScanReport {
    /// Spatial summary, or [`ScanError::InsufficientData`] when there is none.
    pub fn require_spatial(&self) -> ScanResult<&SpatialSummary> {
        self.spatial.as_ref().ok_or_else(|| {
            ScanError::InsufficientData("no valid coordinates found in the data".to_owned())
        })
    }

    /// Records, or [`ScanError::InsufficientData`] when none normalized.
    pub fn require_records(&self) -> ScanResult<&[CanonicalDeviceRecord]> {
        if self.records.is_empty() {
            return Err(ScanError::InsufficientData(
                "no entry in the input carried an SSID".to_owned(),
            ));
        }
        Ok(&self.records)
    }

    /// Number of files skipped entirely.
    #[must_use]
    pub fn skipped_files(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|diagnostic| diagnostic.skips_file())
            .count()
    }
}

/// Runs collection, normalization, aggregation and route reconstruction over one directory.
#[derive(Debug, Clone)]
pub struct ScanEngine {
    config: ScanEngineConfig,
    collector: FileCollector,
    normalizer: RecordNormalizer,
    reconstructor: RouteReconstructor,
}

impl ScanEngine {
    pub fn new(config: ScanEngineConfig) -> ScanResult<Self> {
        config.validate()?;
        let collector = FileCollector::new(config.collector.clone());
        let normalizer = RecordNormalizer::default();
        let reconstructor = RouteReconstructor::new(normalizer.clone(), config.jump_threshold_km)?;
        Ok(Self {
            config,
            collector,
            normalizer,
            reconstructor,
        })
    }

    #[must_use]
    pub fn config(&self) -> &ScanEngineConfig {
        &self.config
    }

    #[must_use]
    pub fn collector(&self) -> &FileCollector {
        &self.collector
    }

    #[must_use]
    pub fn normalizer(&self) -> &RecordNormalizer {
        &self.normalizer
    }

    pub fn collect(&self) -> ScanResult<CollectedFiles> {
        self.collector.collect_files(&self.config.input_dir)
    }

    /// Full pass. Writes cleaned copies first when an output directory is configured.
    pub fn run(&self) -> ScanResult<ScanReport> {
        if let Some(output_dir) = &self.config.cleaned_output_dir {
            self.ensure_outside_input(output_dir)?;
        }
        let collected = self.collect()?;
        if let Some(output_dir) = &self.config.cleaned_output_dir {
            write_cleaned_all(&self.normalizer, &collected.files, output_dir)?;
        }
        Ok(self.report_from(collected))
    }

    /// Same as [`run`](Self::run), reusing `cache` while the input listing is unchanged.
    pub fn run_cached(&self, cache: &mut ResultCache<ScanReport>) -> ScanResult<ScanReport> {
        let key = fingerprint_directory(&self.collector, &self.config.input_dir)?;
        cache.get_or_try_insert_with(key, Utc::now(), || self.run())
    }

    /// Writes cleaned copies of every capture file to `output_dir`.
    ///
    /// `output_dir` must not be the input directory: the copies follow the
    /// capture naming convention and would be collected on the next pass.
    pub fn write_cleaned(&self, output_dir: &Path) -> ScanResult<Vec<CleanedFile>> {
        self.ensure_outside_input(output_dir)?;
        let collected = self.collect()?;
        write_cleaned_all(&self.normalizer, &collected.files, output_dir)
    }

    // Collection is not recursive, so only the input directory itself conflicts.
    fn ensure_outside_input(&self, output_dir: &Path) -> ScanResult<()> {
        let input_dir = &self.config.input_dir;
        let same = match (fs::canonicalize(input_dir), fs::canonicalize(output_dir)) {
            (Ok(input), Ok(output)) => input == output,
            _ => input_dir == output_dir,
        };
        if same {
            return Err(ScanError::InvalidConfig(format!(
                "cleaned output dir `{}` must differ from the input dir",
                output_dir.display()
            )));
        }
        Ok(())
    }

    /// Routes only, one per capture file.
    pub fn routes(&self) -> ScanResult<(Vec<Route>, Vec<Diagnostic>)> {
        let collected = self.collect()?;
        let mut diagnostics = collected.diagnostics;
        let mut routes = Vec::with_capacity(collected.files.len());
        for outcome in self.reconstructor.reconstruct_all(&collected.files) {
            routes.push(outcome.route);
            diagnostics.extend(outcome.diagnostics);
        }
        Ok((routes, diagnostics))
    }

    /// Builds a report from already-collected files.
    #[must_use]
    pub fn report_from(&self, collected: CollectedFiles) -> ScanReport {
        let entries_seen = collected.entry_count();
        let mut diagnostics = collected.diagnostics;

        let records: Vec<CanonicalDeviceRecord> = collected
            .files
            .iter()
            .flat_map(|capture| self.normalizer.normalize_all(&capture.entries))
            .collect();
        debug!(
            entries = entries_seen,
            records = records.len(),
            "normalized capture entries"
        );

        let aggregates = Aggregates::compute(&records);
        let spatial = SpatialSummary::from_records(&records).ok();

        let mut routes = Vec::with_capacity(collected.files.len());
        for outcome in self.reconstructor.reconstruct_all(&collected.files) {
            routes.push(outcome.route);
            diagnostics.extend(outcome.diagnostics);
        }

        info!(
            files = collected.files.len(),
            records = records.len(),
            routes = routes.len(),
            diagnostics = diagnostics.len(),
            "scan pass complete"
        );

        ScanReport {
            generated_at: Utc::now(),
            files_scanned: collected.files.len(),
            entries_seen,
            records,
            aggregates,
            spatial,
            routes,
            diagnostics,
        }
    }
}
