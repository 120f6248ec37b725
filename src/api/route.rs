//! Jump-filtered path reconstruction for a single capture file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::{GeoPoint, RawEntry, RecordNormalizer, RoutePoint, geodesic_distance_km};
use crate::error::{ScanError, ScanResult};

use super::collector::CaptureFile;
use super::diagnostics::Diagnostic;

/// Largest plausible distance between consecutive route points.
pub const DEFAULT_JUMP_THRESHOLD_KM: f64 = 50.0;

/// Ordered points of one capture session, in source file order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub source: PathBuf,
    /// Serialized as `[longitude, latitude]` pairs, the order capture files use.
    pub points: Vec<RoutePoint>,
}

impl Route {
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Sum of consecutive geodesic distances, in kilometres.
    #[must_use]
    pub fn length_km(&self) -> f64 {
        self.points
            .windows(2)
            .map(|pair| geodesic_distance_km(pair[0], pair[1]))
            .sum()
    }
}

/// Accept/reject state machine over a stream of candidate points.
///
/// The anchor is the last accepted point. A rejected candidate never becomes
/// the anchor, even when every later candidate is also rejected.
#[derive(Debug, Clone)]
pub struct RouteBuilder {
    threshold_km: f64,
    previous: Option<RoutePoint>,
    accepted: Vec<RoutePoint>,
}

/// Outcome of offering one candidate to a [`RouteBuilder`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    Accepted,
    Rejected {
        anchor: RoutePoint,
        distance_km: f64,
    },
}

impl RouteBuilder {
    pub fn new(threshold_km: f64) -> ScanResult<Self> {
        if !threshold_km.is_finite() || threshold_km <= 0.0 {
            return Err(ScanError::InvalidConfig(format!(
                "jump threshold must be finite and > 0, got {threshold_km}"
            )));
        }
        Ok(Self {
            threshold_km,
            previous: None,
            accepted: Vec::new(),
        })
    }

    #[must_use]
    pub fn anchor(&self) -> Option<RoutePoint> {
        self.previous
    }

    pub fn offer(&mut self, candidate: RoutePoint) -> Step {
        if let Some(anchor) = self.previous {
            let distance_km = geodesic_distance_km(anchor, candidate);
            if distance_km > self.threshold_km {
                return Step::Rejected {
                    anchor,
                    distance_km,
                };
            }
        }
        self.accepted.push(candidate);
        self.previous = Some(candidate);
        Step::Accepted
    }

    #[must_use]
    pub fn finish(self) -> Vec<RoutePoint> {
        self.accepted
    }
}

/// Route plus the problems met while building it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteOutcome {
    pub route: Route,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone)]
pub struct RouteReconstructor {
    normalizer: RecordNormalizer,
    threshold_km: f64,
}

impl RouteReconstructor {
    pub fn new(normalizer: RecordNormalizer, threshold_km: f64) -> ScanResult<Self> {
        RouteBuilder::new(threshold_km)?;
        Ok(Self {
            normalizer,
            threshold_km,
        })
    }

    #[must_use]
    pub fn threshold_km(&self) -> f64 {
        self.threshold_km
    }

    /// Builds the route for one file's entries, in their order.
    ///
    /// Entries without a location are skipped silently; out-of-range
    /// coordinates and rejected jumps are reported.
    #[must_use]
    pub fn reconstruct(&self, source: &Path, entries: &[RawEntry]) -> RouteOutcome {
        let mut builder = RouteBuilder {
            threshold_km: self.threshold_km,
            previous: None,
            accepted: Vec::new(),
        };
        let mut diagnostics = Vec::new();

        for (index, entry) in entries.iter().enumerate() {
            let Some((longitude, latitude)) = self.normalizer.resolve_raw_coordinates(entry) else {
                continue;
            };
            let Ok(candidate) = GeoPoint::from_lon_lat(longitude, latitude) else {
                diagnostics.push(Diagnostic::InvalidCoordinate {
                    file: source.to_path_buf(),
                    index,
                    longitude,
                    latitude,
                });
                continue;
            };

            if let Step::Rejected {
                anchor,
                distance_km,
            } = builder.offer(candidate)
            {
                warn!(
                    file = %source.display(),
                    index,
                    from_lat = anchor.latitude,
                    from_lon = anchor.longitude,
                    to_lat = candidate.latitude,
                    to_lon = candidate.longitude,
                    distance_km,
                    "rejected implausible route jump"
                );
                diagnostics.push(Diagnostic::JumpRejected {
                    file: source.to_path_buf(),
                    index,
                    from: anchor,
                    to: candidate,
                    distance_km,
                });
            }
        }

        let points = builder.finish();
        debug!(
            file = %source.display(),
            entries = entries.len(),
            points = points.len(),
            "reconstructed route"
        );
        RouteOutcome {
            route: Route {
                source: source.to_path_buf(),
                points,
            },
            diagnostics,
        }
    }

    #[must_use]
    pub fn reconstruct_file(&self, capture: &CaptureFile) -> RouteOutcome {
        self.reconstruct(&capture.path, &capture.entries)
    }

    /// One route per file; files are never merged or checked against each other.
    #[must_use]
    pub fn reconstruct_all(&self, captures: &[CaptureFile]) -> Vec<RouteOutcome> {
        captures
            .iter()
            .map(|capture| self.reconstruct_file(capture))
            .collect()
    }
}

impl Default for RouteReconstructor {
    fn default() -> Self {
        Self {
            normalizer: RecordNormalizer::default(),
            threshold_km: DEFAULT_JUMP_THRESHOLD_KM,
        }
    }
}

/// Filters an already-resolved point sequence with the same jump policy.
pub fn filter_jumps(points: &[RoutePoint], threshold_km: f64) -> ScanResult<Vec<RoutePoint>> {
    let mut builder = RouteBuilder::new(threshold_km)?;
    for point in points {
        builder.offer(*point);
    }
    Ok(builder.finish())
}
