use serde::{Deserialize, Serialize};

use crate::core::{CanonicalDeviceRecord, GeoPoint, mean_center};
use crate::error::{ScanError, ScanResult};

/// One device position to pin on a map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapMarker {
    pub location: GeoPoint,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Map center plus every located device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpatialSummary {
    pub map_center: GeoPoint,
    pub markers: Vec<MapMarker>,
}

impl SpatialSummary {
    /// Builds the summary from records with a valid location.
    ///
    /// Returns [`ScanError::InsufficientData`] when no record carries one, so
    /// callers can show a "no data" message instead of an empty map.
    pub fn from_records(records: &[CanonicalDeviceRecord]) -> ScanResult<Self> {
        let markers: Vec<MapMarker> = records
            .iter()
            .filter_map(|record| {
                record.location.map(|location| MapMarker {
                    location,
                    label: Some(record.ssid.clone()),
                })
            })
            .collect();
        Self::from_markers(markers)
    }

    /// Builds the summary from pre-made markers.
    pub fn from_markers(markers: Vec<MapMarker>) -> ScanResult<Self> {
        let points: Vec<GeoPoint> = markers.iter().map(|marker| marker.location).collect();
        let map_center = mean_center(&points).ok_or_else(|| {
            ScanError::InsufficientData("no valid coordinates found in the data".to_owned())
        })?;
        Ok(Self {
            map_center,
            markers,
        })
    }
}
