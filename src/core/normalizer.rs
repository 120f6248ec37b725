//! Raw capture entry -> [`CanonicalDeviceRecord`].
//!
//! Two layouts are supported without configuration:
//! - the nested device export, where SSID details live in an advertised or
//!   probed SSID map (first entry wins, advertised before probed)
//! - a pre-flattened layout with `ssid`, `encryption`, `channel`,
//!   `location: [lon, lat]` and `bandwidth` at the top level
//!
//! Each field is resolved independently through its own ordered path list.

#[cfg(feature = "parallel-normalization")]
use rayon::prelude::*;

use std::sync::LazyLock;

use super::navigator::{KeyPath, PathSegment, resolve_str, resolve_with, value_as_lon_lat};
use super::types::{CanonicalDeviceRecord, GeoPoint, RawEntry, UNKNOWN};

const DEVICE: PathSegment = PathSegment::Key("dot11.device");
const ADVERTISED: PathSegment = PathSegment::Key("dot11.device.advertised_ssid_map");
const PROBED: PathSegment = PathSegment::Key("dot11.device.probed_ssid_map");
const FIRST: PathSegment = PathSegment::First;
const AVG_LOC: PathSegment = PathSegment::Key("kismet.common.location.avg_loc");
const LAST_LOC: PathSegment = PathSegment::Key("kismet.common.location.last");
const GEOPOINT: PathSegment = PathSegment::Key("kismet.common.location.geopoint");

fn advertised(field: &'static str) -> KeyPath {
    KeyPath::new(&[DEVICE, ADVERTISED, FIRST, PathSegment::Key(field)])
}

fn probed(field: &'static str) -> KeyPath {
    KeyPath::new(&[DEVICE, PROBED, FIRST, PathSegment::Key(field)])
}

fn located(mut prefix: Vec<PathSegment>, summary: PathSegment) -> KeyPath {
    prefix.extend([summary, GEOPOINT]);
    KeyPath::new(&prefix)
}

/// Ordered candidate paths for each logical field.
#[derive(Debug, Clone)]
pub struct FieldPaths {
    pub ssid: Vec<KeyPath>,
    pub encryption: Vec<KeyPath>,
    pub channel: Vec<KeyPath>,
    pub location: Vec<KeyPath>,
    pub bandwidth: Vec<KeyPath>,
}

impl Default for FieldPaths {
    fn default() -> Self {
        let advertised_location = vec![
            DEVICE,
            ADVERTISED,
            FIRST,
            PathSegment::Key("dot11.advertisedssid.location"),
        ];
        let probed_location = vec![
            DEVICE,
            PROBED,
            FIRST,
            PathSegment::Key("dot11.probedssid.location"),
        ];
        let device_location = vec![PathSegment::Key("kismet.device.base.location")];

        Self {
            ssid: vec![
                advertised("dot11.advertisedssid.ssid"),
                probed("dot11.probedssid.ssid"),
                KeyPath::keys(&["ssid"]),
            ],
            encryption: vec![
                advertised("dot11.advertisedssid.crypt_string"),
                probed("dot11.probedssid.crypt_string"),
                KeyPath::keys(&["kismet.device.base.crypt"]),
                KeyPath::keys(&["encryption"]),
            ],
            channel: vec![
                advertised("dot11.advertisedssid.channel"),
                probed("dot11.probedssid.channel"),
                KeyPath::keys(&["kismet.device.base.channel"]),
                KeyPath::keys(&["channel"]),
            ],
            location: vec![
                located(advertised_location.clone(), AVG_LOC),
                located(advertised_location, LAST_LOC),
                located(probed_location.clone(), AVG_LOC),
                located(probed_location, LAST_LOC),
                located(device_location.clone(), AVG_LOC),
                located(device_location, LAST_LOC),
                KeyPath::keys(&["location"]),
            ],
            bandwidth: vec![
                advertised("dot11.advertisedssid.ht_mode"),
                probed("dot11.probedssid.ht_mode"),
                KeyPath::keys(&["bandwidth"]),
            ],
        }
    }
}

static DEFAULT_NORMALIZER: LazyLock<RecordNormalizer> = LazyLock::new(RecordNormalizer::default);

/// Stateless normalizer; every call is independent of every other.
#[derive(Debug, Clone, Default)]
pub struct RecordNormalizer {
    paths: FieldPaths,
}

impl RecordNormalizer {
    #[must_use]
    pub fn new(paths: FieldPaths) -> Self {
        Self { paths }
    }

    #[must_use]
    pub fn paths(&self) -> &FieldPaths {
        &self.paths
    }

    /// Builds the canonical record for `entry`, or `None` when no SSID resolves.
    #[must_use]
    pub fn normalize(&self, entry: &RawEntry) -> Option<CanonicalDeviceRecord> {
        let ssid = resolve_str(entry, &self.paths.ssid)?;
        Some(CanonicalDeviceRecord {
            ssid,
            encryption: resolve_known(entry, &self.paths.encryption),
            channel: resolve_known(entry, &self.paths.channel),
            location: self.resolve_location(entry),
            bandwidth_token: resolve_known(entry, &self.paths.bandwidth),
        })
    }

    /// Valid location of `entry`, if any. Out-of-range and `[0, 0]` placeholders are absent.
    #[must_use]
    pub fn resolve_location(&self, entry: &RawEntry) -> Option<GeoPoint> {
        self.resolve_raw_coordinates(entry)
            .and_then(|(lon, lat)| GeoPoint::from_lon_lat(lon, lat).ok())
    }

    /// First coordinate pair found for `entry`, before range validation.
    ///
    /// Kismet writes `[0, 0]` when it never had a GPS fix; that placeholder is
    /// treated as no location at all.
    #[must_use]
    pub fn resolve_raw_coordinates(&self, entry: &RawEntry) -> Option<(f64, f64)> {
        resolve_with(entry, &self.paths.location, |value| {
            value_as_lon_lat(value).filter(|&(lon, lat)| !(lon == 0.0 && lat == 0.0))
        })
    }

    /// Normalizes a batch, dropping entries without an SSID. Output keeps input order.
    #[must_use]
    pub fn normalize_all(&self, entries: &[RawEntry]) -> Vec<CanonicalDeviceRecord> {
        #[cfg(feature = "parallel-normalization")]
        {
            entries
                .par_iter()
                .filter_map(|entry| self.normalize(entry))
                .collect()
        }

        #[cfg(not(feature = "parallel-normalization"))]
        {
            entries
                .iter()
                .filter_map(|entry| self.normalize(entry))
                .collect()
        }
    }
}

/// Normalizes `entry` with the built-in path table.
#[must_use]
pub fn normalize(entry: &RawEntry) -> Option<CanonicalDeviceRecord> {
    DEFAULT_NORMALIZER.normalize(entry)
}

// Cleaned copies spell absent fields as the unknown marker; read them back as absent.
fn resolve_known(entry: &RawEntry, paths: &[KeyPath]) -> Option<String> {
    resolve_str(entry, paths).filter(|value| value != UNKNOWN)
}
