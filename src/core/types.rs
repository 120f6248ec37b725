use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{ScanError, ScanResult};

/// Explicit marker rendered in place of a field that did not resolve.
pub const UNKNOWN: &str = "Unknown";

/// One device observation exactly as it appears in a capture export.
pub type RawEntry = serde_json::Map<String, serde_json::Value>;

/// WGS-84 position.
///
/// Capture exports store positions as `[longitude, latitude]`; the JSON form
/// of this type follows that order so cleaned copies match their sources.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(into = "[f64; 2]", try_from = "[f64; 2]")]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// A position on a reconstructed route.
pub type RoutePoint = GeoPoint;

impl GeoPoint {
    /// Builds a validated point.
    ///
    /// Invariants:
    /// - both components are finite
    /// - `latitude` is within `[-90, 90]`
    /// - `longitude` is within `[-180, 180]`
    pub fn new(latitude: f64, longitude: f64) -> ScanResult<Self> {
        if !is_valid_coordinate(latitude, longitude) {
            return Err(ScanError::InvalidData(format!(
                "coordinate out of range: lat={latitude}, lon={longitude}"
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Builds a point from the `[longitude, latitude]` order used by capture files.
    pub fn from_lon_lat(longitude: f64, latitude: f64) -> ScanResult<Self> {
        Self::new(latitude, longitude)
    }

    #[must_use]
    pub fn to_lon_lat(self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }
}

#[must_use]
pub fn is_valid_coordinate(latitude: f64, longitude: f64) -> bool {
    latitude.is_finite()
        && longitude.is_finite()
        && (-90.0..=90.0).contains(&latitude)
        && (-180.0..=180.0).contains(&longitude)
}

impl From<GeoPoint> for [f64; 2] {
    fn from(point: GeoPoint) -> Self {
        point.to_lon_lat()
    }
}

impl TryFrom<[f64; 2]> for GeoPoint {
    type Error = ScanError;

    fn try_from(value: [f64; 2]) -> Result<Self, Self::Error> {
        Self::from_lon_lat(value[0], value[1])
    }
}

/// Schema-independent representation of one scanned device.
///
/// Only `ssid` is guaranteed. The optional fields render as [`UNKNOWN`]
/// through their accessors and in serialized form (`location` renders as `null`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalDeviceRecord {
    #[serde(deserialize_with = "deserialize_ssid")]
    pub ssid: String,
    #[serde(
        default,
        serialize_with = "serialize_unknown",
        deserialize_with = "deserialize_unknown"
    )]
    pub encryption: Option<String>,
    #[serde(
        default,
        serialize_with = "serialize_unknown",
        deserialize_with = "deserialize_unknown"
    )]
    pub channel: Option<String>,
    #[serde(default)]
    pub location: Option<GeoPoint>,
    #[serde(
        rename = "bandwidth",
        default,
        serialize_with = "serialize_unknown",
        deserialize_with = "deserialize_unknown"
    )]
    pub bandwidth_token: Option<String>,
}

impl CanonicalDeviceRecord {
    #[must_use]
    pub fn new(ssid: impl Into<String>) -> Self {
        Self {
            ssid: ssid.into(),
            encryption: None,
            channel: None,
            location: None,
            bandwidth_token: None,
        }
    }

    #[must_use]
    pub fn with_encryption(mut self, encryption: impl Into<String>) -> Self {
        self.encryption = Some(encryption.into());
        self
    }

    #[must_use]
    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = Some(channel.into());
        self
    }

    #[must_use]
    pub fn with_location(mut self, location: GeoPoint) -> Self {
        self.location = Some(location);
        self
    }

    #[must_use]
    pub fn with_bandwidth_token(mut self, token: impl Into<String>) -> Self {
        self.bandwidth_token = Some(token.into());
        self
    }

    #[must_use]
    pub fn encryption_label(&self) -> &str {
        self.encryption.as_deref().unwrap_or(UNKNOWN)
    }

    #[must_use]
    pub fn channel_label(&self) -> &str {
        self.channel.as_deref().unwrap_or(UNKNOWN)
    }

    #[must_use]
    pub fn bandwidth_label(&self) -> &str {
        self.bandwidth_token.as_deref().unwrap_or(UNKNOWN)
    }
}

fn serialize_unknown<S: Serializer>(
    value: &Option<String>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(value.as_deref().unwrap_or(UNKNOWN))
}

fn deserialize_unknown<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|text| !text.trim().is_empty() && text != UNKNOWN))
}

fn deserialize_ssid<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let ssid = String::deserialize(deserializer)?;
    if ssid.trim().is_empty() {
        return Err(serde::de::Error::custom("`ssid` must be non-empty"));
    }
    Ok(ssid)
}
