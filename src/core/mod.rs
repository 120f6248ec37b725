pub mod bandwidth;
pub mod geodesy;
pub mod navigator;
pub mod normalizer;
pub mod protocol;
pub mod provider;
pub mod types;

pub use bandwidth::{
    Bandwidth, BandwidthClass, HtMode, classify_bandwidth, classify_optional_bandwidth,
};
pub use geodesy::{geodesic_distance_km, mean_center};
pub use navigator::{
    KeyPath, PathSegment, resolve_coordinates, resolve_first, resolve_or, resolve_str,
    resolve_with, value_as_lon_lat, value_as_text,
};
pub use normalizer::{FieldPaths, RecordNormalizer, normalize};
pub use protocol::{
    OTHER, PROTOCOL_WHITELIST, classify_optional_protocol, classify_protocol, suite_tokens,
};
pub use provider::{PROVIDER_FRAGMENTS, classify_provider, provider_labels};
pub use types::{
    CanonicalDeviceRecord, GeoPoint, RawEntry, RoutePoint, UNKNOWN, is_valid_coordinate,
};
