//! wardrive-rs: normalization, aggregation and route reconstruction for
//! wireless-scan capture exports.
//!
//! Capture tools export one JSON document per session, describing every radio
//! device they saw. The layout differs between exporters and versions; this
//! crate turns those documents into one canonical device record, counts the
//! records by category for charting, and rebuilds a jump-filtered path per
//! capture file for mapping.
//!
//! The split follows the data flow:
//! - [`core`]: schema navigation, classifiers, geodesy and the record normalizer
//! - [`api`]: directory collection, aggregation, routes, spatial summary,
//!   cleaned copies, the result cache and the [`ScanEngine`] façade

pub mod api;
pub mod core;
pub mod error;
pub mod telemetry;

pub use api::{ScanEngine, ScanEngineConfig, ScanReport};
pub use error::{ScanError, ScanResult};
