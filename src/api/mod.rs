pub mod aggregator;
pub mod cache;
pub mod cleaned;
pub mod collector;
pub mod diagnostics;
pub mod engine;
pub mod engine_config;
pub mod json_contract;
pub mod route;
pub mod spatial;

pub use aggregator::{AggregateCount, Aggregates, FieldSelector, aggregate};
pub use cache::{DEFAULT_CACHE_TTL, Fingerprint, ResultCache, fingerprint_directory};
pub use cleaned::{
    CLEANED_SUFFIX, CleanedFile, cleaned_file_name, read_records, write_cleaned,
    write_cleaned_all, write_records,
};
pub use collector::{
    CaptureFile, CaptureFiles, CollectedEntries, CollectedFiles, CollectorConfig, FileCollector,
    FileOutcome, parse_capture_str, read_capture,
};
pub use diagnostics::Diagnostic;
pub use engine::{ScanEngine, ScanReport};
pub use engine_config::ScanEngineConfig;
pub use json_contract::{
    ROUTES_JSON_SCHEMA_V1, RoutesJsonContractV1, SCAN_REPORT_JSON_SCHEMA_V1,
    ScanReportJsonContractV1, routes_to_json_contract_v1_pretty,
};
pub use route::{
    DEFAULT_JUMP_THRESHOLD_KM, Route, RouteBuilder, RouteOutcome, RouteReconstructor, Step,
    filter_jumps,
};
pub use spatial::{MapMarker, SpatialSummary};
