use serde::{Deserialize, Serialize};

use crate::error::{ScanError, ScanResult};

use super::route::Route;
use super::ScanReport;

pub const SCAN_REPORT_JSON_SCHEMA_V1: u32 = 1;
pub const ROUTES_JSON_SCHEMA_V1: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanReportJsonContractV1 {
    pub schema_version: u32,
    pub report: ScanReport,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutesJsonContractV1 {
    pub schema_version: u32,
    pub routes: Vec<Route>,
}

impl ScanReport {
    pub fn to_json_contract_v1_pretty(&self) -> ScanResult<String> {
        let payload = ScanReportJsonContractV1 {
            schema_version: SCAN_REPORT_JSON_SCHEMA_V1,
            report: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            ScanError::InvalidData(format!("failed to serialize report contract v1: {e}"))
        })
    }

    /// Accepts either a bare report or a versioned contract payload.
    pub fn from_json_compat_str(input: &str) -> ScanResult<Self> {
        if let Ok(report) = serde_json::from_str::<ScanReport>(input) {
            return Ok(report);
        }
        let payload: ScanReportJsonContractV1 = serde_json::from_str(input).map_err(|e| {
            ScanError::InvalidData(format!("failed to parse report json payload: {e}"))
        })?;
        if payload.schema_version != SCAN_REPORT_JSON_SCHEMA_V1 {
            return Err(ScanError::InvalidData(format!(
                "unsupported report schema version: {}",
                payload.schema_version
            )));
        }
        Ok(payload.report)
    }
}

/// Serializes routes wrapped in the versioned contract.
pub fn routes_to_json_contract_v1_pretty(routes: &[Route]) -> ScanResult<String> {
    let payload = RoutesJsonContractV1 {
        schema_version: ROUTES_JSON_SCHEMA_V1,
        routes: routes.to_vec(),
    };
    serde_json::to_string_pretty(&payload).map_err(|e| {
        ScanError::InvalidData(format!("failed to serialize routes contract v1: {e}"))
    })
}
