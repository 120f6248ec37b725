use serde::{Deserialize, Serialize};

use super::types::UNKNOWN;

/// HT-mode tokens understood by the classifier.
///
/// The token spelling is fixed: `HT20`, `HT40`, `HT40-`, `HT40+`, `HT80`,
/// `VHT`, `HE`, `EHT`. Anything else is not a bandwidth token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HtMode {
    Ht20,
    Ht40,
    Ht40Minus,
    Ht40Plus,
    Ht80,
    Vht,
    He,
    Eht,
}

impl HtMode {
    pub const ALL: [Self; 8] = [
        Self::Ht20,
        Self::Ht40,
        Self::Ht40Minus,
        Self::Ht40Plus,
        Self::Ht80,
        Self::Vht,
        Self::He,
        Self::Eht,
    ];

    /// Exact match after trimming surrounding whitespace.
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim() {
            "HT20" => Some(Self::Ht20),
            "HT40" => Some(Self::Ht40),
            "HT40-" => Some(Self::Ht40Minus),
            "HT40+" => Some(Self::Ht40Plus),
            "HT80" => Some(Self::Ht80),
            "VHT" => Some(Self::Vht),
            "HE" => Some(Self::He),
            "EHT" => Some(Self::Eht),
            _ => None,
        }
    }

    #[must_use]
    pub fn token(self) -> &'static str {
        match self {
            Self::Ht20 => "HT20",
            Self::Ht40 => "HT40",
            Self::Ht40Minus => "HT40-",
            Self::Ht40Plus => "HT40+",
            Self::Ht80 => "HT80",
            Self::Vht => "VHT",
            Self::He => "HE",
            Self::Eht => "EHT",
        }
    }

    #[must_use]
    pub fn width_mhz(self) -> u32 {
        match self {
            Self::Ht20 => 20,
            Self::Ht40 | Self::Ht40Minus | Self::Ht40Plus => 40,
            Self::Ht80 | Self::Vht => 80,
            Self::He => 160,
            Self::Eht => 320,
        }
    }

    #[must_use]
    pub fn generation(self) -> &'static str {
        match self {
            Self::Ht20 | Self::Ht40 | Self::Ht40Minus | Self::Ht40Plus => "Wi-Fi 4",
            Self::Ht80 | Self::Vht => "Wi-Fi 5",
            Self::He => "Wi-Fi 6",
            Self::Eht => "Wi-Fi 7",
        }
    }
}

/// Channel width resolved from a raw token, or the explicit unknown case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Bandwidth {
    Mhz(u32),
    Unknown,
}

impl Bandwidth {
    #[must_use]
    pub fn mhz(self) -> Option<u32> {
        match self {
            Self::Mhz(value) => Some(value),
            Self::Unknown => None,
        }
    }

    /// Label used in count tables: the MHz value, or [`UNKNOWN`].
    #[must_use]
    pub fn label(self) -> String {
        match self {
            Self::Mhz(value) => value.to_string(),
            Self::Unknown => UNKNOWN.to_owned(),
        }
    }
}

/// Result of classifying one raw HT-mode token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BandwidthClass {
    pub bandwidth: Bandwidth,
    pub generation: &'static str,
}

impl BandwidthClass {
    pub const UNKNOWN: Self = Self {
        bandwidth: Bandwidth::Unknown,
        generation: UNKNOWN,
    };
}

/// Maps a raw HT-mode token to channel width and Wi-Fi generation.
///
/// Tokens outside the fixed table yield [`BandwidthClass::UNKNOWN`].
#[must_use]
pub fn classify_bandwidth(token: &str) -> BandwidthClass {
    HtMode::parse(token).map_or(BandwidthClass::UNKNOWN, |mode| BandwidthClass {
        bandwidth: Bandwidth::Mhz(mode.width_mhz()),
        generation: mode.generation(),
    })
}

/// Same as [`classify_bandwidth`] for an optional token.
#[must_use]
pub fn classify_optional_bandwidth(token: Option<&str>) -> BandwidthClass {
    token.map_or(BandwidthClass::UNKNOWN, classify_bandwidth)
}
