use super::types::UNKNOWN;

/// Coarse protocol whitelist in match priority order.
///
/// `WPA2` and `WPA3` precede `WPA` so the shorter token never masks the
/// more specific one during substring matching.
pub const PROTOCOL_WHITELIST: [&str; 5] = ["WPA2", "WPA3", "WEP", "WPA", "OPEN"];

/// Label for encryption strings that match no whitelist entry.
pub const OTHER: &str = "Other";

/// Returns the first whitelist protocol contained in `raw` (case-insensitive),
/// or [`OTHER`] when none is.
#[must_use]
pub fn classify_protocol(raw: &str) -> &'static str {
    let upper = raw.to_ascii_uppercase();
    PROTOCOL_WHITELIST
        .iter()
        .copied()
        .find(|token| upper.contains(token))
        .unwrap_or(OTHER)
}

/// Same as [`classify_protocol`], mapping an absent field to [`UNKNOWN`].
#[must_use]
pub fn classify_optional_protocol(raw: Option<&str>) -> &'static str {
    raw.map_or(UNKNOWN, classify_protocol)
}

/// Whitespace-separated tokens of `raw` that are not themselves a whitelist protocol.
///
/// `"WPA2 PSK AES-CCMP"` yields `["PSK", "AES-CCMP"]`.
#[must_use]
pub fn suite_tokens(raw: &str) -> Vec<&str> {
    raw.split_whitespace()
        .filter(|token| {
            !PROTOCOL_WHITELIST
                .iter()
                .any(|protocol| token.eq_ignore_ascii_case(protocol))
        })
        .collect()
}
