use super::types::UNKNOWN;

/// Known network-name fragments and the provider bucket they map to.
///
/// Order is priority: the first fragment found in an SSID wins.
pub const PROVIDER_FRAGMENTS: &[(&str, &str)] = &[
    ("eduroam", "eduroam"),
    ("proximus", "Proximus"),
    ("bbox", "Proximus"),
    ("telenet", "Telenet"),
    ("orange", "Orange"),
    ("voo", "VOO"),
    ("iphone", "Mobile hotspot"),
    ("android", "Mobile hotspot"),
    ("galaxy", "Mobile hotspot"),
];

/// Every bucket [`classify_provider`] can return, catch-all last.
#[must_use]
pub fn provider_labels() -> Vec<&'static str> {
    let mut labels: Vec<&'static str> = Vec::new();
    for (_, label) in PROVIDER_FRAGMENTS {
        if !labels.contains(label) {
            labels.push(*label);
        }
    }
    labels.push(UNKNOWN);
    labels
}

/// Case-insensitive substring classification of an SSID into a provider bucket.
#[must_use]
pub fn classify_provider(ssid: &str) -> &'static str {
    let lower = ssid.to_lowercase();
    PROVIDER_FRAGMENTS
        .iter()
        .find(|(fragment, _)| lower.contains(fragment))
        .map_or(UNKNOWN, |(_, label)| *label)
}
