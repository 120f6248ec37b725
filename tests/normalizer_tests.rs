use serde_json::{Value, json};
use wardrive_rs::core::{
    CanonicalDeviceRecord, FieldPaths, GeoPoint, KeyPath, RawEntry, RecordNormalizer, UNKNOWN,
    normalize,
};

fn entry(value: Value) -> RawEntry {
    match value {
        Value::Object(map) => map,
        other => panic!("fixture must be an object, got {other}"),
    }
}

fn nested_entry() -> RawEntry {
    entry(json!({
        "kismet.device.base.macaddr": "AA:BB:CC:DD:EE:FF",
        "dot11.device": {
            "dot11.device.advertised_ssid_map": [
                {
                    "dot11.advertisedssid.ssid": "eduroam",
                    "dot11.advertisedssid.crypt_string": "WPA2 PSK AES-CCMP",
                    "dot11.advertisedssid.channel": "36",
                    "dot11.advertisedssid.ht_mode": "HT80",
                    "dot11.advertisedssid.location": {
                        "kismet.common.location.avg_loc": {
                            "kismet.common.location.geopoint": [4.7005, 50.8798]
                        }
                    }
                },
                { "dot11.advertisedssid.ssid": "second" }
            ]
        }
    }))
}

fn flattened_entry() -> RawEntry {
    entry(json!({
        "ssid": "eduroam",
        "encryption": "WPA2 PSK AES-CCMP",
        "channel": "36",
        "location": [4.7005, 50.8798],
        "bandwidth": "HT80"
    }))
}

#[test]
fn nested_schema_resolves_every_field() {
    let record = normalize(&nested_entry()).expect("record");
    assert_eq!(record.ssid, "eduroam");
    assert_eq!(record.encryption.as_deref(), Some("WPA2 PSK AES-CCMP"));
    assert_eq!(record.channel.as_deref(), Some("36"));
    assert_eq!(record.bandwidth_token.as_deref(), Some("HT80"));
    let location = record.location.expect("location");
    assert_eq!(location.latitude, 50.8798);
    assert_eq!(location.longitude, 4.7005);
}

#[test]
fn flattened_and_nested_schemas_normalize_identically() {
    assert_eq!(normalize(&nested_entry()), normalize(&flattened_entry()));
}

#[test]
fn probed_map_is_used_when_nothing_is_advertised() {
    let raw = entry(json!({
        "dot11.device": {
            "dot11.device.advertised_ssid_map": [],
            "dot11.device.probed_ssid_map": {
                "1234": {
                    "dot11.probedssid.ssid": "Jan's iPhone",
                    "dot11.probedssid.crypt_string": "WPA3 SAE",
                    "dot11.probedssid.location": {
                        "kismet.common.location.last": {
                            "kismet.common.location.geopoint": [4.0, 51.0]
                        }
                    }
                }
            }
        },
        "kismet.device.base.channel": "6"
    }));
    let record = normalize(&raw).expect("record");
    assert_eq!(record.ssid, "Jan's iPhone");
    assert_eq!(record.encryption.as_deref(), Some("WPA3 SAE"));
    assert_eq!(record.channel.as_deref(), Some("6"));
    assert_eq!(
        record.location,
        Some(GeoPoint::new(51.0, 4.0).expect("point"))
    );
    assert_eq!(record.bandwidth_token, None);
}

#[test]
fn device_level_location_is_a_fallback() {
    let raw = entry(json!({
        "ssid": "HomeNet",
        "kismet.device.base.location": {
            "kismet.common.location.avg_loc": {
                "kismet.common.location.geopoint": [5.5, 50.5]
            }
        }
    }));
    let record = normalize(&raw).expect("record");
    assert_eq!(
        record.location,
        Some(GeoPoint::new(50.5, 5.5).expect("point"))
    );
}

#[test]
fn missing_ssid_yields_none_across_layouts() {
    let layouts = [
        json!({}),
        json!({ "encryption": "WPA2", "location": [4.0, 51.0] }),
        json!({ "ssid": "   " }),
        json!({ "ssid": null }),
        json!({ "dot11.device": {} }),
        json!({ "dot11.device": { "dot11.device.advertised_ssid_map": [] } }),
        json!({ "dot11.device": { "dot11.device.advertised_ssid_map": [
            { "dot11.advertisedssid.channel": "1" }
        ] } }),
        json!({ "dot11.device": "not-an-object" }),
    ];
    for layout in layouts {
        assert_eq!(normalize(&entry(layout.clone())), None, "layout {layout}");
    }
}

#[test]
fn missing_optional_fields_render_as_unknown() {
    let record = normalize(&entry(json!({ "ssid": "bare" }))).expect("record");
    assert_eq!(record, CanonicalDeviceRecord::new("bare"));
    assert_eq!(record.encryption_label(), UNKNOWN);
    assert_eq!(record.channel_label(), UNKNOWN);
    assert_eq!(record.bandwidth_label(), UNKNOWN);
}

#[test]
fn placeholder_and_out_of_range_locations_are_absent() {
    for location in [json!([0.0, 0.0]), json!([200.0, 51.0]), json!([4.0, 95.0]), json!("x")] {
        let raw = entry(json!({ "ssid": "s", "location": location.clone() }));
        let record = normalize(&raw).expect("record");
        assert_eq!(record.location, None, "location {location}");
    }
}

#[test]
fn numeric_channel_is_rendered_as_text() {
    let record = normalize(&entry(json!({ "ssid": "s", "channel": 11 }))).expect("record");
    assert_eq!(record.channel.as_deref(), Some("11"));
}

#[test]
fn unknown_marker_in_flattened_input_reads_as_absent() {
    let raw = entry(json!({
        "ssid": "s",
        "encryption": "Unknown",
        "channel": "Unknown",
        "bandwidth": "Unknown",
        "location": null
    }));
    assert_eq!(normalize(&raw), Some(CanonicalDeviceRecord::new("s")));
}

#[test]
fn custom_paths_replace_the_builtin_table() {
    let paths = FieldPaths {
        ssid: vec![KeyPath::keys(&["meta", "name"])],
        ..FieldPaths::default()
    };
    let normalizer = RecordNormalizer::new(paths);
    let raw = entry(json!({ "meta": { "name": "custom" }, "ssid": "ignored" }));
    assert_eq!(
        normalizer.normalize(&raw).map(|record| record.ssid),
        Some("custom".to_owned())
    );
}

#[test]
fn normalize_all_keeps_order_and_drops_ssidless_entries() {
    let entries = vec![
        entry(json!({ "ssid": "a" })),
        entry(json!({ "channel": "1" })),
        entry(json!({ "ssid": "b" })),
    ];
    let ssids: Vec<String> = RecordNormalizer::default()
        .normalize_all(&entries)
        .into_iter()
        .map(|record| record.ssid)
        .collect();
    assert_eq!(ssids, vec!["a", "b"]);
}

#[test]
fn navigator_resolvers_fall_back_in_order() {
    use wardrive_rs::core::{PathSegment, resolve_coordinates, resolve_or, value_as_text};

    let raw = entry(json!({
        "gps": { "lon": 4.5, "lat": 50.5 },
        "list": ["first", "second"]
    }));
    let coordinate_paths = [KeyPath::keys(&["missing"]), KeyPath::keys(&["gps"])];
    assert_eq!(resolve_coordinates(&raw, &coordinate_paths), Some((4.5, 50.5)));

    let second = KeyPath::new(&[PathSegment::Key("list"), PathSegment::Index(1)]);
    assert_eq!(
        resolve_or(&raw, &[second], String::new(), value_as_text),
        "second"
    );
    assert_eq!(
        resolve_or(&raw, &[KeyPath::keys(&["nope"])], UNKNOWN.to_owned(), value_as_text),
        UNKNOWN
    );
}
