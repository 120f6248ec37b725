use std::fs;
use std::path::Path;

use serde_json::Value;
use wardrive_rs::ScanError;
use wardrive_rs::api::{
    CollectorConfig, FileCollector, cleaned_file_name, read_records, write_cleaned_all,
};
use wardrive_rs::core::{RawEntry, RecordNormalizer};

const NESTED_CAPTURE: &str = r#"[
  {
    "dot11.device": {
      "dot11.device.advertised_ssid_map": [
        {
          "dot11.advertisedssid.ssid": "telenet-42",
          "dot11.advertisedssid.crypt_string": "WPA2 PSK AES-CCMP",
          "dot11.advertisedssid.channel": "11",
          "dot11.advertisedssid.ht_mode": "HT20",
          "dot11.advertisedssid.location": {
            "kismet.common.location.avg_loc": {
              "kismet.common.location.geopoint": [4.35, 50.85]
            }
          }
        }
      ]
    }
  },
  {
    "dot11.device": {
      "dot11.device.probed_ssid_map": [
        { "dot11.probedssid.ssid": "Galaxy A52" }
      ]
    }
  },
  { "kismet.device.base.macaddr": "00:11:22:33:44:55" }
]"#;

#[test]
fn cleaned_name_appends_suffix_to_stem() {
    let output = cleaned_file_name(Path::new("/in/Kismet-2024.json"), Path::new("/out"));
    assert_eq!(output, Path::new("/out/Kismet-2024-cleaned.json"));
}

#[test]
fn cleaned_copies_renormalize_to_the_same_records() {
    let input = tempfile::tempdir().expect("input dir");
    let output = tempfile::tempdir().expect("output dir");
    fs::write(input.path().join("walk.json"), NESTED_CAPTURE).expect("write capture");

    let normalizer = RecordNormalizer::default();
    let collected = FileCollector::default()
        .collect_files(input.path())
        .expect("collect");
    let written =
        write_cleaned_all(&normalizer, &collected.files, output.path()).expect("write cleaned");
    assert_eq!(written.len(), 1);
    assert_eq!(written[0].records, 2);
    assert_eq!(written[0].output, output.path().join("walk-cleaned.json"));

    let original = normalizer.normalize_all(&collected.files[0].entries);

    // Typed read-back.
    let typed = read_records(&written[0].output).expect("read cleaned");
    assert_eq!(typed, original);

    // The cleaned copy is itself a valid capture in the flattened layout.
    let recollected = FileCollector::new(CollectorConfig::default())
        .collect(output.path())
        .expect("recollect");
    assert_eq!(normalizer.normalize_all(&recollected.entries), original);
}

#[test]
fn cleaned_copy_spells_absent_fields_as_unknown() {
    let input = tempfile::tempdir().expect("input dir");
    let output = tempfile::tempdir().expect("output dir");
    fs::write(input.path().join("walk.json"), NESTED_CAPTURE).expect("write capture");

    let collected = FileCollector::default()
        .collect_files(input.path())
        .expect("collect");
    let written = write_cleaned_all(&RecordNormalizer::default(), &collected.files, output.path())
        .expect("write cleaned");
    let text = fs::read_to_string(&written[0].output).expect("read");
    let rows: Vec<RawEntry> = serde_json::from_str(&text).expect("json rows");

    assert_eq!(rows[0]["location"], serde_json::json!([4.35, 50.85]));
    assert_eq!(rows[1]["ssid"], Value::from("Galaxy A52"));
    assert_eq!(rows[1]["encryption"], Value::from("Unknown"));
    assert_eq!(rows[1]["bandwidth"], Value::from("Unknown"));
    assert_eq!(rows[1]["location"], Value::Null);
}

#[test]
fn output_directory_is_created() {
    let input = tempfile::tempdir().expect("input dir");
    let output = tempfile::tempdir().expect("output root");
    let nested = output.path().join("a").join("b");
    fs::write(input.path().join("x.json"), "[]").expect("write capture");
    let collected = FileCollector::default()
        .collect_files(input.path())
        .expect("collect");
    let written =
        write_cleaned_all(&RecordNormalizer::default(), &collected.files, &nested).expect("write");
    assert_eq!(written[0].records, 0);
    assert_eq!(fs::read_to_string(&written[0].output).expect("read"), "[]\n");
}

#[test]
fn cleaned_copy_with_blank_ssid_is_invalid_data() {
    let dir = tempfile::tempdir().expect("tempdir");
    for (name, body) in [
        ("empty.json", r#"[{"ssid": ""}]"#),
        ("blank.json", r#"[{"ssid": "ok"}, {"ssid": "   "}]"#),
        ("missing.json", r#"[{"channel": "6"}]"#),
    ] {
        let path = dir.path().join(name);
        fs::write(&path, body).expect("write cleaned copy");
        assert!(
            matches!(read_records(&path), Err(ScanError::InvalidData(_))),
            "{name} must be rejected"
        );
    }
}
