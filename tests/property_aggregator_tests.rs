use proptest::prelude::*;
use wardrive_rs::api::{FieldSelector, aggregate};
use wardrive_rs::core::CanonicalDeviceRecord;

fn record_strategy() -> impl Strategy<Value = CanonicalDeviceRecord> {
    let encryption = prop::option::of(prop::sample::select(vec![
        "WPA2 PSK AES-CCMP",
        "WPA3 SAE",
        "WPA TKIP",
        "WEP",
        "Open",
        "802.1X",
        "",
    ]));
    let channel = prop::option::of(prop::sample::select(vec!["1", "6", "11", "36", "149"]));
    let bandwidth = prop::option::of(prop::sample::select(vec![
        "HT20", "HT40-", "HT80", "VHT", "HE", "EHT", "bogus",
    ]));
    let ssid = prop::sample::select(vec!["eduroam", "bbox-1", "iPhone", "home", "VOO-9"]);
    (ssid, encryption, channel, bandwidth).prop_map(|(ssid, encryption, channel, bandwidth)| {
        CanonicalDeviceRecord {
            ssid: ssid.to_owned(),
            encryption: encryption.map(str::to_owned),
            channel: channel.map(str::to_owned),
            location: None,
            bandwidth_token: bandwidth.map(str::to_owned),
        }
    })
}

proptest! {
    #[test]
    fn aggregate_is_idempotent(records in prop::collection::vec(record_strategy(), 0..64)) {
        for selector in FieldSelector::ALL {
            prop_assert_eq!(aggregate(&records, selector), aggregate(&records, selector));
        }
    }

    #[test]
    fn single_label_counts_sum_to_record_count(
        records in prop::collection::vec(record_strategy(), 0..64)
    ) {
        for selector in FieldSelector::ALL {
            if selector.is_multi_label() {
                continue;
            }
            let counts = aggregate(&records, selector);
            prop_assert_eq!(counts.total(), records.len() as u64);
        }
    }

    #[test]
    fn aggregate_ignores_record_order(
        records in prop::collection::vec(record_strategy(), 0..64)
    ) {
        let mut reversed = records.clone();
        reversed.reverse();
        for selector in FieldSelector::ALL {
            prop_assert_eq!(aggregate(&records, selector), aggregate(&reversed, selector));
        }
    }

    #[test]
    fn without_unknown_only_drops_the_unknown_bucket(
        records in prop::collection::vec(record_strategy(), 0..64)
    ) {
        let counts = aggregate(&records, FieldSelector::Bandwidth);
        let known = counts.without_unknown();
        prop_assert_eq!(known.total() + counts.get("Unknown"), counts.total());
        prop_assert_eq!(known.get("Unknown"), 0);
    }
}
