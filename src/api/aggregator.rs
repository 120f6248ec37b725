use std::cmp::Ordering;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::{
    CanonicalDeviceRecord, UNKNOWN, classify_optional_bandwidth, classify_optional_protocol,
    classify_provider, suite_tokens,
};

/// Category a record is counted under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldSelector {
    /// Coarse protocol from the whitelist, `Other` or `Unknown`.
    Protocol,
    /// Cipher/auth tokens beyond the coarse protocol. Multi-label.
    EncryptionSuite,
    Channel,
    /// Channel width in MHz.
    Bandwidth,
    /// Wi-Fi generation label.
    Generation,
    /// Provider bucket derived from the SSID.
    Provider,
}

impl FieldSelector {
    pub const ALL: [Self; 6] = [
        Self::Protocol,
        Self::EncryptionSuite,
        Self::Channel,
        Self::Bandwidth,
        Self::Generation,
        Self::Provider,
    ];

    /// `true` when one record may contribute zero or several labels.
    #[must_use]
    pub fn is_multi_label(self) -> bool {
        matches!(self, Self::EncryptionSuite)
    }

    /// Labels `record` is counted under for this selector.
    #[must_use]
    pub fn labels(self, record: &CanonicalDeviceRecord) -> Vec<String> {
        match self {
            Self::Protocol => {
                vec![classify_optional_protocol(record.encryption.as_deref()).to_owned()]
            }
            Self::EncryptionSuite => match record.encryption.as_deref() {
                Some(raw) => suite_tokens(raw).into_iter().map(str::to_owned).collect(),
                None => vec![UNKNOWN.to_owned()],
            },
            Self::Channel => vec![record.channel_label().to_owned()],
            Self::Bandwidth => {
                vec![
                    classify_optional_bandwidth(record.bandwidth_token.as_deref())
                        .bandwidth
                        .label(),
                ]
            }
            Self::Generation => {
                vec![
                    classify_optional_bandwidth(record.bandwidth_token.as_deref())
                        .generation
                        .to_owned(),
                ]
            }
            Self::Provider => vec![classify_provider(&record.ssid).to_owned()],
        }
    }
}

/// Label -> occurrence count, ordered by label for stable output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AggregateCount {
    counts: IndexMap<String, u64>,
}

impl AggregateCount {
    #[must_use]
    pub fn get(&self, label: &str) -> u64 {
        self.counts.get(label).copied().unwrap_or(0)
    }

    /// Sum over all buckets.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(label, count)| (label.as_str(), *count))
    }

    /// Copy without the [`UNKNOWN`] bucket, for charts that only show resolved values.
    #[must_use]
    pub fn without_unknown(&self) -> Self {
        Self {
            counts: self
                .counts
                .iter()
                .filter(|(label, _)| label.as_str() != UNKNOWN)
                .map(|(label, count)| (label.clone(), *count))
                .collect(),
        }
    }

    /// Buckets ordered by descending count, ties by label.
    #[must_use]
    pub fn sorted_by_count(&self) -> Vec<(String, u64)> {
        let mut pairs: Vec<(String, u64)> = self
            .counts
            .iter()
            .map(|(label, count)| (label.clone(), *count))
            .collect();
        pairs.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| compare_labels(&a.0, &b.0)));
        pairs
    }

    #[must_use]
    pub fn into_inner(self) -> IndexMap<String, u64> {
        self.counts
    }

    fn increment(&mut self, label: String) {
        *self.counts.entry(label).or_insert(0) += 1;
    }

    fn finish(mut self) -> Self {
        self.counts.sort_by(|a, _, b, _| compare_labels(a, b));
        self
    }
}

impl<'a> IntoIterator for &'a AggregateCount {
    type Item = (&'a String, &'a u64);
    type IntoIter = indexmap::map::Iter<'a, String, u64>;

    fn into_iter(self) -> Self::IntoIter {
        self.counts.iter()
    }
}

// Numeric labels (channels, MHz) sort numerically ahead of text labels.
fn compare_labels(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

/// Counts `records` under `selector`.
///
/// Pure and idempotent: the result depends only on the multiset of records.
/// For single-label selectors the counts sum to the number of records.
pub fn aggregate<'a>(
    records: impl IntoIterator<Item = &'a CanonicalDeviceRecord>,
    selector: FieldSelector,
) -> AggregateCount {
    let mut counts = AggregateCount::default();
    let mut seen = 0usize;
    for record in records {
        seen += 1;
        for label in selector.labels(record) {
            counts.increment(label);
        }
    }
    trace!(?selector, records = seen, buckets = counts.len(), "aggregated records");
    counts.finish()
}

/// Every provided selector computed over the same record set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aggregates {
    pub protocol: AggregateCount,
    pub encryption_suite: AggregateCount,
    pub channel: AggregateCount,
    pub bandwidth: AggregateCount,
    pub generation: AggregateCount,
    pub provider: AggregateCount,
}

impl Aggregates {
    #[must_use]
    pub fn compute(records: &[CanonicalDeviceRecord]) -> Self {
        Self {
            protocol: aggregate(records, FieldSelector::Protocol),
            encryption_suite: aggregate(records, FieldSelector::EncryptionSuite),
            channel: aggregate(records, FieldSelector::Channel),
            bandwidth: aggregate(records, FieldSelector::Bandwidth),
            generation: aggregate(records, FieldSelector::Generation),
            provider: aggregate(records, FieldSelector::Provider),
        }
    }

    #[must_use]
    pub fn get(&self, selector: FieldSelector) -> &AggregateCount {
        match selector {
            FieldSelector::Protocol => &self.protocol,
            FieldSelector::EncryptionSuite => &self.encryption_suite,
            FieldSelector::Channel => &self.channel,
            FieldSelector::Bandwidth => &self.bandwidth,
            FieldSelector::Generation => &self.generation,
            FieldSelector::Provider => &self.provider,
        }
    }
}
