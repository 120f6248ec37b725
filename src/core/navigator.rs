//! Tolerant field lookup into arbitrarily shaped capture entries.
//!
//! The same logical field lives under different keys across export variants,
//! so every lookup takes an ordered list of candidate [`KeyPath`]s and returns
//! the first one that resolves. Missing keys, wrong container shapes and empty
//! sequences all mean "not found"; nothing here returns an error.

use serde_json::Value;
use smallvec::SmallVec;

use super::types::RawEntry;

/// One step of a key-path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathSegment {
    /// Member of an object.
    Key(&'static str),
    /// Element of a sequence.
    Index(usize),
    /// First element of a sequence, or first value of an object-shaped map.
    First,
}

/// Ordered path from the entry root to a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPath {
    segments: SmallVec<[PathSegment; 6]>,
}

impl KeyPath {
    #[must_use]
    pub fn new(segments: &[PathSegment]) -> Self {
        Self {
            segments: SmallVec::from_slice(segments),
        }
    }

    /// Path made of object keys only.
    #[must_use]
    pub fn keys(keys: &[&'static str]) -> Self {
        Self {
            segments: keys.iter().map(|key| PathSegment::Key(*key)).collect(),
        }
    }

    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Walks the path from `entry`, returning `None` at the first step that does not fit.
    #[must_use]
    pub fn resolve<'a>(&self, entry: &'a RawEntry) -> Option<&'a Value> {
        let (first, rest) = self.segments.split_first()?;
        let mut current = match first {
            PathSegment::Key(key) => entry.get(*key)?,
            PathSegment::Index(_) => return None,
            PathSegment::First => entry.values().next()?,
        };
        for segment in rest {
            current = step(current, *segment)?;
        }
        Some(current)
    }
}

fn step(value: &Value, segment: PathSegment) -> Option<&Value> {
    match (segment, value) {
        (PathSegment::Key(key), Value::Object(map)) => map.get(key),
        (PathSegment::Index(index), Value::Array(items)) => items.get(index),
        (PathSegment::First, Value::Array(items)) => items.first(),
        (PathSegment::First, Value::Object(map)) => map.values().next(),
        _ => None,
    }
}

/// Returns the first value reachable through `paths`, skipping `null`s.
#[must_use]
pub fn resolve_first<'a>(entry: &'a RawEntry, paths: &[KeyPath]) -> Option<&'a Value> {
    paths
        .iter()
        .filter_map(|path| path.resolve(entry))
        .find(|value| !value.is_null())
}

/// Returns the first value for which `extract` succeeds.
pub fn resolve_with<'a, T>(
    entry: &'a RawEntry,
    paths: &[KeyPath],
    mut extract: impl FnMut(&'a Value) -> Option<T>,
) -> Option<T> {
    paths
        .iter()
        .filter_map(|path| path.resolve(entry))
        .find_map(|value| extract(value))
}

/// Same as [`resolve_with`], with a caller-supplied fallback.
pub fn resolve_or<'a, T>(
    entry: &'a RawEntry,
    paths: &[KeyPath],
    default: T,
    extract: impl FnMut(&'a Value) -> Option<T>,
) -> T {
    resolve_with(entry, paths, extract).unwrap_or(default)
}

/// Resolves a non-blank text value. Numbers are rendered as text.
#[must_use]
pub fn resolve_str(entry: &RawEntry, paths: &[KeyPath]) -> Option<String> {
    resolve_with(entry, paths, value_as_text)
}

/// Resolves a `(longitude, latitude)` pair without range validation.
#[must_use]
pub fn resolve_coordinates(entry: &RawEntry, paths: &[KeyPath]) -> Option<(f64, f64)> {
    resolve_with(entry, paths, value_as_lon_lat)
}

/// Text view of a scalar: trimmed non-blank strings and numbers.
#[must_use]
pub fn value_as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => {
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_owned())
        }
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// Accepts `[lon, lat, ...]` arrays and `{"lon": .., "lat": ..}` objects.
#[must_use]
pub fn value_as_lon_lat(value: &Value) -> Option<(f64, f64)> {
    match value {
        Value::Array(items) if items.len() >= 2 => {
            Some((items[0].as_f64()?, items[1].as_f64()?))
        }
        Value::Object(map) => {
            let lon = map.get("lon").or_else(|| map.get("longitude"))?.as_f64()?;
            let lat = map.get("lat").or_else(|| map.get("latitude"))?.as_f64()?;
            Some((lon, lat))
        }
        _ => None,
    }
}
