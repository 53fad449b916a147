//! Data types for metadata operations.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use serde_json::Value;

use crate::error::{RouterError, RouterResult};

/// Identifies which facet handlers may be coalesced into one batch call.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GroupKey {
    /// Handlers sharing a backend resource use the same name.
    Named(String),
    /// A key equal to no other, for handlers that never batch.
    Unique(u64),
}

static NEXT_UNIQUE: AtomicU64 = AtomicU64::new(0);

impl GroupKey {
    pub fn named(name: impl Into<String>) -> Self {
        GroupKey::Named(name.into())
    }

    /// Returns a fresh key that compares unequal to every other key.
    pub fn unique() -> Self {
        GroupKey::Unique(NEXT_UNIQUE.fetch_add(1, Ordering::Relaxed))
    }
}

/// The result of one facet for one id.
///
/// `Absent` means the facet has no data for this id; such results are left
/// out of metadata maps and reported as "metadata not found" when the facet
/// is requested on its own.
#[derive(Debug, Clone, PartialEq)]
pub enum MetaValue {
    Present(Value),
    Absent,
}

impl MetaValue {
    /// Serializes `value` as a present result.
    pub fn present<T: Serialize>(value: T) -> RouterResult<Self> {
        serde_json::to_value(value)
            .map(MetaValue::Present)
            .map_err(|e| RouterError::internal(format!("cannot encode metadata: {e}")))
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, MetaValue::Absent)
    }

    pub fn into_option(self) -> Option<Value> {
        match self {
            MetaValue::Present(v) => Some(v),
            MetaValue::Absent => None,
        }
    }
}

impl From<Option<Value>> for MetaValue {
    fn from(value: Option<Value>) -> Self {
        value.map_or(MetaValue::Absent, MetaValue::Present)
    }
}

/// Multi-valued query parameters, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryFlags(BTreeMap<String, Vec<String>>);

impl QueryFlags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes an `application/x-www-form-urlencoded` query string.
    pub fn parse(query: Option<&str>) -> Self {
        let mut flags = Self::new();
        if let Some(query) = query {
            for (name, value) in url::form_urlencoded::parse(query.as_bytes()) {
                flags.append(name.into_owned(), value.into_owned());
            }
        }
        flags
    }

    /// Adds a value for `name` after any existing ones.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.entry(name.into()).or_default().push(value.into());
    }

    /// Returns every value of `name`, in request order.
    pub fn get_all(&self, name: &str) -> &[String] {
        self.0.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    /// Returns the first value of `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.get_all(name).first().map(String::as_str)
    }

    /// Removes `name`, returning its values.
    pub fn remove(&mut self, name: &str) -> Vec<String> {
        self.0.remove(name).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for QueryFlags
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut flags = Self::new();
        for (k, v) in iter {
            flags.append(k, v);
        }
        flags
    }
}
