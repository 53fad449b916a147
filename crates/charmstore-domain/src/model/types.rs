//! Core identifier type definitions.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Schema prefix emitted on every formatted id.
pub const SCHEMA: &str = "cs";

/// Pseudo-series reserved for bundles.
pub const BUNDLE_SERIES: &str = "bundle";

/// Series recognised in id paths when no other set is configured.
pub const DEFAULT_SERIES: &[&str] = &[
    BUNDLE_SERIES,
    "precise",
    "quantal",
    "raring",
    "saucy",
    "trusty",
    "utopic",
];

/// A charm or bundle identifier (e.g., "cs:~bob/trusty/wordpress-23").
///
/// Series and revision are optional: an id without them is unresolved and
/// refers to the latest matching entity once a resolver fills them in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CharmId {
    /// The owner, without the leading `~`.
    pub user: Option<String>,
    /// The series token (e.g., "trusty" or "bundle").
    pub series: Option<String>,
    /// The charm or bundle name.
    pub name: String,
    /// The revision number.
    pub revision: Option<u32>,
}

impl CharmId {
    /// Creates an unresolved id with only a name.
    ///
    /// The name is not validated; use [`CharmId::parse`] for untrusted input.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            user: None,
            series: None,
            name: name.into(),
            revision: None,
        }
    }

    /// Sets the owner.
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    /// Sets the series.
    pub fn with_series(mut self, series: impl Into<String>) -> Self {
        self.series = Some(series.into());
        self
    }

    /// Sets the revision.
    pub fn with_revision(mut self, revision: u32) -> Self {
        self.revision = Some(revision);
        self
    }

    /// Reports whether both series and revision are known.
    pub fn is_resolved(&self) -> bool {
        self.series.is_some() && self.revision.is_some()
    }

    /// Reports whether this id names a bundle.
    pub fn is_bundle(&self) -> bool {
        self.series.as_deref() == Some(BUNDLE_SERIES)
    }

    /// Returns the id with series and revision dropped.
    pub fn base(&self) -> CharmId {
        CharmId {
            user: self.user.clone(),
            series: None,
            name: self.name.clone(),
            revision: None,
        }
    }

    /// Returns the id without the `cs:` schema.
    pub fn path(&self) -> String {
        let mut out = String::new();
        if let Some(user) = &self.user {
            out.push('~');
            out.push_str(user);
            out.push('/');
        }
        if let Some(series) = &self.series {
            out.push_str(series);
            out.push('/');
        }
        out.push_str(&self.name);
        if let Some(revision) = self.revision {
            out.push('-');
            out.push_str(&revision.to_string());
        }
        out
    }
}

impl fmt::Display for CharmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", SCHEMA, self.path())
    }
}

impl FromStr for CharmId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CharmId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CharmId> for String {
    fn from(id: CharmId) -> Self {
        id.to_string()
    }
}

/// The set of series tokens recognised while splitting id paths.
///
/// A path element is consumed as a series only when it is a member of this
/// set, so `/wordpress/meta` keeps `wordpress` as the name while
/// `/trusty/wordpress/meta` takes `trusty` as the series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesSet(BTreeSet<String>);

impl SeriesSet {
    /// Creates a series set from the given tokens, validating each one.
    pub fn new<I, S>(series: I) -> DomainResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = BTreeSet::new();
        for token in series {
            let token = token.into();
            if !is_valid_series(&token) {
                return Err(DomainError::InvalidSeries { id: token });
            }
            set.insert(token);
        }
        Ok(Self(set))
    }

    /// Reports whether the token is a known series.
    pub fn contains(&self, token: &str) -> bool {
        self.0.contains(token)
    }

    /// Iterates the series in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for SeriesSet {
    fn default() -> Self {
        Self(DEFAULT_SERIES.iter().map(|s| s.to_string()).collect())
    }
}

/// Validates a charm name: `[a-z][a-z0-9]*(-[a-z0-9]*[a-z][a-z0-9]*)*`.
pub fn is_valid_name(name: &str) -> bool {
    let mut segments = name.split('-');
    let Some(first) = segments.next() else {
        return false;
    };
    let first_ok = first
        .bytes()
        .next()
        .is_some_and(|b| b.is_ascii_lowercase())
        && first
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit());
    first_ok
        && segments.all(|seg| {
            seg.bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
                && seg.bytes().any(|b| b.is_ascii_lowercase())
        })
}

/// Validates a user name: `[a-z0-9][a-zA-Z0-9+.-]+`.
pub fn is_valid_user(user: &str) -> bool {
    let bytes = user.as_bytes();
    bytes.len() >= 2
        && (bytes[0].is_ascii_lowercase() || bytes[0].is_ascii_digit())
        && bytes[1..]
            .iter()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'.' | b'-'))
}

/// Validates a series token: `[a-z]+([a-z0-9]+)?`.
pub fn is_valid_series(series: &str) -> bool {
    series
        .bytes()
        .next()
        .is_some_and(|b| b.is_ascii_lowercase())
        && series
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_full_id() {
        let id = CharmId::new("wordpress")
            .with_user("bob")
            .with_series("trusty")
            .with_revision(23);
        assert_eq!(id.to_string(), "cs:~bob/trusty/wordpress-23");
        assert_eq!(id.path(), "~bob/trusty/wordpress-23");
    }

    #[test]
    fn test_display_unresolved_id() {
        assert_eq!(CharmId::new("mysql").to_string(), "cs:mysql");
    }

    #[test]
    fn test_base_drops_series_and_revision() {
        let id = CharmId::new("mysql")
            .with_user("alice")
            .with_series("precise")
            .with_revision(4);
        assert_eq!(id.base(), CharmId::new("mysql").with_user("alice"));
        assert!(id.is_resolved());
        assert!(!id.base().is_resolved());
    }

    #[test]
    fn test_is_bundle() {
        assert!(CharmId::new("wordpress-simple")
            .with_series("bundle")
            .is_bundle());
        assert!(!CharmId::new("wordpress").with_series("trusty").is_bundle());
    }

    #[test]
    fn test_name_grammar() {
        assert!(is_valid_name("wordpress"));
        assert!(is_valid_name("wordpress-simple"));
        assert!(is_valid_name("mysql-5a"));
        assert!(!is_valid_name(""));
        assert!(!is_valid_name("2wordpress"));
        assert!(!is_valid_name("wordpress-"));
        assert!(!is_valid_name("wordpress-23"));
        assert!(!is_valid_name("Wordpress"));
    }

    #[test]
    fn test_user_grammar() {
        assert!(is_valid_user("bob"));
        assert!(is_valid_user("charmers"));
        assert!(is_valid_user("a.b+c-D"));
        assert!(!is_valid_user("b"));
        assert!(!is_valid_user("-bob"));
        assert!(!is_valid_user("bob/x"));
    }

    #[test]
    fn test_series_set_default_contains_bundle() {
        let set = SeriesSet::default();
        assert!(set.contains("bundle"));
        assert!(set.contains("trusty"));
        assert!(!set.contains("wordpress"));
        assert_eq!(set.len(), DEFAULT_SERIES.len());
    }

    #[test]
    fn test_series_set_custom() {
        let set = SeriesSet::new(["xenial", "bundle"]).unwrap();
        assert!(set.contains("xenial"));
        assert!(!set.contains("trusty"));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["bundle", "xenial"]);
    }

    #[test]
    fn test_series_set_rejects_invalid_token() {
        assert!(matches!(
            SeriesSet::new(["Trusty"]),
            Err(DomainError::InvalidSeries { .. })
        ));
        assert!(SeriesSet::new([""]).is_err());
    }

    #[test]
    fn test_serde_uses_string_form() {
        let id = CharmId::new("wordpress").with_series("trusty").with_revision(3);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, r#""cs:trusty/wordpress-3""#);
        let back: CharmId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
        assert!(serde_json::from_str::<CharmId>(r#""cs:""#).is_err());
    }
}
