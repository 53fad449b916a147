//! Parser for the textual id grammar and for id-rooted request paths.
//!
//! Grammar: `[cs:][~user/][series/]name[-revision]`

use crate::error::{DomainError, DomainResult};
use crate::path::split_path;

use super::types::{is_valid_name, is_valid_series, is_valid_user, CharmId, SeriesSet, SCHEMA};

impl CharmId {
    /// Parses an id from its textual form.
    ///
    /// The `cs:` schema is optional. Series and revision may be omitted, in
    /// which case the id is unresolved.
    pub fn parse(s: &str) -> DomainResult<Self> {
        let rest = match s.split_once(':') {
            Some((schema, rest)) if schema == SCHEMA => rest,
            Some(_) => return Err(DomainError::InvalidSchema { id: s.to_string() }),
            None => s,
        };

        let mut parts: Vec<&str> = rest.split('/').collect();

        let user = match parts.first() {
            Some(first) if first.starts_with('~') => {
                let user = &first[1..];
                if !is_valid_user(user) {
                    return Err(DomainError::InvalidUser { id: s.to_string() });
                }
                parts.remove(0);
                Some(user.to_string())
            }
            _ => None,
        };

        let (series, name_part) = match parts.as_slice() {
            [name] => (None, *name),
            [series, name] => {
                if !is_valid_series(series) {
                    return Err(DomainError::InvalidSeries { id: s.to_string() });
                }
                (Some(series.to_string()), *name)
            }
            [] => return Err(DomainError::EmptyName { id: s.to_string() }),
            _ => return Err(DomainError::InvalidForm { id: s.to_string() }),
        };

        if name_part.is_empty() {
            return Err(DomainError::EmptyName { id: s.to_string() });
        }

        let (name, revision) = split_revision(name_part, s)?;
        if !is_valid_name(name) {
            return Err(DomainError::InvalidName { id: s.to_string() });
        }

        Ok(CharmId {
            user,
            series,
            name: name.to_string(),
            revision,
        })
    }
}

/// Splits a trailing `-N` revision off a name element.
fn split_revision<'a>(part: &'a str, id: &str) -> DomainResult<(&'a str, Option<u32>)> {
    if let Some((name, digits)) = part.rsplit_once('-') {
        if !name.is_empty() && !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            let revision = digits
                .parse::<u32>()
                .map_err(|_| DomainError::InvalidRevision { id: id.to_string() })?;
            return Ok((name, Some(revision)));
        }
    }
    Ok((part, None))
}

/// Splits an id-rooted path into the id and the rest of the path.
///
/// A leading `~user` element is taken as the owner and the next element is
/// taken as the series only when `series` knows it. The element after that
/// is the name (with optional revision). Everything that follows is returned
/// untouched, including its leading `/`.
///
/// For example, with the default series set, `/trusty/wordpress-3/meta/any`
/// yields `cs:trusty/wordpress-3` and `/meta/any`.
pub fn split_id<'a>(path: &'a str, series: &SeriesSet) -> DomainResult<(CharmId, &'a str)> {
    let path = path.strip_prefix('/').unwrap_or(path);

    let (mut part, mut i) = split_path(path, 0);
    if part.starts_with('~') {
        (part, i) = split_path(path, i);
    }
    if series.contains(part) {
        (part, i) = split_path(path, i);
    }
    if part.is_empty() {
        return Err(DomainError::EmptyName {
            id: path[..i].to_string(),
        });
    }

    // part holds the name and path[..i] the whole id.
    let id_str = path[..i].strip_suffix('/').unwrap_or(&path[..i]);
    let id = CharmId::parse(id_str)?;
    Ok((id, &path[i..]))
}
