//! Request path splitting.
//!
//! Paths are walked one `/`-delimited element at a time without building a
//! token list.

/// Returns the path element starting at `path[i..]` and the index where the
/// following element begins.
///
/// A single leading `/` at `i` is skipped. When no further `/` exists the
/// remainder is returned along with `path.len()`.
///
/// For example, `split_path("/foo/bar/bzr", 4)` returns `("bar", 8)`.
pub fn split_path(path: &str, i: usize) -> (&str, usize) {
    let mut i = i.min(path.len());
    if path.as_bytes().get(i) == Some(&b'/') {
        i += 1;
    }
    match path[i..].find('/') {
        Some(j) => (&path[i..i + j], i + j),
        None => (&path[i..], path.len()),
    }
}

/// Returns the key used to look up a handler for `path`, and the rest of
/// the path after that key.
///
/// The key is the first path element, with its terminating `/` included
/// when more elements follow. The rest keeps its leading `/`. When there
/// is no first element the key is empty.
///
/// | path | key | rest |
/// |------|-----|------|
/// | `/meta` | `meta` | `` |
/// | `/meta/any` | `meta/` | `/any` |
/// | `charm-related/provides` | `charm-related/` | `/provides` |
pub fn handler_key(path: &str) -> (&str, &str) {
    let path = path.strip_prefix('/').unwrap_or(path);
    let (key, i) = split_path(path, 0);
    if key.is_empty() {
        return ("", "");
    }
    if i + 1 < path.len() {
        return (&path[..=i], &path[i..]);
    }
    (key, "")
}
