mod error;
mod normalize;

pub use error::{PathError, PathResult};
pub use normalize::{NormalizeOptions, normalize_path};

use memchr::memrchr;

/// Iterates the non-empty segments of a path, in order.
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|segment| !segment.is_empty())
}

/// Number of non-empty segments; the depth proxy used for tree construction.
pub fn level_of(path: &str) -> usize {
    segments(path).count()
}

/// Peels one trailing segment off `path`, keeping the slash that preceded it.
///
/// `/blog/first/` -> `/blog/`, `/blog/` -> `/`, `/` -> None. A missing
/// trailing slash is tolerated so registration templates without one still
/// resolve their ancestors: `/blog/first` -> `/blog/`.
pub fn strip_last_segment(path: &str) -> Option<String> {
    let trimmed = path.strip_suffix('/').unwrap_or(path);
    if trimmed.is_empty() {
        return None;
    }
    let cut = memrchr(b'/', trimmed.as_bytes())?;
    Some(trimmed[..=cut].to_string())
}

pub fn ensure_trailing_slash(path: &str) -> String {
    if path.ends_with('/') {
        path.to_string()
    } else {
        let mut owned = String::with_capacity(path.len() + 1);
        owned.push_str(path);
        owned.push('/');
        owned
    }
}
