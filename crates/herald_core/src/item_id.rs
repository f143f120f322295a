//! Ordering of platform item ids.
//!
//! Platform ids are decimal snowflakes compared as digit strings: leading zeros
//! are ignored, a longer number is newer, equal lengths compare lexicographically.
//! Ids containing anything other than ASCII digits fall back to plain
//! lexicographic order.

use std::cmp::Ordering;

fn is_numeric(id: &str) -> bool {
    !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit())
}

/// Compare two item ids, newer ids ordering greater.
///
/// # Examples
///
/// ```
/// use herald_core::compare_item_ids;
/// use std::cmp::Ordering;
///
/// assert_eq!(compare_item_ids("100", "50"), Ordering::Greater);
/// assert_eq!(compare_item_ids("099", "99"), Ordering::Equal);
/// assert_eq!(compare_item_ids("abc", "abd"), Ordering::Less);
/// ```
pub fn compare_item_ids(a: &str, b: &str) -> Ordering {
    if is_numeric(a) && is_numeric(b) {
        let a = a.trim_start_matches('0');
        let b = b.trim_start_matches('0');
        a.len().cmp(&b.len()).then_with(|| a.cmp(b))
    } else {
        a.cmp(b)
    }
}

/// Newest id in a sequence, if any.
pub fn newest_item_id<'a, I>(ids: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    ids.into_iter().max_by(|a, b| compare_item_ids(a, b))
}
