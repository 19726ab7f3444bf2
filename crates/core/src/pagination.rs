//! Offset/max pagination of list responses.

use serde::Serialize;

/// Page size meaning "no limit".
pub const UNLIMITED: i64 = 0;

/// Normalize a requested page size: negative or missing values mean unlimited.
pub fn clamp_max(max: Option<i64>) -> i64 {
    max.filter(|m| *m > 0).unwrap_or(UNLIMITED)
}

/// Normalize a requested offset: negative or missing values mean 0.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.filter(|o| *o > 0).unwrap_or(0)
}

/// Number of pages needed for `size` items of `max` items each.
///
/// An unlimited page size always yields a single page, even when empty.
///
/// ```
/// use cytomine_core::pagination::total_pages;
/// assert_eq!(total_pages(10, 5), 2);
/// assert_eq!(total_pages(11, 5), 3);
/// assert_eq!(total_pages(11, 0), 1);
/// ```
pub fn total_pages(size: i64, max: i64) -> i64 {
    if max <= UNLIMITED {
        return 1;
    }
    if size <= 0 {
        return 0;
    }
    (size - 1) / max + 1
}

/// One page of a collection, serialized the way list endpoints answer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub collection: Vec<T>,
    pub offset: i64,
    pub per_page: i64,
    pub size: i64,
    pub total_pages: i64,
}

impl<T> Page<T> {
    /// Wrap an already-sliced collection. `size` is the total number of
    /// matching items before slicing.
    pub fn new(collection: Vec<T>, offset: i64, max: i64, size: i64) -> Self {
        Self {
            collection,
            offset,
            per_page: max,
            size,
            total_pages: total_pages(size, max),
        }
    }

    /// Slice an in-memory collection.
    pub fn slice(items: Vec<T>, offset: i64, max: i64) -> Self {
        let size = items.len() as i64;
        let skip = usize::try_from(offset).unwrap_or(0);
        let collection: Vec<T> = if max > UNLIMITED {
            let take = usize::try_from(max).unwrap_or(usize::MAX);
            items.into_iter().skip(skip).take(take).collect()
        } else {
            items.into_iter().skip(skip).collect()
        };
        Self::new(collection, offset, max, size)
    }
}
