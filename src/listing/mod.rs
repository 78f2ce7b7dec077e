//! Paginated, filtered, sortable listing over an in-memory record snapshot.
//!
//! The upstream identity API hands back unpaginated record batches; this module
//! turns one such snapshot into a page envelope with navigation metadata. Sort
//! fields are closed enums per record type, validated before any data access by
//! the calling service.

pub mod error;

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

pub use error::ListingError;

/// Sort direction for a listing request. Parsed case-insensitively from the
/// `sortDirection` query param; anything other than `desc` means ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.eq_ignore_ascii_case("desc") => SortDirection::Desc,
            _ => SortDirection::Asc,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// A closed set of sortable field names for one record type.
///
/// Implementations are plain enums; resolving a wire string to a variant is the
/// single validation point for the `sortBy` parameter.
pub trait SortField: Sized + Copy {
    const ALLOWED: &'static [&'static str];

    fn from_name(name: &str) -> Option<Self>;

    fn name(&self) -> &'static str;

    /// Resolve an optional wire string into a sort field, rejecting names
    /// outside the allow-list. The error carries the valid field names so the
    /// client can display them.
    fn resolve(name: Option<&str>) -> Result<Option<Self>, ListingError> {
        match name {
            None => Ok(None),
            Some(raw) => Self::from_name(raw).map(Some).ok_or_else(|| {
                ListingError::InvalidSortField {
                    field: raw.to_string(),
                    valid_fields: Self::ALLOWED.to_vec(),
                }
            }),
        }
    }
}

/// A record type that can be listed through [`paginate`].
pub trait Listable {
    type Field: SortField;

    /// Field used when the request carries no `sortBy`.
    const DEFAULT_FIELD: Self::Field;

    /// Compare two records on `field` in `direction`. Implementations go
    /// through [`cmp_nulls_last`] per field so that records missing the sort
    /// value land at the end in both directions.
    fn compare_by(&self, other: &Self, field: Self::Field, direction: SortDirection) -> Ordering;

    /// Case-insensitive substring match against the type's designated text
    /// fields. `needle` arrives already lower-cased.
    fn matches(&self, needle: &str) -> bool;
}

/// Comparator with the null placement policy of this listing protocol: records
/// without a value for the sort field sort last in both directions; descending
/// reverses only the ordering of present values.
pub fn cmp_nulls_last<V: Ord>(a: Option<&V>, b: Option<&V>, direction: SortDirection) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(x), Some(y)) => match direction {
            SortDirection::Asc => x.cmp(y),
            SortDirection::Desc => y.cmp(x),
        },
    }
}

/// Offset/limit page request. Size is clamped to `1..=100` at construction so
/// callers cannot over-request past the protocol bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    size: u32,
}

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

impl PageRequest {
    pub fn new(page: u32, size: u32) -> Self {
        Self {
            page,
            size: size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn size(&self) -> u32 {
        self.size
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(0, DEFAULT_PAGE_SIZE)
    }
}

/// Page envelope returned by every listing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResponse<T> {
    pub content: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total_elements: usize,
    pub total_pages: usize,
    pub last: bool,
    pub sort_by: String,
    pub sort_direction: String,
    pub filter: Option<String>,
}

/// Apply filter, sort and offset/limit pagination to one record snapshot.
///
/// `sort_by` has already been validated against the type's allow-list; absent
/// sort falls back to the type's default field ascending. The envelope always
/// echoes the effective sort field, direction and filter.
pub fn paginate<T: Listable>(
    mut records: Vec<T>,
    sort_by: Option<T::Field>,
    direction: SortDirection,
    filter: Option<&str>,
    page: PageRequest,
) -> PagedResponse<T> {
    let filter = filter.filter(|f| !f.is_empty());
    if let Some(f) = filter {
        let needle = f.to_lowercase();
        records.retain(|r| r.matches(&needle));
    }

    let field = sort_by.unwrap_or(T::DEFAULT_FIELD);
    records.sort_by(|a, b| a.compare_by(b, field, direction));

    let total_elements = records.len();
    let size = page.size() as usize;
    let total_pages = (total_elements + size - 1) / size;
    let from = page.page() as usize * size;

    let content: Vec<T> = if from >= total_elements {
        Vec::new()
    } else {
        records.into_iter().skip(from).take(size).collect()
    };

    PagedResponse {
        content,
        page: page.page(),
        size: page.size(),
        total_elements,
        total_pages,
        last: page.page() as usize + 1 >= total_pages,
        sort_by: field.name().to_string(),
        sort_direction: direction.as_str().to_string(),
        filter: filter.map(str::to_string),
    }
}
