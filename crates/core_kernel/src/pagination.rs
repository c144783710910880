//! Page requests and page envelopes
//!
//! Pages are zero-based. Sort specifications use the `field,direction` text form
//! accepted by the HTTP layer (`name`, `name,desc`, `id,ASC`). Only whitelisted
//! fields can be sorted on, so a `Sort` can be turned into SQL without quoting.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Page size used when the caller does not ask for one
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Largest page size a caller may request
pub const MAX_PAGE_SIZE: u32 = 100;

/// Customer attribute a page can be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Id,
    Name,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::Name => "name",
        }
    }
}

impl FromStr for SortField {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "id" => Ok(SortField::Id),
            "name" | "nome" => Ok(SortField::Name),
            other => Err(CoreError::validation(format!("cannot sort by '{}'", other))),
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl FromStr for SortDirection {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(CoreError::validation(format!("unknown sort direction '{}'", other))),
        }
    }
}

/// Ordering applied to a page query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sort {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Sort {
    pub fn asc(field: SortField) -> Self {
        Self { field, direction: SortDirection::Asc }
    }

    pub fn desc(field: SortField) -> Self {
        Self { field, direction: SortDirection::Desc }
    }
}

impl Default for Sort {
    fn default() -> Self {
        Self::asc(SortField::Id)
    }
}

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.field.as_str(), self.direction.as_str())
    }
}

impl FromStr for Sort {
    type Err = CoreError;

    /// Parses `field` or `field,direction`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(2, ',');
        let field = parts.next().unwrap_or_default().parse::<SortField>()?;
        let direction = match parts.next() {
            Some(direction) => direction.parse::<SortDirection>()?,
            None => SortDirection::Asc,
        };
        Ok(Self { field, direction })
    }
}

/// A validated request for one page of results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    page: u32,
    size: u32,
    sort: Sort,
}

impl PageRequest {
    /// Creates a page request
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if `size` is zero or above `MAX_PAGE_SIZE`.
    pub fn new(page: u32, size: u32, sort: Sort) -> Result<Self, CoreError> {
        if size == 0 || size > MAX_PAGE_SIZE {
            return Err(CoreError::validation(format!(
                "page size must be between 1 and {}, got {}",
                MAX_PAGE_SIZE, size
            )));
        }
        Ok(Self { page, size, sort })
    }

    /// First page with the default size and ordering
    pub fn first() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
            sort: Sort::default(),
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn sort(&self) -> Sort {
        self.sort
    }

    /// Number of rows to skip
    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first()
    }
}

/// One page of results plus totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    /// Wraps already-fetched items for `request` out of `total_elements` matches
    pub fn new(items: Vec<T>, request: &PageRequest, total_elements: u64) -> Self {
        let size = u64::from(request.size());
        Self {
            items,
            page: request.page(),
            size: request.size(),
            total_elements,
            total_pages: total_elements.div_ceil(size),
        }
    }

    /// Cuts the requested page out of a fully materialized, already ordered list
    pub fn from_ordered(all: Vec<T>, request: &PageRequest) -> Self {
        let total = all.len() as u64;
        let items = all
            .into_iter()
            .skip(usize::try_from(request.offset()).unwrap_or(usize::MAX))
            .take(request.size() as usize)
            .collect();
        Self::new(items, request, total)
    }

    /// Returns true if no later page holds results
    pub fn is_last(&self) -> bool {
        u64::from(self.page) + 1 >= self.total_pages
    }

    /// Transforms the items while keeping the paging metadata
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_sort_parsing() {
        assert_eq!("name".parse::<Sort>().unwrap(), Sort::asc(SortField::Name));
        assert_eq!("name,DESC".parse::<Sort>().unwrap(), Sort::desc(SortField::Name));
        assert_eq!(" id , asc".parse::<Sort>().unwrap(), Sort::asc(SortField::Id));
        assert!("email".parse::<Sort>().is_err());
        assert!("name,sideways".parse::<Sort>().is_err());
    }

    #[test]
    fn test_sort_display_round_trips() {
        let sort = Sort::desc(SortField::Name);
        assert_eq!(sort.to_string(), "name,desc");
        assert_eq!(sort.to_string().parse::<Sort>().unwrap(), sort);
    }

    #[test]
    fn test_page_request_bounds() {
        assert!(PageRequest::new(0, 0, Sort::default()).is_err());
        assert!(PageRequest::new(0, MAX_PAGE_SIZE + 1, Sort::default()).is_err());
        let request = PageRequest::new(3, 10, Sort::default()).unwrap();
        assert_eq!(request.offset(), 30);
    }

    #[test]
    fn test_page_from_ordered() {
        let request = PageRequest::new(1, 2, Sort::default()).unwrap();
        let page = Page::from_ordered(vec![1, 2, 3, 4, 5], &request);

        assert_eq!(page.items, vec![3, 4]);
        assert_eq!(page.total_elements, 5);
        assert_eq!(page.total_pages, 3);
        assert!(!page.is_last());
    }

    #[test]
    fn test_page_past_the_end_is_empty() {
        let request = PageRequest::new(9, 2, Sort::default()).unwrap();
        let page = Page::from_ordered(vec![1, 2, 3], &request);
        assert!(page.items.is_empty());
        assert_eq!(page.total_elements, 3);
        assert!(page.is_last());
    }

    proptest! {
        #[test]
        fn prop_pages_cover_every_item_once(len in 0usize..60, size in 1u32..15) {
            let all: Vec<usize> = (0..len).collect();
            let first = PageRequest::new(0, size, Sort::default()).unwrap();
            let total_pages = Page::from_ordered(all.clone(), &first).total_pages;

            let mut seen = Vec::new();
            for page in 0..total_pages {
                let request = PageRequest::new(page as u32, size, Sort::default()).unwrap();
                seen.extend(Page::from_ordered(all.clone(), &request).items);
            }
            prop_assert_eq!(seen, all);
        }
    }
}
