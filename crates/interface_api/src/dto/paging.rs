//! Paging query parameters and the page envelope

use serde::{Deserialize, Serialize};

use core_kernel::{Page, PageRequest, Sort, DEFAULT_PAGE_SIZE};

use crate::error::ApiError;

/// `?page=&size=&sort=` for the paginated listing
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub size: Option<u32>,
    /// `field` or `field,direction`, e.g. `name,desc`
    pub sort: Option<String>,
}

impl PageQuery {
    /// Builds a page request, rejecting sizes above `max_size`
    pub fn to_request(&self, max_size: u32) -> Result<PageRequest, ApiError> {
        page_request(self.page, self.size, self.sort.as_deref(), max_size)
    }
}

/// `?name=&page=&size=&sort=` for the name search
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub name: String,
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub sort: Option<String>,
}

impl SearchQuery {
    pub fn to_request(&self, max_size: u32) -> Result<PageRequest, ApiError> {
        page_request(self.page, self.size, self.sort.as_deref(), max_size)
    }
}

fn page_request(
    page: Option<u32>,
    size: Option<u32>,
    sort: Option<&str>,
    max_size: u32,
) -> Result<PageRequest, ApiError> {
    let size = size.unwrap_or(DEFAULT_PAGE_SIZE.min(max_size));
    if size > max_size {
        return Err(ApiError::BadRequest(format!(
            "page size must be between 1 and {}",
            max_size
        )));
    }
    let sort = match sort {
        Some(raw) if !raw.trim().is_empty() => raw
            .parse::<Sort>()
            .map_err(|e| ApiError::BadRequest(e.to_string()))?,
        _ => Sort::default(),
    };
    PageRequest::new(page.unwrap_or(0), size, sort).map_err(|e| ApiError::BadRequest(e.to_string()))
}

/// One page of results
#[derive(Debug, Serialize)]
pub struct PageResponse<T> {
    pub content: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u64,
    pub last: bool,
}

impl<T, U: Into<T>> From<Page<U>> for PageResponse<T> {
    fn from(page: Page<U>) -> Self {
        let last = page.is_last();
        Self {
            content: page.items.into_iter().map(Into::into).collect(),
            page: page.page,
            size: page.size,
            total_elements: page.total_elements,
            total_pages: page.total_pages,
            last,
        }
    }
}
