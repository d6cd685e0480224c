// Offset/limit pagination over CASE list endpoints

use serde::de::DeserializeOwned;
use std::fmt;

use crate::error::{CaseError, Result};
use crate::http_client::CaseHttpClient;

/// Response envelope carrying one page of records under a named array
pub trait PageEnvelope: DeserializeOwned {
    type Item;

    fn into_items(self) -> Vec<Self::Item>;
}

/// Sort direction sent as `orderBy`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Paging parameters for a single list request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest<'a> {
    pub offset: u64,
    pub limit: u32,
    pub sort: &'a str,
    pub order: SortOrder,
}

impl PageRequest<'_> {
    /// Query pairs in the order the API documents them
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("offset", self.offset.to_string()),
            ("limit", self.limit.to_string()),
            ("sort", self.sort.to_string()),
            ("orderBy", self.order.as_str().to_string()),
        ]
    }
}

/// Drive `fetch` page by page until an empty page or `max_pages` non-empty pages.
/// Makes at most `max_pages` calls.
pub fn fetch_pages<T, F>(
    page_size: u32,
    max_pages: u32,
    sort_field: &str,
    order: SortOrder,
    mut fetch: F,
) -> Result<Vec<T>>
where
    F: FnMut(&PageRequest<'_>) -> Result<Vec<T>>,
{
    if page_size == 0 || max_pages == 0 {
        return Err(CaseError::Configuration(format!(
            "page_size and max_pages must be positive (got {} and {})",
            page_size, max_pages
        )));
    }

    let mut all_items = Vec::new();
    let mut page_count = 0u32;

    while page_count < max_pages {
        let request = PageRequest {
            offset: u64::from(page_count) * u64::from(page_size),
            limit: page_size,
            sort: sort_field,
            order,
        };

        let items = fetch(&request)?;
        if items.is_empty() {
            tracing::debug!(offset = request.offset, "Empty page, end of collection");
            break;
        }

        tracing::debug!(offset = request.offset, count = items.len(), "Fetched page");
        all_items.extend(items);
        page_count += 1;
    }

    if page_count == max_pages {
        tracing::warn!(
            max_pages,
            total = all_items.len(),
            "Reached maximum page limit, collection may be truncated"
        );
    }

    Ok(all_items)
}

/// Paginator over an authenticated client
pub struct Paginator<'a> {
    client: &'a CaseHttpClient,
}

impl<'a> Paginator<'a> {
    pub fn new(client: &'a CaseHttpClient) -> Self {
        Self { client }
    }

    /// Fetch every record of `endpoint`, pages in request order
    pub fn fetch_all<E: PageEnvelope>(
        &self,
        endpoint: &str,
        page_size: u32,
        max_pages: u32,
        sort_field: &str,
        order: SortOrder,
    ) -> Result<Vec<E::Item>> {
        let items = fetch_pages(page_size, max_pages, sort_field, order, |request| {
            let page: E = self.client.get_json(endpoint, &request.to_query())?;
            Ok(page.into_items())
        })?;

        tracing::info!("{} records fetched from {}", items.len(), endpoint);
        Ok(items)
    }
}
