use crate::error::{Result, StoreError};
use std::env;
use tracing::warn;

pub const DEFAULT_MAX_PAGES: usize = 50;

/// Get the page cap from the environment or default
pub fn get_max_pages() -> usize {
    env::var("LABELSYNC_MAX_PAGES")
        .ok()
        .and_then(|v| v.parse().ok())
        .filter(|&v| v > 0)
        .unwrap_or(DEFAULT_MAX_PAGES)
}

/// Walk a page-numbered listing (pages start at 1) until a short page.
///
/// Fails rather than returning a partial listing when the page cap is hit,
/// since a sync against a truncated listing would plan bogus creates.
pub fn fetch_all_pages<T, F>(fetch_page: F, per_page: usize) -> Result<Vec<T>>
where
    F: FnMut(usize, usize) -> Result<Vec<T>>,
{
    fetch_pages_capped(fetch_page, per_page, get_max_pages())
}

fn fetch_pages_capped<T, F>(mut fetch_page: F, per_page: usize, max_pages: usize) -> Result<Vec<T>>
where
    F: FnMut(usize, usize) -> Result<Vec<T>>,
{
    let mut all_results = Vec::new();

    for page in 1..=max_pages {
        let page_results = fetch_page(page, per_page)?;
        let page_len = page_results.len();

        all_results.extend(page_results);

        if page_len < per_page {
            return Ok(all_results);
        }
    }

    warn!(max_pages, "label listing still had full pages at the page cap");
    Err(StoreError::Truncated { pages: max_pages })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_of(data: &[i32], page: usize, per_page: usize) -> Vec<i32> {
        data.iter()
            .copied()
            .skip((page - 1) * per_page)
            .take(per_page)
            .collect()
    }

    #[test]
    fn fetch_all_pages_single_page() {
        // Arrange: only 3 items, smaller than page size
        let data = [1, 2, 3];
        // Act
        let result = fetch_all_pages(|page, per_page| Ok(page_of(&data, page, per_page)), 10)
            .unwrap();
        // Assert
        assert_eq!(result, vec![1, 2, 3]);
    }

    #[test]
    fn fetch_all_pages_multiple_pages() {
        // Arrange: 25 items with page size 10
        let data: Vec<i32> = (1..=25).collect();
        let mut requested = Vec::new();
        // Act
        let result = fetch_all_pages(
            |page, per_page| {
                requested.push(page);
                Ok(page_of(&data, page, per_page))
            },
            10,
        )
        .unwrap();
        // Assert
        assert_eq!(result, data);
        assert_eq!(requested, vec![1, 2, 3]);
    }

    #[test]
    fn fetch_all_pages_exact_multiple_stops_on_empty_page() {
        let data: Vec<i32> = (1..=20).collect();
        let mut calls = 0;
        let result = fetch_all_pages(
            |page, per_page| {
                calls += 1;
                Ok(page_of(&data, page, per_page))
            },
            10,
        )
        .unwrap();
        assert_eq!(result.len(), 20);
        assert_eq!(calls, 3);
    }

    #[test]
    fn fetch_all_pages_propagates_errors() {
        let result: Result<Vec<i32>> =
            fetch_all_pages(|_, _| Err(StoreError::Http("boom".to_string())), 10);
        assert!(matches!(result, Err(StoreError::Http(_))));
    }

    #[test]
    fn hitting_the_page_cap_is_an_error() {
        let data: Vec<i32> = (1..=30).collect();
        let result = fetch_pages_capped(|page, per_page| Ok(page_of(&data, page, per_page)), 10, 2);
        assert_eq!(result, Err(StoreError::Truncated { pages: 2 }));

        // A short last page within the cap is fine
        let result = fetch_pages_capped(|page, per_page| Ok(page_of(&data, page, per_page)), 10, 4);
        assert_eq!(result.unwrap().len(), 30);
    }
}
