//! Page/limit handling and the pagination block of list responses.

use super::filter::number_param;
use crate::error::AppError;
use serde::Serialize;
use std::collections::HashMap;

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

/// 1-based page and a limit already capped at [`MAX_PAGE_SIZE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        PageRequest {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// `page <= 0` clamps to 1, `limit <= 0` falls back to the default, `limit > 100` caps at 100.
    pub fn new(page: i64, limit: i64) -> Self {
        let page = page.clamp(1, u32::MAX as i64) as u32;
        let limit = if limit <= 0 {
            DEFAULT_PAGE_SIZE
        } else {
            limit.min(MAX_PAGE_SIZE as i64) as u32
        };
        PageRequest { page, limit }
    }

    pub fn from_params(params: &HashMap<String, String>) -> Result<Self, AppError> {
        let page = number_param::<i64>(params, "page")?.unwrap_or(1);
        let limit = number_param::<i64>(params, "limit")?.unwrap_or(DEFAULT_PAGE_SIZE as i64);
        Ok(PageRequest::new(page, limit))
    }

    pub fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.limit as u64
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub current_page: u32,
    pub total_pages: u64,
    pub total_items: u64,
    pub items_per_page: u32,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

impl PaginationMeta {
    pub fn new(req: PageRequest, total_items: u64) -> Self {
        let total_pages = total_items.div_ceil(req.limit as u64);
        PaginationMeta {
            current_page: req.page,
            total_pages,
            total_items,
            items_per_page: req.limit,
            has_next_page: (req.page as u64) < total_pages,
            has_previous_page: req.page > 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn defaults() {
        let req = PageRequest::from_params(&HashMap::new()).unwrap();
        assert_eq!(req, PageRequest { page: 1, limit: 20 });
        assert_eq!(req.offset(), 0);
    }

    #[test]
    fn offset_is_page_minus_one_times_limit() {
        assert_eq!(PageRequest::new(3, 20).offset(), 40);
        assert_eq!(PageRequest::new(2, 7).offset(), 7);
    }

    #[test]
    fn limit_is_capped_at_100() {
        assert_eq!(PageRequest::new(1, 500).limit, 100);
    }

    #[test]
    fn non_positive_values_clamp() {
        assert_eq!(PageRequest::new(0, 10).page, 1);
        assert_eq!(PageRequest::new(-4, 10).page, 1);
        assert_eq!(PageRequest::new(1, 0).limit, DEFAULT_PAGE_SIZE);
        assert_eq!(PageRequest::new(1, -5).limit, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn non_numeric_page_is_bad_request() {
        assert!(matches!(
            PageRequest::from_params(&params(&[("page", "two")])),
            Err(AppError::BadRequest(_))
        ));
        assert!(PageRequest::from_params(&params(&[("limit", "10x")])).is_err());
    }

    #[test]
    fn metadata_for_45_items() {
        let first = PaginationMeta::new(PageRequest::new(1, 20), 45);
        assert_eq!(first.total_pages, 3);
        assert!(first.has_next_page);
        assert!(!first.has_previous_page);

        let last = PaginationMeta::new(PageRequest::new(3, 20), 45);
        assert!(!last.has_next_page);
        assert!(last.has_previous_page);
    }

    #[test]
    fn metadata_for_empty_result() {
        let meta = PaginationMeta::new(PageRequest::default(), 0);
        assert_eq!(meta.total_pages, 0);
        assert!(!meta.has_next_page);
        assert!(!meta.has_previous_page);
    }
}
