//! Query-string translation: filters, sort and pagination, validated once at the boundary.

mod filter;
mod page;
mod sort;

pub use filter::{PokemonFilter, Predicate};
pub use page::{PageRequest, PaginationMeta, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use sort::{Sort, SortField, SortOrder};

use crate::error::AppError;
use std::collections::HashMap;

/// Everything a store needs to answer a list or search request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub predicate: Predicate,
    pub sort: Sort,
    /// `None` returns every match.
    pub page: Option<PageRequest>,
}

impl ListQuery {
    /// `GET /pokemon`: filters, sort, page.
    pub fn for_list(params: &HashMap<String, String>) -> Result<Self, AppError> {
        Ok(ListQuery {
            predicate: Predicate {
                filter: PokemonFilter::from_params(params)?,
                text: None,
            },
            sort: Sort::from_params(params)?,
            page: Some(PageRequest::from_params(params)?),
        })
    }

    /// `GET /search`: filters plus `q`; always ordered by id. Windowed only when `page` or `limit` is given.
    pub fn for_search(params: &HashMap<String, String>) -> Result<Self, AppError> {
        Ok(ListQuery {
            predicate: Predicate {
                filter: PokemonFilter::from_params(params)?,
                text: filter::text_param(params, "q"),
            },
            sort: Sort::default(),
            page: if params.contains_key("page") || params.contains_key("limit") {
                Some(PageRequest::from_params(params)?)
            } else {
                None
            },
        })
    }
}

/// One page of results plus the number of rows matching the predicate overall.
#[derive(Debug, Clone, PartialEq)]
pub struct Found<T> {
    pub items: Vec<T>,
    pub total: u64,
}
