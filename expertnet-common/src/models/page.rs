use serde::{Deserialize, Serialize};

use crate::cms::Pagination;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub page: u32,
    pub page_size: u32,
    pub page_count: u32,
    pub total: u64,
    pub has_more: bool,
}

impl PageInfo {
    pub fn new(page: u32, page_size: u32, total: u64) -> Self {
        let page_count = if page_size == 0 {
            0
        } else {
            total.div_ceil(u64::from(page_size)) as u32
        };

        Self::with_count(page, page_size, page_count, total)
    }

    fn with_count(page: u32, page_size: u32, page_count: u32, total: u64) -> Self {
        Self {
            page,
            page_size,
            page_count,
            total,
            has_more: page < page_count,
        }
    }

    /// Reads the backend's pagination block, filling gaps from what was asked for.
    pub fn from_cms(meta: Option<&Pagination>, page: u32, page_size: u32, returned: usize) -> Self {
        let Some(meta) = meta else {
            return Self::new(page, page_size, returned as u64);
        };

        let page = meta.page.unwrap_or(page);
        let page_size = meta.page_size.unwrap_or(page_size);
        let total = meta.total.unwrap_or(returned as u64);

        match meta.page_count {
            Some(count) => Self::with_count(page, page_size, count, total),
            None => Self::new(page, page_size, total),
        }
    }
}

/// One page of results plus where it sits in the whole listing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub pagination: PageInfo,
}

impl<T> Page<T> {
    /// Cuts page `page` (1-based) out of an already filtered and sorted listing.
    pub fn slice(items: Vec<T>, page: u32, page_size: u32) -> Self {
        let pagination = PageInfo::new(page, page_size, items.len() as u64);

        let skip = (page.max(1) as usize - 1).saturating_mul(page_size as usize);
        let data = items
            .into_iter()
            .skip(skip)
            .take(page_size as usize)
            .collect();

        Self { data, pagination }
    }
}
