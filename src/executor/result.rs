//! Paginated result

use serde::{Deserialize, Serialize};

/// One page of results plus pagination metadata.
///
/// Serializes as `{data, current_page, total, per_page, last_page}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResult<T> {
    pub data: Vec<T>,
    pub current_page: u32,
    /// Rows matching every predicate, ignoring pagination
    pub total: u64,
    pub per_page: u32,
    /// `ceil(total / per_page)`, at least 1
    pub last_page: u64,
}

impl<T> PageResult<T> {
    pub fn new(data: Vec<T>, current_page: u32, total: u64, per_page: u32) -> Self {
        Self {
            data,
            current_page,
            total,
            per_page,
            last_page: last_page(total, per_page),
        }
    }

    /// Returns true if this page holds no rows
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns true if a later page exists
    pub fn has_more(&self) -> bool {
        u64::from(self.current_page) < self.last_page
    }

    /// Convert the rows, keeping the metadata
    pub fn map<U, F>(self, f: F) -> PageResult<U>
    where
        F: FnMut(T) -> U,
    {
        PageResult {
            data: self.data.into_iter().map(f).collect(),
            current_page: self.current_page,
            total: self.total,
            per_page: self.per_page,
            last_page: self.last_page,
        }
    }
}

/// `ceil(total / per_page)`, minimum 1
pub fn last_page(total: u64, per_page: u32) -> u64 {
    if per_page == 0 {
        return 1;
    }
    total.div_ceil(u64::from(per_page)).max(1)
}
