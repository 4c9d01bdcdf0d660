use serde::{Deserialize, Serialize};

/// One page of search results
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Pagination<T> {
    pub data: Vec<T>,
    /// Number of documents matching the query before skip/limit
    pub total: u64,
    pub offset: u64,
    pub size: u64,
}

impl<T> Pagination<T> {
    pub fn new(data: Vec<T>, total: u64, offset: u64, size: u64) -> Self {
        Self {
            data,
            total,
            offset,
            size,
        }
    }

    pub fn empty(offset: u64, size: u64) -> Self {
        Self::new(Vec::new(), 0, offset, size)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Pagination<U> {
        Pagination {
            data: self.data.into_iter().map(f).collect(),
            total: self.total,
            offset: self.offset,
            size: self.size,
        }
    }
}
