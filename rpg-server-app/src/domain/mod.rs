use thiserror::Error;

pub mod player;
pub mod query;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerId(pub i64);

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
}

impl Pagination {
    pub const DEFAULT_PAGE_SIZE: u64 = 3;

    /// Largest offset or limit a SQL backend accepts.
    pub const MAX_ROWS: u64 = i64::MAX as u64;

    /// Zero-based page of `page_size` records.
    pub fn page(page_number: u64, page_size: u64) -> Self {
        Self {
            offset: page_number.saturating_mul(page_size).min(Self::MAX_ROWS),
            limit: page_size.min(Self::MAX_ROWS),
        }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::page(0, Self::DEFAULT_PAGE_SIZE)
    }
}

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Storage error: {0}")]
    StorageError(String),
}

#[derive(Debug, Error)]
pub enum RepoUpdateError {
    #[error("Resource not found")]
    NotFound,
    #[error("Storage error: {0}")]
    StorageError(String),
}

impl From<RepoError> for RepoUpdateError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::StorageError(e) => RepoUpdateError::StorageError(e),
        }
    }
}
