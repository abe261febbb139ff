//! Database access layer
//!
//! The service talks to storage only through [`WhiskeyRepository`]. The
//! production implementation is [`PgWhiskeyRepository`]; tests use an
//! in-memory one.

#[cfg(test)]
pub mod memory;
pub mod whiskey;

pub use whiskey::PgWhiskeyRepository;

use async_trait::async_trait;
use shared::models::{Whiskey, WhiskeyCategory, WhiskeyDraft};
use shared::page::PageRequest;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database error: {0}")]
    Database(String),

    /// A stored value could not be mapped back to the domain model
    #[error("Invalid stored data: {0}")]
    InvalidData(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Which rows a listing returns.
///
/// Exactly one branch applies per request; see [`WhiskeyFilter::resolve`].
#[derive(Debug, Clone, PartialEq)]
pub enum WhiskeyFilter {
    All,
    Category(WhiskeyCategory),
    /// Case-insensitive substring over name or brand
    Search(String),
    CategoryAndSearch(WhiskeyCategory, String),
}

impl WhiskeyFilter {
    /// Pick the branch for a listing request.
    ///
    /// A search that is blank after trimming counts as absent. A non-blank
    /// search is kept verbatim (surrounding spaces included) for matching.
    pub fn resolve(category: Option<WhiskeyCategory>, search: Option<&str>) -> Self {
        let search = search
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string);

        match (category, search) {
            (Some(category), Some(search)) => WhiskeyFilter::CategoryAndSearch(category, search),
            (Some(category), None) => WhiskeyFilter::Category(category),
            (None, Some(search)) => WhiskeyFilter::Search(search),
            (None, None) => WhiskeyFilter::All,
        }
    }

    pub fn category(&self) -> Option<WhiskeyCategory> {
        match self {
            WhiskeyFilter::Category(c) | WhiskeyFilter::CategoryAndSearch(c, _) => Some(*c),
            _ => None,
        }
    }

    pub fn search(&self) -> Option<&str> {
        match self {
            WhiskeyFilter::Search(s) | WhiskeyFilter::CategoryAndSearch(_, s) => Some(s),
            _ => None,
        }
    }
}

/// Storage operations for the whiskey catalog
///
/// Every write runs in a single transaction. Timestamps are assigned here:
/// `created_at` once on insert, `updated_at` on every write.
#[async_trait]
pub trait WhiskeyRepository: Send + Sync {
    /// One page of matching items plus the total match count
    async fn find_page(
        &self,
        filter: &WhiskeyFilter,
        page: &PageRequest,
    ) -> RepoResult<(Vec<Whiskey>, u64)>;

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Whiskey>>;

    async fn insert(&self, draft: &WhiskeyDraft) -> RepoResult<Whiskey>;

    /// Overwrite every field of an existing item. `None` if the id is gone.
    async fn update(&self, id: i64, draft: &WhiskeyDraft) -> RepoResult<Option<Whiskey>>;

    /// Set or clear the image reference. `false` if the id is gone.
    async fn set_image(&self, id: i64, image_data_url: Option<&str>) -> RepoResult<bool>;

    /// `false` if nothing was deleted
    async fn delete(&self, id: i64) -> RepoResult<bool>;

    /// Item count per category; categories without items may be omitted
    async fn count_by_category(&self) -> RepoResult<Vec<(WhiskeyCategory, u64)>>;
}

/// Build a `%...%` LIKE pattern that matches `search` literally
pub fn like_pattern(search: &str) -> String {
    let mut pattern = String::with_capacity(search.len() + 2);
    pattern.push('%');
    for ch in search.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}
