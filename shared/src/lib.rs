//! Shared types for the whiskey catalog
//!
//! Domain models, the unified error system and pagination types used by
//! whiskey-server and mirrored by its API clients.

pub mod error;
pub mod models;
pub mod page;
pub mod util;

// Re-exports
pub use error::{ApiResponse, AppError, AppResult, ErrorCode};
pub use page::{PageRequest, PaginatedResponse};
