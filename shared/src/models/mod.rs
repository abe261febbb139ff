//! Data models
//!
//! Shared between whiskey-server and its clients (via API).
//! All IDs are `i64` (PostgreSQL BIGSERIAL), timestamps are unix millis.

pub mod category;
pub mod whiskey;

// Re-exports
pub use category::*;
pub use whiskey::*;
