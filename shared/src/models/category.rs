//! Whiskey classification enums
//!
//! Both enums are closed sets. They travel over JSON and query strings as
//! their SCREAMING_SNAKE_CASE names and are stored in that form as well.

use crate::error::{AppError, ErrorCode};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Top-level catalog category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WhiskeyCategory {
    SingleMalt,
    BlendedMalt,
    WorldWhiskey,
    GinVodka,
    WineLiqueur,
    SakeTraditional,
    Beer,
}

impl WhiskeyCategory {
    /// All categories, in display order
    pub const ALL: [WhiskeyCategory; 7] = [
        WhiskeyCategory::SingleMalt,
        WhiskeyCategory::BlendedMalt,
        WhiskeyCategory::WorldWhiskey,
        WhiskeyCategory::GinVodka,
        WhiskeyCategory::WineLiqueur,
        WhiskeyCategory::SakeTraditional,
        WhiskeyCategory::Beer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WhiskeyCategory::SingleMalt => "SINGLE_MALT",
            WhiskeyCategory::BlendedMalt => "BLENDED_MALT",
            WhiskeyCategory::WorldWhiskey => "WORLD_WHISKEY",
            WhiskeyCategory::GinVodka => "GIN_VODKA",
            WhiskeyCategory::WineLiqueur => "WINE_LIQUEUR",
            WhiskeyCategory::SakeTraditional => "SAKE_TRADITIONAL",
            WhiskeyCategory::Beer => "BEER",
        }
    }
}

impl std::fmt::Display for WhiskeyCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for WhiskeyCategory {
    type Err = AppError;

    /// Exact match on the wire name. Lowercase input is rejected, like any
    /// other unknown value.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::InvalidCategory,
                    format!("Unknown whiskey category: {s}"),
                )
                .with_detail("category", s)
            })
    }
}

/// Cask / style marker, an item may carry several
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WhiskeySubCategory {
    Sherry,
    Peat,
    Bourbon,
}

impl WhiskeySubCategory {
    pub const ALL: [WhiskeySubCategory; 3] = [
        WhiskeySubCategory::Sherry,
        WhiskeySubCategory::Peat,
        WhiskeySubCategory::Bourbon,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WhiskeySubCategory::Sherry => "SHERRY",
            WhiskeySubCategory::Peat => "PEAT",
            WhiskeySubCategory::Bourbon => "BOURBON",
        }
    }
}

impl std::fmt::Display for WhiskeySubCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for WhiskeySubCategory {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::InvalidSubCategory,
                    format!("Unknown whiskey sub-category: {s}"),
                )
                .with_detail("subCategory", s)
            })
    }
}
