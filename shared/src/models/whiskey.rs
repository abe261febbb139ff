//! Whiskey Model

use super::category::{WhiskeyCategory, WhiskeySubCategory};
use serde::{Deserialize, Serialize};

/// Food pairing suggestion, ordered within an item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pairing {
    pub icon: String,
    pub name: String,
}

/// Whiskey entity (persisted)
///
/// Never sent over the wire directly; see [`WhiskeyResponse`].
#[derive(Debug, Clone, PartialEq)]
pub struct Whiskey {
    pub id: i64,
    pub name: String,
    pub english_name: Option<String>,
    pub brand: String,
    pub category: WhiskeyCategory,
    pub sub_categories: Vec<WhiskeySubCategory>,
    /// Alcohol by volume, percent
    pub abv: Option<f64>,
    /// Bottle volume, millilitres
    pub volume: Option<f64>,
    pub nation: Option<String>,
    pub region: Option<String>,
    /// Image reference, e.g. `/images/<uuid>.png`
    pub image_data_url: Option<String>,
    pub notes: Option<String>,
    pub nose: Option<String>,
    pub palate: Option<String>,
    pub finish: Option<String>,
    pub personal_note: Option<String>,
    pub star_point: f64,
    pub pairings: Vec<Pairing>,
    pub flavor_tags: Vec<String>,
    /// Unix millis, set once on insert
    pub created_at: i64,
    /// Unix millis, bumped on every write
    pub updated_at: i64,
}

/// Everything a write stores, minus identity and timestamps.
///
/// Defaults are already applied: lists are never absent and the rating is a
/// plain number.
#[derive(Debug, Clone, PartialEq)]
pub struct WhiskeyDraft {
    pub name: String,
    pub english_name: Option<String>,
    pub brand: String,
    pub category: WhiskeyCategory,
    pub sub_categories: Vec<WhiskeySubCategory>,
    pub abv: Option<f64>,
    pub volume: Option<f64>,
    pub nation: Option<String>,
    pub region: Option<String>,
    pub image_data_url: Option<String>,
    pub notes: Option<String>,
    pub nose: Option<String>,
    pub palate: Option<String>,
    pub finish: Option<String>,
    pub personal_note: Option<String>,
    pub star_point: f64,
    pub pairings: Vec<Pairing>,
    pub flavor_tags: Vec<String>,
}

/// Create / update payload
///
/// Every field is optional on the wire; required fields are checked when the
/// request is turned into a [`WhiskeyDraft`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhiskeyRequest {
    pub name: Option<String>,
    pub english_name: Option<String>,
    pub brand: Option<String>,
    pub category: Option<WhiskeyCategory>,
    pub sub_categories: Option<Vec<WhiskeySubCategory>>,
    pub abv: Option<f64>,
    pub volume: Option<f64>,
    pub nation: Option<String>,
    pub region: Option<String>,
    pub image_data_url: Option<String>,
    pub notes: Option<String>,
    pub nose: Option<String>,
    pub palate: Option<String>,
    pub finish: Option<String>,
    pub personal_note: Option<String>,
    pub star_point: Option<f64>,
    pub pairings: Option<Vec<Pairing>>,
    pub flavor_tags: Option<Vec<String>>,
}

/// Outbound representation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhiskeyResponse {
    pub id: i64,
    pub name: String,
    pub english_name: Option<String>,
    pub brand: String,
    pub category: WhiskeyCategory,
    pub sub_categories: Vec<WhiskeySubCategory>,
    pub abv: Option<f64>,
    pub volume: Option<f64>,
    pub nation: Option<String>,
    pub region: Option<String>,
    pub image_data_url: Option<String>,
    pub notes: Option<String>,
    pub nose: Option<String>,
    pub palate: Option<String>,
    pub finish: Option<String>,
    pub personal_note: Option<String>,
    pub star_point: f64,
    pub pairings: Vec<Pairing>,
    pub flavor_tags: Vec<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Result of an explicit image upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageUploadResponse {
    pub image_data_url: String,
}

/// Item count for one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: WhiskeyCategory,
    pub count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_deserialize_camel_case() {
        let json = r#"{
            "name": "Lagavulin 16",
            "englishName": "Lagavulin 16",
            "brand": "Lagavulin",
            "category": "SINGLE_MALT",
            "subCategories": ["PEAT"],
            "starPoint": 4.5,
            "pairings": [{"icon": "🧀", "name": "Blue cheese"}],
            "flavorTags": ["smoke", "iodine"]
        }"#;
        let req: WhiskeyRequest = serde_json::from_str(json).unwrap();

        assert_eq!(req.name.as_deref(), Some("Lagavulin 16"));
        assert_eq!(req.category, Some(WhiskeyCategory::SingleMalt));
        assert_eq!(req.sub_categories, Some(vec![WhiskeySubCategory::Peat]));
        assert_eq!(req.star_point, Some(4.5));
        assert_eq!(req.pairings.as_ref().unwrap()[0].name, "Blue cheese");
        assert!(req.abv.is_none());
        assert!(req.image_data_url.is_none());
    }

    #[test]
    fn test_request_rejects_unknown_category() {
        let result: Result<WhiskeyRequest, _> =
            serde_json::from_str(r#"{"name":"x","brand":"y","category":"RUM"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_upload_response_shape() {
        let resp = ImageUploadResponse {
            image_data_url: "/images/a.png".to_string(),
        };
        assert_eq!(
            serde_json::to_string(&resp).unwrap(),
            r#"{"imageDataUrl":"/images/a.png"}"#
        );
    }
}
