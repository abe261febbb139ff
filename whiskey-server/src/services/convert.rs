//! Request / entity / response mapping
//!
//! Defaults for optional fields are applied here and nowhere else: absent
//! lists become empty, an absent rating becomes 0.0.

use shared::error::{AppError, AppResult};
use shared::models::{Whiskey, WhiskeyDraft, WhiskeyRequest, WhiskeyResponse};

use crate::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, MAX_URL_LEN, validate_number,
    validate_optional_text, validate_required_text, validate_text,
};

/// Validate an inbound request and turn it into a storable draft
pub fn to_draft(req: WhiskeyRequest) -> AppResult<WhiskeyDraft> {
    let name = validate_required_text(req.name, "name", MAX_NAME_LEN)?;
    let brand = validate_required_text(req.brand, "brand", MAX_NAME_LEN)?;
    let category = req
        .category
        .ok_or_else(|| AppError::required("category"))?;

    validate_optional_text(&req.english_name, "englishName", MAX_NAME_LEN)?;
    validate_optional_text(&req.nation, "nation", MAX_NAME_LEN)?;
    validate_optional_text(&req.region, "region", MAX_NAME_LEN)?;
    validate_optional_text(&req.image_data_url, "imageDataUrl", MAX_URL_LEN)?;
    for (value, field) in [
        (&req.notes, "notes"),
        (&req.nose, "nose"),
        (&req.palate, "palate"),
        (&req.finish, "finish"),
        (&req.personal_note, "personalNote"),
    ] {
        validate_optional_text(value, field, MAX_NOTE_LEN)?;
    }
    validate_number(req.abv, "abv")?;
    validate_number(req.volume, "volume")?;
    validate_number(req.star_point, "starPoint")?;

    let flavor_tags = req.flavor_tags.unwrap_or_default();
    for tag in &flavor_tags {
        validate_text(tag, "flavorTags", MAX_SHORT_TEXT_LEN)?;
    }
    let pairings = req.pairings.unwrap_or_default();
    for p in &pairings {
        validate_text(&p.icon, "pairings.icon", MAX_SHORT_TEXT_LEN)?;
        validate_text(&p.name, "pairings.name", MAX_SHORT_TEXT_LEN)?;
    }

    Ok(WhiskeyDraft {
        name,
        english_name: req.english_name,
        brand,
        category,
        sub_categories: req.sub_categories.unwrap_or_default(),
        abv: req.abv,
        volume: req.volume,
        nation: req.nation,
        region: req.region,
        image_data_url: req.image_data_url,
        notes: req.notes,
        nose: req.nose,
        palate: req.palate,
        finish: req.finish,
        personal_note: req.personal_note,
        star_point: req.star_point.unwrap_or(0.0),
        pairings,
        flavor_tags,
    })
}

pub fn to_response(w: Whiskey) -> WhiskeyResponse {
    WhiskeyResponse {
        id: w.id,
        name: w.name,
        english_name: w.english_name,
        brand: w.brand,
        category: w.category,
        sub_categories: w.sub_categories,
        abv: w.abv,
        volume: w.volume,
        nation: w.nation,
        region: w.region,
        image_data_url: w.image_data_url,
        notes: w.notes,
        nose: w.nose,
        palate: w.palate,
        finish: w.finish,
        personal_note: w.personal_note,
        star_point: w.star_point,
        pairings: w.pairings,
        flavor_tags: w.flavor_tags,
        created_at: w.created_at,
        updated_at: w.updated_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::error::ErrorCode;
    use shared::models::{Pairing, WhiskeyCategory, WhiskeySubCategory};

    /// What a client sends back after editing a fetched item
    fn to_request(r: &WhiskeyResponse) -> WhiskeyRequest {
        WhiskeyRequest {
            name: Some(r.name.clone()),
            english_name: r.english_name.clone(),
            brand: Some(r.brand.clone()),
            category: Some(r.category),
            sub_categories: Some(r.sub_categories.clone()),
            abv: r.abv,
            volume: r.volume,
            nation: r.nation.clone(),
            region: r.region.clone(),
            image_data_url: r.image_data_url.clone(),
            notes: r.notes.clone(),
            nose: r.nose.clone(),
            palate: r.palate.clone(),
            finish: r.finish.clone(),
            personal_note: r.personal_note.clone(),
            star_point: Some(r.star_point),
            pairings: Some(r.pairings.clone()),
            flavor_tags: Some(r.flavor_tags.clone()),
        }
    }

    fn minimal() -> WhiskeyRequest {
        WhiskeyRequest {
            name: Some("Test".into()),
            brand: Some("Acme".into()),
            category: Some(WhiskeyCategory::SingleMalt),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults_applied() {
        let draft = to_draft(minimal()).unwrap();
        assert_eq!(draft.star_point, 0.0);
        assert!(draft.sub_categories.is_empty());
        assert!(draft.flavor_tags.is_empty());
        assert!(draft.pairings.is_empty());
        assert!(draft.image_data_url.is_none());
    }

    #[test]
    fn test_missing_required_fields() {
        let err = to_draft(WhiskeyRequest {
            name: None,
            ..minimal()
        })
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::RequiredField);

        let err = to_draft(WhiskeyRequest {
            brand: Some(" ".into()),
            ..minimal()
        })
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::RequiredField);

        let err = to_draft(WhiskeyRequest {
            category: None,
            ..minimal()
        })
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::RequiredField);
        assert_eq!(err.message, "category is required");
    }

    #[test]
    fn test_pairings_keep_order() {
        let pairings = vec![
            Pairing {
                icon: "🧀".into(),
                name: "Cheese".into(),
            },
            Pairing {
                icon: "🍫".into(),
                name: "Chocolate".into(),
            },
        ];
        let draft = to_draft(WhiskeyRequest {
            pairings: Some(pairings.clone()),
            ..minimal()
        })
        .unwrap();
        assert_eq!(draft.pairings, pairings);
    }

    #[test]
    fn test_response_request_round_trip() {
        let response = WhiskeyResponse {
            id: 9,
            name: "Oban 14".into(),
            english_name: Some("Oban 14".into()),
            brand: "Oban".into(),
            category: WhiskeyCategory::SingleMalt,
            sub_categories: vec![WhiskeySubCategory::Sherry],
            abv: Some(43.0),
            volume: Some(700.0),
            nation: Some("Scotland".into()),
            region: Some("Highland".into()),
            image_data_url: Some("/images/a.jpg".into()),
            notes: Some("n".into()),
            nose: Some("honey".into()),
            palate: Some("orange".into()),
            finish: Some("sea salt".into()),
            personal_note: Some("gift".into()),
            star_point: 4.0,
            pairings: vec![Pairing {
                icon: "🦪".into(),
                name: "Oyster".into(),
            }],
            flavor_tags: vec!["citrus".into()],
            created_at: 1,
            updated_at: 2,
        };

        let draft = to_draft(to_request(&response)).unwrap();
        assert_eq!(draft.name, response.name);
        assert_eq!(draft.english_name, response.english_name);
        assert_eq!(draft.category, response.category);
        assert_eq!(draft.sub_categories, response.sub_categories);
        assert_eq!(draft.abv, response.abv);
        assert_eq!(draft.image_data_url, response.image_data_url);
        assert_eq!(draft.personal_note, response.personal_note);
        assert_eq!(draft.star_point, response.star_point);
        assert_eq!(draft.pairings, response.pairings);
        assert_eq!(draft.flavor_tags, response.flavor_tags);
    }

    #[test]
    fn test_to_response_copies_timestamps() {
        let draft = to_draft(minimal()).unwrap();
        let whiskey = Whiskey {
            id: 3,
            name: draft.name,
            english_name: None,
            brand: draft.brand,
            category: draft.category,
            sub_categories: vec![],
            abv: None,
            volume: None,
            nation: None,
            region: None,
            image_data_url: None,
            notes: None,
            nose: None,
            palate: None,
            finish: None,
            personal_note: None,
            star_point: 0.0,
            pairings: vec![],
            flavor_tags: vec![],
            created_at: 100,
            updated_at: 200,
        };
        let response = to_response(whiskey);
        assert_eq!(response.id, 3);
        assert_eq!(response.created_at, 100);
        assert_eq!(response.updated_at, 200);

        // The response is the only wire form of a stored item
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["createdAt"], 100);
        assert_eq!(json["updatedAt"], 200);
        assert_eq!(json["starPoint"], 0.0);
        assert!(json["imageDataUrl"].is_null());
    }
}
