//! Multipart form binding
//!
//! Create/update accept `multipart/form-data`:
//! - text parts named after the camelCase request fields
//! - `subCategories` / `flavorTags` as repeated parts, one value each
//! - `pairings` as a JSON array part
//! - `data` carrying the whole request as one JSON object (individual parts win)
//! - an optional `image` file part

use axum::extract::{FromRequest, Multipart, Request};
use axum::extract::multipart::{Field, MultipartError};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::WhiskeyRequest;

use crate::services::ImageUpload;

/// File part name
const IMAGE_PART: &str = "image";
/// JSON part carrying a whole request
const DATA_PART: &str = "data";

/// Create / update form
#[derive(Debug)]
pub struct WhiskeyForm {
    pub request: WhiskeyRequest,
    /// `None` when the part is missing or the file is empty
    pub image: Option<ImageUpload>,
}

/// Explicit image upload form
#[derive(Debug)]
pub struct ImageForm {
    /// The `image` part as sent, empty files included
    pub image: Option<ImageUpload>,
}

impl<S> FromRequest<S> for WhiskeyForm
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mut multipart = open(req, state).await?;

        let mut base: Option<WhiskeyRequest> = None;
        let mut parts = WhiskeyRequest::default();
        let mut image = None;

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let Some(name) = field.name().map(str::to_owned) else {
                continue;
            };

            match name.as_str() {
                IMAGE_PART => {
                    let upload = read_file(field).await?;
                    if !upload.bytes.is_empty() {
                        image = Some(upload);
                    }
                }
                DATA_PART => {
                    let text = field.text().await.map_err(multipart_error)?;
                    if !text.trim().is_empty() {
                        base = Some(serde_json::from_str(&text).map_err(|e| {
                            AppError::with_message(
                                ErrorCode::InvalidFormat,
                                format!("Invalid data part: {e}"),
                            )
                            .with_detail("field", DATA_PART)
                        })?);
                    }
                }
                _ => {
                    let text = field.text().await.map_err(multipart_error)?;
                    apply_part(&mut parts, &name, text)?;
                }
            }
        }

        let request = match base {
            Some(base) => merge(base, parts),
            None => parts,
        };
        Ok(Self { request, image })
    }
}

impl<S> FromRequest<S> for ImageForm
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mut multipart = open(req, state).await?;

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            if field.name() == Some(IMAGE_PART) {
                return Ok(Self {
                    image: Some(read_file(field).await?),
                });
            }
        }
        Ok(Self { image: None })
    }
}

async fn open<S: Send + Sync>(req: Request, state: &S) -> AppResult<Multipart> {
    Multipart::from_request(req, state).await.map_err(|e| {
        AppError::invalid_request(format!("Expected a multipart form: {}", e.body_text()))
    })
}

async fn read_file(field: Field<'_>) -> AppResult<ImageUpload> {
    let file_name = field.file_name().map(str::to_owned);
    let bytes = field.bytes().await.map_err(multipart_error)?;
    Ok(ImageUpload { file_name, bytes })
}

fn multipart_error(e: MultipartError) -> AppError {
    AppError::invalid_request(format!("Invalid multipart request: {e}"))
}

/// Bind one text part onto the request
fn apply_part(req: &mut WhiskeyRequest, name: &str, value: String) -> AppResult<()> {
    match name {
        "name" => req.name = text(value),
        "englishName" => req.english_name = text(value),
        "brand" => req.brand = text(value),
        "nation" => req.nation = text(value),
        "region" => req.region = text(value),
        "imageDataUrl" => req.image_data_url = text(value),
        "notes" => req.notes = text(value),
        "nose" => req.nose = text(value),
        "palate" => req.palate = text(value),
        "finish" => req.finish = text(value),
        "personalNote" => req.personal_note = text(value),
        "category" => {
            req.category = non_blank(&value).map(str::parse).transpose()?;
        }
        "subCategories" => {
            if let Some(v) = non_blank(&value) {
                req.sub_categories
                    .get_or_insert_with(Vec::new)
                    .push(v.parse()?);
            }
        }
        "flavorTags" => {
            if let Some(v) = non_blank(&value) {
                req.flavor_tags
                    .get_or_insert_with(Vec::new)
                    .push(v.to_string());
            }
        }
        "abv" => req.abv = number(name, &value)?,
        "volume" => req.volume = number(name, &value)?,
        "starPoint" => req.star_point = number(name, &value)?,
        "pairings" => {
            if let Some(v) = non_blank(&value) {
                req.pairings = Some(serde_json::from_str(v).map_err(|e| {
                    AppError::with_message(
                        ErrorCode::InvalidFormat,
                        format!("pairings must be a JSON array of {{icon, name}}: {e}"),
                    )
                    .with_detail("field", "pairings")
                })?);
            }
        }
        other => tracing::debug!(field = %other, "Ignoring unknown form field"),
    }
    Ok(())
}

/// Individual parts override the `data` part field by field
fn merge(base: WhiskeyRequest, parts: WhiskeyRequest) -> WhiskeyRequest {
    WhiskeyRequest {
        name: parts.name.or(base.name),
        english_name: parts.english_name.or(base.english_name),
        brand: parts.brand.or(base.brand),
        category: parts.category.or(base.category),
        sub_categories: parts.sub_categories.or(base.sub_categories),
        abv: parts.abv.or(base.abv),
        volume: parts.volume.or(base.volume),
        nation: parts.nation.or(base.nation),
        region: parts.region.or(base.region),
        image_data_url: parts.image_data_url.or(base.image_data_url),
        notes: parts.notes.or(base.notes),
        nose: parts.nose.or(base.nose),
        palate: parts.palate.or(base.palate),
        finish: parts.finish.or(base.finish),
        personal_note: parts.personal_note.or(base.personal_note),
        star_point: parts.star_point.or(base.star_point),
        pairings: parts.pairings.or(base.pairings),
        flavor_tags: parts.flavor_tags.or(base.flavor_tags),
    }
}

fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

fn text(value: String) -> Option<String> {
    (!value.trim().is_empty()).then_some(value)
}

/// Blank is absent, anything else must parse
fn number(field: &str, value: &str) -> AppResult<Option<f64>> {
    non_blank(value)
        .map(|v| {
            v.parse::<f64>().map_err(|_| {
                AppError::with_message(
                    ErrorCode::InvalidFormat,
                    format!("{field} must be a number, got {v}"),
                )
                .with_detail("field", field)
            })
        })
        .transpose()
}


#[cfg(test)]
mod tests {
    use super::testing::FormBuilder;
    use super::*;
    use axum::body::Body;
    use shared::models::{Pairing, WhiskeyCategory, WhiskeySubCategory};

    async fn bind(builder: FormBuilder) -> AppResult<WhiskeyForm> {
        WhiskeyForm::from_request(builder.into_request("POST", "/"), &()).await
    }

    #[tokio::test]
    async fn test_binds_individual_parts() {
        let form = bind(
            FormBuilder::new()
                .text("name", "Lagavulin 16")
                .text("brand", "Lagavulin")
                .text("category", "SINGLE_MALT")
                .text("subCategories", "PEAT")
                .text("subCategories", "SHERRY")
                .text("flavorTags", "smoke")
                .text("flavorTags", "iodine")
                .text("abv", "43")
                .text("volume", " ")
                .text("starPoint", "4.5")
                .text("pairings", r#"[{"icon":"🧀","name":"Stilton"}]"#)
                .text("unknown", "ignored"),
        )
        .await
        .unwrap();

        let req = form.request;
        assert_eq!(req.name.as_deref(), Some("Lagavulin 16"));
        assert_eq!(req.category, Some(WhiskeyCategory::SingleMalt));
        assert_eq!(
            req.sub_categories,
            Some(vec![WhiskeySubCategory::Peat, WhiskeySubCategory::Sherry])
        );
        assert_eq!(
            req.flavor_tags,
            Some(vec!["smoke".to_string(), "iodine".to_string()])
        );
        assert_eq!(req.abv, Some(43.0));
        assert_eq!(req.volume, None);
        assert_eq!(req.star_point, Some(4.5));
        assert_eq!(
            req.pairings,
            Some(vec![Pairing {
                icon: "🧀".into(),
                name: "Stilton".into()
            }])
        );
        assert!(form.image.is_none());
    }

    #[tokio::test]
    async fn test_data_part_merged_with_parts_winning() {
        let form = bind(
            FormBuilder::new()
                .text("brand", "Override")
                .text(
                    "data",
                    r#"{"name":"Oban 14","brand":"Oban","category":"SINGLE_MALT","flavorTags":["citrus"]}"#,
                ),
        )
        .await
        .unwrap();

        assert_eq!(form.request.name.as_deref(), Some("Oban 14"));
        assert_eq!(form.request.brand.as_deref(), Some("Override"));
        assert_eq!(form.request.category, Some(WhiskeyCategory::SingleMalt));
        assert_eq!(form.request.flavor_tags, Some(vec!["citrus".to_string()]));
    }

    #[tokio::test]
    async fn test_image_part() {
        let form = bind(
            FormBuilder::new()
                .text("name", "x")
                .file("image", "label.png", b"\x89PNG"),
        )
        .await
        .unwrap();
        let image = form.image.unwrap();
        assert_eq!(image.file_name.as_deref(), Some("label.png"));
        assert_eq!(&image.bytes[..], b"\x89PNG");

        let form = bind(FormBuilder::new().file("image", "empty.png", b""))
            .await
            .unwrap();
        assert!(form.image.is_none());
    }

    #[tokio::test]
    async fn test_rejects_bad_values() {
        let err = bind(FormBuilder::new().text("category", "RUM"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidCategory);

        let err = bind(FormBuilder::new().text("subCategories", "SMOKE"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidSubCategory);

        let err = bind(FormBuilder::new().text("abv", "strong"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidFormat);
        assert_eq!(err.http_status(), http::StatusCode::BAD_REQUEST);

        let err = bind(FormBuilder::new().text("pairings", "cheese"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidFormat);

        let err = bind(FormBuilder::new().text("data", "{not json"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidFormat);
    }

    #[tokio::test]
    async fn test_blank_category_is_absent() {
        let form = bind(FormBuilder::new().text("category", "  ")).await.unwrap();
        assert_eq!(form.request.category, None);
    }

    #[tokio::test]
    async fn test_non_multipart_body_rejected() {
        let req = http::Request::builder()
            .method("POST")
            .uri("/")
            .header(http::header::CONTENT_TYPE, "application/json")
            .body(Body::from("{}"))
            .unwrap();
        let err = WhiskeyForm::from_request(req, &()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn test_image_form_keeps_empty_file() {
        let req = FormBuilder::new()
            .file("image", "a.png", b"")
            .into_request("POST", "/");
        let form = ImageForm::from_request(req, &()).await.unwrap();
        assert!(form.image.unwrap().bytes.is_empty());

        let req = FormBuilder::new()
            .text("other", "x")
            .into_request("POST", "/");
        let form = ImageForm::from_request(req, &()).await.unwrap();
        assert!(form.image.is_none());
    }
}
