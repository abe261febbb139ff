//! Whiskey catalog service
//!
//! Orchestrates lookups, conversion, storage writes and image file I/O.
//! Image files are not covered by the database transaction; the ordering
//! below keeps the damage of a partial failure to at most an orphaned file
//! or a missing old file, never a reference to a file that was not written.

use std::sync::Arc;

use shared::error::{AppError, ErrorCode};
use shared::models::{
    CategoryCount, ImageUploadResponse, Whiskey, WhiskeyCategory, WhiskeyRequest, WhiskeyResponse,
};
use shared::page::{PageRequest, PaginatedResponse};

use super::convert;
use super::image_store::{ImageStore, ImageUpload, managed_file_name};
use crate::db::{WhiskeyFilter, WhiskeyRepository};
use crate::error::{ServiceError, ServiceResult};

#[derive(Clone)]
pub struct WhiskeyService {
    repo: Arc<dyn WhiskeyRepository>,
    images: ImageStore,
}

impl WhiskeyService {
    pub fn new(repo: Arc<dyn WhiskeyRepository>, images: ImageStore) -> Self {
        Self { repo, images }
    }

    pub fn images(&self) -> &ImageStore {
        &self.images
    }

    /// Filtered, paginated listing
    pub async fn list(
        &self,
        category: Option<WhiskeyCategory>,
        search: Option<&str>,
        page: PageRequest,
    ) -> ServiceResult<PaginatedResponse<WhiskeyResponse>> {
        let filter = WhiskeyFilter::resolve(category, search);
        let (items, total) = self.repo.find_page(&filter, &page).await?;

        tracing::debug!(?filter, total, page = page.page, "Whiskeys listed");
        Ok(PaginatedResponse::new(items, total, page.page, page.size).map(convert::to_response))
    }

    pub async fn get(&self, id: i64) -> ServiceResult<WhiskeyResponse> {
        Ok(convert::to_response(self.require(id).await?))
    }

    /// Create an item; an uploaded image replaces any client-supplied reference.
    ///
    /// Client references to stored files are dropped; external URLs are kept.
    pub async fn create(
        &self,
        request: WhiskeyRequest,
        image: Option<ImageUpload>,
    ) -> ServiceResult<WhiskeyResponse> {
        let mut draft = convert::to_draft(request)?;
        if let Some(reference) = &draft.image_data_url
            && managed_file_name(reference).is_some()
        {
            tracing::debug!(%reference, "Ignoring client-supplied stored image reference");
            draft.image_data_url = None;
        }

        let stored = self.store_image(image).await?;
        if let Some(reference) = &stored {
            draft.image_data_url = Some(reference.clone());
        }

        match self.repo.insert(&draft).await {
            Ok(whiskey) => {
                tracing::info!(id = whiskey.id, name = %whiskey.name, "Whiskey created");
                Ok(convert::to_response(whiskey))
            }
            Err(e) => {
                self.discard(stored).await;
                Err(e.into())
            }
        }
    }

    /// Overwrite every field of an item.
    ///
    /// The image reference is not taken from the request: it stays as is
    /// unless a new file is uploaded, which then replaces the old one.
    pub async fn update(
        &self,
        id: i64,
        request: WhiskeyRequest,
        image: Option<ImageUpload>,
    ) -> ServiceResult<WhiskeyResponse> {
        let mut draft = convert::to_draft(request)?;
        let existing = self.require(id).await?;

        let stored = self.store_image(image).await?;
        draft.image_data_url = stored.clone().or_else(|| existing.image_data_url.clone());

        let updated = match self.repo.update(id, &draft).await {
            Ok(Some(whiskey)) => whiskey,
            Ok(None) => {
                self.discard(stored).await;
                return Err(AppError::whiskey_not_found(id).into());
            }
            Err(e) => {
                self.discard(stored).await;
                return Err(e.into());
            }
        };

        if stored.is_some()
            && let Some(old) = &existing.image_data_url
        {
            self.images.delete(old).await;
        }

        tracing::info!(id, "Whiskey updated");
        Ok(convert::to_response(updated))
    }

    /// Delete an item and its image file (file first, then the record)
    pub async fn delete(&self, id: i64) -> ServiceResult<()> {
        let existing = self.require(id).await?;

        if let Some(reference) = &existing.image_data_url {
            self.images.delete(reference).await;
        }
        if !self.repo.delete(id).await? {
            return Err(AppError::whiskey_not_found(id).into());
        }

        tracing::info!(id, "Whiskey deleted");
        Ok(())
    }

    /// Attach or replace the image of an item
    pub async fn upload_image(
        &self,
        id: i64,
        upload: ImageUpload,
    ) -> ServiceResult<ImageUploadResponse> {
        let existing = self.require(id).await?;
        if upload.bytes.is_empty() {
            return Err(AppError::new(ErrorCode::ImageEmpty).into());
        }

        let reference = self.images.save(&upload).await?;
        match self.repo.set_image(id, Some(&reference)).await {
            Ok(true) => {}
            Ok(false) => {
                self.images.delete(&reference).await;
                return Err(AppError::whiskey_not_found(id).into());
            }
            Err(e) => {
                self.images.delete(&reference).await;
                return Err(e.into());
            }
        }

        if let Some(old) = &existing.image_data_url {
            self.images.delete(old).await;
        }

        tracing::info!(id, image = %reference, "Whiskey image uploaded");
        Ok(ImageUploadResponse {
            image_data_url: reference,
        })
    }

    /// Clear the image reference, then remove the file
    pub async fn delete_image(&self, id: i64) -> ServiceResult<()> {
        let existing = self.require(id).await?;
        let Some(reference) = existing.image_data_url else {
            return Ok(());
        };

        if !self.repo.set_image(id, None).await? {
            return Err(AppError::whiskey_not_found(id).into());
        }
        self.images.delete(&reference).await;

        tracing::info!(id, "Whiskey image removed");
        Ok(())
    }

    /// Item count for every category, zero included, in category order
    pub async fn category_counts(&self) -> ServiceResult<Vec<CategoryCount>> {
        let counts = self.repo.count_by_category().await?;

        Ok(WhiskeyCategory::ALL
            .into_iter()
            .map(|category| CategoryCount {
                category,
                count: counts
                    .iter()
                    .find(|(c, _)| *c == category)
                    .map(|(_, n)| *n)
                    .unwrap_or(0),
            })
            .collect())
    }

    async fn require(&self, id: i64) -> ServiceResult<Whiskey> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::App(AppError::whiskey_not_found(id)))
    }

    async fn store_image(&self, image: Option<ImageUpload>) -> ServiceResult<Option<String>> {
        match image {
            Some(upload) if !upload.bytes.is_empty() => Ok(Some(self.images.save(&upload).await?)),
            _ => Ok(None),
        }
    }

    /// Remove a file written for a write that did not go through
    async fn discard(&self, stored: Option<String>) {
        if let Some(reference) = stored {
            self.images.delete(&reference).await;
        }
    }
}
