//! Whiskey API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{CategoryCount, ImageUploadResponse, WhiskeyCategory, WhiskeyResponse};
use shared::page::{PageRequest, PaginatedResponse};

use crate::api::multipart::{ImageForm, WhiskeyForm};
use crate::state::AppState;

/// 列表查询参数
///
/// 全部按原始字符串接收，空白值视为缺省。
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub category: Option<String>,
    pub search: Option<String>,
    /// `/search` 的关键字
    pub q: Option<String>,
    pub page: Option<String>,
    pub size: Option<String>,
    pub sort: Option<String>,
}

impl ListQuery {
    fn page_request(&self) -> AppResult<PageRequest> {
        PageRequest::parse(
            self.page.as_deref(),
            self.size.as_deref(),
            self.sort.as_deref(),
        )
    }

    fn category(&self) -> AppResult<Option<WhiskeyCategory>> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::parse)
            .transpose()
    }
}

type Page = Json<PaginatedResponse<WhiskeyResponse>>;

/// GET /api/whiskeys - 分页列表 (可按分类 / 关键字过滤)
pub async fn list(State(state): State<AppState>, Query(query): Query<ListQuery>) -> AppResult<Page> {
    let category = query.category()?;
    let page = query.page_request()?;
    let result = state
        .whiskeys
        .list(category, query.search.as_deref(), page)
        .await?;
    Ok(Json(result))
}

/// GET /api/whiskeys/category/{category} - 按分类获取
pub async fn list_by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
    Query(query): Query<ListQuery>,
) -> AppResult<Page> {
    let category: WhiskeyCategory = category.parse()?;
    let page = query.page_request()?;
    let result = state
        .whiskeys
        .list(Some(category), query.search.as_deref(), page)
        .await?;
    Ok(Json(result))
}

/// GET /api/whiskeys/search?q= - 按名称或品牌搜索
pub async fn search(State(state): State<AppState>, Query(query): Query<ListQuery>) -> AppResult<Page> {
    let q = query.q.as_deref().ok_or_else(|| AppError::required("q"))?;
    let category = query.category()?;
    let page = query.page_request()?;
    let result = state.whiskeys.list(category, Some(q), page).await?;
    Ok(Json(result))
}

/// GET /api/whiskeys/categories - 各分类数量
pub async fn category_counts(State(state): State<AppState>) -> AppResult<Json<Vec<CategoryCount>>> {
    Ok(Json(state.whiskeys.category_counts().await?))
}

/// GET /api/whiskeys/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<WhiskeyResponse>> {
    Ok(Json(state.whiskeys.get(id).await?))
}

/// POST /api/whiskeys - 创建 (multipart)
pub async fn create(
    State(state): State<AppState>,
    form: WhiskeyForm,
) -> AppResult<(StatusCode, Json<WhiskeyResponse>)> {
    let created = state.whiskeys.create(form.request, form.image).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /api/whiskeys/{id} - 整体覆盖更新 (multipart)
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    form: WhiskeyForm,
) -> AppResult<Json<WhiskeyResponse>> {
    Ok(Json(state.whiskeys.update(id, form.request, form.image).await?))
}

/// DELETE /api/whiskeys/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<StatusCode> {
    state.whiskeys.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/whiskeys/{id}/image - 上传 / 替换图片
pub async fn upload_image(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    form: ImageForm,
) -> AppResult<Json<ImageUploadResponse>> {
    let upload = form
        .image
        .ok_or_else(|| AppError::new(ErrorCode::NoImageProvided))?;
    Ok(Json(state.whiskeys.upload_image(id, upload).await?))
}

/// DELETE /api/whiskeys/{id}/image
pub async fn delete_image(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state.whiskeys.delete_image(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
