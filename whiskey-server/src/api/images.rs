//! Serve stored images at `/images/{filename}`

use axum::{
    Router,
    body::Bytes,
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
};
use http::header;
use shared::error::{AppError, AppResult};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/images/{filename}", get(serve_image))
}

async fn serve_image(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> AppResult<impl IntoResponse> {
    // 防止路径穿越
    let path = state
        .whiskeys
        .images()
        .path_for(&filename)
        .ok_or_else(|| AppError::not_found(format!("Image {filename}")))?;

    let content = match tokio::fs::read(&path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AppError::not_found(format!("Image {filename}")));
        }
        Err(e) => {
            return Err(AppError::storage(format!("Failed to read image: {e}")));
        }
    };

    let mime = mime_guess::from_path(&path).first_or_octet_stream();
    Ok((
        [(header::CONTENT_TYPE, mime.essence_str().to_string())],
        Bytes::from(content),
    ))
}
