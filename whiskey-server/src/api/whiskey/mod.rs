//! Whiskey API 模块

mod handler;

use axum::{Router, routing::get};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/api/whiskeys", whiskey_routes())
}

fn whiskey_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/search", get(handler::search))
        .route("/categories", get(handler::category_counts))
        .route("/category/{category}", get(handler::list_by_category))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route(
            "/{id}/image",
            axum::routing::post(handler::upload_image).delete(handler::delete_image),
        )
}
