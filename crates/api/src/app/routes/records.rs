use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use spindle_catalog::RecordFilter;
use spindle_core::RecordId;
use spindle_infra::services::{DEFAULT_LIMIT, DEFAULT_PAGE};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/records", post(create_record).get(list_records))
        .route(
            "/records/:id",
            get(get_record).put(update_record).delete(delete_record),
        )
}

pub async fn create_record(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateRecordRequest>,
) -> axum::response::Response {
    match services.records.create_record(body.into_new_record()).await {
        Ok(record) => (
            StatusCode::CREATED,
            Json(dto::envelope("Record created successfully", record)),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn list_records(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::ListRecordsQuery>,
) -> axum::response::Response {
    let filter = RecordFilter {
        q: query.q,
        artist: query.artist,
        album: query.album,
        format: query.format,
        category: query.category,
    };
    let page = query.page.unwrap_or(DEFAULT_PAGE);
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT);

    match services.records.list_records(filter, page, limit).await {
        Ok(page) => (
            StatusCode::OK,
            Json(dto::envelope("Records fetched successfully", page)),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn get_record(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: RecordId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid record id")
        }
    };

    match services.records.get_record(id).await {
        Ok(record) => (
            StatusCode::OK,
            Json(dto::envelope("Record found successfully", record)),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn update_record(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateRecordRequest>,
) -> axum::response::Response {
    let id: RecordId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid record id")
        }
    };

    match services.records.update_record(id, body.into_patch()).await {
        Ok(record) => (
            StatusCode::OK,
            Json(dto::envelope("Record updated successfully", record)),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn delete_record(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: RecordId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid record id")
        }
    };

    match services.records.delete_record(id).await {
        Ok(record) => (
            StatusCode::OK,
            Json(dto::envelope("Record deleted successfully", record)),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
