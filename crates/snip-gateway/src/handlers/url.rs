use crate::error::Result;
use crate::model::{validate_url, UrlRequest, UrlResponse};
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use snip_core::ShortCode;
use tracing::info;

/// `POST /api/v1/short`: `201` for a new record, `200` when the URL was
/// already shortened.
pub async fn create_url_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<UrlRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UrlResponse>)> {
    let Json(request) = payload?;
    let url = validate_url(&request.url)?;

    let ctx = state.request_context();
    let shortened = state.shortener().create_short_url(&ctx, url).await?;

    let status = if shortened.is_created() {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    let response = UrlResponse::from_record(shortened.into_record(), state.base_url());
    Ok((status, Json(response)))
}

pub async fn get_url_handler(
    State(state): State<AppState>,
    Path(short_url): Path<String>,
) -> Result<Json<UrlResponse>> {
    let code = ShortCode::new(short_url)?;

    let ctx = state.request_context();
    let record = state.shortener().get_url_data(&ctx, &code).await?;

    Ok(Json(UrlResponse::from_record(record, state.base_url())))
}

pub async fn update_url_handler(
    State(state): State<AppState>,
    Path(short_url): Path<String>,
    payload: std::result::Result<Json<UrlRequest>, JsonRejection>,
) -> Result<Json<UrlResponse>> {
    let code = ShortCode::new(short_url)?;
    let Json(request) = payload?;
    let url = validate_url(&request.url)?;

    let ctx = state.request_context();
    let record = state.shortener().update_url(&ctx, &code, url).await?;
    info!(code = %record.short_code, url = %record.original_url, "short url updated");

    Ok(Json(UrlResponse::from_record(record, state.base_url())))
}

pub async fn delete_url_handler(
    State(state): State<AppState>,
    Path(short_url): Path<String>,
) -> Result<StatusCode> {
    let code = ShortCode::new(short_url)?;

    let ctx = state.request_context();
    state.shortener().delete_url(&ctx, &code).await?;
    info!(code = %code, "short url deleted");

    Ok(StatusCode::NO_CONTENT)
}
