use crate::error::{AppError, Result};
use crate::model::validate_url;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use snip_core::ShortCode;
use tracing::debug;

/// `GET /{short_url}`: permanent redirect to the stored URL.
pub async fn redirect_handler(
    State(state): State<AppState>,
    Path(short_url): Path<String>,
) -> Result<Response> {
    let code = ShortCode::new(short_url)?;

    let ctx = state.request_context();
    let record = state.shortener().get_url_data(&ctx, &code).await?;

    // records may predate the current validation rules
    let target = validate_url(&record.original_url)?;
    let location = HeaderValue::from_str(target)
        .map_err(|_| AppError::InvalidUrl("stored url is not a valid header value".into()))?;

    debug!(code = %code, url = %target, "redirecting");
    Ok((StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, location)]).into_response())
}
