use axum::http::{header, HeaderValue, Method};
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{
    create_url_handler, delete_url_handler, get_url_handler, health_handler, redirect_handler,
    update_url_handler,
};
use crate::middleware::rate_limit;
use crate::state::AppState;

pub struct App {}

impl App {
    pub fn router(state: AppState) -> Router {
        let api = Router::new().route("/short", post(create_url_handler)).route(
            "/short/{short_url}",
            get(get_url_handler)
                .put(update_url_handler)
                .delete(delete_url_handler),
        );

        Router::new()
            .route("/health", get(health_handler))
            .nest("/api/v1", api)
            .route("/{short_url}", get(redirect_handler))
            .layer(middleware::from_fn_with_state(state.clone(), rate_limit))
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(Self::cors())
                    .layer(SetResponseHeaderLayer::overriding(
                        header::X_CONTENT_TYPE_OPTIONS,
                        HeaderValue::from_static("nosniff"),
                    )),
            )
            .with_state(state)
    }

    fn cors() -> CorsLayer {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers(Any)
    }
}
