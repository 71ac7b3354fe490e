mod health;
mod url;

pub use health::HealthResponse;
pub use url::{validate_url, ErrorResponse, UrlRequest, UrlResponse, MAX_URL_LENGTH};
