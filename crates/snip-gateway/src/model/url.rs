use crate::error::AppError;
use axum::http::uri::{Scheme, Uri};
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use snip_core::UrlRecord;

/// Longest original URL the API accepts, in bytes.
pub const MAX_URL_LENGTH: usize = 2048;

/// Body of create and update requests.
#[derive(Debug, Deserialize)]
pub struct UrlRequest {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlResponse {
    pub short_url: String,
    /// Full link under the public base URL.
    pub short_link: String,
    pub original_url: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl UrlResponse {
    pub fn from_record(record: UrlRecord, base_url: &str) -> Self {
        Self {
            short_link: record.short_code.to_url(base_url),
            short_url: record.short_code.as_str().to_owned(),
            original_url: record.original_url,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Checks that `raw` is an absolute http(s) URL with a host.
pub fn validate_url(raw: &str) -> Result<&str, AppError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidUrl("url must not be empty".into()));
    }
    if trimmed.len() > MAX_URL_LENGTH {
        return Err(AppError::InvalidUrl(format!(
            "url must be at most {MAX_URL_LENGTH} bytes"
        )));
    }

    let uri: Uri = trimmed
        .parse()
        .map_err(|e| AppError::InvalidUrl(format!("malformed url: {e}")))?;

    match uri.scheme() {
        Some(scheme) if *scheme == Scheme::HTTP || *scheme == Scheme::HTTPS => {}
        _ => return Err(AppError::InvalidUrl("url scheme must be http or https".into())),
    }
    if uri.host().map_or(true, str::is_empty) {
        return Err(AppError::InvalidUrl("url must have a host".into()));
    }

    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use snip_core::ShortCode;

    #[test]
    fn accepts_http_and_https() {
        assert_eq!(validate_url("https://example.com").unwrap(), "https://example.com");
        assert!(validate_url("http://example.com/a/b?c=d#frag").is_ok());
        assert!(validate_url("https://user@example.com:8443/path").is_ok());
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        assert_eq!(validate_url("  https://example.com \n").unwrap(), "https://example.com");
    }

    #[test]
    fn rejects_empty() {
        assert!(matches!(validate_url(""), Err(AppError::InvalidUrl(_))));
        assert!(matches!(validate_url("   "), Err(AppError::InvalidUrl(_))));
    }

    #[test]
    fn rejects_other_schemes() {
        assert!(validate_url("ftp://example.com").is_err());
        assert!(validate_url("javascript:alert(1)").is_err());
    }

    #[test]
    fn rejects_relative_urls() {
        assert!(validate_url("/just/a/path").is_err());
        assert!(validate_url("example.com").is_err());
    }

    #[test]
    fn rejects_overlong_urls() {
        let url = format!("https://example.com/{}", "a".repeat(MAX_URL_LENGTH));
        assert!(matches!(validate_url(&url), Err(AppError::InvalidUrl(msg)) if msg.contains("2048")));
    }

    #[test]
    fn response_carries_short_link() {
        let record = UrlRecord::new(ShortCode::new_unchecked("abc123"), "https://example.com");
        let response = UrlResponse::from_record(record, "https://sn.ip/");

        assert_eq!(response.short_url, "abc123");
        assert_eq!(response.short_link, "https://sn.ip/abc123");
        assert_eq!(response.original_url, "https://example.com");
    }
}
