use crate::shortcode::ShortCode;
use thiserror::Error;

/// Errors related to the core value types.
pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("invalid short code: {0}")]
    InvalidShortCode(String),
}

/// Why an operation was abandoned before it touched any state.
///
/// Kept apart from the domain errors so callers can tell "timed out" from
/// "the data said no".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Interrupted {
    #[error("operation cancelled")]
    Cancelled,
    #[error("operation deadline exceeded")]
    DeadlineExceeded,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("no record for: {0}")]
    KeyNotFound(String),
    #[error("short code already exists: {0}")]
    KeyExists(ShortCode),
    #[error("url is already stored under short code: {0}")]
    UrlExists(ShortCode),
    #[error("storage capacity reached ({0} records)")]
    CapacityReached(usize),
    #[error(transparent)]
    Interrupted(#[from] Interrupted),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeneratorError {
    #[error("random source failed: {0}")]
    RandomSource(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShortenerError {
    #[error("short url not found: {0}")]
    KeyNotFound(String),
    #[error("short url already exists: {0}")]
    KeyAlreadyExists(ShortCode),
    #[error("storage capacity reached")]
    StorageCapacityReached,
    #[error(transparent)]
    Interrupted(#[from] Interrupted),
    #[error(transparent)]
    Generator(#[from] GeneratorError),
}

impl From<StorageError> for ShortenerError {
    fn from(value: StorageError) -> Self {
        match value {
            StorageError::KeyNotFound(key) => Self::KeyNotFound(key),
            StorageError::KeyExists(code) => Self::KeyAlreadyExists(code),
            // the url already has a record, owned by `code`
            StorageError::UrlExists(code) => Self::KeyAlreadyExists(code),
            StorageError::CapacityReached(_) => Self::StorageCapacityReached,
            StorageError::Interrupted(reason) => Self::Interrupted(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_errors_translate_one_to_one() {
        let code = ShortCode::new_unchecked("abc123");

        assert_eq!(
            ShortenerError::from(StorageError::KeyNotFound("abc123".into())),
            ShortenerError::KeyNotFound("abc123".into())
        );
        assert_eq!(
            ShortenerError::from(StorageError::KeyExists(code.clone())),
            ShortenerError::KeyAlreadyExists(code.clone())
        );
        assert_eq!(
            ShortenerError::from(StorageError::UrlExists(code.clone())),
            ShortenerError::KeyAlreadyExists(code)
        );
        assert_eq!(
            ShortenerError::from(StorageError::CapacityReached(2)),
            ShortenerError::StorageCapacityReached
        );
    }

    #[test]
    fn interruptions_pass_through_unchanged() {
        for reason in [Interrupted::Cancelled, Interrupted::DeadlineExceeded] {
            let err = ShortenerError::from(StorageError::from(reason));
            assert_eq!(err, ShortenerError::Interrupted(reason));
        }
    }
}
