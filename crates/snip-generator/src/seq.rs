use crate::Generator;
use snip_core::{GeneratorError, ShortCode};
use std::sync::atomic::{AtomicU64, Ordering};

/// Deterministic `{prefix}{n:06}` codes, counting up from zero.
///
/// Used by tests and local runs that want predictable short links. The prefix
/// has to be alphanumeric or the codes will not pass [`ShortCode::new`].
#[derive(Debug)]
pub struct SeqGenerator {
    counter: AtomicU64,
    prefix: String,
}

impl SeqGenerator {
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            counter: AtomicU64::new(0),
            prefix: prefix.into(),
        }
    }
}

impl Generator for SeqGenerator {
    fn generate(&self) -> Result<ShortCode, GeneratorError> {
        let count = self.counter.fetch_add(1, Ordering::SeqCst);
        Ok(ShortCode::new_unchecked(format!(
            "{}{:06}",
            self.prefix, count
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn produces_sequential_codes() {
        let generator = SeqGenerator::with_prefix("sn");

        let code1 = generator.generate().unwrap();
        let code2 = generator.generate().unwrap();
        let code3 = generator.generate().unwrap();

        assert_eq!(code1.as_str(), "sn000000");
        assert_eq!(code2.as_str(), "sn000001");
        assert_eq!(code3.as_str(), "sn000002");
    }

    #[test]
    fn codes_are_valid_short_codes() {
        let generator = SeqGenerator::with_prefix("node1");
        let code = generator.generate().unwrap();
        assert!(ShortCode::new(code.as_str()).is_ok());
    }

    #[test]
    fn generator_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SeqGenerator>();
    }
}
