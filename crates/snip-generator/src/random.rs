use crate::Generator;
use rand::rngs::OsRng;
use rand::RngCore;
use snip_core::{GeneratorError, ShortCode};
use typed_builder::TypedBuilder;

const CHARSET: &[u8; 62] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

pub const DEFAULT_LENGTH: usize = 8;

/// Bytes at or above this value are rejected: 248 is the largest multiple
/// of 62 that fits in a byte, so `byte % 62` stays uniform below it.
const ACCEPT_BELOW: u8 = (u8::MAX / CHARSET.len() as u8) * CHARSET.len() as u8;

const CHUNK: usize = 32;

/// Generates fixed-length alphanumeric codes from the operating system's
/// CSPRNG.
#[derive(Debug, Clone, TypedBuilder)]
pub struct RandomGenerator {
    #[builder(default = DEFAULT_LENGTH)]
    length: usize,
}

impl RandomGenerator {
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn with_length(length: usize) -> Self {
        Self::builder().length(length).build()
    }

    pub fn length(&self) -> usize {
        self.length
    }

    fn generate_from<R: RngCore>(&self, rng: &mut R) -> Result<String, GeneratorError> {
        let mut code = String::with_capacity(self.length);
        let mut buf = [0_u8; CHUNK];

        while code.len() < self.length {
            rng.try_fill_bytes(&mut buf)
                .map_err(|e| GeneratorError::RandomSource(e.to_string()))?;

            for &byte in buf.iter().filter(|&&b| b < ACCEPT_BELOW) {
                if code.len() == self.length {
                    break;
                }
                code.push(CHARSET[usize::from(byte) % CHARSET.len()] as char);
            }
        }

        Ok(code)
    }
}

impl Default for RandomGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator for RandomGenerator {
    fn generate(&self) -> Result<ShortCode, GeneratorError> {
        let code = self.generate_from(&mut OsRng)?;
        Ok(ShortCode::new_unchecked(code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    /// Replays a fixed byte script, cycling when exhausted.
    struct ScriptedRng {
        bytes: Vec<u8>,
        pos: usize,
    }

    impl RngCore for ScriptedRng {
        fn next_u32(&mut self) -> u32 {
            let mut buf = [0_u8; 4];
            self.fill_bytes(&mut buf);
            u32::from_le_bytes(buf)
        }

        fn next_u64(&mut self) -> u64 {
            let mut buf = [0_u8; 8];
            self.fill_bytes(&mut buf);
            u64::from_le_bytes(buf)
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            for slot in dest {
                *slot = self.bytes[self.pos % self.bytes.len()];
                self.pos += 1;
            }
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
            self.fill_bytes(dest);
            Ok(())
        }
    }

    struct BrokenRng;

    impl RngCore for BrokenRng {
        fn next_u32(&mut self) -> u32 {
            0
        }

        fn next_u64(&mut self) -> u64 {
            0
        }

        fn fill_bytes(&mut self, _dest: &mut [u8]) {}

        fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> Result<(), rand::Error> {
            Err(rand::Error::new(std::io::Error::other("entropy exhausted")))
        }
    }

    #[test]
    fn default_length_is_eight() {
        let code = RandomGenerator::new().generate().unwrap();
        assert_eq!(code.as_str().len(), DEFAULT_LENGTH);
    }

    #[test]
    fn custom_length() {
        let code = RandomGenerator::with_length(12).generate().unwrap();
        assert_eq!(code.as_str().len(), 12);
    }

    #[test]
    fn codes_use_only_the_alphanumeric_charset() {
        let generator = RandomGenerator::new();
        for _ in 0..100 {
            let code = generator.generate().unwrap();
            assert!(code.as_str().bytes().all(|b| CHARSET.contains(&b)));
            assert!(ShortCode::new(code.as_str()).is_ok());
        }
    }

    #[test]
    fn codes_are_not_repeated_in_practice() {
        let generator = RandomGenerator::new();
        let codes: HashSet<_> = (0..1000).map(|_| generator.generate().unwrap()).collect();
        assert_eq!(codes.len(), 1000);
    }

    #[test]
    fn biased_bytes_are_rejected() {
        assert_eq!(ACCEPT_BELOW, 248);

        let mut rng = ScriptedRng {
            bytes: vec![250, 0, 255, 61, 62, 248, 123],
            pos: 0,
        };
        let code = RandomGenerator::with_length(4)
            .generate_from(&mut rng)
            .unwrap();

        assert_eq!(code, "a9a9");
    }

    #[test]
    fn entropy_failure_is_propagated() {
        let err = RandomGenerator::new()
            .generate_from(&mut BrokenRng)
            .unwrap_err();
        assert!(matches!(err, GeneratorError::RandomSource(msg) if msg.contains("entropy")));
    }

    #[test]
    fn generator_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RandomGenerator>();
    }
}
