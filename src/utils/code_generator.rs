//! Short code generation.
//!
//! Codes are drawn uniformly from the base62 alphabet (`[A-Za-z0-9]`) with a
//! cryptographically seeded thread-local RNG, so consecutive codes carry no
//! guessable sequence. Uniqueness is not guaranteed here; the caller retries
//! against the store on collision.

use rand::{Rng, distr::Alphanumeric};

/// Default number of characters in a generated code.
pub const DEFAULT_CODE_LENGTH: usize = 7;

/// Bounds accepted for the configured code length.
pub const MIN_CODE_LENGTH: usize = 4;
pub const MAX_CODE_LENGTH: usize = 32;

/// Produces candidate short codes.
///
/// Implementations are pure generators and never touch storage.
#[cfg_attr(test, mockall::automock)]
pub trait CodeGenerator: Send + Sync {
    /// Returns a new candidate code.
    fn generate(&self) -> String;
}

/// Random base62 generator of a fixed length.
#[derive(Debug, Clone)]
pub struct RandomCodeGenerator {
    length: usize,
}

impl RandomCodeGenerator {
    /// Creates a generator. `length` is clamped to
    /// [`MIN_CODE_LENGTH`]..=[`MAX_CODE_LENGTH`].
    pub fn new(length: usize) -> Self {
        Self {
            length: length.clamp(MIN_CODE_LENGTH, MAX_CODE_LENGTH),
        }
    }

    pub fn length(&self) -> usize {
        self.length
    }
}

impl Default for RandomCodeGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_CODE_LENGTH)
    }
}

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> String {
        rand::rng()
            .sample_iter(&Alphanumeric)
            .take(self.length)
            .map(char::from)
            .collect()
    }
}

/// Returns true if `code` could have been produced by a generator.
///
/// Used on the redirect path to reject junk without a store round trip.
pub fn is_valid_code(code: &str) -> bool {
    !code.is_empty()
        && code.len() <= MAX_CODE_LENGTH
        && code.bytes().all(|b| b.is_ascii_alphanumeric())
}
