//! Validation and canonicalization of submitted target URLs.
//!
//! A target must be an absolute `http`/`https` URL with a host. Parsing with
//! the `url` crate already lowercases the host and drops default ports, so two
//! spellings of the same target map to one record under the dedup policy.
//! Path, query and fragment are kept as submitted.

use url::Url;

/// Upper bound on accepted target length, in bytes.
pub const MAX_URL_LENGTH: usize = 2048;

/// Reasons a submitted URL is rejected.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UrlNormalizationError {
    #[error("URL must not be empty")]
    Empty,

    #[error("URL exceeds {MAX_URL_LENGTH} characters")]
    TooLong,

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL must include a host")]
    MissingHost,
}

/// Normalizes a submitted URL to its canonical stored form.
///
/// Surrounding whitespace is ignored.
///
/// # Errors
///
/// Returns an [`UrlNormalizationError`] describing the first rule violated.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(
///     normalize_url("  HTTPS://Example.COM:443/a?x=1 ").unwrap(),
///     "https://example.com/a?x=1"
/// );
/// assert!(normalize_url("javascript:alert(1)").is_err());
/// ```
pub fn normalize_url(input: &str) -> Result<String, UrlNormalizationError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(UrlNormalizationError::Empty);
    }
    if trimmed.len() > MAX_URL_LENGTH {
        return Err(UrlNormalizationError::TooLong);
    }

    let url =
        Url::parse(trimmed).map_err(|e| UrlNormalizationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlNormalizationError::UnsupportedProtocol),
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => {}
        _ => return Err(UrlNormalizationError::MissingHost),
    }

    let normalized = url.to_string();
    if normalized.len() > MAX_URL_LENGTH {
        return Err(UrlNormalizationError::TooLong);
    }

    Ok(normalized)
}
