//! Submission input validation.

use peerboost_types::error::ValidationError;
use url::Url;

/// Maximum title length, in characters.
pub const MAX_TITLE_LEN: usize = 50;

/// Validate a submission title.
///
/// The limit counts characters, not bytes, so multibyte titles are not
/// penalized.
pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    let len = title.chars().count();
    if len > MAX_TITLE_LEN {
        return Err(ValidationError::TitleTooLong {
            len,
            max: MAX_TITLE_LEN,
        });
    }
    Ok(())
}

/// Whether `raw` is an acceptable submission URL: absolute, scheme exactly
/// `http` or `https`, with a non-empty host. No further normalization.
pub fn is_valid_url(raw: &str) -> bool {
    match Url::parse(raw) {
        Ok(url) => {
            matches!(url.scheme(), "http" | "https")
                && url.host_str().is_some_and(|host| !host.is_empty())
        }
        Err(_) => false,
    }
}
