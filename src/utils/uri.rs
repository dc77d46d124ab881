//! Validation of URIs submitted for shortening.

use url::Url;

use crate::error::AppError;

/// Checks that `input` is a syntactically valid absolute URI.
///
/// The input is only validated, never rewritten: the exact string is what gets
/// stored and later returned by a lookup.
///
/// # Errors
///
/// Returns [`AppError::InvalidUri`] for empty input, input padded with
/// whitespace, input containing control characters, relative references and
/// anything else the URL parser rejects.
///
/// # Examples
///
/// ```ignore
/// assert!(validate_uri("https://google.com").is_ok());
/// assert!(validate_uri("incorrect").is_err());
/// assert!(validate_uri("").is_err());
/// ```
pub fn validate_uri(input: &str) -> Result<(), AppError> {
    if input.is_empty() {
        return Err(AppError::InvalidUri("empty URI".to_string()));
    }

    if input.trim() != input {
        return Err(AppError::InvalidUri(
            "URI must not start or end with whitespace".to_string(),
        ));
    }

    // The parser strips interior tabs and newlines, but the stored string
    // must stay usable as a `Location` header.
    if input.chars().any(char::is_control) {
        return Err(AppError::InvalidUri(
            "URI must not contain control characters".to_string(),
        ));
    }

    Url::parse(input).map_err(|e| AppError::InvalidUri(e.to_string()))?;

    Ok(())
}
