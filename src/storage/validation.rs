//! Identifier validation
//!
//! Every store operation passes its identifier through here before touching
//! the filesystem. The grammar admits no path separators, so a valid
//! identifier always names a single file inside its kind's directory.

use regex::Regex;
use std::sync::LazyLock;

use crate::error::IdentifierError;

static IDENTIFIER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9\-_.]*$").expect("identifier pattern is valid")
});

/// Validate an identifier, distinguishing missing from malformed input.
pub fn validate_identifier(id: &str) -> Result<(), IdentifierError> {
    if id.trim().is_empty() {
        return Err(IdentifierError::Missing);
    }

    if !IDENTIFIER_PATTERN.is_match(id) {
        return Err(IdentifierError::Malformed(id.to_string()));
    }

    Ok(())
}

/// Returns true when `id` is present and matches the identifier grammar
pub fn is_valid_identifier(id: &str) -> bool {
    validate_identifier(id).is_ok()
}
