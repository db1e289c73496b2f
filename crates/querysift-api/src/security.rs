//! Input validation for values that end up inside generated SQL
//!
//! Column names and search strings are interpolated into the query text
//! verbatim. Callers that forward untrusted input (a sort key from a URL, a
//! search box) validate it here first.

use querysift_core::{Error, Result};

/// Longest accepted search string, in bytes
pub const MAX_SEARCH_LENGTH: usize = 1024;

/// Longest accepted identifier, in bytes
pub const MAX_IDENTIFIER_LENGTH: usize = 256;

/// Validates a column or table identifier
///
/// # Security
///
/// - Prevents empty identifiers
/// - Allows only ASCII letters, digits, `_` and `.` separators
/// - Rejects empty path segments (`..`, leading or trailing `.`)
///
/// # Errors
///
/// Returns Error::InvalidInput if validation fails
#[inline]
pub fn validate_identifier(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidInput(
            "Identifier cannot be empty".to_string(),
        ));
    }

    if name.len() > MAX_IDENTIFIER_LENGTH {
        return Err(Error::InvalidInput(format!(
            "Identifier length {} exceeds maximum {}",
            name.len(),
            MAX_IDENTIFIER_LENGTH
        )));
    }

    if let Some(bad) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '.'))
    {
        return Err(Error::InvalidInput(format!(
            "Identifier {:?} contains invalid character {:?}",
            name, bad
        )));
    }

    if name.split('.').any(str::is_empty) {
        return Err(Error::InvalidInput(format!(
            "Identifier {:?} has an empty segment",
            name
        )));
    }

    Ok(())
}

/// Validates a raw search string
///
/// # Security
///
/// - Prevents oversized input (>1KB), which would produce an oversized
///   pattern and score expression
/// - Prevents null bytes
///
/// Empty input is valid: it matches every row.
///
/// # Errors
///
/// Returns Error::InvalidInput if validation fails
#[inline]
pub fn validate_search_input(input: &str) -> Result<()> {
    if input.len() > MAX_SEARCH_LENGTH {
        return Err(Error::InvalidInput(format!(
            "Search length {} exceeds maximum {}",
            input.len(),
            MAX_SEARCH_LENGTH
        )));
    }

    if input.contains('\0') {
        return Err(Error::InvalidInput(
            "Search cannot contain null bytes".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_identifier() {
        // Valid
        assert!(validate_identifier("title").is_ok());
        assert!(validate_identifier("posts.title").is_ok());
        assert!(validate_identifier("author_name").is_ok());

        // Empty
        assert!(validate_identifier("").is_err());

        // Injection attempts
        assert!(validate_identifier("title; DROP TABLE posts").is_err());
        assert!(validate_identifier("title`").is_err());
        assert!(validate_identifier("(SELECT 1)").is_err());

        // Empty segments
        assert!(validate_identifier("posts..title").is_err());
        assert!(validate_identifier(".title").is_err());
        assert!(validate_identifier("posts.").is_err());

        // Too long
        let long = "a".repeat(MAX_IDENTIFIER_LENGTH + 1);
        assert!(validate_identifier(&long).is_err());
    }

    #[test]
    fn test_validate_search_input() {
        // Valid
        assert!(validate_search_input("my daily posts").is_ok());
        assert!(validate_search_input("").is_ok()); // Empty allowed

        // Null byte
        assert!(validate_search_input("a\0b").is_err());

        // Too long
        let long = "a".repeat(MAX_SEARCH_LENGTH + 1);
        assert!(matches!(
            validate_search_input(&long),
            Err(Error::InvalidInput(_))
        ));
    }
}
