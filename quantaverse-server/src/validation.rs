//! Request validation module
//!
//! Field-level validation for registration and content endpoints. These
//! checks run before any database or PQC-service round trip.

use crate::error::ApiError;

/// Minimum username length
pub const MIN_USERNAME_LEN: usize = 3;

/// Maximum username length
pub const MAX_USERNAME_LEN: usize = 30;

/// Maximum post content length
pub const MAX_POST_CONTENT_LEN: usize = 2000;

/// Maximum comment content length
pub const MAX_COMMENT_CONTENT_LEN: usize = 500;

/// Validates a username: 3-30 characters, alphanumeric plus `_` and `-`.
pub fn validate_username(username: &str) -> Result<(), ApiError> {
    let len = username.chars().count();
    if len < MIN_USERNAME_LEN || len > MAX_USERNAME_LEN {
        return Err(ApiError::bad_request(format!(
            "Username must be between {MIN_USERNAME_LEN} and {MAX_USERNAME_LEN} characters"
        )));
    }

    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(ApiError::bad_request(
            "Username may only contain letters, digits, '_' and '-'",
        ));
    }

    Ok(())
}

/// Validates an email address structurally: one `@`, non-empty local part,
/// domain with at least one dot and no whitespace.
pub fn validate_email(email: &str) -> Result<(), ApiError> {
    let invalid = || ApiError::bad_request("Invalid email address");

    if email.len() > 254 || email.chars().any(|c| c.is_whitespace()) {
        return Err(invalid());
    }

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(invalid());
    }

    let (host, tld) = domain.rsplit_once('.').ok_or_else(invalid)?;
    if host.is_empty() || tld.is_empty() {
        return Err(invalid());
    }

    Ok(())
}

/// Validates post content: non-empty after trimming, within the length cap.
pub fn validate_post_content(content: &str) -> Result<(), ApiError> {
    validate_content(content, MAX_POST_CONTENT_LEN, "Post")
}

/// Validates comment content: non-empty after trimming, within the length cap.
pub fn validate_comment_content(content: &str) -> Result<(), ApiError> {
    validate_content(content, MAX_COMMENT_CONTENT_LEN, "Comment")
}

fn validate_content(content: &str, max_len: usize, what: &str) -> Result<(), ApiError> {
    if content.trim().is_empty() {
        return Err(ApiError::bad_request(format!("{what} content is required")));
    }

    if content.chars().count() > max_len {
        return Err(ApiError::bad_request(format!(
            "{what} content exceeds maximum of {max_len} characters"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_username_ok() {
        assert!(validate_username("alice").is_ok());
        assert!(validate_username("bob_42").is_ok());
        assert!(validate_username("quantum-cat").is_ok());
        assert!(validate_username("abc").is_ok()); // exactly min
        assert!(validate_username(&"a".repeat(30)).is_ok()); // exactly max
    }

    #[test]
    fn test_validate_username_length() {
        assert!(validate_username("ab").is_err());
        assert!(validate_username(&"a".repeat(31)).is_err());
        assert!(validate_username("").is_err());
    }

    #[test]
    fn test_validate_username_characters() {
        assert!(validate_username("no spaces").is_err());
        assert!(validate_username("émile").is_err());
        assert!(validate_username("semi;colon").is_err());
    }

    #[test]
    fn test_validate_email_ok() {
        assert!(validate_email("alice@example.com").is_ok());
        assert!(validate_email("a.b+c@sub.domain.org").is_ok());
    }

    #[test]
    fn test_validate_email_rejected() {
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("alice@").is_err());
        assert!(validate_email("alice@nodot").is_err());
        assert!(validate_email("alice@domain.").is_err());
        assert!(validate_email("alice@ ex.com").is_err());
        assert!(validate_email("a@b@c.com").is_err());
    }

    #[test]
    fn test_validate_post_content() {
        assert!(validate_post_content("hello").is_ok());
        assert!(validate_post_content("   ").is_err());
        assert!(validate_post_content("").is_err());
        assert!(validate_post_content(&"x".repeat(2000)).is_ok());
        assert!(validate_post_content(&"x".repeat(2001)).is_err());
    }

    #[test]
    fn test_validate_comment_content() {
        assert!(validate_comment_content("nice post").is_ok());
        assert!(validate_comment_content("\n\t").is_err());
        assert!(validate_comment_content(&"x".repeat(500)).is_ok());
        assert!(validate_comment_content(&"x".repeat(501)).is_err());
    }
}
