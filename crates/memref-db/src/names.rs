//! Reference name validation following git-style conventions.
//!
//! Valid reference names:
//! - Must be non-empty and must not be the single character `@`
//! - Must not contain control characters, space, `~`, `^`, `:`, `?`, `*`,
//!   `[`, `\`
//! - Must not contain `..`, `@{` or `//`
//! - Must not start or end with `/`, and must not end with `.`
//! - No component may start with `.` or end with `.lock`

use crate::error::{RefdbError, Result};

/// Characters that are forbidden anywhere in a reference name.
const FORBIDDEN_CHARS: &[char] = &[' ', '~', '^', ':', '?', '*', '[', '\\'];

fn invalid(name: &str, reason: impl Into<String>) -> RefdbError {
    RefdbError::InvalidName {
        name: name.to_string(),
        reason: reason.into(),
    }
}

/// Validate a full reference name, returning `Ok(())` if valid.
///
/// # Examples
///
/// ```
/// use memref_db::names::validate_reference_name;
///
/// assert!(validate_reference_name("HEAD").is_ok());
/// assert!(validate_reference_name("refs/heads/feature/auth").is_ok());
/// assert!(validate_reference_name("").is_err());
/// assert!(validate_reference_name("refs/heads/bad..name").is_err());
/// ```
pub fn validate_reference_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(invalid(name, "ref name must not be empty"));
    }

    if name == "@" {
        return Err(invalid(name, "'@' alone is not a valid ref name"));
    }

    if let Some(ch) = name.chars().find(|c| c.is_ascii_control()) {
        return Err(invalid(name, format!("contains control character: {ch:?}")));
    }

    for ch in FORBIDDEN_CHARS {
        if name.contains(*ch) {
            return Err(invalid(name, format!("contains forbidden character: {ch:?}")));
        }
    }

    if name.contains("..") {
        return Err(invalid(name, "must not contain '..'"));
    }

    if name.contains("@{") {
        return Err(invalid(name, "must not contain '@{'"));
    }

    if name.starts_with('/') || name.ends_with('/') {
        return Err(invalid(name, "must not start or end with '/'"));
    }

    if name.ends_with('.') {
        return Err(invalid(name, "must not end with '.'"));
    }

    if name.contains("//") {
        return Err(invalid(name, "must not contain consecutive slashes '//'"));
    }

    for component in name.split('/') {
        if component.starts_with('.') {
            return Err(invalid(
                name,
                format!("component must not start with '.': {component:?}"),
            ));
        }
        if component.ends_with(".lock") {
            return Err(invalid(
                name,
                format!("component must not end with '.lock': {component:?}"),
            ));
        }
    }

    Ok(())
}
