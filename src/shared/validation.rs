use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    /// Values shipped in sample env files instead of a real API key
    /// - Matches: "your-openai-api-key", "your_api_key", "<api-key>", "changeme", "sk-xxxx", "..."
    /// - Does not match: "sk-proj-4f9a...", "sk-live123"
    pub static ref PLACEHOLDER_API_KEY_REGEX: Regex =
        Regex::new(r"(?i)^(your[-_]|<.*>$|changeme|replace[-_]?me|sk-x+$|x+$|\.+$)").unwrap();
}

/// True when an API key is missing, blank, or an obvious placeholder
pub fn is_placeholder_api_key(key: Option<&str>) -> bool {
    match key.map(str::trim) {
        None | Some("") => true,
        Some(key) => PLACEHOLDER_API_KEY_REGEX.is_match(key),
    }
}

/// Rejects strings that are empty once surrounding whitespace is removed
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.message = Some("This field may not be blank.".into());
        return Err(error);
    }
    Ok(())
}

/// Rejects strings containing NUL (`\0`), which PostgreSQL text columns cannot store
pub fn validate_no_null_chars(value: &str) -> Result<(), ValidationError> {
    if value.contains('\0') {
        let mut error = ValidationError::new("null_characters_not_allowed");
        error.message = Some("Null characters are not allowed.".into());
        return Err(error);
    }
    Ok(())
}

/// Free-text field rule: no NUL characters and not blank
pub fn validate_text(value: &str) -> Result<(), ValidationError> {
    validate_no_null_chars(value)?;
    validate_not_blank(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_api_keys() {
        assert!(is_placeholder_api_key(None));
        assert!(is_placeholder_api_key(Some("")));
        assert!(is_placeholder_api_key(Some("   ")));
        assert!(is_placeholder_api_key(Some("your-openai-api-key")));
        assert!(is_placeholder_api_key(Some("your_key_here")));
        assert!(is_placeholder_api_key(Some("YOUR-KEY")));
        assert!(is_placeholder_api_key(Some("<openai-key>")));
        assert!(is_placeholder_api_key(Some("changeme")));
        assert!(is_placeholder_api_key(Some("sk-xxxxxxxx")));
        assert!(is_placeholder_api_key(Some("...")));
    }

    #[test]
    fn test_real_looking_api_keys() {
        assert!(!is_placeholder_api_key(Some("sk-proj-4f9aB2c7")));
        assert!(!is_placeholder_api_key(Some("sk-live123")));
        assert!(!is_placeholder_api_key(Some("  sk-abc  ")));
    }

    #[test]
    fn test_validate_not_blank() {
        assert!(validate_not_blank("hello").is_ok());
        assert!(validate_not_blank("  hi  ").is_ok());
        assert!(validate_not_blank("").is_err());
        assert!(validate_not_blank(" \n\t ").is_err());
    }

    #[test]
    fn test_validate_no_null_chars() {
        assert!(validate_no_null_chars("plain text").is_ok());
        assert!(validate_no_null_chars("").is_ok());

        let err = validate_no_null_chars("bad\0value").unwrap_err();
        assert_eq!(err.code, "null_characters_not_allowed");
    }

    #[test]
    fn test_validate_text() {
        assert!(validate_text("Login broken").is_ok());
        assert_eq!(validate_text("  ").unwrap_err().code, "blank");
        assert_eq!(
            validate_text("a\0").unwrap_err().code,
            "null_characters_not_allowed"
        );
    }
}
