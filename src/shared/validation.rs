use std::borrow::Cow;

use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    /// Regex matching an encoded bcrypt hash
    /// - Valid: "$2b$12$" followed by 53 characters of the bcrypt base64 alphabet
    /// - Invalid: plain passwords, truncated hashes, other hash formats ("$argon2id$...")
    pub static ref BCRYPT_HASH_REGEX: Regex =
        Regex::new(r"^\$2[abxy]?\$\d{2}\$[./A-Za-z0-9]{53}$").unwrap();
}

/// Convert a Rust field name (`category_id`) to its JSON spelling (`categoryId`)
pub fn to_camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper_next = false;
    for ch in field.chars() {
        if ch == '_' {
            upper_next = !out.is_empty();
        } else if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}

/// Rejects strings made only of whitespace
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message(Cow::Borrowed("must not be blank")));
    }
    Ok(())
}

/// Trim an optional text field, treating blank input as absent
pub fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bcrypt_regex_valid() {
        assert!(BCRYPT_HASH_REGEX
            .is_match("$2b$12$KIXQJ3s6Pq3f4bK1yXg6UeZl1r0w1m0dQWq9m3Zk2Yx7t8u9v0a1C"));
        assert!(BCRYPT_HASH_REGEX
            .is_match("$2a$10$N9qo8uLOickgx2ZMRZoMyeIjZAgcfl7p92ldGxad68LJZdL17lhWy"));
    }

    #[test]
    fn test_bcrypt_regex_invalid() {
        assert!(!BCRYPT_HASH_REGEX.is_match("SuperAdmin123!")); // plain password
        assert!(!BCRYPT_HASH_REGEX.is_match("$2b$12$tooshort")); // truncated
        assert!(!BCRYPT_HASH_REGEX.is_match("$argon2id$v=19$m=19456,t=2,p=1$abc")); // other scheme
        assert!(!BCRYPT_HASH_REGEX.is_match("")); // empty
    }

    #[test]
    fn test_not_blank() {
        assert!(not_blank("Chocolate").is_ok());
        assert!(not_blank("   ").is_err());
        assert!(not_blank("").is_err());
    }

    #[test]
    fn test_blank_to_none() {
        assert_eq!(blank_to_none(Some("  Belgium ".to_string())), Some("Belgium".to_string()));
        assert_eq!(blank_to_none(Some("   ".to_string())), None);
        assert_eq!(blank_to_none(None), None);
    }

    #[test]
    fn test_to_camel_case() {
        assert_eq!(to_camel_case("category_id"), "categoryId");
        assert_eq!(to_camel_case("image1"), "image1");
        assert_eq!(to_camel_case("preview_image"), "previewImage");
        assert_eq!(to_camel_case("is_active"), "isActive");
        assert_eq!(to_camel_case("name"), "name");
    }
}
