//! Local validation rules gating every workflow transition.
//!
//! All checks are pure: they return `None` when the value is acceptable and a
//! structured [`ValidationError`] otherwise.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Field, ValidationError};

/// Minimum skill name length, in characters, after trimming.
pub const MIN_NAME_LEN: usize = 3;

/// Minimum content length, in characters, after trimming, to be eligible for analysis.
pub const MIN_CONTENT_LEN: usize = 100;

static NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9-]+$").expect("valid skill name pattern"));

static TAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^[a-z0-9-]+$").expect("valid tag pattern"));

/// Validate an (already normalized) skill name.
pub fn validate_name(raw: &str) -> Option<ValidationError> {
    let name = raw.trim();
    if name.is_empty() {
        return Some(ValidationError::EmptyName);
    }

    let length = name.chars().count();
    if length < MIN_NAME_LEN {
        return Some(ValidationError::TooShort {
            field: Field::Name,
            length,
            min: MIN_NAME_LEN,
        });
    }

    if !NAME_PATTERN.is_match(name) {
        return Some(ValidationError::BadFormat);
    }

    None
}

/// Validate content submitted for analysis.
pub fn validate_content(raw: &str) -> Option<ValidationError> {
    let content = raw.trim();
    if content.is_empty() {
        return Some(ValidationError::EmptyContent);
    }

    let length = content.chars().count();
    if length < MIN_CONTENT_LEN {
        return Some(ValidationError::TooShort {
            field: Field::Content,
            length,
            min: MIN_CONTENT_LEN,
        });
    }

    None
}

/// Validate a comma separated tag list. Blank input is valid.
pub fn validate_tags(raw: &str) -> Option<ValidationError> {
    let invalid: Vec<String> = parse_tags(raw)
        .into_iter()
        .filter(|tag| !TAG_PATTERN.is_match(tag))
        .collect();

    if invalid.is_empty() {
        None
    } else {
        Some(ValidationError::InvalidTags(invalid))
    }
}

/// Validate a publish credential before any network call.
pub fn validate_credential(raw: &str) -> Option<ValidationError> {
    if raw.trim().is_empty() {
        Some(ValidationError::EmptyCredential)
    } else {
        None
    }
}

/// Split a tag list on commas, trim every entry and drop the empty ones.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize_skill_name;

    #[test]
    fn test_validate_name() {
        assert_eq!(validate_name("   "), Some(ValidationError::EmptyName));
        assert_eq!(
            validate_name("ab"),
            Some(ValidationError::TooShort {
                field: Field::Name,
                length: 2,
                min: MIN_NAME_LEN,
            })
        );
        assert_eq!(validate_name("Bad Name"), Some(ValidationError::BadFormat));
        assert_eq!(validate_name("my_skill"), Some(ValidationError::BadFormat));
        assert_eq!(validate_name("abc"), None);
        assert_eq!(validate_name(" invoice-review-2 "), None);
    }

    #[test]
    fn test_normalized_names_pass_format_check() {
        assert_eq!(normalize_skill_name("My Skill!!"), "my-skill");
        assert_eq!(validate_name(&normalize_skill_name("My Skill!!")), None);
        assert_eq!(
            validate_name(&normalize_skill_name("A!")),
            Some(ValidationError::TooShort {
                field: Field::Name,
                length: 1,
                min: MIN_NAME_LEN,
            })
        );
        assert_eq!(
            validate_name(&normalize_skill_name("???")),
            Some(ValidationError::EmptyName)
        );
    }

    #[test]
    fn test_validate_content() {
        assert_eq!(validate_content(""), Some(ValidationError::EmptyContent));
        assert_eq!(validate_content(" \n\t "), Some(ValidationError::EmptyContent));
        assert_eq!(
            validate_content("short"),
            Some(ValidationError::TooShort {
                field: Field::Content,
                length: 5,
                min: MIN_CONTENT_LEN,
            })
        );
        assert_eq!(validate_content(&"x".repeat(MIN_CONTENT_LEN)), None);

        // Surrounding whitespace does not count towards the minimum
        let padded = format!("   {}   ", "y".repeat(MIN_CONTENT_LEN - 1));
        assert!(matches!(
            validate_content(&padded),
            Some(ValidationError::TooShort { length: 99, .. })
        ));
    }

    #[test]
    fn test_validate_tags() {
        assert_eq!(validate_tags(""), None);
        assert_eq!(validate_tags("   "), None);
        assert_eq!(validate_tags("docs, Automation ,ci-cd"), None);
        assert_eq!(validate_tags("docs,,  ,automation"), None);
        assert_eq!(
            validate_tags("docs, automation, Bad Tag"),
            Some(ValidationError::InvalidTags(vec!["Bad Tag".to_string()]))
        );
        assert_eq!(
            validate_tags("snake_case, ok, c++"),
            Some(ValidationError::InvalidTags(vec![
                "snake_case".to_string(),
                "c++".to_string(),
            ]))
        );
    }

    #[test]
    fn test_parse_tags_keeps_order() {
        assert_eq!(
            parse_tags(" docs , ,automation,ci "),
            vec!["docs", "automation", "ci"]
        );
        assert!(parse_tags("").is_empty());
    }

    #[test]
    fn test_validate_credential() {
        assert_eq!(
            validate_credential("  "),
            Some(ValidationError::EmptyCredential)
        );
        assert_eq!(validate_credential("ghp_abc"), None);
    }
}
