use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

/// Kind of business content submitted for analysis.
///
/// The same enum doubles as the skill type of generated artifacts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, TS, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum ContentType {
    #[default]
    Copywriting,
    Process,
    Technical,
}

impl ContentType {
    pub const ALL: [ContentType; 3] = [
        ContentType::Copywriting,
        ContentType::Process,
        ContentType::Technical,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ContentType::Copywriting => "copywriting",
            ContentType::Process => "process",
            ContentType::Technical => "technical",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "copywriting" => Ok(ContentType::Copywriting),
            "process" => Ok(ContentType::Process),
            "technical" => Ok(ContentType::Technical),
            other => Err(format!(
                "unknown content type '{other}' (expected copywriting, process or technical)"
            )),
        }
    }
}

/// Library type filter. `All` is never sent to the service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TypeFilter {
    #[default]
    All,
    Only(ContentType),
}

impl TypeFilter {
    /// The content type to send as the `type` query parameter, if any.
    pub fn content_type(self) -> Option<ContentType> {
        match self {
            TypeFilter::All => None,
            TypeFilter::Only(content_type) => Some(content_type),
        }
    }
}

impl fmt::Display for TypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeFilter::All => f.write_str("all"),
            TypeFilter::Only(content_type) => content_type.fmt(f),
        }
    }
}

impl FromStr for TypeFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(TypeFilter::All);
        }
        s.parse().map(TypeFilter::Only)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_serializes_lowercase() {
        let json = serde_json::to_string(&ContentType::Technical).unwrap();
        assert_eq!(json, "\"technical\"");
        let parsed: ContentType = serde_json::from_str("\"process\"").unwrap();
        assert_eq!(parsed, ContentType::Process);
    }

    #[test]
    fn test_type_filter_parsing() {
        assert_eq!("all".parse::<TypeFilter>().unwrap(), TypeFilter::All);
        assert_eq!(
            " Copywriting ".parse::<TypeFilter>().unwrap(),
            TypeFilter::Only(ContentType::Copywriting)
        );
        assert!("recipes".parse::<TypeFilter>().is_err());
        assert_eq!(TypeFilter::All.content_type(), None);
    }
}
