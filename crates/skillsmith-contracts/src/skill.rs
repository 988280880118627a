//! Persisted skill records owned by the storage service.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::content::ContentType;

/// Integer identifier assigned by the storage service.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, TS, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
#[serde(transparent)]
#[ts(export)]
pub struct SkillId(#[ts(type = "number")] pub i64);

impl fmt::Display for SkillId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for SkillId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(SkillId)
    }
}

/// A packaged skill: main content, reference files and metadata.
#[derive(Debug, Clone, Serialize, Deserialize, TS, PartialEq)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Skill {
    pub id: SkillId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub skill_type: ContentType,
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub main_content: String,
    /// Reference files keyed by relative path
    #[serde(default)]
    pub references: BTreeMap<String, String>,
    #[serde(default)]
    pub metadata: SkillMetadata,
    pub created_at: String,
    pub updated_at: String,
}

fn default_version() -> u32 {
    1
}

impl Skill {
    /// Repository metadata attached by a successful publish, if any.
    pub fn github(&self) -> Option<&GithubPublication> {
        self.metadata.github.as_ref()
    }

    pub fn is_published(&self) -> bool {
        self.metadata.github.is_some()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, PartialEq)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SkillMetadata {
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub file_count: u32,
    /// Total archive size in bytes
    #[serde(default)]
    #[ts(type = "number")]
    pub total_size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_from: Option<ExtractedFrom>,
    /// Absent until a successful publish; never cleared afterwards
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<GithubPublication>,
}

/// Provenance of a generated skill.
#[derive(Debug, Clone, Serialize, Deserialize, TS, PartialEq)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ExtractedFrom {
    pub analysis_id: String,
    pub content_type: ContentType,
    pub analysis_date: String,
    pub confidence: f64,
}

/// Repository metadata returned by `POST /skills/{id}/publish`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct GithubPublication {
    pub repository_url: String,
    pub repository_name: String,
    pub published_at: String,
    pub install_command: String,
}

/// Query string of `GET /skills`. `None` fields are left out of the request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListSkillsQuery {
    pub search: Option<String>,
    pub skill_type: Option<ContentType>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl ListSkillsQuery {
    /// Query parameters in the order the service documents them.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        if let Some(skill_type) = self.skill_type {
            pairs.push(("type", skill_type.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(offset) = self.offset {
            pairs.push(("offset", offset.to_string()));
        }
        pairs
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Pagination {
    #[ts(type = "number")]
    pub total: u64,
    pub limit: u32,
    pub offset: u32,
    pub has_more: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, PartialEq)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ListSkillsResponse {
    pub skills: Vec<Skill>,
    #[serde(default)]
    pub pagination: Pagination,
}

/// Body of `PUT /skills/{id}`. Only the provided fields change.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, PartialEq)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UpdateSkillRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub references: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl UpdateSkillRequest {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.main_content.is_none()
            && self.references.is_none()
            && self.tags.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_skill_json() -> serde_json::Value {
        serde_json::json!({
            "id": 7,
            "name": "invoice-review",
            "skillType": "process",
            "version": 2,
            "mainContent": "# Invoice review",
            "references": { "references/checklist.md": "- totals" },
            "metadata": {
                "tags": ["finance"],
                "fileCount": 2,
                "totalSize": 2048
            },
            "createdAt": "2026-01-05T10:00:00Z",
            "updatedAt": "2026-01-06T10:00:00Z"
        })
    }

    #[test]
    fn test_deserialize_unpublished_skill() {
        let skill: Skill = serde_json::from_value(sample_skill_json()).unwrap();
        assert_eq!(skill.id, SkillId(7));
        assert!(!skill.is_published());
        assert_eq!(skill.metadata.tags, vec!["finance"]);
    }

    #[test]
    fn test_deserialize_published_skill() {
        let mut json = sample_skill_json();
        json["metadata"]["github"] = serde_json::json!({
            "repositoryUrl": "https://github.com/acme/invoice-review",
            "repositoryName": "invoice-review",
            "publishedAt": "2026-01-07T10:00:00Z",
            "installCommand": "npx skills add acme/invoice-review"
        });

        let skill: Skill = serde_json::from_value(json).unwrap();
        assert_eq!(
            skill.github().map(|github| github.repository_name.as_str()),
            Some("invoice-review")
        );
    }

    #[test]
    fn test_list_query_omits_unset_parameters() {
        let query = ListSkillsQuery {
            search: Some("invoice".to_string()),
            skill_type: None,
            limit: Some(20),
            offset: None,
        };
        assert_eq!(
            query.to_pairs(),
            vec![("search", "invoice".to_string()), ("limit", "20".to_string())]
        );
        assert!(ListSkillsQuery::default().to_pairs().is_empty());
    }

    #[test]
    fn test_update_request_serializes_only_changes() {
        let request = UpdateSkillRequest {
            description: Some("New".to_string()),
            ..Default::default()
        };
        assert!(!request.is_empty());
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({ "description": "New" })
        );
    }
}
