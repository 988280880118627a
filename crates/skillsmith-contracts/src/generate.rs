use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;

use crate::content::ContentType;
use crate::skill::SkillId;

/// Body of `POST /generate-skill`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, PartialEq)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct GenerateSkillRequest {
    pub analysis_id: String,
    /// Canonical identifier, already normalized and validated
    pub skill_name: String,
    pub skill_type: ContentType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// Response of `POST /generate-skill`.
///
/// Only `skillName` is guaranteed; everything else the service reports is kept in
/// `details` untouched, so this type has no TypeScript binding.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateSkillResponse {
    pub skill_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<SkillId>,
    #[serde(flatten)]
    pub details: BTreeMap<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_fields_are_omitted() {
        let request = GenerateSkillRequest {
            analysis_id: "an_1".to_string(),
            skill_name: "my-skill".to_string(),
            skill_type: ContentType::Process,
            description: None,
            tags: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "analysisId": "an_1",
                "skillName": "my-skill",
                "skillType": "process"
            })
        );
    }

    #[test]
    fn test_response_keeps_extra_fields() {
        let response: GenerateSkillResponse = serde_json::from_value(serde_json::json!({
            "skillName": "my-skill",
            "id": 42,
            "fileCount": 3
        }))
        .unwrap();
        assert_eq!(response.id, Some(SkillId(42)));
        assert_eq!(response.details["fileCount"], 3);
    }
}
