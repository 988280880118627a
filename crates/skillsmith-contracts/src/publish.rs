use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

/// Body of `POST /skills/{id}/publish`.
#[derive(Clone, Serialize, Deserialize, TS, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PublishRequest {
    pub github_token: String,
    pub is_private: bool,
}

impl fmt::Debug for PublishRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublishRequest")
            .field("github_token", &"<redacted>")
            .field("is_private", &self.is_private)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_token() {
        let request = PublishRequest {
            github_token: "ghp_secret".to_string(),
            is_private: true,
        };
        let debug = format!("{request:?}");
        assert!(!debug.contains("ghp_secret"));
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({ "githubToken": "ghp_secret", "isPrivate": true })
        );
    }
}
