use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;

use crate::content::ContentType;

/// Body of `POST /analyze`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, PartialEq)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct AnalyzeRequest {
    pub content: String,
    pub content_type: ContentType,
}

/// Structured interpretation of submitted content, keyed by an opaque analysis id.
#[derive(Debug, Clone, Serialize, Deserialize, TS, PartialEq)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct AnalysisResult {
    /// Opaque handle passed back when requesting generation
    pub analysis_id: String,
    pub content_type: ContentType,
    #[serde(default)]
    #[ts(type = "Record<string, unknown>")]
    pub extracted_data: BTreeMap<String, serde_json::Value>,
    /// Confidence in `[0, 1]`
    pub confidence: f64,
    #[serde(default)]
    #[ts(type = "number")]
    pub processing_time_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub timestamp: String,
}

impl AnalysisResult {
    /// Confidence as a whole percentage, clamped to `0..=100`.
    pub fn confidence_percent(&self) -> u8 {
        (self.confidence.clamp(0.0, 1.0) * 100.0).round() as u8
    }
}
