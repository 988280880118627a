//! Skill service collaborators.
//!
//! [`SkillService`] is the seam between the controllers and the remote service. The
//! HTTP implementation lives in [`http`]; tests use the scripted implementation.

mod http;
#[cfg(any(test, feature = "test-utils"))]
mod scripted;

pub use http::HttpSkillService;
#[cfg(any(test, feature = "test-utils"))]
pub use scripted::{ScriptedCall, ScriptedSkillService};

use async_trait::async_trait;
use skillsmith_contracts::{
    AnalysisResult, AnalyzeRequest, GenerateSkillRequest, GenerateSkillResponse,
    GithubPublication, ListSkillsQuery, ListSkillsResponse, PublishRequest, Skill, SkillId,
    UpdateSkillRequest,
};

use crate::error::ClientError;

/// Remote analysis, generation, storage and publishing endpoints.
#[async_trait]
pub trait SkillService: Send + Sync {
    /// `POST /analyze`
    async fn analyze(&self, request: &AnalyzeRequest) -> Result<AnalysisResult, ClientError>;

    /// `POST /generate-skill`
    async fn generate_skill(
        &self,
        request: &GenerateSkillRequest,
    ) -> Result<GenerateSkillResponse, ClientError>;

    /// `GET /skills`
    async fn list_skills(&self, query: &ListSkillsQuery)
    -> Result<ListSkillsResponse, ClientError>;

    /// `GET /skills/{id}`
    async fn get_skill(&self, id: SkillId) -> Result<Skill, ClientError>;

    /// `PUT /skills/{id}`
    async fn update_skill(
        &self,
        id: SkillId,
        request: &UpdateSkillRequest,
    ) -> Result<Skill, ClientError>;

    /// `DELETE /skills/{id}`
    async fn delete_skill(&self, id: SkillId) -> Result<(), ClientError>;

    /// `GET /skills/{id}/download`, the raw zip archive
    async fn download_skill(&self, id: SkillId) -> Result<Vec<u8>, ClientError>;

    /// `POST /skills/{id}/publish`
    async fn publish_skill(
        &self,
        id: SkillId,
        request: &PublishRequest,
    ) -> Result<GithubPublication, ClientError>;
}
