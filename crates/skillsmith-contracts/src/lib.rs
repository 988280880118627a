//! Skillsmith Contracts - wire types exchanged with the skill service.
//!
//! Every type here mirrors a JSON body of the skill service API (camelCase keys)
//! and exports a TypeScript binding for the web front end.

pub mod analysis;
pub mod content;
pub mod error;
pub mod generate;
pub mod publish;
pub mod skill;

pub use analysis::{AnalysisResult, AnalyzeRequest};
pub use content::{ContentType, TypeFilter};
pub use error::ErrorBody;
pub use generate::{GenerateSkillRequest, GenerateSkillResponse};
pub use publish::PublishRequest;
pub use skill::{
    ExtractedFrom, GithubPublication, ListSkillsQuery, ListSkillsResponse, Pagination, Skill,
    SkillId, SkillMetadata, UpdateSkillRequest,
};
