//! Skillsmith Core - client-side engine behind the skill generator.
//!
//! This crate provides:
//! - Local validation and skill name normalization
//! - The skill service client (`SkillService` trait and its HTTP implementation)
//! - Controllers for the creation workflow, the skill library and GitHub publishing
//!
//! Controllers never perform I/O themselves. `update` applies a message and may return a
//! command; `dispatch` executes commands against a [`SkillService`] until the
//! controller settles.

pub mod artifact;
pub mod client;
pub mod config;
pub mod error;
pub mod library;
pub mod normalize;
pub mod publish;
pub mod request;
pub mod validation;
pub mod workflow;

pub use client::{HttpSkillService, SkillService};
#[cfg(any(test, feature = "test-utils"))]
pub use client::{ScriptedCall, ScriptedSkillService};
pub use config::ServiceConfig;
pub use error::{ClientError, ConfigError, Endpoint, Field, PublishError, ValidationError};
pub use library::{LibraryCommand, LibraryController, LibraryMsg, LibraryOptions, LibraryState};
pub use normalize::normalize_skill_name;
pub use publish::{
    Credential, PublishCommand, PublishCoordinator, PublishModal, PublishMsg, PublishState,
    PublishTarget,
};
pub use request::{Notice, RequestId};
pub use workflow::{
    StageKind, ViewStage, WorkflowCommand, WorkflowController, WorkflowMsg, WorkflowStage,
    WorkflowState,
};

// Re-export the wire types so consumers need a single dependency
pub use skillsmith_contracts as contracts;
