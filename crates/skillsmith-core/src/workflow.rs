//! Skill creation workflow.
//!
//! Stages run `input → analyzed → generating → complete`, and completion collapses
//! straight back into a blank `input` stage carrying the success notice. Every user
//! action and every collaborator reply is a [`WorkflowMsg`] fed to
//! [`WorkflowController::update`], which may hand back a [`WorkflowCommand`] to run
//! against the [`SkillService`].

use std::fmt;
use std::mem;

use skillsmith_contracts::{
    AnalysisResult, AnalyzeRequest, ContentType, GenerateSkillRequest, GenerateSkillResponse,
};
use tracing::{debug, info, warn};

use crate::client::SkillService;
use crate::error::{ClientError, Field, ValidationError};
use crate::normalize::normalize_skill_name;
use crate::request::{Notice, RequestCounter, RequestId};
use crate::validation::{parse_tags, validate_content, validate_name, validate_tags};

/// Content typed by the user, consumed by the analysis call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentSubmission {
    pub content: String,
    pub content_type: ContentType,
}

/// Metadata configured after analysis. `name` is always stored normalized.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkillForm {
    pub name: String,
    pub description: String,
    pub tags: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub content: Option<ValidationError>,
    pub name: Option<ValidationError>,
    pub tags: Option<ValidationError>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.content.is_none() && self.name.is_none() && self.tags.is_none()
    }

    pub fn get(&self, field: Field) -> Option<&ValidationError> {
        match field {
            Field::Content => self.content.as_ref(),
            Field::Name => self.name.as_ref(),
            Field::Tags => self.tags.as_ref(),
            Field::Credential => None,
        }
    }

    fn slot(&mut self, field: Field) -> Option<&mut Option<ValidationError>> {
        match field {
            Field::Content => Some(&mut self.content),
            Field::Name => Some(&mut self.name),
            Field::Tags => Some(&mut self.tags),
            Field::Credential => None,
        }
    }

    fn record(&mut self, error: ValidationError) {
        if let Some(slot) = self.slot(error.field()) {
            *slot = Some(error);
        }
    }

    fn clear(&mut self, field: Field) {
        if let Some(slot) = self.slot(field) {
            *slot = None;
        }
    }
}

/// Current stage and its payload. A pending request id doubles as the busy flag.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowStage {
    Input { pending: Option<RequestId> },
    /// `pending` is a re-analysis in flight. The held analysis stays until it succeeds.
    Analyzed {
        analysis: AnalysisResult,
        pending: Option<RequestId>,
    },
    Generating {
        analysis: AnalysisResult,
        pending: RequestId,
    },
}

impl Default for WorkflowStage {
    fn default() -> Self {
        WorkflowStage::Input { pending: None }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageKind {
    Input,
    Analyzed,
    Generating,
    Complete,
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StageKind::Input => "input",
            StageKind::Analyzed => "analyzed",
            StageKind::Generating => "generating",
            StageKind::Complete => "complete",
        };
        f.write_str(name)
    }
}

/// What the UI shows: the content form, or the analysis preview with the metadata form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewStage {
    Form,
    Preview,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkflowState {
    pub stage: WorkflowStage,
    pub submission: ContentSubmission,
    pub form: SkillForm,
    pub field_errors: FieldErrors,
    pub notice: Option<Notice>,
}

#[derive(Debug, Clone)]
pub enum WorkflowMsg {
    ContentChanged(String),
    ContentTypeChanged(ContentType),
    NameChanged(String),
    DescriptionChanged(String),
    TagsChanged(String),
    Analyze,
    AnalysisFinished {
        request: RequestId,
        result: Result<AnalysisResult, ClientError>,
    },
    Generate,
    GenerationFinished {
        request: RequestId,
        result: Result<GenerateSkillResponse, ClientError>,
    },
    /// Start over with a blank form.
    Reset,
    DismissNotice,
}

#[derive(Debug, Clone)]
pub enum WorkflowCommand {
    Analyze {
        request: RequestId,
        body: AnalyzeRequest,
    },
    Generate {
        request: RequestId,
        body: GenerateSkillRequest,
    },
}

impl WorkflowCommand {
    /// Run the collaborator call and wrap its outcome as the reply message.
    pub async fn execute(self, service: &dyn SkillService) -> WorkflowMsg {
        match self {
            WorkflowCommand::Analyze { request, body } => WorkflowMsg::AnalysisFinished {
                request,
                result: service.analyze(&body).await,
            },
            WorkflowCommand::Generate { request, body } => WorkflowMsg::GenerationFinished {
                request,
                result: service.generate_skill(&body).await,
            },
        }
    }
}

/// Owns one skill creation session.
#[derive(Debug, Default)]
pub struct WorkflowController {
    state: WorkflowState,
    requests: RequestCounter,
}

impl WorkflowController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn stage_kind(&self) -> StageKind {
        match self.state.stage {
            WorkflowStage::Input { .. } => StageKind::Input,
            WorkflowStage::Analyzed { .. } => StageKind::Analyzed,
            WorkflowStage::Generating { .. } => StageKind::Generating,
        }
    }

    pub fn view_stage(&self) -> ViewStage {
        if self.analysis().is_some() {
            ViewStage::Preview
        } else {
            ViewStage::Form
        }
    }

    /// The live analysis, if any.
    pub fn analysis(&self) -> Option<&AnalysisResult> {
        match &self.state.stage {
            WorkflowStage::Input { .. } => None,
            WorkflowStage::Analyzed { analysis, .. }
            | WorkflowStage::Generating { analysis, .. } => Some(analysis),
        }
    }

    pub fn is_analyzing(&self) -> bool {
        matches!(
            self.state.stage,
            WorkflowStage::Input { pending: Some(_) }
                | WorkflowStage::Analyzed {
                    pending: Some(_),
                    ..
                }
        )
    }

    pub fn is_generating(&self) -> bool {
        matches!(self.state.stage, WorkflowStage::Generating { .. })
    }

    /// Analyze is enabled iff the content is valid and no call is in flight.
    pub fn can_analyze(&self) -> bool {
        let idle = match self.state.stage {
            WorkflowStage::Input { pending } | WorkflowStage::Analyzed { pending, .. } => {
                pending.is_none()
            }
            WorkflowStage::Generating { .. } => false,
        };
        idle && validate_content(&self.state.submission.content).is_none()
    }

    /// Generate is enabled iff an analysis is held, name and tags are valid and no
    /// call is in flight.
    pub fn can_generate(&self) -> bool {
        matches!(self.state.stage, WorkflowStage::Analyzed { pending: None, .. })
            && validate_name(&self.state.form.name).is_none()
            && validate_tags(&self.state.form.tags).is_none()
    }

    pub fn update(&mut self, msg: WorkflowMsg) -> Option<WorkflowCommand> {
        match msg {
            WorkflowMsg::ContentChanged(content) => {
                self.edit_submission(|submission| submission.content = content);
                None
            }
            WorkflowMsg::ContentTypeChanged(content_type) => {
                self.edit_submission(|submission| submission.content_type = content_type);
                None
            }
            WorkflowMsg::NameChanged(raw) => {
                if self.form_editable() {
                    self.state.form.name = normalize_skill_name(&raw);
                    self.state.field_errors.clear(Field::Name);
                }
                None
            }
            WorkflowMsg::DescriptionChanged(description) => {
                if self.form_editable() {
                    self.state.form.description = description;
                }
                None
            }
            WorkflowMsg::TagsChanged(tags) => {
                if self.form_editable() {
                    self.state.form.tags = tags;
                    self.state.field_errors.clear(Field::Tags);
                }
                None
            }
            WorkflowMsg::Analyze => self.begin_analysis(),
            WorkflowMsg::AnalysisFinished { request, result } => {
                self.finish_analysis(request, result);
                None
            }
            WorkflowMsg::Generate => self.begin_generation(),
            WorkflowMsg::GenerationFinished { request, result } => {
                self.finish_generation(request, result);
                None
            }
            WorkflowMsg::Reset => {
                debug!(from = %self.stage_kind(), "Workflow reset");
                self.state = WorkflowState::default();
                None
            }
            WorkflowMsg::DismissNotice => {
                self.state.notice = None;
                None
            }
        }
    }

    /// Feed `msg` and keep running the resulting commands until the workflow settles.
    pub async fn dispatch(&mut self, service: &dyn SkillService, msg: WorkflowMsg) {
        let mut next = self.update(msg);
        while let Some(command) = next.take() {
            let reply = command.execute(service).await;
            next = self.update(reply);
        }
    }

    fn form_editable(&self) -> bool {
        if self.is_generating() {
            debug!("Ignoring form edit while generation is in flight");
            return false;
        }
        true
    }

    fn edit_submission(&mut self, edit: impl FnOnce(&mut ContentSubmission)) {
        if self.is_analyzing() {
            debug!("Ignoring content edit while analysis is in flight");
            return;
        }
        match self.state.stage {
            WorkflowStage::Generating { .. } => {
                debug!("Ignoring content edit while generation is in flight");
                return;
            }
            WorkflowStage::Analyzed { .. } => {
                debug!("Content edited after analysis, discarding analysis");
                self.state.stage = WorkflowStage::Input { pending: None };
            }
            WorkflowStage::Input { .. } => {}
        }
        edit(&mut self.state.submission);
        self.state.field_errors.clear(Field::Content);
    }

    fn begin_analysis(&mut self) -> Option<WorkflowCommand> {
        if self.is_analyzing() || self.is_generating() {
            debug!("Analyze ignored, a call is already in flight");
            return None;
        }

        if let Some(error) = validate_content(&self.state.submission.content) {
            debug!(%error, "Analyze rejected locally");
            self.state.field_errors.record(error);
            return None;
        }

        let request = self.requests.issue();
        match &mut self.state.stage {
            WorkflowStage::Analyzed { pending, .. } => *pending = Some(request),
            stage => *stage = WorkflowStage::Input {
                pending: Some(request),
            },
        }
        self.state.field_errors = FieldErrors::default();
        self.state.notice = None;

        let body = AnalyzeRequest {
            content: self.state.submission.content.clone(),
            content_type: self.state.submission.content_type,
        };
        debug!(%request, content_type = %body.content_type, "Requesting analysis");
        Some(WorkflowCommand::Analyze { request, body })
    }

    fn finish_analysis(&mut self, request: RequestId, result: Result<AnalysisResult, ClientError>) {
        let pending = match &self.state.stage {
            WorkflowStage::Input { pending } | WorkflowStage::Analyzed { pending, .. } => *pending,
            WorkflowStage::Generating { .. } => None,
        };
        if pending != Some(request) {
            warn!(%request, "Discarding stale analysis reply");
            return;
        }

        match result {
            Ok(analysis) => {
                info!(
                    analysis_id = %analysis.analysis_id,
                    confidence = analysis.confidence,
                    "Analysis complete"
                );
                self.state.stage = WorkflowStage::Analyzed {
                    analysis,
                    pending: None,
                };
                self.state.field_errors = FieldErrors::default();
                self.state.notice = None;
            }
            Err(error) => {
                warn!(%error, "Analysis failed");
                // Back to the pre-call stage; a held analysis survives
                if let WorkflowStage::Input { pending } | WorkflowStage::Analyzed { pending, .. } =
                    &mut self.state.stage
                {
                    *pending = None;
                }
                self.state.notice = Some(Notice::Error(analysis_diagnostic(&error)));
            }
        }
    }

    fn begin_generation(&mut self) -> Option<WorkflowCommand> {
        let analysis = match &self.state.stage {
            WorkflowStage::Analyzed {
                analysis,
                pending: None,
            } => analysis,
            WorkflowStage::Analyzed { pending: Some(_), .. } => {
                debug!("Generate ignored, an analysis is in flight");
                return None;
            }
            WorkflowStage::Generating { .. } => {
                debug!("Generate ignored, a generation is already in flight");
                return None;
            }
            WorkflowStage::Input { .. } => {
                debug!("Generate ignored, no analysis available");
                return None;
            }
        };

        let name_error = validate_name(&self.state.form.name);
        let tags_error = validate_tags(&self.state.form.tags);
        if name_error.is_some() || tags_error.is_some() {
            for error in name_error.into_iter().chain(tags_error) {
                debug!(%error, "Generate rejected locally");
                self.state.field_errors.record(error);
            }
            return None;
        }

        let description = self.state.form.description.trim();
        let tags = parse_tags(&self.state.form.tags);
        let body = GenerateSkillRequest {
            analysis_id: analysis.analysis_id.clone(),
            skill_name: self.state.form.name.trim().to_string(),
            skill_type: analysis.content_type,
            description: (!description.is_empty()).then(|| description.to_string()),
            tags: (!tags.is_empty()).then_some(tags),
        };

        let request = self.requests.issue();
        let stage = mem::take(&mut self.state.stage);
        let WorkflowStage::Analyzed { analysis, .. } = stage else {
            self.state.stage = stage;
            return None;
        };
        self.state.stage = WorkflowStage::Generating {
            analysis,
            pending: request,
        };
        self.state.field_errors = FieldErrors::default();
        self.state.notice = None;

        debug!(%request, skill_name = %body.skill_name, "Requesting skill generation");
        Some(WorkflowCommand::Generate { request, body })
    }

    fn finish_generation(
        &mut self,
        request: RequestId,
        result: Result<GenerateSkillResponse, ClientError>,
    ) {
        let pending = match self.state.stage {
            WorkflowStage::Generating { pending, .. } => pending,
            _ => {
                warn!(%request, "Discarding generation reply outside of generating stage");
                return;
            }
        };
        if pending != request {
            warn!(%request, %pending, "Discarding stale generation reply");
            return;
        }

        match result {
            Ok(generated) => {
                info!(skill_name = %generated.skill_name, "Skill generated");
                debug!(
                    "Workflow {} -> {} -> {}",
                    StageKind::Generating,
                    StageKind::Complete,
                    StageKind::Input
                );
                self.state = WorkflowState {
                    notice: Some(Notice::Success(format!(
                        "Skill \"{}\" generated successfully",
                        generated.skill_name
                    ))),
                    ..WorkflowState::default()
                };
            }
            Err(error) => {
                warn!(%error, "Skill generation failed");
                if let WorkflowStage::Generating { analysis, .. } = mem::take(&mut self.state.stage)
                {
                    self.state.stage = WorkflowStage::Analyzed {
                        analysis,
                        pending: None,
                    };
                }
                let detail = match error.service_message() {
                    Some(message) => message.to_string(),
                    None => error.to_string(),
                };
                self.state.notice = Some(Notice::Error(format!(
                    "Failed to generate skill: {detail}"
                )));
            }
        }
    }
}

/// Operator-facing explanation of a failed analysis call.
fn analysis_diagnostic(error: &ClientError) -> String {
    let endpoint = error.endpoint();
    let outcome = match error {
        ClientError::Status { status, .. } => format!("HTTP {status}"),
        ClientError::Connection { .. } => "connection error".to_string(),
        ClientError::Decode { status, .. } => format!("HTTP {status}, unreadable response"),
    };
    let base_url = endpoint
        .url
        .strip_suffix("/analyze")
        .unwrap_or(&endpoint.url);

    let mut message = format!("Analysis failed: {endpoint} ({outcome})");
    if let Some(detail) = error.service_message() {
        message.push_str(&format!("\nService message: {detail}"));
    }
    message.push_str(&format!(
        "\nNext steps:\
         \n  1. Make sure the skill service is running and reachable at {base_url}\
         \n  2. Check that SKILLSMITH_API_URL (or --api-url) points at that service\
         \n  3. Retry the analysis"
    ));
    message
}
