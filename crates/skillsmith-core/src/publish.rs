//! Publishing a stored skill to a GitHub repository.
//!
//! The modal owns the GitHub token only while it is being typed. Submitting moves the
//! token into the outgoing request, so neither success nor failure leaves it behind.

use std::fmt;
use std::mem;

use skillsmith_contracts::{GithubPublication, PublishRequest, Skill, SkillId};
use tracing::{debug, info, warn};

use crate::client::SkillService;
use crate::error::{ClientError, PublishError};
use crate::library::{LibraryController, LibraryMsg};
use crate::request::{Notice, RequestCounter, RequestId};
use crate::validation::validate_credential;

/// Skill the modal is publishing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishTarget {
    pub skill_id: SkillId,
    pub skill_name: String,
    /// Repository metadata from an earlier publish
    pub previous: Option<GithubPublication>,
}

impl From<&Skill> for PublishTarget {
    fn from(skill: &Skill) -> Self {
        Self {
            skill_id: skill.id,
            skill_name: skill.name.clone(),
            previous: skill.github().cloned(),
        }
    }
}

/// GitHub token typed into the modal. Never printed.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum PublishModal {
    #[default]
    Closed,
    Open {
        target: PublishTarget,
        credential: Credential,
        is_private: bool,
        error: Option<PublishError>,
    },
    InFlight {
        target: PublishTarget,
        request: RequestId,
        is_private: bool,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PublishState {
    pub modal: PublishModal,
    pub notice: Option<Notice>,
    /// Repository reported by the last successful publish.
    pub last_publication: Option<GithubPublication>,
}

#[derive(Debug, Clone)]
pub enum PublishMsg {
    /// Open the modal. Already published skills need `republish` set.
    Open {
        target: PublishTarget,
        republish: bool,
    },
    CredentialChanged(String),
    PrivacyChanged(bool),
    Submit,
    Close,
    Finished {
        request: RequestId,
        skill_id: SkillId,
        result: Result<GithubPublication, ClientError>,
    },
    DismissNotice,
}

#[derive(Debug, Clone)]
pub enum PublishCommand {
    Publish {
        request: RequestId,
        skill_id: SkillId,
        body: PublishRequest,
    },
    /// Hand the new repository metadata to the library.
    RecordPublication {
        skill_id: SkillId,
        publication: GithubPublication,
    },
}

#[derive(Debug, Default)]
pub struct PublishCoordinator {
    state: PublishState,
    requests: RequestCounter,
}

impl PublishCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &PublishState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        !matches!(self.state.modal, PublishModal::Closed)
    }

    pub fn is_publishing(&self) -> bool {
        matches!(self.state.modal, PublishModal::InFlight { .. })
    }

    /// Error shown inside the open modal.
    pub fn modal_error(&self) -> Option<&PublishError> {
        match &self.state.modal {
            PublishModal::Open { error, .. } => error.as_ref(),
            _ => None,
        }
    }

    pub fn update(&mut self, msg: PublishMsg) -> Option<PublishCommand> {
        match msg {
            PublishMsg::Open { target, republish } => {
                self.open(target, republish);
                None
            }
            PublishMsg::CredentialChanged(token) => {
                if let PublishModal::Open {
                    credential, error, ..
                } = &mut self.state.modal
                {
                    *credential = Credential::new(token);
                    *error = None;
                }
                None
            }
            PublishMsg::PrivacyChanged(private) => {
                if let PublishModal::Open { is_private, .. } = &mut self.state.modal {
                    *is_private = private;
                }
                None
            }
            PublishMsg::Submit => self.submit(),
            PublishMsg::Close => {
                match self.state.modal {
                    PublishModal::InFlight { .. } => debug!("Close refused while publishing"),
                    PublishModal::Open { .. } => self.state.modal = PublishModal::Closed,
                    PublishModal::Closed => {}
                }
                None
            }
            PublishMsg::Finished {
                request,
                skill_id,
                result,
            } => self.finish(request, skill_id, result),
            PublishMsg::DismissNotice => {
                self.state.notice = None;
                None
            }
        }
    }

    /// Run `msg` to completion. Successful publishes are forwarded to `library`.
    pub async fn dispatch(
        &mut self,
        service: &dyn SkillService,
        library: &mut LibraryController,
        msg: PublishMsg,
    ) {
        let mut next = self.update(msg);
        while let Some(command) = next.take() {
            match command {
                PublishCommand::Publish {
                    request,
                    skill_id,
                    body,
                } => {
                    let result = service.publish_skill(skill_id, &body).await;
                    next = self.update(PublishMsg::Finished {
                        request,
                        skill_id,
                        result,
                    });
                }
                PublishCommand::RecordPublication {
                    skill_id,
                    publication,
                } => {
                    library
                        .dispatch(
                            service,
                            LibraryMsg::PublicationRecorded {
                                id: skill_id,
                                publication,
                            },
                        )
                        .await;
                }
            }
        }
    }

    fn open(&mut self, target: PublishTarget, republish: bool) {
        if self.is_publishing() {
            debug!("Open ignored while a publish is in flight");
            return;
        }

        if let Some(previous) = &target.previous
            && !republish
        {
            let rejection = PublishError::AlreadyPublished {
                repository_url: previous.repository_url.clone(),
            };
            debug!(skill_id = %target.skill_id, "Refusing to re-publish without confirmation");
            self.state.modal = PublishModal::Closed;
            self.state.notice = Some(Notice::Error(rejection.to_string()));
            return;
        }

        debug!(skill_id = %target.skill_id, republish, "Opening publish modal");
        self.state.notice = None;
        self.state.last_publication = None;
        self.state.modal = PublishModal::Open {
            target,
            credential: Credential::default(),
            is_private: false,
            error: None,
        };
    }

    fn submit(&mut self) -> Option<PublishCommand> {
        let PublishModal::Open {
            credential, error, ..
        } = &mut self.state.modal
        else {
            debug!("Submit ignored, publish modal is not open");
            return None;
        };

        if let Some(invalid) = validate_credential(credential.expose()) {
            *error = Some(PublishError::Invalid(invalid));
            return None;
        }

        let PublishModal::Open {
            target,
            credential,
            is_private,
            ..
        } = mem::take(&mut self.state.modal)
        else {
            return None;
        };

        let request = self.requests.issue();
        let skill_id = target.skill_id;
        info!(%skill_id, is_private, "Publishing skill to GitHub");
        self.state.modal = PublishModal::InFlight {
            target,
            request,
            is_private,
        };

        Some(PublishCommand::Publish {
            request,
            skill_id,
            body: PublishRequest {
                github_token: credential.expose().trim().to_string(),
                is_private,
            },
        })
    }

    fn finish(
        &mut self,
        request: RequestId,
        skill_id: SkillId,
        result: Result<GithubPublication, ClientError>,
    ) -> Option<PublishCommand> {
        let matches_flight = matches!(
            &self.state.modal,
            PublishModal::InFlight { request: pending, .. } if *pending == request
        );
        if !matches_flight {
            warn!(%request, %skill_id, "Discarding stale publish reply");
            return None;
        }

        let PublishModal::InFlight {
            target, is_private, ..
        } = mem::take(&mut self.state.modal)
        else {
            return None;
        };

        match result {
            Ok(publication) => {
                info!(
                    %skill_id,
                    repository = %publication.repository_url,
                    "Skill published"
                );
                self.state.notice = Some(Notice::Success(format!(
                    "Published \"{}\" to {}",
                    target.skill_name, publication.repository_url
                )));
                self.state.last_publication = Some(publication.clone());
                Some(PublishCommand::RecordPublication {
                    skill_id,
                    publication,
                })
            }
            Err(error) => {
                warn!(%skill_id, %error, "Publishing failed");
                self.state.modal = PublishModal::Open {
                    target,
                    credential: Credential::default(),
                    is_private,
                    error: Some(PublishError::Service(
                        error.message_or("Failed to publish skill to GitHub"),
                    )),
                };
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{ScriptedCall, ScriptedSkillService};
    use crate::error::{Endpoint, ValidationError};
    use skillsmith_contracts::{ContentType, ListSkillsResponse, Pagination, SkillMetadata};
    use std::collections::BTreeMap;

    fn skill(id: i64, github: Option<GithubPublication>) -> Skill {
        Skill {
            id: SkillId(id),
            name: "release-notes".to_string(),
            description: None,
            skill_type: ContentType::Technical,
            version: 1,
            main_content: "# Release notes".to_string(),
            references: BTreeMap::new(),
            metadata: SkillMetadata {
                github,
                ..SkillMetadata::default()
            },
            created_at: "2026-01-05T10:00:00Z".to_string(),
            updated_at: "2026-01-05T10:00:00Z".to_string(),
        }
    }

    fn publication(repo: &str) -> GithubPublication {
        GithubPublication {
            repository_url: format!("https://github.com/acme/{repo}"),
            repository_name: repo.to_string(),
            published_at: "2026-01-06T09:00:00Z".to_string(),
            install_command: format!("claude skill install acme/{repo}"),
        }
    }

    fn open(coordinator: &mut PublishCoordinator, skill: &Skill) {
        coordinator.update(PublishMsg::Open {
            target: PublishTarget::from(skill),
            republish: false,
        });
    }

    #[tokio::test]
    async fn test_scenario_c_empty_credential_is_rejected_locally() {
        let service = ScriptedSkillService::new();
        let mut library = LibraryController::default();
        let mut coordinator = PublishCoordinator::new();
        open(&mut coordinator, &skill(5, None));
        coordinator.update(PublishMsg::CredentialChanged("   ".to_string()));

        coordinator
            .dispatch(&service, &mut library, PublishMsg::Submit)
            .await;

        assert!(service.calls().is_empty());
        assert!(coordinator.is_open());
        assert!(!coordinator.is_publishing());
        assert_eq!(
            coordinator.modal_error(),
            Some(&PublishError::Invalid(ValidationError::EmptyCredential))
        );
    }

    #[tokio::test]
    async fn test_successful_publish_updates_library() {
        let service = ScriptedSkillService::new();
        service
            .push_publish(Ok(publication("release-notes")))
            .push_list(Ok(ListSkillsResponse {
                skills: vec![skill(5, Some(publication("release-notes")))],
                pagination: Pagination::default(),
            }));

        let mut library = LibraryController::default();
        let mut coordinator = PublishCoordinator::new();
        open(&mut coordinator, &skill(5, None));
        coordinator.update(PublishMsg::CredentialChanged(" ghp_secret ".to_string()));
        coordinator.update(PublishMsg::PrivacyChanged(true));

        coordinator
            .dispatch(&service, &mut library, PublishMsg::Submit)
            .await;

        assert_eq!(coordinator.state().modal, PublishModal::Closed);
        assert_eq!(
            coordinator.state().notice,
            Some(Notice::Success(
                "Published \"release-notes\" to https://github.com/acme/release-notes".to_string()
            ))
        );
        assert!(library.state().results[0].is_published());
        assert_eq!(
            coordinator.state().last_publication,
            Some(publication("release-notes"))
        );

        let calls = service.calls();
        assert_eq!(
            calls[0],
            ScriptedCall::Publish(
                SkillId(5),
                PublishRequest {
                    github_token: "ghp_secret".to_string(),
                    is_private: true,
                }
            )
        );
        assert!(matches!(calls[1], ScriptedCall::List(_)));
    }

    #[tokio::test]
    async fn test_publication_is_kept_when_refetch_omits_skill() {
        let service = ScriptedSkillService::new();
        service
            .push_publish(Ok(publication("release-notes")))
            .push_list(Ok(ListSkillsResponse {
                skills: Vec::new(),
                pagination: Pagination::default(),
            }));

        let mut library = LibraryController::default();
        let mut coordinator = PublishCoordinator::new();
        open(&mut coordinator, &skill(5, None));
        coordinator.update(PublishMsg::CredentialChanged("ghp_secret".to_string()));

        coordinator
            .dispatch(&service, &mut library, PublishMsg::Submit)
            .await;

        assert!(library.state().find(SkillId(5)).is_none());
        let reported = coordinator.state().last_publication.clone().unwrap();
        assert_eq!(reported.install_command, "claude skill install acme/release-notes");

        // Opening the modal again forgets the previous result
        open(&mut coordinator, &skill(6, None));
        assert_eq!(coordinator.state().last_publication, None);
    }

    #[tokio::test]
    async fn test_failed_publish_keeps_modal_and_drops_credential() {
        let service = ScriptedSkillService::new();
        service
            .push_publish(Err(ClientError::Status {
                endpoint: Endpoint::new("POST", "http://localhost:3001/api/skills/5/publish"),
                status: 401,
                message: Some("Bad credentials".to_string()),
            }))
            .push_publish(Err(ClientError::Connection {
                endpoint: Endpoint::new("POST", "http://localhost:3001/api/skills/5/publish"),
                message: "connection reset".to_string(),
            }));

        let mut library = LibraryController::default();
        let mut coordinator = PublishCoordinator::new();
        open(&mut coordinator, &skill(5, None));
        coordinator.update(PublishMsg::CredentialChanged("ghp_wrong".to_string()));
        coordinator
            .dispatch(&service, &mut library, PublishMsg::Submit)
            .await;

        let PublishModal::Open {
            credential, error, ..
        } = &coordinator.state().modal
        else {
            panic!("modal should stay open");
        };
        assert_eq!(credential.expose(), "");
        assert_eq!(
            error,
            &Some(PublishError::Service("Bad credentials".to_string()))
        );

        coordinator.update(PublishMsg::CredentialChanged("ghp_other".to_string()));
        coordinator
            .dispatch(&service, &mut library, PublishMsg::Submit)
            .await;
        assert_eq!(
            coordinator.modal_error(),
            Some(&PublishError::Service(
                "Failed to publish skill to GitHub".to_string()
            ))
        );
        assert_eq!(service.calls().len(), 2);
    }

    #[test]
    fn test_submit_and_close_are_refused_while_in_flight() {
        let mut coordinator = PublishCoordinator::new();
        open(&mut coordinator, &skill(5, None));
        coordinator.update(PublishMsg::CredentialChanged("ghp_token".to_string()));

        let Some(PublishCommand::Publish { request, .. }) =
            coordinator.update(PublishMsg::Submit)
        else {
            panic!("expected publish command");
        };
        assert!(coordinator.update(PublishMsg::Submit).is_none());
        coordinator.update(PublishMsg::Close);
        assert!(coordinator.is_publishing());

        // A reply for some other request does not settle the flight
        let mut elsewhere = RequestCounter::default();
        elsewhere.issue();
        let unrelated = elsewhere.issue();
        assert_ne!(unrelated, request);
        let command = coordinator.update(PublishMsg::Finished {
            request: unrelated,
            skill_id: SkillId(5),
            result: Ok(publication("other")),
        });
        assert!(command.is_none());
        assert!(coordinator.is_publishing());

        let command = coordinator.update(PublishMsg::Finished {
            request,
            skill_id: SkillId(5),
            result: Ok(publication("release-notes")),
        });
        assert!(matches!(
            command,
            Some(PublishCommand::RecordPublication { .. })
        ));
        assert!(!coordinator.is_open());
    }

    #[test]
    fn test_stale_reply_after_close_is_discarded() {
        let mut coordinator = PublishCoordinator::new();
        open(&mut coordinator, &skill(5, None));
        coordinator.update(PublishMsg::Close);
        assert!(!coordinator.is_open());

        let command = coordinator.update(PublishMsg::Finished {
            request: RequestCounter::default().issue(),
            skill_id: SkillId(5),
            result: Ok(publication("release-notes")),
        });
        assert!(command.is_none());
        assert_eq!(coordinator.state(), &PublishState::default());
    }

    #[test]
    fn test_republish_requires_confirmation() {
        let published = skill(5, Some(publication("release-notes")));
        let mut coordinator = PublishCoordinator::new();

        open(&mut coordinator, &published);
        assert!(!coordinator.is_open());
        let notice = coordinator.state().notice.clone().unwrap();
        assert!(notice.is_error());
        assert!(notice.message().contains("https://github.com/acme/release-notes"));

        coordinator.update(PublishMsg::Open {
            target: PublishTarget::from(&published),
            republish: true,
        });
        assert!(coordinator.is_open());
        assert_eq!(coordinator.state().notice, None);
    }

    #[test]
    fn test_credential_debug_is_redacted() {
        let credential = Credential::new("ghp_secret");
        assert!(!format!("{credential:?}").contains("ghp_secret"));
    }
}
