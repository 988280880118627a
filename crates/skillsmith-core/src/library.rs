//! Skill library browsing.
//!
//! Holds the search term and type filter, the last resolved result page and the
//! currently selected record. Every query change issues a new fetch; only the reply to
//! the latest fetch is applied.

use std::path::PathBuf;

use skillsmith_contracts::{
    GithubPublication, ListSkillsQuery, ListSkillsResponse, Pagination, Skill, SkillId,
    TypeFilter, UpdateSkillRequest,
};
use tracing::{debug, info, warn};

use crate::artifact::{archive_file_name, save_artifact};
use crate::client::SkillService;
use crate::error::ClientError;
use crate::normalize::normalize_skill_name;
use crate::request::{Notice, RequestCounter, RequestId};
use crate::validation::{validate_name, validate_tags};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryOptions {
    /// Forwarded as `limit` on every fetch when set.
    pub page_size: Option<u32>,
    /// Where downloaded archives are saved.
    pub download_dir: PathBuf,
}

impl Default for LibraryOptions {
    fn default() -> Self {
        Self {
            page_size: None,
            download_dir: PathBuf::from("."),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LibraryState {
    pub search_term: String,
    pub type_filter: TypeFilter,
    pub results: Vec<Skill>,
    pub pagination: Pagination,
    pub selected: Option<Skill>,
    pub notice: Option<Notice>,
    /// Path of the most recently saved archive
    pub last_saved: Option<PathBuf>,
}

impl LibraryState {
    pub fn find(&self, id: SkillId) -> Option<&Skill> {
        self.results
            .iter()
            .chain(self.selected.as_ref())
            .find(|skill| skill.id == id)
    }

    /// Apply `change` to every copy of record `id` held in the state.
    fn each_copy(&mut self, id: SkillId, mut change: impl FnMut(&mut Skill)) {
        for skill in self
            .results
            .iter_mut()
            .chain(self.selected.as_mut())
            .filter(|skill| skill.id == id)
        {
            change(skill);
        }
    }
}

#[derive(Debug, Clone)]
pub enum LibraryMsg {
    SearchChanged(String),
    TypeFilterChanged(TypeFilter),
    Refresh,
    Loaded {
        request: RequestId,
        result: Result<ListSkillsResponse, ClientError>,
    },
    Select(SkillId),
    Selected {
        request: RequestId,
        id: SkillId,
        result: Result<Skill, ClientError>,
    },
    Update {
        id: SkillId,
        changes: UpdateSkillRequest,
    },
    Updated {
        id: SkillId,
        result: Result<Skill, ClientError>,
    },
    Delete(SkillId),
    Deleted {
        id: SkillId,
        result: Result<(), ClientError>,
    },
    Download(SkillId),
    Downloaded {
        id: SkillId,
        file_name: String,
        result: Result<Vec<u8>, ClientError>,
    },
    Saved {
        id: SkillId,
        result: Result<PathBuf, String>,
    },
    /// A publish succeeded elsewhere; merge its repository metadata.
    PublicationRecorded {
        id: SkillId,
        publication: GithubPublication,
    },
    DismissNotice,
}

#[derive(Debug, Clone)]
pub enum LibraryCommand {
    Fetch {
        request: RequestId,
        query: ListSkillsQuery,
    },
    Get {
        request: RequestId,
        id: SkillId,
    },
    Update {
        id: SkillId,
        body: UpdateSkillRequest,
    },
    Delete {
        id: SkillId,
    },
    Download {
        id: SkillId,
        file_name: String,
    },
    Save {
        id: SkillId,
        dir: PathBuf,
        file_name: String,
        bytes: Vec<u8>,
    },
}

impl LibraryCommand {
    pub async fn execute(self, service: &dyn SkillService) -> LibraryMsg {
        match self {
            LibraryCommand::Fetch { request, query } => LibraryMsg::Loaded {
                request,
                result: service.list_skills(&query).await,
            },
            LibraryCommand::Get { request, id } => LibraryMsg::Selected {
                request,
                id,
                result: service.get_skill(id).await,
            },
            LibraryCommand::Update { id, body } => LibraryMsg::Updated {
                id,
                result: service.update_skill(id, &body).await,
            },
            LibraryCommand::Delete { id } => LibraryMsg::Deleted {
                id,
                result: service.delete_skill(id).await,
            },
            LibraryCommand::Download { id, file_name } => LibraryMsg::Downloaded {
                id,
                file_name,
                result: service.download_skill(id).await,
            },
            LibraryCommand::Save {
                id,
                dir,
                file_name,
                bytes,
            } => {
                let saved =
                    tokio::task::spawn_blocking(move || save_artifact(&dir, &file_name, &bytes))
                        .await;
                let result = match saved {
                    Ok(Ok(path)) => Ok(path),
                    Ok(Err(e)) => Err(e.to_string()),
                    Err(e) => Err(e.to_string()),
                };
                LibraryMsg::Saved { id, result }
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct LibraryController {
    state: LibraryState,
    options: LibraryOptions,
    requests: RequestCounter,
    pending_fetch: Option<RequestId>,
    pending_select: Option<RequestId>,
}

impl LibraryController {
    pub fn new(options: LibraryOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn state(&self) -> &LibraryState {
        &self.state
    }

    pub fn options(&self) -> &LibraryOptions {
        &self.options
    }

    /// True while a fetch is in flight. Previous results stay visible meanwhile.
    pub fn is_loading(&self) -> bool {
        self.pending_fetch.is_some()
    }

    /// Query sent for the current search term and filter.
    pub fn query(&self) -> ListSkillsQuery {
        let search = self.state.search_term.trim();
        ListSkillsQuery {
            search: (!search.is_empty()).then(|| search.to_string()),
            skill_type: self.state.type_filter.content_type(),
            limit: self.options.page_size,
            offset: None,
        }
    }

    pub fn update(&mut self, msg: LibraryMsg) -> Option<LibraryCommand> {
        match msg {
            LibraryMsg::SearchChanged(term) => {
                if term == self.state.search_term {
                    return None;
                }
                self.state.search_term = term;
                Some(self.fetch())
            }
            LibraryMsg::TypeFilterChanged(filter) => {
                if filter == self.state.type_filter {
                    return None;
                }
                self.state.type_filter = filter;
                Some(self.fetch())
            }
            LibraryMsg::Refresh => Some(self.fetch()),
            LibraryMsg::Loaded { request, result } => {
                self.apply_loaded(request, result);
                None
            }
            LibraryMsg::Select(id) => {
                let request = self.requests.issue();
                self.pending_select = Some(request);
                debug!(%request, %id, "Fetching skill");
                Some(LibraryCommand::Get { request, id })
            }
            LibraryMsg::Selected {
                request,
                id,
                result,
            } => {
                self.apply_selected(request, id, result);
                None
            }
            LibraryMsg::Update { id, changes } => self.begin_update(id, changes),
            LibraryMsg::Updated { id, result } => {
                match result {
                    Ok(skill) => {
                        info!(%id, name = %skill.name, "Skill updated");
                        self.state.notice =
                            Some(Notice::Success(format!("Skill \"{}\" updated", skill.name)));
                        self.state.each_copy(id, |held| *held = skill.clone());
                    }
                    Err(error) => {
                        warn!(%id, %error, "Skill update failed");
                        self.state.notice =
                            Some(Notice::Error(error.message_or("Failed to update skill")));
                    }
                }
                None
            }
            LibraryMsg::Delete(id) => {
                debug!(%id, "Deleting skill");
                Some(LibraryCommand::Delete { id })
            }
            LibraryMsg::Deleted { id, result } => match result {
                Ok(()) => {
                    info!(%id, "Skill deleted");
                    if self.state.selected.as_ref().is_some_and(|s| s.id == id) {
                        self.state.selected = None;
                    }
                    self.state.notice = Some(Notice::Success(format!("Skill {id} deleted")));
                    Some(self.fetch())
                }
                Err(error) => {
                    warn!(%id, %error, "Skill deletion failed");
                    self.state.notice =
                        Some(Notice::Error(error.message_or("Failed to delete skill")));
                    None
                }
            },
            LibraryMsg::Download(id) => {
                let name = self.state.find(id).map(|skill| skill.name.as_str());
                let file_name = archive_file_name(id, name);
                debug!(%id, %file_name, "Downloading skill archive");
                Some(LibraryCommand::Download { id, file_name })
            }
            LibraryMsg::Downloaded {
                id,
                file_name,
                result,
            } => match result {
                Ok(bytes) => Some(LibraryCommand::Save {
                    id,
                    dir: self.options.download_dir.clone(),
                    file_name,
                    bytes,
                }),
                Err(error) => {
                    warn!(%id, %error, "Skill download failed");
                    self.state.notice =
                        Some(Notice::Error(error.message_or("Failed to download skill")));
                    None
                }
            },
            LibraryMsg::Saved { id, result } => {
                match result {
                    Ok(path) => {
                        info!(%id, path = %path.display(), "Skill archive saved");
                        self.state.notice =
                            Some(Notice::Success(format!("Saved {}", path.display())));
                        self.state.last_saved = Some(path);
                    }
                    Err(error) => {
                        warn!(%id, %error, "Could not save skill archive");
                        self.state.notice = Some(Notice::Error(format!(
                            "Failed to save skill archive: {error}"
                        )));
                    }
                }
                None
            }
            LibraryMsg::PublicationRecorded { id, publication } => {
                debug!(%id, repository = %publication.repository_url, "Recording publication");
                self.state
                    .each_copy(id, |held| held.metadata.github = Some(publication.clone()));
                Some(self.fetch())
            }
            LibraryMsg::DismissNotice => {
                self.state.notice = None;
                None
            }
        }
    }

    pub async fn dispatch(&mut self, service: &dyn SkillService, msg: LibraryMsg) {
        let mut next = self.update(msg);
        while let Some(command) = next.take() {
            let reply = command.execute(service).await;
            next = self.update(reply);
        }
    }

    fn fetch(&mut self) -> LibraryCommand {
        let request = self.requests.issue();
        if let Some(previous) = self.pending_fetch.replace(request) {
            debug!(%previous, %request, "Superseding in-flight fetch");
        }
        let query = self.query();
        debug!(%request, ?query, "Fetching skills");
        LibraryCommand::Fetch { request, query }
    }

    fn apply_loaded(&mut self, request: RequestId, result: Result<ListSkillsResponse, ClientError>) {
        if self.pending_fetch != Some(request) {
            warn!(%request, "Discarding stale skill list reply");
            return;
        }
        self.pending_fetch = None;

        match result {
            Ok(response) => {
                info!(
                    count = response.skills.len(),
                    total = response.pagination.total,
                    "Skills loaded"
                );
                self.state.results = response.skills;
                self.state.pagination = response.pagination;
            }
            Err(error) => {
                warn!(%error, "Loading skills failed");
                self.state.notice = Some(Notice::Error(error.message_or("Failed to load skills")));
            }
        }
    }

    fn apply_selected(&mut self, request: RequestId, id: SkillId, result: Result<Skill, ClientError>) {
        if self.pending_select != Some(request) {
            warn!(%request, %id, "Discarding stale skill reply");
            return;
        }
        self.pending_select = None;

        match result {
            Ok(skill) => {
                for held in self.state.results.iter_mut().filter(|s| s.id == id) {
                    *held = skill.clone();
                }
                self.state.selected = Some(skill);
            }
            Err(error) if error.is_not_found() => {
                warn!(%id, "Skill not found");
                self.state.notice = Some(Notice::Error(format!("Skill {id} not found")));
            }
            Err(error) => {
                warn!(%id, %error, "Loading skill failed");
                self.state.notice = Some(Notice::Error(error.message_or("Failed to load skill")));
            }
        }
    }

    fn begin_update(&mut self, id: SkillId, mut changes: UpdateSkillRequest) -> Option<LibraryCommand> {
        if changes.is_empty() {
            debug!(%id, "Nothing to update");
            return None;
        }

        if let Some(name) = changes.name.take() {
            let name = normalize_skill_name(&name);
            if let Some(error) = validate_name(&name) {
                self.state.notice = Some(Notice::Error(error.to_string()));
                return None;
            }
            changes.name = Some(name);
        }
        if let Some(tags) = &changes.tags
            && let Some(error) = validate_tags(&tags.join(","))
        {
            self.state.notice = Some(Notice::Error(error.to_string()));
            return None;
        }

        debug!(%id, "Updating skill");
        Some(LibraryCommand::Update { id, body: changes })
    }
}
