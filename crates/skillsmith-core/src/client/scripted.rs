//! In-memory skill service for tests: replies are queued up front and every call is
//! recorded so tests can assert which requests were (or were not) issued.

use async_trait::async_trait;
use skillsmith_contracts::{
    AnalysisResult, AnalyzeRequest, GenerateSkillRequest, GenerateSkillResponse,
    GithubPublication, ListSkillsQuery, ListSkillsResponse, PublishRequest, Skill, SkillId,
    UpdateSkillRequest,
};
use std::collections::VecDeque;
use std::sync::Mutex;

use super::SkillService;
use crate::error::{ClientError, Endpoint};

type Reply<T> = Result<T, ClientError>;

#[derive(Debug, Clone, PartialEq)]
pub enum ScriptedCall {
    Analyze(AnalyzeRequest),
    Generate(GenerateSkillRequest),
    List(ListSkillsQuery),
    Get(SkillId),
    Update(SkillId, UpdateSkillRequest),
    Delete(SkillId),
    Download(SkillId),
    Publish(SkillId, PublishRequest),
}

#[derive(Default)]
struct Replies {
    analyze: VecDeque<Reply<AnalysisResult>>,
    generate: VecDeque<Reply<GenerateSkillResponse>>,
    list: VecDeque<Reply<ListSkillsResponse>>,
    get: VecDeque<Reply<Skill>>,
    update: VecDeque<Reply<Skill>>,
    delete: VecDeque<Reply<()>>,
    download: VecDeque<Reply<Vec<u8>>>,
    publish: VecDeque<Reply<GithubPublication>>,
}

#[derive(Default)]
pub struct ScriptedSkillService {
    replies: Mutex<Replies>,
    calls: Mutex<Vec<ScriptedCall>>,
}

macro_rules! queue_reply {
    ($name:ident, $field:ident, $ty:ty) => {
        pub fn $name(&self, reply: Reply<$ty>) -> &Self {
            self.lock_replies().$field.push_back(reply);
            self
        }
    };
}

impl ScriptedSkillService {
    pub fn new() -> Self {
        Self::default()
    }

    queue_reply!(push_analyze, analyze, AnalysisResult);
    queue_reply!(push_generate, generate, GenerateSkillResponse);
    queue_reply!(push_list, list, ListSkillsResponse);
    queue_reply!(push_get, get, Skill);
    queue_reply!(push_update, update, Skill);
    queue_reply!(push_delete, delete, ());
    queue_reply!(push_download, download, Vec<u8>);
    queue_reply!(push_publish, publish, GithubPublication);

    /// Every call received so far, in order.
    pub fn calls(&self) -> Vec<ScriptedCall> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn lock_replies(&self) -> std::sync::MutexGuard<'_, Replies> {
        self.replies.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn record(&self, call: ScriptedCall) {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(call);
    }

    fn unscripted<T>(method: &'static str, path: String) -> Reply<T> {
        Err(ClientError::Connection {
            endpoint: Endpoint::new(method, format!("scripted://{path}")),
            message: "no scripted reply".to_string(),
        })
    }
}

#[async_trait]
impl SkillService for ScriptedSkillService {
    async fn analyze(&self, request: &AnalyzeRequest) -> Reply<AnalysisResult> {
        self.record(ScriptedCall::Analyze(request.clone()));
        let reply = self.lock_replies().analyze.pop_front();
        reply.unwrap_or_else(|| Self::unscripted("POST", "/analyze".to_string()))
    }

    async fn generate_skill(
        &self,
        request: &GenerateSkillRequest,
    ) -> Reply<GenerateSkillResponse> {
        self.record(ScriptedCall::Generate(request.clone()));
        let reply = self.lock_replies().generate.pop_front();
        reply.unwrap_or_else(|| Self::unscripted("POST", "/generate-skill".to_string()))
    }

    async fn list_skills(&self, query: &ListSkillsQuery) -> Reply<ListSkillsResponse> {
        self.record(ScriptedCall::List(query.clone()));
        let reply = self.lock_replies().list.pop_front();
        reply.unwrap_or_else(|| Self::unscripted("GET", "/skills".to_string()))
    }

    async fn get_skill(&self, id: SkillId) -> Reply<Skill> {
        self.record(ScriptedCall::Get(id));
        let reply = self.lock_replies().get.pop_front();
        reply.unwrap_or_else(|| Self::unscripted("GET", format!("/skills/{id}")))
    }

    async fn update_skill(&self, id: SkillId, request: &UpdateSkillRequest) -> Reply<Skill> {
        self.record(ScriptedCall::Update(id, request.clone()));
        let reply = self.lock_replies().update.pop_front();
        reply.unwrap_or_else(|| Self::unscripted("PUT", format!("/skills/{id}")))
    }

    async fn delete_skill(&self, id: SkillId) -> Reply<()> {
        self.record(ScriptedCall::Delete(id));
        let reply = self.lock_replies().delete.pop_front();
        reply.unwrap_or_else(|| Self::unscripted("DELETE", format!("/skills/{id}")))
    }

    async fn download_skill(&self, id: SkillId) -> Reply<Vec<u8>> {
        self.record(ScriptedCall::Download(id));
        let reply = self.lock_replies().download.pop_front();
        reply.unwrap_or_else(|| Self::unscripted("GET", format!("/skills/{id}/download")))
    }

    async fn publish_skill(
        &self,
        id: SkillId,
        request: &PublishRequest,
    ) -> Reply<GithubPublication> {
        self.record(ScriptedCall::Publish(id, request.clone()));
        let reply = self.lock_replies().publish.pop_front();
        reply.unwrap_or_else(|| Self::unscripted("POST", format!("/skills/{id}/publish")))
    }
}
