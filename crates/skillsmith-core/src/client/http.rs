//! HTTP implementation of the skill service.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use skillsmith_contracts::{
    AnalysisResult, AnalyzeRequest, ErrorBody, GenerateSkillRequest, GenerateSkillResponse,
    GithubPublication, ListSkillsQuery, ListSkillsResponse, PublishRequest, Skill, SkillId,
    UpdateSkillRequest,
};
use tracing::{debug, warn};

use super::SkillService;
use crate::config::ServiceConfig;
use crate::error::{ClientError, Endpoint};

const USER_AGENT: &str = concat!("skillsmith/", env!("CARGO_PKG_VERSION"));

/// Skill service reached over HTTP.
pub struct HttpSkillService {
    config: ServiceConfig,
    client: Client,
}

impl HttpSkillService {
    pub fn new(config: ServiceConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|e| {
                warn!(error = %e, "Falling back to default HTTP client");
                Client::new()
            });
        Self { config, client }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    fn endpoint(&self, method: &'static str, path: &str) -> Endpoint {
        Endpoint::new(method, self.config.endpoint_url(path))
    }

    /// Send a request and turn transport failures and non-2xx statuses into errors.
    async fn send(
        &self,
        endpoint: &Endpoint,
        request: RequestBuilder,
    ) -> Result<Response, ClientError> {
        debug!(%endpoint, "Calling skill service");
        let response = request.send().await.map_err(|e| {
            warn!(%endpoint, error = %e, "Skill service unreachable");
            ClientError::Connection {
                endpoint: endpoint.clone(),
                message: e.to_string(),
            }
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(ErrorBody::into_message);
        warn!(%endpoint, status = status.as_u16(), "Skill service returned an error");
        Err(ClientError::Status {
            endpoint: endpoint.clone(),
            status: status.as_u16(),
            message,
        })
    }

    async fn decode<T: DeserializeOwned>(
        endpoint: &Endpoint,
        response: Response,
    ) -> Result<T, ClientError> {
        let status = response.status().as_u16();
        response.json::<T>().await.map_err(|e| ClientError::Decode {
            endpoint: endpoint.clone(),
            status,
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl SkillService for HttpSkillService {
    async fn analyze(&self, request: &AnalyzeRequest) -> Result<AnalysisResult, ClientError> {
        let endpoint = self.endpoint("POST", "/analyze");
        let response = self
            .send(&endpoint, self.client.post(&endpoint.url).json(request))
            .await?;
        Self::decode(&endpoint, response).await
    }

    async fn generate_skill(
        &self,
        request: &GenerateSkillRequest,
    ) -> Result<GenerateSkillResponse, ClientError> {
        let endpoint = self.endpoint("POST", "/generate-skill");
        let response = self
            .send(&endpoint, self.client.post(&endpoint.url).json(request))
            .await?;
        Self::decode(&endpoint, response).await
    }

    async fn list_skills(
        &self,
        query: &ListSkillsQuery,
    ) -> Result<ListSkillsResponse, ClientError> {
        let pairs = query.to_pairs();
        let path = if pairs.is_empty() {
            "/skills".to_string()
        } else {
            let encoded = url::form_urlencoded::Serializer::new(String::new())
                .extend_pairs(pairs)
                .finish();
            format!("/skills?{encoded}")
        };
        let endpoint = self.endpoint("GET", &path);
        let response = self
            .send(&endpoint, self.client.get(&endpoint.url))
            .await?;
        Self::decode(&endpoint, response).await
    }

    async fn get_skill(&self, id: SkillId) -> Result<Skill, ClientError> {
        let endpoint = self.endpoint("GET", &format!("/skills/{id}"));
        let response = self
            .send(&endpoint, self.client.get(&endpoint.url))
            .await?;
        Self::decode(&endpoint, response).await
    }

    async fn update_skill(
        &self,
        id: SkillId,
        request: &UpdateSkillRequest,
    ) -> Result<Skill, ClientError> {
        let endpoint = self.endpoint("PUT", &format!("/skills/{id}"));
        let response = self
            .send(&endpoint, self.client.put(&endpoint.url).json(request))
            .await?;
        Self::decode(&endpoint, response).await
    }

    async fn delete_skill(&self, id: SkillId) -> Result<(), ClientError> {
        let endpoint = self.endpoint("DELETE", &format!("/skills/{id}"));
        self.send(&endpoint, self.client.delete(&endpoint.url))
            .await
            .map(|_| ())
    }

    async fn download_skill(&self, id: SkillId) -> Result<Vec<u8>, ClientError> {
        let endpoint = self.endpoint("GET", &format!("/skills/{id}/download"));
        let response = self
            .send(&endpoint, self.client.get(&endpoint.url))
            .await?;
        let status = response.status().as_u16();
        let bytes = response.bytes().await.map_err(|e| ClientError::Decode {
            endpoint: endpoint.clone(),
            status,
            message: e.to_string(),
        })?;
        Ok(bytes.to_vec())
    }

    async fn publish_skill(
        &self,
        id: SkillId,
        request: &PublishRequest,
    ) -> Result<GithubPublication, ClientError> {
        let endpoint = self.endpoint("POST", &format!("/skills/{id}/publish"));
        let response = self
            .send(&endpoint, self.client.post(&endpoint.url).json(request))
            .await?;
        Self::decode(&endpoint, response).await
    }
}
