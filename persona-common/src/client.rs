use crate::config::{Capabilities, ClientConfig, DispatchMode, DispatchResponse};
use crate::error::{Error, Result};
use persona_protocol::{Agent, DispatchOutcome, DispatchRequest, Log, Task};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Remote operations the agent store depends on.
#[allow(async_fn_in_trait)]
pub trait AgentBackend {
    async fn create_agent(&self, agent: &Agent) -> Result<Agent>;

    async fn get_agents(&self) -> Result<Vec<Agent>>;

    async fn delete_agent(&self, id: &str) -> Result<Option<Value>>;
}

impl<T: AgentBackend> AgentBackend for Arc<T> {
    async fn create_agent(&self, agent: &Agent) -> Result<Agent> {
        (**self).create_agent(agent).await
    }

    async fn get_agents(&self) -> Result<Vec<Agent>> {
        (**self).get_agents().await
    }

    async fn delete_agent(&self, id: &str) -> Result<Option<Value>> {
        (**self).delete_agent(id).await
    }
}

/// HTTP client for the agent management service.
///
/// Each method issues exactly one request. Bodies are decoded regardless of
/// the HTTP status, so an error payload surfaces as [`Error::Decode`].
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    capabilities: Capabilities,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            capabilities: Capabilities::default(),
            client: reqwest::Client::new(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.base_url.clone()).with_capabilities(config.capabilities.clone())
    }

    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    pub async fn create_agent(&self, agent: &Agent) -> Result<Agent> {
        let url = self.url(&["agents"]);
        debug!("POST {}", url);
        let response = self
            .client
            .post(&url)
            .json(&agent.unidentified())
            .send()
            .await?;
        decode_json(response).await
    }

    pub async fn get_agents(&self) -> Result<Vec<Agent>> {
        self.get_json(&["agents"]).await
    }

    pub async fn get_agent(&self, id: &str) -> Result<Agent> {
        require("agent id", id)?;
        self.get_json(&["agents", id]).await
    }

    pub async fn update_agent(&self, id: &str, agent: &Agent) -> Result<Agent> {
        if !self.capabilities.update_agent {
            return Err(Error::Unsupported("update_agent"));
        }
        require("agent id", id)?;

        let url = self.url(&["agents", id]);
        debug!("PUT {}", url);
        let response = self.client.put(&url).json(agent).send().await?;
        decode_json(response).await
    }

    pub async fn delete_agent(&self, id: &str) -> Result<Option<Value>> {
        require("agent id", id)?;

        let url = self.url(&["agents", id]);
        debug!("DELETE {}", url);
        let response = self.client.delete(&url).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        if body.trim().is_empty() {
            return Ok(None);
        }
        serde_json::from_str(&body)
            .map(Some)
            .map_err(|source| Error::Decode { status, source })
    }

    /// Starts remote work for an agent. Returns as soon as the service has
    /// accepted the dispatch.
    pub async fn dispatch_agent(
        &self,
        id: &str,
        request: &DispatchRequest,
    ) -> Result<DispatchOutcome> {
        require("agent id", id)?;

        let url = self.url(&["agents", id, "dispatch"]);
        let builder = match self.capabilities.dispatch {
            DispatchMode::Bare => {
                if request.goal.is_some() || request.seed.is_some() {
                    debug!("Service revision takes no dispatch parameters, dropping them");
                }
                self.client.post(&url)
            }
            DispatchMode::Parameterized => {
                let goal = request.goal.as_deref().unwrap_or_default();
                require("dispatch goal", goal)?;
                self.client.post(&url).json(request)
            }
        };

        debug!("POST {}", url);
        let response = builder.send().await?;

        match self.capabilities.dispatch_response {
            DispatchResponse::Json => decode_json(response).await.map(DispatchOutcome::Json),
            DispatchResponse::Text => {
                let body = response.text().await?;
                let token = serde_json::from_str::<String>(&body).unwrap_or(body);
                Ok(DispatchOutcome::Token(token))
            }
        }
    }

    pub async fn get_agent_status(&self, id: &str) -> Result<Value> {
        if !self.capabilities.agent_status {
            return Err(Error::Unsupported("get_agent_status"));
        }
        require("agent id", id)?;
        self.get_json(&["agents", id, "status"]).await
    }

    pub async fn get_agent_logs(&self, id: &str) -> Result<Vec<Log>> {
        require("agent id", id)?;
        self.get_json(&["agents", id, "logs"]).await
    }

    pub async fn get_agent_log(&self, id: &str, log_id: &str) -> Result<Log> {
        if !self.capabilities.agent_log {
            return Err(Error::Unsupported("get_agent_log"));
        }
        require("agent id", id)?;
        require("log id", log_id)?;
        self.get_json(&["agents", id, "logs", log_id]).await
    }

    pub async fn get_logs(&self) -> Result<Vec<Log>> {
        self.get_json(&["logs"]).await
    }

    pub async fn get_tasks(&self) -> Result<Vec<Task>> {
        self.get_json(&["tasks"]).await
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T> {
        let url = self.url(segments);
        debug!("GET {}", url);
        let response = self.client.get(&url).send().await?;
        decode_json(response).await
    }

    fn url(&self, segments: &[&str]) -> String {
        let mut url = self.base_url.clone();
        for segment in segments {
            url.push('/');
            url.push_str(&urlencoding::encode(segment));
        }
        url
    }
}

impl AgentBackend for ApiClient {
    async fn create_agent(&self, agent: &Agent) -> Result<Agent> {
        ApiClient::create_agent(self, agent).await
    }

    async fn get_agents(&self) -> Result<Vec<Agent>> {
        ApiClient::get_agents(self).await
    }

    async fn delete_agent(&self, id: &str) -> Result<Option<Value>> {
        ApiClient::delete_agent(self, id).await
    }
}

fn require(what: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(Error::InvalidArgument(format!("{} must not be empty", what)));
    }
    Ok(())
}

async fn decode_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status().as_u16();
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|source| Error::Decode { status, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_and_encodes_segments() {
        let client = ApiClient::new("http://localhost:8000/");

        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(client.url(&["agents"]), "http://localhost:8000/agents");
        assert_eq!(
            client.url(&["agents", "a/b c", "logs"]),
            "http://localhost:8000/agents/a%2Fb%20c/logs"
        );
    }

    #[tokio::test]
    async fn test_empty_id_rejected_before_request() {
        // Nothing listens here; a sent request would be a transport error.
        let client = ApiClient::new("http://127.0.0.1:9");

        let err = client.get_agent("").await.unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));

        let err = client.delete_agent("").await.unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_unsupported_operations_fail_fast() {
        let client = ApiClient::new("http://127.0.0.1:9").with_capabilities(Capabilities::current());

        let err = client.update_agent("1", &sample_agent()).await.unwrap_err();
        assert!(matches!(err, Error::Unsupported("update_agent")));

        let err = client.get_agent_status("1").await.unwrap_err();
        assert!(matches!(err, Error::Unsupported("get_agent_status")));

        let err = client.get_agent_log("1", "2").await.unwrap_err();
        assert!(matches!(err, Error::Unsupported("get_agent_log")));
    }

    #[tokio::test]
    async fn test_parameterized_dispatch_requires_goal() {
        let client = ApiClient::new("http://127.0.0.1:9");

        let err = client
            .dispatch_agent("1", &DispatchRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    fn sample_agent() -> Agent {
        Agent::new(
            "scout",
            "",
            persona_protocol::Profile {
                gender: "any".to_string(),
                age_from: 20,
                age_to: 30,
                location: "Lisbon".to_string(),
                interests: Vec::new(),
                description: None,
            },
        )
    }
}
