//! Tool broker HTTP client
//!
//! Fetches tool descriptors, starts and waits on authorizations and executes
//! tools, all on behalf of one user id.

use std::collections::HashSet;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::types::{
    AuthorizationResponse, AuthorizeRequest, BrokerTool, ExecuteRequest, ExecuteResponse,
    ToolListResponse,
};
use crate::core::{AgentError, AgentResult, BrokerConfig};
use crate::interrupt::{AuthorizationHandle, AuthorizationWaiter};
use crate::tools::{
    AuthorizationStatus, ToolBackend, ToolDescriptor, ToolProvider, ToolQuery, ToolResult,
};

/// Seconds the broker may hold a status request open
const STATUS_WAIT_SECS: u32 = 59;

pub struct BrokerClient {
    client: Client,
    api_base: String,
    api_key: String,
}

impl BrokerClient {
    /// Create a client from configuration
    ///
    /// Fails when no API key is configured.
    pub fn new(config: &BrokerConfig) -> AgentResult<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| AgentError::MissingConfig("ARCADE_API_KEY".into()))?;

        tracing::info!("[BrokerClient] Using broker at {}", config.base_url);

        Ok(Self {
            client: Client::new(),
            api_base: config.base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1/{}", self.api_base, path)
    }

    /// Send a request and decode a JSON body, mapping non-success to `Api`
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> AgentResult<T> {
        let response = request.bearer_auth(&self.api_key).send().await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!("[BrokerClient] API error: {} - {}", status, body);
            return Err(AgentError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }

    async fn list_toolkit(&self, toolkit: &str, query: &ToolQuery) -> AgentResult<Vec<BrokerTool>> {
        let limit = query.limit.to_string();
        let request = self.client.get(self.url("tools")).query(&[
            ("toolkit", toolkit),
            ("limit", limit.as_str()),
            ("user_id", query.user_id.as_str()),
        ]);

        let page: ToolListResponse = self.send(request).await?;
        tracing::debug!(
            "[BrokerClient] Toolkit '{}' returned {} tools",
            toolkit,
            page.items.len()
        );
        Ok(page.items)
    }

    async fn get_tool(&self, name: &str, user_id: &str) -> AgentResult<BrokerTool> {
        let request = self
            .client
            .get(self.url(&format!("tools/{}", name)))
            .query(&[("user_id", user_id)]);
        self.send(request).await
    }

    async fn auth_status(&self, id: &str) -> AgentResult<AuthorizationResponse> {
        let wait = STATUS_WAIT_SECS.to_string();
        let request = self
            .client
            .get(self.url("auth/status"))
            .query(&[("id", id), ("wait", wait.as_str())]);
        self.send(request).await
    }
}

#[async_trait]
impl ToolProvider for BrokerClient {
    async fn get_tools(&self, query: &ToolQuery) -> AgentResult<Vec<ToolDescriptor>> {
        let mut fetched = Vec::new();
        for toolkit in &query.toolkits {
            fetched.extend(self.list_toolkit(toolkit, query).await?);
        }
        for name in &query.isolated_tools {
            fetched.push(self.get_tool(name, &query.user_id).await?);
        }

        // A tool named both in a toolkit and individually is kept once.
        let mut seen = HashSet::new();
        let tools: Vec<ToolDescriptor> = fetched
            .into_iter()
            .map(BrokerTool::into_descriptor)
            .filter(|tool| seen.insert(tool.qualified_name.clone()))
            .take(query.limit)
            .collect();

        tracing::info!("[BrokerClient] Fetched {} tool definitions", tools.len());
        Ok(tools)
    }

    fn name(&self) -> &str {
        "broker"
    }
}

#[async_trait]
impl AuthorizationWaiter for BrokerClient {
    async fn wait_for_completion(&self, id: &str) -> AgentResult<()> {
        loop {
            let status = self.auth_status(id).await?;
            tracing::debug!("[BrokerClient] Authorization {} is {}", id, status.status);

            if status.is_completed() {
                return Ok(());
            }
            if status.is_failed() {
                return Err(AgentError::authorization(format!(
                    "authorization {} failed",
                    id
                )));
            }
        }
    }
}

#[async_trait]
impl ToolBackend for BrokerClient {
    async fn authorize(&self, tool: &ToolDescriptor, user_id: &str) -> AgentResult<AuthorizationStatus> {
        let request = self.client.post(self.url("tools/authorize")).json(&AuthorizeRequest {
            tool_name: &tool.qualified_name,
            user_id,
        });
        let response: AuthorizationResponse = self.send(request).await?;

        if response.is_completed() {
            return Ok(AuthorizationStatus::Completed);
        }

        match (response.url, response.id) {
            (Some(url), Some(id)) => Ok(AuthorizationStatus::Pending(AuthorizationHandle { url, id })),
            _ => Err(AgentError::authorization(format!(
                "broker returned status '{}' for {} without an authorization url",
                response.status, tool.qualified_name
            ))),
        }
    }

    async fn execute(&self, tool: &ToolDescriptor, input: &Value, user_id: &str) -> AgentResult<ToolResult> {
        tracing::info!("[BrokerClient] Executing {}", tool.qualified_name);

        let request = self.client.post(self.url("tools/execute")).json(&ExecuteRequest {
            tool_name: &tool.qualified_name,
            input,
            user_id,
        });
        let response: ExecuteResponse = self.send(request).await?;

        let output = response.output.unwrap_or_default();

        if let Some(error) = output.error {
            tracing::warn!("[BrokerClient] {} failed: {}", tool.qualified_name, error.message);
            return Ok(ToolResult::error(error.message));
        }
        if response.success == Some(false) {
            return Ok(ToolResult::error(format!("{} did not succeed", tool.qualified_name)));
        }

        let text = match output.value {
            Some(Value::String(s)) => s,
            Some(value) => value.to_string(),
            None => String::new(),
        };
        Ok(ToolResult::success(text))
    }
}
