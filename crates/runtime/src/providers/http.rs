//! Decision provider backed by a remote HTTP service.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use super::AgentBrief;
use crate::api::{Decision, DecisionProvider, Result, RuntimeError};

#[derive(Serialize)]
struct DecisionRequest<'a> {
    state: &'a AgentBrief,
}

/// POSTs `{ "state": <brief> }` as JSON and expects `{ thoughts, action }`.
///
/// The provider performs no timeout of its own; the runtime bounds every
/// request.
pub struct HttpDecisionProvider {
    client: Client,
    url: String,
}

impl HttpDecisionProvider {
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), url)
    }

    /// Reuses an existing client (connection pool, proxies, TLS settings).
    pub fn with_client(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl DecisionProvider for HttpDecisionProvider {
    async fn decide(&self, brief: &AgentBrief) -> Result<Decision> {
        let response = self
            .client
            .post(&self.url)
            .json(&DecisionRequest { state: brief })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RuntimeError::DecisionStatus {
                status: status.as_u16(),
            });
        }

        Ok(response.json::<Decision>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decision_answer_tolerates_missing_thoughts() {
        let decision: Decision =
            serde_json::from_str(r#"{"action":"MOVE [1, 2]"}"#).expect("decode");
        assert_eq!(decision, Decision::new("", "MOVE [1, 2]"));
    }

    #[test]
    fn provider_keeps_its_endpoint() {
        let provider = HttpDecisionProvider::new("http://localhost:5000/act");
        assert_eq!(provider.url(), "http://localhost:5000/act");
    }
}
