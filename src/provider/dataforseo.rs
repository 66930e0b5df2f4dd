//! DataForSEO REST client.

use async_trait::async_trait;
use reqwest::{Client, Method};
use serde_json::{json, Value};

use super::envelope::{parse_status, parse_submission};
use super::error::UpstreamError;
use super::{StatusEndpoint, Submission, TaskApi};
use crate::config::Config;
use crate::task::TaskHandle;

/// DataForSEO API client using HTTP Basic credentials from [`Config`].
pub struct DataForSeoClient {
    client: Client,
    base_url: String,
    login: String,
    password: String,
}

impl DataForSeoClient {
    /// Create a client from the process configuration.
    pub fn new(config: &Config) -> Result<Self, UpstreamError> {
        let client = Client::builder()
            .timeout(config.upstream_timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            login: config.login.clone(),
            password: config.password.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Send one request and return the parsed JSON body of a 2xx response.
    async fn execute(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Value, UpstreamError> {
        let mut request = self
            .client
            .request(method, self.url(path))
            .basic_auth(&self.login, Some(&self.password))
            .header("Content-Type", "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(UpstreamError::from_status_body(status.as_u16(), &text));
        }

        serde_json::from_str(&text).map_err(|e| {
            UpstreamError::UnexpectedResponse(format!("invalid JSON from {}: {}", path, e))
        })
    }
}

#[async_trait]
impl TaskApi for DataForSeoClient {
    async fn submit(&self, path: &str, batch: &[Value]) -> Result<Submission, UpstreamError> {
        tracing::debug!("Submitting {} task(s) to {}", batch.len(), path);
        let payload = Value::Array(batch.to_vec());
        let body = self.execute(Method::POST, path, Some(&payload)).await?;
        let handles = parse_submission(&body)?;
        Ok(Submission { handles, body })
    }

    async fn status(
        &self,
        endpoint: &StatusEndpoint,
        handle: &TaskHandle,
    ) -> Result<Option<Value>, UpstreamError> {
        let path = endpoint.path_for(handle);
        let body = match endpoint {
            StatusEndpoint::Post(_) => {
                let payload = json!([{ "id": handle.as_str() }]);
                self.execute(Method::POST, &path, Some(&payload)).await?
            }
            StatusEndpoint::Get(_) => self.execute(Method::GET, &path, None).await?,
        };
        parse_status(&body)
    }
}
