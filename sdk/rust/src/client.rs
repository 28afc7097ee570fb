use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with an unexpected status.
    #[error("service returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// `/restart` ran the remediation command and it failed.
    #[error("remediation failed: {0}")]
    Remediation(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub service: String,
    pub status: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadyState {
    pub ready: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkReport {
    #[serde(rename = "didWorkMs")]
    pub did_work_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeakReport {
    #[serde(rename = "leakedMB")]
    pub leaked_mb: u64,
    #[serde(rename = "totalChunks")]
    pub total_chunks: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestartReport {
    pub message: String,
    pub output: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Typed client for a running selfheal-api instance.
#[derive(Debug, Clone)]
pub struct SelfhealClient {
    client: Client,
    base_url: String,
}

impl SelfhealClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    /// Use a preconfigured reqwest client (timeouts, proxies).
    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `GET /healthz`. Any response at all means the process is alive.
    pub async fn healthz(&self) -> Result<String, ClientError> {
        let resp = self.client.get(self.url("/healthz")).send().await?;
        text_if_success(resp).await
    }

    /// `GET /readyz`. 503 maps to `false`, not an error.
    pub async fn readyz(&self) -> Result<bool, ClientError> {
        let resp = self.client.get(self.url("/readyz")).send().await?;
        match resp.status() {
            StatusCode::OK => Ok(true),
            StatusCode::SERVICE_UNAVAILABLE => Ok(false),
            status => Err(ClientError::Status {
                status,
                body: resp.text().await.unwrap_or_default(),
            }),
        }
    }

    /// `POST /toggle-ready`, returning the new value.
    pub async fn toggle_ready(&self) -> Result<bool, ClientError> {
        let resp = self.client.post(self.url("/toggle-ready")).send().await?;
        let state: ReadyState = json_if_success(resp).await?;
        Ok(state.ready)
    }

    /// `GET /`
    pub async fn status(&self) -> Result<ServiceStatus, ClientError> {
        let resp = self.client.get(self.url("/")).send().await?;
        json_if_success(resp).await
    }

    /// `GET /work`. `None` lets the service pick its default.
    pub async fn work(&self, ms: Option<u64>) -> Result<WorkReport, ClientError> {
        let mut req = self.client.get(self.url("/work"));
        if let Some(ms) = ms {
            req = req.query(&[("ms", ms)]);
        }
        json_if_success(req.send().await?).await
    }

    /// `GET /leak`. `None` lets the service pick its default.
    pub async fn leak(&self, mb: Option<u64>) -> Result<LeakReport, ClientError> {
        let mut req = self.client.get(self.url("/leak"));
        if let Some(mb) = mb {
            req = req.query(&[("mb", mb)]);
        }
        json_if_success(req.send().await?).await
    }

    /// `GET /metrics`, raw exposition text.
    pub async fn metrics(&self) -> Result<String, ClientError> {
        let resp = self.client.get(self.url("/metrics")).send().await?;
        text_if_success(resp).await
    }

    /// `POST /restart`. A 500 with an `error` body becomes
    /// [`ClientError::Remediation`] carrying the command's error text.
    pub async fn restart(&self) -> Result<RestartReport, ClientError> {
        let resp = self.client.post(self.url("/restart")).send().await?;
        if resp.status() == StatusCode::INTERNAL_SERVER_ERROR {
            let text = resp.text().await?;
            return match serde_json::from_str::<ErrorBody>(&text) {
                Ok(body) => Err(ClientError::Remediation(body.error)),
                Err(_) => Err(ClientError::Status {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    body: text,
                }),
            };
        }
        json_if_success(resp).await
    }
}

async fn text_if_success(resp: Response) -> Result<String, ClientError> {
    let status = resp.status();
    let body = resp.text().await?;
    if status.is_success() {
        Ok(body)
    } else {
        Err(ClientError::Status { status, body })
    }
}

async fn json_if_success<T: serde::de::DeserializeOwned>(resp: Response) -> Result<T, ClientError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(ClientError::Status { status, body });
    }
    Ok(resp.json().await?)
}
