use std::path::Path;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use uploader_logging::{uploader_debug, uploader_info};
use url::Url;

use crate::status::{decode_job_status, decode_job_ticket};
use crate::{ClientError, FailureKind, JobStatus};

#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// Backend root; endpoint paths are appended to it.
    pub base_url: Url,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub poll_interval: Duration,
    /// Consecutive failed polls tolerated before a job is given up.
    pub max_poll_failures: u32,
}

impl ClientSettings {
    /// Settings for `base_url` with the stock timeouts and poll cadence.
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            poll_interval: Duration::from_millis(2000),
            max_poll_failures: 3,
        }
    }
}

/// The backend endpoints the page talks to.
#[async_trait::async_trait]
pub trait JobClient: Send + Sync {
    /// `POST /fetch/upload` with multipart field `file`; returns the job id.
    async fn submit_upload(&self, file_name: &str, path: &Path) -> Result<String, ClientError>;

    /// `GET <href>` of a registry link; returns the job id.
    async fn submit_registry(&self, href: &str) -> Result<String, ClientError>;

    /// `GET /job/{id}`.
    async fn job_status(&self, job_id: &str) -> Result<JobStatus, ClientError>;

    /// `GET /job/{id}/cancel`; the body is only of interest for logging.
    async fn cancel_job(&self, job_id: &str) -> Result<serde_json::Value, ClientError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestJobClient {
    client: reqwest::Client,
    base_url: Url,
}

impl ReqwestJobClient {
    pub fn new(settings: &ClientSettings) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ClientError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self {
            client,
            base_url: settings.base_url.clone(),
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        {
            let mut path = url.path_segments_mut().map_err(|_| {
                ClientError::new(FailureKind::InvalidUrl, "base url cannot carry a path")
            })?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    async fn get_text(&self, url: Url) -> Result<(StatusCode, String), ClientError> {
        uploader_debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        read_text(response).await
    }
}

#[async_trait::async_trait]
impl JobClient for ReqwestJobClient {
    async fn submit_upload(&self, file_name: &str, path: &Path) -> Result<String, ClientError> {
        let bytes = tokio::fs::read(path).await.map_err(|err| {
            ClientError::new(FailureKind::Io, format!("{}: {err}", path.display()))
        })?;
        let url = self.endpoint(&["fetch", "upload"])?;
        uploader_info!("Uploading {} ({} bytes) to {}", file_name, bytes.len(), url);

        let form = Form::new().part("file", Part::bytes(bytes).file_name(file_name.to_string()));
        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let (status, body) = read_text(response).await?;
        ticket_from(status, &body)
    }

    async fn submit_registry(&self, href: &str) -> Result<String, ClientError> {
        let url = self
            .base_url
            .join(href)
            .map_err(|err| ClientError::new(FailureKind::InvalidUrl, err.to_string()))?;
        uploader_info!("Fetching registry file via {}", url);
        let (status, body) = self.get_text(url).await?;
        ticket_from(status, &body)
    }

    async fn job_status(&self, job_id: &str) -> Result<JobStatus, ClientError> {
        let url = self.endpoint(&["job", job_id])?;
        let (status, body) = self.get_text(url).await?;
        // Unknown jobs come back as 404 with a JSON body.
        decode_job_status(&body).map_err(|err| http_error_or(status, err))
    }

    async fn cancel_job(&self, job_id: &str) -> Result<serde_json::Value, ClientError> {
        let url = self.endpoint(&["job", job_id, "cancel"])?;
        let (status, body) = self.get_text(url).await?;
        serde_json::from_str(&body).map_err(|err| {
            http_error_or(
                status,
                ClientError::new(FailureKind::MalformedResponse, err.to_string()),
            )
        })
    }
}

async fn read_text(response: reqwest::Response) -> Result<(StatusCode, String), ClientError> {
    let status = response.status();
    let body = response.text().await.map_err(map_reqwest_error)?;
    Ok((status, body))
}

fn ticket_from(status: StatusCode, body: &str) -> Result<String, ClientError> {
    if !status.is_success() {
        return Err(ClientError::new(
            FailureKind::HttpStatus(status.as_u16()),
            status.to_string(),
        ));
    }
    decode_job_ticket(body)
}

fn http_error_or(status: StatusCode, err: ClientError) -> ClientError {
    if status.is_success() {
        err
    } else {
        ClientError::new(FailureKind::HttpStatus(status.as_u16()), status.to_string())
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ClientError {
    if err.is_timeout() {
        return ClientError::new(FailureKind::Timeout, err.to_string());
    }
    ClientError::new(FailureKind::Network, err.to_string())
}
