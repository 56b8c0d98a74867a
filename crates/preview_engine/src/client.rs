use std::time::Duration;

use preview_logging::{preview_debug, preview_warn};
use serde_json::Value;
use url::Url;

use crate::{ClientError, ErrorReport, FailureKind, FixResult, GenerationResult};

const GENERATE_PATH: &str = "generate";
const REPORT_ERROR_PATH: &str = "report-error";

/// Whether a non-success status fails the request before the body is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusCheck {
    RequireSuccess,
    /// The body is authoritative whatever the status.
    AnyStatus,
}

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    /// Whole-request timeout; `None` waits for the server indefinitely.
    pub request_timeout: Option<Duration>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: None,
        }
    }
}

#[async_trait::async_trait]
pub trait GenerationApi: Send + Sync {
    /// `GET /generate?prompt=...`
    async fn generate(&self, prompt: &str) -> Result<GenerationResult, ClientError>;

    /// `POST /report-error`
    async fn report_error(&self, report: &ErrorReport) -> Result<FixResult, ClientError>;

    /// Loads the preview page. Any HTTP response counts as loaded.
    async fn load_frame(&self, url: &str) -> Result<(), ClientError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestGenerationApi {
    client: reqwest::Client,
    base_url: Url,
}

impl ReqwestGenerationApi {
    pub fn new(settings: ClientSettings) -> Result<Self, ClientError> {
        let base_url = parse_base_url(&settings.base_url)?;

        let mut builder = reqwest::Client::builder().connect_timeout(settings.connect_timeout);
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| ClientError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|err| ClientError::new(FailureKind::InvalidUrl, err.to_string()))
    }

    /// `GET /generate` URL. The prompt is form-encoded, so spaces go out as `+`.
    fn generate_url(&self, prompt: &str) -> Result<Url, ClientError> {
        let mut url = self.endpoint(GENERATE_PATH)?;
        url.query_pairs_mut().append_pair("prompt", prompt);
        Ok(url)
    }

    async fn send_for_json(
        &self,
        request: reqwest::RequestBuilder,
        check: StatusCheck,
    ) -> Result<Value, ClientError> {
        let response = request.send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            if check == StatusCheck::RequireSuccess {
                return Err(ClientError::new(
                    FailureKind::HttpStatus(status.as_u16()),
                    status.to_string(),
                ));
            }
            preview_warn!("{} answered with status {}", response.url().path(), status);
        }

        let body = response.bytes().await.map_err(map_reqwest_error)?;
        serde_json::from_slice(&body)
            .map_err(|err| ClientError::new(FailureKind::Decode, err.to_string()))
    }
}

#[async_trait::async_trait]
impl GenerationApi for ReqwestGenerationApi {
    async fn generate(&self, prompt: &str) -> Result<GenerationResult, ClientError> {
        let url = self.generate_url(prompt)?;
        preview_debug!("GET {} prompt_len={}", url.path(), prompt.len());

        let body = self
            .send_for_json(self.client.get(url), StatusCheck::RequireSuccess)
            .await?;
        Ok(parse_generation(&body))
    }

    async fn report_error(&self, report: &ErrorReport) -> Result<FixResult, ClientError> {
        let url = self.endpoint(REPORT_ERROR_PATH)?;
        preview_debug!(
            "POST {} error_len={}",
            url.path(),
            report.error_message.len()
        );

        let body = self
            .send_for_json(self.client.post(url).json(report), StatusCheck::AnyStatus)
            .await?;
        Ok(parse_fix(&body))
    }

    async fn load_frame(&self, url: &str) -> Result<(), ClientError> {
        let parsed = Url::parse(url)
            .map_err(|err| ClientError::new(FailureKind::InvalidUrl, err.to_string()))?;
        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        if !response.status().is_success() {
            preview_warn!("Preview loaded with status {}", response.status());
        }
        Ok(())
    }
}

/// Non-empty string field, or the JSON text of any other non-null value.
fn truthy_field(body: &Value, key: &str) -> Option<String> {
    match body.get(key)? {
        Value::Null | Value::Bool(false) => None,
        Value::String(text) if text.is_empty() => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

pub(crate) fn parse_generation(body: &Value) -> GenerationResult {
    if let Some(error) = truthy_field(body, "error") {
        return GenerationResult::Error(error);
    }
    match body.get("preview_url") {
        Some(Value::String(url)) if !url.is_empty() => GenerationResult::Preview {
            preview_url: url.clone(),
        },
        _ => GenerationResult::Unexpected,
    }
}

pub(crate) fn parse_fix(body: &Value) -> FixResult {
    if let Some(code) = truthy_field(body, "fixed_code") {
        return FixResult::FixedCode(code);
    }
    if let Some(error) = truthy_field(body, "error") {
        return FixResult::Error(error);
    }
    FixResult::Empty
}

fn parse_base_url(raw: &str) -> Result<Url, ClientError> {
    let mut base = Url::parse(raw.trim())
        .map_err(|err| ClientError::new(FailureKind::InvalidUrl, err.to_string()))?;
    if base.cannot_be_a_base() {
        return Err(ClientError::new(
            FailureKind::InvalidUrl,
            format!("{raw} cannot be used as a base url"),
        ));
    }
    // Endpoints are joined relative to the base, so it must end in a slash.
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.set_query(None);
    base.set_fragment(None);
    Ok(base)
}

fn map_reqwest_error(err: reqwest::Error) -> ClientError {
    if err.is_timeout() {
        return ClientError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return ClientError::new(FailureKind::Decode, err.to_string());
    }
    ClientError::new(FailureKind::Network, err.to_string())
}
