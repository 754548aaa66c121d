use std::time::Duration;

use async_trait::async_trait;
use dbgenie_core::{
    GenerationRequest, GenerationResponse, RemoteError, SuggestionPayload, SuggestionRequest,
};
use reqwest::{Client, Response, Url};
use serde::{Deserialize, Serialize};

use crate::error::{ClientError, ClientResult};
use crate::service::GenerationService;

const SUGGEST_PATH: &str = "suggest-schema-ai";
const GENERATE_PATH: &str = "generate-data";

/// Default per-request timeout. Generation with `ai_text` columns can take
/// minutes on the server side.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Generation service reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpGenerationService {
    base: Url,
    client: Client,
    timeout: Duration,
}

impl HttpGenerationService {
    pub fn new(base_url: &str) -> ClientResult<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> ClientResult<Self> {
        let mut base = Url::parse(base_url.trim())
            .map_err(|err| ClientError::InvalidUrl(format!("{base_url}: {err}")))?;
        if base.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(base_url.to_string()));
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| ClientError::Build(err.to_string()))?;
        Ok(Self {
            base,
            client,
            timeout,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Resolve a server-provided link the way a browser would: absolute
    /// paths are taken from the host root, full urls are used as is.
    pub fn resolve(&self, url: &str) -> Result<Url, RemoteError> {
        self.base
            .join(url.trim())
            .map_err(|err| RemoteError::Malformed(format!("bad download url {url}: {err}")))
    }

    async fn post_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<Vec<u8>, RemoteError> {
        let url = self.resolve(path)?;
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|err| self.transport_error(err))?;
        self.success_body(response).await
    }

    async fn success_body(&self, response: Response) -> Result<Vec<u8>, RemoteError> {
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|err| self.transport_error(err))?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&bytes)
                .ok()
                .and_then(|body| body.error);
            return Err(RemoteError::rejected(status.as_u16(), message));
        }
        Ok(bytes.to_vec())
    }

    fn transport_error(&self, err: reqwest::Error) -> RemoteError {
        if err.is_timeout() {
            RemoteError::TimedOut(self.timeout.as_secs())
        } else {
            RemoteError::Transport(err.to_string())
        }
    }
}

#[async_trait]
impl GenerationService for HttpGenerationService {
    async fn suggest_schema(
        &self,
        request: &SuggestionRequest,
    ) -> Result<SuggestionPayload, RemoteError> {
        tracing::info!(event = "suggestion_requested", context_len = request.context.len());
        let body = self.post_json(SUGGEST_PATH, request).await?;
        let payload = SuggestionPayload::from_slice(&body)
            .map_err(|err| RemoteError::Malformed(err.to_string()))?;
        tracing::info!(event = "suggestion_received", tables = payload.tables.len());
        Ok(payload)
    }

    async fn generate_data(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, RemoteError> {
        tracing::info!(
            event = "generation_requested",
            tables = request.tables.len(),
            num_rows = request.num_rows,
            format = %request.requested_format
        );
        let body = self.post_json(GENERATE_PATH, request).await?;
        let response = GenerationResponse::from_slice(&body)?;
        tracing::info!(
            event = "generation_received",
            has_download_info = response.download_info.is_some()
        );
        Ok(response)
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, RemoteError> {
        let url = self.resolve(url)?;
        tracing::info!(event = "download_started", url = %url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| self.transport_error(err))?;
        let bytes = self.success_body(response).await?;
        tracing::info!(event = "download_finished", bytes = bytes.len());
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_resolved_under_base_path() {
        let service = HttpGenerationService::new("http://localhost:5000/app").expect("service");
        assert_eq!(
            service.resolve(SUGGEST_PATH).expect("url").as_str(),
            "http://localhost:5000/app/suggest-schema-ai"
        );
        assert_eq!(
            service.resolve("/download/a.zip").expect("url").as_str(),
            "http://localhost:5000/download/a.zip"
        );
        assert_eq!(
            service
                .resolve("https://cdn.example.com/a.csv")
                .expect("url")
                .as_str(),
            "https://cdn.example.com/a.csv"
        );
    }

    #[test]
    fn rejects_unusable_base_urls() {
        assert!(matches!(
            HttpGenerationService::new("not a url"),
            Err(ClientError::InvalidUrl(_))
        ));
        assert!(matches!(
            HttpGenerationService::new("mailto:someone@example.com"),
            Err(ClientError::InvalidUrl(_))
        ));
    }
}
