use async_trait::async_trait;
use dbgenie_core::{
    DownloadOutcome, GenerationRequest, GenerationResponse, RemoteError, Session,
    SuggestionOutcome, SuggestionPayload, SuggestionRequest,
};

use crate::error::SessionCallError;

/// The two backend calls the editor depends on, plus artifact download.
#[async_trait]
pub trait GenerationService: Send + Sync {
    /// `POST /suggest-schema-ai`.
    async fn suggest_schema(
        &self,
        request: &SuggestionRequest,
    ) -> Result<SuggestionPayload, RemoteError>;

    /// `POST /generate-data`.
    async fn generate_data(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, RemoteError>;

    /// Fetch the bytes behind a download descriptor's url.
    async fn download(&self, url: &str) -> Result<Vec<u8>, RemoteError>;
}

/// Run one suggestion round against `service`, updating `session`.
pub async fn run_suggestion<S>(
    session: &mut Session,
    service: &S,
) -> Result<SuggestionOutcome, SessionCallError>
where
    S: GenerationService + ?Sized,
{
    let request = session.begin_suggestion()?;
    let result = service.suggest_schema(&request).await;
    Ok(session.finish_suggestion(result)?)
}

/// Run one generation round against `service`, updating `session`.
pub async fn run_generation<S>(
    session: &mut Session,
    service: &S,
) -> Result<DownloadOutcome, SessionCallError>
where
    S: GenerationService + ?Sized,
{
    let request = session.begin_generation()?;
    let result = service.generate_data(&request).await;
    Ok(session.finish_generation(result)?.clone())
}
