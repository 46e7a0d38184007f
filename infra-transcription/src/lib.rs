use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use recitation_domain::{
    DomainError, DomainEvent, PipelineContext, PipelineStage, TranscriptionPort,
    TranscriptionRequest, TranscriptionResult, WordTimestamp,
};

const SERVICE_NAME: &str = "transcription";

#[derive(Debug, Clone)]
pub struct TranscriptionClientConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

/// REST adapter for the external Arabic transcription engine. Any engine
/// returning `{transcription, words: [{word, start, end}]}` fits.
pub struct RestTranscriptionClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl RestTranscriptionClient {
    pub fn new(config: TranscriptionClientConfig) -> Result<Self, DomainError> {
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(|err| {
                DomainError::internal_error(&format!("failed to build http client: {err}"))
            })?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
        })
    }
}

#[async_trait]
impl TranscriptionPort for RestTranscriptionClient {
    async fn transcribe(
        &self,
        request: TranscriptionRequest,
    ) -> Result<TranscriptionResult, DomainError> {
        let part = reqwest::multipart::Part::bytes(request.audio.bytes)
            .file_name("recitation")
            .mime_str(&request.audio.mime_type)
            .map_err(|err| {
                DomainError::internal_error(&format!("invalid audio mime type: {err}"))
            })?;
        let mut form = reqwest::multipart::Form::new()
            .part("audio", part)
            .text("language", "ar")
            .text("expected_text", request.expected_text);
        if let Some(ayah_id) = request.ayah_id {
            form = form.text("ayah_id", ayah_id);
        }

        let mut call = self
            .http
            .post(format!("{}/v1/transcribe", self.base_url))
            .multipart(form);
        if let Some(api_key) = &self.api_key {
            call = call.bearer_auth(api_key);
        }

        let response = call.send().await.map_err(|err| {
            DomainError::external_service_error(SERVICE_NAME, &format!("request failed: {err}"))
        })?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DomainError::external_service_error(
                SERVICE_NAME,
                &format!("HTTP {status}: {}", truncate(&body, 256)),
            ));
        }

        let payload: TranscriptionPayload = response.json().await.map_err(|err| {
            DomainError::external_service_error(SERVICE_NAME, &format!("invalid response: {err}"))
        })?;
        Ok(map_payload(payload))
    }
}

#[derive(Debug, Deserialize)]
struct TranscriptionPayload {
    #[serde(default, alias = "transcript", alias = "text")]
    transcription: Option<String>,
    #[serde(default)]
    words: Vec<WordPayload>,
}

#[derive(Debug, Deserialize)]
struct WordPayload {
    word: String,
    start: f64,
    end: f64,
}

fn map_payload(payload: TranscriptionPayload) -> TranscriptionResult {
    TranscriptionResult {
        // An engine that heard nothing is not an error; scoring degrades
        // through the edit distance instead.
        text: payload.transcription.unwrap_or_default(),
        words: payload
            .words
            .into_iter()
            .map(|word| WordTimestamp {
                word: word.word,
                start: word.start,
                end: word.end,
            })
            .collect(),
    }
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}

pub struct TranscribeStage {
    port: Arc<dyn TranscriptionPort>,
    request_timeout: Duration,
}

impl TranscribeStage {
    pub fn new(port: Arc<dyn TranscriptionPort>, request_timeout: Duration) -> Self {
        Self {
            port,
            request_timeout,
        }
    }
}

#[async_trait]
impl PipelineStage for TranscribeStage {
    fn name(&self) -> &'static str {
        "transcribe"
    }

    async fn execute(&self, context: &mut PipelineContext) -> Result<(), DomainError> {
        let request = TranscriptionRequest {
            session_id: context.session_id.clone(),
            audio: context.audio.clone(),
            expected_text: context.expected_text.clone(),
            ayah_id: context.ayah_id.clone(),
        };

        let rpc = self.port.transcribe(request);
        let transcription = tokio::time::timeout(self.request_timeout, rpc)
            .await
            .map_err(|_| {
                DomainError::external_service_error(SERVICE_NAME, "request timed out")
            })??;

        tracing::debug!(
            session_id = %context.session_id,
            transcript_char_count = transcription.text.chars().count(),
            word_count = transcription.words.len(),
            "transcription received"
        );

        context.set_extension("transcription.word_count", json!(transcription.words.len()));
        context.transcription = Some(transcription.clone());
        context
            .events
            .push(DomainEvent::TranscriptReady { transcription });
        Ok(())
    }
}
