use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Error};

use recitation_application::{
    PipelineDefinition, PipelineEngine, PipelineStepLoader, PipelineStepSpec,
    ScoreRecitationUseCase, ScoreRecitationUseCaseImpl,
};
use recitation_configuration::{
    AppConfig, PipelineDefinitionConfig, TranscriptionEndpointConfig,
};
use recitation_domain::{DomainError, PipelineStage};
use recitation_http_server::{create_app_routes, AppState};
use recitation_infra_analysis::AnalysisStage;
use recitation_infra_transcription::{
    RestTranscriptionClient, TranscribeStage, TranscriptionClientConfig,
};

pub async fn build_and_run(config: AppConfig) -> Result<(), Error> {
    let app = Application::new(config)?;
    app.run().await
}

pub struct Application {
    pub config: AppConfig,
    pub state: AppState,
}

impl Application {
    pub fn new(config: AppConfig) -> Result<Self, Error> {
        let selected = config.service.pipeline.selected.clone();
        let definition = config
            .service
            .pipeline
            .definitions
            .get(&selected)
            .ok_or_else(|| anyhow!("missing pipeline definition `{selected}`"))?;
        let pipeline_definition = build_pipeline_definition(definition);

        let transcription = &config.service.transcription;
        if transcription.base_url.trim().is_empty() {
            return Err(anyhow!("`service.transcription.base_url` cannot be empty"));
        }
        let client = RestTranscriptionClient::new(client_config(transcription))
            .map_err(|err| anyhow!("failed to build transcription client: {err}"))?;

        let transcribe_stage: Arc<dyn PipelineStage> = Arc::new(TranscribeStage::new(
            Arc::new(client),
            request_timeout(transcription),
        ));
        let analysis_stage: Arc<dyn PipelineStage> = Arc::new(AnalysisStage::new());
        let loader = BuiltinStepLoader {
            transcribe: transcribe_stage,
            analysis: analysis_stage,
        };
        let pipeline = PipelineEngine::from_definition(&pipeline_definition, &loader)?;

        let usecase: Arc<dyn ScoreRecitationUseCase> =
            Arc::new(ScoreRecitationUseCaseImpl::new(pipeline));
        let state = AppState::new(usecase, config.service.max_audio_bytes);

        Ok(Self { config, state })
    }

    pub async fn run(self) -> Result<(), Error> {
        create_app_routes(self.state, &self.config.server)
            .await
            .map_err(|err| anyhow!("recitation http server failed: {err}"))
    }
}

struct BuiltinStepLoader {
    transcribe: Arc<dyn PipelineStage>,
    analysis: Arc<dyn PipelineStage>,
}

impl PipelineStepLoader for BuiltinStepLoader {
    fn load_step(&self, step: &PipelineStepSpec) -> Result<Arc<dyn PipelineStage>, DomainError> {
        match step.name.as_str() {
            "transcribe" => Ok(self.transcribe.clone()),
            "recitation_analysis" => Ok(self.analysis.clone()),
            _ => Err(DomainError::internal_error(&format!(
                "unknown pipeline step `{}`",
                step.name
            ))),
        }
    }
}

fn build_pipeline_definition(definition: &PipelineDefinitionConfig) -> PipelineDefinition {
    PipelineDefinition {
        pre: definition
            .pre
            .iter()
            .map(|step| PipelineStepSpec::new(step.name()))
            .collect(),
        transcription: PipelineStepSpec::new(definition.transcription.name()),
        post: definition
            .post
            .iter()
            .map(|step| PipelineStepSpec::new(step.name()))
            .collect(),
    }
}

fn client_config(config: &TranscriptionEndpointConfig) -> TranscriptionClientConfig {
    TranscriptionClientConfig {
        base_url: config.base_url.clone(),
        api_key: config.api_key.clone(),
        connect_timeout: Duration::from_millis(config.connect_timeout_ms.max(1)),
        request_timeout: request_timeout(config),
    }
}

fn request_timeout(config: &TranscriptionEndpointConfig) -> Duration {
    Duration::from_millis(config.request_timeout_ms.max(1))
}

#[cfg(test)]
mod tests {
    use axum::{routing::post, Json, Router};
    use recitation_application::ScoreRecitationRequest;
    use recitation_configuration::PipelineStepRef;
    use serde_json::{json, Value};

    use super::*;

    #[test]
    fn pipeline_definition_preserves_step_order() {
        let definition = PipelineDefinitionConfig {
            pre: Vec::new(),
            transcription: PipelineStepRef::Name("transcribe".to_string()),
            post: vec![PipelineStepRef::WithName {
                name: "recitation_analysis".to_string(),
            }],
        };
        let built = build_pipeline_definition(&definition);
        let ordered = built.ordered_steps();
        assert_eq!(ordered[0].name, "transcribe");
        assert_eq!(ordered[1].name, "recitation_analysis");
    }

    #[test]
    fn loader_maps_builtin_step_names() {
        let config = AppConfig::default();
        let app = Application::new(config).expect("app should initialize");
        // Wiring succeeded means both builtin steps resolved.
        assert_eq!(app.state.max_audio_bytes, 10 * 1024 * 1024);
    }

    #[test]
    fn unknown_pipeline_selection_fails_fast() {
        let mut config = AppConfig::default();
        config.service.pipeline.selected = "missing".to_string();
        assert!(Application::new(config).is_err());
    }

    #[test]
    fn empty_transcription_base_url_fails_fast() {
        let mut config = AppConfig::default();
        config.service.transcription.base_url = " ".to_string();
        assert!(Application::new(config).is_err());
    }

    async fn fake_transcribe() -> Json<Value> {
        Json(json!({
            "transcription": "بسم الله",
            "words": [
                {"word": "بسم", "start": 0.0, "end": 0.5},
                {"word": "الله", "start": 0.8, "end": 1.4}
            ]
        }))
    }

    #[tokio::test]
    async fn scoring_flow_reaches_the_remote_engine() {
        let router = Router::new().route("/v1/transcribe", post(fake_transcribe));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let address = listener.local_addr().expect("extract local address");
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("engine runs");
        });

        let mut config = AppConfig::default();
        config.service.transcription.base_url = format!("http://{address}");

        let app = Application::new(config).expect("app should initialize");
        let response = app
            .state
            .usecase
            .score(ScoreRecitationRequest {
                audio: vec![0x52, 0x49, 0x46, 0x46],
                mime_type: Some("audio/wav".to_string()),
                expected_text: "بِسْمِ اللَّهِ".to_string(),
                ayah_id: Some("1:1".to_string()),
                session_id: Some("integration-session".to_string()),
                duration_seconds: None,
            })
            .await
            .expect("scoring pipeline should succeed");

        assert_eq!(response.session_id, "integration-session");
        assert_eq!(response.transcription, "بسم الله");
        assert_eq!(response.feedback.accuracy, 100);
        assert!(response.feedback.errors.is_empty());
        assert_eq!(response.hasanat.letter_count, 7);
        assert_eq!(response.words.len(), 2);
    }

    #[tokio::test]
    async fn unreachable_engine_surfaces_a_domain_error() {
        let mut config = AppConfig::default();
        // Nothing listens here; the port is reserved but never served.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let address = listener.local_addr().expect("extract local address");
        drop(listener);
        config.service.transcription.base_url = format!("http://{address}");
        config.service.transcription.request_timeout_ms = 2_000;

        let app = Application::new(config).expect("app should initialize");
        let error = app
            .state
            .usecase
            .score(ScoreRecitationRequest {
                audio: vec![0x52],
                mime_type: None,
                expected_text: "بسم الله".to_string(),
                ayah_id: None,
                session_id: None,
                duration_seconds: None,
            })
            .await
            .expect_err("engine is unreachable");

        assert!(error.to_string().contains("transcription"));
    }
}
