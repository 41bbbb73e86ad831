use std::{fmt, sync::Arc, time::Duration};

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use shared_logging::LogLevel;
use tokio::runtime::{Builder, Handle, Runtime};

use crate::{config::InferenceSettings, telemetry::StudioTelemetry};

/// Parameters of one text-completion call.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Full prompt text.
    pub prompt: String,
    /// Sampling temperature in `(0, 1]`.
    pub temperature: f32,
    /// Upper bound on generated tokens.
    pub max_tokens: u32,
}

/// Outcome of a gateway call. Callers fall back to templates on anything but
/// [`Completion::Text`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// Trimmed, non-empty model output.
    Text(String),
    /// No credential or backend configured; nothing was sent.
    Unavailable,
    /// The call was attempted and failed.
    Failed(String),
}

impl Completion {
    /// Returns the text on success.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Unavailable | Self::Failed(_) => None,
        }
    }

    /// Short label for logs.
    #[must_use]
    pub const fn outcome(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Unavailable => "unavailable",
            Self::Failed(_) => "failed",
        }
    }
}

/// A remote text-completion service.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Identifier used in logs.
    fn name(&self) -> &str;
    /// Sends one request and returns the raw generated text.
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;
}

/// Soft-failing wrapper around an optional completion backend.
pub struct InferenceGateway {
    engine: Option<Engine>,
    telemetry: StudioTelemetry,
}

struct Engine {
    runtime: Runtime,
    backend: Arc<dyn CompletionBackend>,
}

impl fmt::Debug for InferenceGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InferenceGateway")
            .field(
                "backend",
                &self.engine.as_ref().map(|engine| engine.backend.name()),
            )
            .finish_non_exhaustive()
    }
}

impl InferenceGateway {
    /// Gateway that always reports [`Completion::Unavailable`].
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            engine: None,
            telemetry: StudioTelemetry::disabled(),
        }
    }

    /// Gateway driving `backend` on a private current-thread runtime.
    pub fn with_backend(backend: Arc<dyn CompletionBackend>) -> Result<Self> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .context("building inference runtime")?;
        Ok(Self {
            engine: Some(Engine { runtime, backend }),
            telemetry: StudioTelemetry::disabled(),
        })
    }

    /// Hugging Face gateway when a credential is configured, disabled otherwise.
    pub fn from_settings(settings: &InferenceSettings) -> Result<Self> {
        if !settings.has_credential() {
            return Ok(Self::disabled());
        }
        Self::with_backend(Arc::new(HuggingFaceBackend::new(settings)?))
    }

    /// Attaches telemetry.
    #[must_use]
    pub fn with_telemetry(mut self, telemetry: StudioTelemetry) -> Self {
        self.telemetry = telemetry;
        self
    }

    /// Returns true when a backend is configured.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.engine.is_some()
    }

    /// Runs one completion to the end. Never returns an error: failures
    /// become [`Completion::Failed`].
    pub fn complete(&self, prompt: &str, temperature: f32, max_tokens: u32) -> Completion {
        let Some(engine) = &self.engine else {
            return Completion::Unavailable;
        };
        let completion = if prompt.trim().is_empty() {
            Completion::Failed("empty prompt".into())
        } else if Handle::try_current().is_ok() {
            Completion::Failed("gateway called from inside an async runtime".into())
        } else {
            let request = CompletionRequest {
                prompt: prompt.to_string(),
                temperature: temperature.clamp(0.01, 1.0),
                max_tokens: max_tokens.max(1),
            };
            match engine.runtime.block_on(engine.backend.complete(&request)) {
                Ok(text) if text.trim().is_empty() => Completion::Failed("empty response".into()),
                Ok(text) => Completion::Text(text.trim().to_string()),
                Err(err) => Completion::Failed(format!("{err:#}")),
            }
        };
        match &completion {
            Completion::Failed(reason) => self.telemetry.note(
                LogLevel::Warn,
                "studio.gateway.failed",
                json!({
                    "backend": engine.backend.name(),
                    "outcome": completion.outcome(),
                    "reason": reason,
                }),
            ),
            _ => self.telemetry.note(
                LogLevel::Debug,
                "studio.gateway.completed",
                json!({
                    "backend": engine.backend.name(),
                    "outcome": completion.outcome(),
                    "max_tokens": max_tokens,
                }),
            ),
        }
        completion
    }
}

/// Hugging Face text-generation inference endpoint.
pub struct HuggingFaceBackend {
    client: Client,
    url: String,
    token: String,
    repetition_penalty: f32,
}

impl HuggingFaceBackend {
    /// Builds the HTTP client from settings. Requires a credential.
    pub fn new(settings: &InferenceSettings) -> Result<Self> {
        let token = settings
            .token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| anyhow!("inference credential is not configured"))?
            .to_string();
        let mut builder = Client::builder().user_agent("loomvale-studio/0.1");
        if let Some(timeout_ms) = settings.timeout_ms {
            builder = builder.timeout(Duration::from_millis(timeout_ms));
        }
        Ok(Self {
            client: builder.build()?,
            url: settings.model_url(),
            token,
            repetition_penalty: settings.repetition_penalty,
        })
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    inputs: &'a str,
    parameters: GenerateParameters,
}

#[derive(Debug, Serialize)]
struct GenerateParameters {
    max_new_tokens: u32,
    temperature: f32,
    repetition_penalty: f32,
    return_full_text: bool,
}

#[derive(Debug, Deserialize)]
struct GeneratedText {
    generated_text: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GenerateResponse {
    Batch(Vec<GeneratedText>),
    Single(GeneratedText),
    Error { error: String },
}

fn parse_generation(body: &str) -> Result<String> {
    let response: GenerateResponse =
        serde_json::from_str(body).context("unexpected inference response shape")?;
    match response {
        GenerateResponse::Batch(items) => items
            .into_iter()
            .next()
            .map(|item| item.generated_text)
            .ok_or_else(|| anyhow!("inference response contained no generations")),
        GenerateResponse::Single(item) => Ok(item.generated_text),
        GenerateResponse::Error { error } => bail!("inference endpoint error: {error}"),
    }
}

#[async_trait]
impl CompletionBackend for HuggingFaceBackend {
    fn name(&self) -> &str {
        "huggingface"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let payload = GenerateRequest {
            inputs: &request.prompt,
            parameters: GenerateParameters {
                max_new_tokens: request.max_tokens,
                temperature: request.temperature,
                repetition_penalty: self.repetition_penalty,
                return_full_text: false,
            },
        };
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.token)
            .json(&payload)
            .send()
            .await
            .context("inference request failed")?
            .error_for_status()
            .context("inference endpoint returned an error status")?;
        let body = response
            .text()
            .await
            .context("reading inference response")?;
        parse_generation(&body)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use parking_lot::Mutex;

    /// Backend returning canned output and recording requests.
    pub(crate) struct ScriptedBackend {
        reply: Result<String, String>,
        pub(crate) requests: Mutex<Vec<CompletionRequest>>,
    }

    impl ScriptedBackend {
        pub(crate) fn replying(text: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(text.to_string()),
                requests: Mutex::new(Vec::new()),
            })
        }

        pub(crate) fn failing(reason: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Err(reason.to_string()),
                requests: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl CompletionBackend for ScriptedBackend {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn complete(&self, request: &CompletionRequest) -> Result<String> {
            self.requests.lock().push(request.clone());
            self.reply.clone().map_err(|reason| anyhow!(reason))
        }
    }

    #[test]
    fn disabled_gateway_is_unavailable() {
        let gateway = InferenceGateway::disabled();
        assert!(!gateway.is_enabled());
        assert_eq!(gateway.complete("prompt", 0.7, 512), Completion::Unavailable);
    }

    #[test]
    fn missing_credential_disables_gateway() {
        let gateway = InferenceGateway::from_settings(&InferenceSettings::default()).unwrap();
        assert!(!gateway.is_enabled());
    }

    #[test]
    fn successful_completion_is_trimmed() {
        let backend = ScriptedBackend::replying("  five hooks \n");
        let gateway = InferenceGateway::with_backend(backend.clone()).unwrap();
        let completion = gateway.complete("prompt", 0.65, 700);
        assert_eq!(completion.text(), Some("five hooks"));
        assert_eq!(completion.outcome(), "text");
        let requests = backend.requests.lock();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].max_tokens, 700);
    }

    #[test]
    fn backend_errors_become_failed() {
        let gateway =
            InferenceGateway::with_backend(ScriptedBackend::failing("401 unauthorized")).unwrap();
        match gateway.complete("prompt", 0.7, 512) {
            Completion::Failed(reason) => assert!(reason.contains("401")),
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[test]
    fn blank_output_and_prompt_are_failures() {
        let backend = ScriptedBackend::replying("   ");
        let gateway = InferenceGateway::with_backend(backend.clone()).unwrap();
        assert_eq!(
            gateway.complete("prompt", 0.7, 512),
            Completion::Failed("empty response".into())
        );
        assert_eq!(
            gateway.complete("  ", 0.7, 512),
            Completion::Failed("empty prompt".into())
        );
        assert_eq!(backend.requests.lock().len(), 1);
    }

    #[test]
    fn out_of_range_parameters_are_clamped() {
        let backend = ScriptedBackend::replying("ok");
        let gateway = InferenceGateway::with_backend(backend.clone()).unwrap();
        gateway.complete("prompt", 3.0, 0);
        let request = backend.requests.lock()[0].clone();
        assert!((request.temperature - 1.0).abs() < f32::EPSILON);
        assert_eq!(request.max_tokens, 1);
    }

    #[test]
    fn parses_known_response_shapes() {
        assert_eq!(
            parse_generation(r#"[{"generated_text":"a"}]"#).unwrap(),
            "a"
        );
        assert_eq!(parse_generation(r#"{"generated_text":"b"}"#).unwrap(), "b");
        let err = parse_generation(r#"{"error":"Model is loading"}"#).unwrap_err();
        assert!(err.to_string().contains("Model is loading"));
        assert!(parse_generation("[]").is_err());
        assert!(parse_generation("not json").is_err());
    }

    #[test]
    fn request_payload_matches_endpoint_schema() {
        let payload = GenerateRequest {
            inputs: "hello",
            parameters: GenerateParameters {
                max_new_tokens: 512,
                temperature: 0.7,
                repetition_penalty: 1.1,
                return_full_text: false,
            },
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["inputs"], "hello");
        assert_eq!(value["parameters"]["max_new_tokens"], 512);
        assert_eq!(value["parameters"]["return_full_text"], false);
    }
}
