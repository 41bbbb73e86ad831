//! High-level entry point wiring the gateway, generators and exporter.

use anyhow::Result;
use serde::Serialize;
use serde_json::json;
use shared_logging::LogLevel;
use uuid::Uuid;

use crate::{
    captions::{write_captions, CaptionBatch, CaptionRequest},
    config::StudioConfig,
    error::StudioError,
    export::{ExportPaths, IdeaExporter},
    gateway::InferenceGateway,
    ideas::{expand_ideas, IdeaBatch, IdeaRequest},
    kit::{build_content_kit, ContentKit, KitRequest},
    persona_intel::persona_deep_dive,
    pro::{ProGate, ProState, UnlockOutcome},
    telemetry::StudioTelemetry,
};

/// Ideas together with the files they were exported to.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct IdeaExpansion {
    /// Generated ideas.
    #[serde(flatten)]
    pub batch: IdeaBatch,
    /// Export files.
    pub export: ExportPaths,
}

/// Runtime owning the engines used by every studio task.
#[derive(Debug)]
pub struct Studio {
    gateway: InferenceGateway,
    exporter: IdeaExporter,
    gate: ProGate,
    telemetry: StudioTelemetry,
}

impl Studio {
    /// Creates a runtime from explicit parts.
    #[must_use]
    pub fn new(gateway: InferenceGateway, exporter: IdeaExporter, gate: ProGate) -> Self {
        Self {
            gateway,
            exporter,
            gate,
            telemetry: StudioTelemetry::disabled(),
        }
    }

    /// Builds every component from configuration.
    pub fn from_config(config: &StudioConfig) -> Result<Self> {
        let telemetry = StudioTelemetry::from_settings("studio", &config.logging)?;
        let gateway =
            InferenceGateway::from_settings(&config.inference)?.with_telemetry(telemetry.clone());
        let exporter = IdeaExporter::new(&config.export.dir).with_telemetry(telemetry.clone());
        let studio = Self::new(gateway, exporter, ProGate::new(&config.pro.unlock_code))
            .with_telemetry(telemetry);
        studio.telemetry.note(
            LogLevel::Debug,
            "studio.runtime.ready",
            json!({
                "remote_enabled": studio.gateway.is_enabled(),
                "model": config.inference.model,
                "export_dir": studio.exporter.dir(),
            }),
        );
        Ok(studio)
    }

    /// Attaches telemetry for runtime-level records.
    #[must_use]
    pub fn with_telemetry(mut self, telemetry: StudioTelemetry) -> Self {
        self.telemetry = telemetry;
        self
    }

    /// Returns true when remote generation is configured.
    #[must_use]
    pub fn remote_enabled(&self) -> bool {
        self.gateway.is_enabled()
    }

    /// Checks an unlock code.
    #[must_use]
    pub fn unlock(&self, code: &str) -> UnlockOutcome {
        let outcome = self.gate.unlock(code);
        self.telemetry.note(
            LogLevel::Info,
            "studio.pro.unlock",
            json!({ "unlocked": outcome.is_pro() }),
        );
        outcome
    }

    /// Generates ideas and exports them as CSV and JSON.
    pub fn expand_ideas(
        &self,
        request: &IdeaRequest,
        pro: ProState,
    ) -> Result<IdeaExpansion, StudioError> {
        let run = Uuid::new_v4();
        let batch = self.finish(
            run,
            "ideas",
            expand_ideas(&self.gateway, request, pro),
            |batch: &IdeaBatch| (batch.source.label(), batch.rows.len()),
        )?;
        let export = self.exporter.export(&batch.rows)?;
        Ok(IdeaExpansion { batch, export })
    }

    /// Generates captions.
    pub fn write_captions(
        &self,
        request: &CaptionRequest,
        pro: ProState,
    ) -> Result<CaptionBatch, StudioError> {
        self.finish(
            Uuid::new_v4(),
            "captions",
            write_captions(&self.gateway, request, pro),
            |batch: &CaptionBatch| (batch.source.label(), batch.captions.len()),
        )
    }

    /// Builds a content kit.
    pub fn build_content_kit(
        &self,
        request: &KitRequest,
        pro: ProState,
    ) -> Result<ContentKit, StudioError> {
        self.finish(
            Uuid::new_v4(),
            "kit",
            build_content_kit(&self.gateway, request, pro),
            |kit: &ContentKit| (kit.source.label(), 1),
        )
    }

    /// Renders the persona report.
    #[must_use]
    pub fn persona_deep_dive(&self, name: &str) -> String {
        persona_deep_dive(name)
    }

    fn finish<T>(
        &self,
        run: Uuid,
        task: &str,
        result: Result<T, StudioError>,
        summary: impl Fn(&T) -> (&'static str, usize),
    ) -> Result<T, StudioError> {
        match &result {
            Ok(output) => {
                let (source, items) = summary(output);
                self.telemetry.note(
                    LogLevel::Info,
                    &format!("studio.{task}.completed"),
                    json!({ "run": run.to_string(), "source": source, "items": items }),
                );
            }
            Err(err) => self.telemetry.note(
                if err.is_user_input() {
                    LogLevel::Debug
                } else {
                    LogLevel::Error
                },
                &format!("studio.{task}.rejected"),
                json!({ "run": run.to_string(), "error": err.to_string() }),
            ),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        gateway::tests::ScriptedBackend,
        knowledge::{Mood, Platform},
        layout::GenerationSource,
    };
    use tempfile::tempdir;

    fn studio(dir: &std::path::Path) -> Studio {
        Studio::new(
            InferenceGateway::disabled(),
            IdeaExporter::new(dir),
            ProGate::new("loomvale-pro"),
        )
    }

    #[test]
    fn idea_expansion_exports_rows() {
        let dir = tempdir().unwrap();
        let studio = studio(dir.path());
        let request = IdeaRequest::new("Cacao", Platform::PinterestPin, "Busy Parents")
            .with_moods([Mood::Dreamy])
            .with_count(3);
        let expansion = studio.expand_ideas(&request, ProState::PRO).unwrap();
        assert_eq!(expansion.batch.rows.len(), 3);
        let csv = std::fs::read_to_string(&expansion.export.csv).unwrap();
        assert_eq!(csv.lines().count(), 4);
        assert!(expansion.export.json.exists());
    }

    #[test]
    fn rejected_requests_write_nothing() {
        let dir = tempdir().unwrap();
        let studio = studio(&dir.path().join("exports"));
        let request = IdeaRequest::new("", Platform::TikTok, "Busy Parents");
        assert!(studio.expand_ideas(&request, ProState::FREE).is_err());
        assert!(!dir.path().join("exports").exists());
    }

    #[test]
    fn unlock_flows_into_generation_caps() {
        let dir = tempdir().unwrap();
        let studio = studio(dir.path());
        let pro = studio.unlock(" LOOMVALE-PRO ").state;
        let free = studio.unlock("nope").state;
        let request = CaptionRequest::new("Glow serum", Platform::TikTok, "Gen Z Creators").with_count(8);
        assert_eq!(studio.write_captions(&request, pro).unwrap().captions.len(), 8);
        assert_eq!(studio.write_captions(&request, free).unwrap().captions.len(), 3);
    }

    #[test]
    fn remote_backend_is_used_when_configured() {
        let dir = tempdir().unwrap();
        let gateway = InferenceGateway::with_backend(ScriptedBackend::replying("Kit body")).unwrap();
        let studio = Studio::new(gateway, IdeaExporter::new(dir.path()), ProGate::new("x"));
        assert!(studio.remote_enabled());
        let kit = studio
            .build_content_kit(&KitRequest::new("Pop-up", Platform::TikTok, "Gen Z Creators"), ProState::FREE)
            .unwrap();
        assert_eq!(kit.source, GenerationSource::Remote);
        assert_eq!(kit.markdown, "Kit body");
    }

    #[test]
    fn from_config_without_token_runs_templates_and_logs() {
        let dir = tempdir().unwrap();
        let mut config = StudioConfig::default();
        config.export.dir = dir.path().join("exports");
        config.logging.path = Some(dir.path().join("studio.jsonl"));
        config.logging.level = "debug".into();
        let studio = Studio::from_config(&config).unwrap();
        assert!(!studio.remote_enabled());
        let request = IdeaRequest::new("Cacao", Platform::LinkedIn, "Premium Shoppers");
        let expansion = studio.expand_ideas(&request, ProState::FREE).unwrap();
        assert_eq!(expansion.batch.source, GenerationSource::Template);
        let log = std::fs::read_to_string(dir.path().join("studio.jsonl")).unwrap();
        assert!(log.contains("studio.ideas.completed"));
        assert!(log.contains("studio.export.written"));
    }
}
