#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

//! Loomvale studio: social content ideas, captions and launch kits, generated
//! by a hosted model when available and by deterministic templates otherwise.

/// Platform, mood, tone and persona catalogs.
#[path = "../knowledge.rs"]
pub mod knowledge;

/// Configuration loading.
#[path = "../config.rs"]
pub mod config;

/// Telemetry helpers.
#[path = "../telemetry.rs"]
pub mod telemetry;

/// Error types.
#[path = "../error.rs"]
pub mod error;

/// Remote inference gateway.
#[path = "../gateway.rs"]
pub mod gateway;

/// Prompt composition and response splitting.
#[path = "../prompt.rs"]
pub mod prompt;

/// Pro unlock gate.
#[path = "../pro.rs"]
pub mod pro;

/// CSV/JSON export.
#[path = "../export.rs"]
pub mod export;

/// Shared generator helpers.
#[path = "../generators/layout.rs"]
pub mod layout;

/// Idea expander.
#[path = "../generators/ideas.rs"]
pub mod ideas;

/// Caption studio.
#[path = "../generators/captions.rs"]
pub mod captions;

/// Content kit builder.
#[path = "../generators/kit.rs"]
pub mod kit;

/// Persona deep dive.
#[path = "../generators/persona_intel.rs"]
pub mod persona_intel;

/// Runtime entry point.
#[path = "../runtime.rs"]
pub mod runtime;

pub use captions::{CaptionBatch, CaptionRequest};
pub use config::StudioConfig;
pub use error::StudioError;
pub use export::{ExportPaths, IdeaExporter};
pub use gateway::{Completion, CompletionBackend, HuggingFaceBackend, InferenceGateway};
pub use ideas::{IdeaBatch, IdeaRequest, IdeaRow};
pub use kit::{ContentKit, KitRequest};
pub use knowledge::{Mood, Persona, Platform, Tone};
pub use layout::GenerationSource;
pub use pro::{ProGate, ProState, UnlockOutcome};
pub use runtime::{IdeaExpansion, Studio};
pub use telemetry::{StudioTelemetry, StudioTelemetryBuilder};
