use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::{
    gateway::{Completion, InferenceGateway},
    prompt::split_segments,
};

/// Which path produced a generator's output.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GenerationSource {
    /// Remote model output.
    Remote,
    /// Deterministic templates.
    Template,
}

impl GenerationSource {
    /// Lowercase label for logs.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Remote => "remote",
            Self::Template => "template",
        }
    }
}

/// Pulls the requested count into the accepted input range.
#[must_use]
pub fn clamp_count(requested: usize, range: &RangeInclusive<usize>) -> usize {
    requested.clamp(*range.start(), *range.end())
}

/// Renders items as `### {label} N` sections separated by horizontal rules.
#[must_use]
pub fn numbered_sections(label: &str, items: &[String]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(idx, item)| format!("### {label} {}\n\n{item}", idx + 1))
        .collect::<Vec<_>>()
        .join("\n\n---\n\n")
}

/// Runs the remote path for list-shaped outputs; empty when the gateway is
/// disabled, fails, or returns no usable segments.
pub(crate) fn remote_segments(
    gateway: &InferenceGateway,
    prompt: &str,
    temperature: f32,
    max_tokens: u32,
    limit: usize,
) -> Vec<String> {
    match gateway.complete(prompt, temperature, max_tokens) {
        Completion::Text(raw) => split_segments(&raw, limit),
        Completion::Unavailable | Completion::Failed(_) => Vec::new(),
    }
}
