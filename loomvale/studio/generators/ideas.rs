//! Idea Expander: campaign ideas for one platform, persona and mood set.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::{
    error::StudioError,
    gateway::InferenceGateway,
    knowledge::{moods_display, persona, Mood, Platform},
    layout::{clamp_count, numbered_sections, remote_segments, GenerationSource},
    pro::ProState,
    prompt::compose,
};

/// Ideas returned on the free tier at most.
pub const FREE_IDEA_CAP: usize = 4;
/// Accepted range for the requested idea count.
pub const IDEA_COUNT_RANGE: RangeInclusive<usize> = 3..=12;

const IDEA_TEMPERATURE: f32 = 0.7;
const IDEA_MAX_TOKENS: u32 = 512;
const SOCIAL_PROOF: &str = "Use a quick stat or testimonial to anchor trust.";

/// Parameters for one idea expansion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdeaRequest {
    /// Brand, product or story seed.
    pub seed: String,
    /// Target platform.
    pub platform: Platform,
    /// Persona display name.
    pub persona: String,
    /// Selected moods; empty means the default mood.
    pub moods: Vec<Mood>,
    /// Requested number of ideas.
    pub count: usize,
    /// Try the remote model before templates.
    pub use_remote: bool,
}

impl IdeaRequest {
    /// Request with the default count of 6 and remote generation enabled.
    #[must_use]
    pub fn new(seed: impl Into<String>, platform: Platform, persona: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            platform,
            persona: persona.into(),
            moods: Vec::new(),
            count: 6,
            use_remote: true,
        }
    }

    /// Sets the moods.
    #[must_use]
    pub fn with_moods(mut self, moods: impl IntoIterator<Item = Mood>) -> Self {
        self.moods = moods.into_iter().collect();
        self
    }

    /// Sets the requested count.
    #[must_use]
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    /// Sets whether the remote model is tried.
    #[must_use]
    pub fn with_remote(mut self, use_remote: bool) -> Self {
        self.use_remote = use_remote;
        self
    }
}

/// One exported idea.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IdeaRow {
    /// Platform label.
    pub platform: String,
    /// Persona name.
    pub persona: String,
    /// Comma-joined moods.
    pub moods: String,
    /// Idea body.
    pub idea: String,
}

/// Output of an idea expansion.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct IdeaBatch {
    /// Markdown rendering, one `### Idea N` section per row.
    pub markdown: String,
    /// Row-structured ideas.
    pub rows: Vec<IdeaRow>,
    /// Path that produced the ideas.
    pub source: GenerationSource,
}

/// Number of ideas a request yields on the given tier.
#[must_use]
pub fn effective_idea_count(requested: usize, pro: ProState) -> usize {
    pro.cap(clamp_count(requested, &IDEA_COUNT_RANGE), FREE_IDEA_CAP)
}

/// Expands the seed into ideas, trying the gateway first when requested.
pub fn expand_ideas(
    gateway: &InferenceGateway,
    request: &IdeaRequest,
    pro: ProState,
) -> Result<IdeaBatch, StudioError> {
    let seed = request.seed.trim();
    if seed.is_empty() {
        return Err(StudioError::MissingSeed);
    }
    let total = effective_idea_count(request.count, pro);

    let mut source = GenerationSource::Remote;
    let mut ideas = if request.use_remote {
        remote_segments(
            gateway,
            &idea_prompt(seed, request, total),
            IDEA_TEMPERATURE,
            IDEA_MAX_TOKENS,
            total,
        )
    } else {
        Vec::new()
    };
    if ideas.is_empty() {
        source = GenerationSource::Template;
        ideas = fallback_ideas(seed, request.platform, &request.moods, &request.persona, total);
    }

    let moods = moods_display(&request.moods);
    let rows: Vec<IdeaRow> = ideas
        .into_iter()
        .map(|idea| IdeaRow {
            platform: request.platform.label().to_string(),
            persona: request.persona.clone(),
            moods: moods.clone(),
            idea,
        })
        .collect();
    let bodies: Vec<String> = rows.iter().map(|row| row.idea.clone()).collect();

    Ok(IdeaBatch {
        markdown: numbered_sections("Idea", &bodies),
        rows,
        source,
    })
}

fn idea_prompt(seed: &str, request: &IdeaRequest, total: usize) -> String {
    let system = "You are a senior social strategist creating multi-platform content blueprints. \
                  Respond in markdown bullet points, weaving in persona-specific insights.";
    let user = format!(
        "Seed: {seed}. Platform: {platform}. Desired moods: {moods}. Persona: {persona}. \
         Return {total} distinct ideas. Each idea should include:\n\
         - Hook angle\n- Story beats\n- Visual or format cue\n- CTA phrased for the persona\n\
         Separate each idea with a line containing exactly '---'. Keep language punchy and practical.",
        platform = request.platform.label(),
        moods = moods_display(&request.moods),
        persona = request.persona,
    );
    compose(system, &user)
}

/// Deterministic template ideas; moods rotate round-robin.
#[must_use]
pub fn fallback_ideas(
    seed: &str,
    platform: Platform,
    moods: &[Mood],
    persona_name: &str,
    total: usize,
) -> Vec<String> {
    let keywords = persona(persona_name)
        .map(|p| p.keyword_phrase(2))
        .filter(|phrase| !phrase.is_empty())
        .unwrap_or_else(|| "their daily rhythm".to_string());
    let audience = persona_name.to_lowercase();
    let hint = platform
        .deliverable_hint()
        .trim_end_matches('.')
        .to_lowercase();
    let active: &[Mood] = if moods.is_empty() {
        &[Mood::DEFAULT]
    } else {
        moods
    };

    (0..total)
        .map(|idx| {
            let mood = active[idx % active.len()];
            format!(
                "**{} take: {seed} for {audience}** — Lead with a one-line story, ladder into a \
                 transformation, and nod to {audience} priorities. Frame it around {keywords}; \
                 finish with {hint}. {SOCIAL_PROOF}",
                mood.title(),
            )
        })
        .collect()
}
