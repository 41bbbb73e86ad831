//! Caption Studio: platform captions from a hook, an article, or both.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::{
    error::StudioError,
    gateway::InferenceGateway,
    knowledge::{persona, Platform, Tone},
    layout::{clamp_count, numbered_sections, remote_segments, GenerationSource},
    pro::ProState,
    prompt::{compose, excerpt},
};

/// Captions returned on the free tier at most.
pub const FREE_CAPTION_CAP: usize = 3;
/// Accepted range for the requested caption count.
pub const CAPTION_COUNT_RANGE: RangeInclusive<usize> = 2..=10;

const CAPTION_TEMPERATURE: f32 = 0.65;
const CAPTION_MAX_TOKENS: u32 = 700;
const ARTICLE_PROMPT_CHARS: usize = 1200;
const ARTICLE_HEADLINE_CHARS: usize = 60;

/// Parameters for one caption run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptionRequest {
    /// Hook or offer; may be empty when an article is given.
    pub seed: String,
    /// Article, research or notes; may be empty when a seed is given.
    pub article: String,
    /// Persona display name.
    pub persona: String,
    /// Voice.
    pub tone: Tone,
    /// Target platform.
    pub platform: Platform,
    /// Requested number of captions.
    pub count: usize,
    /// Try the remote model before templates.
    pub use_remote: bool,
}

impl CaptionRequest {
    /// Request with the default tone, 4 captions and remote generation on.
    #[must_use]
    pub fn new(seed: impl Into<String>, platform: Platform, persona: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            article: String::new(),
            persona: persona.into(),
            tone: Tone::default(),
            platform,
            count: 4,
            use_remote: true,
        }
    }

    /// Sets the source article.
    #[must_use]
    pub fn with_article(mut self, article: impl Into<String>) -> Self {
        self.article = article.into();
        self
    }

    /// Sets the tone.
    #[must_use]
    pub fn with_tone(mut self, tone: Tone) -> Self {
        self.tone = tone;
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

/// Output of a caption run.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CaptionBatch {
    /// Markdown rendering, one `### Caption N` section each.
    pub markdown: String,
    /// Caption bodies.
    pub captions: Vec<String>,
    /// Path that produced the captions.
    pub source: GenerationSource,
}

/// Number of captions a request yields on the given tier.
#[must_use]
pub fn effective_caption_count(requested: usize, pro: ProState) -> usize {
    pro.cap(clamp_count(requested, &CAPTION_COUNT_RANGE), FREE_CAPTION_CAP)
}

/// Writes captions, trying the gateway first when requested.
pub fn write_captions(
    gateway: &InferenceGateway,
    request: &CaptionRequest,
    pro: ProState,
) -> Result<CaptionBatch, StudioError> {
    let seed = request.seed.trim();
    let article = request.article.trim();
    if seed.is_empty() && article.is_empty() {
        return Err(StudioError::MissingCaptionSource);
    }
    let total = effective_caption_count(request.count, pro);

    let mut source = GenerationSource::Remote;
    let mut captions = if request.use_remote {
        remote_segments(
            gateway,
            &caption_prompt(seed, article, request, total),
            CAPTION_TEMPERATURE,
            CAPTION_MAX_TOKENS,
            total,
        )
    } else {
        Vec::new()
    };
    if captions.is_empty() {
        source = GenerationSource::Template;
        captions = fallback_captions(seed, article, &request.persona, request.tone, total);
    }

    Ok(CaptionBatch {
        markdown: numbered_sections("Caption", &captions),
        captions,
        source,
    })
}

fn caption_prompt(seed: &str, article: &str, request: &CaptionRequest, total: usize) -> String {
    let system = "You craft persuasive social captions that feel native to each platform and persona. \
                  Return numbered captions with hook, payoff, CTA, and hashtags when relevant.";
    let user = format!(
        "Persona: {persona}. Tone: {tone}. Platform: {platform}. Number of captions: {total}. \
         Seed idea: {seed_line}. Source text: {source_text}\n\
         Each caption should contain:\n\
         1. Thumb-stopping hook tailored to the persona\n\
         2. 1-2 sentence story or insight pulled from the source\n\
         3. CTA geared for conversion\n\
         4. Optional hashtag line (3-6 hashtags) optimized for the platform\n\
         Separate each caption with a line containing exactly '---'.",
        persona = request.persona,
        tone = request.tone.label(),
        platform = request.platform.label(),
        seed_line = if seed.is_empty() { "N/A" } else { seed },
        source_text = excerpt(article, ARTICLE_PROMPT_CHARS),
    );
    compose(system, &user)
}

/// Deterministic template captions.
#[must_use]
pub fn fallback_captions(
    seed: &str,
    article: &str,
    persona_name: &str,
    tone: Tone,
    total: usize,
) -> Vec<String> {
    let headline = if !seed.is_empty() {
        seed.to_string()
    } else if !article.is_empty() {
        format!("{}...", excerpt(article, ARTICLE_HEADLINE_CHARS))
    } else {
        "Your story".to_string()
    };
    let audience = persona_name.to_lowercase();
    let keywords = persona(persona_name)
        .map(|p| p.keyword_phrase(2))
        .filter(|phrase| !phrase.is_empty())
        .unwrap_or_else(|| "their daily life".to_string());
    let tone_hint = tone.label().to_lowercase();

    let caption = format!(
        "{headline}: {audience} deserve better.\n\n\
         Pull one proof point or micro-lesson from the article. Translate it into {audience} \
         language, sprinkling phrases like {keywords} to ground it.\n\n\
         CTA → Close with a save/share CTA that promises an immediate win. (Tone: {tone_hint})."
    );
    vec![caption; total]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::tests::ScriptedBackend;

    #[test]
    fn requires_seed_or_article() {
        let gateway = InferenceGateway::disabled();
        let request = CaptionRequest::new("  ", Platform::TikTok, "Busy Parents").with_article("\n");
        let err = write_captions(&gateway, &request, ProState::FREE).unwrap_err();
        assert!(err.is_user_input());
        assert_eq!(
            err.to_string(),
            "Paste a seed, article, or notes to generate captions."
        );
    }

    #[test]
    fn free_tier_caps_and_pro_keeps_requested_count() {
        for requested in CAPTION_COUNT_RANGE {
            assert!(effective_caption_count(requested, ProState::FREE) <= FREE_CAPTION_CAP);
            assert_eq!(effective_caption_count(requested, ProState::PRO), requested);
        }
    }

    #[test]
    fn fallback_uses_seed_persona_keywords_and_tone() {
        let captions = fallback_captions(
            "New glow serum",
            "",
            "Wellness Consumers",
            Tone::HypeFriend,
            2,
        );
        assert_eq!(captions.len(), 2);
        assert!(captions[0].starts_with("New glow serum: wellness consumers deserve better."));
        assert!(captions[0].contains("sprinkling phrases like grounding, slow rituals"));
        assert!(captions[0].ends_with("(Tone: hype friend)."));
    }

    #[test]
    fn fallback_headline_comes_from_article_excerpt() {
        let article = "a".repeat(90);
        let captions = fallback_captions("", &article, "Premium Shoppers", Tone::default(), 1);
        let expected = format!("{}...: premium shoppers deserve better.", "a".repeat(60));
        assert!(captions[0].starts_with(&expected));
        let generic = fallback_captions("", "", "Nobody", Tone::default(), 1);
        assert!(generic[0].starts_with("Your story: nobody deserve better."));
        assert!(generic[0].contains("their daily life"));
    }

    #[test]
    fn disabled_gateway_renders_numbered_template_captions() {
        let gateway = InferenceGateway::disabled();
        let request = CaptionRequest::new("Launch", Platform::Newsletter, "Busy Parents").with_count(10);
        let batch = write_captions(&gateway, &request, ProState::FREE).unwrap();
        assert_eq!(batch.source, GenerationSource::Template);
        assert_eq!(batch.captions.len(), 3);
        assert!(batch.markdown.contains("### Caption 3"));
        assert!(!batch.markdown.contains("### Caption 4"));
        assert_eq!(
            batch.captions,
            fallback_captions("Launch", "", "Busy Parents", Tone::WarmStoryteller, 3)
        );
    }

    #[test]
    fn remote_prompt_embeds_truncated_article() {
        let backend = ScriptedBackend::replying("1. Hook\n---\n2. Hook");
        let gateway = InferenceGateway::with_backend(backend.clone()).unwrap();
        let article = format!("{}TAIL", "x".repeat(1200));
        let request = CaptionRequest::new("", Platform::LinkedIn, "Premium Shoppers")
            .with_article(article)
            .with_count(6);
        let batch = write_captions(&gateway, &request, ProState::PRO).unwrap();
        assert_eq!(batch.source, GenerationSource::Remote);
        assert_eq!(batch.captions, vec!["1. Hook".to_string(), "2. Hook".to_string()]);
        let prompt = backend.requests.lock()[0].prompt.clone();
        assert!(prompt.contains("Seed idea: N/A."));
        assert!(prompt.contains("Number of captions: 6."));
        assert!(!prompt.contains("TAIL"));
        let request = backend.requests.lock()[0].clone();
        assert!((request.temperature - 0.65).abs() < f32::EPSILON);
        assert_eq!(request.max_tokens, 700);
    }
}
