//! Content Kit: hooks, visuals, CTAs, hashtags and a nurture flow for a launch.

use serde::{Deserialize, Serialize};

use crate::{
    error::StudioError,
    gateway::{Completion, InferenceGateway},
    knowledge::{persona, slug, Platform},
    layout::GenerationSource,
    pro::ProState,
    prompt::compose,
};

const KIT_TEMPERATURE: f32 = 0.6;
const KIT_MAX_TOKENS_PRO: u32 = 750;
const KIT_MAX_TOKENS_FREE: u32 = 500;
const FREE_HASHTAGS: usize = 5;
const PRO_HASHTAGS: usize = 8;

const CTA_SWAPS: [&str; 3] = [
    "Send me a DM with 'READY' and I'll forward the checklist.",
    "Tap shop now and claim your first-order upgrade.",
    "Save this for your reset routine and share with a friend who needs it.",
];

const NURTURE_FLOW: &str = "1. **Problem Post** — spotlight a common frustration and agitate it gently.\n\
    2. **Proof Post** — share a demo, testimonial, or data-backed transformation.\n\
    3. **Purchase Post** — unveil the offer with urgency anchored in persona desires.";

/// Parameters for one content kit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KitRequest {
    /// Campaign seed.
    pub seed: String,
    /// Target platform.
    pub platform: Platform,
    /// Persona display name.
    pub persona: String,
    /// Try the remote model before templates.
    pub use_remote: bool,
}

impl KitRequest {
    /// Request with remote generation enabled.
    #[must_use]
    pub fn new(seed: impl Into<String>, platform: Platform, persona: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            platform,
            persona: persona.into(),
            use_remote: true,
        }
    }

    /// Sets whether the remote model is tried.
    #[must_use]
    pub fn with_remote(mut self, use_remote: bool) -> Self {
        self.use_remote = use_remote;
        self
    }
}

/// A rendered content kit.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ContentKit {
    /// Section-headed markdown.
    pub markdown: String,
    /// Path that produced the kit.
    pub source: GenerationSource,
}

/// Builds a content kit. Remote output is returned verbatim.
pub fn build_content_kit(
    gateway: &InferenceGateway,
    request: &KitRequest,
    pro: ProState,
) -> Result<ContentKit, StudioError> {
    let seed = request.seed.trim();
    if seed.is_empty() {
        return Err(StudioError::MissingKitSeed);
    }

    if request.use_remote {
        let max_tokens = if pro.is_pro() {
            KIT_MAX_TOKENS_PRO
        } else {
            KIT_MAX_TOKENS_FREE
        };
        if let Completion::Text(raw) =
            gateway.complete(&kit_prompt(seed, request, pro), KIT_TEMPERATURE, max_tokens)
        {
            return Ok(ContentKit {
                markdown: raw,
                source: GenerationSource::Remote,
            });
        }
    }

    Ok(ContentKit {
        markdown: fallback_kit(seed, request.platform, &request.persona, pro),
        source: GenerationSource::Template,
    })
}

fn kit_prompt(seed: &str, request: &KitRequest, pro: ProState) -> String {
    let depth = if pro.is_pro() { "deep-dive" } else { "lite" };
    let system = "You are a marketing operator delivering a launch-ready content kit. \
                  Return sections in markdown with headings.";
    let user = format!(
        "Seed: {seed}. Platform: {platform}. Persona: {persona}. Depth level: {depth}. \
         Return the following sections: Hook Headlines (5), Visual Direction, CTA Swaps, \
         Hashtag Stack, and a 3-post nurture flow (Problem → Proof → Purchase).",
        platform = request.platform.label(),
        persona = request.persona,
    );
    compose(system, &user)
}

/// Hashtags for a platform; the first five are the free stack.
#[must_use]
pub fn hashtag_stack(platform: Platform) -> [String; PRO_HASHTAGS] {
    [
        "#contentthatconverts".to_string(),
        "#brandstory".to_string(),
        "#aestheticstrategy".to_string(),
        "#consumerinsights".to_string(),
        format!("#{}tips", slug(platform.label())),
        "#socialmediastrategy".to_string(),
        "#launchcontent".to_string(),
        "#creatorplaybook".to_string(),
    ]
}

/// Deterministic template kit.
#[must_use]
pub fn fallback_kit(seed: &str, platform: Platform, persona_name: &str, pro: ProState) -> String {
    let profile = persona(persona_name);
    let audience = persona_name.to_lowercase();

    let hooks: Vec<String> = match profile {
        Some(p) if !p.desires.is_empty() => p
            .desires
            .iter()
            .map(|desire| {
                format!(
                    "What if {audience} could {} starting this week?",
                    desire.to_lowercase()
                )
            })
            .collect(),
        _ => vec!["Start with a transformation hook tied to their daily life.".to_string()],
    };

    let visual_direction = match profile.and_then(|p| p.keywords.first()) {
        Some(keyword) => format!(
            "Lean into {} native cues: mix close-up texture shots with overlay text that echoes '{keyword}'",
            platform.label().to_lowercase()
        ),
        None => format!("Use platform-first visuals that mirror the seed '{seed}'."),
    };

    let hashtag_count = if pro.is_pro() {
        PRO_HASHTAGS
    } else {
        FREE_HASHTAGS
    };
    let hashtags = hashtag_stack(platform)[..hashtag_count].join(" ");

    format!(
        "### Hook Headlines\n{hooks}\n\n\
         ### Visual Direction\n{visual_direction}\n\n\
         ### CTA Swaps\n{ctas}\n\n\
         ### Hashtag Stack\n{hashtags}\n\n\
         ### 3-Post Nurture Flow\n{NURTURE_FLOW}",
        hooks = bullets(hooks.iter().map(String::as_str)),
        ctas = bullets(CTA_SWAPS.iter().copied()),
    )
}

fn bullets<'a>(items: impl Iterator<Item = &'a str>) -> String {
    items
        .map(|item| format!("- {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::tests::ScriptedBackend;

    fn hashtag_line(kit: &str) -> &str {
        let start = kit.find("### Hashtag Stack\n").unwrap() + "### Hashtag Stack\n".len();
        kit[start..].lines().next().unwrap()
    }

    #[test]
    fn missing_seed_is_rejected() {
        let gateway = InferenceGateway::disabled();
        let err = build_content_kit(
            &gateway,
            &KitRequest::new("", Platform::TikTok, "Gen Z Creators"),
            ProState::PRO,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Provide a seed to craft the content kit.");
    }

    #[test]
    fn fallback_has_every_section_and_persona_hooks() {
        let kit = fallback_kit("Summer pop-up", Platform::InstagramCarousel, "Gen Z Creators", ProState::FREE);
        for heading in [
            "### Hook Headlines",
            "### Visual Direction",
            "### CTA Swaps",
            "### Hashtag Stack",
            "### 3-Post Nurture Flow",
        ] {
            assert!(kit.contains(heading), "missing {heading}");
        }
        assert!(kit.contains("- What if gen z creators could playful experimentation starting this week?"));
        assert!(kit.contains("Lean into instagram carousel native cues"));
        assert!(kit.contains("echoes 'duet this'"));
        assert!(kit.contains("- Tap shop now and claim your first-order upgrade."));
    }

    #[test]
    fn hashtag_stack_grows_with_pro() {
        let free = fallback_kit("seed", Platform::BlogPost, "Busy Parents", ProState::FREE);
        let pro = fallback_kit("seed", Platform::BlogPost, "Busy Parents", ProState::PRO);
        assert_eq!(hashtag_line(&free).split_whitespace().count(), 5);
        assert_eq!(hashtag_line(&pro).split_whitespace().count(), 8);
        assert!(hashtag_line(&free).contains("#blogposttips"));
    }

    #[test]
    fn unknown_persona_uses_generic_lines() {
        let kit = fallback_kit("Garden club", Platform::Newsletter, "Astronauts", ProState::FREE);
        assert!(kit.contains("- Start with a transformation hook tied to their daily life."));
        assert!(kit.contains("Use platform-first visuals that mirror the seed 'Garden club'."));
    }

    #[test]
    fn remote_text_is_returned_verbatim_with_depth_and_budget() {
        let backend = ScriptedBackend::replying("## Hook Headlines\n1. One");
        let gateway = InferenceGateway::with_backend(backend.clone()).unwrap();
        let kit = build_content_kit(
            &gateway,
            &KitRequest::new("Pop-up", Platform::TikTok, "Gen Z Creators"),
            ProState::PRO,
        )
        .unwrap();
        assert_eq!(kit.source, GenerationSource::Remote);
        assert_eq!(kit.markdown, "## Hook Headlines\n1. One");
        let request = backend.requests.lock()[0].clone();
        assert!(request.prompt.contains("Depth level: deep-dive."));
        assert_eq!(request.max_tokens, 750);
    }

    #[test]
    fn disabled_gateway_matches_fallback() {
        let gateway = InferenceGateway::disabled();
        let request = KitRequest::new("Pop-up", Platform::TikTok, "Premium Shoppers");
        let kit = build_content_kit(&gateway, &request, ProState::FREE).unwrap();
        assert_eq!(kit.source, GenerationSource::Template);
        assert_eq!(
            kit.markdown,
            fallback_kit("Pop-up", Platform::TikTok, "Premium Shoppers", ProState::FREE)
        );
    }
}
