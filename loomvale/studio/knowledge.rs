use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raised when a label does not name any catalog entry.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown {kind} '{value}' (expected one of: {expected})")]
pub struct UnknownLabel {
    kind: &'static str,
    value: String,
    expected: String,
}

impl UnknownLabel {
    fn new(kind: &'static str, value: &str, labels: impl Iterator<Item = &'static str>) -> Self {
        Self {
            kind,
            value: value.to_string(),
            expected: labels.collect::<Vec<_>>().join(", "),
        }
    }
}

/// Lowercases and strips everything but ASCII letters and digits, so that
/// `Blog/Post`, `blog-post` and `blog post` compare equal.
#[must_use]
pub fn slug(label: &str) -> String {
    label
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Publishing surfaces a campaign can target.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Platform {
    /// Short vertical video on Instagram.
    InstagramReel,
    /// Multi-slide Instagram post.
    InstagramCarousel,
    /// TikTok video.
    TikTok,
    /// Pinterest pin.
    PinterestPin,
    /// YouTube Shorts video.
    YouTubeShorts,
    /// LinkedIn post.
    LinkedIn,
    /// Long-form blog article.
    BlogPost,
    /// Email newsletter issue.
    Newsletter,
}

impl Platform {
    /// Every platform in catalog order.
    pub const ALL: [Self; 8] = [
        Self::InstagramReel,
        Self::InstagramCarousel,
        Self::TikTok,
        Self::PinterestPin,
        Self::YouTubeShorts,
        Self::LinkedIn,
        Self::BlogPost,
        Self::Newsletter,
    ];

    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::InstagramReel => "Instagram Reel",
            Self::InstagramCarousel => "Instagram Carousel",
            Self::TikTok => "TikTok",
            Self::PinterestPin => "Pinterest Pin",
            Self::YouTubeShorts => "YouTube Shorts",
            Self::LinkedIn => "LinkedIn",
            Self::BlogPost => "Blog/Post",
            Self::Newsletter => "Newsletter",
        }
    }

    /// Format advice appended to template ideas for this platform.
    #[must_use]
    pub const fn deliverable_hint(self) -> &'static str {
        match self {
            Self::InstagramReel => "Storyboard the first 3 shots, keep them under 2s each.",
            Self::InstagramCarousel => {
                "Plan 5 slides with headline, proof, takeaway, CTA, reminder."
            }
            Self::TikTok => "Lean on pattern interrupts at second 1.5 and 3.",
            Self::PinterestPin => "Design vertical graphics with layered typography.",
            Self::YouTubeShorts => "Use kinetic text and ASMR-lite audio cues.",
            Self::LinkedIn => "Anchor your hook on a metric, close with a reflective question.",
            Self::BlogPost => "Break into intro, 3 insights, closing action.",
            Self::Newsletter => "Segment into letter, resource trio, and micro-challenge.",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Platform {
    type Err = UnknownLabel;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = slug(value);
        Self::ALL
            .into_iter()
            .find(|platform| slug(platform.label()) == wanted)
            .ok_or_else(|| UnknownLabel::new("platform", value, Self::ALL.iter().map(|p| p.label())))
    }
}

/// Aesthetic moods that flavour template ideas.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    /// Warm and comforting.
    Cozy,
    /// Soft and aspirational.
    Dreamy,
    /// Clean and pared back.
    Minimalist,
    /// Loud and confident.
    Bold,
    /// Lyrical.
    Poetic,
    /// Clever and funny.
    Witty,
    /// Filmic framing.
    Cinematic,
    /// Retro textures.
    Vintage,
    /// Cute and playful.
    Kawaii,
    /// Calm and balanced.
    Zen,
}

impl Mood {
    /// Every mood in catalog order.
    pub const ALL: [Self; 10] = [
        Self::Cozy,
        Self::Dreamy,
        Self::Minimalist,
        Self::Bold,
        Self::Poetic,
        Self::Witty,
        Self::Cinematic,
        Self::Vintage,
        Self::Kawaii,
        Self::Zen,
    ];

    /// Mood used when a request selects none.
    pub const DEFAULT: Self = Self::Cozy;

    /// Lowercase label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Cozy => "cozy",
            Self::Dreamy => "dreamy",
            Self::Minimalist => "minimalist",
            Self::Bold => "bold",
            Self::Poetic => "poetic",
            Self::Witty => "witty",
            Self::Cinematic => "cinematic",
            Self::Vintage => "vintage",
            Self::Kawaii => "kawaii",
            Self::Zen => "zen",
        }
    }

    /// Label with a leading capital, e.g. `Cozy`.
    #[must_use]
    pub fn title(self) -> String {
        let label = self.label();
        let mut chars = label.chars();
        chars.next().map_or_else(String::new, |first| {
            first.to_uppercase().chain(chars).collect()
        })
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Mood {
    type Err = UnknownLabel;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = slug(value);
        Self::ALL
            .into_iter()
            .find(|mood| mood.label() == wanted)
            .ok_or_else(|| UnknownLabel::new("mood", value, Self::ALL.iter().map(|m| m.label())))
    }
}

/// Joins the selected moods for display, falling back to the default mood.
#[must_use]
pub fn moods_display(moods: &[Mood]) -> String {
    if moods.is_empty() {
        return Mood::DEFAULT.label().to_string();
    }
    moods
        .iter()
        .map(|mood| mood.label())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Voice used for captions.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Tone {
    /// Narrative and personal.
    #[default]
    WarmStoryteller,
    /// Evidence first.
    DataBackedExpert,
    /// Excited peer.
    HypeFriend,
    /// Polished and exclusive.
    LuxuryConcierge,
    /// Light-hearted explainer.
    PlayfulMentor,
    /// Straight sales pitch.
    DirectToConsumerPitch,
}

impl Tone {
    /// Every tone in catalog order.
    pub const ALL: [Self; 6] = [
        Self::WarmStoryteller,
        Self::DataBackedExpert,
        Self::HypeFriend,
        Self::LuxuryConcierge,
        Self::PlayfulMentor,
        Self::DirectToConsumerPitch,
    ];

    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::WarmStoryteller => "Warm storyteller",
            Self::DataBackedExpert => "Data-backed expert",
            Self::HypeFriend => "Hype friend",
            Self::LuxuryConcierge => "Luxury concierge",
            Self::PlayfulMentor => "Playful mentor",
            Self::DirectToConsumerPitch => "Direct-to-consumer pitch",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Tone {
    type Err = UnknownLabel;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = slug(value);
        Self::ALL
            .into_iter()
            .find(|tone| slug(tone.label()) == wanted)
            .ok_or_else(|| UnknownLabel::new("tone", value, Self::ALL.iter().map(|t| t.label())))
    }
}

/// Audience profile used to tailor copy.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Persona {
    /// Display name, also the lookup key.
    pub name: &'static str,
    /// Frustrations the audience reports.
    pub pain_points: &'static [&'static str],
    /// Outcomes the audience wants.
    pub desires: &'static [&'static str],
    /// Phrases that resonate with the audience.
    pub keywords: &'static [&'static str],
}

impl Persona {
    /// The first `n` keywords joined with commas.
    #[must_use]
    pub fn keyword_phrase(&self, n: usize) -> String {
        self.keywords
            .iter()
            .take(n)
            .copied()
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Fixed persona catalog.
pub const PERSONAS: &[Persona] = &[
    Persona {
        name: "Wellness Consumers",
        pain_points: &[
            "Burnout from fast routines",
            "Seeking calm rituals",
            "Overloaded by wellness jargon",
        ],
        desires: &[
            "Simple self-nurture",
            "Proof-backed benefits",
            "Products that feel like a hug",
        ],
        keywords: &["grounding", "slow rituals", "mind-body reset"],
    },
    Persona {
        name: "Busy Parents",
        pain_points: &[
            "Juggling family and self-time",
            "Limited attention spans",
            "Need bite-sized wins",
        ],
        desires: &[
            "Quick wins that feel meaningful",
            "Flexible schedules",
            "Relatable stories",
        ],
        keywords: &["five-minute reset", "family-first", "real-life demo"],
    },
    Persona {
        name: "Gen Z Creators",
        pain_points: &[
            "Scroll fatigue",
            "Skeptical of brand speak",
            "Need authenticity",
        ],
        desires: &[
            "Playful experimentation",
            "Share-worthy hooks",
            "Community-first energy",
        ],
        keywords: &["duet this", "lofi chaos", "main-character energy"],
    },
    Persona {
        name: "Premium Shoppers",
        pain_points: &[
            "Tired of mass-market feel",
            "Need elevated proof",
            "Guarded with trust",
        ],
        desires: &["Luxury cues", "White-glove service", "Testimonials"],
        keywords: &["artisan", "limited release", "concierge-level"],
    },
];

/// Looks up a persona by exact display name.
#[must_use]
pub fn persona(name: &str) -> Option<&'static Persona> {
    PERSONAS.iter().find(|persona| persona.name == name)
}

/// Display names of every persona, in catalog order.
pub fn persona_names() -> impl Iterator<Item = &'static str> {
    PERSONAS.iter().map(|persona| persona.name)
}
