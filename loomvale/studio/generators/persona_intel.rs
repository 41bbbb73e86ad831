use crate::knowledge::persona;

/// Shown when the requested persona is not in the catalog.
pub const PERSONA_NOT_FOUND: &str = "Select a persona to view insights.";

/// Renders a persona's pain points, desires and keywords as markdown.
#[must_use]
pub fn persona_deep_dive(name: &str) -> String {
    let Some(profile) = persona(name) else {
        return PERSONA_NOT_FOUND.to_string();
    };
    let list = |items: &[&str]| {
        items
            .iter()
            .map(|item| format!("- {item}"))
            .collect::<Vec<_>>()
            .join("\n")
    };
    format!(
        "### {name} Deep Dive\n\n\
         **Pain points**\n{pains}\n\n\
         **Desired outcomes**\n{desires}\n\n\
         **Sticky keywords & phrases**\n{keywords}\n\n\
         Use these cues to align visuals, ad copy, and landing page messaging.",
        name = profile.name,
        pains = list(profile.pain_points),
        desires = list(profile.desires),
        keywords = list(profile.keywords),
    )
}
