//! Prompt assembly and parsing of delimiter-separated model output.

/// Line that separates items in model responses.
pub const SEGMENT_DELIMITER: &str = "---";

/// Joins a system directive and a user directive with a blank line.
#[must_use]
pub fn compose(system_directive: &str, user_directive: &str) -> String {
    format!("{}\n\n{}", system_directive.trim(), user_directive.trim())
}

/// Splits raw model text on lines consisting only of `---`.
///
/// Segments are trimmed, empty segments are dropped and at most `limit` are
/// returned.
#[must_use]
pub fn split_segments(raw: &str, limit: usize) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    for line in raw.lines() {
        if line.trim() == SEGMENT_DELIMITER {
            push_segment(&mut segments, &current);
            current.clear();
        } else {
            current.push_str(line);
            current.push('\n');
        }
    }
    push_segment(&mut segments, &current);
    segments.truncate(limit);
    segments
}

fn push_segment(segments: &mut Vec<String>, candidate: &str) {
    let trimmed = candidate.trim();
    if !trimmed.is_empty() {
        segments.push(trimmed.to_string());
    }
}

/// Returns at most the first `max_chars` characters of `text`.
#[must_use]
pub fn excerpt(text: &str, max_chars: usize) -> &str {
    text.char_indices()
        .nth(max_chars)
        .map_or(text, |(idx, _)| &text[..idx])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compose_trims_and_separates() {
        assert_eq!(compose("  system \n", "\n user "), "system\n\nuser");
    }

    #[test]
    fn splits_on_delimiter_lines_only() {
        let raw = "Idea one\nwith detail\n---\n\n  ---  \nIdea two -- not a split\n---\nIdea three";
        let segments = split_segments(raw, 10);
        assert_eq!(
            segments,
            vec![
                "Idea one\nwith detail".to_string(),
                "Idea two -- not a split".to_string(),
                "Idea three".to_string(),
            ]
        );
    }

    #[test]
    fn inline_dashes_do_not_split() {
        let segments = split_segments("Hook --- payoff", 5);
        assert_eq!(segments, vec!["Hook --- payoff".to_string()]);
    }

    #[test]
    fn truncates_to_limit_and_handles_empty() {
        assert_eq!(split_segments("a\n---\nb\n---\nc", 2).len(), 2);
        assert!(split_segments("", 4).is_empty());
        assert!(split_segments("---\n---\n   ", 4).is_empty());
    }

    #[test]
    fn excerpt_respects_char_boundaries() {
        assert_eq!(excerpt("héllo wörld", 4), "héll");
        assert_eq!(excerpt("short", 60), "short");
    }
}
