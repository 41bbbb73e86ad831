use std::path::PathBuf;

use thiserror::Error;

/// Errors emitted by the studio generators.
///
/// Input variants carry the exact text shown to the user in place of output.
#[derive(Debug, Error)]
pub enum StudioError {
    /// Idea expansion without a seed.
    #[error("Please enter a seed idea to expand.")]
    MissingSeed,
    /// Caption generation without a seed or article.
    #[error("Paste a seed, article, or notes to generate captions.")]
    MissingCaptionSource,
    /// Content kit without a seed.
    #[error("Provide a seed to craft the content kit.")]
    MissingKitSeed,
    /// Writing an export file failed.
    #[error("failed to write export {path}: {source}")]
    Export {
        /// Target file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Serializing export rows failed.
    #[error("failed to serialize export rows: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl StudioError {
    /// Returns true for errors caused by missing user input.
    #[must_use]
    pub const fn is_user_input(&self) -> bool {
        matches!(
            self,
            Self::MissingSeed | Self::MissingCaptionSource | Self::MissingKitSeed
        )
    }
}
