use serde::{Deserialize, Serialize};

/// Session-scoped Pro flag, passed explicitly into every generator.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProState(bool);

impl ProState {
    /// Free tier.
    pub const FREE: Self = Self(false);
    /// Pro tier.
    pub const PRO: Self = Self(true);

    /// Returns true when Pro features are unlocked.
    #[must_use]
    pub const fn is_pro(self) -> bool {
        self.0
    }

    /// Applies the free cap unless Pro is active.
    #[must_use]
    pub fn cap(self, requested: usize, free_cap: usize) -> usize {
        if self.0 {
            requested
        } else {
            requested.min(free_cap)
        }
    }
}

impl From<bool> for ProState {
    fn from(value: bool) -> Self {
        Self(value)
    }
}

/// Result of an unlock attempt.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UnlockOutcome {
    /// Message shown to the user.
    pub message: &'static str,
    /// Resulting Pro state.
    pub state: ProState,
}

impl UnlockOutcome {
    /// Convenience accessor.
    #[must_use]
    pub const fn is_pro(&self) -> bool {
        self.state.is_pro()
    }
}

/// Shown after a matching code.
pub const UNLOCKED_MESSAGE: &str =
    "Pro mode unlocked! Enjoy extended outputs, trend deep dives, and export packs.";
/// Shown when no code was entered.
pub const ENTER_CODE_MESSAGE: &str =
    "Enter your unlock code to access Pro depth, or grab it via the purchase button.";
/// Shown after a non-matching code.
pub const MISMATCH_MESSAGE: &str =
    "That code didn't match. Double-check your unlock email from Gumroad.";

/// Compares user codes against the configured shared secret.
///
/// This is a feature toggle, not an access-control boundary.
#[derive(Clone)]
pub struct ProGate {
    secret: String,
}

impl std::fmt::Debug for ProGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProGate").finish_non_exhaustive()
    }
}

impl ProGate {
    /// Creates a gate for `secret`; comparison ignores case and surrounding
    /// whitespace.
    #[must_use]
    pub fn new(secret: &str) -> Self {
        Self {
            secret: normalize(secret),
        }
    }

    /// Checks a user-entered code.
    #[must_use]
    pub fn unlock(&self, code: &str) -> UnlockOutcome {
        let code = normalize(code);
        if code.is_empty() {
            return UnlockOutcome {
                message: ENTER_CODE_MESSAGE,
                state: ProState::FREE,
            };
        }
        if !self.secret.is_empty() && code == self.secret {
            UnlockOutcome {
                message: UNLOCKED_MESSAGE,
                state: ProState::PRO,
            }
        } else {
            UnlockOutcome {
                message: MISMATCH_MESSAGE,
                state: ProState::FREE,
            }
        }
    }
}

fn normalize(code: &str) -> String {
    code.trim().to_lowercase()
}
