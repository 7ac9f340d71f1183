//! Configuration for the ownership registry.

use std::time::Duration;

/// How long a challenge stays valid after it is issued.
pub const DEFAULT_CHALLENGE_WINDOW: Duration = Duration::from_secs(300);

/// How far a challenge's issue time may run ahead of the registry clock.
pub const DEFAULT_MAX_CLOCK_SKEW: Duration = Duration::from_secs(30);

/// Suffix identifying challenges issued by this registry.
pub const DEFAULT_REGISTRY_TAG: &str = "starRegistry";

/// Configuration for [`crate::OwnershipFlow`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Maximum age of a challenge at submission time.
    pub challenge_window: Duration,
    /// Tolerance for challenges stamped ahead of the registry clock.
    pub max_clock_skew: Duration,
    /// Third component of every challenge message.
    pub registry_tag: String,
}

impl RegistryConfig {
    /// Set the challenge window.
    pub fn with_challenge_window(mut self, window: Duration) -> Self {
        self.challenge_window = window;
        self
    }

    /// Set the tolerated clock skew.
    pub fn with_max_clock_skew(mut self, skew: Duration) -> Self {
        self.max_clock_skew = skew;
        self
    }

    /// Set the registry tag.
    pub fn with_registry_tag(mut self, tag: impl Into<String>) -> Self {
        self.registry_tag = tag.into();
        self
    }

    /// The challenge window in whole seconds.
    pub fn window_secs(&self) -> i64 {
        i64::try_from(self.challenge_window.as_secs()).unwrap_or(i64::MAX)
    }

    /// The clock skew tolerance in whole seconds.
    pub fn skew_secs(&self) -> i64 {
        i64::try_from(self.max_clock_skew.as_secs()).unwrap_or(i64::MAX)
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            challenge_window: DEFAULT_CHALLENGE_WINDOW,
            max_clock_skew: DEFAULT_MAX_CLOCK_SKEW,
            registry_tag: DEFAULT_REGISTRY_TAG.to_string(),
        }
    }
}
