//! Engine configuration shared by the task, sprint, and board services.

use serde::{Deserialize, Serialize};

const DEFAULT_SPRINT_NAME_PREFIX: &str = "Sprint";

/// Tunable behaviour for the Trellis services.
///
/// Hosts typically build this once at start-up, either through
/// [`EngineConfig::default`] or by deserializing it from JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Prefix used when a sprint is created without a name.
    ///
    /// The generated name is `"{prefix} {n}"`, where `n` is one more than the
    /// number of sprints the project already has.
    pub sprint_name_prefix: String,
    /// Whether assigning a task to yourself still emits a notification.
    pub notify_self_assignment: bool,
    /// Whether the board service keeps project snapshots between reads.
    pub cache_board_snapshots: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sprint_name_prefix: DEFAULT_SPRINT_NAME_PREFIX.to_owned(),
            notify_self_assignment: false,
            cache_board_snapshots: true,
        }
    }
}

impl EngineConfig {
    /// Parses a configuration from a JSON document.
    ///
    /// Missing fields fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`serde_json::Error`] when the document is not valid JSON or a
    /// field has the wrong type.
    pub fn from_json(document: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(document)
    }

    /// Sets the prefix used for generated sprint names.
    #[must_use]
    pub fn with_sprint_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.sprint_name_prefix = prefix.into();
        self
    }

    /// Enables or disables notifications for self-assignment.
    #[must_use]
    pub const fn with_notify_self_assignment(mut self, enabled: bool) -> Self {
        self.notify_self_assignment = enabled;
        self
    }

    /// Enables or disables board snapshot caching.
    #[must_use]
    pub const fn with_board_cache(mut self, enabled: bool) -> Self {
        self.cache_board_snapshots = enabled;
        self
    }

    /// Builds the default name for the next sprint of a project.
    ///
    /// A blank prefix falls back to `"Sprint"`.
    #[must_use]
    pub fn default_sprint_name(&self, prior_sprints: u64) -> String {
        let prefix = match self.sprint_name_prefix.trim() {
            "" => DEFAULT_SPRINT_NAME_PREFIX,
            trimmed => trimmed,
        };
        format!("{prefix} {}", prior_sprints.saturating_add(1))
    }
}
