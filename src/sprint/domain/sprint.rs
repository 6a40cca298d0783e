//! Sprint aggregate root and lifecycle status.

use super::{ParseSprintStatusError, SprintDomainError, SprintId};
use crate::task::domain::ProjectId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sprint lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SprintStatus {
    /// The sprint is running and accepts work.
    Active,
    /// The sprint has been closed. Terminal.
    Completed,
}

impl SprintStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for SprintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for SprintStatus {
    type Error = ParseSprintStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            _ => Err(ParseSprintStatusError(value.to_owned())),
        }
    }
}

/// Non-empty, trimmed sprint name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SprintName(String);

impl SprintName {
    /// Creates a validated sprint name.
    ///
    /// # Errors
    ///
    /// Returns [`SprintDomainError::EmptyName`] when the value is blank.
    pub fn new(value: impl Into<String>) -> Result<Self, SprintDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(SprintDomainError::EmptyName);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the name as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SprintName {
    type Error = SprintDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SprintName> for String {
    fn from(value: SprintName) -> Self {
        value.0
    }
}

impl fmt::Display for SprintName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Sprint aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sprint {
    id: SprintId,
    project_id: ProjectId,
    name: SprintName,
    goal: String,
    start_date: DateTime<Utc>,
    end_date: Option<DateTime<Utc>>,
    status: SprintStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for starting a sprint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSprint {
    /// Owning project.
    pub project_id: ProjectId,
    /// Sprint name.
    pub name: SprintName,
    /// Free-text sprint goal.
    pub goal: String,
}

/// Parameter object for reconstructing a persisted sprint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedSprintData {
    /// Persisted sprint identifier.
    pub id: SprintId,
    /// Persisted owning project.
    pub project_id: ProjectId,
    /// Persisted name.
    pub name: SprintName,
    /// Persisted goal.
    pub goal: String,
    /// Persisted start date.
    pub start_date: DateTime<Utc>,
    /// Persisted end date.
    pub end_date: Option<DateTime<Utc>>,
    /// Persisted status.
    pub status: SprintStatus,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Sprint {
    /// Starts a new active sprint at the current clock time.
    #[must_use]
    pub fn start(data: NewSprint, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: SprintId::new(),
            project_id: data.project_id,
            name: data.name,
            goal: data.goal,
            start_date: timestamp,
            end_date: None,
            status: SprintStatus::Active,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a sprint from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedSprintData) -> Self {
        Self {
            id: data.id,
            project_id: data.project_id,
            name: data.name,
            goal: data.goal,
            start_date: data.start_date,
            end_date: data.end_date,
            status: data.status,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the sprint identifier.
    #[must_use]
    pub const fn id(&self) -> SprintId {
        self.id
    }

    /// Returns the owning project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the sprint name.
    #[must_use]
    pub const fn name(&self) -> &SprintName {
        &self.name
    }

    /// Returns the sprint goal.
    #[must_use]
    pub fn goal(&self) -> &str {
        &self.goal
    }

    /// Returns the start date.
    #[must_use]
    pub const fn start_date(&self) -> DateTime<Utc> {
        self.start_date
    }

    /// Returns the end date, set once the sprint is completed.
    #[must_use]
    pub const fn end_date(&self) -> Option<DateTime<Utc>> {
        self.end_date
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> SprintStatus {
        self.status
    }

    /// Returns whether the sprint is active.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self.status, SprintStatus::Active)
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Completes the sprint at the current clock time.
    ///
    /// # Errors
    ///
    /// Returns [`SprintDomainError::AlreadyCompleted`] when the sprint is not
    /// active.
    pub fn complete(&mut self, clock: &impl Clock) -> Result<(), SprintDomainError> {
        if !self.is_active() {
            return Err(SprintDomainError::AlreadyCompleted(self.id));
        }
        let timestamp = clock.utc();
        self.status = SprintStatus::Completed;
        self.end_date = Some(timestamp);
        self.updated_at = timestamp;
        Ok(())
    }
}
