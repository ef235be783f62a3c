//! Population entities

use crate::core::error::DomainError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Vendor-assigned population identifier (Value Object)
///
/// Opaque to this system: never parsed. Only blank ids and the path-like
/// `.` and `..` are refused.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PopulationId(String);

impl PopulationId {
    pub fn new(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidPopulationId(
                "population id cannot be empty".to_string(),
            ));
        }
        if matches!(trimmed, "." | "..") {
            return Err(DomainError::InvalidPopulationId(format!(
                "population id cannot be {trimmed:?}"
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PopulationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for PopulationId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PopulationId> for String {
    fn from(id: PopulationId) -> Self {
        id.0
    }
}

/// A population registered locally (Entity)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Population {
    pub id: PopulationId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Population {
    /// Create a population; a blank name falls back to `Population <id>`
    pub fn new(id: PopulationId, name: impl Into<String>) -> Self {
        let name = name.into();
        let name = if name.trim().is_empty() {
            format!("Population {}", id)
        } else {
            name.trim().to_string()
        };
        Self {
            id,
            name,
            description: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        self.description = if description.trim().is_empty() {
            None
        } else {
            Some(description)
        };
        self
    }

    /// Human-friendly label, e.g. `UK Adults (pop-123)`
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.id)
    }
}
