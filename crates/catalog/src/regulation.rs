//! Regulation records
//!
//! A regulation is a curriculum version. It defines how many semesters the
//! programs under it span, which bounds every semester choice below it.

use crate::wire::{deserialize_semester, deserialize_timestamp};
use chrono::{DateTime, Utc};
use kithab_core::{Identified, RegulationId, Semester};
use serde::{Deserialize, Serialize};

/// An academic curriculum version
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Regulation {
    /// Backend identifier
    #[serde(rename = "_id", alias = "id")]
    pub id: RegulationId,

    /// Name, unique across regulations ignoring case
    pub name: String,

    /// Semester count; `0` means the backend sent nothing usable
    #[serde(default, deserialize_with = "deserialize_semester")]
    pub number_of_semesters: Semester,

    #[serde(
        default,
        deserialize_with = "deserialize_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(
        default,
        deserialize_with = "deserialize_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Regulation {
    /// Create a regulation record
    pub fn new(
        id: impl Into<RegulationId>,
        name: impl Into<String>,
        number_of_semesters: Semester,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            number_of_semesters,
            created_at: None,
            updated_at: None,
        }
    }

    /// Semester numbers `1..=N` in order; empty when N is zero
    pub fn semesters(&self) -> Vec<Semester> {
        (1..=self.number_of_semesters).collect()
    }

    /// Whether a semester number lies inside this regulation
    pub fn has_semester(&self, semester: Semester) -> bool {
        semester >= 1 && semester <= self.number_of_semesters
    }
}

impl Identified for Regulation {
    type Id = RegulationId;

    fn id(&self) -> &RegulationId {
        &self.id
    }
}

impl std::fmt::Display for Regulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
