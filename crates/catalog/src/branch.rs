//! Branch records
//!
//! A branch is a department or program offered under one regulation.

use crate::wire::{Embedded, RawRef, deserialize_timestamp};
use chrono::{DateTime, Utc};
use kithab_core::{BranchId, Identified, RegulationId};
use serde::{Deserialize, Serialize};

/// A department/program under a regulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "BranchWire")]
pub struct Branch {
    #[serde(rename = "_id")]
    pub id: BranchId,

    /// Name, unique within the regulation ignoring case
    pub name: String,

    /// Short code, unique within the regulation ignoring case
    pub code: String,

    /// Owning regulation
    #[serde(rename = "regulation")]
    pub regulation_id: RegulationId,

    /// Regulation display data when the backend populated it
    #[serde(skip)]
    pub regulation_summary: Option<Embedded>,

    #[serde(rename = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(rename = "updatedAt", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Branch {
    /// Create a branch record
    pub fn new(
        id: impl Into<BranchId>,
        name: impl Into<String>,
        code: impl Into<String>,
        regulation_id: impl Into<RegulationId>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            code: code.into(),
            regulation_id: regulation_id.into(),
            regulation_summary: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// Whether this branch belongs to a regulation
    pub fn belongs_to(&self, regulation_id: &RegulationId) -> bool {
        &self.regulation_id == regulation_id
    }

    /// `"Name (CODE)"` label for tables and selects
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.code)
    }
}

impl Identified for Branch {
    type Id = BranchId;

    fn id(&self) -> &BranchId {
        &self.id
    }
}

#[derive(Deserialize)]
struct BranchWire {
    #[serde(rename = "_id", alias = "id")]
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    code: String,
    #[serde(default)]
    regulation: Option<RawRef>,
    #[serde(default, rename = "createdAt", deserialize_with = "deserialize_timestamp")]
    created_at: Option<DateTime<Utc>>,
    #[serde(default, rename = "updatedAt", deserialize_with = "deserialize_timestamp")]
    updated_at: Option<DateTime<Utc>>,
}

impl From<BranchWire> for Branch {
    fn from(wire: BranchWire) -> Self {
        let (regulation_id, regulation_summary) = match wire.regulation {
            Some(raw) => raw.into_parts(),
            None => (RegulationId::default(), None),
        };
        Self {
            id: BranchId::new(wire.id),
            name: wire.name,
            code: wire.code,
            regulation_id,
            regulation_summary,
            created_at: wire.created_at,
            updated_at: wire.updated_at,
        }
    }
}
