//! Subject records
//!
//! A subject is a course a branch offers in one specific semester.

use crate::wire::{Embedded, RawRef, deserialize_semester, deserialize_timestamp};
use chrono::{DateTime, Utc};
use kithab_core::{BranchId, Identified, Semester, SubjectId};
use serde::{Deserialize, Serialize};

/// A course offered by a branch in a specific semester
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "SubjectWire")]
pub struct Subject {
    #[serde(rename = "_id")]
    pub id: SubjectId,

    /// Name, unique within (branch, semester) ignoring case
    pub name: String,

    /// Course code, unique within (branch, semester) ignoring case
    pub code: String,

    /// Owning branch
    #[serde(rename = "branch")]
    pub branch_id: BranchId,

    /// Semester the subject is taught in
    pub semester: Semester,

    /// Branch display data when the backend populated it
    #[serde(skip)]
    pub branch_summary: Option<Embedded>,

    #[serde(rename = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(rename = "updatedAt", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Subject {
    /// Create a subject record
    pub fn new(
        id: impl Into<SubjectId>,
        name: impl Into<String>,
        code: impl Into<String>,
        branch_id: impl Into<BranchId>,
        semester: Semester,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            code: code.into(),
            branch_id: branch_id.into(),
            semester,
            branch_summary: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// Whether the subject is taught by `branch_id` in `semester`
    pub fn offered_in(&self, branch_id: &BranchId, semester: Semester) -> bool {
        &self.branch_id == branch_id && self.semester == semester
    }

    /// `"Name (CODE)"` label for selects
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.code)
    }
}

impl Identified for Subject {
    type Id = SubjectId;

    fn id(&self) -> &SubjectId {
        &self.id
    }
}

#[derive(Deserialize)]
struct SubjectWire {
    #[serde(rename = "_id", alias = "id")]
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    code: String,
    #[serde(default)]
    branch: Option<RawRef>,
    #[serde(default, deserialize_with = "deserialize_semester")]
    semester: Semester,
    #[serde(default, rename = "createdAt", deserialize_with = "deserialize_timestamp")]
    created_at: Option<DateTime<Utc>>,
    #[serde(default, rename = "updatedAt", deserialize_with = "deserialize_timestamp")]
    updated_at: Option<DateTime<Utc>>,
}

impl From<SubjectWire> for Subject {
    fn from(wire: SubjectWire) -> Self {
        let (branch_id, branch_summary) = match wire.branch {
            Some(raw) => raw.into_parts(),
            None => (BranchId::default(), None),
        };
        Self {
            id: SubjectId::new(wire.id),
            name: wire.name,
            code: wire.code,
            branch_id,
            semester: wire.semester,
            branch_summary,
            created_at: wire.created_at,
            updated_at: wire.updated_at,
        }
    }
}
