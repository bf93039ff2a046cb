//! Cascading regulation → branch → semester → subject selection
//!
//! Selection changes go through [`Selection::apply`], a pure reducer. A
//! change at one level always clears every level below it, even when the
//! same value is picked again.

use crate::branch::Branch;
use crate::note::NoteFilter;
use crate::subject::Subject;
use kithab_core::{BranchId, RegulationId, Semester, SubjectId};
use serde::{Deserialize, Serialize};

/// Current cascade choices; `None` means nothing selected at that level
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub regulation: Option<RegulationId>,
    pub branch: Option<BranchId>,
    pub semester: Option<Semester>,
    pub subject: Option<SubjectId>,
}

/// One user action on the cascade
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionEvent {
    RegulationChanged(Option<RegulationId>),
    BranchChanged(Option<BranchId>),
    SemesterChanged(Option<Semester>),
    SubjectChanged(Option<SubjectId>),
    Cleared,
}

impl SelectionEvent {
    /// Regulation picked from a select; blank means "none"
    pub fn regulation(raw: &str) -> Self {
        SelectionEvent::RegulationChanged(RegulationId::parse(raw))
    }

    /// Branch picked from a select
    pub fn branch(raw: &str) -> Self {
        SelectionEvent::BranchChanged(BranchId::parse(raw))
    }

    /// Semester picked from a select; blank or non-positive means "none"
    pub fn semester(raw: &str) -> Self {
        SelectionEvent::SemesterChanged(crate::wire::parse_semester(raw))
    }

    /// Subject picked from a select
    pub fn subject(raw: &str) -> Self {
        SelectionEvent::SubjectChanged(SubjectId::parse(raw))
    }
}

impl Selection {
    /// Empty selection
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an event, returning the next selection
    pub fn apply(self, event: SelectionEvent) -> Self {
        match event {
            SelectionEvent::RegulationChanged(regulation) => Self {
                regulation,
                ..Self::default()
            },
            SelectionEvent::BranchChanged(branch) => Self {
                regulation: self.regulation,
                branch,
                semester: None,
                subject: None,
            },
            SelectionEvent::SemesterChanged(semester) => Self {
                semester,
                subject: None,
                ..self
            },
            SelectionEvent::SubjectChanged(subject) => Self { subject, ..self },
            SelectionEvent::Cleared => Self::default(),
        }
    }

    /// In-place form of [`Selection::apply`] for signal updates
    pub fn dispatch(&mut self, event: SelectionEvent) {
        *self = std::mem::take(self).apply(event);
    }

    /// All four levels chosen
    pub fn is_complete(&self) -> bool {
        self.tuple().is_some()
    }

    /// Nothing chosen at any level
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// The complete tuple, if every level is chosen
    pub fn tuple(&self) -> Option<NoteFilter> {
        Some(NoteFilter {
            regulation: self.regulation.clone()?,
            branch: self.branch.clone()?,
            semester: self.semester?,
            subject: self.subject.clone()?,
        })
    }

    /// Raw select values, blank for unset levels
    pub fn regulation_value(&self) -> String {
        self.regulation.as_ref().map(|r| r.to_string()).unwrap_or_default()
    }

    pub fn branch_value(&self) -> String {
        self.branch.as_ref().map(|b| b.to_string()).unwrap_or_default()
    }

    pub fn semester_value(&self) -> String {
        self.semester.map(|s| s.to_string()).unwrap_or_default()
    }

    pub fn subject_value(&self) -> String {
        self.subject.as_ref().map(|s| s.to_string()).unwrap_or_default()
    }
}

impl From<NoteFilter> for Selection {
    fn from(filter: NoteFilter) -> Self {
        Self {
            regulation: Some(filter.regulation),
            branch: Some(filter.branch),
            semester: Some(filter.semester),
            subject: Some(filter.subject),
        }
    }
}

/// Option lists valid for a selection
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CascadeOptions<'a> {
    pub branches: Vec<&'a Branch>,
    pub semesters: Vec<Semester>,
    pub subjects: Vec<&'a Subject>,
}

impl CascadeOptions<'_> {
    /// Whether the chosen branch is still offered
    pub fn offers_branch(&self, id: &BranchId) -> bool {
        self.branches.iter().any(|b| &b.id == id)
    }

    /// Whether the chosen subject is still offered
    pub fn offers_subject(&self, id: &SubjectId) -> bool {
        self.subjects.iter().any(|s| &s.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn full() -> Selection {
        Selection::new()
            .apply(SelectionEvent::regulation("r1"))
            .apply(SelectionEvent::branch("b1"))
            .apply(SelectionEvent::semester("3"))
            .apply(SelectionEvent::subject("s1"))
    }

    #[test]
    fn test_full_selection_yields_tuple() {
        let selection = full();
        assert!(selection.is_complete());
        assert_eq!(
            selection.tuple(),
            Some(NoteFilter {
                regulation: "r1".into(),
                branch: "b1".into(),
                semester: 3,
                subject: "s1".into(),
            })
        );
    }

    #[test]
    fn test_regulation_change_clears_everything_below() {
        for raw in ["r2", "r1", ""] {
            let next = full().apply(SelectionEvent::regulation(raw));
            assert_eq!(next.branch, None);
            assert_eq!(next.semester, None);
            assert_eq!(next.subject, None);
            assert_eq!(next.regulation, RegulationId::parse(raw));
        }
    }

    #[test]
    fn test_branch_change_clears_semester_and_subject() {
        let next = full().apply(SelectionEvent::branch("b1"));
        assert_eq!(next.regulation, Some("r1".into()));
        assert_eq!(next.branch, Some("b1".into()));
        assert_eq!(next.semester, None);
        assert_eq!(next.subject, None);
    }

    #[test]
    fn test_semester_change_clears_subject_only() {
        let next = full().apply(SelectionEvent::semester("4"));
        assert_eq!(next.branch, Some("b1".into()));
        assert_eq!(next.semester, Some(4));
        assert_eq!(next.subject, None);
        assert!(!next.is_complete());
    }

    #[test]
    fn test_subject_change_and_clear() {
        let next = full().apply(SelectionEvent::subject("s2"));
        assert_eq!(next.subject, Some("s2".into()));
        assert_eq!(next.semester, Some(3));

        let mut cleared = next;
        cleared.dispatch(SelectionEvent::Cleared);
        assert!(cleared.is_empty());
    }

    #[test]
    fn test_blank_and_zero_semester_mean_unset() {
        assert_eq!(full().apply(SelectionEvent::semester("")).semester, None);
        assert_eq!(full().apply(SelectionEvent::semester("0")).semester, None);
    }

    #[test]
    fn test_select_values() {
        let selection = full();
        assert_eq!(selection.semester_value(), "3");
        assert_eq!(Selection::new().regulation_value(), "");
        assert_eq!(Selection::from(selection.tuple().unwrap()), selection);
    }
}
