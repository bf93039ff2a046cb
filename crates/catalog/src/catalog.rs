//! In-memory metadata cache
//!
//! Holds the regulation, branch and subject lists a screen fetched on load
//! and answers every cascade question against them.

use crate::branch::Branch;
use crate::cascade::{CascadeOptions, Selection};
use crate::note::Note;
use crate::regulation::Regulation;
use crate::subject::Subject;
use kithab_core::{BranchId, Identified, RegulationId, Semester, SubjectId};
use serde::{Deserialize, Serialize};

/// Regulations, branches and subjects as last fetched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub regulations: Vec<Regulation>,
    pub branches: Vec<Branch>,
    pub subjects: Vec<Subject>,
}

/// What a server-side cascade delete will also remove
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeleteImpact {
    pub branches: usize,
    pub subjects: usize,
}

impl Catalog {
    /// Build a catalog from fetched lists
    pub fn new(regulations: Vec<Regulation>, branches: Vec<Branch>, subjects: Vec<Subject>) -> Self {
        Self {
            regulations,
            branches,
            subjects,
        }
    }

    /// Nothing loaded
    pub fn is_empty(&self) -> bool {
        self.regulations.is_empty() && self.branches.is_empty() && self.subjects.is_empty()
    }

    // ========================================================================
    // Lookups
    // ========================================================================

    pub fn regulation(&self, id: &RegulationId) -> Option<&Regulation> {
        self.regulations.iter().find(|r| r.matches_id(id))
    }

    pub fn branch(&self, id: &BranchId) -> Option<&Branch> {
        self.branches.iter().find(|b| b.matches_id(id))
    }

    pub fn subject(&self, id: &SubjectId) -> Option<&Subject> {
        self.subjects.iter().find(|s| s.matches_id(id))
    }

    /// Regulation owning a branch
    pub fn regulation_of_branch(&self, branch: &BranchId) -> Option<&Regulation> {
        self.branch(branch)
            .and_then(|b| self.regulation(&b.regulation_id))
    }

    // ========================================================================
    // Cascade
    // ========================================================================

    /// Branches under a regulation, in list order
    pub fn branches_for(&self, regulation: &RegulationId) -> Vec<&Branch> {
        self.branches
            .iter()
            .filter(|b| b.belongs_to(regulation))
            .collect()
    }

    /// Semesters `1..=N` of a regulation; empty for unknown ids
    pub fn semesters_for(&self, regulation: &RegulationId) -> Vec<Semester> {
        self.regulation(regulation)
            .map(Regulation::semesters)
            .unwrap_or_default()
    }

    /// Subjects a branch offers in one semester
    pub fn subjects_for(&self, branch: &BranchId, semester: Semester) -> Vec<&Subject> {
        self.subjects
            .iter()
            .filter(|s| s.offered_in(branch, semester))
            .collect()
    }

    /// Option lists for every level of a selection
    pub fn options(&self, selection: &Selection) -> CascadeOptions<'_> {
        let branches = selection
            .regulation
            .as_ref()
            .map(|r| self.branches_for(r))
            .unwrap_or_default();
        let semesters = selection
            .regulation
            .as_ref()
            .map(|r| self.semesters_for(r))
            .unwrap_or_default();
        let subjects = match (&selection.branch, selection.semester) {
            (Some(branch), Some(semester)) => self.subjects_for(branch, semester),
            _ => Vec::new(),
        };
        CascadeOptions {
            branches,
            semesters,
            subjects,
        }
    }

    /// Branches matching a partial filter; an unset regulation matches all
    pub fn branches_matching(&self, filter: &Selection) -> Vec<&Branch> {
        self.branches
            .iter()
            .filter(|b| filter.regulation.as_ref().is_none_or(|r| b.belongs_to(r)))
            .collect()
    }

    /// Subjects matching a partial regulation/branch/semester filter
    pub fn subjects_matching(&self, filter: &Selection) -> Vec<&Subject> {
        self.subjects
            .iter()
            .filter(|s| {
                filter.regulation.as_ref().is_none_or(|r| {
                    self.branch(&s.branch_id)
                        .is_some_and(|b| b.belongs_to(r))
                })
            })
            .filter(|s| filter.branch.as_ref().is_none_or(|b| &s.branch_id == b))
            .filter(|s| filter.semester.is_none_or(|sem| s.semester == sem))
            .collect()
    }

    // ========================================================================
    // Display helpers
    // ========================================================================

    /// Regulation name, falling back to the raw id
    pub fn regulation_name(&self, id: &RegulationId) -> String {
        self.regulation(id)
            .map(|r| r.name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    /// Branch name, falling back to the raw id
    pub fn branch_name(&self, id: &BranchId) -> String {
        self.branch(id)
            .map(|b| b.name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    /// Subject name, then populated note data, then the raw id
    pub fn subject_name(&self, note: &Note) -> String {
        self.subject(&note.subject_id)
            .map(|s| s.name.clone())
            .or_else(|| note.subject_summary.as_ref().and_then(|s| s.name.clone()))
            .unwrap_or_else(|| note.subject_id.to_string())
    }

    // ========================================================================
    // Deletes
    // ========================================================================

    /// Branches and subjects removed along with a regulation
    pub fn regulation_delete_impact(&self, id: &RegulationId) -> DeleteImpact {
        let branches = self.branches_for(id);
        let subjects = self
            .subjects
            .iter()
            .filter(|s| branches.iter().any(|b| b.id == s.branch_id))
            .count();
        DeleteImpact {
            branches: branches.len(),
            subjects,
        }
    }

    /// Subjects removed along with a branch
    pub fn branch_delete_impact(&self, id: &BranchId) -> DeleteImpact {
        DeleteImpact {
            branches: 0,
            subjects: self.subjects.iter().filter(|s| &s.branch_id == id).count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cascade::SelectionEvent;
    use pretty_assertions::assert_eq;

    fn catalog() -> Catalog {
        Catalog::new(
            vec![Regulation::new("r1", "R2021", 8), Regulation::new("r2", "R2023", 0)],
            vec![
                Branch::new("b1", "CSE", "CS", "r1"),
                Branch::new("b2", "ECE", "EC", "r1"),
                Branch::new("b3", "CSE", "CS", "r2"),
            ],
            vec![
                Subject::new("s1", "Data Structures", "CS201", "b1", 3),
                Subject::new("s2", "Networks", "CS301", "b1", 5),
                Subject::new("s3", "Signals", "EC201", "b2", 3),
            ],
        )
    }

    #[test]
    fn test_selecting_regulation_lists_its_branches_and_semesters() {
        let catalog = catalog();
        let selection = Selection::new().apply(SelectionEvent::regulation("r1"));
        let options = catalog.options(&selection);

        let ids: Vec<&str> = options.branches.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["b1", "b2"]);
        assert_eq!(options.semesters, (1..=8).collect::<Vec<_>>());
        assert!(options.subjects.is_empty());
    }

    #[test]
    fn test_zero_semester_regulation_and_no_selection() {
        let catalog = catalog();
        assert!(catalog.options(&Selection::new()).semesters.is_empty());
        assert!(catalog.options(&Selection::new()).branches.is_empty());

        let selection = Selection::new().apply(SelectionEvent::regulation("r2"));
        assert!(catalog.options(&selection).semesters.is_empty());
        assert!(catalog.semesters_for(&"missing".into()).is_empty());
    }

    #[test]
    fn test_subjects_need_branch_and_semester() {
        let catalog = catalog();
        let selection = Selection::new()
            .apply(SelectionEvent::regulation("r1"))
            .apply(SelectionEvent::branch("b1"))
            .apply(SelectionEvent::semester("3"));
        let options = catalog.options(&selection);
        let ids: Vec<&str> = options.subjects.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["s1"]);
        assert!(options.offers_subject(&"s1".into()));
        assert!(!options.offers_subject(&"s3".into()));
    }

    #[test]
    fn test_scenario_branch_without_subjects() {
        let catalog = Catalog::new(
            vec![Regulation::new("r1", "R2021", 8)],
            vec![Branch::new("b1", "CSE", "CS", "r1")],
            Vec::new(),
        );
        let selection = Selection::new().apply(SelectionEvent::regulation("r1"));
        let options = catalog.options(&selection);
        assert_eq!(options.semesters, vec![1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(options.branches.len(), 1);
        assert_eq!(options.branches[0].id, BranchId::new("b1"));

        let selection = selection
            .apply(SelectionEvent::branch("b1"))
            .apply(SelectionEvent::semester("3"));
        assert!(catalog.options(&selection).subjects.is_empty());
    }

    #[test]
    fn test_delete_impact() {
        let catalog = catalog();
        assert_eq!(
            catalog.regulation_delete_impact(&"r1".into()),
            DeleteImpact {
                branches: 2,
                subjects: 3
            }
        );
        assert_eq!(catalog.branch_delete_impact(&"b2".into()).subjects, 1);
        assert_eq!(catalog.regulation_delete_impact(&"r2".into()).subjects, 0);
    }

    #[test]
    fn test_names_fall_back_to_ids() {
        let catalog = catalog();
        assert_eq!(catalog.regulation_name(&"r1".into()), "R2021");
        assert_eq!(catalog.branch_name(&"zz".into()), "zz");
        assert_eq!(
            catalog.regulation_of_branch(&"b3".into()).map(|r| r.name.as_str()),
            Some("R2023")
        );
    }

    #[test]
    fn test_partial_filters_match_loosely() {
        let catalog = catalog();
        assert_eq!(catalog.branches_matching(&Selection::new()).len(), 3);
        let r2 = Selection::new().apply(SelectionEvent::regulation("r2"));
        assert_eq!(catalog.branches_matching(&r2).len(), 1);
        assert!(catalog.subjects_matching(&r2).is_empty());

        let sem3 = Selection {
            semester: Some(3),
            ..Selection::default()
        };
        let ids: Vec<&str> = catalog
            .subjects_matching(&sem3)
            .iter()
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(ids, vec!["s1", "s3"]);
    }
}
