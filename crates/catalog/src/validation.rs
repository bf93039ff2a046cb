//! Create/update guards for the taxonomy
//!
//! Each draft holds raw form input. `check` runs the required-field checks
//! first, then the case-insensitive duplicate checks within the entity's
//! scope, and on success returns the trimmed payload ready to send.
//!
//! Scopes: regulation names are global, branch names and codes are per
//! regulation, subject names and codes are per (branch, semester).

use crate::branch::Branch;
use crate::cascade::{Selection, SelectionEvent};
use crate::catalog::Catalog;
use crate::regulation::Regulation;
use crate::subject::Subject;
use crate::wire::parse_semester;
use kithab_core::{BranchId, FieldErrors, RegulationId, Semester, SubjectId, Validatable};
use serde::Serialize;

// Field keys shared with the form components
pub const FIELD_NAME: &str = "name";
pub const FIELD_CODE: &str = "code";
pub const FIELD_SEMESTERS: &str = "numberOfSemesters";
pub const FIELD_REGULATION: &str = "regulationId";
pub const FIELD_BRANCH: &str = "branchId";
pub const FIELD_SEMESTER: &str = "semester";

fn same_text(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

// ============================================================================
// Regulation
// ============================================================================

/// Regulation form input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegulationDraft {
    pub name: String,
    pub number_of_semesters: String,
}

/// Body for `POST/PUT /admin/regulations`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegulationPayload {
    pub name: String,
    pub number_of_semesters: Semester,
}

impl RegulationDraft {
    pub fn new(name: impl Into<String>, number_of_semesters: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            number_of_semesters: number_of_semesters.into(),
        }
    }

    /// Run every check against the catalog, excluding the record being edited
    pub fn check(
        &self,
        catalog: &Catalog,
        editing: Option<&RegulationId>,
    ) -> Result<RegulationPayload, FieldErrors> {
        let mut errors = self.field_errors();

        if !errors.has(FIELD_NAME) {
            let duplicate = catalog
                .regulations
                .iter()
                .filter(|r| Some(&r.id) != editing)
                .any(|r| same_text(&r.name, &self.name));
            if duplicate {
                errors.insert(FIELD_NAME, "A regulation with this name already exists");
            }
        }

        match (errors.is_empty(), parse_semester(&self.number_of_semesters)) {
            (true, Some(number_of_semesters)) => Ok(RegulationPayload {
                name: self.name.trim().to_string(),
                number_of_semesters,
            }),
            _ => Err(errors),
        }
    }
}

impl Validatable for RegulationDraft {
    fn field_errors(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if self.name.trim().is_empty() {
            errors.insert(FIELD_NAME, "Name is required");
        }
        if self.number_of_semesters.trim().is_empty() {
            errors.insert(FIELD_SEMESTERS, "Number of semesters is required");
        } else if parse_semester(&self.number_of_semesters).is_none() {
            errors.insert(FIELD_SEMESTERS, "Must be a positive number");
        }
        errors
    }
}

impl From<&Regulation> for RegulationDraft {
    fn from(regulation: &Regulation) -> Self {
        Self::new(
            regulation.name.clone(),
            regulation.number_of_semesters.to_string(),
        )
    }
}

// ============================================================================
// Branch
// ============================================================================

/// Branch form input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BranchDraft {
    pub regulation: Option<RegulationId>,
    pub name: String,
    pub code: String,
}

/// Body for `POST/PUT /admin/branches`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BranchPayload {
    pub name: String,
    pub code: String,
    pub regulation: RegulationId,
}

impl BranchDraft {
    pub fn new(
        regulation: Option<RegulationId>,
        name: impl Into<String>,
        code: impl Into<String>,
    ) -> Self {
        Self {
            regulation,
            name: name.into(),
            code: code.into(),
        }
    }

    /// Run every check against the catalog, excluding the record being edited
    pub fn check(
        &self,
        catalog: &Catalog,
        editing: Option<&BranchId>,
    ) -> Result<BranchPayload, FieldErrors> {
        let mut errors = self.field_errors();

        if let Some(regulation) = &self.regulation {
            let siblings: Vec<&Branch> = catalog
                .branches_for(regulation)
                .into_iter()
                .filter(|b| Some(&b.id) != editing)
                .collect();
            if !errors.has(FIELD_NAME) && siblings.iter().any(|b| same_text(&b.name, &self.name)) {
                errors.insert(FIELD_NAME, "A branch with this name already exists in this regulation");
            }
            if !errors.has(FIELD_CODE) && siblings.iter().any(|b| same_text(&b.code, &self.code)) {
                errors.insert(FIELD_CODE, "A branch with this code already exists in this regulation");
            }
        }

        match (&self.regulation, errors.is_empty()) {
            (Some(regulation), true) => Ok(BranchPayload {
                name: self.name.trim().to_string(),
                code: self.code.trim().to_string(),
                regulation: regulation.clone(),
            }),
            _ => Err(errors),
        }
    }
}

impl Validatable for BranchDraft {
    fn field_errors(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if self.regulation.is_none() {
            errors.insert(FIELD_REGULATION, "Please select a regulation");
        }
        if self.name.trim().is_empty() {
            errors.insert(FIELD_NAME, "Branch name is required");
        }
        if self.code.trim().is_empty() {
            errors.insert(FIELD_CODE, "Branch code is required");
        }
        errors
    }
}

impl From<&Branch> for BranchDraft {
    fn from(branch: &Branch) -> Self {
        Self::new(
            Some(branch.regulation_id.clone()),
            branch.name.clone(),
            branch.code.clone(),
        )
    }
}

// ============================================================================
// Subject
// ============================================================================

/// Subject form input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubjectDraft {
    pub regulation: Option<RegulationId>,
    pub branch: Option<BranchId>,
    pub semester: String,
    pub name: String,
    pub code: String,
}

/// Body for `POST/PUT /admin/subjects`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubjectPayload {
    pub name: String,
    pub code: String,
    pub branch: BranchId,
    pub semester: Semester,
}

impl SubjectDraft {
    /// Run every check against the catalog, excluding the record being edited
    pub fn check(
        &self,
        catalog: &Catalog,
        editing: Option<&SubjectId>,
    ) -> Result<SubjectPayload, FieldErrors> {
        let mut errors = self.field_errors();
        let semester = parse_semester(&self.semester);

        // The branch decides which regulation the subject lands in
        let branch = self.branch.as_ref().and_then(|b| catalog.branch(b));
        if let (Some(regulation), Some(branch)) = (&self.regulation, branch) {
            if !branch.belongs_to(regulation) {
                errors.insert(FIELD_BRANCH, "Branch does not belong to the selected regulation");
            }
        }

        let range = match branch {
            Some(branch) => catalog.regulation(&branch.regulation_id),
            None => self.regulation.as_ref().and_then(|r| catalog.regulation(r)),
        };
        if let (Some(regulation), Some(semester)) = (range, semester) {
            if !regulation.has_semester(semester) {
                errors.insert(
                    FIELD_SEMESTER,
                    format!(
                        "Semester must be between 1 and {}",
                        regulation.number_of_semesters
                    ),
                );
            }
        }

        if let (Some(branch), Some(semester)) = (&self.branch, semester) {
            let siblings: Vec<&Subject> = catalog
                .subjects_for(branch, semester)
                .into_iter()
                .filter(|s| Some(&s.id) != editing)
                .collect();
            if !errors.has(FIELD_NAME) && siblings.iter().any(|s| same_text(&s.name, &self.name)) {
                errors.insert(
                    FIELD_NAME,
                    "Subject with this name already exists in selected branch & semester",
                );
            }
            if !errors.has(FIELD_CODE) && siblings.iter().any(|s| same_text(&s.code, &self.code)) {
                errors.insert(
                    FIELD_CODE,
                    "Subject with this code already exists in selected branch & semester",
                );
            }
        }

        match (&self.branch, semester, errors.is_empty()) {
            (Some(branch), Some(semester), true) => Ok(SubjectPayload {
                name: self.name.trim().to_string(),
                code: self.code.trim().to_string(),
                branch: branch.clone(),
                semester,
            }),
            _ => Err(errors),
        }
    }
}

impl Validatable for SubjectDraft {
    fn field_errors(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if self.regulation.is_none() {
            errors.insert(FIELD_REGULATION, "Please select regulation");
        }
        if self.branch.is_none() {
            errors.insert(FIELD_BRANCH, "Please select branch");
        }
        if parse_semester(&self.semester).is_none() {
            errors.insert(FIELD_SEMESTER, "Please select semester");
        }
        if self.name.trim().is_empty() {
            errors.insert(FIELD_NAME, "Subject name is required");
        }
        if self.code.trim().is_empty() {
            errors.insert(FIELD_CODE, "Subject code is required");
        }
        errors
    }
}

impl SubjectDraft {
    /// Draft prefilled from an existing subject; the regulation comes from
    /// the subject's branch
    pub fn from_subject(subject: &Subject, catalog: &Catalog) -> Self {
        Self {
            regulation: catalog
                .branch(&subject.branch_id)
                .map(|b| b.regulation_id.clone()),
            branch: Some(subject.branch_id.clone()),
            semester: subject.semester.to_string(),
            name: subject.name.clone(),
            code: subject.code.clone(),
        }
    }

    /// Fold a cascade event into regulation/branch/semester; a change at one
    /// level clears the levels below it
    pub fn select(&mut self, event: SelectionEvent) {
        let selection = Selection {
            regulation: self.regulation.take(),
            branch: self.branch.take(),
            semester: parse_semester(&self.semester),
            subject: None,
        }
        .apply(event);
        self.semester = selection.semester_value();
        self.regulation = selection.regulation;
        self.branch = selection.branch;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn catalog() -> Catalog {
        Catalog::new(
            vec![Regulation::new("A", "R2021", 8), Regulation::new("B", "R2023", 6)],
            vec![
                Branch::new("b1", "CSE", "CS", "A"),
                Branch::new("b2", "ECE", "EC", "A"),
                Branch::new("bB", "MECH", "ME", "B"),
            ],
            vec![Subject::new("s1", "Data Structures", "CS201", "b1", 3)],
        )
    }

    #[test]
    fn test_regulation_required_and_positive() {
        let errors = RegulationDraft::new("  ", "").check(&catalog(), None).unwrap_err();
        assert_eq!(errors.get(FIELD_NAME), Some("Name is required"));
        assert_eq!(errors.get(FIELD_SEMESTERS), Some("Number of semesters is required"));

        for bad in ["0", "-3", "eight"] {
            let errors = RegulationDraft::new("R2025", bad).check(&catalog(), None).unwrap_err();
            assert_eq!(errors.get(FIELD_SEMESTERS), Some("Must be a positive number"));
        }
    }

    #[test]
    fn test_regulation_duplicate_excludes_self() {
        let catalog = catalog();
        let errors = RegulationDraft::new(" r2021 ", "8").check(&catalog, None).unwrap_err();
        assert_eq!(errors.get(FIELD_NAME), Some("A regulation with this name already exists"));

        let payload = RegulationDraft::new(" R2021 ", "10")
            .check(&catalog, Some(&"A".into()))
            .unwrap();
        assert_eq!(
            payload,
            RegulationPayload {
                name: "R2021".to_string(),
                number_of_semesters: 10
            }
        );
    }

    #[test]
    fn test_branch_duplicate_scoped_to_regulation() {
        let catalog = Catalog::new(
            catalog().regulations,
            vec![Branch::new("b1", "CSE", "CS", "A")],
            Vec::new(),
        );

        let fresh = Catalog::new(catalog.regulations.clone(), Vec::new(), Vec::new());
        assert!(BranchDraft::new(Some("A".into()), "CSE", "CS").check(&fresh, None).is_ok());

        let errors = BranchDraft::new(Some("A".into()), "cse", "XX")
            .check(&catalog, None)
            .unwrap_err();
        assert_eq!(
            errors.get(FIELD_NAME),
            Some("A branch with this name already exists in this regulation")
        );
        assert!(!errors.has(FIELD_CODE));

        assert!(BranchDraft::new(Some("B".into()), "CSE", "CS").check(&catalog, None).is_ok());
    }

    #[test]
    fn test_branch_code_checked_independently() {
        let errors = BranchDraft::new(Some("A".into()), "Computer Science", " cs ")
            .check(&catalog(), None)
            .unwrap_err();
        assert!(!errors.has(FIELD_NAME));
        assert_eq!(
            errors.get(FIELD_CODE),
            Some("A branch with this code already exists in this regulation")
        );
    }

    #[test]
    fn test_branch_required_errors_skip_duplicates() {
        let errors = BranchDraft::new(None, "", "CS").check(&catalog(), None).unwrap_err();
        assert_eq!(errors.get(FIELD_REGULATION), Some("Please select a regulation"));
        assert_eq!(errors.get(FIELD_NAME), Some("Branch name is required"));
        assert!(!errors.has(FIELD_CODE));
    }

    #[test]
    fn test_branch_edit_keeps_own_name() {
        let payload = BranchDraft::new(Some("A".into()), "CSE ", "CS")
            .check(&catalog(), Some(&"b1".into()))
            .unwrap();
        assert_eq!(payload.name, "CSE");
        assert_eq!(payload.regulation, RegulationId::new("A"));
    }

    fn subject_draft(semester: &str, name: &str, code: &str) -> SubjectDraft {
        SubjectDraft {
            regulation: Some("A".into()),
            branch: Some("b1".into()),
            semester: semester.to_string(),
            name: name.to_string(),
            code: code.to_string(),
        }
    }

    #[test]
    fn test_subject_duplicate_scoped_to_branch_and_semester() {
        let catalog = catalog();
        let errors = subject_draft("3", "data structures", "CS299")
            .check(&catalog, None)
            .unwrap_err();
        assert_eq!(
            errors.get(FIELD_NAME),
            Some("Subject with this name already exists in selected branch & semester")
        );

        let payload = subject_draft("4", "Data Structures", "CS201")
            .check(&catalog, None)
            .unwrap();
        assert_eq!(payload.semester, 4);
        assert_eq!(payload.branch, BranchId::new("b1"));

        let mut other_branch = subject_draft("3", "Data Structures", "CS201");
        other_branch.branch = Some("b2".into());
        let payload = other_branch.check(&catalog, None).unwrap();
        assert_eq!(payload.branch, BranchId::new("b2"));
        assert_eq!(payload.semester, 3);
    }

    #[test]
    fn test_subject_branch_must_match_regulation() {
        let catalog = catalog();
        let mut draft = subject_draft("8", "Compilers", "CS801");
        draft.branch = Some("bB".into());
        let errors = draft.check(&catalog, None).unwrap_err();
        assert_eq!(
            errors.get(FIELD_BRANCH),
            Some("Branch does not belong to the selected regulation")
        );
        // Range comes from the branch's own regulation (6 semesters)
        assert_eq!(errors.get(FIELD_SEMESTER), Some("Semester must be between 1 and 6"));

        draft.regulation = Some("B".into());
        draft.semester = "6".to_string();
        assert!(draft.check(&catalog, None).is_ok());
    }

    #[test]
    fn test_subject_semester_range_and_required() {
        let errors = subject_draft("9", "Compilers", "CS401")
            .check(&catalog(), None)
            .unwrap_err();
        assert_eq!(errors.get(FIELD_SEMESTER), Some("Semester must be between 1 and 8"));

        let errors = SubjectDraft::default().check(&catalog(), None).unwrap_err();
        assert_eq!(errors.len(), 5);
        assert_eq!(errors.get(FIELD_SEMESTER), Some("Please select semester"));
    }

    #[test]
    fn test_select_clears_lower_levels() {
        let mut draft = subject_draft("3", "Data Structures", "CS201");
        draft.select(SelectionEvent::semester("4"));
        assert_eq!(draft.semester, "4");
        assert_eq!(draft.branch, Some("b1".into()));

        draft.select(SelectionEvent::branch("b2"));
        assert_eq!(draft.branch, Some("b2".into()));
        assert_eq!(draft.semester, "");

        draft.select(SelectionEvent::semester("3"));
        draft.select(SelectionEvent::regulation("B"));
        assert_eq!(draft.regulation, Some("B".into()));
        assert_eq!(draft.branch, None);
        assert_eq!(draft.semester, "");
        assert_eq!(draft.name, "Data Structures");
    }

    #[test]
    fn test_subject_edit_excludes_self() {
        let catalog = catalog();
        let subject = &catalog.subjects[0];
        let draft = SubjectDraft::from_subject(subject, &catalog);
        assert_eq!(draft.regulation, Some("A".into()));
        assert!(draft.check(&catalog, Some(&subject.id)).is_ok());
    }
}
