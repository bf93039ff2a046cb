//! # Cascade Filter
//!
//! The regulation → branch → semester → subject selects used by the note
//! search, the upload form and the admin notes manager. The component only
//! renders; every change is reported as a [`SelectionEvent`] and the page
//! folds it into its [`Selection`] with the catalog's pure reducer.

use dioxus::prelude::*;
use kithab_catalog::{CascadeOptions, Catalog, Selection, SelectionEvent};

use crate::components::inputs::{Select, SelectOption};

/// One option per regulation
pub fn regulation_options(catalog: &Catalog) -> Vec<SelectOption> {
    catalog
        .regulations
        .iter()
        .map(|r| SelectOption::new(r.id.as_str(), r.name.as_str()))
        .collect()
}

/// Branches of the chosen regulation
pub fn branch_options(options: &CascadeOptions<'_>) -> Vec<SelectOption> {
    options
        .branches
        .iter()
        .map(|b| SelectOption::new(b.id.as_str(), b.label()))
        .collect()
}

/// `1..=N` for the chosen regulation
pub fn semester_options(options: &CascadeOptions<'_>) -> Vec<SelectOption> {
    options
        .semesters
        .iter()
        .map(|s| SelectOption::new(s.to_string(), format!("Semester {}", s)))
        .collect()
}

/// Subjects offered for the chosen branch and semester
pub fn subject_options(options: &CascadeOptions<'_>) -> Vec<SelectOption> {
    options
        .subjects
        .iter()
        .map(|s| SelectOption::new(s.id.as_str(), s.label()))
        .collect()
}

/// Four linked selects
#[component]
pub fn CascadeFilter(
    catalog: Catalog,
    selection: Selection,
    on_event: EventHandler<SelectionEvent>,
    #[props(default = false)] disabled: bool,
) -> Element {
    let options = catalog.options(&selection);
    let regulations = regulation_options(&catalog);
    let branches = branch_options(&options);
    let semesters = semester_options(&options);
    let subjects = subject_options(&options);

    rsx! {
        div {
            class: "cascade-filter",

            Select {
                label: "Regulation".to_string(),
                placeholder: "Select regulation".to_string(),
                value: selection.regulation_value(),
                options: regulations,
                disabled: disabled,
                on_change: move |v: String| on_event.call(SelectionEvent::regulation(&v)),
            }

            Select {
                label: "Branch".to_string(),
                placeholder: "Select branch".to_string(),
                value: selection.branch_value(),
                options: branches,
                disabled: disabled || selection.regulation.is_none(),
                on_change: move |v: String| on_event.call(SelectionEvent::branch(&v)),
            }

            Select {
                label: "Semester".to_string(),
                placeholder: "Select semester".to_string(),
                value: selection.semester_value(),
                options: semesters,
                disabled: disabled || selection.regulation.is_none(),
                on_change: move |v: String| on_event.call(SelectionEvent::semester(&v)),
            }

            Select {
                label: "Subject".to_string(),
                placeholder: "Select subject".to_string(),
                value: selection.subject_value(),
                options: subjects,
                disabled: disabled || selection.branch.is_none() || selection.semester.is_none(),
                on_change: move |v: String| on_event.call(SelectionEvent::subject(&v)),
            }
        }
    }
}
