//! Admin Taxonomy Page Component
//!
//! Regulations, branches and subjects in three tabs. Branches can be
//! narrowed to one regulation, subjects to a regulation, branch and
//! semester. Every add, edit and delete goes through a dialog.

use dioxus::prelude::*;
use kithab_catalog::{Branch, Catalog, Regulation, Selection, SelectionEvent, Subject};

use crate::actions::{self, CatalogScope};
use crate::components::cascade_filter::{branch_options, regulation_options, semester_options};
use crate::components::inputs::Select;
use crate::state::{APP_STATE, DeleteTarget, Dialog, use_revision};

/// Tabs of the taxonomy manager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MetaTab {
    #[default]
    Regulations,
    Branches,
    Subjects,
}

impl MetaTab {
    pub fn label(&self) -> &'static str {
        match self {
            MetaTab::Regulations => "Regulations",
            MetaTab::Branches => "Branches",
            MetaTab::Subjects => "Subjects",
        }
    }

    /// Dialog opened by the tab's add button
    pub fn add_dialog(&self) -> Dialog {
        match self {
            MetaTab::Regulations => Dialog::NewRegulation,
            MetaTab::Branches => Dialog::NewBranch,
            MetaTab::Subjects => Dialog::NewSubject,
        }
    }

    pub fn all() -> [MetaTab; 3] {
        [MetaTab::Regulations, MetaTab::Branches, MetaTab::Subjects]
    }
}

// ============================================================================
// Filters
// ============================================================================

/// Branches shown for the regulation filter
pub fn filter_branches(catalog: &Catalog, selection: &Selection) -> Vec<Branch> {
    catalog
        .branches_matching(selection)
        .into_iter()
        .cloned()
        .collect()
}

/// Subjects shown for the regulation, branch and semester filters; unset
/// levels match everything
pub fn filter_subjects(catalog: &Catalog, selection: &Selection) -> Vec<Subject> {
    catalog
        .subjects_matching(selection)
        .into_iter()
        .cloned()
        .collect()
}

// ============================================================================
// Page
// ============================================================================

/// Admin taxonomy manager
#[component]
pub fn AdminMetaPage() -> Element {
    let mut tab = use_signal(MetaTab::default);
    let mut branch_filter = use_signal(Selection::new);
    let mut subject_filter = use_signal(Selection::new);

    let revision = use_revision();
    let loaded = use_resource(move || async move {
        revision();
        actions::load_catalog(CatalogScope::Admin).await.is_some()
    });

    let catalog = APP_STATE.read().catalog.clone();
    let active = *tab.read();
    let loading = loaded.read().is_none();

    rsx! {
        div {
            class: "page",

            div {
                class: "page-header",
                h1 { "Regulations & Subjects" }
                button {
                    r#type: "button",
                    class: "btn btn-primary",
                    onclick: move |_| APP_STATE.write().ui.show_dialog(active.add_dialog()),
                    "+ Add "
                    {active.label()}
                }
            }

            div {
                class: "tabs",
                for t in MetaTab::all() {
                    button {
                        key: "{t:?}",
                        r#type: "button",
                        class: if t == active { "tab tab-active" } else { "tab" },
                        onclick: move |_| tab.set(t),
                        {t.label()}
                    }
                }
            }

            if loading {
                p { class: "muted", "Loading..." }
            } else {
                match active {
                    MetaTab::Regulations => rsx! {
                        RegulationsTable { regulations: catalog.regulations.clone() }
                    },
                    MetaTab::Branches => {
                        let filter = branch_filter.read().clone();
                        let branches = filter_branches(&catalog, &filter);
                        rsx! {
                            div {
                                class: "table-filter",
                                Select {
                                    label: "Regulation".to_string(),
                                    placeholder: "All regulations".to_string(),
                                    value: filter.regulation_value(),
                                    options: regulation_options(&catalog),
                                    on_change: move |v: String| {
                                        branch_filter.write().dispatch(SelectionEvent::regulation(&v))
                                    },
                                }
                            }
                            BranchesTable { branches: branches, catalog: catalog.clone() }
                        }
                    }
                    MetaTab::Subjects => {
                        let filter = subject_filter.read().clone();
                        let options = catalog.options(&filter);
                        let subjects = filter_subjects(&catalog, &filter);
                        rsx! {
                            div {
                                class: "table-filter",
                                Select {
                                    label: "Regulation".to_string(),
                                    placeholder: "All regulations".to_string(),
                                    value: filter.regulation_value(),
                                    options: regulation_options(&catalog),
                                    on_change: move |v: String| {
                                        subject_filter.write().dispatch(SelectionEvent::regulation(&v))
                                    },
                                }
                                Select {
                                    label: "Branch".to_string(),
                                    placeholder: "All branches".to_string(),
                                    value: filter.branch_value(),
                                    options: branch_options(&options),
                                    disabled: filter.regulation.is_none(),
                                    on_change: move |v: String| {
                                        subject_filter.write().dispatch(SelectionEvent::branch(&v))
                                    },
                                }
                                Select {
                                    label: "Semester".to_string(),
                                    placeholder: "All semesters".to_string(),
                                    value: filter.semester_value(),
                                    options: semester_options(&options),
                                    disabled: filter.regulation.is_none(),
                                    on_change: move |v: String| {
                                        subject_filter.write().dispatch(SelectionEvent::semester(&v))
                                    },
                                }
                            }
                            SubjectsTable { subjects: subjects, catalog: catalog.clone() }
                        }
                    }
                }
            }
        }
    }
}

// ============================================================================
// Tables
// ============================================================================

#[component]
fn RegulationsTable(regulations: Vec<Regulation>) -> Element {
    if regulations.is_empty() {
        return rsx! { p { class: "empty-state", "No regulations yet." } };
    }
    rsx! {
        table {
            class: "data-table",
            thead {
                tr {
                    th { "Name" }
                    th { "Semesters" }
                    th { class: "actions", "Actions" }
                }
            }
            tbody {
                for regulation in regulations {
                    tr {
                        key: "{regulation.id}",
                        td { "{regulation.name}" }
                        td { "{regulation.number_of_semesters}" }
                        td {
                            class: "actions",
                            RowActions {
                                edit: Dialog::EditRegulation(regulation.id.clone()),
                                delete: DeleteTarget::Regulation(regulation.id.clone()),
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn BranchesTable(branches: Vec<Branch>, catalog: Catalog) -> Element {
    if branches.is_empty() {
        return rsx! { p { class: "empty-state", "No branches found." } };
    }
    rsx! {
        table {
            class: "data-table",
            thead {
                tr {
                    th { "Name" }
                    th { "Code" }
                    th { "Regulation" }
                    th { class: "actions", "Actions" }
                }
            }
            tbody {
                for branch in branches {
                    tr {
                        key: "{branch.id}",
                        td { "{branch.name}" }
                        td { "{branch.code}" }
                        td { {catalog.regulation_name(&branch.regulation_id)} }
                        td {
                            class: "actions",
                            RowActions {
                                edit: Dialog::EditBranch(branch.id.clone()),
                                delete: DeleteTarget::Branch(branch.id.clone()),
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn SubjectsTable(subjects: Vec<Subject>, catalog: Catalog) -> Element {
    if subjects.is_empty() {
        return rsx! { p { class: "empty-state", "No subjects found." } };
    }
    rsx! {
        table {
            class: "data-table",
            thead {
                tr {
                    th { "Name" }
                    th { "Code" }
                    th { "Branch" }
                    th { "Semester" }
                    th { class: "actions", "Actions" }
                }
            }
            tbody {
                for subject in subjects {
                    tr {
                        key: "{subject.id}",
                        td { "{subject.name}" }
                        td { "{subject.code}" }
                        td { {catalog.branch_name(&subject.branch_id)} }
                        td { "{subject.semester}" }
                        td {
                            class: "actions",
                            RowActions {
                                edit: Dialog::EditSubject(subject.id.clone()),
                                delete: DeleteTarget::Subject(subject.id.clone()),
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Edit and delete buttons for one row
#[component]
fn RowActions(edit: Dialog, delete: DeleteTarget) -> Element {
    rsx! {
        button {
            r#type: "button",
            class: "btn btn-small",
            onclick: move |_| APP_STATE.write().ui.show_dialog(edit.clone()),
            "Edit"
        }
        button {
            r#type: "button",
            class: "btn btn-small btn-danger",
            onclick: move |_| {
                APP_STATE
                    .write()
                    .ui
                    .show_dialog(Dialog::ConfirmDelete(delete.clone()))
            },
            "Delete"
        }
    }
}
