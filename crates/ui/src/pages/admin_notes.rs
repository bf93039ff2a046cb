//! Admin Notes Page Component
//!
//! The full note listing narrowed by the same four selects students use.
//! Admins see who uploaded each note and can download or delete it.

use dioxus::prelude::*;
use kithab_catalog::{Note, Selection, SelectionEvent};
use kithab_client::{NoteQuery, NoteSource};

use crate::actions::{self, CatalogScope};
use crate::components::cascade_filter::CascadeFilter;
use crate::components::inputs::Banner;
use crate::components::notes_table::NotesTable;
use crate::state::{APP_STATE, DeleteTarget, Dialog, use_revision};

/// Confirmation target for deleting a note
pub fn note_delete_target(note: &Note) -> DeleteTarget {
    DeleteTarget::Note {
        id: note.id.clone(),
        title: note.title.clone(),
    }
}

/// Admin note manager
#[component]
pub fn AdminNotesPage() -> Element {
    let mut selection = use_signal(Selection::new);
    let mut query = use_signal(NoteQuery::new);
    let mut prompt = use_signal(|| None::<String>);

    let revision = use_revision();
    let _catalog = use_resource(move || async move {
        revision();
        actions::load_catalog(CatalogScope::Admin).await
    });

    // Deleting a note moves the revision; list the same subject again.
    use_effect(move || {
        revision();
        if !query.peek().searched() {
            return;
        }
        let current = selection.peek().clone();
        if let Ok(ticket) = actions::begin_search(query, &current) {
            spawn(actions::search_notes(query, ticket, NoteSource::Admin));
        }
    });

    let handle_event = move |event: SelectionEvent| {
        selection.write().dispatch(event);
        query.write().selection_changed();
        prompt.set(None);
    };

    let handle_search = move |_| {
        match actions::begin_search(query, &selection.read()) {
            Ok(ticket) => {
                prompt.set(None);
                spawn(actions::search_notes(query, ticket, NoteSource::Admin));
            }
            Err(message) => prompt.set(Some(message)),
        }
    };

    let catalog = APP_STATE.read().catalog.clone();
    let current = selection.read().clone();
    let (loading, searched, notes, error) = {
        let q = query.read();
        (
            q.is_loading(),
            q.searched(),
            q.notes().to_vec(),
            q.error().map(str::to_string),
        )
    };

    rsx! {
        div {
            class: "page",

            div {
                class: "page-header",
                h1 { "Notes" }
            }

            CascadeFilter {
                catalog: catalog.clone(),
                selection: current,
                on_event: handle_event,
                disabled: loading,
            }

            div {
                class: "page-actions",
                button {
                    r#type: "button",
                    class: "btn btn-primary",
                    disabled: loading,
                    onclick: handle_search,
                    if loading { "Searching..." } else { "Search" }
                }
            }

            Banner { message: prompt.read().clone() }
            Banner { message: error }

            if loading {
                p { class: "muted", "Loading notes..." }
            } else if searched {
                NotesTable {
                    notes: notes,
                    catalog: catalog,
                    show_uploader: true,
                    on_download: move |note| {
                        spawn(actions::download_note(note, NoteSource::Admin));
                    },
                    on_delete: move |note: Note| {
                        APP_STATE
                            .write()
                            .ui
                            .show_dialog(Dialog::ConfirmDelete(note_delete_target(&note)))
                    },
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kithab_catalog::NoteFilter;

    #[test]
    fn test_note_delete_target() {
        let filter = NoteFilter {
            regulation: "r1".into(),
            branch: "b1".into(),
            semester: 3,
            subject: "s1".into(),
        };
        let note = Note::new("n1", "Unit 1", &filter);
        let target = note_delete_target(&note);
        assert_eq!(target.kind(), "Note");
        assert_eq!(
            target,
            DeleteTarget::Note {
                id: "n1".into(),
                title: "Unit 1".to_string(),
            }
        );
    }
}
