//! Student Notes Page Component
//!
//! Pick regulation, branch, semester and subject, then search. Changing any
//! select clears the results; a search only runs once all four are chosen.

use dioxus::prelude::*;
use kithab_catalog::{Selection, SelectionEvent};
use kithab_client::{NoteQuery, NoteSource};

use crate::actions::{self, CatalogScope};
use crate::components::cascade_filter::CascadeFilter;
use crate::components::inputs::Banner;
use crate::components::notes_table::NotesTable;
use crate::state::{APP_STATE, use_revision};

/// Student note search page
#[component]
pub fn StudentNotesPage() -> Element {
    let mut selection = use_signal(Selection::new);
    let mut query = use_signal(NoteQuery::new);
    let mut prompt = use_signal(|| None::<String>);
    let mut is_downloading = use_signal(|| false);

    let revision = use_revision();
    let _catalog = use_resource(move || async move {
        revision();
        actions::load_catalog(CatalogScope::Public).await
    });

    let handle_event = move |event: SelectionEvent| {
        selection.write().dispatch(event);
        query.write().selection_changed();
        prompt.set(None);
    };

    let handle_search = move |_| {
        let ticket = match actions::begin_search(query, &selection.read()) {
            Ok(ticket) => ticket,
            Err(message) => {
                prompt.set(Some(message));
                return;
            }
        };
        prompt.set(None);
        spawn(actions::search_notes(query, ticket, NoteSource::Subject));
    };

    let handle_download_all = move |_| {
        if *is_downloading.read() {
            return;
        }
        let notes = query.read().notes().to_vec();
        is_downloading.set(true);
        spawn(async move {
            actions::download_all(notes, NoteSource::Subject).await;
            is_downloading.set(false);
        });
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
    let downloading = *is_downloading.read();

    rsx! {
        div {
            class: "page",

            div {
                class: "page-header",
                h1 { "Find Notes" }
                p { class: "muted", "Choose a subject to see the notes faculty have shared." }
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
                button {
                    r#type: "button",
                    class: "btn",
                    disabled: notes.is_empty() || downloading,
                    onclick: handle_download_all,
                    if downloading { "Downloading..." } else { "Download All" }
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
                    on_download: move |note| {
                        spawn(actions::download_note(note, NoteSource::Subject));
                    },
                }
            }
        }
    }
}
