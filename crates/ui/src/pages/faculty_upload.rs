//! Faculty Upload Page Component
//!
//! Upload one or more files under a regulation, branch, semester and
//! subject, and list what this faculty member has uploaded so far.

use dioxus::prelude::*;
use kithab_catalog::{Note, Selection, SelectionEvent};
use kithab_client::{ClientError, NoteSource, UploadRequest};
use kithab_core::PortalError;
use std::path::PathBuf;
use tracing::info;

use crate::actions::{self, CatalogScope};
use crate::components::cascade_filter::CascadeFilter;
use crate::components::inputs::Banner;
use crate::components::notes_table::NotesTable;
use crate::file_ops;
use crate::state::{APP_STATE, api_client, mutation_done, settle, use_revision};

/// Label for the chosen files
pub fn files_summary(paths: &[PathBuf]) -> String {
    match paths {
        [] => "No files chosen".to_string(),
        [one] => file_ops::display_name(one),
        many => format!("{} files chosen", many.len()),
    }
}

/// Faculty upload page
#[component]
pub fn FacultyUploadPage() -> Element {
    let mut selection = use_signal(Selection::new);
    let mut paths = use_signal(Vec::<PathBuf>::new);
    let mut error = use_signal(|| None::<String>);
    let mut is_uploading = use_signal(|| false);

    let revision = use_revision();
    let _catalog = use_resource(move || async move {
        revision();
        actions::load_catalog(CatalogScope::Public).await
    });
    let uploads = use_resource(move || async move {
        revision();
        let result = match api_client() {
            Ok(api) => api.my_uploads().await,
            Err(e) => Err(e),
        };
        settle(result, "Failed to fetch uploads").unwrap_or_default()
    });

    let handle_event = move |event: SelectionEvent| {
        selection.write().dispatch(event);
        error.set(None);
    };

    let handle_choose = move |_| {
        spawn(async move {
            let chosen = file_ops::show_upload_dialog().await;
            if !chosen.is_empty() {
                paths.set(chosen);
                error.set(None);
            }
        });
    };

    let handle_upload = move |_| {
        if *is_uploading.read() {
            return;
        }
        let current = selection.read().clone();
        if !current.is_complete() {
            error.set(Some(PortalError::IncompleteSelection.to_string()));
            return;
        }
        let Some(user_id) = APP_STATE.peek().session.user_id().cloned() else {
            error.set(Some(PortalError::NotAuthenticated.to_string()));
            return;
        };
        let chosen = paths.read().clone();
        error.set(None);
        is_uploading.set(true);

        spawn(async move {
            let result = file_ops::read_upload_files(&chosen)
                .and_then(|files| UploadRequest::new(&current, user_id, files))
                .map_err(ClientError::from);
            let result = match (result, api_client()) {
                (Ok(request), Ok(api)) => {
                    let count = request.files.len();
                    api.upload(&request).await.map(|()| count)
                }
                (Err(e), _) | (_, Err(e)) => Err(e),
            };
            match result {
                Ok(count) => {
                    info!(files = count, "notes uploaded");
                    selection.set(Selection::new());
                    paths.set(Vec::new());
                    mutation_done(format!("Uploaded {} file(s)", count));
                }
                Err(e) if e.is_validation() => error.set(Some(e.user_message("Failed to upload"))),
                Err(e) => {
                    let message = e.user_message("Failed to upload");
                    settle::<()>(Err(e), "Failed to upload");
                    error.set(Some(message));
                }
            }
            is_uploading.set(false);
        });
    };

    let catalog = APP_STATE.read().catalog.clone();
    let current = selection.read().clone();
    let uploading = *is_uploading.read();
    let chosen = files_summary(&paths.read());
    let my_notes: Option<Vec<Note>> = uploads.read().clone();

    rsx! {
        div {
            class: "page",

            div {
                class: "page-header",
                h1 { "Upload Notes" }
                p { class: "muted", "Share notes with students of a subject." }
            }

            section {
                class: "card",
                CascadeFilter {
                    catalog: catalog.clone(),
                    selection: current,
                    on_event: handle_event,
                    disabled: uploading,
                }

                div {
                    class: "file-picker",
                    button {
                        r#type: "button",
                        class: "btn",
                        disabled: uploading,
                        onclick: handle_choose,
                        "Choose Files"
                    }
                    span { class: "muted", "{chosen}" }
                }

                Banner { message: error.read().clone() }

                button {
                    r#type: "button",
                    class: "btn btn-primary",
                    disabled: uploading,
                    onclick: handle_upload,
                    if uploading { "Uploading..." } else { "Upload" }
                }
            }

            section {
                class: "card",
                h2 { "My Uploads" }
                match my_notes {
                    None => rsx! { p { class: "muted", "Loading uploads..." } },
                    Some(notes) => rsx! {
                        NotesTable {
                            notes: notes,
                            catalog: catalog,
                            on_download: move |note| {
                                spawn(actions::download_note(note, NoteSource::Subject));
                            },
                        }
                    },
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_files_summary() {
        assert_eq!(files_summary(&[]), "No files chosen");
        assert_eq!(files_summary(&[PathBuf::from("/tmp/unit1.pdf")]), "unit1.pdf");
        assert_eq!(
            files_summary(&[PathBuf::from("a.pdf"), PathBuf::from("b.pdf")]),
            "2 files chosen"
        );
    }
}
