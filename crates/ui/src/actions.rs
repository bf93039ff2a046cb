//! Backend operations shared by several screens
//!
//! Each function takes its client from [`api_client`], sends the request and
//! routes the outcome through [`settle`], so banners and the `401` logout
//! behave the same wherever the call came from.

use dioxus::prelude::*;
use kithab_catalog::{Catalog, Note, Selection};
use kithab_client::{
    ClientResult, FETCH_FAILED, NoteQuery, NoteSource, NotesBackend, QueryTicket, build_archive,
    fetch_notes,
};
use kithab_core::PortalError;
use tracing::{debug, info};

use crate::file_ops;
use crate::state::{APP_STATE, DeleteTarget, StatusLevel, api_client, mutation_done, notify, settle};

/// Which metadata endpoints a screen reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogScope {
    /// `/meta/*`, open to every role
    Public,
    /// `/admin/*`, for the taxonomy manager
    Admin,
}

/// Fetch the three metadata lists concurrently into the global cache
pub async fn load_catalog(scope: CatalogScope) -> Option<Catalog> {
    let result = match api_client() {
        Ok(api) => match scope {
            CatalogScope::Public => api.catalog().await,
            CatalogScope::Admin => api.admin_catalog().await,
        },
        Err(e) => Err(e),
    };
    let catalog = settle(result, "Failed to load regulations, branches and subjects")?;
    debug!(
        regulations = catalog.regulations.len(),
        branches = catalog.branches.len(),
        subjects = catalog.subjects.len(),
        "catalog loaded"
    );
    APP_STATE.write().catalog = catalog.clone();
    Some(catalog)
}

/// Start a search on a screen's query. An incomplete selection is
/// refused with the prompt text and nothing is sent.
pub fn begin_search(mut query: Signal<NoteQuery>, selection: &Selection) -> Result<QueryTicket, String> {
    query.write().begin(selection).map_err(|e| e.to_string())
}

/// Fetch the notes for a started search and commit them. A search the
/// user has since moved away from is dropped by the query.
pub async fn search_notes(mut query: Signal<NoteQuery>, ticket: QueryTicket, source: NoteSource) {
    let result = match api_client() {
        Ok(api) => fetch_notes(&api, source, &ticket.filter).await,
        Err(e) => Err(e),
    };
    match result {
        Ok(notes) => {
            let count = notes.len();
            if query.write().commit(&ticket, Ok(notes)) {
                debug!(count, generation = ticket.generation, "notes loaded");
            }
        }
        Err(e) => {
            query.write().fail(&ticket, &e);
            if e.is_unauthorized() {
                settle::<()>(Err(e), FETCH_FAILED);
            }
        }
    }
}

async fn send_delete(target: &DeleteTarget) -> ClientResult<()> {
    let api = api_client()?;
    match target {
        DeleteTarget::Regulation(id) => api.delete_regulation(id).await,
        DeleteTarget::Branch(id) => api.delete_branch(id).await,
        DeleteTarget::Subject(id) => api.delete_subject(id).await,
        DeleteTarget::Note { id, .. } => api.delete_note(id).await,
        DeleteTarget::User { id, .. } => api.delete_user(id).await,
    }
}

/// Delete a confirmed target; `true` on success
pub async fn delete_record(target: DeleteTarget) -> bool {
    let result = send_delete(&target).await;
    if settle(result, target.failure_message()).is_none() {
        return false;
    }
    info!(kind = target.kind(), "record deleted");
    mutation_done(format!("{} deleted", target.kind()));
    true
}

/// Download one note and ask where to keep it
pub async fn download_note(note: Note, source: NoteSource) {
    let result = match api_client() {
        Ok(api) => api.note_file(&note.id, source).await,
        Err(e) => Err(e),
    };
    let Some(data) = settle(result, "Failed to download file") else {
        return;
    };
    match file_ops::save_download(&note.download_name(), &data).await {
        Ok(path) => notify(format!("Saved {}", path.display()), StatusLevel::Success),
        Err(PortalError::Cancelled) => debug!("download save cancelled"),
        Err(e) => notify(e.to_string(), StatusLevel::Error),
    }
}

/// Bundle every listed note into one zip and ask where to keep it
pub async fn download_all(notes: Vec<Note>, source: NoteSource) {
    let (policy, archive_name) = {
        let state = APP_STATE.peek();
        (state.config.download_policy, state.config.archive_name.clone())
    };
    let result = match api_client() {
        Ok(api) => build_archive(&api, &notes, source, policy).await,
        Err(e) => Err(e),
    };
    let Some(report) = settle(result, "Failed to download notes") else {
        return;
    };

    let skipped = report.skipped().count();
    match file_ops::save_download(&archive_name, &report.bytes).await {
        Ok(path) if skipped > 0 => notify(
            format!(
                "Saved {} ({} of {} notes could not be downloaded)",
                path.display(),
                skipped,
                notes.len()
            ),
            StatusLevel::Warning,
        ),
        Ok(path) => notify(format!("Saved {}", path.display()), StatusLevel::Success),
        Err(PortalError::Cancelled) => debug!("archive save cancelled"),
        Err(e) => notify(e.to_string(), StatusLevel::Error),
    }
}
