//! The seam between note logic and the network
//!
//! Note queries and "download all" only need three calls. They are written
//! against this trait so they run the same over [`ApiClient`](crate::ApiClient)
//! and over in-memory fakes.

use crate::error::ClientResult;
use kithab_catalog::Note;
use kithab_core::{NoteId, SubjectId};

/// Which family of note endpoints a screen uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NoteSource {
    /// `GET /notes/subject/:id` and `GET /notes/:id`
    #[default]
    Subject,
    /// `GET /admin/notes` re-filtered locally, `GET /admin/notes/:id/file`
    Admin,
}

/// Note listing and file retrieval
#[allow(async_fn_in_trait)]
pub trait NotesBackend {
    /// Notes filed under one subject
    async fn subject_notes(&self, subject: &SubjectId) -> ClientResult<Vec<Note>>;

    /// Every note, as the admin listing returns them
    async fn admin_notes(&self) -> ClientResult<Vec<Note>>;

    /// Raw bytes of one note's file
    async fn note_file(&self, id: &NoteId, source: NoteSource) -> ClientResult<Vec<u8>>;
}
