//! Note search state machine
//!
//! ```text
//! Idle --submit(complete)--> Loading{generation} --> Success | Failed
//!   ^                                                    |
//!   +---------------- selection change ------------------+
//! ```
//!
//! Every submit and every selection change bumps the generation. A response
//! is only committed while its ticket still matches the current generation
//! and filter; anything else is a late answer to a question nobody is asking
//! any more and is dropped.

use crate::backend::{NoteSource, NotesBackend};
use crate::error::{ClientError, ClientResult};
use kithab_catalog::{Note, NoteFilter, Selection};
use kithab_core::PortalError;
use tracing::{debug, warn};

/// Banner text when a note listing fails without a server message
pub const FETCH_FAILED: &str = "Failed to fetch notes";

/// Where the search currently stands
#[derive(Debug, Clone, PartialEq, Default)]
pub enum QueryState {
    #[default]
    Idle,
    Loading { generation: u64 },
    Success(Vec<Note>),
    Failed(String),
}

/// Proof of which submit a response answers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTicket {
    pub generation: u64,
    pub filter: NoteFilter,
}

/// Note search for one screen
#[derive(Debug, Clone, Default)]
pub struct NoteQuery {
    state: QueryState,
    generation: u64,
    filter: Option<NoteFilter>,
}

impl NoteQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &QueryState {
        &self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, QueryState::Loading { .. })
    }

    /// Notes of the last successful search, empty otherwise
    pub fn notes(&self) -> &[Note] {
        match &self.state {
            QueryState::Success(notes) => notes,
            _ => &[],
        }
    }

    /// Whether a search has completed, even with no results
    pub fn searched(&self) -> bool {
        matches!(self.state, QueryState::Success(_))
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            QueryState::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// The selection moved: drop results and invalidate in-flight requests
    pub fn selection_changed(&mut self) {
        self.generation += 1;
        self.filter = None;
        self.state = QueryState::Idle;
    }

    /// Start a search. An incomplete selection is refused without touching
    /// the network and leaves the query idle.
    pub fn begin(&mut self, selection: &Selection) -> Result<QueryTicket, PortalError> {
        let Some(filter) = selection.tuple() else {
            self.state = QueryState::Idle;
            return Err(PortalError::IncompleteSelection);
        };
        self.generation += 1;
        self.filter = Some(filter.clone());
        self.state = QueryState::Loading {
            generation: self.generation,
        };
        debug!(generation = self.generation, "note query started");
        Ok(QueryTicket {
            generation: self.generation,
            filter,
        })
    }

    /// Whether a response for `ticket` may still be committed
    pub fn is_current(&self, ticket: &QueryTicket) -> bool {
        ticket.generation == self.generation && self.filter.as_ref() == Some(&ticket.filter)
    }

    /// Record a response. Returns `false` when the ticket is stale and the
    /// response was dropped.
    pub fn commit(&mut self, ticket: &QueryTicket, result: ClientResult<Vec<Note>>) -> bool {
        match result {
            Ok(notes) => self.settle(ticket, QueryState::Success(notes)),
            Err(e) => self.fail(ticket, &e),
        }
    }

    /// Record a failure without giving up the error
    pub fn fail(&mut self, ticket: &QueryTicket, error: &ClientError) -> bool {
        self.settle(ticket, QueryState::Failed(error.user_message(FETCH_FAILED)))
    }

    fn settle(&mut self, ticket: &QueryTicket, state: QueryState) -> bool {
        if !self.is_current(ticket) {
            warn!(
                ticket = ticket.generation,
                current = self.generation,
                "discarding stale note response"
            );
            return false;
        }
        self.state = state;
        true
    }
}

/// Fetch the notes filed under `filter` from either endpoint family.
///
/// Both paths go through [`NoteFilter::apply`], so they always agree.
pub async fn fetch_notes<B: NotesBackend>(
    backend: &B,
    source: NoteSource,
    filter: &NoteFilter,
) -> ClientResult<Vec<Note>> {
    let notes = match source {
        NoteSource::Subject => backend.subject_notes(&filter.subject).await?,
        NoteSource::Admin => backend.admin_notes().await?,
    };
    Ok(filter.apply(notes))
}

/// Begin, fetch and commit in one go
pub async fn run_query<'q, B: NotesBackend>(
    query: &'q mut NoteQuery,
    backend: &B,
    source: NoteSource,
    selection: &Selection,
) -> ClientResult<&'q [Note]> {
    let ticket = query.begin(selection)?;
    match fetch_notes(backend, source, &ticket.filter).await {
        Ok(notes) => {
            query.commit(&ticket, Ok(notes));
            Ok(query.notes())
        }
        Err(e) => {
            query.fail(&ticket, &e);
            Err(e)
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use kithab_catalog::SelectionEvent;
    use kithab_core::{NoteId, SubjectId};
    use std::cell::Cell;
    use std::collections::HashMap;

    /// In-memory backend that counts calls
    #[derive(Default)]
    pub(crate) struct FakeBackend {
        pub notes: Vec<Note>,
        pub files: HashMap<NoteId, Vec<u8>>,
        pub fail_status: Option<u16>,
        pub calls: Cell<usize>,
    }

    impl NotesBackend for FakeBackend {
        async fn subject_notes(&self, subject: &SubjectId) -> ClientResult<Vec<Note>> {
            self.calls.set(self.calls.get() + 1);
            if let Some(status) = self.fail_status {
                return Err(ClientError::from_status(status, None));
            }
            Ok(self
                .notes
                .iter()
                .filter(|n| &n.subject_id == subject)
                .cloned()
                .collect())
        }

        async fn admin_notes(&self) -> ClientResult<Vec<Note>> {
            self.calls.set(self.calls.get() + 1);
            if let Some(status) = self.fail_status {
                return Err(ClientError::from_status(status, None));
            }
            Ok(self.notes.clone())
        }

        async fn note_file(&self, id: &NoteId, _source: NoteSource) -> ClientResult<Vec<u8>> {
            self.calls.set(self.calls.get() + 1);
            if let Some(status) = self.fail_status {
                return Err(ClientError::from_status(status, None));
            }
            self.files
                .get(id)
                .cloned()
                .ok_or_else(|| ClientError::from_status(404, Some("File not found".to_string())))
        }
    }

    pub(crate) fn filter() -> NoteFilter {
        NoteFilter {
            regulation: "r1".into(),
            branch: "b1".into(),
            semester: 3,
            subject: "s1".into(),
        }
    }

    fn complete() -> Selection {
        Selection::from(filter())
    }

    pub(crate) fn sample_notes() -> Vec<Note> {
        let mut other_semester = Note::new("n3", "Old syllabus", &filter());
        other_semester.semester = 5;
        vec![
            Note::new("n1", "Unit 1", &filter()),
            Note::new("n2", "Unit 2", &filter()).with_filename("unit2.docx"),
            other_semester,
        ]
    }

    #[tokio::test]
    async fn test_incomplete_selection_never_calls_backend() {
        let backend = FakeBackend::default();
        let mut query = NoteQuery::new();
        let partial = complete().apply(SelectionEvent::semester("3"));

        let err = run_query(&mut query, &backend, NoteSource::Subject, &partial)
            .await
            .unwrap_err();
        assert_eq!(err.user_message(FETCH_FAILED), "Please select all fields");
        assert_eq!(backend.calls.get(), 0);
        assert_eq!(query.state(), &QueryState::Idle);
    }

    #[tokio::test]
    async fn test_both_sources_agree() {
        let backend = FakeBackend {
            notes: sample_notes(),
            ..Default::default()
        };
        let by_subject = fetch_notes(&backend, NoteSource::Subject, &filter()).await.unwrap();
        let by_admin = fetch_notes(&backend, NoteSource::Admin, &filter()).await.unwrap();
        assert_eq!(by_subject, by_admin);
        assert_eq!(by_subject.len(), 2);
    }

    #[tokio::test]
    async fn test_success_then_selection_change_resets() {
        let backend = FakeBackend {
            notes: sample_notes(),
            ..Default::default()
        };
        let mut query = NoteQuery::new();
        let notes = run_query(&mut query, &backend, NoteSource::Subject, &complete())
            .await
            .unwrap();
        assert_eq!(notes.len(), 2);
        assert!(query.searched());

        query.selection_changed();
        assert_eq!(query.state(), &QueryState::Idle);
        assert!(query.notes().is_empty());
    }

    #[tokio::test]
    async fn test_failure_message() {
        let backend = FakeBackend {
            fail_status: Some(500),
            ..Default::default()
        };
        let mut query = NoteQuery::new();
        assert!(run_query(&mut query, &backend, NoteSource::Admin, &complete()).await.is_err());
        assert_eq!(query.error(), Some(FETCH_FAILED));
    }

    #[tokio::test]
    async fn test_unauthorized_surfaces_as_unauthorized() {
        let backend = FakeBackend {
            fail_status: Some(401),
            ..Default::default()
        };
        let mut query = NoteQuery::new();
        let err = run_query(&mut query, &backend, NoteSource::Subject, &complete())
            .await
            .unwrap_err();
        assert!(err.is_unauthorized());
    }

    #[test]
    fn test_stale_responses_discarded() {
        let mut query = NoteQuery::new();
        let first = query.begin(&complete()).unwrap();
        let second = query.begin(&complete()).unwrap();

        assert!(!query.commit(&first, Ok(sample_notes())));
        assert!(query.is_loading());
        assert!(query.commit(&second, Ok(Vec::new())));
        assert!(query.searched());

        let third = query.begin(&complete()).unwrap();
        query.selection_changed();
        assert!(!query.commit(&third, Ok(sample_notes())));
        assert_eq!(query.state(), &QueryState::Idle);
    }
}
