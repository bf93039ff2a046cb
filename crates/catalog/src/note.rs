//! Uploaded notes and the four-way filter that selects them

use crate::wire::{Embedded, RawRef, deserialize_semester, deserialize_timestamp};
use chrono::{DateTime, Utc};
use kithab_core::{BranchId, Identified, NoteId, RegulationId, Semester, SubjectId, UserId};
use serde::{Deserialize, Serialize};

/// Extension used when a note carries no usable filename
pub const DEFAULT_EXTENSION: &str = "pdf";

/// An uploaded note file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "NoteWire")]
pub struct Note {
    #[serde(rename = "_id")]
    pub id: NoteId,

    pub title: String,

    #[serde(rename = "regulation")]
    pub regulation_id: RegulationId,

    #[serde(rename = "branch")]
    pub branch_id: BranchId,

    #[serde(rename = "subject")]
    pub subject_id: SubjectId,

    pub semester: Semester,

    /// Uploading faculty member
    #[serde(rename = "uploadedBy", skip_serializing_if = "Option::is_none")]
    pub uploaded_by: Option<UserId>,

    /// Uploader details when populated (name, email, employee id, ...)
    #[serde(skip)]
    pub uploader: Option<Embedded>,

    #[serde(skip)]
    pub regulation_summary: Option<Embedded>,

    #[serde(skip)]
    pub branch_summary: Option<Embedded>,

    #[serde(skip)]
    pub subject_summary: Option<Embedded>,

    #[serde(rename = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    /// Original upload filename
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,

    #[serde(rename = "contentType", skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

impl Note {
    /// Create a note record with no optional data
    pub fn new(id: impl Into<NoteId>, title: impl Into<String>, filter: &NoteFilter) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            regulation_id: filter.regulation.clone(),
            branch_id: filter.branch.clone(),
            subject_id: filter.subject.clone(),
            semester: filter.semester,
            uploaded_by: None,
            uploader: None,
            regulation_summary: None,
            branch_summary: None,
            subject_summary: None,
            created_at: None,
            filename: None,
            content_type: None,
        }
    }

    /// Set the original filename
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// File extension taken from the original filename, `pdf` otherwise
    pub fn extension(&self) -> &str {
        self.filename
            .as_deref()
            .and_then(|name| name.rsplit_once('.'))
            .map(|(stem, ext)| (stem, ext.trim()))
            .filter(|(stem, ext)| !stem.is_empty() && !ext.is_empty())
            .map(|(_, ext)| ext)
            .unwrap_or(DEFAULT_EXTENSION)
    }

    /// Name the note is saved under: `<title>.<ext>`
    pub fn download_name(&self) -> String {
        let title = self.title.trim();
        let title = if title.is_empty() { "note" } else { title };
        format!("{}.{}", sanitize_file_stem(title), self.extension())
    }

    /// Name of the uploading faculty member, when known
    pub fn uploader_name(&self) -> Option<&str> {
        self.uploader.as_ref().and_then(|u| u.name.as_deref())
    }

    /// The tuple this note is filed under
    pub fn filter(&self) -> NoteFilter {
        NoteFilter {
            regulation: self.regulation_id.clone(),
            branch: self.branch_id.clone(),
            semester: self.semester,
            subject: self.subject_id.clone(),
        }
    }
}

impl Identified for Note {
    type Id = NoteId;

    fn id(&self) -> &NoteId {
        &self.id
    }
}

fn sanitize_file_stem(stem: &str) -> String {
    stem.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

/// A fully specified (regulation, branch, semester, subject) tuple
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NoteFilter {
    pub regulation: RegulationId,
    pub branch: BranchId,
    pub semester: Semester,
    pub subject: SubjectId,
}

impl NoteFilter {
    /// Whether a note is filed under exactly this tuple
    pub fn matches(&self, note: &Note) -> bool {
        note.regulation_id == self.regulation
            && note.branch_id == self.branch
            && note.semester == self.semester
            && note.subject_id == self.subject
    }

    /// Keep only the notes filed under this tuple, preserving order
    pub fn apply(&self, notes: impl IntoIterator<Item = Note>) -> Vec<Note> {
        notes.into_iter().filter(|n| self.matches(n)).collect()
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NoteWire {
    #[serde(rename = "_id", alias = "id")]
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    regulation: Option<RawRef>,
    #[serde(default)]
    branch: Option<RawRef>,
    #[serde(default)]
    subject: Option<RawRef>,
    #[serde(default, deserialize_with = "deserialize_semester")]
    semester: Semester,
    #[serde(default)]
    uploaded_by: Option<RawRef>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    created_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "fileName", alias = "originalName")]
    filename: Option<String>,
    #[serde(default, alias = "mimeType")]
    content_type: Option<String>,
}

fn split<I: From<String> + Default>(raw: Option<RawRef>) -> (I, Option<Embedded>) {
    raw.map(RawRef::into_parts).unwrap_or_default()
}

impl From<NoteWire> for Note {
    fn from(wire: NoteWire) -> Self {
        let (regulation_id, regulation_summary) = split(wire.regulation);
        let (branch_id, branch_summary) = split(wire.branch);
        let (subject_id, subject_summary) = split(wire.subject);
        let (uploaded_by, uploader) = match wire.uploaded_by {
            Some(raw) => {
                let (id, summary) = raw.into_parts::<UserId>();
                (Some(id), summary)
            }
            None => (None, None),
        };
        Self {
            id: NoteId::new(wire.id),
            title: wire.title,
            regulation_id,
            branch_id,
            subject_id,
            semester: wire.semester,
            uploaded_by,
            uploader,
            regulation_summary,
            branch_summary,
            subject_summary,
            created_at: wire.created_at,
            filename: wire.filename.filter(|f| !f.trim().is_empty()),
            content_type: wire.content_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn filter() -> NoteFilter {
        NoteFilter {
            regulation: "r1".into(),
            branch: "b1".into(),
            semester: 3,
            subject: "s1".into(),
        }
    }

    #[test]
    fn test_download_name_extension() {
        let note = Note::new("n1", "Unit 1", &filter());
        assert_eq!(note.download_name(), "Unit 1.pdf");

        let note = note.with_filename("unit1-slides.PPTX");
        assert_eq!(note.download_name(), "Unit 1.PPTX");

        let dotfile = Note::new("n2", "Hidden", &filter()).with_filename(".bashrc");
        assert_eq!(dotfile.download_name(), "Hidden.pdf");
    }

    #[test]
    fn test_download_name_replaces_path_separators() {
        let note = Note::new("n1", "Ch 1/2: Intro", &filter());
        assert_eq!(note.download_name(), "Ch 1_2_ Intro.pdf");
    }

    #[test]
    fn test_populated_and_raw_notes_filter_alike() {
        let raw: Note = serde_json::from_value(json!({
            "_id": "n1",
            "title": "Unit 1",
            "regulation": "r1",
            "branch": "b1",
            "subject": "s1",
            "semester": 3,
            "uploadedBy": "f1"
        }))
        .unwrap();
        let populated: Note = serde_json::from_value(json!({
            "_id": "n2",
            "title": "Unit 2",
            "regulation": { "_id": "r1", "name": "R2021" },
            "branch": { "_id": "b1", "name": "CSE", "code": "CS" },
            "subject": { "_id": "s1", "name": "DS" },
            "semester": "3",
            "uploadedBy": { "_id": "f1", "name": "Dr. Rao", "email": "rao@college.edu" },
            "createdAt": "2024-03-01T09:00:00Z"
        }))
        .unwrap();

        assert!(filter().matches(&raw));
        assert!(filter().matches(&populated));
        assert_eq!(raw.uploaded_by, populated.uploaded_by);
        assert_eq!(populated.uploader_name(), Some("Dr. Rao"));
        assert_eq!(raw.filter(), populated.filter());
    }

    #[test]
    fn test_filter_requires_every_component() {
        let base = Note::new("n1", "Unit 1", &filter());
        let mut other_semester = base.clone();
        other_semester.semester = 4;
        let mut other_subject = base.clone();
        other_subject.subject_id = "s2".into();

        let kept = filter().apply(vec![other_semester, base.clone(), other_subject]);
        assert_eq!(kept, vec![base]);
    }
}
