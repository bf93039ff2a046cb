//! Faculty note upload

use kithab_catalog::{NoteFilter, Selection};
use kithab_core::{PortalError, PortalResult, UserId};
use std::path::Path;

/// One file picked for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Self {
        let name = name.into();
        Self {
            content_type: content_type_for(&name).to_string(),
            name,
            data,
        }
    }

    /// Read a file from disk
    pub fn from_path(path: &Path) -> PortalResult<Self> {
        let data = std::fs::read(path).map_err(|e| PortalError::FileRead {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "note".to_string());
        Ok(Self::new(name, data))
    }
}

/// MIME type from a file name's extension
pub fn content_type_for(name: &str) -> &'static str {
    let ext = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "ppt" => "application/vnd.ms-powerpoint",
        "pptx" => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        "txt" => "text/plain",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        _ => "application/octet-stream",
    }
}

/// A checked multipart upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub filter: NoteFilter,
    pub uploaded_by: UserId,
    pub files: Vec<UploadFile>,
}

impl UploadRequest {
    /// Check the selection and files before anything is sent
    pub fn new(
        selection: &Selection,
        uploaded_by: UserId,
        files: Vec<UploadFile>,
    ) -> PortalResult<Self> {
        let filter = selection.tuple().ok_or(PortalError::IncompleteSelection)?;
        if files.is_empty() {
            return Err(PortalError::validation("Please select file(s)"));
        }
        Ok(Self {
            filter,
            uploaded_by,
            files,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kithab_catalog::SelectionEvent;

    fn selection() -> Selection {
        Selection::new()
            .apply(SelectionEvent::regulation("r1"))
            .apply(SelectionEvent::branch("b1"))
            .apply(SelectionEvent::semester("2"))
            .apply(SelectionEvent::subject("s1"))
    }

    #[test]
    fn test_incomplete_selection_refused() {
        let partial = selection().apply(SelectionEvent::semester("3"));
        let err = UploadRequest::new(&partial, "f1".into(), vec![UploadFile::new("a.pdf", vec![1])])
            .unwrap_err();
        assert_eq!(err.to_string(), "Please select all fields");
    }

    #[test]
    fn test_files_required() {
        let err = UploadRequest::new(&selection(), "f1".into(), Vec::new()).unwrap_err();
        assert_eq!(err.to_string(), "Validation error: Please select file(s)");
    }

    #[test]
    fn test_content_types() {
        assert_eq!(UploadFile::new("Unit1.PDF", vec![]).content_type, "application/pdf");
        assert_eq!(content_type_for("notes"), "application/octet-stream");
    }

    #[test]
    fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("unit1.docx");
        std::fs::write(&path, b"doc").unwrap();
        let file = UploadFile::from_path(&path).unwrap();
        assert_eq!(file.name, "unit1.docx");
        assert_eq!(file.data, b"doc");
        assert!(UploadFile::from_path(&dir.path().join("missing.pdf")).is_err());
    }
}
