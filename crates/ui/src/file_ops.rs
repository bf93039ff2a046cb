//! File Operations for Kithab
//!
//! Native file dialogs (`rfd`) for picking notes to upload and for choosing
//! where downloaded notes and archives are written.

use kithab_client::UploadFile;
use kithab_core::{PortalError, PortalResult};
use rfd::AsyncFileDialog;
use std::path::{Path, PathBuf};

// ============================================================================
// File Filter Constants
// ============================================================================

/// Extensions offered first in the upload picker
pub const NOTE_EXTENSIONS: &[&str] = &["pdf", "doc", "docx", "ppt", "pptx", "txt"];

/// Display name for the upload filter
pub const NOTE_FILE_TYPE_NAME: &str = "Notes";

// ============================================================================
// File Dialog Functions
// ============================================================================

/// Pick one or more files to upload; empty when cancelled
pub async fn show_upload_dialog() -> Vec<PathBuf> {
    AsyncFileDialog::new()
        .set_title("Select Notes")
        .add_filter(NOTE_FILE_TYPE_NAME, NOTE_EXTENSIONS)
        .add_filter("All Files", &["*"])
        .pick_files()
        .await
        .map(|files| files.iter().map(|f| f.path().to_path_buf()).collect())
        .unwrap_or_default()
}

/// Ask where to save a download, suggesting `default_name`
///
/// The returned path keeps the suggested extension even if the user
/// typed a bare name.
pub async fn show_save_dialog(default_name: &str) -> Option<PathBuf> {
    let file = AsyncFileDialog::new()
        .set_title("Save As")
        .set_file_name(default_name)
        .save_file()
        .await?;

    Some(ensure_extension(file.path().to_path_buf(), default_name))
}

// ============================================================================
// File Reading and Writing
// ============================================================================

/// Read picked files for a multipart upload
pub fn read_upload_files(paths: &[PathBuf]) -> PortalResult<Vec<UploadFile>> {
    paths.iter().map(|p| UploadFile::from_path(p)).collect()
}

/// Write downloaded bytes to disk
pub async fn write_file(path: &Path, data: &[u8]) -> PortalResult<()> {
    tokio::fs::write(path, data)
        .await
        .map_err(|e| PortalError::FileWrite {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
}

/// Ask for a location and write `data` there
pub async fn save_download(default_name: &str, data: &[u8]) -> PortalResult<PathBuf> {
    let path = show_save_dialog(default_name)
        .await
        .ok_or(PortalError::Cancelled)?;
    write_file(&path, data).await?;
    Ok(path)
}

// ============================================================================
// Utility Functions
// ============================================================================

/// Give `path` the extension of `suggested` when it has none
pub fn ensure_extension(path: PathBuf, suggested: &str) -> PathBuf {
    let wanted = Path::new(suggested).extension();
    match (path.extension(), wanted) {
        (None, Some(ext)) => path.with_extension(ext),
        _ => path,
    }
}

/// File name for display in the upload list
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("file")
        .to_string()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_extension() {
        let result = ensure_extension(PathBuf::from("/tmp/unit1"), "Unit 1.pdf");
        assert_eq!(result, PathBuf::from("/tmp/unit1.pdf"));

        let typed = PathBuf::from("/tmp/unit1.docx");
        assert_eq!(ensure_extension(typed.clone(), "Unit 1.pdf"), typed);

        let bare = PathBuf::from("/tmp/archive");
        assert_eq!(ensure_extension(bare.clone(), "notes"), bare);
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name(Path::new("/home/user/unit1.pdf")), "unit1.pdf");
    }

    #[test]
    fn test_read_upload_files() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("unit1.pdf");
        let second = dir.path().join("unit2.pptx");
        std::fs::write(&first, b"one").unwrap();
        std::fs::write(&second, b"two").unwrap();

        let files = read_upload_files(&[first, second]).unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].content_type, "application/pdf");

        assert!(read_upload_files(&[dir.path().join("missing.pdf")]).is_err());
    }

    #[test]
    fn test_write_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("All_Notes.zip");
        tokio_test::block_on(write_file(&path, &[1, 2, 3])).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), vec![1, 2, 3]);
    }
}
