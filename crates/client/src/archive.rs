//! "Download all": bundle every listed note into one zip archive
//!
//! Files are fetched one after another so the archive's entry order is the
//! order of the listing. Entry names are `<title>.<ext>`, numbered when two
//! notes would collide.

use crate::backend::{NoteSource, NotesBackend};
use crate::config::DownloadPolicy;
use crate::error::{ClientError, ClientResult};
use kithab_catalog::Note;
use kithab_core::{NoteId, PortalError};
use std::collections::HashSet;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Result of fetching one note for the archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    Added { id: NoteId, entry: String },
    Skipped { id: NoteId, title: String, reason: String },
}

impl ItemOutcome {
    pub fn is_added(&self) -> bool {
        matches!(self, Self::Added { .. })
    }
}

/// A finished archive and what went into it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveReport {
    /// Zip file contents
    pub bytes: Vec<u8>,
    /// One outcome per note, in listing order
    pub outcomes: Vec<ItemOutcome>,
}

impl ArchiveReport {
    /// Entry names actually written, in order
    pub fn entries(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter_map(|o| match o {
                ItemOutcome::Added { entry, .. } => Some(entry.as_str()),
                ItemOutcome::Skipped { .. } => None,
            })
            .collect()
    }

    pub fn skipped(&self) -> impl Iterator<Item = &ItemOutcome> {
        self.outcomes.iter().filter(|o| !o.is_added())
    }

    /// Write the archive to disk
    pub fn save(&self, path: &Path) -> ClientResult<()> {
        std::fs::write(path, &self.bytes).map_err(|e| {
            PortalError::FileWrite {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
            .into()
        })
    }
}

/// Hands out entry names, numbering repeats: `Unit 1.pdf`, `Unit 1 (2).pdf`
#[derive(Debug, Default)]
struct EntryNames {
    taken: HashSet<String>,
}

impl EntryNames {
    fn claim(&mut self, note: &Note) -> String {
        let name = note.download_name();
        if self.taken.insert(name.to_lowercase()) {
            return name;
        }
        let (stem, ext) = name.rsplit_once('.').unwrap_or((name.as_str(), ""));
        let mut n = 2;
        loop {
            let candidate = if ext.is_empty() {
                format!("{} ({})", stem, n)
            } else {
                format!("{} ({}).{}", stem, n, ext)
            };
            if self.taken.insert(candidate.to_lowercase()) {
                return candidate;
            }
            n += 1;
        }
    }
}

/// Fetch one note and write it into `dir` as `<title>.<ext>`
pub async fn download_to<B: NotesBackend>(
    backend: &B,
    note: &Note,
    source: NoteSource,
    dir: &Path,
) -> ClientResult<PathBuf> {
    let data = backend.note_file(&note.id, source).await?;
    let path = dir.join(note.download_name());
    std::fs::write(&path, data).map_err(|e| PortalError::FileWrite {
        path: path.clone(),
        message: e.to_string(),
    })?;
    info!(note = %note.id, path = %path.display(), "note downloaded");
    Ok(path)
}

fn zip_error(e: impl std::fmt::Display) -> ClientError {
    ClientError::Archive(e.to_string())
}

/// Fetch every note's file and bundle them.
///
/// Under [`DownloadPolicy::AllOrNothing`] the first failure aborts and no
/// archive is produced. Under [`DownloadPolicy::PerItem`] failed notes are
/// skipped and reported. An unauthorized response aborts under either.
pub async fn build_archive<B: NotesBackend>(
    backend: &B,
    notes: &[Note],
    source: NoteSource,
    policy: DownloadPolicy,
) -> ClientResult<ArchiveReport> {
    if notes.is_empty() {
        return Err(PortalError::validation("No notes to download").into());
    }

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let opts = FileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut names = EntryNames::default();
    let mut outcomes = Vec::with_capacity(notes.len());

    for note in notes {
        let data = match backend.note_file(&note.id, source).await {
            Ok(data) => data,
            Err(e) if e.is_unauthorized() => return Err(e),
            Err(e) => match policy {
                DownloadPolicy::AllOrNothing => return Err(e),
                DownloadPolicy::PerItem => {
                    warn!(note = %note.id, error = %e, "skipping note in archive");
                    outcomes.push(ItemOutcome::Skipped {
                        id: note.id.clone(),
                        title: note.title.clone(),
                        reason: e.user_message("Failed to download file"),
                    });
                    continue;
                }
            },
        };
        let entry = names.claim(note);
        zip.start_file(entry.as_str(), opts).map_err(zip_error)?;
        zip.write_all(&data).map_err(zip_error)?;
        outcomes.push(ItemOutcome::Added {
            id: note.id.clone(),
            entry,
        });
    }

    if !outcomes.iter().any(ItemOutcome::is_added) {
        return Err(ClientError::Archive("None of the notes could be downloaded".to_string()));
    }

    let bytes = zip.finish().map_err(zip_error)?.into_inner();
    info!(
        added = outcomes.iter().filter(|o| o.is_added()).count(),
        total = notes.len(),
        "notes archive built"
    );
    Ok(ArchiveReport { bytes, outcomes })
}
