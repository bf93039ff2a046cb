//! Note search, download and upload commands

use anyhow::{Result, bail};
use kithab_catalog::{Catalog, Note, NoteFilter, Selection};
use kithab_client::query::FETCH_FAILED;
use kithab_client::{
    DownloadPolicy, NoteQuery, NoteSource, UploadFile, UploadRequest, build_archive, download_to,
    fetch_notes, run_query,
};
use kithab_core::{NoteId, PortalError, Role};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::local;
use crate::cli::{GlobalArgs, NotesCommand, SelectionArgs, SourceArgs};
use crate::context::{Context, confirm};
use crate::output::{self, NOTE_HEADERS};

/// The complete tuple a note command needs, checked before anything loads
fn complete(selection: &SelectionArgs) -> Result<(Selection, NoteFilter)> {
    let selection = selection.to_selection();
    let filter = selection
        .tuple()
        .ok_or(PortalError::IncompleteSelection)
        .map_err(local)?;
    Ok((selection, filter))
}

/// Load a context that may use `source`; the admin endpoints need an admin
fn context_for(global: &GlobalArgs, source: NoteSource) -> Result<Context> {
    let ctx = Context::load(global)?;
    match source {
        NoteSource::Admin => {
            ctx.require_role(Role::Admin)?;
        }
        NoteSource::Subject => {
            ctx.require_login()?;
        }
    }
    Ok(ctx)
}

async fn list(ctx: &mut Context, source: NoteSource, filter: &NoteFilter) -> Result<Vec<Note>> {
    let result = fetch_notes(&ctx.api, source, filter).await;
    ctx.settle(result, FETCH_FAILED)
}

/// Public catalog for the subject column. Notes still print, with embedded
/// names or raw ids, when it cannot be loaded.
async fn subject_names(ctx: &Context) -> Catalog {
    match ctx.api.catalog().await {
        Ok(catalog) => catalog,
        Err(e) => {
            warn!(error = %e, "catalog unavailable, showing subject ids");
            Catalog::default()
        }
    }
}

pub async fn run(global: &GlobalArgs, command: NotesCommand) -> Result<()> {
    match command {
        NotesCommand::Search { selection, source } => search(global, &selection, source).await,
        NotesCommand::Download {
            selection,
            source,
            note,
            dir,
        } => download(global, &selection, source, &note, &dir).await,
        NotesCommand::DownloadAll {
            selection,
            source,
            output,
            policy,
        } => download_all(global, &selection, source, output, policy.map(Into::into)).await,
        NotesCommand::Upload { selection, files } => upload(global, &selection, &files).await,
        NotesCommand::Mine => mine(global).await,
        NotesCommand::Delete { id, yes } => delete(global, &id, yes).await,
        NotesCommand::Favorite { id, remove } => favorite(global, &id, remove).await,
    }
}

async fn search(global: &GlobalArgs, selection: &SelectionArgs, source: SourceArgs) -> Result<()> {
    let (selection, _) = complete(selection)?;
    let mut ctx = context_for(global, source.source())?;

    let mut query = NoteQuery::new();
    let result = run_query(&mut query, &ctx.api, source.source(), &selection)
        .await
        .map(<[Note]>::to_vec);
    let notes = ctx.settle(result, FETCH_FAILED)?;
    debug!(count = notes.len(), "notes loaded");
    let catalog = subject_names(&ctx).await;

    output::print_table(
        &NOTE_HEADERS,
        &output::note_rows(&notes, &catalog),
        "No notes found",
    );
    Ok(())
}

async fn download(
    global: &GlobalArgs,
    selection: &SelectionArgs,
    source: SourceArgs,
    note_id: &str,
    dir: &Path,
) -> Result<()> {
    let (_, filter) = complete(selection)?;
    let mut ctx = context_for(global, source.source())?;

    let notes = list(&mut ctx, source.source(), &filter).await?;
    let id = NoteId::new(note_id.trim());
    let Some(note) = notes.iter().find(|n| n.id == id) else {
        bail!("Note {} is not filed under this subject", id);
    };
    let result = download_to(&ctx.api, note, source.source(), dir).await;
    let path = ctx.settle(result, "Failed to download file")?;
    output::success(&format!("Saved {}", path.display()));
    Ok(())
}

async fn download_all(
    global: &GlobalArgs,
    selection: &SelectionArgs,
    source: SourceArgs,
    output_path: Option<PathBuf>,
    policy: Option<DownloadPolicy>,
) -> Result<()> {
    let (_, filter) = complete(selection)?;
    let mut ctx = context_for(global, source.source())?;
    let policy = policy.unwrap_or(ctx.config.download_policy);
    let path = output_path.unwrap_or_else(|| PathBuf::from(&ctx.config.archive_name));

    let notes = list(&mut ctx, source.source(), &filter).await?;
    info!(count = notes.len(), %policy, "building archive");
    let result = build_archive(&ctx.api, &notes, source.source(), policy).await;
    let report = ctx.settle(result, "Failed to download notes")?;
    report.save(&path)?;

    let mut lines = output::archive_summary(&report).into_iter();
    if let Some(first) = lines.next() {
        output::success(&format!("Saved {} ({})", path.display(), first));
    }
    for skipped in lines {
        output::warning(&skipped);
    }
    Ok(())
}

async fn upload(global: &GlobalArgs, selection: &SelectionArgs, paths: &[PathBuf]) -> Result<()> {
    let (selection, _) = complete(selection)?;
    let files = paths
        .iter()
        .map(|p| UploadFile::from_path(p))
        .collect::<Result<Vec<_>, _>>()
        .map_err(local)?;

    let mut ctx = Context::load(global)?;
    let uploader = ctx.require_role(Role::Faculty)?.user.id.clone();
    let request = UploadRequest::new(&selection, uploader, files).map_err(local)?;

    let result = ctx.api.upload(&request).await;
    ctx.settle(result, "Failed to upload")?;
    output::success(&format!("Uploaded {} file(s)", request.files.len()));
    Ok(())
}

async fn mine(global: &GlobalArgs) -> Result<()> {
    let mut ctx = Context::load(global)?;
    ctx.require_role(Role::Faculty)?;
    let result = ctx.api.my_uploads().await;
    let notes = ctx.settle(result, "Failed to fetch uploads")?;
    let catalog = subject_names(&ctx).await;
    output::print_table(
        &NOTE_HEADERS,
        &output::note_rows(&notes, &catalog),
        "You have not uploaded any notes",
    );
    Ok(())
}

async fn delete(global: &GlobalArgs, id: &str, yes: bool) -> Result<()> {
    let mut ctx = Context::load(global)?;
    ctx.require_role(Role::Admin)?;
    if !confirm(&format!("Delete note {}? This cannot be undone.", id), yes)? {
        println!("Aborted");
        return Ok(());
    }
    let result = ctx.api.delete_note(&NoteId::new(id)).await;
    ctx.settle(result, "Failed to delete note")?;
    output::success("Note deleted");
    Ok(())
}

async fn favorite(global: &GlobalArgs, id: &str, remove: bool) -> Result<()> {
    let mut ctx = Context::load(global)?;
    ctx.require_login()?;
    let result = ctx.api.set_favorite(&NoteId::new(id), !remove).await;
    let favorites = ctx.settle(result, "Failed to update favorites")?;
    let verb = if remove { "Removed from" } else { "Added to" };
    output::success(&format!("{} favorites ({} total)", verb, favorites.len()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incomplete_selection_refused() {
        let args = SelectionArgs {
            regulation: Some("r1".to_string()),
            branch: Some("b1".to_string()),
            semester: None,
            subject: Some("s1".to_string()),
        };
        let err = complete(&args).unwrap_err();
        assert_eq!(err.to_string(), "Please select all fields");
    }

    #[test]
    fn test_complete_selection_yields_filter() {
        let args = SelectionArgs {
            regulation: Some("r1".to_string()),
            branch: Some("b1".to_string()),
            semester: Some("4".to_string()),
            subject: Some("s9".to_string()),
        };
        let (_, filter) = complete(&args).unwrap();
        assert_eq!(filter.semester, 4);
        assert_eq!(filter.subject.as_str(), "s9");
    }
}
