//! Taxonomy and account administration
//!
//! Drafts are checked against the admin catalog before anything is sent,
//! so duplicate names and dangling references are reported the same way
//! the desktop dialogs report them.

use anyhow::{Result, anyhow, bail};
use kithab_catalog::{BranchDraft, Catalog, RegulationDraft, SelectionEvent, SubjectDraft, User};
use kithab_core::{BranchId, PortalError, RegulationId, Role, SubjectId, UserId};
use std::collections::BTreeMap;
use tracing::info;

use super::field_report;
use super::meta::CATALOG_FAILED;
use crate::cli::{
    AdminCommand, BranchCommand, GlobalArgs, RegulationCommand, SubjectCommand, UsersCommand,
};
use crate::context::{Context, confirm};
use crate::output;

/// Apply `--regulation/--branch/--semester` overrides top-down, so moving a
/// subject to another regulation drops the branch and semester it had
fn retarget_subject(
    draft: &mut SubjectDraft,
    regulation: Option<String>,
    branch: Option<String>,
    semester: Option<String>,
) {
    if let Some(regulation) = regulation {
        draft.select(SelectionEvent::regulation(&regulation));
    }
    if let Some(branch) = branch {
        draft.select(SelectionEvent::branch(&branch));
    }
    if let Some(semester) = semester {
        draft.select(SelectionEvent::semester(&semester));
    }
}

/// An admin context with the admin catalog loaded
async fn admin_catalog(global: &GlobalArgs) -> Result<(Context, Catalog)> {
    let mut ctx = Context::load(global)?;
    ctx.require_role(Role::Admin)?;
    let result = ctx.api.admin_catalog().await;
    let catalog = ctx.settle(result, CATALOG_FAILED)?;
    Ok((ctx, catalog))
}

/// An admin context, after the user agreed to `prompt`; `None` if declined
fn confirmed_delete(global: &GlobalArgs, prompt: &str, yes: bool) -> Result<Option<Context>> {
    let ctx = Context::load(global)?;
    ctx.require_role(Role::Admin)?;
    if !confirm(prompt, yes)? {
        println!("Aborted");
        return Ok(None);
    }
    Ok(Some(ctx))
}

pub async fn run(global: &GlobalArgs, command: AdminCommand) -> Result<()> {
    match command {
        AdminCommand::Regulation { command } => regulation(global, command).await,
        AdminCommand::Branch { command } => branch(global, command).await,
        AdminCommand::Subject { command } => subject(global, command).await,
        AdminCommand::Users { command } => users(global, command).await,
    }
}

// ============================================================================
// Regulations
// ============================================================================

async fn regulation(global: &GlobalArgs, command: RegulationCommand) -> Result<()> {
    match command {
        RegulationCommand::Add { name, semesters } => {
            let (mut ctx, catalog) = admin_catalog(global).await?;
            let payload = RegulationDraft::new(name, semesters)
                .check(&catalog, None)
                .map_err(|e| field_report(&e))?;
            let result = ctx.api.create_regulation(&payload).await;
            ctx.settle(result, "Failed to add regulation")?;
            output::success("Regulation added");
        }
        RegulationCommand::Edit {
            id,
            name,
            semesters,
        } => {
            let (mut ctx, catalog) = admin_catalog(global).await?;
            let id = RegulationId::new(id);
            let existing = catalog
                .regulation(&id)
                .ok_or_else(|| PortalError::not_found("Regulation", id.as_str()))?;
            let mut draft = RegulationDraft::from(existing);
            if let Some(name) = name {
                draft.name = name;
            }
            if let Some(semesters) = semesters {
                draft.number_of_semesters = semesters;
            }
            let payload = draft
                .check(&catalog, Some(&id))
                .map_err(|e| field_report(&e))?;
            let result = ctx.api.update_regulation(&id, &payload).await;
            ctx.settle(result, "Failed to update regulation")?;
            output::success("Regulation updated");
        }
        RegulationCommand::Delete { id, yes } => {
            let prompt = format!(
                "Delete regulation {}? Its branches, subjects and notes are deleted too.",
                id
            );
            let Some(mut ctx) = confirmed_delete(global, &prompt, yes)? else {
                return Ok(());
            };
            let result = ctx.api.delete_regulation(&RegulationId::new(id)).await;
            ctx.settle(result, "Failed to delete regulation")?;
            output::success("Regulation deleted");
        }
    }
    Ok(())
}

// ============================================================================
// Branches
// ============================================================================

async fn branch(global: &GlobalArgs, command: BranchCommand) -> Result<()> {
    match command {
        BranchCommand::Add {
            regulation,
            name,
            code,
        } => {
            let (mut ctx, catalog) = admin_catalog(global).await?;
            let payload = BranchDraft::new(RegulationId::parse(&regulation), name, code)
                .check(&catalog, None)
                .map_err(|e| field_report(&e))?;
            let result = ctx.api.create_branch(&payload).await;
            ctx.settle(result, "Failed to add branch")?;
            output::success("Branch added");
        }
        BranchCommand::Edit {
            id,
            regulation,
            name,
            code,
        } => {
            let (mut ctx, catalog) = admin_catalog(global).await?;
            let id = BranchId::new(id);
            let existing = catalog
                .branch(&id)
                .ok_or_else(|| PortalError::not_found("Branch", id.as_str()))?;
            let mut draft = BranchDraft::from(existing);
            if let Some(regulation) = regulation {
                draft.regulation = RegulationId::parse(&regulation);
            }
            if let Some(name) = name {
                draft.name = name;
            }
            if let Some(code) = code {
                draft.code = code;
            }
            let payload = draft
                .check(&catalog, Some(&id))
                .map_err(|e| field_report(&e))?;
            let result = ctx.api.update_branch(&id, &payload).await;
            ctx.settle(result, "Failed to update branch")?;
            output::success("Branch updated");
        }
        BranchCommand::Delete { id, yes } => {
            let prompt = format!(
                "Delete branch {}? Its subjects and notes are deleted too.",
                id
            );
            let Some(mut ctx) = confirmed_delete(global, &prompt, yes)? else {
                return Ok(());
            };
            let result = ctx.api.delete_branch(&BranchId::new(id)).await;
            ctx.settle(result, "Failed to delete branch")?;
            output::success("Branch deleted");
        }
    }
    Ok(())
}

// ============================================================================
// Subjects
// ============================================================================

async fn subject(global: &GlobalArgs, command: SubjectCommand) -> Result<()> {
    match command {
        SubjectCommand::Add {
            regulation,
            branch,
            semester,
            name,
            code,
        } => {
            let (mut ctx, catalog) = admin_catalog(global).await?;
            let draft = SubjectDraft {
                regulation: RegulationId::parse(&regulation),
                branch: BranchId::parse(&branch),
                semester,
                name,
                code,
            };
            let payload = draft.check(&catalog, None).map_err(|e| field_report(&e))?;
            let result = ctx.api.create_subject(&payload).await;
            ctx.settle(result, "Failed to add subject")?;
            output::success("Subject added");
        }
        SubjectCommand::Edit {
            id,
            regulation,
            branch,
            semester,
            name,
            code,
        } => {
            let (mut ctx, catalog) = admin_catalog(global).await?;
            let id = SubjectId::new(id);
            let existing = catalog
                .subject(&id)
                .ok_or_else(|| PortalError::not_found("Subject", id.as_str()))?;
            let mut draft = SubjectDraft::from_subject(existing, &catalog);
            retarget_subject(&mut draft, regulation, branch, semester);
            if let Some(name) = name {
                draft.name = name;
            }
            if let Some(code) = code {
                draft.code = code;
            }
            let payload = draft
                .check(&catalog, Some(&id))
                .map_err(|e| field_report(&e))?;
            let result = ctx.api.update_subject(&id, &payload).await;
            ctx.settle(result, "Failed to update subject")?;
            output::success("Subject updated");
        }
        SubjectCommand::Delete { id, yes } => {
            let prompt = format!("Delete subject {}? Its notes are deleted too.", id);
            let Some(mut ctx) = confirmed_delete(global, &prompt, yes)? else {
                return Ok(());
            };
            let result = ctx.api.delete_subject(&SubjectId::new(id)).await;
            ctx.settle(result, "Failed to delete subject")?;
            output::success("Subject deleted");
        }
    }
    Ok(())
}

// ============================================================================
// Users
// ============================================================================

/// Split `key=value`; the value may itself contain `=`
fn parse_assignment(raw: &str) -> Result<(String, String)> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("Expected KEY=VALUE, got '{}'", raw))?;
    let key = key.trim();
    if key.is_empty() {
        bail!("Expected KEY=VALUE, got '{}'", raw);
    }
    Ok((key.to_string(), value.to_string()))
}

/// Apply assignments to a user's edit form; only visible fields may change
fn apply_assignments(user: &User, assignments: &[String]) -> Result<BTreeMap<String, String>> {
    let mut form = user.edit_form();
    for raw in assignments {
        let (key, value) = parse_assignment(raw)?;
        match form.get_mut(&key) {
            Some(slot) => *slot = value,
            None => bail!("Unknown field '{}'", key),
        }
    }
    Ok(form)
}

async fn fetch_users(ctx: &mut Context, role: Role) -> Result<Vec<User>> {
    let result = ctx.api.users(role).await;
    let users = ctx.settle(result, "Fetch failed")?;
    Ok(users
        .into_iter()
        .map(|u| if u.role.is_some() { u } else { u.with_role(role) })
        .collect())
}

async fn users(global: &GlobalArgs, command: UsersCommand) -> Result<()> {
    match command {
        UsersCommand::List { role } => {
            let role = Role::from(role);
            let mut ctx = Context::load(global)?;
            ctx.require_role(Role::Admin)?;
            let users = fetch_users(&mut ctx, role).await?;
            output::print_table(
                &output::user_headers(role),
                &output::user_rows(&users, role),
                &format!("No {} accounts", role.as_str()),
            );
        }
        UsersCommand::Edit { id, role, fields } => {
            let role = Role::from(role);
            let mut ctx = Context::load(global)?;
            ctx.require_role(Role::Admin)?;
            let id = UserId::new(id);
            let users = fetch_users(&mut ctx, role).await?;
            let Some(user) = users.iter().find(|u| u.id == id) else {
                return Err(PortalError::not_found("User", id.as_str()).into());
            };
            let form = apply_assignments(user, &fields)?;
            let body = user.update_payload(&form);
            info!(user = %id, "updating user");
            let result = ctx.api.update_user(&id, &body).await;
            ctx.settle(result, "Update failed")?;
            output::success("User updated");
        }
        UsersCommand::Delete { id, yes } => {
            let prompt = format!("Delete user {}? This cannot be undone.", id);
            let Some(mut ctx) = confirmed_delete(global, &prompt, yes)? else {
                return Ok(());
            };
            let result = ctx.api.delete_user(&UserId::new(id)).await;
            ctx.settle(result, "Delete failed")?;
            output::success("User deleted");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            parse_assignment("email=a=b@example.com").unwrap(),
            ("email".to_string(), "a=b@example.com".to_string())
        );
        assert!(parse_assignment("email").is_err());
        assert!(parse_assignment("=x").is_err());
    }

    #[test]
    fn test_retarget_subject_clears_below_changed_level() {
        let mut draft = SubjectDraft {
            regulation: Some("A".into()),
            branch: Some("b1".into()),
            semester: "3".to_string(),
            name: "Compilers".to_string(),
            code: "CS801".to_string(),
        };
        retarget_subject(&mut draft, None, None, Some("5".to_string()));
        assert_eq!(draft.branch, Some("b1".into()));
        assert_eq!(draft.semester, "5");

        retarget_subject(&mut draft, Some("B".to_string()), None, None);
        assert_eq!(draft.regulation, Some("B".into()));
        assert_eq!(draft.branch, None);
        assert_eq!(draft.semester, "");

        retarget_subject(
            &mut draft,
            Some("A".to_string()),
            Some("b2".to_string()),
            Some("8".to_string()),
        );
        assert_eq!(draft.regulation, Some("A".into()));
        assert_eq!(draft.branch, Some("b2".into()));
        assert_eq!(draft.semester, "8");
        assert_eq!(draft.name, "Compilers");
    }

    #[test]
    fn test_apply_assignments() {
        let mut user = User::new("u1", "Asha").with_role(Role::Student);
        user.roll_number = Some("21CS001".to_string());

        let form = apply_assignments(&user, &["name=Asha K".to_string()]).unwrap();
        assert_eq!(form.get("name").map(String::as_str), Some("Asha K"));
        assert_eq!(form.get("rollNumber").map(String::as_str), Some("21CS001"));

        let err = apply_assignments(&user, &["password=x".to_string()]).unwrap_err();
        assert_eq!(err.to_string(), "Unknown field 'password'");
    }
}
