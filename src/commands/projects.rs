//! `flavor projects create|edit|view`

use super::Context;
use crate::api::FlavortownClient;
use crate::error::AppError;
use crate::models::{Project, ProjectField, ProjectFields, User};
use crate::ui::{self, render_panel, spinner, truncate, Align, Prompter, Table};
use chrono::{DateTime, Utc};
use colored::{Color, Colorize};
use std::io::{BufRead, Write};
use tracing::info;

/// Answer that clears an optional field while editing.
const CLEAR_MARKER: &str = "-";

pub async fn create(ctx: &Context) -> Result<(), AppError> {
    let mut prompter = Prompter::stdio();

    println!();
    println!("{}", "Create New Project".bold().cyan());
    ui::hint("Fill out the form below to create a new project.");
    println!();

    let (client, _user) = authenticate(ctx, &mut prompter).await?;
    let fields = project_form(&mut prompter, None)?;

    println!();
    print!("{}", render_panel("Preview", &preview_rows(&fields)));
    if !prompter.confirm("Create this project?", true)? {
        ui::hint("Cancelled.");
        return Ok(());
    }

    let pb = spinner("Creating project...", ctx.show_progress);
    let created = client.create_project(&fields).await;
    pb.finish_and_clear();
    let created = created?;

    info!("Created project {}", created.id);
    println!();
    ui::success("Project created successfully!");
    print!("{}", project_panel(&created, "Created Project"));
    Ok(())
}

pub async fn edit(ctx: &Context, project_id: Option<u64>) -> Result<(), AppError> {
    let mut prompter = Prompter::stdio();
    let project_id = match project_id {
        Some(id) => id,
        None => prompter.ask_number("Enter the project ID to edit")?,
    };

    println!();
    println!("{}", format!("Edit Project #{}", project_id).bold().cyan());
    println!();

    let (client, user) = authenticate(ctx, &mut prompter).await?;
    if !user.owns_project(project_id) {
        if user.project_ids.is_empty() {
            ui::warning("You don't have any projects yet. Create one with 'flavor projects create'.");
        } else {
            println!("{} {}", "Your project IDs:".cyan(), join_ids(&user.project_ids));
        }
        return Err(AppError::input(format!(
            "You don't own project #{}. You can only edit projects that belong to you.",
            project_id
        )));
    }
    ui::success("Ownership verified");
    println!();

    let pb = spinner("Fetching project...", ctx.show_progress);
    let existing = client.get_project(project_id).await;
    pb.finish_and_clear();
    let existing = existing?;

    print!("{}", project_panel(&existing, "Current Project Data"));
    println!();
    if !prompter.confirm("Continue editing this project?", true)? {
        ui::hint("Cancelled.");
        return Ok(());
    }

    let changes = project_form(&mut prompter, Some(&existing))?.without_unchanged(&existing);
    if changes.is_empty() {
        ui::warning("No changes made.");
        return Ok(());
    }

    println!("{}", "Changes to Apply".bold());
    print!("{}", changes_table(&existing, &changes).render());
    println!();
    if !prompter.confirm("Apply these changes?", true)? {
        ui::hint("Cancelled.");
        return Ok(());
    }

    let pb = spinner("Updating project...", ctx.show_progress);
    let updated = client.update_project(project_id, &changes).await;
    pb.finish_and_clear();
    let updated = updated?;

    println!();
    ui::success("Project updated successfully!");
    print!("{}", project_panel(&updated, "Updated Project"));
    Ok(())
}

pub async fn view(ctx: &Context, project_id: Option<u64>) -> Result<(), AppError> {
    let client = ctx.flavortown()?;
    let project_id = match project_id {
        Some(id) => id,
        None => Prompter::stdio().ask_number("Enter the project ID to view")?,
    };

    let pb = spinner("Fetching project...", ctx.show_progress);
    let project = client.get_project(project_id).await;
    pb.finish_and_clear();
    let project = project?;

    println!();
    print!("{}", project_panel(&project, &format!("Project #{}", project_id)));
    if !project.devlog_ids.is_empty() {
        println!();
        println!("{} {}", "Devlogs:".cyan(), join_ids(&project.devlog_ids));
    }
    Ok(())
}

/// Resolve the API client and the signed-in user's profile.
async fn authenticate<R: BufRead, W: Write>(
    ctx: &Context,
    prompter: &mut Prompter<R, W>,
) -> Result<(FlavortownClient, User), AppError> {
    let client = ctx.flavortown()?;
    let flavor_id = ctx.flavor_id(prompter)?;

    let pb = spinner("Verifying your identity...", ctx.show_progress);
    let user = client.get_user(flavor_id).await;
    pb.finish_and_clear();
    let user = user?;

    ui::success(&format!(
        "Authenticated as {}",
        user.display_name.as_deref().unwrap_or("Unknown").bold()
    ));
    Ok((client, user))
}

/// Ask for every editable field.
///
/// Creating: required fields are asked until answered, and an empty
/// optional answer leaves the field out. Editing: an empty answer keeps
/// the current value and `-` clears an optional field.
pub(crate) fn project_form<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    existing: Option<&Project>,
) -> Result<ProjectFields, AppError> {
    let mode = if existing.is_some() { "Edit" } else { "New" };
    prompter.say(&format!("{}", format!("{} Project Form", mode).bold().cyan()))?;
    if existing.is_some() {
        prompter.say(&format!(
            "{}",
            "Press Enter to keep existing values, or type a new value.".dimmed()
        ))?;
        prompter.say(&format!(
            "{}",
            "Type '-' to clear an optional field.".dimmed()
        ))?;
    }

    let mut fields = ProjectFields::default();
    for (index, field) in ProjectField::ALL.into_iter().enumerate() {
        let tag = if field.is_required() {
            "(required)".red()
        } else {
            "(optional)".dimmed()
        };
        prompter.say(&format!(
            "{} {} {}",
            format!("{}/{}", index + 1, ProjectField::ALL.len()).bold(),
            field.label().cyan(),
            tag
        ))?;

        if let Some(current) = existing.and_then(|p| p.field(field)).filter(|v| !v.is_empty()) {
            prompter.say(&format!(
                "   {}",
                format!("Current: {}", truncate(current, 50)).dimmed()
            ))?;
        }

        let question = format!("   Enter {}", field.label());
        let value = if existing.is_none() && field.is_required() {
            Some(prompter.ask_required(&question)?)
        } else {
            resolve_answer(field, &prompter.ask(&question)?)
        };
        fields.set(field, value);
    }

    Ok(fields)
}

/// Map one form answer to the value to send. `None` sends nothing.
fn resolve_answer(field: ProjectField, answer: &str) -> Option<String> {
    match answer {
        "" => None,
        CLEAR_MARKER if !field.is_required() => Some(String::new()),
        value => Some(value.to_string()),
    }
}

fn preview_rows(fields: &ProjectFields) -> Vec<(&'static str, String)> {
    ProjectField::ALL
        .into_iter()
        .map(|field| {
            let value = fields.get(field).filter(|v| !v.is_empty()).unwrap_or("-");
            (field.label(), value.to_string())
        })
        .collect()
}

/// Old and new value of each field about to change.
fn changes_table(existing: &Project, changes: &ProjectFields) -> Table {
    let mut table = Table::new()
        .column("Field", Align::Left, Some(Color::Cyan))
        .column("Old Value", Align::Left, Some(Color::Red))
        .column("New Value", Align::Left, Some(Color::Green));

    for field in ProjectField::ALL {
        let Some(new_value) = changes.get(field) else {
            continue;
        };
        let old_value = existing.field(field).filter(|v| !v.is_empty()).unwrap_or("-");
        let new_value = if new_value.is_empty() { "[cleared]" } else { new_value };
        table.add_row([field.label(), old_value, new_value]);
    }

    table
}

/// Summary panel for one project.
pub(crate) fn project_panel(project: &Project, title: &str) -> String {
    let text = |value: Option<&str>| value.filter(|v| !v.is_empty()).unwrap_or("-").to_string();

    render_panel(
        title,
        &[
            ("ID", project.id.to_string()),
            ("Title", text(project.title.as_deref())),
            ("Description", text(project.description.as_deref())),
            ("Repo URL", text(project.repo_url.as_deref())),
            ("Demo URL", text(project.demo_url.as_deref())),
            ("README URL", text(project.readme_url.as_deref())),
            ("Created", format_timestamp(project.created_at.as_deref())),
            ("Updated", format_timestamp(project.updated_at.as_deref())),
        ],
    )
}

/// RFC 3339 timestamps are shown in UTC; anything else is shown as sent.
fn format_timestamp(raw: Option<&str>) -> String {
    match raw {
        None | Some("") => "-".to_string(),
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .map(|at| at.with_timezone(&Utc).format("%Y-%m-%d %H:%M UTC").to_string())
            .unwrap_or_else(|_| raw.to_string()),
    }
}

fn join_ids(ids: &[u64]) -> String {
    ids.iter().map(u64::to_string).collect::<Vec<_>>().join(", ")
}
