use anyhow::{Context, Result, anyhow, bail};
use colored::Colorize;
use skillsmith_contracts::{ContentType, Skill, SkillId, TypeFilter, UpdateSkillRequest};
use skillsmith_core::validation::parse_tags;
use skillsmith_core::{LibraryController, LibraryMsg, Notice, SkillService};
use std::path::PathBuf;

use super::fail_on_error;
use crate::cli::{ListArgs, TypeFilterArg, UpdateArgs};
use crate::config::CliConfig;
use crate::output::table::{print_table, skills_table};
use crate::output::{OutputFormat, format_timestamp, json::print_json};

pub async fn list(
    service: &dyn SkillService,
    config: &CliConfig,
    args: ListArgs,
    format: OutputFormat,
) -> Result<()> {
    let mut library = LibraryController::new(config.library_options(None));
    // Only the final refresh is sent; the query messages just set the filters
    library.update(LibraryMsg::SearchChanged(args.search.unwrap_or_default()));
    library.update(LibraryMsg::TypeFilterChanged(type_filter(args.skill_type)));
    library.dispatch(service, LibraryMsg::Refresh).await;
    fail_on_error(library.state().notice.as_ref())?;

    let state = library.state();
    if format.is_json() {
        return print_json(&serde_json::json!({
            "skills": state.results,
            "pagination": state.pagination,
        }));
    }

    if state.results.is_empty() {
        println!("No skills found.");
        return Ok(());
    }

    print_table(skills_table(&state.results))?;
    if state.pagination.has_more {
        println!(
            "Showing {} of {} skills.",
            state.results.len(),
            state.pagination.total
        );
    }
    Ok(())
}

pub async fn show(
    service: &dyn SkillService,
    config: &CliConfig,
    id: i64,
    format: OutputFormat,
) -> Result<()> {
    let mut library = LibraryController::new(config.library_options(None));
    let skill = select(service, &mut library, SkillId(id)).await?;

    if format.is_json() {
        return print_json(&skill);
    }

    print_skill(&skill);
    Ok(())
}

pub async fn update(
    service: &dyn SkillService,
    config: &CliConfig,
    args: UpdateArgs,
    format: OutputFormat,
) -> Result<()> {
    let main_content = match &args.main_content_file {
        Some(path) => Some(
            std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?,
        ),
        None => None,
    };
    let changes = UpdateSkillRequest {
        name: args.name,
        description: args.description,
        main_content,
        references: None,
        tags: args.tags.as_deref().map(parse_tags),
    };
    if changes.is_empty() {
        bail!("Nothing to update: pass --name, --description, --tags or --main-content-file");
    }

    let id = SkillId(args.id);
    let mut library = LibraryController::new(config.library_options(None));
    library
        .dispatch(service, LibraryMsg::Update { id, changes })
        .await;
    let message = success_message(library.state().notice.as_ref())?;

    if format.is_json() {
        return print_json(&serde_json::json!({ "id": id, "updated": true }));
    }
    println!("{} {}", "✓".green().bold(), message);
    Ok(())
}

pub async fn delete(
    service: &dyn SkillService,
    config: &CliConfig,
    id: i64,
    format: OutputFormat,
) -> Result<()> {
    let id = SkillId(id);
    let mut library = LibraryController::new(config.library_options(None));
    if let Some(command) = library.update(LibraryMsg::Delete(id)) {
        let reply = command.execute(service).await;
        // The follow-up refresh only matters to an on-screen listing
        library.update(reply);
    }
    let message = success_message(library.state().notice.as_ref())?;

    if format.is_json() {
        return print_json(&serde_json::json!({ "id": id, "deleted": true }));
    }
    println!("{} {}", "✓".green().bold(), message);
    Ok(())
}

pub async fn download(
    service: &dyn SkillService,
    config: &CliConfig,
    id: i64,
    out: Option<PathBuf>,
    format: OutputFormat,
) -> Result<()> {
    let id = SkillId(id);
    let mut library = LibraryController::new(config.library_options(out));
    select(service, &mut library, id).await?;

    library.dispatch(service, LibraryMsg::Download(id)).await;
    fail_on_error(library.state().notice.as_ref())?;
    let path = library
        .state()
        .last_saved
        .clone()
        .ok_or_else(|| anyhow!("Download did not complete"))?;

    if format.is_json() {
        return print_json(&serde_json::json!({ "id": id, "path": path }));
    }
    println!("{} Saved {}", "✓".green().bold(), path.display());
    Ok(())
}

/// Fetch one record into the library and return it.
pub async fn select(
    service: &dyn SkillService,
    library: &mut LibraryController,
    id: SkillId,
) -> Result<Skill> {
    library.dispatch(service, LibraryMsg::Select(id)).await;
    fail_on_error(library.state().notice.as_ref())?;
    library
        .state()
        .selected
        .clone()
        .ok_or_else(|| anyhow!("Skill {id} not found"))
}

fn success_message(notice: Option<&Notice>) -> Result<String> {
    fail_on_error(notice)?;
    Ok(notice.map(|n| n.message().to_string()).unwrap_or_default())
}

fn type_filter(arg: TypeFilterArg) -> TypeFilter {
    match arg {
        TypeFilterArg::All => TypeFilter::All,
        TypeFilterArg::Copywriting => TypeFilter::Only(ContentType::Copywriting),
        TypeFilterArg::Process => TypeFilter::Only(ContentType::Process),
        TypeFilterArg::Technical => TypeFilter::Only(ContentType::Technical),
    }
}

fn print_skill(skill: &Skill) {
    println!("ID:          {}", skill.id);
    println!("Name:        {}", skill.name);
    println!("Type:        {}", skill.skill_type);
    println!("Version:     {}", skill.version);
    if let Some(description) = &skill.description {
        println!("Description: {description}");
    }
    if !skill.metadata.tags.is_empty() {
        println!("Tags:        {}", skill.metadata.tags.join(", "));
    }
    println!(
        "Files:       {} ({} bytes)",
        skill.metadata.file_count, skill.metadata.total_size
    );
    println!("Created:     {}", format_timestamp(&skill.created_at));
    println!("Updated:     {}", format_timestamp(&skill.updated_at));
    if let Some(source) = &skill.metadata.extracted_from {
        println!(
            "Source:      {} analysis {} ({:.0}% confidence)",
            source.content_type,
            source.analysis_id,
            source.confidence * 100.0
        );
    }
    if let Some(github) = skill.github() {
        println!("Repository:  {}", github.repository_url);
        println!("Install:     {}", github.install_command);
    }
    if !skill.references.is_empty() {
        println!("\nReferences:");
        for path in skill.references.keys() {
            println!("  {path}");
        }
    }
    println!("\n{}", skill.main_content);
}
