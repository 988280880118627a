use anyhow::{Context, Result, anyhow, bail};
use colored::Colorize;
use skillsmith_contracts::{AnalysisResult, ContentType};
use skillsmith_core::validation::{validate_name, validate_tags};
use skillsmith_core::{
    Notice, SkillService, WorkflowController, WorkflowMsg, normalize_skill_name,
};

use super::fail_on_error;
use crate::cli::{ContentTypeArg, CreateArgs};
use crate::output::{OutputFormat, json::print_json};

pub async fn run(service: &dyn SkillService, args: CreateArgs, format: OutputFormat) -> Result<()> {
    let content = match (args.content, &args.file) {
        (Some(content), _) => content,
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        (None, None) => bail!("Provide the content with --content or --file"),
    };

    // Check the metadata up front so a bad name never costs an analysis call
    let name = normalize_skill_name(&args.name);
    if let Some(error) = validate_name(&name) {
        bail!(error);
    }
    let tags = args.tags.unwrap_or_default();
    if let Some(error) = validate_tags(&tags) {
        bail!(error);
    }

    let mut workflow = WorkflowController::new();
    workflow.update(WorkflowMsg::ContentChanged(content));
    workflow.update(WorkflowMsg::ContentTypeChanged(content_type(args.content_type)));

    workflow.dispatch(service, WorkflowMsg::Analyze).await;
    if let Some(error) = &workflow.state().field_errors.content {
        bail!(error.clone());
    }
    fail_on_error(workflow.state().notice.as_ref())?;
    let analysis = workflow
        .analysis()
        .cloned()
        .ok_or_else(|| anyhow!("Analysis did not complete"))?;

    if !format.is_json() {
        print_analysis(&analysis);
    }

    workflow.update(WorkflowMsg::NameChanged(name.clone()));
    workflow.update(WorkflowMsg::DescriptionChanged(
        args.description.unwrap_or_default(),
    ));
    workflow.update(WorkflowMsg::TagsChanged(tags));
    workflow.dispatch(service, WorkflowMsg::Generate).await;

    let message = match &workflow.state().notice {
        Some(Notice::Success(message)) => message.clone(),
        Some(Notice::Error(message)) => bail!("{message}"),
        None => bail!("Skill generation did not complete"),
    };

    if format.is_json() {
        return print_json(&serde_json::json!({
            "analysis": analysis,
            "skillName": name,
            "message": message,
        }));
    }

    println!("{} {}", "✓".green().bold(), message);
    println!("  Browse it with: skillsmith list --search {name}");
    Ok(())
}

fn content_type(arg: ContentTypeArg) -> ContentType {
    match arg {
        ContentTypeArg::Copywriting => ContentType::Copywriting,
        ContentTypeArg::Process => ContentType::Process,
        ContentTypeArg::Technical => ContentType::Technical,
    }
}

fn print_analysis(analysis: &AnalysisResult) {
    println!("{}", "Analysis".bold());
    println!("  ID:          {}", analysis.analysis_id);
    println!("  Type:        {}", analysis.content_type);
    println!("  Confidence:  {}%", analysis.confidence_percent());
    println!("  Took:        {} ms", analysis.processing_time_ms);
    if !analysis.extracted_data.is_empty() {
        let keys: Vec<&str> = analysis.extracted_data.keys().map(String::as_str).collect();
        println!("  Extracted:   {}", keys.join(", "));
    }
    if let Some(notes) = &analysis.notes {
        println!("  Notes:       {notes}");
    }
    println!();
}
