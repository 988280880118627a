use anyhow::{Result, anyhow, bail};
use colored::Colorize;
use skillsmith_contracts::SkillId;
use skillsmith_core::{
    LibraryController, Notice, PublishCoordinator, PublishMsg, PublishTarget, SkillService,
};

use super::fail_on_error;
use super::library::select;
use crate::cli::PublishArgs;
use crate::config::CliConfig;
use crate::output::{OutputFormat, json::print_json};

pub async fn run(
    service: &dyn SkillService,
    config: &CliConfig,
    args: PublishArgs,
    format: OutputFormat,
) -> Result<()> {
    let id = SkillId(args.id);
    let mut library = LibraryController::new(config.library_options(None));
    let skill = select(service, &mut library, id).await?;

    let mut coordinator = PublishCoordinator::new();
    coordinator.update(PublishMsg::Open {
        target: PublishTarget::from(&skill),
        republish: args.republish,
    });
    if !coordinator.is_open() {
        fail_on_error(coordinator.state().notice.as_ref())?;
        bail!("Could not start publishing skill {id}");
    }

    let token = match args.token {
        Some(token) => token,
        None => rpassword::prompt_password("GitHub token: ")?,
    };
    coordinator.update(PublishMsg::CredentialChanged(token));
    coordinator.update(PublishMsg::PrivacyChanged(args.private));
    coordinator
        .dispatch(service, &mut library, PublishMsg::Submit)
        .await;

    if let Some(error) = coordinator.modal_error() {
        return Err(anyhow!(error.clone()));
    }
    let message = match &coordinator.state().notice {
        Some(Notice::Success(message)) => message.clone(),
        other => {
            fail_on_error(other.as_ref())?;
            return Err(anyhow!("Publishing did not complete"));
        }
    };

    let publication = coordinator.state().last_publication.clone();

    if format.is_json() {
        return print_json(&publication);
    }

    println!("{} {}", "✓".green().bold(), message);
    if let Some(publication) = publication {
        println!("  Install with: {}", publication.install_command);
    }
    Ok(())
}
