use colored::Colorize;

pub fn handle_error(err: anyhow::Error) -> ! {
    eprintln!("{} {:#}", "Error:".red().bold(), err);

    let msg = format!("{err:#}").to_lowercase();

    if msg.contains("connection error") || msg.contains("connection refused") {
        eprintln!("\n{}", "Suggestion:".yellow().bold());
        eprintln!("  Make sure the skill service is running, then point the CLI at it:");
        eprintln!(
            "  {} skillsmith --api-url http://localhost:3001/api <command>",
            "$".dimmed()
        );
        eprintln!("  or set SKILLSMITH_API_URL.");
    }

    if msg.contains("not found") {
        eprintln!("\n{}", "Suggestion:".yellow().bold());
        eprintln!("  List available skills with:");
        eprintln!("  {} skillsmith list", "$".dimmed());
    }

    if msg.contains("already published") {
        eprintln!("\n{}", "Suggestion:".yellow().bold());
        eprintln!("  Overwrite the existing repository metadata with:");
        eprintln!("  {} skillsmith publish <id> --republish", "$".dimmed());
    }

    if msg.contains("must be at least")
        || msg.contains("is required")
        || msg.contains("invalid tags")
        || msg.contains("may only contain")
    {
        eprintln!("\n{}", "Suggestion:".yellow().bold());
        eprintln!("  Content needs at least 100 characters.");
        eprintln!("  Skill names need at least 3 characters: lowercase letters, numbers, hyphens.");
        eprintln!("  Tags are comma separated and use letters, numbers and hyphens only.");
    }

    std::process::exit(1);
}
