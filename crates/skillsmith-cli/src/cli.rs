use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

/// Output format for CLI commands
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    pub fn is_json(self) -> bool {
        matches!(self, OutputFormat::Json)
    }
}

/// Kind of source content
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContentTypeArg {
    Copywriting,
    Process,
    Technical,
}

/// Skill type filter for listings
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TypeFilterArg {
    #[default]
    All,
    Copywriting,
    Process,
    Technical,
}

#[derive(Parser)]
#[command(name = "skillsmith")]
#[command(version, about = "Skillsmith - turn business content into packaged AI skills")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Skill service base URL (defaults to http://localhost:3001/api)
    #[arg(long, global = true, env = "SKILLSMITH_API_URL")]
    pub api_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true, env = "SKILLSMITH_TIMEOUT_SECS")]
    pub timeout: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Analyze content and generate a skill from it
    Create(CreateArgs),

    /// List stored skills
    List(ListArgs),

    /// Show one skill
    Show {
        /// Skill ID
        id: i64,
    },

    /// Change a stored skill
    Update(UpdateArgs),

    /// Delete a skill
    Delete {
        /// Skill ID
        id: i64,
    },

    /// Download a skill archive
    Download {
        /// Skill ID
        id: i64,

        /// Directory to save the archive in
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Publish a skill to a GitHub repository
    Publish(PublishArgs),

    /// Configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Args)]
#[command(group(
    clap::ArgGroup::new("source")
        .required(true)
        .args(["content", "file"])
))]
pub struct CreateArgs {
    /// Kind of content being analyzed
    #[arg(long = "type", value_enum)]
    pub content_type: ContentTypeArg,

    /// Content to analyze
    #[arg(long)]
    pub content: Option<String>,

    /// Read the content from a file
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Skill name (normalized to lowercase letters, numbers and hyphens)
    #[arg(long)]
    pub name: String,

    /// Skill description
    #[arg(long)]
    pub description: Option<String>,

    /// Comma separated tags
    #[arg(long)]
    pub tags: Option<String>,
}

#[derive(Args)]
pub struct ListArgs {
    /// Search term
    #[arg(long)]
    pub search: Option<String>,

    /// Only list skills of this type
    #[arg(long = "type", value_enum, default_value = "all")]
    pub skill_type: TypeFilterArg,
}

#[derive(Args)]
pub struct UpdateArgs {
    /// Skill ID
    pub id: i64,

    /// New name
    #[arg(long)]
    pub name: Option<String>,

    /// New description
    #[arg(long)]
    pub description: Option<String>,

    /// New comma separated tags
    #[arg(long)]
    pub tags: Option<String>,

    /// Replace the main content with the contents of this file
    #[arg(long)]
    pub main_content_file: Option<PathBuf>,
}

#[derive(Args)]
pub struct PublishArgs {
    /// Skill ID
    pub id: i64,

    /// GitHub token (prompted for when missing)
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Create a private repository
    #[arg(long)]
    pub private: bool,

    /// Publish again even if the skill already has a repository
    #[arg(long)]
    pub republish: bool,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,

    /// Print the configuration file location
    Path,
}
