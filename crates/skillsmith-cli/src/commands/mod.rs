pub mod config;
pub mod create;
pub mod library;
pub mod publish;

use skillsmith_core::Notice;

/// Turn an error notice left by a controller into a command failure.
pub fn fail_on_error(notice: Option<&Notice>) -> anyhow::Result<()> {
    match notice {
        Some(Notice::Error(message)) => Err(anyhow::anyhow!("{message}")),
        _ => Ok(()),
    }
}
