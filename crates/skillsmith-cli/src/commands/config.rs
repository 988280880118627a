use anyhow::Result;

use crate::cli::ConfigCommands;
use crate::config::CliConfig;
use crate::output::{OutputFormat, json::print_json};

pub fn run(
    config: &CliConfig,
    command: ConfigCommands,
    api_url: Option<&str>,
    timeout_secs: Option<u64>,
    format: OutputFormat,
) -> Result<()> {
    match command {
        ConfigCommands::Show => show(config, api_url, timeout_secs, format),
        ConfigCommands::Path => path(format),
    }
}

fn show(
    config: &CliConfig,
    api_url: Option<&str>,
    timeout_secs: Option<u64>,
    format: OutputFormat,
) -> Result<()> {
    let service = config.service_config(api_url, timeout_secs)?;
    let library = config.library_options(None);

    if format.is_json() {
        return print_json(&serde_json::json!({
            "api": {
                "baseUrl": service.base_url,
                "timeoutSecs": service.timeout.as_secs(),
                "pageSize": library.page_size,
            },
            "download": { "dir": library.download_dir },
        }));
    }

    println!("API URL:       {}", service.base_url);
    println!("Timeout:       {}s", service.timeout.as_secs());
    match library.page_size {
        Some(size) => println!("Page size:     {size}"),
        None => println!("Page size:     (service default)"),
    }
    println!("Download dir:  {}", library.download_dir.display());
    Ok(())
}

fn path(format: OutputFormat) -> Result<()> {
    let path = CliConfig::default_path();

    if format.is_json() {
        return print_json(&serde_json::json!({ "path": path }));
    }

    match path {
        Some(path) => println!("{}", path.display()),
        None => println!("No configuration directory available on this system."),
    }
    Ok(())
}
