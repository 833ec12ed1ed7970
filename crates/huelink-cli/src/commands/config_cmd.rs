//! `huelink config` -- profile management.

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, STARTER_CONFIG};
use crate::error::CliError;

pub async fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => init(global),
        ConfigCommand::Show => show(),
        ConfigCommand::Path => {
            println!("{}", config::config_path().display());
            Ok(())
        }
    }
}

fn init(global: &GlobalOpts) -> Result<(), CliError> {
    let path = config::config_path();
    if path.exists() {
        if !global.quiet {
            eprintln!("Config already exists at {}", path.display());
        }
        return Ok(());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, STARTER_CONFIG)?;

    if !global.quiet {
        eprintln!("Wrote starter config to {}", path.display());
    }
    Ok(())
}

fn show() -> Result<(), CliError> {
    let mut config = config::load_config_or_default();

    // Never print stored credentials.
    for profile in config.profiles.values_mut() {
        if profile.credential.is_some() {
            profile.credential = Some("[redacted]".into());
        }
    }

    let rendered = toml::to_string_pretty(&config).map_err(|e| CliError::Validation {
        field: "config".into(),
        reason: e.to_string(),
    })?;
    println!("{rendered}");
    Ok(())
}
