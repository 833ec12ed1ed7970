//! Command dispatch: bridges CLI args -> library calls -> output formatting.

pub mod config_cmd;
pub mod discover;
pub mod light;
pub mod lights;
pub mod pair;

use huelink_api::{AppIdentity, BridgeClient, LinkPrompt};

use crate::cli::{Command, GlobalOpts};
use crate::config;
use crate::error::CliError;

/// Dispatch a bridge-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Discover => discover::handle(global).await,
        Command::Pair(args) => pair::handle(args, global).await,
        Command::Lights(args) => lights::handle(args, global).await,
        Command::Light(args) => light::handle(args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}

/// Bootstrap a [`BridgeClient`] from the resolved connection settings.
///
/// When no credential resolves, the pairing handshake runs as part of
/// bootstrap -- interactively unless `--non-interactive` is set.
pub(crate) async fn connect(global: &GlobalOpts) -> Result<BridgeClient, CliError> {
    let conn = config::resolve_connection(global);
    let cfg = config::client_config(&conn, AppIdentity::default());

    let client = if global.non_interactive || cfg.credential.is_some() {
        BridgeClient::connect(cfg).await?
    } else {
        BridgeClient::connect_with_prompt(cfg, &ConsolePrompt).await?
    };
    Ok(client)
}

/// Console implementation of the link-button prompt.
pub(crate) struct ConsolePrompt;

impl LinkPrompt for ConsolePrompt {
    fn announce(&self, message: &str) {
        eprintln!("{message}");
    }

    fn wait_for_continue(&self) {
        loop {
            match dialoguer::Confirm::new()
                .with_prompt("Link button pressed?")
                .default(true)
                .interact()
            {
                Ok(true) => return,
                Ok(false) => {}
                // Not a terminal: carry on and let the handshake report failure.
                Err(_) => return,
            }
        }
    }
}
