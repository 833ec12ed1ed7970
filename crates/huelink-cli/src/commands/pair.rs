//! `huelink pair` -- run the press-button handshake and print (or store)
//! the minted credential.

use huelink_api::{
    AppIdentity, BridgeLocator, CredentialManager, Error as ApiError, LinkPrompt, Transport,
};

use crate::cli::{GlobalOpts, PairArgs};
use crate::config::{self, SavedTo};
use crate::error::CliError;

use super::ConsolePrompt;

pub async fn handle(args: PairArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let conn = config::resolve_connection(global);

    let transport = Transport::with_get_timeout(conn.timeout).map_err(ApiError::from)?;
    let address = BridgeLocator::new(&transport)
        .resolve(conn.bridge.as_deref())
        .await?;

    let identity = AppIdentity::new(args.app_name, args.device_name);
    let console = ConsolePrompt;
    let prompt: Option<&dyn LinkPrompt> = if global.non_interactive {
        None
    } else {
        Some(&console)
    };

    let credential = CredentialManager::new(&transport)
        .pair(&address, &identity, prompt)
        .await?;

    println!("{credential}");

    if args.save {
        let profile = config::active_profile_name(global, &config::load_config_or_default());
        match config::store_credential(&profile, credential.as_str())? {
            SavedTo::Keyring => {
                if !global.quiet {
                    eprintln!("Credential stored in the system keyring (profile '{profile}')");
                }
            }
            SavedTo::ConfigFile(path) => {
                if !global.quiet {
                    eprintln!("Credential written to {}", path.display());
                }
            }
        }
    } else if !global.quiet {
        eprintln!("Pass it with --credential, or re-run with --save to store it.");
    }

    Ok(())
}
