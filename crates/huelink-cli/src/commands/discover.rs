//! `huelink discover` -- cloud discovery, no credential required.

use huelink_api::{BridgeLocator, Error as ApiError, Transport};

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub async fn handle(global: &GlobalOpts) -> Result<(), CliError> {
    let transport = Transport::new().map_err(ApiError::from)?;
    let address = BridgeLocator::new(&transport).discover().await?;

    println!("{address}");
    if !global.quiet {
        eprintln!("Use it with: huelink --bridge {address} lights list");
    }
    Ok(())
}
