//! `huelink light <ID> …` -- per-light reads and writes.

use huelink_api::{Envelope, LightState};

use crate::cli::{GlobalOpts, LightArgs, LightCommand};
use crate::error::CliError;
use crate::output;

pub async fn handle(args: LightArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let client = super::connect(global).await?;
    let id = &args.id;

    match args.command {
        LightCommand::State => {
            let state = client.state(id).await?;
            println!("{}", output::render_single(&global.output, &state, detail));
            Ok(())
        }
        LightCommand::On => report(client.turn_on(id).await?, global, id, "on"),
        LightCommand::Off => report(client.turn_off(id).await?, global, id, "off"),
        LightCommand::Toggle => report(client.toggle(id).await?, global, id, "toggled"),
        LightCommand::Bri { value } => report(
            client.set_brightness(id, value).await?,
            global,
            id,
            &format!("brightness {value}"),
        ),
        LightCommand::Sat { value } => report(
            client.set_saturation(id, value).await?,
            global,
            id,
            &format!("saturation {value}"),
        ),
        LightCommand::Hue { value } => report(
            client.set_hue(id, value).await?,
            global,
            id,
            &format!("hue {value}"),
        ),
    }
}

fn detail(state: &LightState) -> String {
    format!(
        "on:  {}\nbri: {}\nsat: {}\nhue: {}",
        state.on, state.bri, state.sat, state.hue
    )
}

/// Writes hand back the bridge's envelope; a non-ok envelope means the
/// bridge itself rejected the change (out-of-range value, for instance).
fn report(envelope: Envelope, global: &GlobalOpts, id: &str, description: &str) -> Result<(), CliError> {
    if !envelope.ok {
        return Err(CliError::Rejected {
            status: envelope.status,
        });
    }
    if !global.quiet {
        eprintln!("Light {id}: {description}");
    }
    Ok(())
}
