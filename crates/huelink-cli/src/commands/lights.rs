//! `huelink lights` -- light enumeration.

use serde::Serialize;
use tabled::Tabled;

use huelink_api::LightState;

use crate::cli::{GlobalOpts, LightsArgs, LightsCommand};
use crate::error::CliError;
use crate::output;

#[derive(Serialize)]
struct LightEntry {
    id: String,
    name: String,
    state: LightState,
}

#[derive(Tabled)]
struct LightRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "STATE")]
    state: &'static str,
    #[tabled(rename = "BRI")]
    bri: u8,
    #[tabled(rename = "SAT")]
    sat: u8,
    #[tabled(rename = "HUE")]
    hue: u16,
}

fn to_row(entry: &LightEntry) -> LightRow {
    LightRow {
        id: entry.id.clone(),
        name: entry.name.clone(),
        state: if entry.state.on { "on" } else { "off" },
        bri: entry.state.bri,
        sat: entry.state.sat,
        hue: entry.state.hue,
    }
}

pub async fn handle(args: LightsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        LightsCommand::List => {
            let client = super::connect(global).await?;

            // One request in flight at a time; the bridge dislikes bursts.
            let ids: Vec<String> = client.light_ids().map(str::to_owned).collect();
            let mut entries = Vec::with_capacity(ids.len());
            for id in ids {
                let light = client.light(&id).await?;
                entries.push(LightEntry {
                    id,
                    name: light.name,
                    state: light.state,
                });
            }

            let rendered =
                output::render_list(&global.output, &entries, to_row, |e| e.id.clone());
            println!("{rendered}");
            Ok(())
        }
    }
}
