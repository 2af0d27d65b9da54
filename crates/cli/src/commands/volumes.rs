//! Volume commands

use anyhow::Result;
use tabled::Tabled;

use crate::output::{print_success, print_table, OutputFormat};
use crate::VolumeCommands;
use dockhand_lib::AppContext;

/// Row for the volume list table
#[derive(Tabled, serde::Serialize)]
struct VolumeRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Driver")]
    driver: String,
    #[tabled(rename = "Mountpoint")]
    mountpoint: String,
}

pub async fn run(
    ctx: &AppContext,
    session_id: &str,
    cmd: &VolumeCommands,
    format: OutputFormat,
) -> Result<()> {
    match cmd {
        VolumeCommands::List => {
            let volumes = ctx.docker.list_volumes(session_id).await?;
            let rows: Vec<VolumeRow> = volumes
                .iter()
                .map(|v| VolumeRow {
                    name: v.name.clone(),
                    driver: v.driver.clone(),
                    mountpoint: v.mountpoint.clone(),
                })
                .collect();
            print_table(&rows, format);
        }
        VolumeCommands::Create { name, driver } => {
            ctx.docker.create_volume(session_id, name, driver).await?;
            print_success(&format!("Volume {} created", name));
        }
        VolumeCommands::Remove { name } => {
            ctx.docker.remove_volume(session_id, name).await?;
            print_success(&format!("Volume {} removed", name));
        }
    }
    Ok(())
}
