//! Network commands

use anyhow::Result;
use tabled::Tabled;

use crate::output::{print_success, print_table, OutputFormat};
use crate::NetworkCommands;
use dockhand_lib::AppContext;

/// Row for the network list table
#[derive(Tabled, serde::Serialize)]
struct NetworkRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Driver")]
    driver: String,
    #[tabled(rename = "Scope")]
    scope: String,
}

pub async fn run(
    ctx: &AppContext,
    session_id: &str,
    cmd: &NetworkCommands,
    format: OutputFormat,
) -> Result<()> {
    match cmd {
        NetworkCommands::List => {
            let networks = ctx.docker.list_networks(session_id).await?;
            let rows: Vec<NetworkRow> = networks
                .iter()
                .map(|n| NetworkRow {
                    id: n.id.clone(),
                    name: n.name.clone(),
                    driver: n.driver.clone(),
                    scope: n.scope.clone(),
                })
                .collect();
            print_table(&rows, format);
        }
        NetworkCommands::Create { name, driver } => {
            ctx.docker.create_network(session_id, name, driver).await?;
            print_success(&format!("Network {} created", name));
        }
        NetworkCommands::Remove { name } => {
            ctx.docker.remove_network(session_id, name).await?;
            print_success(&format!("Network {} removed", name));
        }
    }
    Ok(())
}
