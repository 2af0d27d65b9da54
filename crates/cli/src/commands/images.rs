//! Image commands

use anyhow::Result;
use tabled::Tabled;

use crate::output::{print_success, print_table, OutputFormat};
use crate::ImageCommands;
use dockhand_lib::AppContext;

/// Row for the image list table
#[derive(Tabled, serde::Serialize)]
struct ImageRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Repository")]
    repository: String,
    #[tabled(rename = "Tag")]
    tag: String,
    #[tabled(rename = "Created")]
    created: String,
    #[tabled(rename = "Size")]
    size: String,
}

pub async fn run(
    ctx: &AppContext,
    session_id: &str,
    cmd: &ImageCommands,
    format: OutputFormat,
) -> Result<()> {
    match cmd {
        ImageCommands::List => {
            let images = ctx.docker.list_images(session_id).await?;
            let rows: Vec<ImageRow> = images
                .iter()
                .map(|i| ImageRow {
                    id: i.id.clone(),
                    repository: i.repository.clone(),
                    tag: i.tag.clone(),
                    created: i.created.clone(),
                    size: i.size.clone(),
                })
                .collect();
            print_table(&rows, format);
        }
        ImageCommands::Pull { image } => {
            ctx.docker.pull_image(session_id, image).await?;
            print_success(&format!("Image {} pulled", image));
        }
        ImageCommands::Remove { image } => {
            ctx.docker.remove_image(session_id, image).await?;
            print_success(&format!("Image {} removed", image));
        }
    }
    Ok(())
}
