//! Host-level commands: status, info, usage, raw shell

use anyhow::Result;
use colored::Colorize;
use dockhand_lib::AppContext;

use crate::output::{color_state, format_bytes, OutputFormat};

/// Show Docker daemon status
pub async fn show_status(ctx: &AppContext, session_id: &str, format: OutputFormat) -> Result<()> {
    let status = ctx.docker.status(session_id).await;
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
        OutputFormat::Table => {
            println!("Docker daemon: {}", color_state(&status.to_string()));
        }
    }
    Ok(())
}

/// Show Docker version and host information
pub async fn show_info(ctx: &AppContext, session_id: &str, format: OutputFormat) -> Result<()> {
    let info = ctx.docker.info(session_id).await?;
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
        OutputFormat::Table => {
            println!("{}", "Docker Host".bold());
            println!("{}", "=".repeat(50));
            println!("Version:                {}", info.version.cyan());
            println!("OS / Arch:              {}/{}", info.os, info.architecture);
            println!("Kernel:                 {}", info.kernel_version);
            println!();
            println!("{}", "Containers".bold());
            println!("{}", "-".repeat(50));
            println!("Total:                  {}", info.containers_total);
            println!(
                "Running:                {}",
                info.containers_running.to_string().green()
            );
            println!(
                "Paused:                 {}",
                info.containers_paused.to_string().yellow()
            );
            println!(
                "Stopped:                {}",
                info.containers_stopped.to_string().red()
            );
            println!();
            println!("Images:                 {}", info.images);
        }
    }
    Ok(())
}

/// Show one aggregated usage sample
pub async fn show_usage(ctx: &AppContext, session_id: &str, format: OutputFormat) -> Result<()> {
    let usage = ctx.docker.system_usage(session_id).await?;
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&usage)?);
        }
        OutputFormat::Table => {
            println!("{}", "System Usage".bold());
            println!("{}", "=".repeat(50));
            println!(
                "CPU:                    {:.1}% of {} cores",
                usage.cpu_usage_percent, usage.cpu_online
            );
            println!(
                "Memory:                 {} / {}",
                format_bytes(usage.memory_usage_bytes),
                format_bytes(usage.memory_limit_bytes)
            );
            println!(
                "Network rx/tx:          {} / {}",
                format_bytes(usage.network_rx_bytes),
                format_bytes(usage.network_tx_bytes)
            );
            println!(
                "Block read/write:       {} / {}",
                format_bytes(usage.block_read_bytes),
                format_bytes(usage.block_write_bytes)
            );
        }
    }
    Ok(())
}

/// Run a raw shell command and print its output as-is
pub async fn run_shell(ctx: &AppContext, session_id: &str, command: &str) -> Result<()> {
    let output = ctx.docker.shell(session_id, command).await?;
    print!("{}", output);
    Ok(())
}
