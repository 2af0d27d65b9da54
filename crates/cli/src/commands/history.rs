//! Collected metric history commands

use anyhow::Result;
use colored::Colorize;
use tabled::Tabled;

use crate::output::{print_success, print_table, OutputFormat};
use crate::HistoryCommands;
use dockhand_lib::{AppContext, Channel, ChannelGroup};

/// Row summarizing one channel of collected history
#[derive(Tabled, serde::Serialize)]
struct ChannelRow {
    #[tabled(rename = "Channel")]
    channel: String,
    #[tabled(rename = "Samples")]
    samples: usize,
    #[tabled(rename = "Latest")]
    latest: String,
    #[tabled(rename = "Axis max")]
    axis_max: String,
}

fn channel_label(channel: Channel) -> &'static str {
    match channel {
        Channel::Cpu => "cpu",
        Channel::Memory => "memory",
        Channel::NetworkRx => "network rx",
        Channel::NetworkTx => "network tx",
        Channel::BlockRead => "block read",
        Channel::BlockWrite => "block write",
    }
}

pub fn run(ctx: &AppContext, cmd: &HistoryCommands, format: OutputFormat) -> Result<()> {
    match cmd {
        HistoryCommands::Show => {
            let mut rows = Vec::new();
            for group in [
                ChannelGroup::Cpu,
                ChannelGroup::Memory,
                ChannelGroup::Network,
                ChannelGroup::Block,
            ] {
                let scaling = ctx.telemetry.scaling(group);
                for series in &scaling.series {
                    let (latest, axis_max) = if series.channel == Channel::Cpu {
                        (
                            series
                                .points
                                .last()
                                .map(|p| format!("{:.1}%", p.value))
                                .unwrap_or_else(|| "-".to_string()),
                            format!("{:.1}%", scaling.max_value),
                        )
                    } else {
                        (
                            series
                                .points
                                .last()
                                .map(|p| format!("{:.2}{}", p.value, scaling.unit))
                                .unwrap_or_else(|| "-".to_string()),
                            format!("{:.2}{}", scaling.max_value, scaling.unit),
                        )
                    };
                    rows.push(ChannelRow {
                        channel: channel_label(series.channel).to_string(),
                        samples: series.points.len(),
                        latest,
                        axis_max,
                    });
                }
            }
            print_table(&rows, format);

            if matches!(format, OutputFormat::Table) {
                match ctx.telemetry.last_update() {
                    Some(at) => println!(
                        "Last update: {}",
                        at.format("%Y-%m-%d %H:%M:%S UTC").to_string().dimmed()
                    ),
                    None => println!("{}", "No history collected yet".yellow()),
                }
            }
        }
        HistoryCommands::Clear => {
            ctx.telemetry.clear();
            print_success("Metric history cleared");
        }
    }
    Ok(())
}
