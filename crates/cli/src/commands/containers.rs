//! Container commands

use anyhow::{anyhow, Result};
use tabled::Tabled;

use crate::output::{color_state, format_bytes, print_success, print_table, OutputFormat};
use crate::ContainerCommands;
use dockhand_lib::{AppContext, ContainerSpec, EnvVar, PortMapping, VolumeMount};

/// Row for the container list table
#[derive(Tabled, serde::Serialize)]
struct ContainerRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Image")]
    image: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Ports")]
    ports: String,
}

pub async fn run(
    ctx: &AppContext,
    session_id: &str,
    cmd: &ContainerCommands,
    format: OutputFormat,
) -> Result<()> {
    match cmd {
        ContainerCommands::List => {
            let containers = ctx.docker.list_containers(session_id).await?;
            let rows: Vec<ContainerRow> = containers
                .iter()
                .map(|c| ContainerRow {
                    id: c.id.clone(),
                    name: c.name.clone(),
                    image: c.image.clone(),
                    state: color_state(&c.state),
                    status: c.status.clone(),
                    ports: c.ports.join(", "),
                })
                .collect();
            print_table(&rows, format);
        }
        ContainerCommands::Run {
            image,
            name,
            ports,
            volumes,
            env,
            restart,
            command,
        } => {
            let mut spec = ContainerSpec::new(image.clone());
            spec.name = name.clone();
            spec.ports = ports.iter().map(|p| parse_port(p)).collect::<Result<_>>()?;
            spec.volumes = volumes
                .iter()
                .map(|v| parse_volume(v))
                .collect::<Result<_>>()?;
            spec.env = env.iter().map(|e| parse_env(e)).collect::<Result<_>>()?;
            spec.restart_policy = restart.clone();
            if !command.is_empty() {
                spec.command = Some(command.join(" "));
            }
            let id = ctx.docker.create_container(session_id, &spec).await?;
            print_success(&format!("Container {} created", id));
        }
        ContainerCommands::Stats { name } => {
            let stats = ctx.docker.container_stats(session_id, name).await?;
            match format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&stats)?);
                }
                OutputFormat::Table => {
                    println!("CPU:                    {:.1}%", stats.cpu_usage_percent);
                    println!(
                        "Memory:                 {} / {}",
                        format_bytes(stats.memory_usage_bytes),
                        format_bytes(stats.memory_limit_bytes)
                    );
                    println!(
                        "Network rx/tx:          {} / {}",
                        format_bytes(stats.network_rx_bytes),
                        format_bytes(stats.network_tx_bytes)
                    );
                    println!(
                        "Block read/write:       {} / {}",
                        format_bytes(stats.block_read_bytes),
                        format_bytes(stats.block_write_bytes)
                    );
                }
            }
        }
        ContainerCommands::Start { name } => {
            ctx.docker.start_container(session_id, name).await?;
            print_success(&format!("Container {} started", name));
        }
        ContainerCommands::Stop { name } => {
            ctx.docker.stop_container(session_id, name).await?;
            print_success(&format!("Container {} stopped", name));
        }
        ContainerCommands::Restart { name } => {
            ctx.docker.restart_container(session_id, name).await?;
            print_success(&format!("Container {} restarted", name));
        }
        ContainerCommands::Pause { name } => {
            ctx.docker.pause_container(session_id, name).await?;
            print_success(&format!("Container {} paused", name));
        }
        ContainerCommands::Unpause { name } => {
            ctx.docker.unpause_container(session_id, name).await?;
            print_success(&format!("Container {} unpaused", name));
        }
        ContainerCommands::Remove { name } => {
            ctx.docker.remove_container(session_id, name).await?;
            print_success(&format!("Container {} removed", name));
        }
        ContainerCommands::Logs { name, tail } => {
            let logs = ctx
                .docker
                .container_logs(session_id, name, Some(*tail))
                .await?;
            print!("{}", logs);
        }
        ContainerCommands::Exec { name, command } => {
            let output = ctx
                .docker
                .exec_in_container(session_id, name, &command.join(" "))
                .await?;
            print!("{}", output);
        }
    }
    Ok(())
}

/// Parse a `--publish` argument (`host:container[/protocol]`).
fn parse_port(text: &str) -> Result<PortMapping> {
    let (mapping, protocol) = match text.rsplit_once('/') {
        Some((mapping, protocol)) => (mapping, protocol.to_string()),
        None => (text, "tcp".to_string()),
    };
    let (host, container) = mapping
        .split_once(':')
        .ok_or_else(|| anyhow!("expected host:container[/protocol], got {:?}", text))?;
    Ok(PortMapping {
        host_port: host.parse()?,
        container_port: container.parse()?,
        protocol,
    })
}

/// Parse a `--volume` argument (`host:container[:ro]`).
fn parse_volume(text: &str) -> Result<VolumeMount> {
    let (rest, read_only) = match text.strip_suffix(":ro") {
        Some(rest) => (rest, true),
        None => (text, false),
    };
    let (host, container) = rest
        .split_once(':')
        .ok_or_else(|| anyhow!("expected host:container[:ro], got {:?}", text))?;
    Ok(VolumeMount {
        host_path: host.to_string(),
        container_path: container.to_string(),
        read_only,
    })
}

/// Parse an `--env` argument (`KEY=VALUE`).
fn parse_env(text: &str) -> Result<EnvVar> {
    let (key, value) = text
        .split_once('=')
        .ok_or_else(|| anyhow!("expected KEY=VALUE, got {:?}", text))?;
    Ok(EnvVar {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_arguments_parse_with_and_without_protocol() {
        let port = parse_port("8080:80/udp").unwrap();
        assert_eq!(port.host_port, 8080);
        assert_eq!(port.container_port, 80);
        assert_eq!(port.protocol, "udp");

        let port = parse_port("443:8443").unwrap();
        assert_eq!(port.protocol, "tcp");

        assert!(parse_port("8080").is_err());
        assert!(parse_port("x:80").is_err());
    }

    #[test]
    fn volume_arguments_parse_the_read_only_suffix() {
        let mount = parse_volume("/srv/data:/var/lib/data:ro").unwrap();
        assert_eq!(mount.host_path, "/srv/data");
        assert_eq!(mount.container_path, "/var/lib/data");
        assert!(mount.read_only);

        let mount = parse_volume("/a:/b").unwrap();
        assert!(!mount.read_only);

        assert!(parse_volume("just-a-path").is_err());
    }

    #[test]
    fn env_arguments_split_on_the_first_equals() {
        let env = parse_env("MODE=a=b").unwrap();
        assert_eq!(env.key, "MODE");
        assert_eq!(env.value, "a=b");

        assert!(parse_env("NOEQUALS").is_err());
    }
}
