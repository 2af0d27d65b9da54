//! Remote Docker CLI surface
//!
//! Thin pass-through: every operation formats one `docker` command line,
//! submits it through the dispatcher (so it serializes with everything else
//! on the session) and parses pipe-separated output. Parsing is tolerant:
//! malformed rows are skipped and missing numeric fields default to zero,
//! because remote docker versions vary.

use crate::dispatch::Dispatcher;
use crate::error::DispatchError;
use crate::models::{
    ContainerSpec, ContainerStats, ContainerSummary, DockerHostInfo, DockerStatus, ImageSummary,
    NetworkSummary, SystemUsage, VolumeSummary,
};
use crate::poller::{async_trait, UsageSource};
use std::sync::Arc;
use tracing::debug;

pub struct DockerRemote {
    dispatcher: Arc<Dispatcher>,
}

impl DockerRemote {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }

    /// Raw shell escape hatch; the same path every typed operation uses.
    pub async fn shell(&self, session_id: &str, command: &str) -> Result<String, DispatchError> {
        self.dispatcher.submit(session_id, command).await
    }

    /// Probe daemon reachability. Never fails: every outcome maps to a
    /// status.
    pub async fn status(&self, session_id: &str) -> DockerStatus {
        match self.shell(session_id, "docker --version").await {
            Ok(_) => match self.shell(session_id, "docker info").await {
                Ok(_) => DockerStatus::Running,
                Err(_) => DockerStatus::NotRunning,
            },
            Err(DispatchError::Command { output, .. }) => {
                let msg = output.to_lowercase();
                if msg.contains("not found") || msg.contains("no such file") {
                    DockerStatus::NotInstalled
                } else {
                    DockerStatus::NotRunning
                }
            }
            Err(_) => DockerStatus::Disconnected,
        }
    }

    pub async fn info(&self, session_id: &str) -> Result<DockerHostInfo, DispatchError> {
        let version = self
            .shell(
                session_id,
                "docker version --format '{{.Client.Version}}|{{.Server.Version}}|{{.Client.Arch}}|{{.Client.Os}}'",
            )
            .await?;
        let info = self
            .shell(
                session_id,
                "docker info --format '{{.Containers}}|{{.ContainersRunning}}|{{.ContainersPaused}}|{{.ContainersStopped}}|{{.Images}}|{{.KernelVersion}}'",
            )
            .await?;

        let v: Vec<&str> = version.trim().split('|').collect();
        let i: Vec<&str> = info.trim().split('|').collect();
        let field = |parts: &Vec<&str>, idx: usize| -> String {
            parts.get(idx).unwrap_or(&"unknown").trim().to_string()
        };
        let count = |parts: &Vec<&str>, idx: usize| -> i64 {
            parts.get(idx).and_then(|s| s.trim().parse().ok()).unwrap_or(0)
        };

        Ok(DockerHostInfo {
            version: field(&v, 0),
            containers_total: count(&i, 0),
            containers_running: count(&i, 1),
            containers_paused: count(&i, 2),
            containers_stopped: count(&i, 3),
            images: count(&i, 4),
            architecture: field(&v, 2),
            os: field(&v, 3),
            kernel_version: field(&i, 5),
        })
    }

    /// Aggregate usage across all running containers plus host facts (core
    /// count, total memory). One poll tick equals one call here.
    pub async fn system_usage(&self, session_id: &str) -> Result<SystemUsage, DispatchError> {
        let cpu_online = self
            .shell(session_id, "nproc")
            .await?
            .trim()
            .parse()
            .unwrap_or(0);
        let memory_limit_bytes = parse_free_total(&self.shell(session_id, "free -b").await?);

        let stats = self
            .shell(
                session_id,
                "docker stats --no-stream --format '{{.CPUPerc}}|{{.MemUsage}}|{{.NetIO}}|{{.BlockIO}}'",
            )
            .await?;

        let mut usage = SystemUsage {
            cpu_online,
            cpu_usage_percent: 0.0,
            memory_usage_bytes: 0,
            memory_limit_bytes,
            network_rx_bytes: 0,
            network_tx_bytes: 0,
            block_read_bytes: 0,
            block_write_bytes: 0,
        };

        for line in stats.lines() {
            let parts: Vec<&str> = line.split('|').collect();
            if parts.len() < 4 {
                if !line.trim().is_empty() {
                    debug!(line = %line, "Skipping malformed stats row");
                }
                continue;
            }
            usage.cpu_usage_percent += parse_percent(parts[0]);
            usage.memory_usage_bytes += parse_size_pair(parts[1]).0;
            let (rx, tx) = parse_size_pair(parts[2]);
            usage.network_rx_bytes += rx;
            usage.network_tx_bytes += tx;
            let (read, write) = parse_size_pair(parts[3]);
            usage.block_read_bytes += read;
            usage.block_write_bytes += write;
        }

        Ok(usage)
    }

    pub async fn list_containers(
        &self,
        session_id: &str,
    ) -> Result<Vec<ContainerSummary>, DispatchError> {
        let output = self
            .shell(
                session_id,
                "docker ps -a --format '{{.ID}}|{{.Names}}|{{.Image}}|{{.State}}|{{.Status}}|{{.Ports}}|{{.CreatedAt}}'",
            )
            .await?;

        let containers = output
            .lines()
            .filter_map(|line| {
                let parts: Vec<&str> = line.split('|').collect();
                if parts.len() < 6 {
                    return None;
                }
                Some(ContainerSummary {
                    id: parts[0].trim().to_string(),
                    name: parts[1].trim().to_string(),
                    image: parts[2].trim().to_string(),
                    state: parts[3].trim().to_string(),
                    status: parts[4].trim().to_string(),
                    ports: parts[5]
                        .split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect(),
                    created: parts.get(6).unwrap_or(&"").trim().to_string(),
                })
            })
            .collect();
        Ok(containers)
    }

    /// Run a new container from a spec. Every optional field becomes one
    /// `docker run` flag. Returns the container id docker prints.
    pub async fn create_container(
        &self,
        session_id: &str,
        spec: &ContainerSpec,
    ) -> Result<String, DispatchError> {
        let mut command = String::from("docker run");
        if spec.detach {
            command.push_str(" -d");
        }
        if let Some(name) = &spec.name {
            command.push_str(&format!(" --name {}", name));
        }
        for port in &spec.ports {
            command.push_str(&format!(
                " -p {}:{}/{}",
                port.host_port, port.container_port, port.protocol
            ));
        }
        for volume in &spec.volumes {
            let ro = if volume.read_only { ":ro" } else { "" };
            command.push_str(&format!(
                " -v {}:{}{}",
                volume.host_path, volume.container_path, ro
            ));
        }
        for env in &spec.env {
            command.push_str(&format!(" -e {}={}", env.key, env.value));
        }
        if let Some(policy) = &spec.restart_policy {
            if policy != "no" {
                command.push_str(&format!(" --restart {}", policy));
            }
        }
        command.push(' ');
        command.push_str(&spec.image);
        if let Some(extra) = &spec.command {
            command.push(' ');
            command.push_str(extra);
        }

        let output = self.shell(session_id, &command).await?;
        Ok(output.lines().next().unwrap_or("").trim().to_string())
    }

    /// Live usage sample for one container. Unlike [`system_usage`] this is a
    /// single stats row, not an aggregate.
    ///
    /// [`system_usage`]: DockerRemote::system_usage
    pub async fn container_stats(
        &self,
        session_id: &str,
        name: &str,
    ) -> Result<ContainerStats, DispatchError> {
        let output = self
            .shell(
                session_id,
                &format!(
                    "docker stats {} --no-stream --format '{{{{.CPUPerc}}}}|{{{{.MemUsage}}}}|{{{{.NetIO}}}}|{{{{.BlockIO}}}}'",
                    name
                ),
            )
            .await?;

        let line = output.lines().find(|l| !l.trim().is_empty()).unwrap_or("");
        let parts: Vec<&str> = line.split('|').collect();
        if parts.len() < 4 {
            return Err(DispatchError::Transport(format!(
                "unexpected stats output for {}: {:?}",
                name, line
            )));
        }
        let (memory_usage_bytes, memory_limit_bytes) = parse_size_pair(parts[1]);
        let (network_rx_bytes, network_tx_bytes) = parse_size_pair(parts[2]);
        let (block_read_bytes, block_write_bytes) = parse_size_pair(parts[3]);
        Ok(ContainerStats {
            cpu_usage_percent: parse_percent(parts[0]),
            memory_usage_bytes,
            memory_limit_bytes,
            network_rx_bytes,
            network_tx_bytes,
            block_read_bytes,
            block_write_bytes,
        })
    }

    pub async fn start_container(&self, session_id: &str, name: &str) -> Result<(), DispatchError> {
        self.shell(session_id, &format!("docker start {}", name)).await?;
        Ok(())
    }

    pub async fn stop_container(&self, session_id: &str, name: &str) -> Result<(), DispatchError> {
        self.shell(session_id, &format!("docker stop {}", name)).await?;
        Ok(())
    }

    pub async fn restart_container(&self, session_id: &str, name: &str) -> Result<(), DispatchError> {
        self.shell(session_id, &format!("docker restart {}", name)).await?;
        Ok(())
    }

    pub async fn pause_container(&self, session_id: &str, name: &str) -> Result<(), DispatchError> {
        self.shell(session_id, &format!("docker pause {}", name)).await?;
        Ok(())
    }

    pub async fn unpause_container(&self, session_id: &str, name: &str) -> Result<(), DispatchError> {
        self.shell(session_id, &format!("docker unpause {}", name)).await?;
        Ok(())
    }

    pub async fn remove_container(&self, session_id: &str, name: &str) -> Result<(), DispatchError> {
        self.shell(session_id, &format!("docker rm {}", name)).await?;
        Ok(())
    }

    pub async fn container_logs(
        &self,
        session_id: &str,
        name: &str,
        tail: Option<u32>,
    ) -> Result<String, DispatchError> {
        let tail = tail.unwrap_or(50);
        self.shell(
            session_id,
            &format!("docker logs --tail {} --timestamps {}", tail, name),
        )
        .await
    }

    pub async fn exec_in_container(
        &self,
        session_id: &str,
        name: &str,
        command: &str,
    ) -> Result<String, DispatchError> {
        self.shell(session_id, &format!("docker exec {} {}", name, command))
            .await
    }

    pub async fn list_images(&self, session_id: &str) -> Result<Vec<ImageSummary>, DispatchError> {
        let output = self
            .shell(
                session_id,
                "docker images --format '{{.ID}}|{{.Repository}}|{{.Tag}}|{{.CreatedAt}}|{{.Size}}'",
            )
            .await?;

        let images = output
            .lines()
            .filter_map(|line| {
                let parts: Vec<&str> = line.split('|').collect();
                if parts.len() < 5 {
                    return None;
                }
                Some(ImageSummary {
                    id: parts[0].trim().to_string(),
                    repository: parts[1].trim().to_string(),
                    tag: parts[2].trim().to_string(),
                    created: parts[3].trim().to_string(),
                    size: parts[4].trim().to_string(),
                })
            })
            .collect();
        Ok(images)
    }

    pub async fn pull_image(&self, session_id: &str, image: &str) -> Result<(), DispatchError> {
        self.shell(session_id, &format!("docker pull {}", image)).await?;
        Ok(())
    }

    pub async fn remove_image(&self, session_id: &str, image: &str) -> Result<(), DispatchError> {
        self.shell(session_id, &format!("docker rmi {}", image)).await?;
        Ok(())
    }

    pub async fn list_networks(
        &self,
        session_id: &str,
    ) -> Result<Vec<NetworkSummary>, DispatchError> {
        let output = self
            .shell(
                session_id,
                "docker network ls --format '{{.ID}}|{{.Name}}|{{.Driver}}|{{.Scope}}'",
            )
            .await?;

        let networks = output
            .lines()
            .filter_map(|line| {
                let parts: Vec<&str> = line.split('|').collect();
                if parts.len() < 4 {
                    return None;
                }
                let name = parts[1].trim();
                // Built-in networks are not operator-managed.
                if matches!(name, "bridge" | "host" | "none") {
                    return None;
                }
                Some(NetworkSummary {
                    id: parts[0].trim().to_string(),
                    name: name.to_string(),
                    driver: parts[2].trim().to_string(),
                    scope: parts[3].trim().to_string(),
                })
            })
            .collect();
        Ok(networks)
    }

    pub async fn create_network(
        &self,
        session_id: &str,
        name: &str,
        driver: &str,
    ) -> Result<(), DispatchError> {
        self.shell(
            session_id,
            &format!("docker network create --driver {} {}", driver, name),
        )
        .await?;
        Ok(())
    }

    pub async fn remove_network(&self, session_id: &str, name: &str) -> Result<(), DispatchError> {
        self.shell(session_id, &format!("docker network rm {}", name)).await?;
        Ok(())
    }

    pub async fn list_volumes(&self, session_id: &str) -> Result<Vec<VolumeSummary>, DispatchError> {
        let output = self
            .shell(
                session_id,
                "docker volume ls --format '{{.Name}}|{{.Driver}}|{{.Mountpoint}}'",
            )
            .await?;

        let volumes = output
            .lines()
            .filter_map(|line| {
                let parts: Vec<&str> = line.split('|').collect();
                if parts.len() < 3 {
                    return None;
                }
                Some(VolumeSummary {
                    name: parts[0].trim().to_string(),
                    driver: parts[1].trim().to_string(),
                    mountpoint: parts[2].trim().to_string(),
                })
            })
            .collect();
        Ok(volumes)
    }

    pub async fn create_volume(
        &self,
        session_id: &str,
        name: &str,
        driver: &str,
    ) -> Result<(), DispatchError> {
        self.shell(
            session_id,
            &format!("docker volume create --driver {} {}", driver, name),
        )
        .await?;
        Ok(())
    }

    pub async fn remove_volume(&self, session_id: &str, name: &str) -> Result<(), DispatchError> {
        self.shell(session_id, &format!("docker volume rm {}", name)).await?;
        Ok(())
    }
}

#[async_trait]
impl UsageSource for DockerRemote {
    async fn sample_usage(&self, session_id: &str) -> Result<SystemUsage, DispatchError> {
        self.system_usage(session_id).await
    }
}

/// Parse a docker percentage column ("12.5%").
fn parse_percent(text: &str) -> f64 {
    text.trim()
        .trim_end_matches('%')
        .parse()
        .unwrap_or(0.0)
}

/// Parse a docker human size ("1.5MiB", "3.4kB", "0B"). Docker mixes
/// decimal (kB/MB/GB) and binary (KiB/MiB/GiB) suffixes.
fn parse_size(text: &str) -> u64 {
    let text = text.trim();
    let split = text
        .find(|c: char| c.is_ascii_alphabetic())
        .unwrap_or(text.len());
    let (number, suffix) = text.split_at(split);
    let Ok(value) = number.trim().parse::<f64>() else {
        return 0;
    };
    let multiplier = match suffix.trim().to_ascii_lowercase().as_str() {
        "" | "b" => 1.0,
        "kb" => 1e3,
        "mb" => 1e6,
        "gb" => 1e9,
        "tb" => 1e12,
        "kib" => 1024.0,
        "mib" => 1024.0 * 1024.0,
        "gib" => 1024.0 * 1024.0 * 1024.0,
        "tib" => 1024.0f64.powi(4),
        _ => return 0,
    };
    (value * multiplier) as u64
}

/// Parse a "used / total" style column into both sides.
fn parse_size_pair(text: &str) -> (u64, u64) {
    let mut parts = text.split('/');
    let left = parts.next().map(parse_size).unwrap_or(0);
    let right = parts.next().map(parse_size).unwrap_or(0);
    (left, right)
}

/// Total physical memory from `free -b` output.
fn parse_free_total(output: &str) -> u64 {
    output
        .lines()
        .find(|l| l.trim_start().starts_with("Mem:"))
        .and_then(|l| l.split_whitespace().nth(1))
        .and_then(|s| s.parse().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedExecutor;

    fn remote(executor: &Arc<ScriptedExecutor>) -> DockerRemote {
        let dispatcher = Arc::new(Dispatcher::new(executor.clone(), None));
        dispatcher.open_lane("s1", "tok".into(), Arc::new(Default::default()));
        DockerRemote::new(dispatcher)
    }

    #[test]
    fn parses_percent_column() {
        assert_eq!(parse_percent("12.5%"), 12.5);
        assert_eq!(parse_percent(" 0.00% "), 0.0);
        assert_eq!(parse_percent("garbage"), 0.0);
    }

    #[test]
    fn parses_decimal_and_binary_sizes() {
        assert_eq!(parse_size("0B"), 0);
        assert_eq!(parse_size("512B"), 512);
        assert_eq!(parse_size("1.2kB"), 1_200);
        assert_eq!(parse_size("3MB"), 3_000_000);
        assert_eq!(parse_size("1KiB"), 1024);
        assert_eq!(parse_size("1.5MiB"), 1_572_864);
        assert_eq!(parse_size("2GiB"), 2 * 1024 * 1024 * 1024);
        assert_eq!(parse_size("nonsense"), 0);
    }

    #[test]
    fn parses_io_pairs() {
        assert_eq!(parse_size_pair("1.2kB / 3.4kB"), (1_200, 3_400));
        assert_eq!(parse_size_pair("656kB / 0B"), (656_000, 0));
        assert_eq!(parse_size_pair("oops"), (0, 0));
    }

    #[test]
    fn parses_free_output() {
        let output = "              total        used        free\n\
                      Mem:     16384000000  1234567890  1000000000\n\
                      Swap:     2147483648           0  2147483648\n";
        assert_eq!(parse_free_total(output), 16_384_000_000);
        assert_eq!(parse_free_total("unexpected"), 0);
    }

    #[tokio::test]
    async fn system_usage_sums_container_rows() {
        let executor = Arc::new(ScriptedExecutor::new());
        executor.respond("nproc", "8\n");
        executor.respond("free -b", "       total used free\nMem: 16000000000 1 2\n");
        executor.respond(
            "docker stats --no-stream --format '{{.CPUPerc}}|{{.MemUsage}}|{{.NetIO}}|{{.BlockIO}}'",
            "10.5%|100MiB / 7.6GiB|1kB / 2kB|3kB / 4kB\n20.0%|50MiB / 7.6GiB|10kB / 20kB|0B / 1kB\n",
        );
        let docker = remote(&executor);

        let usage = docker.system_usage("s1").await.unwrap();
        assert_eq!(usage.cpu_online, 8);
        assert!((usage.cpu_usage_percent - 30.5).abs() < 1e-9);
        assert_eq!(usage.memory_usage_bytes, 150 * 1024 * 1024);
        assert_eq!(usage.memory_limit_bytes, 16_000_000_000);
        assert_eq!(usage.network_rx_bytes, 11_000);
        assert_eq!(usage.network_tx_bytes, 22_000);
        assert_eq!(usage.block_read_bytes, 3_000);
        assert_eq!(usage.block_write_bytes, 5_000);
    }

    #[tokio::test]
    async fn list_containers_parses_rows_and_skips_garbage() {
        let executor = Arc::new(ScriptedExecutor::new());
        executor.respond(
            "docker ps -a --format '{{.ID}}|{{.Names}}|{{.Image}}|{{.State}}|{{.Status}}|{{.Ports}}|{{.CreatedAt}}'",
            "abc123|web|nginx:latest|running|Up 2 hours|0.0.0.0:80->80/tcp|2026-01-01\n\
             short|row\n\
             def456|db|postgres:16|exited|Exited (0)||2026-01-02\n",
        );
        let docker = remote(&executor);

        let containers = docker.list_containers("s1").await.unwrap();
        assert_eq!(containers.len(), 2);
        assert_eq!(containers[0].name, "web");
        assert_eq!(containers[0].ports, vec!["0.0.0.0:80->80/tcp"]);
        assert!(containers[1].ports.is_empty());
    }

    #[tokio::test]
    async fn create_container_formats_one_run_line_and_returns_the_id() {
        let executor = Arc::new(ScriptedExecutor::new());
        let expected = "docker run -d --name web -p 8080:80/tcp \
                        -v /srv/data:/var/lib/data:ro -e MODE=prod \
                        --restart unless-stopped nginx:latest";
        executor.respond(expected, "abc123def\n");
        let docker = remote(&executor);

        let mut spec = ContainerSpec::new("nginx:latest");
        spec.name = Some("web".into());
        spec.ports = vec![crate::models::PortMapping {
            host_port: 8080,
            container_port: 80,
            protocol: "tcp".into(),
        }];
        spec.volumes = vec![crate::models::VolumeMount {
            host_path: "/srv/data".into(),
            container_path: "/var/lib/data".into(),
            read_only: true,
        }];
        spec.env = vec![crate::models::EnvVar {
            key: "MODE".into(),
            value: "prod".into(),
        }];
        spec.restart_policy = Some("unless-stopped".into());

        let id = docker.create_container("s1", &spec).await.unwrap();
        assert_eq!(id, "abc123def");
        assert_eq!(executor.executed(), vec![expected]);
    }

    #[tokio::test]
    async fn create_container_with_a_command_and_no_restart() {
        let executor = Arc::new(ScriptedExecutor::new());
        let docker = remote(&executor);

        let mut spec = ContainerSpec::new("alpine:3.19");
        spec.restart_policy = Some("no".into());
        spec.command = Some("sleep infinity".into());

        docker.create_container("s1", &spec).await.unwrap();
        assert_eq!(
            executor.executed(),
            vec!["docker run -d alpine:3.19 sleep infinity"]
        );
    }

    #[tokio::test]
    async fn container_stats_parses_one_row() {
        let executor = Arc::new(ScriptedExecutor::new());
        executor.respond(
            "docker stats web --no-stream --format '{{.CPUPerc}}|{{.MemUsage}}|{{.NetIO}}|{{.BlockIO}}'",
            "5.5%|100MiB / 1GiB|1kB / 2kB|3kB / 4kB\n",
        );
        let docker = remote(&executor);

        let stats = docker.container_stats("s1", "web").await.unwrap();
        assert!((stats.cpu_usage_percent - 5.5).abs() < 1e-9);
        assert_eq!(stats.memory_usage_bytes, 100 * 1024 * 1024);
        assert_eq!(stats.memory_limit_bytes, 1024 * 1024 * 1024);
        assert_eq!(stats.network_rx_bytes, 1_000);
        assert_eq!(stats.network_tx_bytes, 2_000);
        assert_eq!(stats.block_read_bytes, 3_000);
        assert_eq!(stats.block_write_bytes, 4_000);
    }

    #[tokio::test]
    async fn container_stats_rejects_garbage_output() {
        let executor = Arc::new(ScriptedExecutor::new());
        executor.respond(
            "docker stats gone --no-stream --format '{{.CPUPerc}}|{{.MemUsage}}|{{.NetIO}}|{{.BlockIO}}'",
            "Error response from daemon\n",
        );
        let docker = remote(&executor);

        let err = docker.container_stats("s1", "gone").await.unwrap_err();
        assert!(matches!(err, DispatchError::Transport(_)));
    }

    #[tokio::test]
    async fn list_networks_filters_builtins() {
        let executor = Arc::new(ScriptedExecutor::new());
        executor.respond(
            "docker network ls --format '{{.ID}}|{{.Name}}|{{.Driver}}|{{.Scope}}'",
            "n1|bridge|bridge|local\nn2|host|host|local\nn3|app-net|bridge|local\n",
        );
        let docker = remote(&executor);

        let networks = docker.list_networks("s1").await.unwrap();
        assert_eq!(networks.len(), 1);
        assert_eq!(networks[0].name, "app-net");
    }

    #[tokio::test]
    async fn status_classifies_probe_outcomes() {
        let executor = Arc::new(ScriptedExecutor::new());
        let docker = remote(&executor);
        // Both probes echo ok by default.
        assert_eq!(docker.status("s1").await, DockerStatus::Running);
        // Unknown session reads as disconnected.
        assert_eq!(docker.status("gone").await, DockerStatus::Disconnected);
    }

    #[tokio::test]
    async fn info_parses_both_format_outputs() {
        let executor = Arc::new(ScriptedExecutor::new());
        executor.respond(
            "docker version --format '{{.Client.Version}}|{{.Server.Version}}|{{.Client.Arch}}|{{.Client.Os}}'",
            "24.0.7|24.0.7|x86_64|linux\n",
        );
        executor.respond(
            "docker info --format '{{.Containers}}|{{.ContainersRunning}}|{{.ContainersPaused}}|{{.ContainersStopped}}|{{.Images}}|{{.KernelVersion}}'",
            "12|3|1|8|42|6.5.0-generic\n",
        );
        let docker = remote(&executor);

        let info = docker.info("s1").await.unwrap();
        assert_eq!(info.version, "24.0.7");
        assert_eq!(info.containers_total, 12);
        assert_eq!(info.containers_running, 3);
        assert_eq!(info.containers_paused, 1);
        assert_eq!(info.containers_stopped, 8);
        assert_eq!(info.images, 42);
        assert_eq!(info.architecture, "x86_64");
        assert_eq!(info.os, "linux");
        assert_eq!(info.kernel_version, "6.5.0-generic");
    }
}
