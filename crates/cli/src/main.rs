//! Dockhand CLI
//!
//! A command-line tool for managing remote Docker hosts over SSH:
//! containers, images, networks, volumes, saved connection profiles and
//! collected metric history.

mod commands;
mod config;
mod output;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use commands::{containers, history, images, networks, profiles, system, volumes};
use dockhand_lib::{AppContext, ConnectionProfile, SessionSummary};

/// Dockhand CLI
#[derive(Parser)]
#[command(name = "dockhand")]
#[command(author, version, about = "Manage remote Docker hosts over SSH", long_about = None)]
pub struct Cli {
    /// Remote host to connect to (can also be set via DOCKHAND_HOST)
    #[arg(long, short = 'H', env = "DOCKHAND_HOST", global = true)]
    pub host: Option<String>,

    /// SSH port on the remote host
    #[arg(long, env = "DOCKHAND_PORT", default_value_t = 22, global = true)]
    pub port: u16,

    /// SSH user on the remote host
    #[arg(long, short, env = "DOCKHAND_USER", default_value = "root", global = true)]
    pub username: String,

    /// SSH password (prefer DOCKHAND_PASSWORD over the flag)
    #[arg(long, env = "DOCKHAND_PASSWORD", hide_env_values = true, global = true)]
    pub password: Option<String>,

    /// Output format
    #[arg(long, short, default_value = "table", global = true)]
    pub format: output::OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show Docker daemon status on the remote host
    Status,

    /// Show Docker version and host information
    Info,

    /// Show one aggregated usage sample across running containers
    Usage,

    /// Run a raw shell command on the remote host
    Exec {
        /// Command line to run
        command: Vec<String>,
    },

    /// Manage containers
    #[command(subcommand)]
    Containers(ContainerCommands),

    /// Manage images
    #[command(subcommand)]
    Images(ImageCommands),

    /// Manage networks
    #[command(subcommand)]
    Networks(NetworkCommands),

    /// Manage volumes
    #[command(subcommand)]
    Volumes(VolumeCommands),

    /// Manage saved connection profiles
    #[command(subcommand)]
    Profiles(ProfileCommands),

    /// Inspect collected metric history
    #[command(subcommand)]
    History(HistoryCommands),
}

#[derive(Subcommand)]
pub enum ContainerCommands {
    /// List all containers
    List,

    /// Run a new container
    Run {
        image: String,

        /// Container name
        #[arg(long)]
        name: Option<String>,

        /// Publish a port (host:container[/protocol]); repeatable
        #[arg(long = "publish", short = 'p')]
        ports: Vec<String>,

        /// Bind mount (host:container[:ro]); repeatable
        #[arg(long = "volume", short = 'v')]
        volumes: Vec<String>,

        /// Environment variable (KEY=VALUE); repeatable
        #[arg(long = "env", short = 'e')]
        env: Vec<String>,

        /// Restart policy (no, always, unless-stopped, on-failure)
        #[arg(long)]
        restart: Option<String>,

        /// Command to run in the container
        command: Vec<String>,
    },

    /// Show a live resource sample for one container
    Stats { name: String },

    /// Start a container
    Start { name: String },

    /// Stop a container
    Stop { name: String },

    /// Restart a container
    Restart { name: String },

    /// Pause a container
    Pause { name: String },

    /// Unpause a container
    Unpause { name: String },

    /// Remove a container
    Remove { name: String },

    /// Show container logs
    Logs {
        name: String,

        /// Number of log lines from the end
        #[arg(long, default_value_t = 50)]
        tail: u32,
    },

    /// Run a command inside a container
    Exec {
        name: String,

        /// Command line to run inside the container
        command: Vec<String>,
    },
}

#[derive(Subcommand)]
pub enum ImageCommands {
    /// List images
    List,

    /// Pull an image
    Pull { image: String },

    /// Remove an image
    Remove { image: String },
}

#[derive(Subcommand)]
pub enum NetworkCommands {
    /// List networks (system networks hidden)
    List,

    /// Create a network
    Create {
        name: String,

        /// Network driver
        #[arg(long, default_value = "bridge")]
        driver: String,
    },

    /// Remove a network
    Remove { name: String },
}

#[derive(Subcommand)]
pub enum VolumeCommands {
    /// List volumes
    List,

    /// Create a volume
    Create {
        name: String,

        /// Volume driver
        #[arg(long, default_value = "local")]
        driver: String,
    },

    /// Remove a volume
    Remove { name: String },
}

#[derive(Subcommand)]
pub enum ProfileCommands {
    /// List saved profiles
    List,

    /// Save a profile
    Add {
        host: String,

        #[arg(long, default_value_t = 22)]
        port: u16,

        #[arg(long, short, default_value = "root")]
        username: String,

        /// Display name for the profile
        #[arg(long)]
        name: Option<String>,

        /// Also store the password from DOCKHAND_PASSWORD with the profile
        #[arg(long)]
        save_password: bool,
    },

    /// Remove a saved profile (identity: user@host:port)
    Remove { identity: String },

    /// Rename a saved profile (identity: user@host:port)
    Rename { identity: String, name: String },
}

#[derive(Subcommand)]
pub enum HistoryCommands {
    /// Show collected metric history
    Show,

    /// Clear collected metric history
    Clear,
}

/// Establish a session for commands that talk to the remote host.
async fn connect(ctx: &AppContext, cli: &Cli) -> Result<SessionSummary> {
    let Some(host) = cli.host.clone() else {
        bail!("no host given; pass --host or set DOCKHAND_HOST");
    };
    let profile = ConnectionProfile::new(host, cli.port, cli.username.clone());

    let secret = match &cli.password {
        Some(password) => password.clone(),
        // Fall back to a saved profile secret for this identity.
        None => ctx
            .registry
            .list_profiles()
            .into_iter()
            .find(|p| p.identity() == profile.identity())
            .and_then(|p| p.saved_secret)
            .context("no password given; pass --password, set DOCKHAND_PASSWORD, or save one with `profiles add --save-password`")?,
    };

    let session = ctx.registry.connect(profile, &secret).await?;
    Ok(session)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let ctx = AppContext::new(config::orchestrator_config()?);

    match &cli.command {
        Commands::Status => {
            let session = connect(&ctx, &cli).await?;
            system::show_status(&ctx, &session.id, cli.format).await?;
            ctx.registry.disconnect(&session.id);
        }
        Commands::Info => {
            let session = connect(&ctx, &cli).await?;
            system::show_info(&ctx, &session.id, cli.format).await?;
            ctx.registry.disconnect(&session.id);
        }
        Commands::Usage => {
            let session = connect(&ctx, &cli).await?;
            system::show_usage(&ctx, &session.id, cli.format).await?;
            ctx.registry.disconnect(&session.id);
        }
        Commands::Exec { command } => {
            let session = connect(&ctx, &cli).await?;
            system::run_shell(&ctx, &session.id, &command.join(" ")).await?;
            ctx.registry.disconnect(&session.id);
        }
        Commands::Containers(cmd) => {
            let session = connect(&ctx, &cli).await?;
            containers::run(&ctx, &session.id, cmd, cli.format).await?;
            ctx.registry.disconnect(&session.id);
        }
        Commands::Images(cmd) => {
            let session = connect(&ctx, &cli).await?;
            images::run(&ctx, &session.id, cmd, cli.format).await?;
            ctx.registry.disconnect(&session.id);
        }
        Commands::Networks(cmd) => {
            let session = connect(&ctx, &cli).await?;
            networks::run(&ctx, &session.id, cmd, cli.format).await?;
            ctx.registry.disconnect(&session.id);
        }
        Commands::Volumes(cmd) => {
            let session = connect(&ctx, &cli).await?;
            volumes::run(&ctx, &session.id, cmd, cli.format).await?;
            ctx.registry.disconnect(&session.id);
        }
        Commands::Profiles(cmd) => {
            profiles::run(&ctx, cmd, cli.format)?;
        }
        Commands::History(cmd) => {
            history::run(&ctx, cmd, cli.format)?;
        }
    }

    Ok(())
}
