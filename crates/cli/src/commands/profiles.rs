//! Saved connection profile commands

use anyhow::{anyhow, bail, Result};
use tabled::Tabled;

use crate::output::{print_success, print_table, print_warning, OutputFormat};
use crate::ProfileCommands;
use dockhand_lib::{AppContext, ConnectionProfile, ProfileIdentity};

/// Row for the profile list table
#[derive(Tabled, serde::Serialize)]
struct ProfileRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Identity")]
    identity: String,
    #[tabled(rename = "Password saved")]
    password_saved: String,
}

/// Parse an identity argument of the form `user@host:port` (port optional,
/// defaults to 22).
fn parse_identity(text: &str) -> Result<ProfileIdentity> {
    let (username, rest) = text
        .split_once('@')
        .ok_or_else(|| anyhow!("expected user@host[:port], got {:?}", text))?;
    if username.is_empty() {
        bail!("expected user@host[:port], got {:?}", text);
    }
    let (host, port) = match rest.rsplit_once(':') {
        Some((host, port)) => (host, port.parse()?),
        None => (rest, 22),
    };
    if host.is_empty() {
        bail!("expected user@host[:port], got {:?}", text);
    }
    Ok(ProfileIdentity {
        host: host.to_string(),
        port,
        username: username.to_string(),
    })
}

pub fn run(ctx: &AppContext, cmd: &ProfileCommands, format: OutputFormat) -> Result<()> {
    match cmd {
        ProfileCommands::List => {
            let profiles = ctx.registry.list_profiles();
            let rows: Vec<ProfileRow> = profiles
                .iter()
                .map(|p| ProfileRow {
                    name: p.display_name.clone(),
                    identity: p.identity().to_string(),
                    password_saved: if p.saved_secret.is_some() { "yes" } else { "no" }.to_string(),
                })
                .collect();
            print_table(&rows, format);
        }
        ProfileCommands::Add {
            host,
            port,
            username,
            name,
            save_password,
        } => {
            let mut profile = ConnectionProfile::new(host.clone(), *port, username.clone());
            if let Some(name) = name {
                profile.display_name = name.clone();
            }
            if *save_password {
                match std::env::var("DOCKHAND_PASSWORD") {
                    Ok(password) if !password.is_empty() => {
                        profile.saved_secret = Some(password);
                    }
                    _ => bail!("--save-password requires DOCKHAND_PASSWORD to be set"),
                }
                print_warning("Password will be stored in plain text");
            }
            let identity = profile.identity();
            ctx.registry.add_profile(profile)?;
            print_success(&format!("Profile {} saved", identity));
        }
        ProfileCommands::Remove { identity } => {
            let identity = parse_identity(identity)?;
            ctx.registry.remove_profile(&identity)?;
            print_success(&format!("Profile {} removed", identity));
        }
        ProfileCommands::Rename { identity, name } => {
            let identity = parse_identity(identity)?;
            ctx.registry.rename_profile(&identity, name.clone())?;
            print_success(&format!("Profile {} renamed to {}", identity, name));
        }
    }
    Ok(())
}
