//! Durable connection profile store
//!
//! One JSON slot holding the operator's saved host profiles. Secrets are
//! only written when the profile carries one, i.e. when the operator opted
//! in. Missing or corrupt state is a cold start, never an error.

use crate::error::ProfileError;
use crate::models::{ConnectionProfile, ProfileIdentity};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info, warn};

pub struct ProfileStore {
    path: PathBuf,
    profiles: Mutex<Vec<ConnectionProfile>>,
}

impl ProfileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let profiles = Self::load_slot(&path);
        Self {
            path,
            profiles: Mutex::new(profiles),
        }
    }

    fn load_slot(path: &Path) -> Vec<ConnectionProfile> {
        if !path.exists() {
            return Vec::new();
        }
        match fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str::<Vec<ConnectionProfile>>(&content) {
                Ok(profiles) => {
                    info!(path = %path.display(), count = profiles.len(), "Loaded saved profiles");
                    profiles
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Profile slot corrupt, starting empty");
                    Vec::new()
                }
            },
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read profile slot, starting empty");
                Vec::new()
            }
        }
    }

    /// Write the full list atomically: temp file in the same directory, then
    /// rename over the slot.
    fn save_slot(&self, profiles: &[ConnectionProfile]) -> Result<(), ProfileError> {
        let storage = |e: std::io::Error| ProfileError::Storage(e.to_string());

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(storage)?;
            }
        }
        let json = serde_json::to_vec_pretty(profiles)
            .map_err(|e| ProfileError::Storage(e.to_string()))?;
        let temp = self.path.with_extension("tmp");
        fs::write(&temp, json).map_err(storage)?;
        fs::rename(&temp, &self.path).map_err(storage)?;
        debug!(path = %self.path.display(), count = profiles.len(), "Profile slot saved");
        Ok(())
    }

    pub fn list(&self) -> Vec<ConnectionProfile> {
        self.profiles.lock().unwrap().clone()
    }

    pub fn find(&self, identity: &ProfileIdentity) -> Option<ConnectionProfile> {
        self.profiles
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.identity() == *identity)
            .cloned()
    }

    /// Add a new profile; duplicate identities conflict.
    pub fn add(&self, profile: ConnectionProfile) -> Result<(), ProfileError> {
        let mut profiles = self.profiles.lock().unwrap();
        if profiles.iter().any(|p| p.identity() == profile.identity()) {
            return Err(ProfileError::Conflict(profile.identity()));
        }
        profiles.push(profile);
        self.save_slot(&profiles)
    }

    /// Record a profile if its identity is new; existing entries win. Used on
    /// successful connect so every reachable host ends up saved.
    pub fn remember(&self, profile: &ConnectionProfile) -> Result<(), ProfileError> {
        let mut profiles = self.profiles.lock().unwrap();
        if profiles.iter().any(|p| p.identity() == profile.identity()) {
            return Ok(());
        }
        profiles.push(profile.clone());
        self.save_slot(&profiles)
    }

    pub fn remove(&self, identity: &ProfileIdentity) -> Result<(), ProfileError> {
        let mut profiles = self.profiles.lock().unwrap();
        let before = profiles.len();
        profiles.retain(|p| p.identity() != *identity);
        if profiles.len() == before {
            return Err(ProfileError::NotFound(identity.clone()));
        }
        self.save_slot(&profiles)
    }

    /// Rename is the only mutation a saved profile supports.
    pub fn rename(
        &self,
        identity: &ProfileIdentity,
        display_name: impl Into<String>,
    ) -> Result<(), ProfileError> {
        let mut profiles = self.profiles.lock().unwrap();
        let profile = profiles
            .iter_mut()
            .find(|p| p.identity() == *identity)
            .ok_or_else(|| ProfileError::NotFound(identity.clone()))?;
        profile.display_name = display_name.into();
        self.save_slot(&profiles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> ProfileStore {
        ProfileStore::new(dir.path().join("profiles.json"))
    }

    #[test]
    fn add_and_list_round_trips_through_disk() {
        let dir = TempDir::new().unwrap();
        let s = store(&dir);
        s.add(ConnectionProfile::new("10.0.0.1", 22, "ops")).unwrap();
        s.add(ConnectionProfile::new("10.0.0.2", 22, "ops")).unwrap();

        // A fresh store over the same slot sees both.
        let reloaded = store(&dir);
        assert_eq!(reloaded.list().len(), 2);
    }

    #[test]
    fn duplicate_identity_conflicts() {
        let dir = TempDir::new().unwrap();
        let s = store(&dir);
        s.add(ConnectionProfile::new("10.0.0.1", 22, "ops")).unwrap();
        let err = s
            .add(ConnectionProfile::new("10.0.0.1", 22, "ops"))
            .unwrap_err();
        assert!(matches!(err, ProfileError::Conflict(_)));
    }

    #[test]
    fn corrupt_slot_is_a_cold_start() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("profiles.json");
        fs::write(&path, "{not json").unwrap();
        let s = ProfileStore::new(&path);
        assert!(s.list().is_empty());
    }

    #[test]
    fn remove_unknown_profile_reports_not_found() {
        let dir = TempDir::new().unwrap();
        let s = store(&dir);
        let identity = ConnectionProfile::new("10.0.0.9", 22, "ops").identity();
        assert!(matches!(
            s.remove(&identity),
            Err(ProfileError::NotFound(_))
        ));
    }

    #[test]
    fn rename_updates_display_name_only() {
        let dir = TempDir::new().unwrap();
        let s = store(&dir);
        let profile = ConnectionProfile::new("10.0.0.1", 22, "ops");
        let identity = profile.identity();
        s.add(profile).unwrap();

        s.rename(&identity, "staging box").unwrap();
        let found = s.find(&identity).unwrap();
        assert_eq!(found.display_name, "staging box");
        assert_eq!(found.identity(), identity);
    }

    #[test]
    fn secret_is_persisted_only_when_present() {
        let dir = TempDir::new().unwrap();
        let s = store(&dir);
        s.add(ConnectionProfile::new("10.0.0.1", 22, "ops")).unwrap();

        let raw = fs::read_to_string(dir.path().join("profiles.json")).unwrap();
        assert!(!raw.contains("savedSecret") && !raw.contains("saved_secret"));

        let mut with_secret = ConnectionProfile::new("10.0.0.2", 22, "ops");
        with_secret.saved_secret = Some("hunter2".into());
        s.add(with_secret).unwrap();
        let raw = fs::read_to_string(dir.path().join("profiles.json")).unwrap();
        assert!(raw.contains("hunter2"));
    }

    #[test]
    fn remember_keeps_existing_entry() {
        let dir = TempDir::new().unwrap();
        let s = store(&dir);
        let mut named = ConnectionProfile::new("10.0.0.1", 22, "ops");
        named.display_name = "prod".into();
        s.add(named).unwrap();

        s.remember(&ConnectionProfile::new("10.0.0.1", 22, "ops"))
            .unwrap();
        assert_eq!(s.list().len(), 1);
        assert_eq!(s.list()[0].display_name, "prod");
    }
}
