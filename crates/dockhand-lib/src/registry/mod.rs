//! Session registry
//!
//! Owns the map of live sessions and is the only place session ids are
//! minted. Connecting to an identity that already has a live session
//! supersedes the old one (its queued commands fail closed) so a host never
//! accumulates orphaned channels. Idle cleanup is caller-invoked; the
//! registry schedules nothing on its own.

mod profiles;

pub use profiles::ProfileStore;

use crate::dispatch::Dispatcher;
use crate::error::{ConnectError, ProfileError};
use crate::executor::RemoteExecutor;
use crate::models::{ConnectionProfile, ProfileIdentity, SessionSummary};
use chrono::{DateTime, TimeZone, Utc};
use dashmap::DashMap;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

struct SessionEntry {
    profile: ConnectionProfile,
    connected_at: DateTime<Utc>,
    activity: Arc<AtomicI64>,
}

impl SessionEntry {
    fn summary(&self, id: &str) -> SessionSummary {
        let last = self.activity.load(Ordering::Acquire);
        SessionSummary {
            id: id.to_string(),
            host: self.profile.host.clone(),
            port: self.profile.port,
            username: self.profile.username.clone(),
            connected_at: self.connected_at,
            last_activity: Utc
                .timestamp_opt(last, 0)
                .single()
                .unwrap_or(self.connected_at),
        }
    }
}

pub struct ConnectionRegistry {
    executor: Arc<dyn RemoteExecutor>,
    dispatcher: Arc<Dispatcher>,
    profiles: Arc<ProfileStore>,
    sessions: DashMap<String, SessionEntry>,
    // Monotonic; ids are never reused after invalidation.
    next_id: AtomicU64,
}

impl ConnectionRegistry {
    pub fn new(
        executor: Arc<dyn RemoteExecutor>,
        dispatcher: Arc<Dispatcher>,
        profiles: Arc<ProfileStore>,
    ) -> Self {
        Self {
            executor,
            dispatcher,
            profiles,
            sessions: DashMap::new(),
            next_id: AtomicU64::new(0),
        }
    }

    fn mint_session_id(&self) -> String {
        format!("sess-{}", self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    /// Establish a session. Any existing session for the same profile
    /// identity is torn down before the new one is installed.
    pub async fn connect(
        &self,
        profile: ConnectionProfile,
        secret: &str,
    ) -> Result<SessionSummary, ConnectError> {
        let token = self.executor.open_channel(&profile, secret).await?;

        let identity = profile.identity();
        if let Some(old_id) = self.find_by_identity(&identity) {
            info!(session_id = %old_id, identity = %identity, "Superseding existing session");
            self.disconnect(&old_id);
        }

        let id = self.mint_session_id();
        let now = Utc::now();
        let activity = Arc::new(AtomicI64::new(now.timestamp()));
        self.dispatcher
            .open_lane(&id, token, Arc::clone(&activity));
        let entry = SessionEntry {
            profile: profile.clone(),
            connected_at: now,
            activity,
        };
        let summary = entry.summary(&id);
        self.sessions.insert(id.clone(), entry);

        if let Err(e) = self.profiles.remember(&profile) {
            warn!(identity = %identity, error = %e, "Failed to save profile");
        }
        info!(session_id = %id, identity = %identity, "Session established");
        Ok(summary)
    }

    /// Open and immediately close a channel without registering a session.
    pub async fn test_connection(
        &self,
        profile: &ConnectionProfile,
        secret: &str,
    ) -> Result<(), ConnectError> {
        let token = self.executor.open_channel(profile, secret).await?;
        if let Err(e) = self.executor.close_channel(&token).await {
            debug!(error = %e, "Test channel close failed");
        }
        Ok(())
    }

    /// Remove a session. Idempotent; transport close failures are logged by
    /// the lane worker since the session is going away regardless.
    pub fn disconnect(&self, session_id: &str) {
        let removed = self.sessions.remove(session_id).is_some();
        let lane_closed = self.dispatcher.close_lane(session_id);
        if removed || lane_closed {
            info!(session_id = %session_id, "Session disconnected");
        } else {
            debug!(session_id = %session_id, "Disconnect for unknown session ignored");
        }
    }

    /// Disconnect every tracked session, returning how many were closed.
    pub fn disconnect_all(&self) -> usize {
        let ids: Vec<String> = self.sessions.iter().map(|e| e.key().clone()).collect();
        for id in &ids {
            self.disconnect(id);
        }
        ids.len()
    }

    /// Disconnect sessions idle longer than `max_idle`. Invoked on demand or
    /// from a timer the embedding application wires up.
    pub fn cleanup_idle(&self, max_idle: Duration) -> usize {
        let now = Utc::now().timestamp();
        let stale: Vec<String> = self
            .sessions
            .iter()
            .filter(|e| {
                let idle = now.saturating_sub(e.value().activity.load(Ordering::Acquire));
                idle > max_idle.as_secs() as i64
            })
            .map(|e| e.key().clone())
            .collect();
        for id in &stale {
            info!(session_id = %id, "Closing idle session");
            self.disconnect(id);
        }
        stale.len()
    }

    pub fn list_active(&self) -> Vec<SessionSummary> {
        let mut sessions: Vec<SessionSummary> = self
            .sessions
            .iter()
            .map(|e| e.value().summary(e.key()))
            .collect();
        sessions.sort_by(|a, b| a.connected_at.cmp(&b.connected_at));
        sessions
    }

    pub fn session(&self, session_id: &str) -> Option<SessionSummary> {
        self.sessions.get(session_id).map(|e| e.summary(e.key()))
    }

    pub fn list_profiles(&self) -> Vec<ConnectionProfile> {
        self.profiles.list()
    }

    pub fn add_profile(&self, profile: ConnectionProfile) -> Result<(), ProfileError> {
        self.profiles.add(profile)
    }

    pub fn rename_profile(
        &self,
        identity: &ProfileIdentity,
        display_name: impl Into<String>,
    ) -> Result<(), ProfileError> {
        self.profiles.rename(identity, display_name)
    }

    /// Remove a saved profile; refused while a session for that identity is
    /// live.
    pub fn remove_profile(&self, identity: &ProfileIdentity) -> Result<(), ProfileError> {
        if self.find_by_identity(identity).is_some() {
            return Err(ProfileError::SessionActive(identity.clone()));
        }
        self.profiles.remove(identity)
    }

    fn find_by_identity(&self, identity: &ProfileIdentity) -> Option<String> {
        self.sessions
            .iter()
            .find(|e| e.value().profile.identity() == *identity)
            .map(|e| e.key().clone())
    }

    #[cfg(test)]
    fn backdate_activity(&self, session_id: &str, secs_ago: i64) {
        let entry = self.sessions.get(session_id).unwrap();
        entry
            .activity
            .store(Utc::now().timestamp() - secs_ago, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DispatchError;
    use crate::testing::ScriptedExecutor;
    use tempfile::TempDir;

    struct Fixture {
        _dir: TempDir,
        executor: Arc<ScriptedExecutor>,
        dispatcher: Arc<Dispatcher>,
        registry: ConnectionRegistry,
    }

    fn fixture() -> Fixture {
        let dir = TempDir::new().unwrap();
        let executor = Arc::new(ScriptedExecutor::new());
        let dispatcher = Arc::new(Dispatcher::new(executor.clone(), None));
        let profiles = Arc::new(ProfileStore::new(dir.path().join("profiles.json")));
        let registry =
            ConnectionRegistry::new(executor.clone(), dispatcher.clone(), profiles);
        Fixture {
            _dir: dir,
            executor,
            dispatcher,
            registry,
        }
    }

    fn profile(host: &str) -> ConnectionProfile {
        ConnectionProfile::new(host, 22, "ops")
    }

    #[tokio::test]
    async fn connect_registers_a_dispatchable_session() {
        let f = fixture();
        let session = f.registry.connect(profile("10.0.0.1"), "pw").await.unwrap();

        assert_eq!(f.registry.list_active().len(), 1);
        let out = f.dispatcher.submit(&session.id, "uptime").await.unwrap();
        assert_eq!(out, "ok:uptime");
    }

    #[tokio::test]
    async fn connect_errors_propagate() {
        let f = fixture();
        let err = f
            .registry
            .connect(profile("unreachable"), "pw")
            .await
            .unwrap_err();
        assert!(matches!(err, ConnectError::Unreachable(_)));

        let err = f
            .registry
            .connect(profile("10.0.0.1"), "wrong-secret")
            .await
            .unwrap_err();
        assert!(matches!(err, ConnectError::Authentication(_)));
        assert!(f.registry.list_active().is_empty());
    }

    #[tokio::test]
    async fn reconnect_supersedes_the_old_session() {
        let f = fixture();
        let first = f.registry.connect(profile("10.0.0.1"), "pw").await.unwrap();
        let second = f.registry.connect(profile("10.0.0.1"), "pw").await.unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(f.registry.list_active().len(), 1);
        assert_eq!(f.registry.list_active()[0].id, second.id);

        let err = f.dispatcher.submit(&first.id, "uptime").await.unwrap_err();
        assert!(matches!(err, DispatchError::SessionClosed));
        assert_eq!(
            f.dispatcher.submit(&second.id, "uptime").await.unwrap(),
            "ok:uptime"
        );
    }

    #[tokio::test]
    async fn session_ids_are_never_reused() {
        let f = fixture();
        let first = f.registry.connect(profile("10.0.0.1"), "pw").await.unwrap();
        f.registry.disconnect(&first.id);
        let second = f.registry.connect(profile("10.0.0.1"), "pw").await.unwrap();
        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn disconnect_is_idempotent() {
        let f = fixture();
        let session = f.registry.connect(profile("10.0.0.1"), "pw").await.unwrap();
        f.registry.disconnect(&session.id);
        f.registry.disconnect(&session.id);
        f.registry.disconnect("sess-never-was");
        assert!(f.registry.list_active().is_empty());
    }

    #[tokio::test]
    async fn disconnect_all_reports_the_count() {
        let f = fixture();
        f.registry.connect(profile("10.0.0.1"), "pw").await.unwrap();
        f.registry.connect(profile("10.0.0.2"), "pw").await.unwrap();
        assert_eq!(f.registry.disconnect_all(), 2);
        assert!(f.registry.list_active().is_empty());
    }

    #[tokio::test]
    async fn cleanup_idle_removes_only_stale_sessions() {
        let f = fixture();
        let stale = f.registry.connect(profile("10.0.0.1"), "pw").await.unwrap();
        let fresh = f.registry.connect(profile("10.0.0.2"), "pw").await.unwrap();

        f.registry.backdate_activity(&stale.id, 45 * 60);
        f.registry.backdate_activity(&fresh.id, 5 * 60);

        let removed = f.registry.cleanup_idle(Duration::from_secs(30 * 60));
        assert_eq!(removed, 1);
        let active = f.registry.list_active();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, fresh.id);
    }

    #[tokio::test]
    async fn connect_remembers_the_profile_without_secret() {
        let f = fixture();
        f.registry.connect(profile("10.0.0.1"), "pw").await.unwrap();
        let saved = f.registry.list_profiles();
        assert_eq!(saved.len(), 1);
        assert!(saved[0].saved_secret.is_none());
    }

    #[tokio::test]
    async fn profile_with_live_session_cannot_be_removed() {
        let f = fixture();
        let session = f.registry.connect(profile("10.0.0.1"), "pw").await.unwrap();
        let identity = profile("10.0.0.1").identity();

        let err = f.registry.remove_profile(&identity).unwrap_err();
        assert!(matches!(err, ProfileError::SessionActive(_)));

        f.registry.disconnect(&session.id);
        f.registry.remove_profile(&identity).unwrap();
        assert!(f.registry.list_profiles().is_empty());
    }

    #[tokio::test]
    async fn test_connection_leaves_no_session_behind() {
        let f = fixture();
        f.registry
            .test_connection(&profile("10.0.0.1"), "pw")
            .await
            .unwrap();
        assert!(f.registry.list_active().is_empty());
        assert_eq!(f.executor.closed_tokens().len(), 1);
    }
}
