// talk-accounts/src/store.rs
use crate::config::Config;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use talk_api::{Account, AccountStore};
use tracing::warn;

/// Account store backed by the TOML config file.
///
/// Reads come from the in-memory copy. Invitation updates are applied in
/// memory, then the file is rewritten on the blocking thread pool.
pub struct FileAccountStore {
    path: PathBuf,
    config: Mutex<Config>,
}

impl FileAccountStore {
    pub fn new(config: Config, path: PathBuf) -> Self {
        Self {
            path,
            config: Mutex::new(config),
        }
    }

    pub fn open(path: &Path) -> Result<Self> {
        let config = Config::load_from(path)?;
        Ok(Self::new(config, path.to_path_buf()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Snapshot of the current config
    pub fn config(&self) -> Config {
        self.config.lock().clone()
    }

    pub fn last_federation_invitation_update(&self, account_id: &str) -> Option<i64> {
        self.config
            .lock()
            .account(account_id)
            .and_then(|a| a.last_federation_invitation_update)
    }

    pub fn pending_federation_invitations(&self, account_id: &str) -> Option<usize> {
        self.config
            .lock()
            .account(account_id)
            .map(|a| a.pending_federation_invitations)
    }
}

#[async_trait]
impl AccountStore for FileAccountStore {
    fn account(&self, account_id: &str) -> Option<Account> {
        let config = self.config.lock();
        let entry = config.account(account_id)?;
        match entry.to_account() {
            Ok(account) => Some(account),
            Err(e) => {
                warn!(account = account_id, error = %e, "ignoring misconfigured account");
                None
            }
        }
    }

    async fn update_last_federation_invitation_update(
        &self,
        account_id: &str,
        timestamp: i64,
        pending_invitations: usize,
    ) -> Result<()> {
        let snapshot = {
            let mut config = self.config.lock();
            let entry = config
                .account_mut(account_id)
                .ok_or_else(|| anyhow!("Unknown account: {}", account_id))?;
            entry.last_federation_invitation_update = Some(timestamp);
            entry.pending_federation_invitations = pending_invitations;
            config.clone()
        };

        let path = self.path.clone();
        tokio::task::spawn_blocking(move || snapshot.save_to(&path))
            .await
            .context("Config writer task failed")?
    }
}
