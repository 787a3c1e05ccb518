// talk-api/src/store.rs
use crate::types::Account;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Local account storage the client reads account context from
#[async_trait]
pub trait AccountStore: Send + Sync {
    fn account(&self, account_id: &str) -> Option<Account>;

    /// Record when federation invitations were last fetched (unix seconds)
    /// together with how many of them are still pending
    async fn update_last_federation_invitation_update(
        &self,
        account_id: &str,
        timestamp: i64,
        pending_invitations: usize,
    ) -> Result<()>;
}

/// Account store kept entirely in memory
#[derive(Default)]
pub struct MemoryAccountStore {
    accounts: RwLock<HashMap<String, Account>>,
    invitation_updates: RwLock<HashMap<String, (i64, usize)>>,
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, account: Account) {
        self.accounts
            .write()
            .insert(account.account_id.clone(), account);
    }

    pub fn last_federation_invitation_update(&self, account_id: &str) -> Option<i64> {
        self.invitation_updates
            .read()
            .get(account_id)
            .map(|(timestamp, _)| *timestamp)
    }

    pub fn pending_federation_invitations(&self, account_id: &str) -> Option<usize> {
        self.invitation_updates
            .read()
            .get(account_id)
            .map(|(_, pending)| *pending)
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    fn account(&self, account_id: &str) -> Option<Account> {
        self.accounts.read().get(account_id).cloned()
    }

    async fn update_last_federation_invitation_update(
        &self,
        account_id: &str,
        timestamp: i64,
        pending_invitations: usize,
    ) -> Result<()> {
        if !self.accounts.read().contains_key(account_id) {
            return Err(anyhow!("Account not found: {}", account_id));
        }
        self.invitation_updates
            .write()
            .insert(account_id.to_string(), (timestamp, pending_invitations));
        Ok(())
    }
}
