pub mod config;
pub mod store;

pub use config::{AccountConfig, Config};
pub use store::FileAccountStore;

use anyhow::Result;
use std::sync::Arc;
use talk_api::{ReqwestSession, SessionPool, TalkClient};
use tracing::debug;

/// Client type wired to the config file and reqwest sessions
pub type ConfiguredClient = TalkClient<SessionPool, FileAccountStore>;

/// Register one authenticated session per account that has an app password.
///
/// Accounts without a password get no session, so every operation on them
/// fails without touching the network.
pub fn connect(config: &Config) -> SessionPool {
    let pool = SessionPool::new();
    for account in &config.accounts {
        let password = config.app_password(account);
        if password.is_empty() {
            debug!(account = %account.account_id, "no app password, skipping session");
            continue;
        }
        let session =
            ReqwestSession::new().with_credentials(account.user.clone(), password.to_string());
        pool.register(account.account_id.clone(), Arc::new(session));
    }
    pool
}

/// Load the config from its default location and build a client over it
pub fn open_client() -> Result<ConfiguredClient> {
    let config = Config::load()?;
    let path = Config::path()?;
    let sessions = connect(&config);
    Ok(TalkClient::new(sessions, FileAccountStore::new(config, path)))
}
