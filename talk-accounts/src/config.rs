// talk-accounts/src/config.rs
use anyhow::{anyhow, Context, Result};
use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use talk_api::{Account, ServerCapabilities};
use url::Url;

const CONFIG_DIR_NAME: &str = "talk-cli";
const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Account used when no `--account` is given
    #[serde(default)]
    pub active_account: Option<String>,
    #[serde(default)]
    pub accounts: Vec<AccountConfig>,
    /// App password from `TALK_APP_PASSWORD`, applies to the active account
    #[serde(skip)]
    password_override: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AccountConfig {
    pub account_id: String,
    pub server: String,
    pub user: String,
    /// App password for the OCS API
    #[serde(default)]
    pub app_password: String,
    /// Unix seconds of the last successful federation invitation fetch
    #[serde(default)]
    pub last_federation_invitation_update: Option<i64>,
    /// Invitations still pending as of that fetch
    #[serde(default)]
    pub pending_federation_invitations: usize,
    #[serde(default)]
    pub capabilities: ServerCapabilities,
}

impl AccountConfig {
    /// New account entry; the id is derived as `user@host`
    pub fn new(server: &str, user: &str, app_password: String) -> Result<Self> {
        let url = Url::parse(server).with_context(|| format!("Invalid server URL: {}", server))?;
        let host = url
            .host_str()
            .ok_or_else(|| anyhow!("Server URL has no host: {}", server))?;

        Ok(Self {
            account_id: format!("{}@{}", user, host),
            server: server.trim_end_matches('/').to_string(),
            user: user.to_string(),
            app_password,
            last_federation_invitation_update: None,
            pending_federation_invitations: 0,
            capabilities: ServerCapabilities::default(),
        })
    }

    pub fn to_account(&self) -> Result<Account> {
        Ok(Account {
            account_id: self.account_id.clone(),
            server: Url::parse(&self.server)
                .with_context(|| format!("Invalid server URL: {}", self.server))?,
            user_id: self.user.clone(),
            capabilities: self.capabilities.clone(),
        })
    }
}

impl Config {
    /// Load from the default location, creating an empty config on first use
    pub fn load() -> Result<Self> {
        let path = Self::path()?;

        if !path.exists() {
            if let Some(dir) = path.parent() {
                fs::create_dir_all(dir)?;
            }
            let default = Self::default();
            default.save_to(&path)?;
            return Ok(default);
        }

        let mut config = Self::load_from(&path)?;

        // Allow the app password to be supplied via environment variable
        if let Ok(password) = std::env::var("TALK_APP_PASSWORD") {
            config.password_override = Some(password);
        }

        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Cannot read config {}", path.display()))?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;

        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options
            .open(path)
            .with_context(|| format!("Cannot write config {}", path.display()))?;
        file.write_all(content.as_bytes())?;

        // The creation mode does not apply to a file that already existed
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(path)?.permissions();
            perms.set_mode(0o600);
            fs::set_permissions(path, perms)?;
        }

        Ok(())
    }

    /// Config file path; `TALK_CONFIG` overrides the default
    pub fn path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var("TALK_CONFIG") {
            return Ok(PathBuf::from(path));
        }
        let base_dirs =
            BaseDirs::new().ok_or_else(|| anyhow!("Cannot determine config directory"))?;
        Ok(base_dirs
            .config_dir()
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME))
    }

    pub fn account(&self, account_id: &str) -> Option<&AccountConfig> {
        self.accounts.iter().find(|a| a.account_id == account_id)
    }

    pub fn account_mut(&mut self, account_id: &str) -> Option<&mut AccountConfig> {
        self.accounts.iter_mut().find(|a| a.account_id == account_id)
    }

    pub fn active_account_id(&self) -> Option<&str> {
        self.active_account
            .as_deref()
            .or_else(|| self.accounts.first().map(|a| a.account_id.as_str()))
    }

    /// Resolve an explicit account id or fall back to the active account
    pub fn resolve_account_id(&self, requested: Option<&str>) -> Result<String> {
        let id = requested
            .or_else(|| self.active_account_id())
            .ok_or_else(|| anyhow!("No account configured. Run: talk account add"))?;
        if self.account(id).is_none() {
            return Err(anyhow!("Unknown account: {}", id));
        }
        Ok(id.to_string())
    }

    /// Insert or replace an account; the first account becomes active
    pub fn upsert_account(&mut self, account: AccountConfig) {
        if self.active_account.is_none() {
            self.active_account = Some(account.account_id.clone());
        }
        match self.account_mut(&account.account_id) {
            Some(existing) => *existing = account,
            None => self.accounts.push(account),
        }
    }

    /// Remove an account; if it was active, the first remaining account
    /// takes over
    pub fn remove_account(&mut self, account_id: &str) -> Result<AccountConfig> {
        let index = self
            .accounts
            .iter()
            .position(|a| a.account_id == account_id)
            .ok_or_else(|| anyhow!("Unknown account: {}", account_id))?;
        let removed = self.accounts.remove(index);

        if self.active_account.as_deref() == Some(account_id) {
            self.active_account = self.accounts.first().map(|a| a.account_id.clone());
        }
        Ok(removed)
    }

    pub fn set_active(&mut self, account_id: &str) -> Result<()> {
        if self.account(account_id).is_none() {
            return Err(anyhow!("Unknown account: {}", account_id));
        }
        self.active_account = Some(account_id.to_string());
        Ok(())
    }

    /// App password for an account, honouring the environment override
    pub fn app_password<'a>(&'a self, account: &'a AccountConfig) -> &'a str {
        match &self.password_override {
            Some(password) if self.active_account_id() == Some(account.account_id.as_str()) => {
                password
            }
            _ => &account.app_password,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_password_override(mut self, password: &str) -> Self {
        self.password_override = Some(password.to_string());
        self
    }
}
