// talk-cli/src/commands/account.rs
use crate::output::{print_response, print_success, Response};
use anyhow::{anyhow, Result};
use dialoguer::Password;
use talk_accounts::{AccountConfig, Config};

#[derive(clap::Subcommand, Clone, Debug)]
pub enum AccountCommands {
    /// Add or update an account
    Add {
        /// Server URL, e.g. https://cloud.example.com
        server: String,
        /// Login name
        user: String,
        /// Talk feature the server supports (repeatable)
        #[arg(long = "feature")]
        features: Vec<String>,
        /// Server has the user status app enabled
        #[arg(long)]
        user_status: bool,
    },
    /// List configured accounts
    List,
    /// Make an account the default
    Use { account_id: String },
    /// Forget an account and its app password
    Remove { account_id: String },
}

pub fn handle_account(cmd: AccountCommands) -> Result<()> {
    let mut config = Config::load()?;

    match cmd {
        AccountCommands::Add {
            server,
            user,
            features,
            user_status,
        } => {
            let app_password = match std::env::var("TALK_APP_PASSWORD") {
                Ok(password) => password,
                Err(_) => Password::new()
                    .with_prompt(format!("App password for {}", user))
                    .interact()?,
            };
            if app_password.is_empty() {
                return Err(anyhow!("App password cannot be empty"));
            }

            let mut account = AccountConfig::new(&server, &user, app_password)?;
            account.capabilities.features = features;
            account.capabilities.user_status = user_status;
            let account_id = account.account_id.clone();

            config.upsert_account(account);
            config.save()?;

            print_success(&format!("Saved account {}", account_id));
            print_response(&Response::ok(serde_json::json!({
                "accountId": account_id,
                "active": config.active_account_id() == Some(account_id.as_str()),
            })))
        }
        AccountCommands::List => {
            let active = config.active_account_id();
            let accounts: Vec<_> = config
                .accounts
                .iter()
                .map(|a| {
                    serde_json::json!({
                        "accountId": a.account_id,
                        "server": a.server,
                        "user": a.user,
                        "active": active == Some(a.account_id.as_str()),
                        "features": a.capabilities.features,
                        "userStatus": a.capabilities.user_status,
                        "lastFederationInvitationUpdate": a.last_federation_invitation_update,
                        "pendingFederationInvitations": a.pending_federation_invitations,
                    })
                })
                .collect();
            print_response(&Response::ok(accounts))
        }
        AccountCommands::Use { account_id } => {
            config.set_active(&account_id)?;
            config.save()?;
            print_response(&Response::ok(serde_json::json!({
                "accountId": account_id,
                "active": true,
            })))
        }
        AccountCommands::Remove { account_id } => {
            config.remove_account(&account_id)?;
            config.save()?;
            print_response(&Response::ok(serde_json::json!({
                "accountId": account_id,
                "removed": true,
                "activeAccount": config.active_account_id(),
            })))
        }
    }
}
