// talk-cli/src/commands/bans.rs
use crate::output::{print_response, Response};
use anyhow::Result;
use talk_accounts::ConfiguredClient;

#[derive(clap::Subcommand, Clone, Debug)]
pub enum BansCommands {
    /// List bans of a room
    List { token: String },
    /// Ban an actor from a room
    Add {
        token: String,
        actor_id: String,
        /// `users`, `groups`, `emails`, ...
        #[arg(long, default_value = "users")]
        actor_type: String,
        /// Note visible to moderators only
        #[arg(long)]
        note: Option<String>,
    },
    /// Lift a ban
    Remove { token: String, ban_id: i64 },
}

pub async fn handle_bans(
    client: &ConfiguredClient,
    account_id: &str,
    cmd: BansCommands,
) -> Result<()> {
    match cmd {
        BansCommands::List { token } => {
            let bans = client.list_bans(account_id, &token).await?;
            print_response(&Response::ok(bans))
        }
        BansCommands::Add {
            token,
            actor_id,
            actor_type,
            note,
        } => {
            client
                .ban_actor(account_id, &token, &actor_type, &actor_id, note.as_deref())
                .await?;
            print_response(&Response::ok(serde_json::json!({
                "token": token,
                "actorType": actor_type,
                "actorId": actor_id,
                "banned": true,
            })))
        }
        BansCommands::Remove { token, ban_id } => {
            client.unban_actor(account_id, &token, ban_id).await?;
            print_response(&Response::ok(serde_json::json!({
                "token": token,
                "banId": ban_id,
                "removed": true,
            })))
        }
    }
}
