// talk-cli/src/commands/federation.rs
use crate::output::{print_response, Response};
use anyhow::Result;
use talk_accounts::ConfiguredClient;

#[derive(clap::Subcommand, Clone, Debug)]
pub enum FederationCommands {
    /// List invitations from other servers
    List,
    /// Accept an invitation
    Accept { id: i64 },
    /// Reject an invitation
    Reject { id: i64 },
}

pub async fn handle_federation(
    client: &ConfiguredClient,
    account_id: &str,
    cmd: FederationCommands,
) -> Result<()> {
    match cmd {
        FederationCommands::List => {
            let invitations = client.get_federation_invitations(account_id).await?;
            print_response(&Response::ok(invitations))
        }
        FederationCommands::Accept { id } => {
            client.accept_federation_invitation(account_id, id).await?;
            print_response(&Response::ok(serde_json::json!({"id": id, "accepted": true})))
        }
        FederationCommands::Reject { id } => {
            client.reject_federation_invitation(account_id, id).await?;
            print_response(&Response::ok(serde_json::json!({"id": id, "rejected": true})))
        }
    }
}
