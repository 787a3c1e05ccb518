// talk-cli/src/commands/chat.rs
use crate::output::{print_response, Response};
use anyhow::Result;
use talk_accounts::ConfiguredClient;

#[derive(clap::Args, Clone, Debug)]
pub struct MentionsArgs {
    /// Room token
    pub token: String,
    /// Text typed after `@`
    #[arg(default_value = "")]
    pub search: String,
}

pub async fn handle_mentions(
    client: &ConfiguredClient,
    account_id: &str,
    args: MentionsArgs,
) -> Result<()> {
    let mentions = client
        .get_mention_suggestions(account_id, &args.token, &args.search)
        .await?;
    print_response(&Response::ok(mentions))
}
