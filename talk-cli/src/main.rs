mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{
    handle_account, handle_bans, handle_federation, handle_mentions, handle_rooms,
    AccountCommands, BansCommands, FederationCommands, MentionsArgs, RoomsCommands,
};
use output::{print_error, print_response, ErrorResponse, ExitCode, Response};
use talk_accounts::ConfiguredClient;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "talk")]
#[command(about = "A command-line client for Nextcloud Talk", long_about = None)]
struct Cli {
    /// Account id (`user@host`); defaults to the active account
    #[arg(long, global = true)]
    account: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Conversations
    #[command(subcommand)]
    Rooms(RoomsCommands),
    /// Invitations from federated servers
    #[command(subcommand)]
    Federation(FederationCommands),
    /// Room bans
    #[command(subcommand)]
    Bans(BansCommands),
    /// Mention autocompletion
    Mentions(MentionsArgs),
    /// Configured accounts
    #[command(subcommand)]
    Account(AccountCommands),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("TALK_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();

    let code = match run(cli).await {
        Ok(()) => ExitCode::Success,
        Err(e) => {
            let (error, code) = ErrorResponse::classify(&e);
            tracing::debug!(error = ?e, exit = %code, "command failed");
            if print_response(&Response::<()>::error(error)).is_err() {
                print_error(&format!("{:#}", e));
            }
            code
        }
    };

    std::process::exit(code.code());
}

async fn run(cli: Cli) -> Result<()> {
    let account = cli.account.as_deref();
    match cli.command {
        Commands::Account(cmd) => handle_account(cmd),
        Commands::Rooms(cmd) => {
            let (client, account_id) = connect(account)?;
            handle_rooms(&client, &account_id, cmd).await
        }
        Commands::Federation(cmd) => {
            let (client, account_id) = connect(account)?;
            handle_federation(&client, &account_id, cmd).await
        }
        Commands::Bans(cmd) => {
            let (client, account_id) = connect(account)?;
            handle_bans(&client, &account_id, cmd).await
        }
        Commands::Mentions(args) => {
            let (client, account_id) = connect(account)?;
            handle_mentions(&client, &account_id, args).await
        }
    }
}

/// Build the client and pick the account to run under
fn connect(requested: Option<&str>) -> Result<(ConfiguredClient, String)> {
    let client = talk_accounts::open_client()?;
    let account_id = client.accounts().config().resolve_account_id(requested)?;
    Ok((client, account_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_global_account() {
        let cli = Cli::try_parse_from(["talk", "bans", "list", "r1", "--account", "bob@cloud"])
            .unwrap();
        assert_eq!(cli.account.as_deref(), Some("bob@cloud"));
        assert!(matches!(
            cli.command,
            Commands::Bans(BansCommands::List { ref token }) if token == "r1"
        ));
    }

    #[test]
    fn test_parse_create_room() {
        let cli = Cli::try_parse_from([
            "talk", "rooms", "create", "--type", "public", "--name", "Lounge",
        ])
        .unwrap();
        match cli.command {
            Commands::Rooms(RoomsCommands::Create { invite, name, .. }) => {
                assert!(invite.is_none());
                assert_eq!(name.as_deref(), Some("Lounge"));
            }
            _ => panic!("Expected rooms create"),
        }
    }

    #[test]
    fn test_parse_account_remove() {
        let cli = Cli::try_parse_from(["talk", "account", "remove", "bob@cloud"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Account(AccountCommands::Remove { ref account_id }) if account_id == "bob@cloud"
        ));
    }

    #[test]
    fn test_mentions_search_defaults_empty() {
        let cli = Cli::try_parse_from(["talk", "mentions", "r1"]).unwrap();
        match cli.command {
            Commands::Mentions(args) => {
                assert_eq!(args.token, "r1");
                assert_eq!(args.search, "");
            }
            _ => panic!("Expected mentions"),
        }
    }
}
