// talk-cli/src/commands/rooms.rs
use crate::output::{print_response, Response};
use anyhow::Result;
use talk_accounts::ConfiguredClient;
use talk_api::RoomType;

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
pub enum RoomKind {
    OneToOne,
    Group,
    Public,
}

impl From<RoomKind> for RoomType {
    fn from(kind: RoomKind) -> Self {
        match kind {
            RoomKind::OneToOne => RoomType::OneToOne,
            RoomKind::Group => RoomType::Group,
            RoomKind::Public => RoomType::Public,
        }
    }
}

#[derive(clap::Subcommand, Clone, Debug)]
pub enum RoomsCommands {
    /// List joined rooms
    List {
        /// Only rooms changed since this unix timestamp
        #[arg(long, default_value = "0")]
        modified_since: i64,
        /// Mark the user as online while listing
        #[arg(long)]
        update_status: bool,
    },
    /// Show a room
    Get {
        /// Room token
        token: String,
    },
    /// Show the note-to-self room
    NoteToSelf,
    /// List open rooms that can be joined
    Listable {
        /// Search term
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Create a room
    Create {
        #[arg(long = "type", value_enum, default_value = "group")]
        kind: RoomKind,
        /// User, group or circle to invite
        #[arg(short, long)]
        invite: Option<String>,
        /// Room name
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Rename a room
    Rename { token: String, name: String },
    /// Set or clear the room description
    Describe {
        token: String,
        /// New description, omit to clear
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Show room capabilities
    Capabilities { token: String },
}

pub async fn handle_rooms(
    client: &ConfiguredClient,
    account_id: &str,
    cmd: RoomsCommands,
) -> Result<()> {
    match cmd {
        RoomsCommands::List {
            modified_since,
            update_status,
        } => {
            let rooms = client
                .get_rooms(account_id, update_status, modified_since)
                .await?;
            print_response(&Response::ok(rooms))
        }
        RoomsCommands::Get { token } => {
            let room = client.get_room(account_id, &token).await?;
            print_response(&Response::ok(room))
        }
        RoomsCommands::NoteToSelf => {
            let room = client.get_note_to_self_room(account_id).await?;
            print_response(&Response::ok(room))
        }
        RoomsCommands::Listable { search } => {
            let rooms = client
                .get_listable_rooms(account_id, search.as_deref())
                .await?;
            print_response(&Response::ok(rooms))
        }
        RoomsCommands::Create { kind, invite, name } => {
            let room = client
                .create_room(account_id, invite.as_deref(), kind.into(), name.as_deref())
                .await?;
            print_response(&Response::ok(room))
        }
        RoomsCommands::Rename { token, name } => {
            client.rename_room(account_id, &token, &name).await?;
            print_response(&Response::ok(serde_json::json!({
                "token": token,
                "renamed": true,
            })))
        }
        RoomsCommands::Describe { token, description } => {
            client
                .set_room_description(account_id, &token, description.as_deref())
                .await?;
            print_response(&Response::ok(serde_json::json!({
                "token": token,
                "description": description.unwrap_or_default(),
            })))
        }
        RoomsCommands::Capabilities { token } => {
            let caps = client.get_room_capabilities(account_id, &token).await?;
            print_response(&Response::ok(caps))
        }
    }
}
