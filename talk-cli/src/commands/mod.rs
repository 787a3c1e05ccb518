// talk-cli/src/commands/mod.rs
pub mod account;
pub mod bans;
pub mod chat;
pub mod federation;
pub mod rooms;

pub use account::{handle_account, AccountCommands};
pub use bans::{handle_bans, BansCommands};
pub use chat::{handle_mentions, MentionsArgs};
pub use federation::{handle_federation, FederationCommands};
pub use rooms::{handle_rooms, RoomsCommands};
