// talk-api/src/types.rs
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use url::Url;

/// Account context a request runs under
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub account_id: String,
    /// Server base URL, e.g. `https://cloud.example.com`
    pub server: Url,
    pub user_id: String,
    #[serde(default)]
    pub capabilities: ServerCapabilities,
}

/// Capability flags the server advertised for an account
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerCapabilities {
    /// Talk feature strings (`conversation-v4`, `ban-v1`, ...)
    #[serde(default)]
    pub features: Vec<String>,
    /// User status app is enabled
    #[serde(default)]
    pub user_status: bool,
}

impl ServerCapabilities {
    pub fn has_talk_capability(&self, capability: &str) -> bool {
        self.features.iter().any(|f| f == capability)
    }
}

/// Conversation type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum RoomType {
    OneToOne,
    Group,
    Public,
    Changelog,
    FormerOneToOne,
    NoteToSelf,
    Unknown(i64),
}

impl From<i64> for RoomType {
    fn from(value: i64) -> Self {
        match value {
            1 => Self::OneToOne,
            2 => Self::Group,
            3 => Self::Public,
            4 => Self::Changelog,
            5 => Self::FormerOneToOne,
            6 => Self::NoteToSelf,
            other => Self::Unknown(other),
        }
    }
}

impl From<RoomType> for i64 {
    fn from(value: RoomType) -> Self {
        match value {
            RoomType::OneToOne => 1,
            RoomType::Group => 2,
            RoomType::Public => 3,
            RoomType::Changelog => 4,
            RoomType::FormerOneToOne => 5,
            RoomType::NoteToSelf => 6,
            RoomType::Unknown(other) => other,
        }
    }
}

/// Conversation as listed by the room endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub token: String,
    /// Account the room was fetched for; not part of the payload
    #[serde(default, rename = "accountId")]
    pub account_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "displayName")]
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub room_type: RoomType,
    #[serde(default, rename = "participantType")]
    pub participant_type: i64,
    #[serde(default, rename = "readOnly")]
    pub read_only: i64,
    #[serde(default, rename = "hasPassword")]
    pub has_password: bool,
    #[serde(default, rename = "isFavorite")]
    pub is_favorite: bool,
    #[serde(default, rename = "unreadMessages")]
    pub unread_messages: i64,
    #[serde(default, rename = "unreadMention")]
    pub unread_mention: bool,
    #[serde(default, rename = "lastActivity")]
    pub last_activity: i64,
    #[serde(default, rename = "remoteServer")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_server: Option<String>,
    #[serde(default, rename = "remoteToken")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_token: Option<String>,
    /// User status of the other participant in one-to-one rooms
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl Room {
    pub fn is_read_only(&self) -> bool {
        self.read_only == 1
    }

    pub fn is_federated(&self) -> bool {
        self.remote_server.as_deref().is_some_and(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum InvitationState {
    #[default]
    Pending,
    Accepted,
    Unknown(i64),
}

impl From<i64> for InvitationState {
    fn from(value: i64) -> Self {
        match value {
            0 => Self::Pending,
            1 => Self::Accepted,
            other => Self::Unknown(other),
        }
    }
}

impl From<InvitationState> for i64 {
    fn from(value: InvitationState) -> Self {
        match value {
            InvitationState::Pending => 0,
            InvitationState::Accepted => 1,
            InvitationState::Unknown(other) => other,
        }
    }
}

/// Pending request to join a room hosted on another server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FederationInvitation {
    pub id: i64,
    #[serde(default, rename = "accountId")]
    pub account_id: String,
    #[serde(default)]
    pub state: InvitationState,
    #[serde(default, rename = "localCloudId")]
    pub local_cloud_id: String,
    #[serde(default, rename = "remoteServerUrl")]
    pub remote_server_url: String,
    #[serde(default, rename = "remoteToken")]
    pub remote_token: String,
    #[serde(default, rename = "remoteAttendeeId")]
    pub remote_attendee_id: i64,
    #[serde(default, rename = "inviterCloudId")]
    pub inviter_cloud_id: String,
    #[serde(default, rename = "inviterDisplayName")]
    pub inviter_display_name: String,
    #[serde(default, rename = "roomName")]
    pub room_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MentionSuggestion {
    pub id: String,
    #[serde(default)]
    pub label: String,
    /// `users`, `groups`, `calls`, `federated_users`, ...
    #[serde(default)]
    pub source: String,
    #[serde(default, rename = "mentionId")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mention_id: Option<String>,
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, rename = "statusIcon")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_icon: Option<String>,
    #[serde(default, rename = "statusMessage")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_message: Option<String>,
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl MentionSuggestion {
    /// Id to put after `@` in a message; falls back to `id` on old servers
    pub fn mention_id(&self) -> &str {
        self.mention_id.as_deref().unwrap_or(&self.id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BannedActor {
    pub id: i64,
    #[serde(default, rename = "moderatorActorType")]
    pub moderator_actor_type: String,
    #[serde(default, rename = "moderatorActorId")]
    pub moderator_actor_id: String,
    #[serde(default, rename = "moderatorDisplayName")]
    pub moderator_display_name: String,
    #[serde(default, rename = "bannedActorType")]
    pub banned_actor_type: String,
    #[serde(default, rename = "bannedActorId")]
    pub banned_actor_id: String,
    #[serde(default, rename = "bannedDisplayName")]
    pub banned_display_name: String,
    #[serde(default, rename = "bannedTime")]
    pub banned_time: i64,
    #[serde(default, rename = "internalNote")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub internal_note: Option<String>,
}

/// Capabilities a (possibly federated) room advertises
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TalkCapabilities {
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default, rename = "features-local")]
    pub features_local: Vec<String>,
    #[serde(default, rename = "features-user")]
    pub features_user: Vec<String>,
    #[serde(default)]
    pub config: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoomCapabilities {
    pub capabilities: TalkCapabilities,
    /// Value of the `X-Nextcloud-Talk-Proxy-Hash` header, used to detect
    /// when cached capabilities of a federated room went stale
    #[serde(rename = "proxyHash")]
    pub proxy_hash: Option<String>,
}
