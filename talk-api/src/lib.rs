// talk-api/src/lib.rs
pub mod client;
pub mod endpoint;
pub mod envelope;
pub mod error;
pub mod http;
pub mod store;
pub mod types;

pub use client::{TalkClient, PROXY_HASH_HEADER};
pub use endpoint::{encode_token, endpoint, ApiArea};
pub use envelope::{Envelope, Meta};
pub use error::{Error, Result};
pub use http::{HttpError, Method, Params, RawResponse, Session, SessionPool, SessionProvider};
pub use store::{AccountStore, MemoryAccountStore};
pub use types::{
    Account,
    BannedActor,
    // Federation
    FederationInvitation,
    InvitationState,
    MentionSuggestion,
    // Rooms
    Room,
    RoomCapabilities,
    RoomType,
    ServerCapabilities,
    TalkCapabilities,
};

// Re-export reqwest session when feature is enabled
#[cfg(feature = "reqwest")]
pub use http::ReqwestSession;
