// talk-api/src/endpoint.rs
//! Versioned endpoint URLs.
//!
//! Server features are versioned independently, so the API version is
//! picked per feature area from the account's capabilities.

use crate::error::{Error, Result};
use crate::types::Account;
use url::Url;

pub const CAPABILITY_CONVERSATION_V2: &str = "conversation-v2";
pub const CAPABILITY_CONVERSATION_V3: &str = "conversation-v3";
pub const CAPABILITY_CONVERSATION_V4: &str = "conversation-v4";
pub const CAPABILITY_FEDERATION_V1: &str = "federation-v1";
pub const CAPABILITY_BAN_V1: &str = "ban-v1";
pub const CAPABILITY_NOTE_TO_SELF: &str = "note-to-self";

const OCS_API_ROOT: &str = "ocs/v2.php/apps/spreed/api";

/// Feature area an endpoint belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiArea {
    Conversation,
    Federation,
    Ban,
    Chat,
}

impl ApiArea {
    pub fn version(&self, account: &Account) -> u32 {
        let caps = &account.capabilities;
        match self {
            Self::Conversation => {
                if caps.has_talk_capability(CAPABILITY_CONVERSATION_V4) {
                    4
                } else if caps.has_talk_capability(CAPABILITY_CONVERSATION_V3) {
                    3
                } else if caps.has_talk_capability(CAPABILITY_CONVERSATION_V2) {
                    2
                } else {
                    1
                }
            }
            // Only v1 exists for these so far
            Self::Federation | Self::Ban | Self::Chat => 1,
        }
    }
}

/// Build `{server}/ocs/v2.php/apps/spreed/api/v{version}/{path}`
pub fn endpoint(path: &str, api_version: u32, account: &Account) -> Result<Url> {
    let base = account.server.as_str().trim_end_matches('/');
    let path = path.trim_start_matches('/');
    let url = format!("{}/{}/v{}/{}", base, OCS_API_ROOT, api_version, path);
    Ok(Url::parse(&url)?)
}

/// Percent-encode a room token for use as a single path segment.
///
/// `.` and `..` are refused: URL parsing collapses dot segments even when
/// percent-encoded, so they would address a different resource.
pub fn encode_token(token: &str) -> Result<String> {
    let is_dot_segment = matches!(token, "." | "..");
    if token.is_empty() || is_dot_segment || token.chars().any(char::is_control) {
        return Err(Error::InvalidToken(token.to_string()));
    }
    Ok(urlencoding::encode(token).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ServerCapabilities;

    fn account(server: &str, features: &[&str]) -> Account {
        Account {
            account_id: "alice@cloud.example".to_string(),
            server: Url::parse(server).unwrap(),
            user_id: "alice".to_string(),
            capabilities: ServerCapabilities {
                features: features.iter().map(|f| f.to_string()).collect(),
                user_status: false,
            },
        }
    }

    #[test]
    fn test_conversation_version_prefers_newest() {
        let acc = account("https://cloud.example", &["conversation-v3", "conversation-v4"]);
        assert_eq!(ApiArea::Conversation.version(&acc), 4);

        let acc = account("https://cloud.example", &["conversation-v3"]);
        assert_eq!(ApiArea::Conversation.version(&acc), 3);

        let acc = account("https://cloud.example", &[]);
        assert_eq!(ApiArea::Conversation.version(&acc), 1);
    }

    #[test]
    fn test_other_areas_are_v1() {
        let acc = account("https://cloud.example", &["conversation-v4", "ban-v1"]);
        assert_eq!(ApiArea::Federation.version(&acc), 1);
        assert_eq!(ApiArea::Ban.version(&acc), 1);
        assert_eq!(ApiArea::Chat.version(&acc), 1);
    }

    #[test]
    fn test_endpoint_url() {
        let acc = account("https://cloud.example", &[]);
        let url = endpoint("room", 4, &acc).unwrap();
        assert_eq!(
            url.as_str(),
            "https://cloud.example/ocs/v2.php/apps/spreed/api/v4/room"
        );
    }

    #[test]
    fn test_endpoint_keeps_server_subpath() {
        let acc = account("https://example.org/nextcloud/", &[]);
        let url = endpoint("/ban/abc", 1, &acc).unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.org/nextcloud/ocs/v2.php/apps/spreed/api/v1/ban/abc"
        );
    }

    #[test]
    fn test_encode_token_reserved_characters() {
        let encoded = encode_token("a b/c?d#e").unwrap();
        assert_eq!(encoded, "a%20b%2Fc%3Fd%23e");
        assert_eq!(urlencoding::decode(&encoded).unwrap(), "a b/c?d#e");
    }

    #[test]
    fn test_encode_token_rejects_empty() {
        assert!(matches!(encode_token(""), Err(Error::InvalidToken(_))));
        assert!(matches!(encode_token("a\nb"), Err(Error::InvalidToken(_))));
    }

    #[test]
    fn test_encode_token_rejects_dot_segments() {
        assert!(matches!(encode_token("."), Err(Error::InvalidToken(_))));
        assert!(matches!(encode_token(".."), Err(Error::InvalidToken(_))));
        assert_eq!(encode_token("...").unwrap(), "...");
        assert_eq!(encode_token("a.b").unwrap(), "a.b");
    }
}
