//! End-to-end tests of `TalkClient` over `ReqwestSession` against a mock
//! Talk server.

use serde_json::json;
use std::sync::Arc;
use talk_api::{
    Account, Error, MemoryAccountStore, ReqwestSession, RoomType, ServerCapabilities,
    SessionPool, TalkClient,
};
use url::Url;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ACCOUNT: &str = "alice@mock";
const AUTH: &str = "Basic YWxpY2U6YXBwLXNlY3JldA==";

async fn setup(server: &MockServer) -> TalkClient<SessionPool, MemoryAccountStore> {
    let pool = SessionPool::new();
    pool.register(
        ACCOUNT,
        Arc::new(
            ReqwestSession::new().with_credentials("alice".to_string(), "app-secret".to_string()),
        ),
    );

    let store = MemoryAccountStore::new();
    store.insert(Account {
        account_id: ACCOUNT.to_string(),
        server: Url::parse(&server.uri()).unwrap(),
        user_id: "alice".to_string(),
        capabilities: ServerCapabilities {
            features: vec!["conversation-v4".to_string(), "ban-v1".to_string()],
            user_status: true,
        },
    });

    TalkClient::new(pool, store)
}

fn ocs(data: serde_json::Value) -> serde_json::Value {
    json!({"ocs": {"meta": {"status": "ok", "statuscode": 200, "message": "OK"}, "data": data}})
}

#[tokio::test]
async fn get_rooms_sends_query_and_auth() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ocs/v2.php/apps/spreed/api/v4/room"))
        .and(query_param("noStatusUpdate", "false"))
        .and(query_param("modifiedSince", "0"))
        .and(query_param("includeStatus", "true"))
        .and(header("OCS-APIRequest", "true"))
        .and(header("authorization", AUTH))
        .respond_with(ResponseTemplate::new(200).set_body_json(ocs(json!([
            {"token": "r1", "type": 2, "displayName": "Team"},
            {"token": "r2", "type": 1, "displayName": "Bob", "status": "online"}
        ]))))
        .expect(1)
        .mount(&server)
        .await;

    let client = setup(&server).await;
    let rooms = client.get_rooms(ACCOUNT, true, 0).await.unwrap();

    assert_eq!(rooms.len(), 2);
    assert_eq!(rooms[0].display_name, "Team");
    assert_eq!(rooms[1].status.as_deref(), Some("online"));
}

#[tokio::test]
async fn create_room_posts_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ocs/v2.php/apps/spreed/api/v4/room"))
        .and(body_json(json!({"roomType": 2, "roomName": "Team"})))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(ocs(json!({"token": "new1", "type": 2}))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = setup(&server).await;
    let room = client
        .create_room(ACCOUNT, None, RoomType::Group, Some("Team"))
        .await
        .unwrap();

    assert_eq!(room.token, "new1");
    assert_eq!(room.account_id, ACCOUNT);
}

#[tokio::test]
async fn room_capabilities_reads_proxy_hash_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ocs/v2.php/apps/spreed/api/v4/room/r1/capabilities"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-Nextcloud-Talk-Proxy-Hash", "cafe1234")
                .set_body_json(ocs(json!({"features": ["chat-v2"], "config": {}}))),
        )
        .mount(&server)
        .await;

    let client = setup(&server).await;
    let caps = client.get_room_capabilities(ACCOUNT, "r1").await.unwrap();

    assert_eq!(caps.proxy_hash.as_deref(), Some("cafe1234"));
    assert_eq!(caps.capabilities.features, vec!["chat-v2"]);
}

#[tokio::test]
async fn unban_sends_ban_id_in_query() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/ocs/v2.php/apps/spreed/api/v1/ban/r1"))
        .and(query_param("banId", "12"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ocs(json!(null))))
        .expect(1)
        .mount(&server)
        .await;

    let client = setup(&server).await;
    client.unban_actor(ACCOUNT, "r1", 12).await.unwrap();
}

#[tokio::test]
async fn server_error_surfaces_ocs_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ocs/v2.php/apps/spreed/api/v1/ban/r1"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "ocs": {"meta": {"status": "failure", "statuscode": 403, "message": "Not a moderator"}, "data": []}
        })))
        .mount(&server)
        .await;

    let client = setup(&server).await;
    let err = client
        .ban_actor(ACCOUNT, "r1", "users", "mallory", None)
        .await
        .unwrap_err();

    match err {
        Error::Http(e) => {
            assert_eq!(e.status, Some(403));
            assert_eq!(e.message, "Not a moderator");
        }
        other => panic!("Expected Http error, got {other:?}"),
    }
}

#[tokio::test]
async fn federation_invitations_record_fetch_time() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ocs/v2.php/apps/spreed/api/v1/federation/invitation"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ocs(json!([]))))
        .mount(&server)
        .await;

    let client = setup(&server).await;
    let invitations = client.get_federation_invitations(ACCOUNT).await.unwrap();

    assert!(invitations.is_empty());
    assert!(client
        .accounts()
        .last_federation_invitation_update(ACCOUNT)
        .is_some());
}
