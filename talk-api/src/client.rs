// talk-api/src/client.rs
use crate::endpoint::{encode_token, endpoint, ApiArea};
use crate::envelope::Envelope;
use crate::error::{Error, Result};
use crate::http::{Method, Params, Session, SessionProvider};
use crate::store::AccountStore;
use crate::types::{
    Account, BannedActor, FederationInvitation, InvitationState, MentionSuggestion, Room,
    RoomCapabilities, RoomType, TalkCapabilities,
};
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

pub const PROXY_HASH_HEADER: &str = "X-Nextcloud-Talk-Proxy-Hash";

const MENTION_SUGGESTION_LIMIT: u32 = 20;

/// Typed facade over the Talk REST endpoints.
///
/// Holds no state of its own: the session pool and the account store are
/// owned by the caller and resolved on every call. Each operation sends at
/// most one request. If the account, its session, or the room token is
/// missing or invalid, the operation fails before anything is sent.
pub struct TalkClient<P: SessionProvider, A: AccountStore> {
    sessions: P,
    accounts: A,
}

/// Account and session a single operation runs with
struct Context {
    account: Account,
    session: Arc<dyn Session>,
}

impl<P: SessionProvider, A: AccountStore> TalkClient<P, A> {
    pub fn new(sessions: P, accounts: A) -> Self {
        Self { sessions, accounts }
    }

    pub fn sessions(&self) -> &P {
        &self.sessions
    }

    pub fn accounts(&self) -> &A {
        &self.accounts
    }

    fn context(&self, account_id: &str) -> Result<Context> {
        let account = self
            .accounts
            .account(account_id)
            .ok_or_else(|| Error::AccountNotFound(account_id.to_string()))?;
        let session = self
            .sessions
            .session(account_id)
            .ok_or_else(|| Error::NoSession(account_id.to_string()))?;
        Ok(Context { account, session })
    }

    fn url(&self, ctx: &Context, area: ApiArea, path: &str) -> Result<Url> {
        endpoint(path, area.version(&ctx.account), &ctx.account)
    }

    /// Send one request and unwrap the envelope
    async fn call(
        &self,
        ctx: &Context,
        method: Method,
        url: Url,
        params: &Params,
    ) -> Result<Envelope> {
        debug!(
            account = %ctx.account.account_id,
            method = method.as_str(),
            url = %url,
            "sending request"
        );

        let raw = ctx
            .session
            .request(method, url.as_str(), params)
            .await
            .map_err(|e| {
                warn!(method = method.as_str(), url = %url, error = %e, "request failed");
                Error::from(e)
            })?;

        Envelope::parse(raw).inspect_err(|e| {
            warn!(method = method.as_str(), url = %url, error = %e, "invalid response envelope");
        })
    }

    fn rooms_from(envelope: &Envelope, account_id: &str) -> Result<Vec<Room>> {
        let mut rooms: Vec<Room> = envelope.decode_list("room")?;
        for room in &mut rooms {
            room.account_id = account_id.to_string();
        }
        Ok(rooms)
    }

    fn room_from(envelope: &Envelope, account_id: &str) -> Result<Room> {
        let mut room: Room = envelope.decode_object("room")?;
        room.account_id = account_id.to_string();
        Ok(room)
    }

    // Rooms

    /// List the rooms the account participates in.
    ///
    /// `modified_since` is used by background refreshes; user status is only
    /// requested for full listings (`modified_since == 0`).
    pub async fn get_rooms(
        &self,
        account_id: &str,
        update_status: bool,
        modified_since: i64,
    ) -> Result<Vec<Room>> {
        let ctx = self.context(account_id)?;
        let url = self.url(&ctx, ApiArea::Conversation, "room")?;

        let mut params = Params::new()
            .with("noStatusUpdate", !update_status)
            .with("modifiedSince", modified_since);

        if ctx.account.capabilities.user_status && modified_since == 0 {
            params.insert("includeStatus", true);
        }

        let envelope = self.call(&ctx, Method::Get, url, &params).await?;
        Self::rooms_from(&envelope, account_id)
    }

    pub async fn get_room(&self, account_id: &str, token: &str) -> Result<Room> {
        let ctx = self.context(account_id)?;
        let token = encode_token(token)?;
        let url = self.url(&ctx, ApiArea::Conversation, &format!("room/{}", token))?;

        let envelope = self.call(&ctx, Method::Get, url, &Params::new()).await?;
        Self::room_from(&envelope, account_id)
    }

    /// Get (and lazily create on the server) the note-to-self room
    pub async fn get_note_to_self_room(&self, account_id: &str) -> Result<Room> {
        let ctx = self.context(account_id)?;
        let url = self.url(&ctx, ApiArea::Conversation, "room/note-to-self")?;

        let envelope = self.call(&ctx, Method::Get, url, &Params::new()).await?;
        Self::room_from(&envelope, account_id)
    }

    /// Open rooms the account could join
    pub async fn get_listable_rooms(
        &self,
        account_id: &str,
        search_term: Option<&str>,
    ) -> Result<Vec<Room>> {
        let ctx = self.context(account_id)?;
        let url = self.url(&ctx, ApiArea::Conversation, "listed-room")?;

        let mut params = Params::new();
        params.insert_non_empty("searchTerm", search_term);

        let envelope = self.call(&ctx, Method::Get, url, &params).await?;
        Self::rooms_from(&envelope, account_id)
    }

    pub async fn create_room(
        &self,
        account_id: &str,
        invite: Option<&str>,
        room_type: RoomType,
        room_name: Option<&str>,
    ) -> Result<Room> {
        let ctx = self.context(account_id)?;
        let url = self.url(&ctx, ApiArea::Conversation, "room")?;

        let mut params = Params::new().with("roomType", i64::from(room_type));
        params.insert_non_empty("invite", invite);
        params.insert_non_empty("roomName", room_name);

        let envelope = self.call(&ctx, Method::Post, url, &params).await?;
        Self::room_from(&envelope, account_id)
    }

    pub async fn rename_room(&self, account_id: &str, token: &str, room_name: &str) -> Result<()> {
        let ctx = self.context(account_id)?;
        let token = encode_token(token)?;
        let url = self.url(&ctx, ApiArea::Conversation, &format!("room/{}", token))?;

        let params = Params::new().with("roomName", room_name);
        self.call(&ctx, Method::Put, url, &params).await?;
        Ok(())
    }

    /// Set or clear (`None`) the room description
    pub async fn set_room_description(
        &self,
        account_id: &str,
        token: &str,
        description: Option<&str>,
    ) -> Result<()> {
        let ctx = self.context(account_id)?;
        let token = encode_token(token)?;
        let url = self.url(
            &ctx,
            ApiArea::Conversation,
            &format!("room/{}/description", token),
        )?;

        let params = Params::new().with("description", description.unwrap_or_default());
        self.call(&ctx, Method::Put, url, &params).await?;
        Ok(())
    }

    // Federation

    pub async fn accept_federation_invitation(
        &self,
        account_id: &str,
        invitation_id: i64,
    ) -> Result<()> {
        let ctx = self.context(account_id)?;
        let url = self.url(
            &ctx,
            ApiArea::Federation,
            &format!("federation/invitation/{}", invitation_id),
        )?;

        self.call(&ctx, Method::Post, url, &Params::new()).await?;
        Ok(())
    }

    pub async fn reject_federation_invitation(
        &self,
        account_id: &str,
        invitation_id: i64,
    ) -> Result<()> {
        let ctx = self.context(account_id)?;
        let url = self.url(
            &ctx,
            ApiArea::Federation,
            &format!("federation/invitation/{}", invitation_id),
        )?;

        self.call(&ctx, Method::Delete, url, &Params::new()).await?;
        Ok(())
    }

    /// List federation invitations and record the fetch time and the number
    /// of pending invitations in the account store, which drives invitation
    /// polling.
    pub async fn get_federation_invitations(
        &self,
        account_id: &str,
    ) -> Result<Vec<FederationInvitation>> {
        let ctx = self.context(account_id)?;
        let url = self.url(&ctx, ApiArea::Federation, "federation/invitation")?;

        let envelope = self.call(&ctx, Method::Get, url, &Params::new()).await?;
        let mut invitations: Vec<FederationInvitation> =
            envelope.decode_list("federation invitation")?;
        for invitation in &mut invitations {
            invitation.account_id = account_id.to_string();
        }

        let now = chrono::Utc::now().timestamp();
        let pending = invitations
            .iter()
            .filter(|i| i.state == InvitationState::Pending)
            .count();
        if let Err(e) = self
            .accounts
            .update_last_federation_invitation_update(account_id, now, pending)
            .await
        {
            warn!(account = account_id, error = %e, "failed to record invitation fetch time");
        }

        Ok(invitations)
    }

    // Room capabilities

    /// Capabilities of a room, plus the proxy hash header federated rooms
    /// use to signal capability changes
    pub async fn get_room_capabilities(
        &self,
        account_id: &str,
        token: &str,
    ) -> Result<RoomCapabilities> {
        let ctx = self.context(account_id)?;
        let token = encode_token(token)?;
        let url = self.url(
            &ctx,
            ApiArea::Conversation,
            &format!("room/{}/capabilities", token),
        )?;

        let envelope = self.call(&ctx, Method::Get, url, &Params::new()).await?;
        let capabilities: TalkCapabilities = envelope.decode_object("room capabilities")?;
        let proxy_hash = envelope.header(PROXY_HASH_HEADER).map(String::from);

        Ok(RoomCapabilities {
            capabilities,
            proxy_hash,
        })
    }

    // Mentions

    pub async fn get_mention_suggestions(
        &self,
        account_id: &str,
        token: &str,
        search: &str,
    ) -> Result<Vec<MentionSuggestion>> {
        let ctx = self.context(account_id)?;
        let token = encode_token(token)?;
        let url = self.url(&ctx, ApiArea::Chat, &format!("chat/{}/mentions", token))?;

        let params = Params::new()
            .with("limit", MENTION_SUGGESTION_LIMIT)
            .with("search", search)
            .with("includeStatus", ctx.account.capabilities.user_status);

        let envelope = self.call(&ctx, Method::Get, url, &params).await?;
        envelope.decode_list("mention suggestion")
    }

    // Bans

    pub async fn ban_actor(
        &self,
        account_id: &str,
        token: &str,
        actor_type: &str,
        actor_id: &str,
        internal_note: Option<&str>,
    ) -> Result<()> {
        let ctx = self.context(account_id)?;
        let token = encode_token(token)?;
        let url = self.url(&ctx, ApiArea::Ban, &format!("ban/{}", token))?;

        let mut params = Params::new()
            .with("actorType", actor_type)
            .with("actorId", actor_id);
        params.insert_non_empty("internalNote", internal_note);

        self.call(&ctx, Method::Post, url, &params).await?;
        Ok(())
    }

    pub async fn list_bans(&self, account_id: &str, token: &str) -> Result<Vec<BannedActor>> {
        let ctx = self.context(account_id)?;
        let token = encode_token(token)?;
        let url = self.url(&ctx, ApiArea::Ban, &format!("ban/{}", token))?;

        let envelope = self.call(&ctx, Method::Get, url, &Params::new()).await?;
        envelope.decode_list("banned actor")
    }

    pub async fn unban_actor(&self, account_id: &str, token: &str, ban_id: i64) -> Result<()> {
        let ctx = self.context(account_id)?;
        let token = encode_token(token)?;
        let url = self.url(&ctx, ApiArea::Ban, &format!("ban/{}", token))?;

        let params = Params::new().with("banId", ban_id);
        self.call(&ctx, Method::Delete, url, &params).await?;
        Ok(())
    }
}
