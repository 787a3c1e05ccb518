// talk-api/src/http/mod.rs
use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// Error from HTTP request
#[derive(Debug, Clone, PartialEq)]
pub struct HttpError {
    pub status: Option<u16>,
    pub message: String,
}

impl std::fmt::Display for HttpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(status) = self.status {
            write!(f, "HTTP error {}: {}", status, self.message)
        } else {
            write!(f, "HTTP error: {}", self.message)
        }
    }
}

impl std::error::Error for HttpError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }

    /// GET and DELETE carry their parameters in the query string
    pub fn uses_query(&self) -> bool {
        matches!(self, Self::Get | Self::Delete)
    }
}

/// Request parameters.
///
/// A key that is absent means "not requested"; use [`Params::insert_non_empty`]
/// for optional strings so that an empty value never reaches the server.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params(Map<String, Value>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: &str, value: impl Into<Value>) {
        self.0.insert(key.to_string(), value.into());
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert_non_empty(&mut self, key: &str, value: Option<&str>) {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            self.insert(key, value);
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Flatten into `key=value` pairs for a query string
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        self.0
            .iter()
            .map(|(k, v)| {
                let v = match v {
                    Value::String(s) => s.clone(),
                    Value::Null => String::new(),
                    other => other.to_string(),
                };
                (k.clone(), v)
            })
            .collect()
    }
}

/// Raw HTTP response handed back by a [`Session`]
#[derive(Debug, Clone, Default)]
pub struct RawResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Header lookup, case-insensitive on the name
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// Case-insensitive lookup in a response header list
pub(crate) fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

/// Transport session bound to one account - users can implement their own
#[async_trait]
pub trait Session: Send + Sync {
    /// Send a request, return the raw response on 2xx
    async fn request(
        &self,
        method: Method,
        url: &str,
        params: &Params,
    ) -> Result<RawResponse, HttpError>;

    async fn get(&self, url: &str, params: &Params) -> Result<RawResponse, HttpError> {
        self.request(Method::Get, url, params).await
    }

    async fn post(&self, url: &str, params: &Params) -> Result<RawResponse, HttpError> {
        self.request(Method::Post, url, params).await
    }

    async fn put(&self, url: &str, params: &Params) -> Result<RawResponse, HttpError> {
        self.request(Method::Put, url, params).await
    }

    async fn delete(&self, url: &str, params: &Params) -> Result<RawResponse, HttpError> {
        self.request(Method::Delete, url, params).await
    }
}

/// Resolves the transport session registered for an account
pub trait SessionProvider: Send + Sync {
    fn session(&self, account_id: &str) -> Option<Arc<dyn Session>>;
}

/// In-memory session registry keyed by account id
#[derive(Default, Clone)]
pub struct SessionPool {
    sessions: Arc<RwLock<HashMap<String, Arc<dyn Session>>>>,
}

impl SessionPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, account_id: impl Into<String>, session: Arc<dyn Session>) {
        self.sessions.write().insert(account_id.into(), session);
    }

    pub fn remove(&self, account_id: &str) -> Option<Arc<dyn Session>> {
        self.sessions.write().remove(account_id)
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }
}

impl SessionProvider for SessionPool {
    fn session(&self, account_id: &str) -> Option<Arc<dyn Session>> {
        self.sessions.read().get(account_id).cloned()
    }
}

#[cfg(feature = "reqwest")]
pub mod reqwest;

#[cfg(feature = "reqwest")]
pub use self::reqwest::ReqwestSession;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct NullSession;

    #[async_trait]
    impl Session for NullSession {
        async fn request(
            &self,
            _method: Method,
            _url: &str,
            _params: &Params,
        ) -> Result<RawResponse, HttpError> {
            Ok(RawResponse::new(200, Vec::new()))
        }
    }

    #[test]
    fn test_insert_non_empty_skips_missing_and_empty() {
        let mut params = Params::new();
        params.insert_non_empty("invite", None);
        params.insert_non_empty("roomName", Some(""));
        params.insert_non_empty("searchTerm", Some("abc"));

        assert!(!params.contains_key("invite"));
        assert!(!params.contains_key("roomName"));
        assert_eq!(params.get("searchTerm"), Some(&json!("abc")));
    }

    #[test]
    fn test_query_pairs_stringify_scalars() {
        let params = Params::new()
            .with("noStatusUpdate", true)
            .with("modifiedSince", 42)
            .with("search", "bob");

        let pairs = params.to_query_pairs();
        assert!(pairs.contains(&("noStatusUpdate".to_string(), "true".to_string())));
        assert!(pairs.contains(&("modifiedSince".to_string(), "42".to_string())));
        assert!(pairs.contains(&("search".to_string(), "bob".to_string())));
    }

    #[test]
    fn test_header_lookup_ignores_case() {
        let resp = RawResponse::new(200, Vec::new()).with_header("X-Nextcloud-Talk-Hash", "abc");
        assert_eq!(resp.header("x-nextcloud-talk-hash"), Some("abc"));
        assert_eq!(resp.header("X-NEXTCLOUD-TALK-HASH"), Some("abc"));
        assert_eq!(resp.header("x-other"), None);
    }

    #[test]
    fn test_session_pool_register_and_remove() {
        let pool = SessionPool::new();
        assert!(pool.session("alice@cloud").is_none());

        pool.register("alice@cloud", Arc::new(NullSession));
        assert!(pool.session("alice@cloud").is_some());
        assert_eq!(pool.len(), 1);

        assert!(pool.remove("alice@cloud").is_some());
        assert!(pool.is_empty());
    }

    #[test]
    fn test_http_error_display() {
        let err = HttpError {
            status: Some(404),
            message: "not found".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP error 404: not found");

        let err = HttpError {
            status: None,
            message: "connection refused".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP error: connection refused");
    }
}
