// talk-api/src/http/reqwest.rs
use super::{HttpError, Method, Params, RawResponse, Session};
use async_trait::async_trait;

#[cfg(feature = "reqwest")]
pub struct ReqwestSession {
    inner: reqwest::Client,
    credentials: Option<(String, String)>,
}

#[cfg(feature = "reqwest")]
impl ReqwestSession {
    pub fn new() -> Self {
        Self::with_client(reqwest::Client::new())
    }

    pub fn with_client(inner: reqwest::Client) -> Self {
        Self {
            inner,
            credentials: None,
        }
    }

    /// Authenticate every request with user id and app password
    pub fn with_credentials(mut self, user: String, app_password: String) -> Self {
        self.credentials = Some((user, app_password));
        self
    }
}

#[cfg(feature = "reqwest")]
impl Default for ReqwestSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "reqwest")]
#[async_trait]
impl Session for ReqwestSession {
    async fn request(
        &self,
        method: Method,
        url: &str,
        params: &Params,
    ) -> Result<RawResponse, HttpError> {
        let mut req = match method {
            Method::Get => self.inner.get(url),
            Method::Post => self.inner.post(url),
            Method::Put => self.inner.put(url),
            Method::Delete => self.inner.delete(url),
        };

        if let Some((user, password)) = &self.credentials {
            req = req.basic_auth(user, Some(password));
        }

        req = req
            .header("OCS-APIRequest", "true")
            .header("accept", "application/json");

        if !params.is_empty() {
            req = if method.uses_query() {
                req.query(&params.to_query_pairs())
            } else {
                req.json(params.as_map())
            };
        }

        let resp = req.send().await.map_err(|e| HttpError {
            status: None,
            message: e.to_string(),
        })?;

        let status = resp.status();
        let is_success = status.is_success();
        let status_code = status.as_u16();

        let headers: Vec<(String, String)> = resp
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| HttpError {
                status: Some(status_code),
                message: e.to_string(),
            })?
            .to_vec();

        if !is_success {
            return Err(HttpError {
                status: Some(status_code),
                message: error_message(&bytes),
            });
        }

        Ok(RawResponse {
            status: status_code,
            headers,
            body: bytes,
        })
    }
}

/// Prefer the OCS meta message over the raw body
fn error_message(body: &[u8]) -> String {
    serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.pointer("/ocs/meta/message")
                .and_then(|m| m.as_str())
                .filter(|m| !m.is_empty())
                .map(String::from)
        })
        .unwrap_or_else(|| String::from_utf8_lossy(body).to_string())
}
