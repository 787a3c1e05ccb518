// talk-api/src/envelope.rs
//! OCS response envelope.
//!
//! Every endpoint answers with `{"ocs": {"meta": {...}, "data": ...}}` where
//! `data` is an object, an array of objects, or missing altogether.

use crate::error::{Error, Result};
use crate::http::{find_header, RawResponse};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Meta {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub statuscode: u16,
    #[serde(default)]
    pub message: Option<String>,
}

impl Meta {
    pub fn is_failure(&self) -> bool {
        self.status.eq_ignore_ascii_case("failure")
    }
}

#[derive(Debug, Clone, Default)]
pub struct Envelope {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub meta: Option<Meta>,
    pub data: Option<Value>,
}

impl Envelope {
    /// Unwrap a raw response.
    ///
    /// Only a body that is not JSON at all is an error. An empty body, a
    /// body without an `ocs` object, or a `meta` of the wrong shape yields
    /// an envelope with no meta and/or no data.
    pub fn parse(raw: RawResponse) -> Result<Self> {
        let RawResponse {
            status,
            headers,
            body,
        } = raw;

        let mut envelope = Self {
            status,
            headers,
            meta: None,
            data: None,
        };

        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(envelope);
        }

        let mut value: Value = serde_json::from_slice(&body)?;
        let meta = value
            .pointer("/ocs/meta")
            .and_then(|meta| Meta::deserialize(meta).ok());
        if let Some(meta) = meta.as_ref().filter(|m| m.is_failure()) {
            return Err(Error::Ocs {
                statuscode: meta.statuscode,
                message: meta.message.clone().unwrap_or_default(),
            });
        }

        envelope.meta = meta;
        envelope.data = value
            .pointer_mut("/ocs/data")
            .map(Value::take)
            .filter(|data| !data.is_null());
        Ok(envelope)
    }

    pub fn data_object(&self) -> Option<&Map<String, Value>> {
        self.data.as_ref().and_then(Value::as_object)
    }

    /// Object items of a `data` array; empty when `data` is absent or not an array
    pub fn data_array(&self) -> Vec<&Map<String, Value>> {
        self.data
            .as_ref()
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(Value::as_object).collect())
            .unwrap_or_default()
    }

    /// Response header, case-insensitive on the name
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    pub fn decode_object<T: DeserializeOwned>(&self, entity: &'static str) -> Result<T> {
        let data = self.data_object().ok_or(Error::MissingData)?;
        decode(data, entity)
    }

    pub fn decode_list<T: DeserializeOwned>(&self, entity: &'static str) -> Result<Vec<T>> {
        self.data_array()
            .into_iter()
            .map(|item| decode(item, entity))
            .collect()
    }
}

pub(crate) fn decode<T: DeserializeOwned>(
    data: &Map<String, Value>,
    entity: &'static str,
) -> Result<T> {
    serde_json::from_value(Value::Object(data.clone()))
        .map_err(|source| Error::Decode { entity, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(body: Value) -> RawResponse {
        RawResponse::new(200, serde_json::to_vec(&body).unwrap())
    }

    #[derive(Debug, Deserialize)]
    struct Item {
        id: i64,
    }

    #[test]
    fn test_parse_object_data() {
        let env = Envelope::parse(raw(json!({
            "ocs": {"meta": {"status": "ok", "statuscode": 200}, "data": {"id": 7}}
        })))
        .unwrap();

        let item: Item = env.decode_object("item").unwrap();
        assert_eq!(item.id, 7);
        assert!(env.data_array().is_empty());
    }

    #[test]
    fn test_parse_array_data() {
        let env = Envelope::parse(raw(json!({
            "ocs": {"meta": {"status": "ok"}, "data": [{"id": 1}, {"id": 2}, "junk"]}
        })))
        .unwrap();

        let items: Vec<Item> = env.decode_list("item").unwrap();
        assert_eq!(items.iter().map(|i| i.id).collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn test_missing_data_is_empty_list() {
        let env = Envelope::parse(raw(json!({"ocs": {"meta": {"status": "ok"}}}))).unwrap();
        let items: Vec<Item> = env.decode_list("item").unwrap();
        assert!(items.is_empty());

        let env = Envelope::parse(RawResponse::new(200, Vec::new())).unwrap();
        assert!(env.data.is_none());
        assert!(matches!(
            env.decode_object::<Item>("item"),
            Err(Error::MissingData)
        ));
    }

    #[test]
    fn test_meta_failure_is_error() {
        let err = Envelope::parse(raw(json!({
            "ocs": {"meta": {"status": "failure", "statuscode": 403, "message": "forbidden"}, "data": []}
        })))
        .unwrap_err();

        match err {
            Error::Ocs {
                statuscode,
                message,
            } => {
                assert_eq!(statuscode, 403);
                assert_eq!(message, "forbidden");
            }
            other => panic!("Expected Ocs error, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_envelope_has_no_data() {
        for body in [
            json!({"ocs": null}),
            json!({"ocs": []}),
            json!({"ocs": "x"}),
            json!({"ocs": {"meta": "x", "data": []}}),
            json!({"ocs": {"meta": {"status": 5}, "data": null}}),
            json!([1, 2, 3]),
            json!({"other": {}}),
        ] {
            let env = Envelope::parse(raw(body.clone())).unwrap();
            assert!(env.data_array().is_empty(), "body: {body}");
            let items: Vec<Item> = env.decode_list("item").unwrap();
            assert!(items.is_empty(), "body: {body}");
            assert!(matches!(
                env.decode_object::<Item>("item"),
                Err(Error::MissingData)
            ));
        }
    }

    #[test]
    fn test_malformed_meta_keeps_data() {
        let env = Envelope::parse(raw(json!({
            "ocs": {"meta": "x", "data": [{"id": 4}]}
        })))
        .unwrap();

        assert!(env.meta.is_none());
        let items: Vec<Item> = env.decode_list("item").unwrap();
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_invalid_json_is_error() {
        let err = Envelope::parse(RawResponse::new(200, b"<html>".to_vec())).unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_decode_error_names_entity() {
        let env = Envelope::parse(raw(json!({"ocs": {"data": {"id": "seven"}}}))).unwrap();
        let err = env.decode_object::<Item>("item").unwrap_err();
        assert!(err.to_string().starts_with("Failed to decode item"));
    }

    #[test]
    fn test_header_lookup_ignores_case() {
        let env = Envelope::parse(
            RawResponse::new(200, Vec::new()).with_header("x-nextcloud-talk-proxy-hash", "abc"),
        )
        .unwrap();
        assert_eq!(env.header("X-Nextcloud-Talk-Proxy-Hash"), Some("abc"));
    }
}
