//! Key/value sub-client
//!
//! Thin passthrough over the agent's KV store endpoints. Constructed by
//! [`Client::connect`](crate::Client::connect) with the connection token
//! bound in.

use base64::Engine;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::Deserialize;

use crate::error::{check_response, json_with_limit, ClientError};

const TOKEN_HEADER: &str = "X-Consul-Token";

/// A single entry from the KV store.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct KeyValueEntry {
    #[serde(rename = "Key")]
    pub key: String,
    /// Base64-encoded value as the agent returns it; `null` for a key that
    /// holds no value. Use [`KeyValueEntry::decoded_value`] for the bytes.
    #[serde(rename = "Value")]
    pub value: Option<String>,
    #[serde(rename = "Flags", default)]
    pub flags: u64,
    #[serde(rename = "CreateIndex", default)]
    pub create_index: u64,
    #[serde(rename = "ModifyIndex", default)]
    pub modify_index: u64,
    #[serde(rename = "LockIndex", default)]
    pub lock_index: u64,
}

impl KeyValueEntry {
    /// Decode the base64-encoded value.
    pub fn decoded_value(&self) -> Result<Option<Vec<u8>>, ClientError> {
        match &self.value {
            Some(value) => base64::engine::general_purpose::STANDARD
                .decode(value)
                .map(Some)
                .map_err(|e| ClientError::Parse(format!("invalid base64 value: {e}"))),
            None => Ok(None),
        }
    }
}

/// Key/value store sub-client.
#[derive(Debug)]
pub struct KeyValue {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl KeyValue {
    pub(crate) fn new(http: reqwest::Client, base_url: String, token: String) -> Self {
        Self {
            http,
            base_url,
            token,
        }
    }

    /// Read a key. Returns `None` for a missing key.
    pub async fn get(&self, key: &str) -> Result<Option<KeyValueEntry>, ClientError> {
        let url = format!("{}/v1/kv/{key}", self.base_url);
        let response = self
            .http
            .get(&url)
            .headers(self.build_headers()?)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let response = check_response(response)?;
        let entries: Vec<KeyValueEntry> = json_with_limit(response).await?;
        Ok(entries.into_iter().next())
    }

    /// Write a value under a key. Returns the agent's verdict.
    pub async fn set(&self, key: &str, value: &str) -> Result<bool, ClientError> {
        let url = format!("{}/v1/kv/{key}", self.base_url);
        tracing::debug!(key = %key, "Writing KV entry");

        let response = self
            .http
            .put(&url)
            .headers(self.build_headers()?)
            .body(value.to_string())
            .send()
            .await?;

        let response = check_response(response)?;
        json_with_limit(response).await
    }

    /// Delete a key. Returns the agent's verdict.
    pub async fn delete(&self, key: &str) -> Result<bool, ClientError> {
        let url = format!("{}/v1/kv/{key}", self.base_url);
        tracing::debug!(key = %key, "Deleting KV entry");

        let response = self
            .http
            .delete(&url)
            .headers(self.build_headers()?)
            .send()
            .await?;

        let response = check_response(response)?;
        json_with_limit(response).await
    }

    /// List the keys under a prefix. Returns an empty list when nothing
    /// matches.
    pub async fn keys(&self, prefix: &str) -> Result<Vec<String>, ClientError> {
        let url = format!("{}/v1/kv/{prefix}", self.base_url);
        let response = self
            .http
            .get(&url)
            .headers(self.build_headers()?)
            .query(&[("keys", "true")])
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }

        let response = check_response(response)?;
        json_with_limit(response).await
    }

    /// Build request headers
    fn build_headers(&self) -> Result<HeaderMap, ClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if !self.token.is_empty() {
            headers.insert(TOKEN_HEADER, HeaderValue::from_str(&self.token)?);
        }

        Ok(headers)
    }
}
