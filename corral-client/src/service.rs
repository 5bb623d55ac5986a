//! Service-registration sub-client
//!
//! Thin passthrough over the agent's local service endpoints. Constructed by
//! [`Client::connect`](crate::Client::connect) with the connection token
//! bound in.

use std::collections::HashMap;

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::{Deserialize, Serialize};

use crate::error::{check_response, json_with_limit, ClientError};

const TOKEN_HEADER: &str = "X-Consul-Token";

/// A service registration payload.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ServiceRegistration {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "ID", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "Address", skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(rename = "Port", skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(rename = "Tags", skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(rename = "Check", skip_serializing_if = "Option::is_none")]
    pub check: Option<RegistrationCheck>,
}

/// Health check definition attached to a service registration.
///
/// Either an HTTP check (`http` + `interval`) or a TTL check (`ttl`).
#[derive(Debug, Clone, Default, Serialize)]
pub struct RegistrationCheck {
    #[serde(rename = "HTTP", skip_serializing_if = "Option::is_none")]
    pub http: Option<String>,
    #[serde(rename = "Interval", skip_serializing_if = "Option::is_none")]
    pub interval: Option<String>,
    #[serde(rename = "TTL", skip_serializing_if = "Option::is_none")]
    pub ttl: Option<String>,
    #[serde(
        rename = "DeregisterCriticalServiceAfter",
        skip_serializing_if = "Option::is_none"
    )]
    pub deregister_critical_service_after: Option<String>,
}

/// A service as the agent reports it in its local listing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AgentService {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Service")]
    pub service: String,
    #[serde(rename = "Tags", default)]
    pub tags: Vec<String>,
    #[serde(rename = "Address", default)]
    pub address: String,
    #[serde(rename = "Port", default)]
    pub port: u16,
}

/// Service-registration sub-client.
#[derive(Debug)]
pub struct Service {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl Service {
    pub(crate) fn new(http: reqwest::Client, base_url: String, token: String) -> Self {
        Self {
            http,
            base_url,
            token,
        }
    }

    /// Register a service with the local agent.
    pub async fn register(&self, registration: &ServiceRegistration) -> Result<(), ClientError> {
        if registration.name.is_empty() {
            return Err(ClientError::InvalidArgument(
                "service name is missing".to_string(),
            ));
        }

        let url = format!("{}/v1/agent/service/register", self.base_url);
        tracing::info!(service = %registration.name, "Registering service");

        let response = self
            .http
            .put(&url)
            .headers(self.build_headers()?)
            .json(registration)
            .send()
            .await?;

        check_response(response)?;
        Ok(())
    }

    /// Deregister a service from the local agent.
    pub async fn deregister(&self, service_id: &str) -> Result<(), ClientError> {
        if service_id.is_empty() {
            return Err(ClientError::InvalidArgument(
                "service id is missing".to_string(),
            ));
        }

        let url = format!("{}/v1/agent/service/deregister/{service_id}", self.base_url);
        tracing::info!(service_id = %service_id, "Deregistering service");

        let response = self
            .http
            .put(&url)
            .headers(self.build_headers()?)
            .send()
            .await?;

        check_response(response)?;
        Ok(())
    }

    /// List the services registered with the local agent, keyed by service
    /// id.
    pub async fn list(&self) -> Result<HashMap<String, AgentService>, ClientError> {
        let url = format!("{}/v1/agent/services", self.base_url);
        let response = self
            .http
            .get(&url)
            .headers(self.build_headers()?)
            .send()
            .await?;

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
