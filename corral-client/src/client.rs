//! Agent client facade
//!
//! Connection bootstrap with a liveness probe, memoized configuration and
//! hostname accessors, and the node-discovery pipeline.

use std::sync::LazyLock;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use tokio::sync::OnceCell;

use crate::error::{check_response, json_with_limit, ClientError};
use crate::filter::filter_by_status;
use crate::kv::KeyValue;
use crate::options::resolve_agent_options;
use crate::service::Service;
use crate::types::{AgentConfiguration, AgentSelf, HealthCheck, ServiceNode};

const TOKEN_HEADER: &str = "X-Consul-Token";

/// Shared HTTP client for all agent requests (connection pooling)
static SHARED_CLIENT: LazyLock<reqwest::Client> = LazyLock::new(|| {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .timeout(Duration::from_secs(30))
        .pool_max_idle_per_host(10)
        .build()
        .expect("Failed to build shared agent HTTP client")
});

/// Parameters for [`Client::connect`].
///
/// The token must be explicitly provided; `None` fails validation while an
/// empty string is valid and means anonymous access.
#[derive(Debug, Clone, Default)]
pub struct ConnectParams {
    pub agent_url: String,
    pub token: Option<String>,
}

/// Query options for [`Client::nodes`].
///
/// `token` defaults to the connection token when not supplied; `datacenter`,
/// `tag` and `near` pass through as agent query parameters. When `status` is
/// set, the result is filtered to nodes whose health checks all report it.
#[derive(Debug, Clone, Default)]
pub struct NodeQuery {
    pub service: String,
    pub token: Option<String>,
    pub status: Option<String>,
    pub datacenter: Option<String>,
    pub tag: Option<String>,
    pub near: Option<String>,
}

/// Client facade over an agent's HTTP API.
///
/// Obtained through [`Client::connect`], which verifies the agent is
/// reachable before handing out the client. The configuration and hostname
/// accessors fetch once per client lifetime and serve the cached value
/// afterwards; key/value and service-registration operations live on the
/// `kv` and `service` sub-clients.
#[derive(Debug)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
    token: String,
    configuration: OnceCell<AgentConfiguration>,
    hostname: OnceCell<String>,
    pub kv: KeyValue,
    pub service: Service,
}

impl Client {
    /// Connect to an agent.
    ///
    /// Validates the parameters, resolves connection options and probes the
    /// agent's leadership-status endpoint. Returns a client only when the
    /// agent responded to the probe.
    pub async fn connect(params: ConnectParams) -> Result<Self, ClientError> {
        if params.agent_url.is_empty() {
            return Err(ClientError::InvalidArgument(
                "agent url is missing".to_string(),
            ));
        }
        let token = params
            .token
            .ok_or_else(|| ClientError::InvalidArgument("token is missing".to_string()))?;

        let options = resolve_agent_options(&params.agent_url, &token)?;

        let http = SHARED_CLIENT.clone();
        let client = Self {
            kv: KeyValue::new(http.clone(), options.base_url.clone(), options.token.clone()),
            service: Service::new(http.clone(), options.base_url.clone(), options.token.clone()),
            http,
            base_url: options.base_url,
            token: options.token,
            configuration: OnceCell::new(),
            hostname: OnceCell::new(),
        };

        client.probe_leader().await?;
        tracing::info!(agent = %client.base_url, "Connected to agent");

        Ok(client)
    }

    /// Agent base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Liveness probe against the leadership-status endpoint.
    ///
    /// The body is discarded; only reachability matters. Issued without
    /// authentication, matching the plain status read the endpoint allows.
    async fn probe_leader(&self) -> Result<(), ClientError> {
        let url = format!("{}/v1/status/leader", self.base_url);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| ClientError::Connection(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ClientError::Connection(format!(
                "liveness probe returned {} for {url}",
                response.status()
            )));
        }

        Ok(())
    }

    /// The agent's configuration section from its self-description.
    ///
    /// Fetched at most once per client; every later call returns the cached
    /// value without network I/O. A failed fetch is not cached, so a later
    /// call retries.
    pub async fn configuration(&self) -> Result<&AgentConfiguration, ClientError> {
        self.configuration
            .get_or_try_init(|| self.fetch_configuration())
            .await
    }

    /// The canonical DNS hostname of the agent's node, derived from its
    /// configuration as `{node}.node.{datacenter}.{domain}`.
    ///
    /// Memoized identically to [`Client::configuration`], whose cached value
    /// it reuses.
    pub async fn hostname(&self) -> Result<&str, ClientError> {
        self.hostname
            .get_or_try_init(|| async {
                let config = self.configuration().await?;
                Ok(derive_hostname(config))
            })
            .await
            .map(String::as_str)
    }

    async fn fetch_configuration(&self) -> Result<AgentConfiguration, ClientError> {
        let url = format!("{}/v1/agent/self", self.base_url);
        tracing::debug!(url = %url, "Fetching agent self-description");

        let response = self
            .http
            .get(&url)
            .headers(self.build_headers(&self.token)?)
            .send()
            .await?;

        let response = check_response(response)?;
        let data: AgentSelf = json_with_limit(response).await?;

        Ok(data.config)
    }

    /// Nodes registered against a service, optionally filtered by health
    /// status.
    ///
    /// Queries the catalog for the service's nodes; when a status is
    /// requested and the catalog returned nodes, cross-references the
    /// service's health checks and keeps only nodes whose checks all report
    /// that status. Without a requested status, or with an empty catalog
    /// result, no health query is made.
    pub async fn nodes(&self, query: NodeQuery) -> Result<Vec<ServiceNode>, ClientError> {
        if query.service.is_empty() {
            return Err(ClientError::InvalidArgument(
                "service name is missing".to_string(),
            ));
        }

        let token = query.token.clone().unwrap_or_else(|| self.token.clone());

        let nodes = self.catalog_service_nodes(&query, &token).await?;

        let Some(status) = query.status.as_deref() else {
            return Ok(nodes);
        };
        if nodes.is_empty() {
            return Ok(nodes);
        }

        let checks = self.health_checks(&query, &token).await?;
        let filtered = filter_by_status(status, nodes, &checks);

        tracing::debug!(
            service = %query.service,
            status = %status,
            matched = filtered.len(),
            "Filtered catalog nodes by health status"
        );

        Ok(filtered)
    }

    async fn catalog_service_nodes(
        &self,
        query: &NodeQuery,
        token: &str,
    ) -> Result<Vec<ServiceNode>, ClientError> {
        let url = format!("{}/v1/catalog/service/{}", self.base_url, query.service);
        tracing::debug!(service = %query.service, "Querying catalog service nodes");

        let response = self
            .http
            .get(&url)
            .headers(self.build_headers(token)?)
            .query(&passthrough_params(query))
            .send()
            .await?;

        let response = check_response(response)?;
        json_with_limit(response).await
    }

    async fn health_checks(
        &self,
        query: &NodeQuery,
        token: &str,
    ) -> Result<Vec<HealthCheck>, ClientError> {
        let url = format!("{}/v1/health/checks/{}", self.base_url, query.service);
        tracing::debug!(service = %query.service, "Querying service health checks");

        let response = self
            .http
            .get(&url)
            .headers(self.build_headers(token)?)
            .query(&passthrough_params(query))
            .send()
            .await?;

        let response = check_response(response)?;
        json_with_limit(response).await
    }

    /// Build request headers
    fn build_headers(&self, token: &str) -> Result<HeaderMap, ClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if !token.is_empty() {
            headers.insert(TOKEN_HEADER, HeaderValue::from_str(token)?);
        }

        Ok(headers)
    }
}

/// Derive the canonical node hostname from the agent configuration.
///
/// The agent reports its DNS domain dot-terminated (`consul.`); exactly one
/// trailing character is removed.
fn derive_hostname(config: &AgentConfiguration) -> String {
    let mut domain = config.domain.clone();
    domain.pop();

    format!(
        "{}.node.{}.{}",
        config.node_name, config.datacenter, domain
    )
}

fn passthrough_params(query: &NodeQuery) -> Vec<(&'static str, String)> {
    let mut params = Vec::new();
    if let Some(dc) = &query.datacenter {
        params.push(("dc", dc.clone()));
    }
    if let Some(tag) = &query.tag {
        params.push(("tag", tag.clone()));
    }
    if let Some(near) = &query.near {
        params.push(("near", near.clone()));
    }
    params
}
