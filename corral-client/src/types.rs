//! Agent HTTP API types
//!
//! Wire types for the agent's JSON payloads: self-description, catalog
//! service nodes and health checks.

use serde::Deserialize;

/// Agent self-description response.
///
/// Only the `Config` section is consumed; the rest of the payload is ignored.
#[derive(Debug, Deserialize)]
pub struct AgentSelf {
    #[serde(rename = "Config")]
    pub config: AgentConfiguration,
}

/// The `Config` section of the agent's self-description.
///
/// The node name, datacenter and DNS domain are typed; everything else the
/// agent reports is preserved opaquely in `extra`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AgentConfiguration {
    #[serde(rename = "NodeName")]
    pub node_name: String,
    #[serde(rename = "Datacenter")]
    pub datacenter: String,
    /// DNS domain, dot-terminated by agent convention (e.g. `consul.`)
    #[serde(rename = "Domain")]
    pub domain: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A node registered against a service, from the catalog listing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServiceNode {
    #[serde(rename = "Node")]
    pub node: String,
    #[serde(rename = "Address")]
    pub address: String,
    #[serde(rename = "Datacenter", default)]
    pub datacenter: String,
    #[serde(rename = "ServiceID", default)]
    pub service_id: String,
    #[serde(rename = "ServiceName", default)]
    pub service_name: String,
    #[serde(rename = "ServiceAddress", default)]
    pub service_address: String,
    #[serde(rename = "ServicePort", default)]
    pub service_port: u16,
    #[serde(rename = "ServiceTags", default)]
    pub service_tags: Vec<String>,
}

/// A health check record correlating a status to a node/service pair.
///
/// A check with an empty `service_id` is a node-level check and applies to
/// every service instance on its node.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HealthCheck {
    #[serde(rename = "Node")]
    pub node: String,
    #[serde(rename = "CheckID")]
    pub check_id: String,
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "Notes", default)]
    pub notes: String,
    #[serde(rename = "Output", default)]
    pub output: String,
    #[serde(rename = "ServiceID", default)]
    pub service_id: String,
    #[serde(rename = "ServiceName", default)]
    pub service_name: String,
}
