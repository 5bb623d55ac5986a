// Corral agent client
//
// Client facade over a Consul agent's HTTP API: connection bootstrap with a
// liveness probe, memoized configuration/hostname accessors, node discovery
// with health-status filtering, and key/value and service-registration
// sub-clients.
//
// Architecture:
// - client: the aggregate Client (connect, configuration, hostname, nodes)
// - options: connection option resolution and URL validation
// - filter: pure health-status filtering over catalog nodes
// - kv / service: sub-clients bound to the connection token

// Shared error types
pub mod error;

// Connection options
pub mod options;

// Wire types
pub mod types;

// Status filtering
pub mod filter;

// The client and its sub-clients
pub mod client;
pub mod kv;
pub mod service;

// Re-export the client surface for convenience
pub use client::{Client, ConnectParams, NodeQuery};
pub use error::ClientError;
pub use filter::filter_by_status;
pub use kv::{KeyValue, KeyValueEntry};
pub use options::{resolve_agent_options, AgentOptions};
pub use service::{AgentService, RegistrationCheck, Service, ServiceRegistration};
pub use types::{AgentConfiguration, HealthCheck, ServiceNode};
