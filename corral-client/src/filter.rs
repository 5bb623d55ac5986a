//! Health-status filtering for catalog nodes

use crate::types::{HealthCheck, ServiceNode};

/// Does this check apply to this node?
///
/// A check correlates when its node name matches and it is either a
/// node-level check (empty service id) or carries the node's service id.
fn check_applies(check: &HealthCheck, node: &ServiceNode) -> bool {
    check.node == node.node
        && (check.service_id.is_empty() || check.service_id == node.service_id)
}

/// Retain the nodes whose health checks all report `status`.
///
/// A node is kept only when at least one check correlates with it and every
/// correlated check reports the requested status; a node with no correlated
/// checks cannot have its status confirmed and is dropped. Checks referencing
/// nodes absent from `nodes` are ignored.
///
/// Deterministic given its inputs, no I/O.
pub fn filter_by_status(
    status: &str,
    nodes: Vec<ServiceNode>,
    checks: &[HealthCheck],
) -> Vec<ServiceNode> {
    nodes
        .into_iter()
        .filter(|node| {
            let mut any = false;
            for check in checks.iter().filter(|check| check_applies(check, node)) {
                if check.status != status {
                    return false;
                }
                any = true;
            }
            any
        })
        .collect()
}
