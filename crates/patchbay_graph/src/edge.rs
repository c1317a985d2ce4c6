// SPDX-License-Identifier: MIT OR Apache-2.0
//! Edge records and the per-node connection lists.
//!
//! An edge is stored redundantly on both endpoints: the source node holds it
//! in `connections.outputs`, the destination in `connections.inputs`, each
//! side naming its own local port in `name` and the other end in
//! `node`/`port`. Both records are written and erased in the same document
//! operation, so no half-connected state is ever observable.

use crate::geometry::Point;
use crate::id::NodeId;
use serde::{Deserialize, Serialize};

/// One endpoint's record of a connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Local port name on the node holding this record
    pub name: String,
    /// Id of the node on the other end
    pub node: NodeId,
    /// Port name on the other end
    pub port: String,
    /// Port type tag, equal on both ends
    #[serde(rename = "type")]
    pub port_type: String,
    /// Optional routing points in graph space
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waypoints: Option<Vec<Point>>,
}

impl Edge {
    /// Create a new edge record.
    pub fn new(
        name: impl Into<String>,
        node: NodeId,
        port: impl Into<String>,
        port_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            node,
            port: port.into(),
            port_type: port_type.into(),
            waypoints: None,
        }
    }

    /// Whether this record describes the connection between local port
    /// `name` and remote `node`/`port`. Peer identity is node id *and* port
    /// name; two different peers may well connect to the same local port.
    pub fn matches(&self, name: &str, node: &NodeId, port: &str) -> bool {
        self.name == name && self.node == *node && self.port == port
    }
}

/// The inbound and outbound edge lists of one node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Connections {
    /// Inbound edges, ordered
    pub inputs: Vec<Edge>,
    /// Outbound edges, ordered
    pub outputs: Vec<Edge>,
}

impl Connections {
    /// Create empty connection lists.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether any edge, in either direction, points at `peer`.
    pub fn references(&self, peer: &NodeId) -> bool {
        self.inputs.iter().chain(&self.outputs).any(|e| e.node == *peer)
    }

    /// Drop every edge whose peer is one of `removed`. Returns `true` if
    /// anything was pruned.
    pub fn prune_peers(&mut self, removed: &[NodeId]) -> bool {
        let before = self.inputs.len() + self.outputs.len();
        self.inputs.retain(|e| !removed.contains(&e.node));
        self.outputs.retain(|e| !removed.contains(&e.node));
        before != self.inputs.len() + self.outputs.len()
    }

    /// Whether the named input port has at least one inbound edge.
    pub fn input_connected(&self, port: &str) -> bool {
        self.inputs.iter().any(|e| e.name == port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_requires_node_and_port() {
        let edge = Edge::new("out", NodeId::new("b"), "in", "number");
        assert!(edge.matches("out", &NodeId::new("b"), "in"));
        // Same port name on a different peer node is a different edge.
        assert!(!edge.matches("out", &NodeId::new("c"), "in"));
        assert!(!edge.matches("out", &NodeId::new("b"), "other"));
    }

    #[test]
    fn test_prune_peers() {
        let mut conns = Connections::new();
        conns.inputs.push(Edge::new("in", NodeId::new("a"), "out", "number"));
        conns.outputs.push(Edge::new("out", NodeId::new("b"), "in", "number"));
        conns.outputs.push(Edge::new("out", NodeId::new("c"), "in", "number"));

        assert!(conns.prune_peers(&[NodeId::new("a"), NodeId::new("c")]));
        assert!(conns.inputs.is_empty());
        assert_eq!(conns.outputs.len(), 1);
        assert_eq!(conns.outputs[0].node, NodeId::new("b"));

        assert!(!conns.prune_peers(&[NodeId::new("a")]));
    }

    #[test]
    fn test_edge_serde_shape() {
        let edge = Edge::new("x", NodeId::new("B"), "x", "number");
        let json = serde_json::to_value(&edge).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"name": "x", "node": "B", "port": "x", "type": "number"})
        );
    }
}
