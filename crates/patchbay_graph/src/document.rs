// SPDX-License-Identifier: MIT OR Apache-2.0
//! The graph document and its mutating operations.
//!
//! Every operation is total over the current document: it either applies
//! fully or leaves the document untouched. Rejections (self-loop, type
//! mismatch, unknown ids) are expected outcomes of exploratory gestures and
//! come back as `Err`/`None`/no-op rather than panics.

use crate::descriptor::NodeRegistry;
use crate::edge::Edge;
use crate::geometry::{Point, Size};
use crate::id::NodeId;
use crate::node::{Node, ValueMap};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Offset applied to a cloned node so it does not overlap the original.
pub const CLONE_OFFSET: Point = Point { x: 40.0, y: 40.0 };

/// One end of a prospective connection: a node and one of its port names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortAddress {
    /// Owning node
    pub node: NodeId,
    /// Port name on that node
    pub port: String,
}

impl PortAddress {
    /// Create a new port address.
    pub fn new(node: NodeId, port: impl Into<String>) -> Self {
        Self {
            node,
            port: port.into(),
        }
    }
}

/// Why a connection attempt was rejected.
#[derive(Debug, PartialEq, Eq)]
pub enum ConnectError {
    /// Source and target are the same node
    SelfLoop,

    /// Node not found
    NodeNotFound(NodeId),

    /// Port not found on the node
    PortNotFound {
        /// Owning node
        node: NodeId,
        /// Missing port name
        port: String,
    },

    /// Port type tags differ
    TypeMismatch {
        /// Source output type tag
        source: String,
        /// Target input type tag
        target: String,
    },
}

// Manual impls instead of `thiserror::Error`: the `source`/`target` field
// names on `TypeMismatch` would be misread by the derive as an error source.
impl std::fmt::Display for ConnectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SelfLoop => write!(f, "Self-loop not allowed"),
            Self::NodeNotFound(node) => write!(f, "Node not found: {node}"),
            Self::PortNotFound { node, port } => {
                write!(f, "Port not found: {port} on {node}")
            }
            Self::TypeMismatch { source, target } => {
                write!(f, "Incompatible port types: {source} -> {target}")
            }
        }
    }
}

impl std::error::Error for ConnectError {}

fn default_scale() -> f64 {
    1.0
}

/// The persisted graph document: all nodes plus the last viewport transform.
///
/// Serializes directly to the snapshot layout handed to the host:
/// `{ nodes: {id: Node}, scale, position }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphDocument {
    /// Nodes by id
    pub nodes: IndexMap<NodeId, Node>,
    /// Last known viewport zoom factor
    #[serde(default = "default_scale")]
    pub scale: f64,
    /// Last known viewport pan offset
    #[serde(default)]
    pub position: Point,
}

impl Default for GraphDocument {
    fn default() -> Self {
        Self {
            nodes: IndexMap::new(),
            scale: 1.0,
            position: Point::ZERO,
        }
    }
}

impl GraphDocument {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a node by id.
    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Get a mutable node by id.
    pub fn node_mut(&mut self, id: &NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    /// All node ids, in insertion order.
    pub fn node_ids(&self) -> impl Iterator<Item = &NodeId> {
        self.nodes.keys()
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Create a node of the given type at `position`. Returns the fresh id,
    /// or `None` when the type tag is not registered.
    pub fn add_node(
        &mut self,
        registry: &NodeRegistry,
        type_tag: &str,
        position: Point,
    ) -> Option<NodeId> {
        let descriptor = registry.get(type_tag)?;
        let node = Node::from_descriptor(descriptor, position);
        let id = node.id.clone();
        self.nodes.insert(id.clone(), node);
        Some(id)
    }

    /// Insert an existing node, e.g. one produced by a paste. Replaces any
    /// node with the same id.
    pub fn insert_node(&mut self, node: Node) {
        self.nodes.insert(node.id.clone(), node);
    }

    /// Duplicate a node: fresh id, connections reset, position offset by
    /// [`CLONE_OFFSET`]. No-op on unknown ids and root-protected nodes.
    pub fn clone_node(&mut self, registry: &NodeRegistry, id: &NodeId) -> Option<NodeId> {
        let original = self.nodes.get(id)?;
        if registry.is_root(&original.type_tag) {
            return None;
        }
        let mut clone = original.clone();
        clone.id = NodeId::generate();
        clone.connections = Default::default();
        clone.position = clone.position + CLONE_OFFSET;
        let new_id = clone.id.clone();
        self.nodes.insert(new_id.clone(), clone);
        Some(new_id)
    }

    /// Remove the given nodes and prune every edge that pointed at them.
    ///
    /// Root-protected nodes are filtered out of the deletion set, but their
    /// edges to genuinely removed peers are still pruned. Returns the ids
    /// actually removed.
    pub fn remove_nodes(&mut self, registry: &NodeRegistry, ids: &[NodeId]) -> Vec<NodeId> {
        let removed: Vec<NodeId> = ids
            .iter()
            .filter(|id| {
                self.nodes
                    .get(*id)
                    .is_some_and(|n| !registry.is_root(&n.type_tag))
            })
            .cloned()
            .collect();
        if removed.is_empty() {
            return removed;
        }

        for id in &removed {
            self.nodes.shift_remove(id);
        }
        // Every surviving neighbor drops its edges into the removed set.
        for node in self.nodes.values_mut() {
            node.connections.prune_peers(&removed);
        }
        removed
    }

    /// Connect a source output port to a target input port.
    ///
    /// Port types are resolved through each node's dynamic port set and must
    /// be equal. An already-existing identical connection makes this a
    /// successful no-op, so repeated gestures never duplicate edges. On
    /// success the reciprocal edge records are written to both nodes in one
    /// step, and the target input's stored literal is cleared (a connected
    /// input derives its value from upstream).
    pub fn connect(
        &mut self,
        registry: &NodeRegistry,
        source: &PortAddress,
        target: &PortAddress,
    ) -> Result<(), ConnectError> {
        if source.node == target.node {
            return Err(ConnectError::SelfLoop);
        }
        let source_node = self
            .nodes
            .get(&source.node)
            .ok_or_else(|| ConnectError::NodeNotFound(source.node.clone()))?;
        let target_node = self
            .nodes
            .get(&target.node)
            .ok_or_else(|| ConnectError::NodeNotFound(target.node.clone()))?;

        let source_port = source_node
            .output_ports(registry)
            .into_iter()
            .find(|p| p.name == source.port)
            .ok_or_else(|| ConnectError::PortNotFound {
                node: source.node.clone(),
                port: source.port.clone(),
            })?;
        let target_port = target_node
            .input_ports(registry)
            .into_iter()
            .find(|p| p.name == target.port)
            .ok_or_else(|| ConnectError::PortNotFound {
                node: target.node.clone(),
                port: target.port.clone(),
            })?;

        if source_port.port_type != target_port.port_type {
            return Err(ConnectError::TypeMismatch {
                source: source_port.port_type,
                target: target_port.port_type,
            });
        }

        // Idempotence: the peer check is node id plus port name on either
        // side; a match means this exact edge already exists.
        let duplicate = source_node
            .connections
            .outputs
            .iter()
            .any(|e| e.matches(&source.port, &target.node, &target.port))
            || target_node
                .connections
                .inputs
                .iter()
                .any(|e| e.matches(&target.port, &source.node, &source.port));
        if duplicate {
            return Ok(());
        }

        let port_type = source_port.port_type;
        if let Some(node) = self.nodes.get_mut(&source.node) {
            node.connections.outputs.push(Edge::new(
                &source.port,
                target.node.clone(),
                &target.port,
                &port_type,
            ));
        }
        if let Some(node) = self.nodes.get_mut(&target.node) {
            node.connections.inputs.push(Edge::new(
                &target.port,
                source.node.clone(),
                &source.port,
                &port_type,
            ));
            node.values.shift_remove(&target.port);
        }
        Ok(())
    }

    /// Remove the edge between a source output port and a target input
    /// port, on both sides. No-op when either node is missing or no such
    /// edge exists. Returns `true` if an edge was removed.
    pub fn disconnect(
        &mut self,
        src_node: &NodeId,
        src_port: &str,
        dst_node: &NodeId,
        dst_port: &str,
    ) -> bool {
        if !self.nodes.contains_key(src_node) || !self.nodes.contains_key(dst_node) {
            return false;
        }
        let mut changed = false;
        if let Some(node) = self.nodes.get_mut(src_node) {
            let before = node.connections.outputs.len();
            node.connections
                .outputs
                .retain(|e| !e.matches(src_port, dst_node, dst_port));
            changed |= node.connections.outputs.len() != before;
        }
        if let Some(node) = self.nodes.get_mut(dst_node) {
            let before = node.connections.inputs.len();
            node.connections
                .inputs
                .retain(|e| !e.matches(dst_port, src_node, src_port));
            changed |= node.connections.inputs.len() != before;
        }
        changed
    }

    /// Move a node to an absolute position and translate each node in
    /// `affected` by its delta. This is how a grouped drag moves every
    /// selected node by the same delta as the node under the pointer.
    pub fn set_node_position(
        &mut self,
        id: &NodeId,
        position: Point,
        affected: &IndexMap<NodeId, Point>,
    ) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.position = position;
        }
        for (other, delta) in affected {
            if other == id {
                continue;
            }
            if let Some(node) = self.nodes.get_mut(other) {
                node.position = node.position + *delta;
            }
        }
    }

    /// Replace a node's values wholesale. Entries for input ports that are
    /// currently connected are dropped; a connected input never keeps a
    /// stale literal.
    pub fn set_node_values(&mut self, id: &NodeId, values: ValueMap) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.values = values
                .into_iter()
                .filter(|(port, _)| !node.connections.input_connected(port))
                .collect();
        }
    }

    /// Record a node's measured size, written by the presentation layer
    /// after layout.
    pub fn set_node_size(&mut self, id: &NodeId, size: Size) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.size = Some(size);
        }
    }

    /// Set a node's display name.
    pub fn rename_node(&mut self, id: &NodeId, name: impl Into<String>) {
        let name = name.into();
        if name.is_empty() {
            return;
        }
        if let Some(node) = self.nodes.get_mut(id) {
            node.name = name;
        }
    }

    /// Set the routing waypoints of an edge, on both of its records.
    pub fn set_edge_waypoints(
        &mut self,
        src_node: &NodeId,
        src_port: &str,
        dst_node: &NodeId,
        dst_port: &str,
        waypoints: Option<Vec<Point>>,
    ) {
        if let Some(node) = self.nodes.get_mut(src_node) {
            for edge in &mut node.connections.outputs {
                if edge.matches(src_port, dst_node, dst_port) {
                    edge.waypoints = waypoints.clone();
                }
            }
        }
        if let Some(node) = self.nodes.get_mut(dst_node) {
            for edge in &mut node.connections.inputs {
                if edge.matches(dst_port, src_node, src_port) {
                    edge.waypoints = waypoints.clone();
                }
            }
        }
    }

    /// Assert the document's structural invariants: every edge record has
    /// an exact reciprocal on its peer, no edge points at a missing node,
    /// and no node connects to itself.
    ///
    /// # Panics
    /// Panics when an invariant is violated. Intended for tests and debug
    /// assertions.
    pub fn assert_consistent(&self) {
        for node in self.nodes.values() {
            for edge in &node.connections.outputs {
                assert_ne!(edge.node, node.id, "self-loop on {}", node.id);
                let peer = self
                    .nodes
                    .get(&edge.node)
                    .unwrap_or_else(|| panic!("dangling edge {} -> {}", node.id, edge.node));
                assert!(
                    peer.connections
                        .inputs
                        .iter()
                        .any(|e| e.matches(&edge.port, &node.id, &edge.name)),
                    "missing reciprocal input edge on {}",
                    peer.id
                );
            }
            for edge in &node.connections.inputs {
                assert_ne!(edge.node, node.id, "self-loop on {}", node.id);
                let peer = self
                    .nodes
                    .get(&edge.node)
                    .unwrap_or_else(|| panic!("dangling edge {} -> {}", node.id, edge.node));
                assert!(
                    peer.connections
                        .outputs
                        .iter()
                        .any(|e| e.matches(&edge.port, &node.id, &edge.name)),
                    "missing reciprocal output edge on {}",
                    peer.id
                );
            }
        }
    }
}
