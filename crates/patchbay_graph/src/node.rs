// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node instances in the graph document.

use crate::descriptor::{NodeDescriptor, NodeRegistry};
use crate::edge::Connections;
use crate::geometry::{Point, Size};
use crate::id::NodeId;
use crate::port::PortSpec;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A node's persisted configuration: port name → host-defined value.
pub type ValueMap = IndexMap<String, serde_json::Value>;

/// A node instance in the graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Unique id, generated at creation, immutable
    pub id: NodeId,
    /// Type tag referencing a registered [`NodeDescriptor`]
    #[serde(rename = "type")]
    pub type_tag: String,
    /// Display name; may diverge from the descriptor label
    pub name: String,
    /// Position in graph space
    pub position: Point,
    /// Last measured size, written by the presentation layer after layout
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
    /// Port name → value
    #[serde(default)]
    pub values: ValueMap,
    /// Inbound and outbound edges
    #[serde(default)]
    pub connections: Connections,
}

impl Node {
    /// Create a node from a type descriptor, seeding `values` from each
    /// input port's default value.
    pub fn from_descriptor(descriptor: &NodeDescriptor, position: Point) -> Self {
        let mut values = ValueMap::new();
        // Defaults are resolved against the empty value map, then folded in.
        for port in (descriptor.inputs)(&values) {
            if let Some(default) = port.default_value {
                values.insert(port.name, default);
            }
        }
        Self {
            id: NodeId::generate(),
            type_tag: descriptor.type_tag.clone(),
            name: descriptor.label.clone(),
            position,
            size: None,
            values,
            connections: Connections::new(),
        }
    }

    /// Current input port set, resolved through the registry.
    pub fn input_ports(&self, registry: &NodeRegistry) -> Vec<PortSpec> {
        registry
            .get(&self.type_tag)
            .map(|d| (d.inputs)(&self.values))
            .unwrap_or_default()
    }

    /// Current output port set, resolved through the registry.
    pub fn output_ports(&self, registry: &NodeRegistry) -> Vec<PortSpec> {
        registry
            .get(&self.type_tag)
            .map(|d| (d.outputs)(&self.values))
            .unwrap_or_default()
    }

    /// The node's bounding rectangle in graph space, if it has been
    /// measured.
    pub fn bounds(&self) -> Option<crate::geometry::Rect> {
        self.size
            .map(|size| crate::geometry::Rect::from_min_size(self.position, size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn number_source() -> NodeDescriptor {
        NodeDescriptor::new("number", "Number")
            .fixed_inputs(vec![
                PortSpec::new("value", "number").with_default(json!(0.0)),
                PortSpec::new("label", "string"),
            ])
            .fixed_outputs(vec![PortSpec::new("out", "number")])
    }

    #[test]
    fn test_from_descriptor_seeds_defaults() {
        let node = Node::from_descriptor(&number_source(), Point::new(10.0, 20.0));
        assert_eq!(node.type_tag, "number");
        assert_eq!(node.name, "Number");
        assert_eq!(node.position, Point::new(10.0, 20.0));
        // Only ports with defaults land in values.
        assert_eq!(node.values.len(), 1);
        assert_eq!(node.values.get("value"), Some(&json!(0.0)));
        assert!(node.connections.inputs.is_empty());
        assert!(node.connections.outputs.is_empty());
    }

    #[test]
    fn test_port_resolution_through_registry() {
        let mut registry = NodeRegistry::new();
        registry.register(number_source());
        let node = Node::from_descriptor(registry.get("number").unwrap(), Point::ZERO);

        assert_eq!(node.input_ports(&registry).len(), 2);
        assert_eq!(node.output_ports(&registry).len(), 1);

        // Unknown type resolves to no ports, not a panic.
        let mut orphan = node.clone();
        orphan.type_tag = "gone".into();
        assert!(orphan.input_ports(&registry).is_empty());
    }

    #[test]
    fn test_node_json_shape() {
        let mut node = Node::from_descriptor(&number_source(), Point::new(1.0, 2.0));
        node.id = NodeId::new("n1");
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["type"], "number");
        assert_eq!(json["position"], json!({"x": 1.0, "y": 2.0}));
        assert_eq!(json["connections"], json!({"inputs": [], "outputs": []}));
        assert!(json.get("size").is_none());
    }
}
