// SPDX-License-Identifier: MIT OR Apache-2.0
//! Clipboard payloads: copy serialization, paste validation and id
//! remapping.
//!
//! The clipboard text is the same JSON shape as the document's node map:
//! `{id: Node}` for exactly the copied ids. Paste is all-or-nothing: a
//! parse failure or a single invalid node aborts the whole operation with
//! no partial merge.

use indexmap::IndexMap;
use patchbay_graph::{Node, NodeId, NodeRegistry, Point};

use crate::host::ClipboardError;

/// A parsed clipboard payload: nodes keyed by their (old) ids.
pub type ClipboardPayload = IndexMap<NodeId, Node>;

/// Why a paste was aborted.
#[derive(Debug, thiserror::Error)]
pub enum PasteError {
    /// The clipboard text is not a valid payload
    #[error("Malformed clipboard payload: {0}")]
    Parse(#[from] serde_json::Error),

    /// The payload is not a JSON object of nodes
    #[error("Clipboard payload is not a node map")]
    NotANodeMap,

    /// A pasted node references a type tag the registry does not know
    #[error("Unknown node type {type_tag:?} on pasted node {node}")]
    UnknownType {
        /// Pasted node id
        node: String,
        /// Unregistered type tag
        type_tag: String,
    },

    /// A pasted node is missing a required field
    #[error("Pasted node {node} is missing {field}")]
    MissingField {
        /// Pasted node id
        node: String,
        /// Name of the missing or malformed field
        field: &'static str,
    },

    /// The payload contains no nodes
    #[error("Clipboard payload is empty")]
    Empty,

    /// The clipboard read itself failed
    #[error(transparent)]
    Clipboard(#[from] ClipboardError),
}

/// Serialize the given nodes to clipboard text. Ids not present in the
/// node map are skipped.
pub fn serialize_nodes<'a>(
    nodes: impl IntoIterator<Item = &'a Node>,
) -> Result<String, serde_json::Error> {
    let map: IndexMap<&NodeId, &Node> = nodes.into_iter().map(|n| (&n.id, n)).collect();
    serde_json::to_string(&map)
}

/// Parse and validate clipboard text against the current registry.
///
/// Validation is structural (each entry must carry a position and both
/// connection lists) plus semantic (the type tag must be registered). Any
/// failure aborts the whole paste.
pub fn parse_payload(text: &str, registry: &NodeRegistry) -> Result<ClipboardPayload, PasteError> {
    let raw: serde_json::Value = serde_json::from_str(text)?;
    let entries = raw.as_object().ok_or(PasteError::NotANodeMap)?;
    if entries.is_empty() {
        return Err(PasteError::Empty);
    }

    for (id, value) in entries {
        let type_tag = value
            .get("type")
            .and_then(serde_json::Value::as_str)
            .ok_or(PasteError::MissingField {
                node: id.clone(),
                field: "type",
            })?;
        if !registry.contains(type_tag) {
            return Err(PasteError::UnknownType {
                node: id.clone(),
                type_tag: type_tag.to_string(),
            });
        }
        if !value.get("position").is_some_and(serde_json::Value::is_object) {
            return Err(PasteError::MissingField {
                node: id.clone(),
                field: "position",
            });
        }
        let connections = value.get("connections").ok_or(PasteError::MissingField {
            node: id.clone(),
            field: "connections",
        })?;
        for side in ["inputs", "outputs"] {
            if !connections.get(side).is_some_and(serde_json::Value::is_array) {
                return Err(PasteError::MissingField {
                    node: id.clone(),
                    field: "connections",
                });
            }
        }
    }

    let nodes: IndexMap<NodeId, Node> = serde_json::from_value(raw)?;
    // Key by each node's own id so edge rewriting sees one id space.
    Ok(nodes.into_values().map(|n| (n.id.clone(), n)).collect())
}

/// Prepare a validated payload for merging at `pointer_graph`.
///
/// Edges whose peer is not part of the payload are dropped (no dangling
/// references into the live document). Every node gets a fresh id, edges
/// are rewritten through the old→new map, and the whole cluster is
/// translated so its minimum-x node lands at `pointer_graph`, preserving
/// relative layout.
pub fn remap_for_paste(mut payload: ClipboardPayload, pointer_graph: Point) -> Vec<Node> {
    drop_external_edges(&mut payload);

    let anchor = payload
        .values()
        .map(|n| n.position)
        .reduce(|a, b| if b.x < a.x { b } else { a })
        .unwrap_or(Point::ZERO);
    let offset = pointer_graph - anchor;

    let id_map: IndexMap<NodeId, NodeId> = payload
        .keys()
        .map(|old| (old.clone(), NodeId::generate()))
        .collect();

    payload
        .into_values()
        .map(|mut node| {
            node.id = id_map[&node.id].clone();
            node.position = node.position + offset;
            for edge in node
                .connections
                .inputs
                .iter_mut()
                .chain(node.connections.outputs.iter_mut())
            {
                // every surviving peer is in the payload, so it is mapped
                edge.node = id_map[&edge.node].clone();
            }
            node
        })
        .collect()
}

/// Drop every edge in the payload whose peer is not itself in the payload.
pub fn drop_external_edges(payload: &mut ClipboardPayload) {
    let ids: Vec<NodeId> = payload.keys().cloned().collect();
    for node in payload.values_mut() {
        node.connections.inputs.retain(|e| ids.contains(&e.node));
        node.connections.outputs.retain(|e| ids.contains(&e.node));
    }
}
