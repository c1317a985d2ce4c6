// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node selection: a session-scoped set of node ids.
//!
//! Selection is never persisted in the document. It is replaced by box
//! select and paste, and cleared by escape or by clicking empty canvas.

use crate::host::GeometryProvider;
use indexmap::IndexSet;
use patchbay_graph::{GraphDocument, NodeId, Rect};

/// The current set of selected nodes, in selection order.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    ids: IndexSet<NodeId>,
}

impl Selection {
    /// Create an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `id` is selected.
    pub fn contains(&self, id: &NodeId) -> bool {
        self.ids.contains(id)
    }

    /// Add a node to the selection.
    pub fn insert(&mut self, id: NodeId) {
        self.ids.insert(id);
    }

    /// Replace the whole selection.
    pub fn replace(&mut self, ids: impl IntoIterator<Item = NodeId>) {
        self.ids = ids.into_iter().collect();
    }

    /// Clear the selection.
    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Number of selected nodes.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Selected ids, in selection order.
    pub fn iter(&self) -> impl Iterator<Item = &NodeId> {
        self.ids.iter()
    }

    /// Selected ids as an owned list.
    pub fn to_vec(&self) -> Vec<NodeId> {
        self.ids.iter().cloned().collect()
    }
}

/// Nodes whose rendered bounding box lies entirely inside `rect`.
///
/// `rect` and the reported bounds are both screen space. Partial overlap
/// does not select; nodes without measured bounds are skipped. Document
/// order is preserved.
pub fn nodes_in_rect(
    document: &GraphDocument,
    geometry: &dyn GeometryProvider,
    rect: Rect,
) -> Vec<NodeId> {
    document
        .node_ids()
        .filter(|id| {
            geometry
                .node_bounds(id)
                .is_some_and(|bounds| rect.contains_rect(&bounds))
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use patchbay_graph::{Point, Size};
    use std::collections::HashMap;

    struct FixedGeometry(HashMap<NodeId, Rect>);

    impl GeometryProvider for FixedGeometry {
        fn node_bounds(&self, id: &NodeId) -> Option<Rect> {
            self.0.get(id).copied()
        }

        fn connector_hits(&self, _point: Point) -> Vec<crate::host::PortHandle> {
            Vec::new()
        }
    }

    fn doc_with_ids(ids: &[&str]) -> GraphDocument {
        use patchbay_graph::{NodeDescriptor, NodeRegistry};
        let mut registry = NodeRegistry::new();
        registry.register(NodeDescriptor::new("any", "Any"));
        let mut doc = GraphDocument::new();
        for id in ids {
            let generated = doc.add_node(&registry, "any", Point::ZERO).unwrap();
            let mut node = doc.nodes.shift_remove(&generated).unwrap();
            node.id = NodeId::new(*id);
            doc.insert_node(node);
        }
        doc
    }

    #[test]
    fn test_selection_replace_and_clear() {
        let mut selection = Selection::new();
        selection.insert(NodeId::new("a"));
        selection.insert(NodeId::new("b"));
        assert_eq!(selection.len(), 2);

        selection.replace([NodeId::new("c")]);
        assert!(!selection.contains(&NodeId::new("a")));
        assert!(selection.contains(&NodeId::new("c")));

        selection.clear();
        assert!(selection.is_empty());
    }

    #[test]
    fn test_nodes_in_rect_requires_full_containment() {
        let doc = doc_with_ids(&["inside", "partial", "outside", "unmeasured"]);
        let mut bounds = HashMap::new();
        bounds.insert(
            NodeId::new("inside"),
            Rect::from_min_size(Point::new(10.0, 10.0), Size::new(50.0, 30.0)),
        );
        // Overlaps the selection rect but pokes out on the right.
        bounds.insert(
            NodeId::new("partial"),
            Rect::from_min_size(Point::new(80.0, 10.0), Size::new(50.0, 30.0)),
        );
        bounds.insert(
            NodeId::new("outside"),
            Rect::from_min_size(Point::new(300.0, 300.0), Size::new(50.0, 30.0)),
        );
        let geometry = FixedGeometry(bounds);

        let rect = Rect::from_corners(Point::new(0.0, 0.0), Point::new(100.0, 100.0));
        let hit = nodes_in_rect(&doc, &geometry, rect);

        assert_eq!(hit, vec![NodeId::new("inside")]);
    }
}
