// SPDX-License-Identifier: MIT OR Apache-2.0
//! The graph editor facade.
//!
//! `GraphEditor` owns the document, the selection and the active drag
//! session, and exposes the callback-driven surface the presentation layer
//! drives. Pointer and keyboard events come in with screen-space
//! coordinates; committed mutations go out through the change callback
//! exactly once per user-meaningful operation. Intermediate drag frames
//! update the document locally without notifying, so the host only persists
//! settled states.

use crate::clipboard::{self, PasteError};
use crate::drag::{self, DragSession, SnapConfig};
use crate::host::{ClipboardService, GeometryProvider, PortHandle};
use crate::selection::{self, Selection};
use indexmap::IndexMap;
use patchbay_graph::{
    ConnectError, GraphDocument, NodeId, Point, PortAddress, PortDirection, Rect, Size,
    ValueMap, Viewport,
};
use patchbay_graph::NodeRegistry;

/// Callback invoked with the full document snapshot after every committed
/// mutation.
pub type ChangeListener = Box<dyn FnMut(&GraphDocument)>;

/// What a pointer-down over empty canvas means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionTool {
    /// Drag on empty canvas draws a selection rectangle
    #[default]
    Select,
    /// Empty-canvas gestures belong to the external pan/zoom viewport
    Pan,
}

/// The graph editing engine behind a visual node editor.
pub struct GraphEditor {
    document: GraphDocument,
    registry: NodeRegistry,
    selection: Selection,
    drag: Option<DragSession>,
    snap: SnapConfig,
    tool: InteractionTool,
    /// Top-left of the canvas element in screen coordinates
    origin: Point,
    on_change: Option<ChangeListener>,
}

impl GraphEditor {
    /// Create an editor over an empty document.
    pub fn new(registry: NodeRegistry) -> Self {
        Self::with_document(registry, GraphDocument::new())
    }

    /// Create an editor over a host-supplied document snapshot.
    pub fn with_document(registry: NodeRegistry, document: GraphDocument) -> Self {
        Self {
            document,
            registry,
            selection: Selection::new(),
            drag: None,
            snap: SnapConfig::default(),
            tool: InteractionTool::default(),
            origin: Point::ZERO,
            on_change: None,
        }
    }

    /// Register the change callback.
    pub fn on_change(&mut self, listener: ChangeListener) {
        self.on_change = Some(listener);
    }

    /// The current document.
    pub fn document(&self) -> &GraphDocument {
        &self.document
    }

    /// The node type registry.
    pub fn registry(&self) -> &NodeRegistry {
        &self.registry
    }

    /// The current selection.
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// The active drag session, for visual feedback.
    pub fn drag_session(&self) -> Option<&DragSession> {
        self.drag.as_ref()
    }

    /// Grid snapping configuration.
    pub fn snap(&self) -> SnapConfig {
        self.snap
    }

    /// Set the grid snapping configuration.
    pub fn set_snap(&mut self, snap: SnapConfig) {
        self.snap = snap;
    }

    /// Set what empty-canvas gestures do.
    pub fn set_tool(&mut self, tool: InteractionTool) {
        self.tool = tool;
    }

    /// Record the canvas element's screen-space origin.
    pub fn set_origin(&mut self, origin: Point) {
        self.origin = origin;
    }

    /// The current viewport transform.
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.document.position, self.document.scale)
    }

    /// Refresh the transform from the viewport collaborator. Called every
    /// pan/zoom frame; transient, so it never notifies on its own. The new
    /// values ride along with the next committed mutation's snapshot.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.document.position = viewport.position;
        self.document.scale = viewport.scale;
    }

    /// Convert a pointer position to graph space.
    pub fn to_graph_space(&self, screen: Point) -> Point {
        self.viewport().to_graph_space(screen, self.origin)
    }

    fn notify(&mut self) {
        if let Some(listener) = &mut self.on_change {
            listener(&self.document);
        }
    }

    // --- Pointer protocol -------------------------------------------------

    /// Pointer-down on a node's draggable surface. Starts a move session
    /// unless another session is active or the node's type forbids moving.
    pub fn pointer_down_node(&mut self, id: &NodeId, screen: Point) {
        if self.drag.is_some() {
            return;
        }
        let Some(node) = self.document.node(id) else {
            return;
        };
        let movable = self
            .registry
            .get(&node.type_tag)
            .map_or(true, |d| d.movable);
        if !movable {
            return;
        }

        // A drag never silently moves an unrelated selection: if the
        // grabbed node is not part of it, the selection collapses to just
        // that node first.
        if !self.selection.contains(id) {
            self.selection.replace([id.clone()]);
        }
        let origins: IndexMap<NodeId, Point> = self
            .selection
            .iter()
            .filter_map(|sel| self.document.node(sel).map(|n| (sel.clone(), n.position)))
            .collect();

        self.drag = Some(DragSession::MoveNode {
            node: id.clone(),
            anchor_screen: screen,
            origins,
        });
    }

    /// Pointer-down on a port connector. Starts a connect session; nothing
    /// touches the document until release.
    pub fn pointer_down_port(&mut self, source: PortHandle, screen: Point) {
        if self.drag.is_some() {
            return;
        }
        let Some(node) = self.document.node(&source.node) else {
            return;
        };
        // Only visible ports can start a connection.
        let ports = match source.direction {
            PortDirection::Input => node.input_ports(&self.registry),
            PortDirection::Output => node.output_ports(&self.registry),
        };
        let visible = ports.iter().any(|p| p.name == source.port && !p.hidden);
        if !visible {
            return;
        }

        self.drag = Some(DragSession::ConnectPort {
            source,
            pointer_screen: screen,
        });
    }

    /// Pointer-down on empty canvas. Starts a box-select session in
    /// `Select` mode; in `Pan` mode the gesture belongs to the viewport.
    pub fn pointer_down_canvas(&mut self, screen: Point) {
        if self.drag.is_some() || self.tool != InteractionTool::Select {
            return;
        }
        self.selection.clear();
        self.drag = Some(DragSession::BoxSelect {
            anchor_screen: screen,
            pointer_screen: screen,
        });
    }

    /// Pointer-move during a session. Node moves are previewed live with a
    /// transient, un-notified document update; connect and box-select only
    /// advance their feedback point.
    pub fn pointer_move(&mut self, screen: Point) {
        match &mut self.drag {
            Some(
                DragSession::ConnectPort { pointer_screen, .. }
                | DragSession::BoxSelect { pointer_screen, .. },
            ) => {
                *pointer_screen = screen;
            }
            Some(DragSession::MoveNode {
                node,
                anchor_screen,
                origins,
            }) => {
                let (node, anchor, origins) = (node.clone(), *anchor_screen, origins.clone());
                self.apply_move(&node, anchor, screen, &origins);
            }
            None => {}
        }
    }

    /// Pointer-up: commits the active session and returns to idle.
    pub fn pointer_up(&mut self, screen: Point, geometry: &dyn GeometryProvider) {
        let Some(session) = self.drag.take() else {
            return;
        };
        match session {
            DragSession::MoveNode {
                node,
                anchor_screen,
                origins,
            } => {
                self.apply_move(&node, anchor_screen, screen, &origins);
                tracing::debug!(node = %node, moved = origins.len(), "committed node move");
                self.notify();
            }
            DragSession::ConnectPort { source, .. } => {
                let target = geometry
                    .connector_hits(screen)
                    .into_iter()
                    .find(|hit| source.accepts(hit));
                let Some(target) = target else {
                    // Released over nothing valid: a normal outcome.
                    tracing::trace!("connection attempt dropped");
                    return;
                };
                let (src, dst) = match source.direction {
                    PortDirection::Output => (source, target),
                    PortDirection::Input => (target, source),
                };
                let result = self.document.connect(
                    &self.registry,
                    &PortAddress::new(src.node, src.port),
                    &PortAddress::new(dst.node, dst.port),
                );
                match result {
                    Ok(()) => {
                        tracing::debug!("connected ports");
                        self.notify();
                    }
                    Err(err) => tracing::trace!(%err, "connection rejected"),
                }
            }
            DragSession::BoxSelect { anchor_screen, .. } => {
                let rect = Rect::from_corners(anchor_screen, screen);
                let ids = selection::nodes_in_rect(&self.document, geometry, rect);
                self.selection.replace(ids);
            }
        }
    }

    fn apply_move(
        &mut self,
        primary: &NodeId,
        anchor_screen: Point,
        pointer_screen: Point,
        origins: &IndexMap<NodeId, Point>,
    ) {
        let Some(primary_origin) = origins.get(primary).copied() else {
            return;
        };
        let delta = drag::group_delta(
            primary_origin,
            anchor_screen,
            pointer_screen,
            self.document.scale,
            &self.snap,
        );
        // Origins are from session start, but set_node_position applies
        // relative deltas; convert to per-frame deltas against current
        // positions so repeated previews do not accumulate.
        let mut affected = IndexMap::new();
        for (id, origin) in origins {
            if id == primary {
                continue;
            }
            if let Some(node) = self.document.node(id) {
                affected.insert(id.clone(), *origin + delta - node.position);
            }
        }
        self.document
            .set_node_position(primary, primary_origin + delta, &affected);
    }

    // --- Keyboard protocol ------------------------------------------------

    /// Escape: cancels any live drag session (restoring previewed
    /// positions) and clears the selection. Never mutates committed state.
    pub fn escape(&mut self) {
        if let Some(DragSession::MoveNode { origins, .. }) = self.drag.take() {
            for (id, origin) in &origins {
                if let Some(node) = self.document.node_mut(id) {
                    node.position = *origin;
                }
            }
        }
        self.selection.clear();
    }

    /// Delete key: removes the selected nodes (root-protected ones
    /// survive).
    pub fn delete_selected(&mut self) {
        let ids = self.selection.to_vec();
        if ids.is_empty() {
            return;
        }
        let removed = self.document.remove_nodes(&self.registry, &ids);
        self.selection.clear();
        if !removed.is_empty() {
            tracing::debug!(removed = removed.len(), "deleted selection");
            self.notify();
        }
    }

    /// Select every node in the document.
    pub fn select_all(&mut self) {
        let ids: Vec<NodeId> = self.document.node_ids().cloned().collect();
        self.selection.replace(ids);
    }

    // --- Clipboard ---------------------------------------------------------

    /// Copy the selected nodes to the host clipboard. No document mutation.
    pub fn copy_selection(&mut self, clipboard: &mut dyn ClipboardService) {
        if self.selection.is_empty() {
            return;
        }
        let nodes = self
            .selection
            .iter()
            .filter_map(|id| self.document.node(id));
        match clipboard::serialize_nodes(nodes) {
            Ok(text) => {
                tracing::debug!(copied = self.selection.len(), "copied selection");
                clipboard.write_text(text);
            }
            Err(err) => tracing::trace!(%err, "copy failed to serialize"),
        }
    }

    /// Paste clipboard text at the given pointer position.
    ///
    /// Validation happens against the registry and document as they are
    /// *now*; any invalid node aborts the whole paste. On success the
    /// pasted cluster lands with its anchor under the pointer, and the
    /// selection is replaced by the new ids.
    pub fn paste_text(&mut self, text: &str, pointer_screen: Point) -> Result<(), PasteError> {
        let payload = clipboard::parse_payload(text, &self.registry)?;
        let pointer_graph = self.to_graph_space(pointer_screen);
        let pasted = clipboard::remap_for_paste(payload, pointer_graph);

        let ids: Vec<NodeId> = pasted.iter().map(|n| n.id.clone()).collect();
        for node in pasted {
            self.document.insert_node(node);
        }
        self.selection.replace(ids.clone());
        tracing::debug!(pasted = ids.len(), "pasted nodes");
        self.notify();
        Ok(())
    }

    /// Read the host clipboard and paste at the given pointer position.
    /// The single async boundary in the engine; the paste is validated and
    /// applied against the document as it is when the read resolves.
    pub async fn paste_from_clipboard(
        &mut self,
        clipboard: &mut dyn ClipboardService,
        pointer_screen: Point,
    ) -> Result<(), PasteError> {
        let text = clipboard.read_text().await?;
        self.paste_text(&text, pointer_screen)
    }

    // --- Document operations (each notifies once on success) ---------------

    /// Add a node of the given type at a graph-space position.
    pub fn add_node(&mut self, type_tag: &str, position: Point) -> Option<NodeId> {
        let id = self.document.add_node(&self.registry, type_tag, position)?;
        tracing::debug!(%id, type_tag, "added node");
        self.notify();
        Some(id)
    }

    /// Duplicate a node. No-op on unknown ids and root nodes.
    pub fn clone_node(&mut self, id: &NodeId) -> Option<NodeId> {
        let clone_id = self.document.clone_node(&self.registry, id)?;
        tracing::debug!(source = %id, clone = %clone_id, "cloned node");
        self.notify();
        Some(clone_id)
    }

    /// Remove nodes by id, with cascading edge pruning and root protection.
    pub fn remove_nodes(&mut self, ids: &[NodeId]) {
        let removed = self.document.remove_nodes(&self.registry, ids);
        if !removed.is_empty() {
            tracing::debug!(removed = removed.len(), "removed nodes");
            self.notify();
        }
    }

    /// Connect a source output to a target input.
    pub fn connect(
        &mut self,
        source: &PortAddress,
        target: &PortAddress,
    ) -> Result<(), ConnectError> {
        self.document.connect(&self.registry, source, target)?;
        self.notify();
        Ok(())
    }

    /// Remove a connection.
    pub fn disconnect(
        &mut self,
        src_node: &NodeId,
        src_port: &str,
        dst_node: &NodeId,
        dst_port: &str,
    ) {
        if self.document.disconnect(src_node, src_port, dst_node, dst_port) {
            self.notify();
        }
    }

    /// Replace a node's values, e.g. when an inline port editor commits.
    pub fn set_node_values(&mut self, id: &NodeId, values: ValueMap) {
        if self.document.node(id).is_none() {
            return;
        }
        self.document.set_node_values(id, values);
        self.notify();
    }

    /// Record a node's measured size. Layout feedback from the
    /// presentation layer, not a user edit, so it does not notify.
    pub fn set_node_size(&mut self, id: &NodeId, size: Size) {
        self.document.set_node_size(id, size);
    }

    /// Rename a node.
    pub fn rename_node(&mut self, id: &NodeId, name: impl Into<String>) {
        let name = name.into();
        if self
            .document
            .node(id)
            .is_some_and(|n| n.name != name && !name.is_empty())
        {
            self.document.rename_node(id, name);
            self.notify();
        }
    }

    /// Set an edge's routing waypoints.
    pub fn set_edge_waypoints(
        &mut self,
        src_node: &NodeId,
        src_port: &str,
        dst_node: &NodeId,
        dst_port: &str,
        waypoints: Option<Vec<Point>>,
    ) {
        self.document
            .set_edge_waypoints(src_node, src_port, dst_node, dst_port, waypoints);
        self.notify();
    }
}
