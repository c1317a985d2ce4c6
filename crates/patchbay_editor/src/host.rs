// SPDX-License-Identifier: MIT OR Apache-2.0
//! Interfaces to the host's presentation layer and clipboard service.
//!
//! The engine never touches a rendering surface. Whatever the host draws,
//! it reports measured screen-space geometry back through
//! [`GeometryProvider`], which keeps the editing logic testable without a
//! real UI.

use futures::future::LocalBoxFuture;
use patchbay_graph::{NodeId, Point, PortDirection, Rect};

/// A connector overlay element the presentation layer exposes for hit
/// testing: one visible port on one node.
#[derive(Debug, Clone, PartialEq)]
pub struct PortHandle {
    /// Owning node
    pub node: NodeId,
    /// Port name
    pub port: String,
    /// Input or output side
    pub direction: PortDirection,
    /// Port type tag
    pub port_type: String,
}

impl PortHandle {
    /// Create a new port handle.
    pub fn new(
        node: NodeId,
        port: impl Into<String>,
        direction: PortDirection,
        port_type: impl Into<String>,
    ) -> Self {
        Self {
            node,
            port: port.into(),
            direction,
            port_type: port_type.into(),
        }
    }

    /// Whether `other` is a valid drop target for a connection started on
    /// this handle: opposite direction, equal type tag, different node.
    pub fn accepts(&self, other: &PortHandle) -> bool {
        other.direction == self.direction.opposite()
            && other.port_type == self.port_type
            && other.node != self.node
    }
}

/// Screen-space geometry measured by the presentation layer.
///
/// A `None` bounding box is a transient measurement miss (e.g. right after
/// a node was added, before layout ran); the engine simply skips the node
/// for that frame.
pub trait GeometryProvider {
    /// The rendered bounding box of a node, in screen space.
    fn node_bounds(&self, id: &NodeId) -> Option<Rect>;

    /// Every connector overlay under a screen-space point.
    fn connector_hits(&self, point: Point) -> Vec<PortHandle>;
}

/// Error from the host clipboard service.
#[derive(Debug, thiserror::Error)]
pub enum ClipboardError {
    /// No clipboard service is available
    #[error("Clipboard unavailable")]
    Unavailable,

    /// The clipboard read failed
    #[error("Clipboard read failed: {0}")]
    Read(String),
}

/// The host clipboard. Reading is the engine's single asynchronous
/// boundary; a resolved read is applied against the document as it is at
/// resolution time, never against a stale snapshot.
pub trait ClipboardService {
    /// Store text on the clipboard.
    fn write_text(&mut self, text: String);

    /// Read the clipboard's current text.
    fn read_text(&mut self) -> LocalBoxFuture<'_, Result<String, ClipboardError>>;
}

/// In-memory clipboard, for tests and headless hosts.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    text: Option<String>,
}

impl MemoryClipboard {
    /// Create an empty clipboard.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClipboardService for MemoryClipboard {
    fn write_text(&mut self, text: String) {
        self.text = Some(text);
    }

    fn read_text(&mut self) -> LocalBoxFuture<'_, Result<String, ClipboardError>> {
        Box::pin(futures::future::ready(
            self.text.clone().ok_or(ClipboardError::Unavailable),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_requires_opposite_direction_and_type() {
        let out = PortHandle::new(NodeId::new("a"), "out", PortDirection::Output, "number");
        let matching_in =
            PortHandle::new(NodeId::new("b"), "in", PortDirection::Input, "number");
        let wrong_type =
            PortHandle::new(NodeId::new("b"), "in", PortDirection::Input, "string");
        let same_direction =
            PortHandle::new(NodeId::new("b"), "out", PortDirection::Output, "number");
        let same_node =
            PortHandle::new(NodeId::new("a"), "in", PortDirection::Input, "number");

        assert!(out.accepts(&matching_in));
        assert!(!out.accepts(&wrong_type));
        assert!(!out.accepts(&same_direction));
        assert!(!out.accepts(&same_node));
    }

    #[test]
    fn test_memory_clipboard_round_trip() {
        let mut clipboard = MemoryClipboard::new();
        assert!(futures::executor::block_on(clipboard.read_text()).is_err());

        clipboard.write_text("payload".into());
        let text = futures::executor::block_on(clipboard.read_text()).unwrap();
        assert_eq!(text, "payload");
    }
}
