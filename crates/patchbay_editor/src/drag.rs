// SPDX-License-Identifier: MIT OR Apache-2.0
//! Drag sessions: the ephemeral state of one pointer gesture.
//!
//! At most one session is active at a time, owned by the editor facade and
//! handed out by reference for visual feedback (selection rectangle,
//! half-connected edge). A session spans exactly one
//! pointer-down/pointer-up pair and never outlives its gesture.

use crate::host::PortHandle;
use indexmap::IndexMap;
use patchbay_graph::{NodeId, Point};

/// Default grid cell size for snapping.
pub const GRID_SIZE: f64 = 20.0;

/// Grid snapping configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapConfig {
    /// Whether moved nodes snap to the grid
    pub enabled: bool,
    /// Grid cell size in graph units
    pub grid_size: f64,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            grid_size: GRID_SIZE,
        }
    }
}

/// The three mutually exclusive interactive drag kinds.
#[derive(Debug, Clone)]
pub enum DragSession {
    /// Moving a node (and everything selected with it)
    MoveNode {
        /// The node under the pointer
        node: NodeId,
        /// Pointer position at session start, screen space
        anchor_screen: Point,
        /// Position of every affected node at session start, graph space
        origins: IndexMap<NodeId, Point>,
    },
    /// Dragging a prospective connection out of a port. Visual-only until
    /// release; no document mutation happens before pointer-up.
    ConnectPort {
        /// The port the drag started on
        source: PortHandle,
        /// Current pointer position, screen space
        pointer_screen: Point,
    },
    /// Drawing a selection rectangle over empty canvas
    BoxSelect {
        /// Pointer position at session start, screen space
        anchor_screen: Point,
        /// Current pointer position, screen space
        pointer_screen: Point,
    },
}

/// The group delta for a node move, in graph space.
///
/// The raw pointer delta is divided by the viewport scale, then the dragged
/// node's target is snapped to the grid, and the *snapped* target defines
/// the delta applied to the whole group. Snap applies once, consistently,
/// so a multi-node drag keeps its relative layout and the dragged node
/// always lands on an exact grid multiple.
pub fn group_delta(
    primary_origin: Point,
    anchor_screen: Point,
    pointer_screen: Point,
    scale: f64,
    snap: &SnapConfig,
) -> Point {
    let raw = (pointer_screen - anchor_screen) / scale;
    let mut target = primary_origin + raw;
    if snap.enabled {
        target = target.snapped(snap.grid_size);
    }
    target - primary_origin
}
