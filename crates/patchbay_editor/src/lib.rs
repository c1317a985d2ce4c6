// SPDX-License-Identifier: MIT OR Apache-2.0
//! Interactive editing layer for the `patchbay` node editor.
//!
//! This crate turns the `patchbay_graph` document model into an editor:
//! - Pointer-driven drag sessions (node move, port-to-port connect,
//!   box select), one at a time, each spanning a single gesture
//! - Rectangular multi-selection with strict containment
//! - Clipboard copy/paste with validation and id remapping
//! - A facade that owns the document and notifies the host exactly once
//!   per committed mutation
//!
//! The host supplies measured geometry ([`host::GeometryProvider`]), a
//! clipboard ([`host::ClipboardService`]) and the pan/zoom transform; the
//! engine never touches a rendering surface.

pub mod clipboard;
pub mod drag;
pub mod editor;
pub mod host;
pub mod selection;

pub use clipboard::PasteError;
pub use drag::{DragSession, SnapConfig, GRID_SIZE};
pub use editor::{ChangeListener, GraphEditor, InteractionTool};
pub use host::{ClipboardError, ClipboardService, GeometryProvider, MemoryClipboard, PortHandle};
pub use selection::Selection;
