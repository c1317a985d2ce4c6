// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph document model for the `patchbay` node editor.
//!
//! This crate holds the data model a visual node editor operates on:
//! - Nodes with named, typed input/output ports
//! - Port sets that are functions of a node's current values
//! - Connections stored redundantly on both endpoints, kept reciprocal by
//!   construction
//! - The screen/graph coordinate transform
//! - Document operations: add, clone, remove, connect, disconnect,
//!   reposition
//!
//! Everything interactive (selection, clipboard, drag sessions) lives in
//! `patchbay_editor`; everything visual lives in the host.

pub mod descriptor;
pub mod document;
pub mod edge;
pub mod geometry;
pub mod id;
pub mod node;
pub mod port;

pub use descriptor::{NodeCategory, NodeDescriptor, NodeRegistry};
pub use document::{ConnectError, GraphDocument, PortAddress, CLONE_OFFSET};
pub use edge::{Connections, Edge};
pub use geometry::{Point, Rect, Size, Viewport};
pub use id::NodeId;
pub use node::{Node, ValueMap};
pub use port::{PortDirection, PortSpec};
