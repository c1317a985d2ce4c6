// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node type descriptors and the type registry.
//!
//! A descriptor's port sets are *functions of the node's current values*,
//! so a node can grow or shrink ports as its configuration changes (e.g. a
//! mixer node with one input port per configured channel). Descriptors are
//! plain value objects holding closures; there is no subclassing.

use crate::node::ValueMap;
use crate::port::PortSpec;
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

/// Function resolving a node's current port set from its values.
pub type PortsFn = Arc<dyn Fn(&ValueMap) -> Vec<PortSpec> + Send + Sync>;

/// Node type category, used by the host for palette/menu grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum NodeCategory {
    /// Source nodes (constants, parameters)
    Input,
    /// Sink nodes (result, preview)
    Output,
    /// Transformations
    Transform,
    /// Utility nodes
    Utility,
    /// Custom/user-defined
    Custom,
}

/// Host-supplied description of a node type, read-only to the engine.
#[derive(Clone)]
pub struct NodeDescriptor {
    /// Unique type tag
    pub type_tag: String,
    /// Human-readable label, used as the initial display name
    pub label: String,
    /// Category
    pub category: NodeCategory,
    /// Input port set as a function of the node's values
    pub inputs: PortsFn,
    /// Output port set as a function of the node's values
    pub outputs: PortsFn,
    /// Root nodes can never be deleted or cloned
    pub root: bool,
    /// Whether node instances may be dragged
    pub movable: bool,
}

impl NodeDescriptor {
    /// Create a new descriptor with empty port sets.
    ///
    /// # Panics
    /// Panics if `type_tag` or `label` is empty; descriptors with no
    /// identity are a programmer error.
    pub fn new(type_tag: impl Into<String>, label: impl Into<String>) -> Self {
        let type_tag = type_tag.into();
        let label = label.into();
        assert!(!type_tag.is_empty(), "descriptor type tag must not be empty");
        assert!(!label.is_empty(), "descriptor label must not be empty");
        Self {
            type_tag,
            label,
            category: NodeCategory::Custom,
            inputs: Arc::new(|_| Vec::new()),
            outputs: Arc::new(|_| Vec::new()),
            root: false,
            movable: true,
        }
    }

    /// Set the category.
    pub fn category(mut self, category: NodeCategory) -> Self {
        self.category = category;
        self
    }

    /// Set the input port function.
    pub fn inputs(mut self, f: impl Fn(&ValueMap) -> Vec<PortSpec> + Send + Sync + 'static) -> Self {
        self.inputs = Arc::new(f);
        self
    }

    /// Set a fixed input port set.
    pub fn fixed_inputs(self, ports: Vec<PortSpec>) -> Self {
        self.inputs(move |_| ports.clone())
    }

    /// Set the output port function.
    pub fn outputs(mut self, f: impl Fn(&ValueMap) -> Vec<PortSpec> + Send + Sync + 'static) -> Self {
        self.outputs = Arc::new(f);
        self
    }

    /// Set a fixed output port set.
    pub fn fixed_outputs(self, ports: Vec<PortSpec>) -> Self {
        self.outputs(move |_| ports.clone())
    }

    /// Mark this type as a root node type.
    pub fn root(mut self) -> Self {
        self.root = true;
        self
    }

    /// Forbid dragging instances of this type.
    pub fn immovable(mut self) -> Self {
        self.movable = false;
        self
    }
}

impl fmt::Debug for NodeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeDescriptor")
            .field("type_tag", &self.type_tag)
            .field("label", &self.label)
            .field("category", &self.category)
            .field("root", &self.root)
            .field("movable", &self.movable)
            .finish_non_exhaustive()
    }
}

/// Registry of available node types.
#[derive(Debug, Default, Clone)]
pub struct NodeRegistry {
    /// Registered descriptors by type tag
    types: IndexMap<String, NodeDescriptor>,
}

impl NodeRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor, replacing any previous one with the same tag.
    pub fn register(&mut self, descriptor: NodeDescriptor) {
        self.types.insert(descriptor.type_tag.clone(), descriptor);
    }

    /// Get a descriptor by type tag.
    pub fn get(&self, type_tag: &str) -> Option<&NodeDescriptor> {
        self.types.get(type_tag)
    }

    /// Whether a type tag is registered.
    pub fn contains(&self, type_tag: &str) -> bool {
        self.types.contains_key(type_tag)
    }

    /// Whether the given type tag names a root node type.
    pub fn is_root(&self, type_tag: &str) -> bool {
        self.get(type_tag).is_some_and(|d| d.root)
    }

    /// All registered descriptors.
    pub fn descriptors(&self) -> impl Iterator<Item = &NodeDescriptor> {
        self.types.values()
    }

    /// Descriptors in a given category.
    pub fn descriptors_in_category(
        &self,
        category: NodeCategory,
    ) -> impl Iterator<Item = &NodeDescriptor> {
        self.types.values().filter(move |d| d.category == category)
    }
}
