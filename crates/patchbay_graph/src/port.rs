// SPDX-License-Identifier: MIT OR Apache-2.0
//! Port specifications for node inputs/outputs.

use serde::{Deserialize, Serialize};

/// Port direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PortDirection {
    /// Input port
    Input,
    /// Output port
    Output,
}

impl PortDirection {
    /// The opposite direction. A connection always joins an output to an
    /// input.
    pub fn opposite(self) -> Self {
        match self {
            Self::Input => Self::Output,
            Self::Output => Self::Input,
        }
    }
}

/// Specification of one port on a node type.
///
/// Port types are open string tags owned by the host (`"number"`,
/// `"string"`, `"geometry"`, ...); the engine only ever compares them for
/// equality when validating a connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortSpec {
    /// Port name, unique within its node and direction
    pub name: String,
    /// Port type tag; connections require equal tags on both ends
    pub port_type: String,
    /// Display label
    pub label: String,
    /// Default value seeded into a node's values at creation (inputs only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<serde_json::Value>,
    /// Hidden ports are not offered as connection targets
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub hidden: bool,
}

impl PortSpec {
    /// Create a new port spec. The label defaults to the name.
    pub fn new(name: impl Into<String>, port_type: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            name,
            port_type: port_type.into(),
            default_value: None,
            hidden: false,
        }
    }

    /// Set the display label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Set the default value.
    pub fn with_default(mut self, value: serde_json::Value) -> Self {
        self.default_value = Some(value);
        self
    }

    /// Mark the port as hidden.
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }
}
