// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node identifiers.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// URL-safe alphabet used for generated ids.
const ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-";

/// Length of generated ids. 21 symbols over a 64-symbol alphabet gives
/// 126 bits of entropy, enough that ids are never reused in practice.
const ID_LEN: usize = 21;

/// Unique identifier for a node.
///
/// Ids are short, URL-safe strings generated at node creation and immutable
/// afterwards. They survive JSON round-trips (document snapshots, clipboard
/// payloads) unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Generate a fresh random id.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let id = (0..ID_LEN)
            .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
            .collect();
        Self(id)
    }

    /// Wrap an existing id, e.g. one read back from a snapshot.
    ///
    /// # Panics
    /// Panics if `id` is empty; an empty node id is a programmer error.
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        assert!(!id.is_empty(), "node id must not be empty");
        Self(id)
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generated_ids_are_url_safe() {
        let id = NodeId::generate();
        assert_eq!(id.as_str().len(), 21);
        assert!(id
            .as_str()
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-'));
    }

    #[test]
    fn test_generated_ids_are_distinct() {
        let ids: HashSet<_> = (0..1000).map(|_| NodeId::generate()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_serde_transparent() {
        let id = NodeId::new("abc123");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"abc123\"");
        let back: NodeId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    #[should_panic(expected = "node id must not be empty")]
    fn test_empty_id_panics() {
        let _ = NodeId::new("");
    }
}
