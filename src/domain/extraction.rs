//! Extraction outcomes

use serde::{Deserialize, Serialize};

use super::dom_tree::NodeId;

/// The repeated items found under a container
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListResult {
    /// Serialized item markup, deduplicated by exact string equality.
    /// Callers must not rely on the order.
    pub items: Vec<String>,

    /// Container's `class` attribute, falling back to its `id`
    pub container_identity: Option<String>,

    pub container: NodeId,

    /// Representative class string of the dominant cluster
    pub item_class: String,

    /// Number of seeds that voted for the container
    pub votes: usize,
}

impl ListResult {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Outcome of a seeded extraction.
///
/// `NotFound` is the ordinary result for pages without a matching layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Extraction {
    Found(ListResult),
    NotFound,
    /// The voted container does not carry the identity the caller expected
    ContainerMismatch {
        expected: String,
        found: Option<String>,
    },
}

impl Extraction {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    pub fn list(&self) -> Option<&ListResult> {
        match self {
            Self::Found(list) => Some(list),
            _ => None,
        }
    }

    pub fn into_list(self) -> Option<ListResult> {
        match self {
            Self::Found(list) => Some(list),
            _ => None,
        }
    }
}

/// Result of an unseeded scan over a whole parsed document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanResult {
    /// Markup of the container's direct children, in document order
    pub items: Vec<String>,

    /// Container's class attribute; empty for the fallback container
    pub container_identity: String,

    pub container: Option<NodeId>,
}

/// Container found under one seed on a detail page (e.g. an image gallery)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailContainer {
    pub container: NodeId,

    pub container_identity: Option<String>,

    /// Outer markup of the whole container
    pub markup: String,
}
