//! Arena-backed element tree
//!
//! Both tree adapters (parsed markup and rendered-page snapshots) are flattened
//! into a [`DomTree`]. Parent links are plain indices into the arena, so a tree
//! is `Send + Sync` and can be read from any worker without locking.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::infrastructure::error::{ExtractionError, ExtractionResult};

/// Structural identity of an element: its position in the arena.
///
/// Two elements with byte-identical markup still get distinct ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single element of a document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomNode {
    /// Lower-case tag name
    pub tag: String,

    /// Raw `class` attribute, empty when absent
    pub class_attr: String,

    /// Whitespace-separated tokens of `class_attr`, in attribute order
    pub classes: Vec<String>,

    pub id: Option<String>,

    pub attributes: BTreeMap<String, String>,

    /// Concatenated text of the element and all of its descendants
    pub text_content: String,

    /// Serialized outer markup; empty when the adapter serializes on demand
    /// (see `TreeAccessor::outer_markups`)
    pub outer_markup: String,

    pub parent: Option<NodeId>,

    pub children: Vec<NodeId>,
}

impl DomNode {
    /// Create a detached element; `parent` and `children` are filled in by [`DomTreeBuilder`].
    pub fn element(tag: &str, attributes: BTreeMap<String, String>) -> Self {
        let class_attr = attributes.get("class").cloned().unwrap_or_default();
        let classes = class_attr.split_whitespace().map(str::to_string).collect();
        let id = attributes.get("id").cloned();

        Self {
            tag: tag.to_ascii_lowercase(),
            class_attr,
            classes,
            id,
            attributes,
            text_content: String::new(),
            outer_markup: String::new(),
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text_content = text.into();
        self
    }

    pub fn with_markup(mut self, markup: impl Into<String>) -> Self {
        self.outer_markup = markup.into();
        self
    }

    /// `class` attribute, falling back to `id`; `None` when both are empty
    pub fn identity(&self) -> Option<String> {
        if !self.class_attr.is_empty() {
            return Some(self.class_attr.clone());
        }
        self.id.clone().filter(|id| !id.is_empty())
    }

    pub fn has_text(&self) -> bool {
        !self.text_content.trim().is_empty()
    }
}

/// Immutable element tree in document order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DomTree {
    nodes: Vec<DomNode>,
    roots: Vec<NodeId>,
}

impl DomTree {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look up an element; an unknown handle is treated as a detached node.
    pub fn node(&self, id: NodeId) -> ExtractionResult<&DomNode> {
        self.nodes.get(id.0).ok_or_else(|| {
            ExtractionError::traversal_failure(format!(
                "node {id} is not part of this tree ({} nodes)",
                self.nodes.len()
            ))
        })
    }

    pub fn parent(&self, id: NodeId) -> ExtractionResult<Option<NodeId>> {
        Ok(self.node(id)?.parent)
    }

    pub fn children(&self, id: NodeId) -> ExtractionResult<&[NodeId]> {
        Ok(&self.node(id)?.children)
    }

    /// Top-level elements, i.e. the children of the document itself
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Other children of `id`'s parent, in document order. Empty for top-level elements.
    pub fn siblings(&self, id: NodeId) -> ExtractionResult<Vec<NodeId>> {
        match self.parent(id)? {
            Some(parent) => Ok(self
                .children(parent)?
                .iter()
                .copied()
                .filter(|&sibling| sibling != id)
                .collect()),
            None => Ok(Vec::new()),
        }
    }

    /// All elements with their ids, in document order
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &DomNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (NodeId(index), node))
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }
}

/// Builds a [`DomTree`] in document order.
///
/// Elements must be pushed parent-first; children keep their push order.
#[derive(Debug, Default)]
pub struct DomTreeBuilder {
    tree: DomTree,
}

impl DomTreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, parent: Option<NodeId>, mut node: DomNode) -> ExtractionResult<NodeId> {
        let id = NodeId(self.tree.nodes.len());
        node.parent = parent;
        node.children.clear();

        match parent {
            Some(parent_id) => {
                let parent_node = self.tree.nodes.get_mut(parent_id.0).ok_or_else(|| {
                    ExtractionError::traversal_failure(format!(
                        "parent {parent_id} must be pushed before its children"
                    ))
                })?;
                parent_node.children.push(id);
            }
            None => self.tree.roots.push(id),
        }

        self.tree.nodes.push(node);
        Ok(id)
    }

    pub fn build(self) -> DomTree {
        self.tree
    }
}
