//! Sibling-based "is this element a list member" predicate
//!
//! Two policies share the same tree shape:
//! - `Similarity`: a same-tag sibling whose whole class string is close enough
//!   (rendered pages, where generated class names drift slightly)
//! - `SharedClass`: a same-tag sibling sharing at least one class token
//!   (parsed markup)

use serde::{Deserialize, Serialize};

use super::similarity::similarity;
use crate::domain::{DomTree, NodeId};
use crate::infrastructure::error::ExtractionResult;

pub const DEFAULT_SIBLING_SIMILARITY: f64 = 0.9;

/// Policy selector as it appears in configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    Similarity,
    SharedClass,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ListItemPolicy {
    Similarity { threshold: f64 },
    SharedClass,
}

impl ListItemPolicy {
    pub fn from_kind(kind: PolicyKind, sibling_threshold: f64) -> Self {
        match kind {
            PolicyKind::Similarity => Self::Similarity {
                threshold: sibling_threshold,
            },
            PolicyKind::SharedClass => Self::SharedClass,
        }
    }

    pub fn kind(&self) -> PolicyKind {
        match self {
            Self::Similarity { .. } => PolicyKind::Similarity,
            Self::SharedClass => PolicyKind::SharedClass,
        }
    }

    /// Whether `element` has a parent and a same-tag sibling matching under this policy
    pub fn is_list_item(&self, tree: &DomTree, element: NodeId) -> ExtractionResult<bool> {
        let node = tree.node(element)?;
        if node.parent.is_none() {
            return Ok(false);
        }

        for sibling_id in tree.siblings(element)? {
            let sibling = tree.node(sibling_id)?;
            if sibling.tag != node.tag {
                continue;
            }

            let matched = match self {
                Self::Similarity { threshold } => {
                    similarity(&node.class_attr, &sibling.class_attr) >= *threshold
                }
                Self::SharedClass => node
                    .classes
                    .iter()
                    .any(|class| sibling.classes.contains(class)),
            };
            if matched {
                return Ok(true);
            }
        }

        Ok(false)
    }
}

impl Default for ListItemPolicy {
    fn default() -> Self {
        Self::Similarity {
            threshold: DEFAULT_SIBLING_SIMILARITY,
        }
    }
}
