//! Capability interface over a materialized element tree
//!
//! Implemented by [`super::html_tree::StaticHtmlTree`] (parsed markup) and
//! [`super::rendered_page::RenderedPage`] (snapshot of a rendered page with
//! layout boxes).

use crate::domain::{DomTree, NodeId, SeedPoint};
use crate::inference::PolicyKind;
use crate::infrastructure::error::{ExtractionError, ExtractionResult};

pub trait TreeAccessor {
    fn tree(&self) -> &DomTree;

    /// Whether point seeds can be hit-tested against layout
    fn supports_hit_testing(&self) -> bool;

    /// Element under a page coordinate; `Ok(None)` when the point hits nothing
    fn resolve_point(&self, x: f64, y: f64) -> ExtractionResult<Option<NodeId>>;

    /// Predicate policy that suits this kind of tree
    fn default_policy(&self) -> PolicyKind;

    /// Serialized outer markup of each element, in the order asked for.
    ///
    /// Adapters that keep markup on the nodes use it as is; others serialize
    /// only the requested elements.
    fn outer_markups(&self, ids: &[NodeId]) -> ExtractionResult<Vec<String>> {
        ids.iter()
            .map(|&id| self.tree().node(id).map(|node| node.outer_markup.clone()))
            .collect()
    }

    fn resolve_seed(&self, seed: &SeedPoint) -> ExtractionResult<Option<NodeId>> {
        match *seed {
            SeedPoint::Point { x, y } => self.resolve_point(x, y),
            SeedPoint::Node { node } => {
                self.tree().node(node)?;
                Ok(Some(node))
            }
        }
    }

    /// Reject seeds this accessor can never resolve, before any traversal
    fn validate_seeds(&self, seeds: &[SeedPoint]) -> ExtractionResult<()> {
        for (index, seed) in seeds.iter().enumerate() {
            if let SeedPoint::Point { x, y } = *seed {
                if !x.is_finite() || !y.is_finite() {
                    return Err(ExtractionError::invalid_input(format!(
                        "seed {index} has a non-finite coordinate ({x}, {y})"
                    )));
                }
                if !self.supports_hit_testing() {
                    return Err(ExtractionError::invalid_input(format!(
                        "seed {index} is a page coordinate but this tree has no layout"
                    )));
                }
            }
        }
        Ok(())
    }
}
