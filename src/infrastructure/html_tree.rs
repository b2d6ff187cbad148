//! Static-parse adapter
//!
//! Raw markup is parsed once with `scraper` and flattened into a [`DomTree`].
//! The parsed document itself is not kept (it is not `Send`); CSS selection
//! and markup serialization re-parse the source, which yields the same
//! pre-order element numbering.
//!
//! Markup without `<html>`, `<head>`, `<body>` or a doctype is parsed as a
//! fragment. Its top-level elements then hang directly off the fragment root,
//! which plays the part of the document.

use scraper::{ElementRef, Html, Selector};
use std::collections::BTreeMap;
use tracing::{debug, warn};

use super::error::{ExtractionError, ExtractionResult};
use super::tree_accessor::TreeAccessor;
use crate::domain::{DomNode, DomTree, DomTreeBuilder, NodeId};
use crate::inference::PolicyKind;

#[derive(Debug, Clone)]
pub struct StaticHtmlTree {
    source: String,
    fragment: bool,
    tree: DomTree,
}

impl StaticHtmlTree {
    /// Parse markup as a document or a fragment, depending on what it looks like.
    /// html5ever recovers from malformed markup, so this never fails.
    pub fn parse(markup: &str) -> Self {
        if looks_like_document(markup) {
            Self::parse_document(markup)
        } else {
            Self::parse_fragment(markup)
        }
    }

    /// Parse a full document; html5ever supplies any missing `html`/`head`/`body`.
    pub fn parse_document(markup: &str) -> Self {
        Self::from_source(markup, false)
    }

    /// Parse a fragment without document scaffolding
    pub fn parse_fragment(markup: &str) -> Self {
        Self::from_source(markup, true)
    }

    fn from_source(markup: &str, fragment: bool) -> Self {
        let document = parse_source(markup, fragment);
        let tree = flatten(document.root_element());

        debug!(
            "Parsed {} elements from {} bytes of markup (fragment: {})",
            tree.len(),
            markup.len(),
            fragment
        );

        Self {
            source: markup.to_string(),
            fragment,
            tree,
        }
    }

    pub fn is_fragment(&self) -> bool {
        self.fragment
    }

    /// Elements written at the top level of the source. For a fragment these
    /// are the children of the fragment root.
    pub fn top_level(&self) -> &[NodeId] {
        match self.tree.roots().first() {
            Some(&root) if self.fragment => self.tree.children(root).unwrap_or_default(),
            _ => self.tree.roots(),
        }
    }

    fn reparse(&self) -> Html {
        parse_source(&self.source, self.fragment)
    }

    /// Resolve a CSS selector to node seeds, in document order
    pub fn select(&self, css: &str) -> ExtractionResult<Vec<NodeId>> {
        let selector = Selector::parse(css)
            .map_err(|e| ExtractionError::invalid_input(format!("invalid selector '{css}': {e}")))?;

        let document = self.reparse();
        let matched: Vec<_> = document.select(&selector).map(|el| el.id()).collect();
        if matched.is_empty() {
            return Ok(Vec::new());
        }

        let ids = document
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .enumerate()
            .filter(|(_, element)| matched.contains(&element.id()))
            .map(|(index, _)| NodeId(index))
            .collect();

        Ok(ids)
    }
}

fn parse_source(markup: &str, fragment: bool) -> Html {
    if fragment {
        Html::parse_fragment(markup)
    } else {
        Html::parse_document(markup)
    }
}

fn looks_like_document(markup: &str) -> bool {
    let lower = markup.to_ascii_lowercase();
    lower.trim_start().starts_with("<!doctype")
        || ["<html", "<head", "<body"].iter().any(|tag| opens_tag(&lower, tag))
}

/// Whether `tag` (e.g. `<head`) occurs as a whole tag name, so `<header` does not count
fn opens_tag(lower: &str, tag: &str) -> bool {
    lower.match_indices(tag).any(|(at, _)| {
        !lower[at + tag.len()..].starts_with(|c: char| c.is_ascii_alphanumeric() || c == '-')
    })
}

/// Pre-order flattening with an explicit stack, so nesting depth is bounded by
/// the heap rather than the call stack. Markup is left empty and serialized on
/// demand.
fn flatten(root: ElementRef<'_>) -> DomTree {
    let mut builder = DomTreeBuilder::new();
    let mut pending: Vec<(ElementRef<'_>, Option<NodeId>)> = vec![(root, None)];

    while let Some((element, parent)) = pending.pop() {
        let value = element.value();
        let attributes: BTreeMap<String, String> = value
            .attrs()
            .map(|(name, val)| (name.to_string(), val.to_string()))
            .collect();
        let node = DomNode::element(value.name(), attributes).with_text(element.text().collect::<String>());

        let id = match builder.push(parent, node) {
            Ok(id) => id,
            Err(e) => {
                warn!("Skipping <{}> subtree: {}", value.name(), e);
                continue;
            }
        };

        // reversed, so the first child is popped next
        let children: Vec<_> = element.children().filter_map(ElementRef::wrap).collect();
        pending.extend(children.into_iter().rev().map(|child| (child, Some(id))));
    }

    builder.build()
}

impl TreeAccessor for StaticHtmlTree {
    fn tree(&self) -> &DomTree {
        &self.tree
    }

    fn supports_hit_testing(&self) -> bool {
        false
    }

    fn resolve_point(&self, x: f64, y: f64) -> ExtractionResult<Option<NodeId>> {
        Err(ExtractionError::invalid_input(format!(
            "cannot hit-test ({x}, {y}): parsed markup has no layout"
        )))
    }

    fn default_policy(&self) -> PolicyKind {
        PolicyKind::SharedClass
    }

    fn outer_markups(&self, ids: &[NodeId]) -> ExtractionResult<Vec<String>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        for &id in ids {
            self.tree.node(id)?;
        }

        let document = self.reparse();
        let elements: Vec<ElementRef<'_>> = document.root_element().descendants().filter_map(ElementRef::wrap).collect();
        ids.iter()
            .map(|&id| {
                elements.get(id.index()).map(ElementRef::html).ok_or_else(|| {
                    ExtractionError::traversal_failure(format!("node {id} has no counterpart in the re-parsed source"))
                })
            })
            .collect()
    }
}
