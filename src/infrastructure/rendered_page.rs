//! Live-session adapter over a rendered-page snapshot
//!
//! The browser collaborator dumps the DOM as a flat JSON list of elements in
//! document order, each with its parent index and layout rectangle:
//!
//! ```json
//! { "url": "https://shop.example/watches",
//!   "nodes": [
//!     { "tag": "html", "parent": null, "rect": { "x": 0, "y": 0, "width": 1920, "height": 4000 } },
//!     { "tag": "body", "parent": 0, "attributes": { "class": "home" }, "text": "...",
//!       "outer_html": "<body class=\"home\">...</body>", "rect": { ... } }
//!   ] }
//! ```
//!
//! An optional top-level `device_pixel_ratio` (default 1) records how
//! screenshot pixels map to the CSS pixels the rects are given in.
//!
//! Point seeds are resolved the way `document.elementFromPoint` does: the
//! deepest element whose box contains the point, later siblings painting over
//! earlier ones.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use super::error::{ExtractionError, ExtractionResult};
use super::tree_accessor::TreeAccessor;
use crate::domain::{DomNode, DomTree, DomTreeBuilder, NodeId};
use crate::inference::PolicyKind;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Left/top edges inclusive, right/bottom exclusive
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotNode {
    pub tag: String,
    pub parent: Option<usize>,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    /// `textContent`
    #[serde(default)]
    pub text: String,
    /// `outerHTML`; synthesized from tag, attributes and text when missing
    #[serde(default)]
    pub outer_html: String,
    /// Absent for elements without a layout box (`display: none`, `<head>`, ...)
    #[serde(default)]
    pub rect: Option<Rect>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageSnapshot {
    #[serde(default)]
    pub url: Option<String>,
    /// `window.devicePixelRatio`
    #[serde(default)]
    pub device_pixel_ratio: Option<f64>,
    pub nodes: Vec<SnapshotNode>,
}

#[derive(Debug, Clone)]
pub struct RenderedPage {
    url: Option<String>,
    device_pixel_ratio: f64,
    tree: DomTree,
    rects: Vec<Option<Rect>>,
}

impl RenderedPage {
    pub fn from_json(json: &str) -> ExtractionResult<Self> {
        let snapshot: PageSnapshot = serde_json::from_str(json)?;
        Self::from_snapshot(snapshot)
    }

    pub fn from_snapshot(snapshot: PageSnapshot) -> ExtractionResult<Self> {
        let device_pixel_ratio = snapshot.device_pixel_ratio.unwrap_or(1.0);
        if !device_pixel_ratio.is_finite() || device_pixel_ratio <= 0.0 {
            return Err(ExtractionError::invalid_input(format!(
                "snapshot device pixel ratio must be positive, got {device_pixel_ratio}"
            )));
        }

        let mut builder = DomTreeBuilder::new();
        let mut rects = Vec::with_capacity(snapshot.nodes.len());

        for (index, node) in snapshot.nodes.into_iter().enumerate() {
            if node.parent.is_some_and(|parent| parent >= index) {
                return Err(ExtractionError::invalid_input(format!(
                    "snapshot node {index} refers to parent {:?}, which does not precede it",
                    node.parent
                )));
            }
            if let Some(rect) = node.rect {
                if ![rect.x, rect.y, rect.width, rect.height].iter().all(|v| v.is_finite()) {
                    return Err(ExtractionError::invalid_input(format!(
                        "snapshot node {index} has a non-finite layout box"
                    )));
                }
            }

            let markup = if node.outer_html.is_empty() {
                synthesize_markup(&node)
            } else {
                node.outer_html
            };
            let element = DomNode::element(&node.tag, node.attributes)
                .with_text(node.text)
                .with_markup(markup);

            builder.push(node.parent.map(NodeId), element)?;
            rects.push(node.rect);
        }

        let tree = builder.build();
        debug!("Loaded rendered snapshot with {} elements", tree.len());

        Ok(Self {
            url: snapshot.url,
            device_pixel_ratio,
            tree,
            rects,
        })
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn device_pixel_ratio(&self) -> f64 {
        self.device_pixel_ratio
    }

    pub fn rect(&self, id: NodeId) -> Option<Rect> {
        self.rects.get(id.index()).copied().flatten()
    }

    /// Last top-level element whose box contains the point; a root without a box
    /// stands for the whole viewport.
    fn hit_root(&self, x: f64, y: f64) -> Option<NodeId> {
        self.tree
            .roots()
            .iter()
            .rev()
            .copied()
            .find(|&root| self.rect(root).is_none_or(|rect| rect.contains(x, y)))
    }
}

impl TreeAccessor for RenderedPage {
    fn tree(&self) -> &DomTree {
        &self.tree
    }

    fn supports_hit_testing(&self) -> bool {
        true
    }

    fn resolve_point(&self, x: f64, y: f64) -> ExtractionResult<Option<NodeId>> {
        let Some(mut hit) = self.hit_root(x, y) else {
            return Ok(None);
        };

        loop {
            let next = self
                .tree
                .children(hit)?
                .iter()
                .rev()
                .copied()
                .find(|&child| self.rect(child).is_some_and(|rect| rect.contains(x, y)));
            match next {
                Some(child) => hit = child,
                None => return Ok(Some(hit)),
            }
        }
    }

    fn default_policy(&self) -> PolicyKind {
        PolicyKind::Similarity
    }
}

fn synthesize_markup(node: &SnapshotNode) -> String {
    let tag = node.tag.to_ascii_lowercase();
    let attrs: String = node
        .attributes
        .iter()
        .map(|(name, value)| format!(" {name}=\"{}\"", escape(value, true)))
        .collect();
    format!("<{tag}{attrs}>{}</{tag}>", escape(&node.text, false))
}

fn escape(text: &str, in_attribute: bool) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if in_attribute => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SeedPoint;

    fn snapshot_json() -> &'static str {
        r#"{
            "url": "https://shop.example/list",
            "nodes": [
                { "tag": "HTML", "parent": null, "rect": { "x": 0, "y": 0, "width": 1000, "height": 1000 } },
                { "tag": "head", "parent": 0 },
                { "tag": "body", "parent": 0, "rect": { "x": 0, "y": 0, "width": 1000, "height": 1000 } },
                { "tag": "div", "parent": 2, "attributes": { "class": "grid" },
                  "rect": { "x": 0, "y": 0, "width": 1000, "height": 500 } },
                { "tag": "div", "parent": 3, "attributes": { "class": "card" }, "text": "A",
                  "rect": { "x": 0, "y": 0, "width": 500, "height": 500 } },
                { "tag": "div", "parent": 3, "attributes": { "class": "card" }, "text": "B",
                  "rect": { "x": 400, "y": 0, "width": 600, "height": 500 } },
                { "tag": "img", "parent": 5, "attributes": { "alt": "a \"b\"" },
                  "rect": { "x": 450, "y": 50, "width": 100, "height": 100 } }
            ]
        }"#
    }

    #[test]
    fn test_from_json_builds_tree() {
        let page = RenderedPage::from_json(snapshot_json()).unwrap();
        assert_eq!(page.url(), Some("https://shop.example/list"));
        assert_eq!(page.device_pixel_ratio(), 1.0);
        assert_eq!(page.tree().len(), 7);
        assert_eq!(page.tree().node(NodeId(0)).unwrap().tag, "html");
        assert_eq!(page.tree().children(NodeId(3)).unwrap(), &[NodeId(4), NodeId(5)]);
        assert!(page.rect(NodeId(1)).is_none());
    }

    #[test]
    fn test_synthesized_markup() {
        let page = RenderedPage::from_json(snapshot_json()).unwrap();
        assert_eq!(
            page.tree().node(NodeId(4)).unwrap().outer_markup,
            r#"<div class="card">A</div>"#
        );
        assert_eq!(
            page.tree().node(NodeId(6)).unwrap().outer_markup,
            r#"<img alt="a &quot;b&quot;"></img>"#
        );
    }

    #[test]
    fn test_hit_testing() {
        let page = RenderedPage::from_json(snapshot_json()).unwrap();

        assert_eq!(page.resolve_point(10.0, 10.0).unwrap(), Some(NodeId(4)));
        // overlap between the cards: the later sibling is on top
        assert_eq!(page.resolve_point(420.0, 10.0).unwrap(), Some(NodeId(5)));
        assert_eq!(page.resolve_point(460.0, 60.0).unwrap(), Some(NodeId(6)));
        // below the grid, still inside body
        assert_eq!(page.resolve_point(10.0, 700.0).unwrap(), Some(NodeId(2)));
        // outside the page
        assert_eq!(page.resolve_point(5_000.0, 10.0).unwrap(), None);
        assert_eq!(
            page.resolve_seed(&SeedPoint::point(10.0, 10.0)).unwrap(),
            Some(NodeId(4))
        );
    }

    #[test]
    fn test_rejects_forward_parent_reference() {
        let json = r#"{ "nodes": [ { "tag": "div", "parent": 1 }, { "tag": "div", "parent": null } ] }"#;
        assert!(matches!(
            RenderedPage::from_json(json),
            Err(ExtractionError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_device_pixel_ratio() {
        let json = r#"{ "device_pixel_ratio": 2.5, "nodes": [ { "tag": "html", "parent": null } ] }"#;
        assert_eq!(RenderedPage::from_json(json).unwrap().device_pixel_ratio(), 2.5);

        let json = r#"{ "device_pixel_ratio": 0, "nodes": [] }"#;
        assert!(matches!(
            RenderedPage::from_json(json),
            Err(ExtractionError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            RenderedPage::from_json("{ \"nodes\": [ }"),
            Err(ExtractionError::Snapshot { .. })
        ));
    }
}
