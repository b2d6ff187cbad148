//! Detection boxes and seed points
//!
//! Boxes come from the external object detector; seeds are what the list
//! extractor starts from.

use serde::{Deserialize, Serialize};

use super::dom_tree::NodeId;

/// Axis-aligned detection with its confidence score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectionBox {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
    pub score: f64,
}

impl DetectionBox {
    pub fn new(xmin: f64, ymin: f64, xmax: f64, ymax: f64, score: f64) -> Self {
        Self {
            xmin,
            ymin,
            xmax,
            ymax,
            score,
        }
    }

    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Reason the box is unusable, if any
    pub fn malformed_reason(&self) -> Option<String> {
        let coords = [self.xmin, self.ymin, self.xmax, self.ymax];
        if coords.iter().any(|c| !c.is_finite()) {
            return Some(format!("non-finite coordinate in {self:?}"));
        }
        if !self.score.is_finite() {
            return Some(format!("non-finite score in {self:?}"));
        }
        if self.xmax < self.xmin || self.ymax < self.ymin {
            return Some(format!("inverted corners in {self:?}"));
        }
        None
    }

    /// Intersection-over-union with another box; 0 when the union is empty.
    pub fn iou(&self, other: &Self) -> f64 {
        let inter_w = (self.xmax.min(other.xmax) - self.xmin.max(other.xmin)).max(0.0);
        let inter_h = (self.ymax.min(other.ymax) - self.ymin.max(other.ymin)).max(0.0);
        let intersection = inter_w * inter_h;
        let union = self.area() + other.area() - intersection;
        if union <= 0.0 {
            0.0
        } else {
            intersection / union
        }
    }
}

/// Starting point for a list search: a page coordinate or an already-resolved element
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SeedPoint {
    Point { x: f64, y: f64 },
    Node { node: NodeId },
}

impl SeedPoint {
    pub fn point(x: f64, y: f64) -> Self {
        Self::Point { x, y }
    }

    pub fn node(node: NodeId) -> Self {
        Self::Node { node }
    }
}

impl From<NodeId> for SeedPoint {
    fn from(node: NodeId) -> Self {
        Self::node(node)
    }
}
