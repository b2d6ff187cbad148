//! Domain module - element trees, detections and extraction outcomes
//!
//! Each module is its own file in the domain/ directory; public exports are
//! defined here for convenience.

pub mod detection;
pub mod dom_tree;
pub mod extraction;

pub use detection::{DetectionBox, SeedPoint};
pub use dom_tree::{DomNode, DomTree, DomTreeBuilder, NodeId};
pub use extraction::{DetailContainer, Extraction, ListResult, ScanResult};
