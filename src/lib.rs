//! Listing Inference - structural list detection over element trees
//!
//! Given a handful of seed points on a page (detector boxes or known
//! elements), finds the container that holds the repeated items and returns
//! the items' markup together with the container's class or id.

// Module declarations
pub mod domain;
pub mod inference;
pub mod application;
pub mod infrastructure;

// Re-export the main entry points for easier access
pub use application::{BatchExtractor, ExtractOptions, ListExtractor, PageJob, detail_seed, seeds_from_detections};
pub use domain::{
    DetailContainer, DetectionBox, DomNode, DomTree, DomTreeBuilder, Extraction, ListResult, NodeId, ScanResult, SeedPoint,
};
pub use inference::{ListItemPolicy, PolicyKind, filter_overlapping, similarity};
pub use infrastructure::{
    AppConfig, ExtractionConfig, ExtractionError, ExtractionResult, RenderedPage, StaticHtmlTree, TreeAccessor,
};
