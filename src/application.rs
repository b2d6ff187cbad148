//! Application layer module
//!
//! Use cases that orchestrate the inference algorithms over a tree accessor:
//! seeded list extraction, detection seeding and batch runs.

pub mod batch;
pub mod detection_seeds;
pub mod list_extractor;

pub use batch::{BatchExtractor, PageJob};
pub use detection_seeds::{detail_seed, seeds_from_detections};
pub use list_extractor::{ExtractOptions, ListExtractor};
