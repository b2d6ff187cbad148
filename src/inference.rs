//! Structural list inference
//!
//! Pure algorithms over a [`crate::domain::DomTree`]: string similarity, class
//! clustering, the list-item predicate, the upward container search, seed
//! voting and detection overlap filtering. Nothing here performs I/O.

pub mod ancestor_search;
pub mod class_grouper;
pub mod list_item;
pub mod overlap;
pub mod seed_voting;
pub mod similarity;

pub use ancestor_search::AncestorSearch;
pub use class_grouper::{group, largest, Cluster};
pub use list_item::{ListItemPolicy, PolicyKind};
pub use overlap::filter_overlapping;
pub use seed_voting::VoteTally;
pub use similarity::{edit_distance, similarity};
