//! Infrastructure layer: error types, configuration, logging and the tree
//! adapters that turn parsed markup or rendered-page snapshots into element trees.

pub mod config;
pub mod error;
pub mod html_tree;
pub mod logging;
pub mod rendered_page;
pub mod tree_accessor;

pub use config::{AppConfig, BatchConfig, ConfigError, DetectionConfig, ExtractionConfig, LoggingConfig};
pub use error::{ExtractionError, ExtractionResult};
pub use html_tree::StaticHtmlTree;
pub use logging::{init_logging, init_logging_with_config};
pub use rendered_page::{PageSnapshot, Rect, RenderedPage, SnapshotNode};
pub use tree_accessor::TreeAccessor;
