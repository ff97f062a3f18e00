//! `Kravinka` - nearby points of interest as a GPX waypoint file
//!
//! Downloads a JSON listing of points of interest, keeps the ones close to
//! configured reference locations, ranks them by distance and writes them
//! as GPX 1.1 waypoints.

pub mod config;
pub mod dataset;
pub mod error;
pub mod geo;
pub mod gpx;
pub mod logging;
pub mod models;
pub mod pipeline;
pub mod ranking;

// Re-export core types for public API
pub use config::KravinkaConfig;
pub use dataset::{DatasetSource, HttpDataset, StaticDataset};
pub use error::KravinkaError;
pub use models::{Coordinates, PoiItem, PoiLink, ReferencePoint};
pub use pipeline::{RunSummary, run};
pub use ranking::{PoiRanker, RankedList, RankingStats};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, KravinkaError>;
