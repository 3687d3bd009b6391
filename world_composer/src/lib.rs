//! # world_composer - Unified SDF world generation
//!
//! Merges a static world (fixed map geometry) with a dynamic world (actors
//! and plugin-driven models) into a single SDF document. The dynamic
//! entities are placed beside the static map, renamed where their names
//! collide, and the result is written as an indented `.world` file.
//!
//! ## Library Usage
//! ```rust,no_run
//! use world_composer::{compose_files, MergeConfig};
//!
//! let summary = compose_files(
//!     "worlds_static/static_seed_0001.world",
//!     "worlds_dynamic/dynamic_seed_0001.world",
//!     "worlds_unified/unified_seed_0001.world",
//!     &MergeConfig::default(),
//! )
//! .unwrap();
//! println!("appended {} entities", summary.appended);
//! ```

pub mod batch;
pub mod compose;
pub mod config;
pub mod error;
pub mod sdf;

pub use batch::{BatchReport, BatchRunner};
pub use compose::{compose_documents, compose_files, MergeSummary};
pub use config::{ComposerConfig, ErrorPolicy, MergeConfig, ModelPolicy, PlacementConfig};
pub use error::{ComposeError, ComposeResult};
pub use sdf::{Document, Element, WorldLoader};
