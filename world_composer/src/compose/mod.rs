//! Static/dynamic world composition
//!
//! Pipeline per pair: extract dynamic content, compute a placement offset,
//! copy and rename into the static world.

pub mod extract;
pub mod merge;
pub mod names;
pub mod placement;

pub use extract::{extract_dynamic, Extraction};
pub use merge::{compose_documents, compose_files, merge_elements, MergeSummary};
pub use names::NameRegistry;
pub use placement::{compute_offset, BoundsUnavailable, Offset};
