//! SDF world documents: owned element tree, loading, poses and serialization

pub mod element;
pub mod loader;
pub mod pose;
pub mod writer;

pub use element::{Document, Element};
pub use loader::WorldLoader;
pub use pose::{Bounds, Pose6};
