//! Graph instance generation and storage.

pub mod generator;
pub mod store;

pub use generator::GraphGenerator;
pub use store::{GraphInstance, GraphInstanceStore};
