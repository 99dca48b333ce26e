//! Storage backends for the service layer.

pub mod registry;

pub use registry::Registry;
