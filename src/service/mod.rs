//! Service layer: background producers that drive the hub.

pub mod load_generator;

pub use load_generator::LoadGenerator;
