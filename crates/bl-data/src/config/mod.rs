//! Dimension mapping configuration

pub mod mapping;
pub mod presets;

pub use mapping::*;
