//! Core functionality for the brushing and linking engine
//!
//! This crate provides the shared selection state, the filter descriptors
//! produced by user gestures and the dispatch contract every linked view
//! implements.

pub mod coordinator;
pub mod dispatch;
pub mod events;
pub mod filter;
pub mod record;
pub mod value;
pub mod view;

// Re-export commonly used types
pub use coordinator::{Selection, SelectionCoordinator};
pub use dispatch::{DispatchReport, Dispatcher};
pub use events::{Interaction, InteractionQueue, InteractionSink, Modifiers};
pub use filter::{ActiveFilterSet, FilterDescriptor, PathStep};
pub use record::Record;
pub use view::{ViewAdapter, ViewId};
