use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::filter::FilterDescriptor;
use crate::view::ViewId;

/// Keyboard modifiers held during a gesture
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    /// Cmd on macOS
    pub command: bool,
}

impl Modifiers {
    /// No modifier held: a plain single-select gesture
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        shift: false,
        command: false,
    };

    /// Ctrl held: the multi-select gesture
    pub const CTRL: Modifiers = Modifiers {
        ctrl: true,
        shift: false,
        command: false,
    };

    /// Whether the gesture merges into the current selection
    pub fn is_multi_select(&self) -> bool {
        self.ctrl || self.command
    }
}

/// A selection gesture raised by one view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    pub origin: ViewId,
    pub descriptor: FilterDescriptor,
    pub modifiers: Modifiers,
}

impl Interaction {
    pub fn new(origin: ViewId, descriptor: FilterDescriptor, modifiers: Modifiers) -> Self {
        Self {
            origin,
            descriptor,
            modifiers,
        }
    }
}

/// Trait for receivers of view interactions
///
/// Views hold a sink instead of a reference to the coordinator, so they can
/// report a gesture without touching shared selection state.
pub trait InteractionSink: Send + Sync {
    fn emit(&self, interaction: Interaction);
}

/// FIFO of pending interactions, shared between views and their dashboard
#[derive(Clone, Default)]
pub struct InteractionQueue {
    pending: Arc<Mutex<VecDeque<Interaction>>>,
}

impl InteractionQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the oldest pending interaction
    pub fn pop(&self) -> Option<Interaction> {
        self.pending.lock().pop_front()
    }

    /// Number of interactions waiting to be handled
    pub fn len(&self) -> usize {
        self.pending.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.lock().is_empty()
    }

    /// Drop everything still pending
    pub fn clear(&self) {
        self.pending.lock().clear();
    }

    /// A shareable sink handle feeding this queue
    pub fn sink(&self) -> Arc<dyn InteractionSink> {
        Arc::new(self.clone())
    }
}

impl InteractionSink for InteractionQueue {
    fn emit(&self, interaction: Interaction) {
        tracing::debug!(
            "Queued interaction from {}: {}",
            interaction.origin,
            interaction.descriptor.key()
        );
        self.pending.lock().push_back(interaction);
    }
}
