//! Engine notifications and handler results

use xform_core::PoseHandle;

use crate::action::TransformMode;

/// Whether an input event was consumed by the transform tools
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    Handled,
    Ignored,
}

impl EventResult {
    pub fn is_handled(self) -> bool {
        self == EventResult::Handled
    }
}

impl From<bool> for EventResult {
    fn from(handled: bool) -> Self {
        if handled {
            EventResult::Handled
        } else {
            EventResult::Ignored
        }
    }
}

/// Something the host should react to (redraw, refresh panels)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineEvent {
    /// Active transform mode changed
    ModeChanged(TransformMode),
    /// The set of transformed objects changed
    TransformListChanged,
    /// First mutation of a drag is about to be applied to this pose
    TransformStarted(PoseHandle),
    /// Poses were updated for this frame
    TransformChanged,
    /// A drag that changed this pose was committed
    TransformApplied(PoseHandle),
}

/// FIFO of engine events, drained by the host once per frame
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    events: Vec<EngineEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: EngineEvent) {
        self.events.push(event);
    }

    pub fn drain(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }
}
