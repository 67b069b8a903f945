//! Interactive transform engine
//!
//! Drives translate / rotate / scale / rectangle-scale drags over a selection
//! of poses:
//! - [`TransformEngine`] - interaction state machine and pivot/bounds bookkeeping
//! - [`TransformAction`] - per-mode constrained delta math
//! - [`UndoHistory`] / [`TransformUndo`] - one undo step per drag
//! - [`EngineContext`] - collaborators passed into every call

pub mod action;
pub mod context;
pub mod engine;
pub mod events;
pub mod input;
pub mod undo;

#[cfg(test)]
pub(crate) mod testing;

pub use action::{TransformAction, TransformMode};
pub use context::{EngineContext, Picker, SceneQuery, SelectionItem, UndoStack};
pub use engine::{DrawState, InteractionState, TransformEngine};
pub use events::{EngineEvent, EventQueue, EventResult};
pub use input::{Key, KeyEvent, MouseButton, MouseEvent};
pub use undo::{Revertable, TransformInfo, TransformUndo, UndoHistory};
