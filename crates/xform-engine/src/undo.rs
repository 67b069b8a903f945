//! Undo capture for transform drags
//!
//! A drag publishes one [`TransformUndo`] holding the pre-drag pose of every
//! transformed object. Reverting swaps the stored and current poses and hands
//! back the inverse command for redo.

use std::fmt;

use xform_core::{Pose, PoseArena, PoseHandle, PoseSnapshot};

use crate::context::UndoStack;

/// A reversible edit
pub trait Revertable: fmt::Debug {
    /// Undo the edit, returning the command that redoes it
    fn revert(&self, poses: &mut PoseArena) -> Box<dyn Revertable>;

    fn description(&self) -> &str {
        "Edit"
    }
}

/// Pose of one object before an edit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformInfo {
    pub handle: PoseHandle,
    pub previous: PoseSnapshot,
}

impl TransformInfo {
    pub fn new(handle: PoseHandle, pose: &Pose) -> Self {
        Self {
            handle,
            previous: pose.snapshot(),
        }
    }
}

/// Restores the captured poses
#[derive(Debug, Clone, PartialEq)]
pub struct TransformUndo {
    infos: Vec<TransformInfo>,
}

impl TransformUndo {
    pub fn new(infos: Vec<TransformInfo>) -> Self {
        Self { infos }
    }

    pub fn infos(&self) -> &[TransformInfo] {
        &self.infos
    }
}

impl Revertable for TransformUndo {
    fn revert(&self, poses: &mut PoseArena) -> Box<dyn Revertable> {
        let mut inverse = Vec::with_capacity(self.infos.len());
        for info in &self.infos {
            let Some(pose) = poses.get_mut(info.handle) else {
                tracing::warn!(handle = ?info.handle, "skipping removed pose during revert");
                continue;
            };
            inverse.push(TransformInfo::new(info.handle, pose));
            pose.restore(&info.previous);
        }
        Box::new(TransformUndo::new(inverse))
    }

    fn description(&self) -> &str {
        "Transform"
    }
}

/// Commands recorded inside one collection, undone as a unit
#[derive(Debug)]
struct CommandGroup {
    commands: Vec<Box<dyn Revertable>>,
}

impl Revertable for CommandGroup {
    fn revert(&self, poses: &mut PoseArena) -> Box<dyn Revertable> {
        let mut inverse: Vec<_> = self
            .commands
            .iter()
            .rev()
            .map(|command| command.revert(poses))
            .collect();
        inverse.reverse();
        Box::new(CommandGroup { commands: inverse })
    }

    fn description(&self) -> &str {
        self.commands.first().map_or("Edit", |c| c.description())
    }
}

/// Undo/redo history with batched collections
#[derive(Debug)]
pub struct UndoHistory {
    undo_stack: Vec<Box<dyn Revertable>>,
    redo_stack: Vec<Box<dyn Revertable>>,
    max_size: usize,
    /// Commands of the open collection
    collection: Vec<Box<dyn Revertable>>,
    /// Nesting depth of begin/end collection calls
    depth: usize,
}

impl Default for UndoHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl UndoHistory {
    pub const DEFAULT_MAX_SIZE: usize = 100;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_MAX_SIZE)
    }

    pub fn with_capacity(max_size: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_size: max_size.max(1),
            collection: Vec::new(),
            depth: 0,
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack.last().map(|c| c.description())
    }

    pub fn in_collection(&self) -> bool {
        self.depth > 0
    }

    /// Revert the latest step. Returns false when there is nothing to undo.
    pub fn undo(&mut self, poses: &mut PoseArena) -> bool {
        let Some(command) = self.undo_stack.pop() else {
            return false;
        };
        let inverse = command.revert(poses);
        tracing::debug!(description = command.description(), "undo");
        self.redo_stack.push(inverse);
        true
    }

    /// Reapply the latest undone step. Returns false when there is nothing to redo.
    pub fn redo(&mut self, poses: &mut PoseArena) -> bool {
        let Some(command) = self.redo_stack.pop() else {
            return false;
        };
        let inverse = command.revert(poses);
        tracing::debug!(description = command.description(), "redo");
        self.undo_stack.push(inverse);
        true
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.collection.clear();
        self.depth = 0;
    }

    fn push_command(&mut self, command: Box<dyn Revertable>) {
        self.undo_stack.push(command);
        self.redo_stack.clear();

        while self.undo_stack.len() > self.max_size {
            self.undo_stack.remove(0);
        }
    }
}

impl UndoStack for UndoHistory {
    fn begin_collection(&mut self) {
        self.depth += 1;
    }

    fn add(&mut self, command: Box<dyn Revertable>) {
        if self.depth > 0 {
            self.collection.push(command);
        } else {
            self.push_command(command);
        }
    }

    fn end_collection(&mut self) {
        if self.depth == 0 {
            tracing::warn!("end_collection without matching begin_collection");
            return;
        }
        self.depth -= 1;
        if self.depth > 0 || self.collection.is_empty() {
            return;
        }
        let mut commands = std::mem::take(&mut self.collection);
        let command = if commands.len() == 1 {
            commands.remove(0)
        } else {
            Box::new(CommandGroup { commands })
        };
        self.push_command(command);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Quat, Vec3};

    fn moved_arena() -> (PoseArena, PoseHandle, TransformUndo) {
        let mut poses = PoseArena::new();
        let handle = poses.insert(Pose::from_position(Vec3::X));
        let undo = TransformUndo::new(vec![TransformInfo::new(handle, poses.get(handle).unwrap())]);
        let pose = poses.get_mut(handle).unwrap();
        pose.set_position(Vec3::new(4.0, 0.0, 0.0));
        pose.set_rotation(Quat::from_rotation_y(1.0));
        (poses, handle, undo)
    }

    #[test]
    fn test_revert_then_redo_restores_poses() {
        let (mut poses, handle, undo) = moved_arena();
        let after = poses.get(handle).unwrap().snapshot();

        let redo = undo.revert(&mut poses);
        assert_eq!(poses.get(handle).unwrap().position(), Vec3::X);
        assert_eq!(poses.get(handle).unwrap().rotation(), Quat::IDENTITY);

        let _ = redo.revert(&mut poses);
        assert_eq!(poses.get(handle).unwrap().snapshot(), after);
    }

    #[test]
    fn test_revert_skips_removed_pose() {
        let (mut poses, handle, undo) = moved_arena();
        poses.remove(handle);
        let redo = undo.revert(&mut poses);
        assert!(poses.is_empty());
        let _ = redo.revert(&mut poses);
    }

    #[test]
    fn test_collection_is_one_step() {
        let mut poses = PoseArena::new();
        let a = poses.insert(Pose::default());
        let b = poses.insert(Pose::default());
        let mut history = UndoHistory::new();

        history.begin_collection();
        for handle in [a, b] {
            let info = TransformInfo::new(handle, poses.get(handle).unwrap());
            history.add(Box::new(TransformUndo::new(vec![info])));
        }
        history.end_collection();
        assert_eq!(history.undo_count(), 1);

        poses.get_mut(a).unwrap().set_position(Vec3::Y);
        poses.get_mut(b).unwrap().set_position(Vec3::Z);
        assert!(history.undo(&mut poses));
        assert_eq!(poses.get(a).unwrap().position(), Vec3::ZERO);
        assert_eq!(poses.get(b).unwrap().position(), Vec3::ZERO);

        assert!(history.redo(&mut poses));
        assert_eq!(poses.get(a).unwrap().position(), Vec3::Y);
        assert_eq!(poses.get(b).unwrap().position(), Vec3::Z);
    }

    #[test]
    fn test_nested_collection_commits_at_outer_end() {
        let mut history = UndoHistory::new();
        history.begin_collection();
        history.begin_collection();
        history.add(Box::new(TransformUndo::new(Vec::new())));
        history.end_collection();
        assert_eq!(history.undo_count(), 0);
        history.end_collection();
        assert_eq!(history.undo_count(), 1);
        assert!(!history.in_collection());
    }

    #[test]
    fn test_empty_collection_adds_nothing() {
        let mut history = UndoHistory::new();
        history.begin_collection();
        history.end_collection();
        history.end_collection();
        assert!(!history.can_undo());
    }

    #[test]
    fn test_new_command_clears_redo_and_trims() {
        let mut poses = PoseArena::new();
        let mut history = UndoHistory::with_capacity(2);
        for _ in 0..3 {
            history.add(Box::new(TransformUndo::new(Vec::new())));
        }
        assert_eq!(history.undo_count(), 2);

        assert!(history.undo(&mut poses));
        assert!(history.can_redo());
        history.add(Box::new(TransformUndo::new(Vec::new())));
        assert!(!history.can_redo());
        assert_eq!(history.undo_description(), Some("Transform"));
    }
}
