//! The transform engine: selection bookkeeping plus the drag state machine
//!
//! A drag goes `Idle -> Pending -> Dragging -> Idle`. `Pending` means a handle
//! is grabbed but nothing has moved yet; the first changed delta opens the
//! undo step and moves the engine to `Dragging`. A drag that never changes
//! anything leaves no undo entry behind.

use glam::{Mat4, Quat, Vec2, Vec3};
use tracing::{debug, info};
use xform_core::constants::EPSILON;
use xform_core::{
    Axis, BoundingBox, GizmoHandle, KeyBindings, PoseArena, PoseHandle, PoseSnapshot,
    TransformSettings,
};
use xform_gizmo::hit::rect_handle_for_axis;
use xform_gizmo::{Camera, GizmoPose, resolve_handle};

use crate::action::{ActionInput, TransformAction, TransformMode};
use crate::context::EngineContext;
use crate::events::{EngineEvent, EventQueue, EventResult};
use crate::input::{Key, KeyEvent, MouseEvent};
use crate::undo::{TransformInfo, TransformUndo};

/// Where the engine is in a drag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    /// Handle grabbed, no mutation yet
    Pending,
    /// Undo step published, poses follow the mouse
    Dragging,
}

/// Everything a renderer needs to draw the gizmo this frame
#[derive(Debug, Clone, PartialEq)]
pub struct DrawState {
    pub visible: bool,
    pub mode: TransformMode,
    pub origin: Vec3,
    pub rotation: Quat,
    pub scale: f32,
    pub hovered: GizmoHandle,
    pub active: GizmoHandle,
    pub dragging: bool,
    pub bounds: BoundingBox,
    /// Rotate mode angle readout in degrees
    pub rotation_angle: f32,
    pub text: String,
}

#[derive(Debug, Clone, Copy)]
struct Member {
    handle: PoseHandle,
    local_bounds: Option<BoundingBox>,
    /// Pose at the first change of the current drag
    baseline: Option<PoseSnapshot>,
}

/// Drives gizmo drags over the current selection
#[derive(Debug)]
pub struct TransformEngine {
    settings: TransformSettings,
    action: TransformAction,
    members: Vec<Member>,
    bounds: BoundingBox,
    hovered: GizmoHandle,
    state: InteractionState,
    /// Mode to go back to when a shortcut-started drag ends
    restore_mode: Option<TransformMode>,
    text: String,
    last_mouse: Vec2,
    events: EventQueue,
}

impl Default for TransformEngine {
    fn default() -> Self {
        Self::new(TransformSettings::default())
    }
}

impl TransformEngine {
    /// Idle engine with an empty selection
    pub fn new(settings: TransformSettings) -> Self {
        Self {
            settings,
            action: TransformAction::new(TransformMode::default()),
            members: Vec::new(),
            bounds: BoundingBox::fallback(),
            hovered: GizmoHandle::None,
            state: InteractionState::Idle,
            restore_mode: None,
            text: String::new(),
            last_mouse: Vec2::ZERO,
            events: EventQueue::new(),
        }
    }

    pub fn settings(&self) -> &TransformSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut TransformSettings {
        &mut self.settings
    }

    /// Active gizmo mode
    pub fn mode(&self) -> TransformMode {
        self.action.mode()
    }

    pub fn action(&self) -> &TransformAction {
        &self.action
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    /// A handle is grabbed (with or without movement so far)
    pub fn is_active(&self) -> bool {
        self.state != InteractionState::Idle
    }

    /// The drag has changed at least one pose
    pub fn is_dragging(&self) -> bool {
        self.state == InteractionState::Dragging
    }

    /// World box around the selection
    pub fn bounding_box(&self) -> BoundingBox {
        self.bounds
    }

    /// Pivot of the selection
    pub fn origin(&self) -> Vec3 {
        self.settings.origin
    }

    /// Poses currently being transformed
    pub fn members(&self) -> Vec<PoseHandle> {
        self.members.iter().map(|m| m.handle).collect()
    }

    /// Handle under the cursor while idle
    pub fn hovered(&self) -> GizmoHandle {
        self.hovered
    }

    /// Numeric entry typed during the current drag
    pub fn text_input(&self) -> &str {
        &self.text
    }

    /// Take the events queued since the last call
    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        self.events.drain()
    }

    /// Rebuild the member list from the scene selection.
    ///
    /// A drag in progress is cancelled first. Objects in edit mode and stale
    /// handles are skipped.
    pub fn init_action(&mut self, ctx: &mut EngineContext<'_>) {
        if self.is_active() {
            self.cancel(ctx.poses);
        }

        let poses = &*ctx.poses;
        let members: Vec<Member> = ctx
            .scene
            .selected_objects()
            .into_iter()
            .filter(|item| !item.edit_mode && poses.contains(item.pose))
            .map(|item| Member {
                handle: item.pose,
                local_bounds: item.local_bounds,
                baseline: None,
            })
            .collect();

        if members.is_empty() {
            self.clear();
            return;
        }

        self.members = members;
        self.settings.ignore_y = self
            .members
            .iter()
            .filter_map(|m| poses.get(m.handle))
            .any(|pose| pose.ignore_y);
        self.update_origin(poses);
        self.update_bounding_box(poses);
        self.events.push(EngineEvent::TransformListChanged);
        debug!(count = self.members.len(), "transform selection");
    }

    /// Drop one member; returns false if it was not part of the selection
    pub fn remove_transform(&mut self, poses: &PoseArena, handle: PoseHandle) -> bool {
        let before = self.members.len();
        self.members.retain(|m| m.handle != handle);
        if self.members.len() == before {
            return false;
        }

        if self.members.is_empty() {
            self.clear();
        } else {
            self.update_origin(poses);
            self.update_bounding_box(poses);
            self.events.push(EngineEvent::TransformListChanged);
        }
        true
    }

    /// Forget the selection and any drag state
    pub fn clear(&mut self) {
        self.members.clear();
        self.end_drag_state();
        self.hovered = GizmoHandle::None;
        self.settings.origin = Vec3::ZERO;
        self.settings.rotation = Quat::IDENTITY;
        self.settings.ignore_y = false;
        self.bounds = BoundingBox::fallback();
        self.events.push(EngineEvent::TransformListChanged);
    }

    /// Switch the active mode; refused while a handle is grabbed
    pub fn set_mode(&mut self, mode: TransformMode) -> EventResult {
        if self.is_active() {
            return EventResult::Ignored;
        }
        self.switch_mode(mode);
        EventResult::Handled
    }

    fn switch_mode(&mut self, mode: TransformMode) {
        let changed = mode != self.mode();
        self.action = TransformAction::new(mode);
        if changed {
            self.events.push(EngineEvent::ModeChanged(mode));
            debug!(?mode, "transform mode");
        }
    }

    /// Recompute the pivot and gizmo rotation from the members
    pub fn update_origin(&mut self, poses: &PoseArena) {
        let origins: Vec<Vec3> = self
            .members
            .iter()
            .filter_map(|m| poses.get(m.handle))
            .map(|pose| pose.origin())
            .collect();

        let mut origin = if origins.is_empty() {
            Vec3::ZERO
        } else {
            BoundingBox::from_points(origins).center()
        };
        if !self.settings.vertical_pivot {
            origin.y = 0.0;
        }

        self.settings.origin = origin;
        self.settings.rotation = self.gizmo_rotation(poses);
    }

    fn gizmo_rotation(&self, poses: &PoseArena) -> Quat {
        if !self.settings.is_local() {
            return Quat::IDENTITY;
        }
        self.members
            .last()
            .and_then(|m| poses.get(m.handle))
            .map_or(Quat::IDENTITY, |pose| pose.rotation())
    }

    /// World box of the members.
    ///
    /// Member bounds follow scale and position but not rotation. A member
    /// without bounds contributes its origin point.
    pub fn update_bounding_box(&mut self, poses: &PoseArena) {
        let mut bounds = BoundingBox::empty();
        for member in &self.members {
            let Some(pose) = poses.get(member.handle) else {
                continue;
            };
            bounds = match member.local_bounds {
                Some(local) => {
                    let placement = Mat4::from_scale_rotation_translation(
                        pose.scale(),
                        Quat::IDENTITY,
                        pose.position(),
                    );
                    bounds.union(&local.transform(&placement))
                }
                None => bounds.expand_to_include(pose.origin()),
            };
        }

        self.bounds = if !bounds.is_valid() {
            BoundingBox::fallback()
        } else if bounds.size().max_element() < EPSILON {
            BoundingBox::fallback().translated(bounds.center())
        } else {
            bounds
        };
    }

    /// Grab the whole selection in the current mode, as if its center was clicked
    pub fn start_action(&mut self, ctx: &mut EngineContext<'_>, mouse: Vec2) -> EventResult {
        if self.members.is_empty()
            || self.is_active()
            || self.mode() == TransformMode::RectangleScale
        {
            return EventResult::Ignored;
        }
        self.settings.active = GizmoHandle::Axis(Axis::ALL);
        self.begin_drag(ctx, mouse);
        EventResult::Handled
    }

    /// Shortcut drag in `mode`, committed by the next click.
    ///
    /// The current mode comes back when the drag ends. Pressing another
    /// shortcut mid-drag discards the running one.
    pub fn drag_transform_action(
        &mut self,
        ctx: &mut EngineContext<'_>,
        mode: TransformMode,
        mouse: Vec2,
    ) -> EventResult {
        if self.members.is_empty() || mode == TransformMode::RectangleScale {
            return EventResult::Ignored;
        }
        let previous_mode = self.restore_mode.take().unwrap_or(self.mode());
        if self.is_active() {
            self.cancel(ctx.poses);
        }

        self.restore_mode = Some(previous_mode);
        self.switch_mode(mode);
        self.settings.active = if mode == TransformMode::Rotate && ctx.camera.is_2d() {
            GizmoHandle::Axis(Axis::Y)
        } else {
            GizmoHandle::Axis(Axis::ALL)
        };
        self.begin_drag(ctx, mouse);
        EventResult::Handled
    }

    fn begin_drag(&mut self, ctx: &mut EngineContext<'_>, mouse: Vec2) {
        if self.settings.active_axis().is_all() && self.settings.ignore_y && !ctx.camera.is_2d() {
            self.settings.active = GizmoHandle::Axis(Axis::XZ);
        }
        self.settings.collision_detect = self.settings.drop_to_collision
            && self.mode() == TransformMode::Translate
            && self.settings.active_axis().is_all();
        self.settings.text_input = None;
        self.settings.rotation_angle = 0.0;
        self.text.clear();

        self.last_mouse = mouse;
        self.update_origin(ctx.poses);
        self.reset_action(ctx);
        self.state = InteractionState::Pending;
        debug!(mode = ?self.mode(), handle = ?self.settings.active, "drag started");
    }

    fn reset_action(&mut self, ctx: &EngineContext<'_>) {
        let input = ActionInput {
            camera: ctx.camera,
            scene: ctx.scene,
            mouse: self.last_mouse,
            bounds: self.bounds,
        };
        self.action.reset(&input, &self.settings);
    }

    /// Re-constrain the running drag to `axis`, starting over from the baseline
    pub fn update_axis(&mut self, ctx: &mut EngineContext<'_>, axis: Axis) -> EventResult {
        if !self.is_active() {
            return EventResult::Ignored;
        }

        let restored = self.restore_baseline(ctx.poses);
        self.settings.active = if self.mode() == TransformMode::RectangleScale {
            GizmoHandle::Rect(rect_handle_for_axis(axis))
        } else {
            GizmoHandle::Axis(axis)
        };
        self.settings.collision_detect = false;
        self.update_origin(ctx.poses);
        self.update_bounding_box(ctx.poses);
        self.reset_action(ctx);
        if restored {
            self.events.push(EngineEvent::TransformChanged);
        }
        debug!(?axis, "drag axis");

        // Typed value carries over to the new constraint
        if self.settings.text_input.is_some() {
            self.step(ctx);
        }
        EventResult::Handled
    }

    /// Grab the handle under the cursor, or end a shortcut drag
    pub fn on_mouse_down(&mut self, ctx: &mut EngineContext<'_>, event: MouseEvent) -> EventResult {
        self.settings.snap_held = event.ctrl;
        self.last_mouse = event.position;
        if self.members.is_empty() {
            return EventResult::Ignored;
        }

        if self.is_active() {
            // Shortcut drags end with the next click
            if self.restore_mode.is_none() {
                return EventResult::Ignored;
            }
            if event.left {
                return self.finish_drag(ctx.poses);
            }
            if event.right {
                return self.cancel(ctx.poses);
            }
            return EventResult::Ignored;
        }

        if event.middle && self.settings.middle_mouse_scale {
            return self.drag_transform_action(ctx, TransformMode::Scale, event.position);
        }
        if !event.left {
            return EventResult::Ignored;
        }

        let mut handle = if self.settings.display_gizmo {
            self.hit_test(ctx.camera, event.position)
        } else {
            GizmoHandle::None
        };
        if handle.is_none()
            && self.mode() != TransformMode::RectangleScale
            && let Some(picked) = ctx.picker.find_object_at_screen_point(event.position)
            && self.members.iter().any(|m| m.handle == picked)
        {
            handle = GizmoHandle::Axis(Axis::ALL);
        }
        if handle.is_none() {
            return EventResult::Ignored;
        }

        self.settings.active = handle;
        self.hovered = handle;
        self.begin_drag(ctx, event.position);
        EventResult::Handled
    }

    /// Step the drag, or update the hovered handle while idle
    pub fn on_mouse_move(&mut self, ctx: &mut EngineContext<'_>, event: MouseEvent) -> EventResult {
        self.settings.snap_held = event.ctrl;
        self.last_mouse = event.position;
        if self.members.is_empty() {
            return EventResult::Ignored;
        }

        if !self.is_active() {
            self.hovered = if self.settings.display_gizmo {
                self.hit_test(ctx.camera, event.position)
            } else {
                GizmoHandle::None
            };
            return EventResult::Ignored;
        }

        self.step(ctx);
        EventResult::Handled
    }

    /// Release ends the drag; a drag that changed nothing is not committed
    pub fn on_mouse_up(&mut self, ctx: &mut EngineContext<'_>, event: MouseEvent) -> EventResult {
        self.settings.snap_held = event.ctrl;
        if !self.is_active() {
            return EventResult::Ignored;
        }
        self.finish_drag(ctx.poses)
    }

    /// Axis, mode and drag shortcuts plus numeric entry
    pub fn on_key_down(&mut self, ctx: &mut EngineContext<'_>, event: KeyEvent) -> EventResult {
        if self.members.is_empty() {
            return EventResult::Ignored;
        }
        let active = self.is_active();
        match event.key {
            Key::Escape => self.cancel(ctx.poses),
            Key::Enter if active => self.finish_drag(ctx.poses),
            Key::Backspace if active => {
                self.text.pop();
                self.apply_text(ctx)
            }
            Key::Char(c) => self.on_char(ctx, c.to_ascii_lowercase(), event.ctrl),
            _ => EventResult::Ignored,
        }
    }

    fn on_char(&mut self, ctx: &mut EngineContext<'_>, c: char, ctrl: bool) -> EventResult {
        let keys = self.settings.keys.clone();
        if let Some(axis) = axis_for_key(&keys, c, ctrl) {
            return self.update_axis(ctx, axis);
        }
        if !ctrl {
            if !self.is_active()
                && let Some(mode) = mode_for_key(&keys, c)
            {
                return self.set_mode(mode);
            }
            if let Some(mode) = drag_mode_for_key(&keys, c) {
                let mouse = self.last_mouse;
                return self.drag_transform_action(ctx, mode, mouse);
            }
        }
        if self.is_active() && (c.is_ascii_digit() || c == '.' || c == '-') {
            self.text.push(c);
            return self.apply_text(ctx);
        }
        EventResult::Ignored
    }

    fn apply_text(&mut self, ctx: &mut EngineContext<'_>) -> EventResult {
        self.settings.text_input = self.text.parse::<f32>().ok().filter(|v| v.is_finite());
        self.step(ctx);
        EventResult::Handled
    }

    /// Which handle lies under a screen point with the current gizmo pose
    pub fn hit_test(&self, camera: &dyn Camera, point: Vec2) -> GizmoHandle {
        resolve_handle(
            self.mode(),
            camera,
            point,
            &GizmoPose::from_settings(&self.settings),
            &self.bounds,
            &self.settings,
        )
    }

    /// Feed the last mouse position to the action; true when poses moved
    fn step(&mut self, ctx: &mut EngineContext<'_>) -> bool {
        let input = ActionInput {
            camera: ctx.camera,
            scene: ctx.scene,
            mouse: self.last_mouse,
            bounds: self.bounds,
        };
        if !self.action.compute_delta(&input, &self.settings) {
            return false;
        }
        if self.state == InteractionState::Pending {
            self.open_undo(ctx);
            self.state = InteractionState::Dragging;
        }
        self.apply_transform(ctx.poses);
        true
    }

    /// Capture the baseline and publish it as one undo step
    fn open_undo(&mut self, ctx: &mut EngineContext<'_>) {
        let poses = &*ctx.poses;
        self.members.retain(|m| poses.contains(m.handle));

        ctx.undo.begin_collection();
        for member in &self.members {
            self.events.push(EngineEvent::TransformStarted(member.handle));
        }
        let mut infos = Vec::with_capacity(self.members.len());
        for member in &mut self.members {
            if let Some(pose) = poses.get(member.handle) {
                member.baseline = Some(pose.snapshot());
                infos.push(TransformInfo::new(member.handle, pose));
            }
        }
        let count = infos.len();
        ctx.undo.add(Box::new(TransformUndo::new(infos)));
        ctx.undo.end_collection();
        info!(count, mode = ?self.mode(), "transform undo step");
    }

    /// Write baseline + current delta into the member poses
    pub fn apply_transform(&mut self, poses: &mut PoseArena) {
        let (handles, previous): (Vec<PoseHandle>, Vec<PoseSnapshot>) = self
            .members
            .iter()
            .filter_map(|m| m.baseline.map(|baseline| (m.handle, baseline)))
            .unzip();
        if handles.is_empty() {
            return;
        }

        self.action.apply(&previous, &handles, poses);
        if let Some(angle) = self.action.rotation_angle() {
            self.settings.rotation_angle = angle;
        }
        self.update_bounding_box(poses);
        self.events.push(EngineEvent::TransformChanged);
    }

    fn restore_baseline(&mut self, poses: &mut PoseArena) -> bool {
        let mut restored = false;
        for member in &self.members {
            if let Some(baseline) = &member.baseline
                && let Some(pose) = poses.get_mut(member.handle)
            {
                pose.restore(baseline);
                restored = true;
            }
        }
        restored
    }

    fn finish_drag(&mut self, poses: &PoseArena) -> EventResult {
        let committed = self.action.finish();
        self.end_drag(poses);
        if committed {
            for member in &self.members {
                self.events.push(EngineEvent::TransformApplied(member.handle));
            }
            debug!(count = self.members.len(), "transform applied");
        }
        EventResult::from(committed)
    }

    /// Abort the running drag and put every member back where it started.
    ///
    /// An undo step already published for the drag stays on the stack.
    pub fn cancel(&mut self, poses: &mut PoseArena) -> EventResult {
        if !self.is_active() {
            return EventResult::Ignored;
        }
        let restored = self.restore_baseline(poses);
        self.action.finish();
        self.end_drag(poses);
        if restored {
            self.events.push(EngineEvent::TransformChanged);
        }
        debug!("drag cancelled");
        EventResult::Handled
    }

    fn end_drag(&mut self, poses: &PoseArena) {
        self.end_drag_state();
        self.update_origin(poses);
        self.update_bounding_box(poses);
    }

    fn end_drag_state(&mut self) {
        self.state = InteractionState::Idle;
        self.settings.clear_drag_state();
        self.text.clear();
        for member in &mut self.members {
            member.baseline = None;
        }
        if let Some(mode) = self.restore_mode.take() {
            self.switch_mode(mode);
        }
    }

    /// Per-frame update of the bounds, gizmo rotation and camera-relative size
    pub fn prepare_frame(&mut self, poses: &PoseArena, camera: &dyn Camera) {
        if self.members.is_empty() {
            return;
        }
        self.update_bounding_box(poses);
        self.settings.rotation = self.gizmo_rotation(poses);
        self.settings.gizmo_scale = camera
            .scale_at_distance(self.settings.origin, self.settings.gizmo_size)
            .max(self.settings.min_gizmo_size);
    }

    /// Resync after the poses changed outside a drag (undo, redo, deletion)
    pub fn refresh(&mut self, poses: &PoseArena) {
        if self.is_active() {
            return;
        }
        self.members.retain(|m| poses.contains(m.handle));
        if self.members.is_empty() {
            self.clear();
            return;
        }
        self.update_origin(poses);
        self.update_bounding_box(poses);
        self.events.push(EngineEvent::TransformChanged);
    }

    /// Snapshot for the gizmo renderer
    pub fn draw_state(&self) -> DrawState {
        DrawState {
            visible: self.settings.display_gizmo && !self.members.is_empty(),
            mode: self.mode(),
            origin: self.settings.origin,
            rotation: self.settings.rotation,
            scale: self.settings.gizmo_scale,
            hovered: self.hovered,
            active: self.settings.active,
            dragging: self.is_active(),
            bounds: self.bounds,
            rotation_angle: self.settings.rotation_angle,
            text: self.text.clone(),
        }
    }
}

/// Axis keys pick a single axis; with ctrl they pick the plane perpendicular to it
fn axis_for_key(keys: &KeyBindings, c: char, ctrl: bool) -> Option<Axis> {
    let axis = match c {
        c if c == keys.axis_x => Axis::X,
        c if c == keys.axis_y => Axis::Y,
        c if c == keys.axis_z => Axis::Z,
        _ => return None,
    };
    Some(if ctrl { axis.perpendicular_plane() } else { axis })
}

fn mode_for_key(keys: &KeyBindings, c: char) -> Option<TransformMode> {
    match c {
        c if c == keys.translate_gizmo => Some(TransformMode::Translate),
        c if c == keys.rotate_gizmo => Some(TransformMode::Rotate),
        c if c == keys.scale_gizmo => Some(TransformMode::Scale),
        c if c == keys.rectangle_gizmo => Some(TransformMode::RectangleScale),
        _ => None,
    }
}

fn drag_mode_for_key(keys: &KeyBindings, c: char) -> Option<TransformMode> {
    match c {
        c if c == keys.translate => Some(TransformMode::Translate),
        c if c == keys.rotate => Some(TransformMode::Rotate),
        c if c == keys.scale => Some(TransformMode::Scale),
        _ => None,
    }
}
