//! Scripted transform session over two boxes, ending with undo and redo.
//!
//! Usage: `xform-demo [settings.ron]`. Set `RUST_LOG` to change verbosity.

mod scene;

use glam::{Vec2, Vec3};
use xform_core::{Pose, PoseArena, PoseHandle, SettingsError, TransformSettings};
use xform_engine::{
    EngineContext, EventResult, Key, KeyEvent, MouseButton, MouseEvent, TransformEngine,
    UndoHistory,
};
use xform_gizmo::{Camera, OrbitCamera};

use scene::{DemoScene, NearestPicker};

const VIEWPORT: Vec2 = Vec2::new(1280.0, 720.0);

struct Session {
    poses: PoseArena,
    camera: OrbitCamera,
    picker: NearestPicker,
    scene: DemoScene,
    history: UndoHistory,
    engine: TransformEngine,
}

impl Session {
    fn new(settings: TransformSettings) -> Self {
        Self {
            poses: PoseArena::new(),
            camera: OrbitCamera::looking_at(Vec3::new(0.0, 6.0, 12.0), Vec3::ZERO, VIEWPORT),
            picker: NearestPicker::new(24.0),
            scene: DemoScene::default(),
            history: UndoHistory::new(),
            engine: TransformEngine::new(settings),
        }
    }

    fn run<R>(&mut self, f: impl FnOnce(&mut TransformEngine, &mut EngineContext<'_>) -> R) -> R {
        let mut ctx = EngineContext::new(
            &mut self.poses,
            &self.camera,
            &self.picker,
            &self.scene,
            &mut self.history,
        );
        f(&mut self.engine, &mut ctx)
    }

    fn frame(&mut self) {
        self.picker.rebuild(&self.poses, &self.camera);
        self.engine.prepare_frame(&self.poses, &self.camera);
        for event in self.engine.drain_events() {
            tracing::debug!(?event, "engine event");
        }
    }

    fn type_keys(&mut self, text: &str) {
        for c in text.chars() {
            self.run(|engine, ctx| engine.on_key_down(ctx, KeyEvent::char(c)));
        }
        self.frame();
    }

    fn press(&mut self, key: Key) -> EventResult {
        let result = self.run(|engine, ctx| engine.on_key_down(ctx, KeyEvent::new(key)));
        self.frame();
        result
    }

    /// Left-drag between two world points
    fn drag(&mut self, from: Vec3, to: Vec3) -> EventResult {
        let (Some(from), Some(to)) = (
            self.camera.world_to_screen(from),
            self.camera.world_to_screen(to),
        ) else {
            return EventResult::Ignored;
        };
        let down = self.run(|engine, ctx| {
            engine.on_mouse_down(ctx, MouseEvent::pressed(from, MouseButton::Left))
        });
        if !down.is_handled() {
            return down;
        }
        for step in 1..=8 {
            let point = from.lerp(to, step as f32 / 8.0);
            self.run(|engine, ctx| engine.on_mouse_move(ctx, MouseEvent::at(point)));
            self.frame();
        }
        let result = self.run(|engine, ctx| engine.on_mouse_up(ctx, MouseEvent::at(to)));
        self.frame();
        result
    }

    fn report(&self, label: &str, handles: &[PoseHandle]) {
        for handle in handles {
            if let Some(pose) = self.poses.get(*handle) {
                tracing::info!(
                    label,
                    ?handle,
                    position = ?pose.position(),
                    scale = ?pose.scale(),
                    "pose"
                );
            }
        }
    }
}

fn main() -> Result<(), SettingsError> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "xform_demo=info,xform_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = match std::env::args().nth(1) {
        Some(path) => TransformSettings::load(path)?,
        None => TransformSettings::default(),
    };
    let mut session = Session::new(settings);

    let boxes = [
        session.scene.add_box(&mut session.poses, Pose::from_position(Vec3::new(-3.0, 0.0, 0.0))),
        session.scene.add_box(&mut session.poses, Pose::from_position(Vec3::new(3.0, 0.0, 0.0))),
    ];
    session.run(|engine, ctx| engine.init_action(ctx));
    session.frame();
    tracing::info!(origin = ?session.engine.origin(), "selection ready");

    session.type_keys("gz2");
    session.press(Key::Enter);
    session.report("moved 2 along z", &boxes);

    session.type_keys("sx1.5");
    session.press(Key::Enter);
    session.report("scaled 1.5 along x", &boxes);

    let origin = session.engine.origin();
    let arm = origin + Vec3::Y * session.engine.draw_state().scale * 2.0;
    let result = session.drag(arm, arm + Vec3::Y);
    tracing::info!(handled = result.is_handled(), "dragged y arm");
    session.report("after mouse drag", &boxes);

    while session.history.undo(&mut session.poses) {
        session.engine.refresh(&session.poses);
    }
    session.frame();
    session.report("undone", &boxes);

    session.history.redo(&mut session.poses);
    session.engine.refresh(&session.poses);
    session.frame();
    session.report("redone once", &boxes);

    Ok(())
}
