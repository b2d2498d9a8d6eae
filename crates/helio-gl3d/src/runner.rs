use glam::DQuat;
use crate::api::config::ViewerConfig;
use crate::api::types::{RegionSink, RenderContext, ViewMode};
use crate::core::scene::{DrawItem, SceneGraph};
use crate::core::time::FrameClock;
use crate::error::ConfigError;
use crate::extensions::animation::CameraAnimation;
use crate::input::interaction::Interactions;
use crate::input::queue::{InputEvent, InputQueue};
use crate::renderer::camera::{Camera, CameraUniform};

/// What the renderer needs from one frame.
#[derive(Debug, Clone)]
pub struct FrameOutput {
    pub uniform: CameraUniform,
    pub draw_list: Vec<DrawItem>,
    /// A camera animation advanced this frame; keep requesting frames.
    pub animating: bool,
    /// Regions handed to the sink this frame.
    pub regions_pushed: usize,
}

/// Drives the camera core once per frame.
///
/// Owns one camera per view mode, the scene graph, the input queue and the
/// pointer interactions. `tick` is the single per-frame entry point and must
/// not be called concurrently with structural changes to the scene graph.
pub struct ViewerRunner {
    config: ViewerConfig,
    camera_2d: Camera,
    camera_3d: Camera,
    mode: ViewMode,
    scene: SceneGraph,
    interactions: Interactions,
    input: InputQueue,
    clock: FrameClock,
}

impl ViewerRunner {
    pub fn new(config: ViewerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mode = ViewMode::default();
        let mut runner = Self {
            camera_2d: Camera::new(ViewMode::Mode2D, &config.camera),
            camera_3d: Camera::new(ViewMode::Mode3D, &config.camera),
            mode,
            scene: SceneGraph::new(),
            interactions: Interactions::new(&config.interaction, &config.animation),
            input: InputQueue::new(),
            clock: FrameClock::default(),
            config,
        };
        runner.camera_mut().activate(None);
        Ok(runner)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Self::new(ViewerConfig::from_json(json)?)
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// Queue an input event for the next tick.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    /// Switch cameras. The new camera takes over the old one's pose, viewport
    /// and interaction; the old one drops its animations.
    pub fn set_view_mode(&mut self, mode: ViewMode) {
        if mode == self.mode {
            return;
        }
        let (old, new) = match mode {
            ViewMode::Mode2D => (&mut self.camera_3d, &mut self.camera_2d),
            ViewMode::Mode3D => (&mut self.camera_2d, &mut self.camera_3d),
        };
        self.interactions.cancel(old);
        old.deactivate();
        new.activate(Some(&*old));
        self.mode = mode;
        log::debug!("switched to {}", new.name());
    }

    /// The active camera.
    pub fn camera(&self) -> &Camera {
        self.camera_for(self.mode)
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        match self.mode {
            ViewMode::Mode2D => &mut self.camera_2d,
            ViewMode::Mode3D => &mut self.camera_3d,
        }
    }

    pub fn camera_for(&self, mode: ViewMode) -> &Camera {
        match mode {
            ViewMode::Mode2D => &self.camera_2d,
            ViewMode::Mode3D => &self.camera_3d,
        }
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut SceneGraph {
        &mut self.scene
    }

    /// Animate the active camera to `rotation`, over the configured default
    /// duration unless one is given.
    pub fn rotate_to(&mut self, rotation: DQuat, duration_ms: Option<f64>) {
        let duration = duration_ms.unwrap_or(self.config.animation.default_duration_ms);
        let easing = self.config.animation.easing;
        self.camera_mut()
            .queue_animation(CameraAnimation::rotation(rotation, duration).with_easing(easing));
    }

    /// Run one frame: read the viewport, initialize new layers, route input,
    /// advance animations, refresh layer regions, then collect the frame.
    pub fn tick(&mut self, dt_ms: f64, ctx: &impl RenderContext, sink: &mut dyn RegionSink) -> FrameOutput {
        let camera = match self.mode {
            ViewMode::Mode2D => &mut self.camera_2d,
            ViewMode::Mode3D => &mut self.camera_3d,
        };

        camera.apply_perspective(ctx);
        self.scene.init_layers(camera);

        for event in self.input.drain() {
            self.interactions.handle(&event, camera);
        }

        let animating = camera.apply_animations(dt_ms);
        let regions_pushed = self.scene.update(camera, &self.config.roi, sink);

        FrameOutput {
            uniform: camera.uniform(),
            draw_list: self.scene.draw_list(),
            animating,
            regions_pushed,
        }
    }

    /// `tick` with the delta taken from the wall clock.
    pub fn tick_now(&mut self, ctx: &impl RenderContext, sink: &mut dyn RegionSink) -> FrameOutput {
        let dt_ms = self.clock.tick();
        self.tick(dt_ms, ctx, sink)
    }
}
