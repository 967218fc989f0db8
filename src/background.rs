//! Mounting layer: one active background with its state, GPU pass and
//! frame-loop registration.
//!
//! [`Scene`] holds the CPU side (component plus carried state) and can be
//! ticked without a GPU. [`MountedBackground`] pairs it with the matching
//! render pass and the frame loop that drives it.

use std::fmt;
use std::str::FromStr;

use crate::cluster::{chrome_material, ClusterFrame, ClusterState, OrbitingSphereCluster};
use crate::error::{ConfigError, RenderError};
use crate::frame::{FrameLoop, FrameSource, FrameTime};
use crate::params::{ClusterParams, RenderConfig, SurfaceParams, WaveParams};
use crate::rendering::{BackdropPass, CanvasPass, ClusterPass, RenderSystem, SurfacePass};
use crate::surface::{NoiseSurfaceRenderer, SurfaceFrame, SurfaceState};
use crate::wave::{ColorWaveField, WaveCanvas, WaveFrame, WaveState};

/// Which background to mount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackgroundKind {
    #[default]
    Surface,
    Cluster,
    Wave,
}

impl FromStr for BackgroundKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "surface" => Ok(Self::Surface),
            "cluster" => Ok(Self::Cluster),
            "wave" => Ok(Self::Wave),
            other => Err(ConfigError::UnknownBackground(other.to_string())),
        }
    }
}

impl fmt::Display for BackgroundKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Surface => "surface",
            Self::Cluster => "cluster",
            Self::Wave => "wave",
        };
        f.write_str(name)
    }
}

/// Everything needed to mount any of the backgrounds
#[derive(Debug, Clone, Default)]
pub struct BackgroundConfig {
    pub kind: BackgroundKind,
    pub render: RenderConfig,
    pub surface: SurfaceParams,
    pub cluster: ClusterParams,
    pub wave: WaveParams,
}

/// Output of one scene tick, ready for upload
pub enum SceneFrame {
    Surface(SurfaceFrame),
    Cluster(ClusterFrame),
    Wave(WaveFrame),
}

/// CPU side of a mounted background
pub enum Scene {
    Surface {
        renderer: NoiseSurfaceRenderer,
        state: SurfaceState,
    },
    Cluster {
        cluster: OrbitingSphereCluster,
        state: ClusterState,
    },
    Wave {
        field: ColorWaveField,
        state: WaveState,
        canvas: Option<WaveCanvas>,
    },
}

impl Scene {
    /// Build the selected component for a `width` x `height` viewport
    pub fn new(config: &BackgroundConfig, width: u32, height: u32) -> Result<Self, ConfigError> {
        let aspect = width.max(1) as f32 / height.max(1) as f32;
        let scene = match config.kind {
            BackgroundKind::Surface => {
                let renderer = NoiseSurfaceRenderer::new(config.surface.clone(), &config.render);
                let state = renderer.initial_state(aspect);
                Self::Surface { renderer, state }
            }
            BackgroundKind::Cluster => {
                let cluster = OrbitingSphereCluster::new(config.cluster.clone(), &config.render);
                let state = cluster.initial_state(aspect);
                Self::Cluster { cluster, state }
            }
            BackgroundKind::Wave => {
                config.wave.validate()?;
                let field = ColorWaveField::new(config.wave.clone());
                let state = field.initial_state(width, height);
                let canvas = Some(WaveCanvas::new(state.width, state.height));
                Self::Wave {
                    field,
                    state,
                    canvas,
                }
            }
        };
        Ok(scene)
    }

    pub fn kind(&self) -> BackgroundKind {
        match self {
            Self::Surface { .. } => BackgroundKind::Surface,
            Self::Cluster { .. } => BackgroundKind::Cluster,
            Self::Wave { .. } => BackgroundKind::Wave,
        }
    }

    /// Run one tick and store the new state
    pub fn advance(&mut self, time: FrameTime) -> SceneFrame {
        match self {
            Self::Surface { renderer, state } => {
                let (next, frame) = renderer.tick(*state, time);
                *state = next;
                SceneFrame::Surface(frame)
            }
            Self::Cluster { cluster, state } => {
                let (next, frame) = cluster.tick(std::mem::take(state), time);
                *state = next;
                SceneFrame::Cluster(frame)
            }
            Self::Wave {
                field,
                state,
                canvas,
            } => {
                let (next, frame) = field.tick(*state, canvas.as_mut(), time);
                *state = next;
                SceneFrame::Wave(frame)
            }
        }
    }

    /// Follow a viewport change
    pub fn resize(&mut self, width: u32, height: u32) {
        let aspect = width.max(1) as f32 / height.max(1) as f32;
        match self {
            Self::Surface { state, .. } => state.aspect = aspect,
            Self::Cluster { state, .. } => state.aspect = aspect,
            Self::Wave { field, state, .. } => *state = field.resize(*state, width, height),
        }
    }

    /// The wave canvas, if this scene paints one
    pub fn canvas(&self) -> Option<&WaveCanvas> {
        match self {
            Self::Wave { canvas, .. } => canvas.as_ref(),
            _ => None,
        }
    }

    /// Drop per-mount resources held on the CPU
    pub fn release(&mut self) {
        if let Self::Wave { canvas, .. } = self {
            *canvas = None;
        }
    }
}

enum ScenePass {
    Surface {
        backdrop: BackdropPass,
        surface: SurfacePass,
    },
    Cluster(ClusterPass),
    Wave(CanvasPass),
}

impl ScenePass {
    fn new(scene: &Scene, config: &BackgroundConfig, render: &RenderSystem) -> Self {
        let ctx = &render.ctx;
        let (width, height) = render.size();
        match scene {
            Scene::Surface { renderer, state } => {
                let (_, initial) = renderer.tick(*state, FrameTime::default());
                Self::Surface {
                    backdrop: BackdropPass::new(ctx, &config.render),
                    surface: SurfacePass::new(ctx, &renderer.mesh, &initial.uniforms),
                }
            }
            Scene::Cluster { cluster, .. } => {
                let p = &cluster.params;
                let material = chrome_material(&p.material, p.post.env_map);
                Self::Cluster(ClusterPass::new(
                    ctx,
                    &cluster.sphere,
                    cluster.base_positions().len(),
                    &material,
                    &p.post,
                    (width, height),
                ))
            }
            Scene::Wave { state, .. } => {
                Self::Wave(CanvasPass::new(ctx, state.width, state.height))
            }
        }
    }
}

/// The one background currently on screen
pub struct MountedBackground<S: FrameSource> {
    scene: Scene,
    pass: ScenePass,
    frame_loop: FrameLoop<S>,
}

impl<S: FrameSource> MountedBackground<S> {
    /// Build the component and its GPU pass, and start ticking from `source`
    pub fn mount(
        config: &BackgroundConfig,
        render: &RenderSystem,
        source: S,
    ) -> Result<Self, ConfigError> {
        let (width, height) = render.size();
        let scene = Scene::new(config, width, height)?;
        let pass = ScenePass::new(&scene, config, render);
        log::info!("Mounted {} background at {width}x{height}", scene.kind());

        Ok(Self {
            scene,
            pass,
            frame_loop: FrameLoop::start(source),
        })
    }

    /// Tick the scene and draw it into the next frame
    ///
    /// Returns `Ok(false)` when nothing was presented: the loop was
    /// cancelled or the surface skipped this frame.
    pub fn render_frame(&mut self, render: &mut RenderSystem) -> Result<bool, RenderError> {
        let Some(time) = self.frame_loop.poll() else {
            return Ok(false);
        };
        let output = self.scene.advance(time);

        let Some(frame) = render.begin_frame()? else {
            return Ok(false);
        };

        let ctx = &render.ctx;
        let mut encoder = ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Background Encoder"),
            });

        match (&mut self.pass, &output) {
            (ScenePass::Surface { backdrop, surface }, SceneFrame::Surface(out)) => {
                surface.update(ctx, out);
                backdrop.draw(&mut encoder, &frame.view);
                surface.draw(&mut encoder, &frame.view);
            }
            (ScenePass::Cluster(pass), SceneFrame::Cluster(out)) => {
                pass.update(ctx, out);
                pass.draw(&mut encoder, &frame.view);
            }
            (ScenePass::Wave(pass), SceneFrame::Wave(out)) => {
                if out.drawn {
                    if let Some(canvas) = self.scene.canvas() {
                        pass.upload(ctx, canvas);
                    }
                }
                pass.draw(&mut encoder, &frame.view);
            }
            _ => log::warn!("Scene output does not match its render pass"),
        }

        ctx.queue.submit(std::iter::once(encoder.finish()));
        render.end_frame(frame);
        Ok(true)
    }

    /// Follow a viewport change
    pub fn resize(&mut self, render: &RenderSystem, width: u32, height: u32) {
        self.scene.resize(width, height);
        if let ScenePass::Cluster(pass) = &mut self.pass {
            pass.resize(&render.ctx, width, height);
        }
    }

    /// Stop ticking and release the scene's resources
    pub fn unmount(mut self) {
        self.frame_loop.cancel();
        self.scene.release();
        log::info!("Unmounted {} background", self.scene.kind());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::FixedStepClock;

    fn config(kind: BackgroundKind) -> BackgroundConfig {
        let mut config = BackgroundConfig {
            kind,
            ..Default::default()
        };
        // Keep the CPU paths cheap
        config.surface.subdivisions_x = 8;
        config.surface.subdivisions_z = 8;
        config.wave.wave_width = 6.0;
        config.wave.blur_px = 1.0;
        config
    }

    #[test]
    fn test_parse_background_kind() {
        assert_eq!("surface".parse(), Ok(BackgroundKind::Surface));
        assert_eq!("Cluster".parse(), Ok(BackgroundKind::Cluster));
        assert_eq!("wave".parse(), Ok(BackgroundKind::Wave));
        assert_eq!(
            "ocean".parse::<BackgroundKind>(),
            Err(ConfigError::UnknownBackground("ocean".to_string()))
        );
        assert_eq!(BackgroundKind::Wave.to_string(), "wave");
    }

    #[test]
    fn test_scene_matches_kind() {
        for kind in [BackgroundKind::Surface, BackgroundKind::Cluster, BackgroundKind::Wave] {
            let scene = Scene::new(&config(kind), 32, 16).unwrap();
            assert_eq!(scene.kind(), kind);
        }
    }

    #[test]
    fn test_invalid_wave_config_fails_to_mount() {
        let mut config = config(BackgroundKind::Wave);
        config.wave.colors.clear();
        assert!(matches!(
            Scene::new(&config, 32, 16),
            Err(ConfigError::EmptyPalette)
        ));
    }

    #[test]
    fn test_surface_scene_tracks_elapsed_time() {
        let mut scene = Scene::new(&config(BackgroundKind::Surface), 32, 16).unwrap();
        let mut clock = FixedStepClock::new(0.5);
        for _ in 0..5 {
            scene.advance(clock.next_frame());
        }
        let Scene::Surface { state, .. } = &scene else {
            panic!("expected surface scene");
        };
        // elapsed 2.0s at clock scale 0.25
        assert!((state.u_time - 0.5).abs() < 1e-6);
        assert_eq!(state.aspect, 2.0);
    }

    #[test]
    fn test_cluster_scene_accumulates_tumble() {
        let mut scene = Scene::new(&config(BackgroundKind::Cluster), 32, 32).unwrap();
        let mut clock = FixedStepClock::new(1.0);
        for _ in 0..3 {
            assert!(matches!(
                scene.advance(clock.next_frame()),
                SceneFrame::Cluster(_)
            ));
        }
        let Scene::Cluster { state, cluster } = &scene else {
            panic!("expected cluster scene");
        };
        let expected = 2.0 * cluster.params.tumble_rate;
        assert!((state.orientations[0].x - expected).abs() < 1e-6);
    }

    #[test]
    fn test_wave_resize_keeps_phase() {
        let mut scene = Scene::new(&config(BackgroundKind::Wave), 24, 12).unwrap();
        let mut clock = FixedStepClock::new(1.0 / 60.0);
        scene.advance(clock.next_frame());
        scene.advance(clock.next_frame());
        scene.resize(40, 20);

        let Scene::Wave { state, .. } = &scene else {
            panic!("expected wave scene");
        };
        assert!((state.nt - 0.0008).abs() < 1e-12);
        assert_eq!((state.width, state.height), (40, 20));

        // The canvas follows on the next drawn frame
        scene.advance(clock.next_frame());
        let canvas = scene.canvas().unwrap();
        assert_eq!((canvas.width(), canvas.height()), (40, 20));
    }

    #[test]
    fn test_released_wave_scene_stops_drawing() {
        let mut scene = Scene::new(&config(BackgroundKind::Wave), 16, 16).unwrap();
        let mut clock = FixedStepClock::new(1.0 / 60.0);
        scene.advance(clock.next_frame());
        scene.release();

        assert!(scene.canvas().is_none());
        let SceneFrame::Wave(frame) = scene.advance(clock.next_frame()) else {
            panic!("expected wave frame");
        };
        assert!(!frame.drawn);
        assert!((frame.nt - 0.0004).abs() < 1e-12);
    }
}
