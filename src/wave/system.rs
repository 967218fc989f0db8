//! Per-frame wave update and drawing.

use glam::Vec2;

use super::canvas::{CoverageMask, WaveCanvas};
use crate::frame::FrameTime;
use crate::noise::WaveNoise;
use crate::params::WaveParams;

/// Wave field state carried between ticks
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveState {
    /// Shared phase accumulator, advanced once per drawn frame
    pub nt: f64,
    pub width: u32,
    pub height: u32,
    /// Blur radius the canvas is drawn with (pixels)
    pub blur_px: f32,
}

/// Output of one wave tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveFrame {
    /// False when there was no canvas to draw on
    pub drawn: bool,
    /// Phase the strokes of this frame were sampled at
    pub nt: f64,
}

/// Color wave field background
pub struct ColorWaveField {
    pub params: WaveParams,
    noise: WaveNoise,
}

impl ColorWaveField {
    pub fn new(params: WaveParams) -> Self {
        let noise = WaveNoise::new(params.noise_seed);
        Self { params, noise }
    }

    pub fn initial_state(&self, width: u32, height: u32) -> WaveState {
        WaveState {
            nt: 0.0,
            width: width.max(1),
            height: height.max(1),
            blur_px: self.params.blur_px,
        }
    }

    /// Match a new viewport; the phase carries over
    pub fn resize(&self, state: WaveState, width: u32, height: u32) -> WaveState {
        WaveState {
            width: width.max(1),
            height: height.max(1),
            blur_px: self.params.blur_px,
            ..state
        }
    }

    /// Sample points of stroke `index` at phase `nt`
    pub fn stroke_points(&self, index: usize, nt: f64, width: u32, height: u32) -> Vec<Vec2> {
        let p = &self.params;
        let mid = height as f32 * 0.5;
        (0..width)
            .step_by(p.sample_step_px.max(1))
            .map(|x| {
                let n = self.noise.sample(
                    x as f64 / p.noise_x_period_px,
                    p.stroke_noise_offset * index as f64,
                    nt,
                );
                Vec2::new(x as f32, n * p.amplitude_px + mid)
            })
            .collect()
    }

    /// Draw one frame onto `canvas`
    ///
    /// Without a canvas the frame is skipped and the phase does not move.
    pub fn tick(
        &self,
        state: WaveState,
        canvas: Option<&mut WaveCanvas>,
        _time: FrameTime,
    ) -> (WaveState, WaveFrame) {
        let Some(canvas) = canvas else {
            return (
                state,
                WaveFrame {
                    drawn: false,
                    nt: state.nt,
                },
            );
        };

        if canvas.width() != state.width || canvas.height() != state.height {
            canvas.resize(state.width, state.height);
        }

        let p = &self.params;
        canvas.fill(p.background_fill, p.wave_opacity);

        let nt = state.nt + p.speed.increment();
        for i in 0..p.stroke_count {
            let points = self.stroke_points(i, nt, state.width, state.height);
            // Only the rows the blurred stroke can reach
            let Some(mut mask) = CoverageMask::for_stroke(
                &points,
                state.width,
                state.height,
                p.wave_width,
                state.blur_px,
            ) else {
                continue;
            };
            mask.stroke(&points, p.wave_width);
            mask.blur(state.blur_px);
            canvas.composite(&mask, p.stroke_color(i), p.wave_opacity);
        }

        (WaveState { nt, ..state }, WaveFrame { drawn: true, nt })
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;
    use crate::params::WaveSpeed;

    fn small_field(speed: WaveSpeed) -> ColorWaveField {
        ColorWaveField::new(WaveParams {
            speed,
            wave_width: 6.0,
            blur_px: 1.5,
            amplitude_px: 8.0,
            ..Default::default()
        })
    }

    #[test]
    fn test_slow_speed_reaches_one_after_2500_frames() {
        let field = small_field(WaveSpeed::Slow);
        let mut canvas = WaveCanvas::new(8, 8);
        let mut state = field.initial_state(8, 8);
        for frame in 0..2500 {
            let (next, out) = field.tick(state, Some(&mut canvas), FrameTime::fixed(frame, 0.016));
            assert!(out.drawn);
            state = next;
        }
        assert!((state.nt - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_fast_speed_increment() {
        let field = small_field(WaveSpeed::Fast);
        let mut canvas = WaveCanvas::new(4, 4);
        let state = field.initial_state(4, 4);
        let (state, _) = field.tick(state, Some(&mut canvas), FrameTime::default());
        assert_eq!(state.nt, 0.0006);
    }

    #[test]
    fn test_resize_keeps_phase() {
        let field = small_field(WaveSpeed::Slow);
        let mut canvas = WaveCanvas::new(40, 30);
        let mut state = field.initial_state(40, 30);
        for frame in 0..10 {
            state = field.tick(state, Some(&mut canvas), FrameTime::fixed(frame, 0.016)).0;
        }
        let before = state.nt;

        state = field.resize(state, 64, 20);
        assert_eq!(state.nt, before);

        let (state, out) = field.tick(state, Some(&mut canvas), FrameTime::fixed(10, 0.016));
        assert!((out.nt - before - WaveSpeed::Slow.increment()).abs() < 1e-12);
        assert_eq!((canvas.width(), canvas.height()), (64, 20));
        assert_eq!((state.width, state.height), (64, 20));
    }

    #[test]
    fn test_missing_canvas_is_a_no_op() {
        let field = small_field(WaveSpeed::Slow);
        let state = field.initial_state(16, 16);
        let (after, out) = field.tick(state, None, FrameTime::default());
        assert_eq!(after, state);
        assert!(!out.drawn);
    }

    #[test]
    fn test_stroke_sampling() {
        let field = small_field(WaveSpeed::Slow);
        let points = field.stroke_points(1, 0.25, 23, 40);
        // x = 0, 5, 10, 15, 20
        assert_eq!(points.len(), 5);
        assert_eq!(points[4].x, 20.0);
        for p in &points {
            // Noise is roughly [-1, 1], times an 8 px amplitude around the midline
            assert!((p.y - 20.0).abs() <= 12.0);
        }
    }

    #[test]
    fn test_strokes_paint_the_canvas() {
        let field = small_field(WaveSpeed::Slow);
        let mut canvas = WaveCanvas::new(48, 32);
        let state = field.initial_state(48, 32);
        field.tick(state, Some(&mut canvas), FrameTime::default());

        // Black fill leaves red at 0; only stroke pixels carry red
        let painted = canvas.image().pixels().filter(|p| p[0] > 0).count();
        assert!(painted > 0);
    }

    #[test]
    fn test_default_tick_fits_frame_budget() {
        let field = ColorWaveField::new(WaveParams::default());
        let (width, height) = (1280, 720);
        let mut canvas = WaveCanvas::new(width, height);
        let mut state = field.initial_state(width, height);
        state = field.tick(state, Some(&mut canvas), FrameTime::default()).0;

        let frames = 5;
        let start = Instant::now();
        for frame in 0..frames {
            state = field.tick(state, Some(&mut canvas), FrameTime::fixed(frame, 0.016)).0;
        }
        let per_frame = start.elapsed() / frames as u32;
        assert!(
            per_frame < Duration::from_millis(50),
            "wave tick at {width}x{height} took {per_frame:?} per frame"
        );
    }
}
