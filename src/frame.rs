//! Render tick plumbing: frame timing and the cancellable per-frame loop.
//!
//! Components never read the clock themselves. The host owns a
//! [`FrameClock`], turns each redraw into a [`FrameTime`], and hands it to
//! the mounted background's `tick`.

use std::time::Instant;

/// Timing for one rendered frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameTime {
    /// Seconds since the background was mounted
    pub elapsed_s: f32,
    /// Seconds since the previous frame (0 on the first frame)
    pub dt_s: f32,
    /// Index of this frame, starting at 0
    pub frame: u64,
}

impl FrameTime {
    /// Frame `frame` of a fixed-rate timeline (used for recording and tests)
    pub fn fixed(frame: u64, dt_s: f32) -> Self {
        Self {
            elapsed_s: frame as f32 * dt_s,
            dt_s: if frame == 0 { 0.0 } else { dt_s },
            frame,
        }
    }
}

/// Source of frame times
pub trait FrameSource {
    fn next_frame(&mut self) -> FrameTime;
}

/// Wall-clock frame source
pub struct FrameClock {
    start: Instant,
    last: Option<Instant>,
    frame: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            last: None,
            frame: 0,
        }
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameSource for FrameClock {
    fn next_frame(&mut self) -> FrameTime {
        let now = Instant::now();
        let dt_s = self
            .last
            .map(|last| now.duration_since(last).as_secs_f32())
            .unwrap_or(0.0);
        self.last = Some(now);

        let time = FrameTime {
            elapsed_s: now.duration_since(self.start).as_secs_f32(),
            dt_s,
            frame: self.frame,
        };
        self.frame += 1;
        time
    }
}

/// Deterministic frame source stepping a fixed interval per frame
pub struct FixedStepClock {
    dt_s: f32,
    frame: u64,
}

impl FixedStepClock {
    pub fn new(dt_s: f32) -> Self {
        Self { dt_s, frame: 0 }
    }
}

impl FrameSource for FixedStepClock {
    fn next_frame(&mut self) -> FrameTime {
        let time = FrameTime::fixed(self.frame, self.dt_s);
        self.frame += 1;
        time
    }
}

/// Registration of a recurring per-frame callback
///
/// Once cancelled, `poll` never yields another frame.
pub struct FrameLoop<S: FrameSource> {
    source: S,
    active: bool,
}

impl<S: FrameSource> FrameLoop<S> {
    pub fn start(source: S) -> Self {
        Self {
            source,
            active: true,
        }
    }

    /// Next frame time, or `None` after cancellation
    pub fn poll(&mut self) -> Option<FrameTime> {
        self.active.then(|| self.source.next_frame())
    }

    pub fn cancel(&mut self) {
        self.active = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_step_timeline() {
        let mut clock = FixedStepClock::new(0.5);
        let first = clock.next_frame();
        let second = clock.next_frame();

        assert_eq!(first.elapsed_s, 0.0);
        assert_eq!(first.dt_s, 0.0);
        assert_eq!(second.elapsed_s, 0.5);
        assert_eq!(second.dt_s, 0.5);
        assert_eq!(second.frame, 1);
    }

    #[test]
    fn test_wall_clock_is_monotonic() {
        let mut clock = FrameClock::new();
        let a = clock.next_frame();
        let b = clock.next_frame();
        assert!(b.elapsed_s >= a.elapsed_s);
        assert!(b.dt_s >= 0.0);
        assert_eq!(b.frame, a.frame + 1);
    }

    #[test]
    fn test_cancelled_loop_stops_ticking() {
        let mut frame_loop = FrameLoop::start(FixedStepClock::new(1.0 / 60.0));
        assert!(frame_loop.poll().is_some());

        frame_loop.cancel();
        assert!(frame_loop.poll().is_none());
        assert!(frame_loop.poll().is_none());
    }
}
