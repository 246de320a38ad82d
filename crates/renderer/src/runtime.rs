use std::time::Instant;

use crate::smoothing::LightSmoothing;
use crate::types::BASE_SPEED;

/// Snapshot of the time state supplied to the shader uniforms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeSample {
    /// Elapsed seconds since the loop started.
    pub seconds: f32,
    /// Monotonic frame counter for the running session.
    pub frame_index: u64,
}

/// Abstraction over where time values originate from.
///
/// The windowed host uses [`SystemTimeSource`]; tests pump frames with a
/// deterministic source instead of a real display clock.
pub trait TimeSource: Send {
    /// Resets the source to its initial state.
    fn reset(&mut self);
    /// Produces a time sample for the next frame.
    fn sample(&mut self) -> TimeSample;
}

/// Time source backed by the system monotonic clock.
#[derive(Debug, Clone, Copy)]
pub struct SystemTimeSource {
    origin: Instant,
    frame: u64,
}

impl SystemTimeSource {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Default for SystemTimeSource {
    fn default() -> Self {
        Self {
            origin: Instant::now(),
            frame: 0,
        }
    }
}

impl TimeSource for SystemTimeSource {
    fn reset(&mut self) {
        self.origin = Instant::now();
        self.frame = 0;
    }

    fn sample(&mut self) -> TimeSample {
        let sample = TimeSample {
            seconds: self.origin.elapsed().as_secs_f32(),
            frame_index: self.frame,
        };
        self.frame = self.frame.saturating_add(1);
        sample
    }
}

/// Time source that advances a fixed interval per frame, for deterministic tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedStepTimeSource {
    step: f32,
    frame: u64,
}

impl FixedStepTimeSource {
    pub fn new(step: f32) -> Self {
        Self { step, frame: 0 }
    }
}

impl TimeSource for FixedStepTimeSource {
    fn reset(&mut self) {
        self.frame = 0;
    }

    fn sample(&mut self) -> TimeSample {
        let sample = TimeSample {
            seconds: self.frame as f32 * self.step,
            frame_index: self.frame,
        };
        self.frame = self.frame.saturating_add(1);
        sample
    }
}

/// Convenient alias for owning time sources behind trait objects.
pub type BoxedTimeSource = Box<dyn TimeSource + Send>;

/// Lifecycle of the per-frame loop. `Stopped` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Running,
    Stopped,
}

/// Everything a single frame pushes into the shader uniform set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameUpdate {
    pub seconds: f32,
    pub frame_index: u64,
    pub time_scale: f32,
    pub brightness: f32,
    pub range: f32,
}

/// The per-frame driver: advances the clock, steps the smoothed parameters,
/// and emits the uniform update for the draw.
///
/// The loop owns the smoothing state exclusively; the only external write
/// path is [`SignalBridge::apply`](crate::signal::SignalBridge::apply) via
/// [`lights_mut`](RenderLoop::lights_mut). Scheduling is left to the host;
/// whether [`frame`](RenderLoop::frame) is invoked by a vsync-paced redraw
/// or a manual pump in tests, a frame body only executes while the loop is
/// in the `Running` state, so an invocation that was already scheduled when
/// [`stop`](RenderLoop::stop) ran does nothing.
pub struct RenderLoop {
    state: LoopState,
    clock: BoxedTimeSource,
    lights: LightSmoothing,
}

impl RenderLoop {
    pub fn new(clock: BoxedTimeSource, lights: LightSmoothing) -> Self {
        Self {
            state: LoopState::Idle,
            clock,
            lights,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    /// Idle → Running, restarting the clock. No-op while Running or Stopped.
    pub fn start(&mut self) {
        if self.state == LoopState::Idle {
            self.clock.reset();
            self.state = LoopState::Running;
        }
    }

    /// Running → Stopped. No-op while Idle or already Stopped.
    pub fn stop(&mut self) {
        if self.state == LoopState::Running {
            self.state = LoopState::Stopped;
        }
    }

    /// Mutable access to the smoothing state for the signal bridge.
    pub fn lights_mut(&mut self) -> &mut LightSmoothing {
        &mut self.lights
    }

    /// Runs one frame body, or returns `None` when the loop is not running.
    pub fn frame(&mut self) -> Option<FrameUpdate> {
        if self.state != LoopState::Running {
            return None;
        }
        let sample = self.clock.sample();
        let (brightness, range) = self.lights.step();
        Some(FrameUpdate {
            seconds: sample.seconds,
            frame_index: sample.frame_index,
            time_scale: BASE_SPEED,
            brightness,
            range,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::SignalBridge;
    use crate::types::{BRIGHTNESS_OFF, BRIGHTNESS_ON};

    fn test_loop() -> RenderLoop {
        RenderLoop::new(
            Box::new(FixedStepTimeSource::new(1.0 / 60.0)),
            LightSmoothing::new(false),
        )
    }

    #[test]
    fn frame_is_inert_until_started() {
        let mut render_loop = test_loop();
        assert_eq!(render_loop.state(), LoopState::Idle);
        assert!(render_loop.frame().is_none());
    }

    #[test]
    fn start_is_idempotent_while_running() {
        let mut render_loop = test_loop();
        render_loop.start();
        let first = render_loop.frame().expect("running");
        render_loop.start();
        let second = render_loop.frame().expect("still running");
        // A second start must not reset the frame counter.
        assert_eq!(second.frame_index, first.frame_index + 1);
    }

    #[test]
    fn stop_is_terminal_and_suppresses_pending_frames() {
        let mut render_loop = test_loop();
        render_loop.start();
        assert!(render_loop.frame().is_some());

        render_loop.stop();
        // A frame invocation scheduled before stop() lands here: no body runs.
        assert!(render_loop.frame().is_none());

        render_loop.start();
        assert_eq!(render_loop.state(), LoopState::Stopped);
        assert!(render_loop.frame().is_none());

        render_loop.stop();
        assert_eq!(render_loop.state(), LoopState::Stopped);
    }

    #[test]
    fn frames_advance_time_and_smoothing() {
        let mut render_loop = test_loop();
        render_loop.start();

        let first = render_loop.frame().unwrap();
        assert_eq!(first.seconds, 0.0);
        assert_eq!(first.time_scale, BASE_SPEED);

        let bridge = SignalBridge::new();
        bridge.apply(true, render_loop.lights_mut());

        let next = render_loop.frame().unwrap();
        assert!(next.seconds > first.seconds);
        assert!(next.brightness > BRIGHTNESS_OFF);
        assert!(next.brightness < BRIGHTNESS_ON);
    }
}
