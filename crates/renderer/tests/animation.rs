//! Frame-by-frame animation behaviour, pumped manually without a display.

use renderer::runtime::{FixedStepTimeSource, LoopState, RenderLoop};
use renderer::types::{BRIGHTNESS_OFF, BRIGHTNESS_ON, RANGE_OFF, RANGE_ON, SMOOTHING_RATE};
use renderer::{LightSmoothing, SignalBridge};

fn pumped_loop(enhanced: bool) -> RenderLoop {
    let mut render_loop = RenderLoop::new(
        Box::new(FixedStepTimeSource::new(1.0 / 60.0)),
        LightSmoothing::new(enhanced),
    );
    render_loop.start();
    render_loop
}

#[test]
fn steady_baseline_stays_at_baseline() {
    let mut render_loop = pumped_loop(false);
    let mut last = None;
    for _ in 0..120 {
        last = render_loop.frame();
    }
    let update = last.expect("loop is running");
    assert!((update.brightness - BRIGHTNESS_OFF).abs() < f32::EPSILON);
    assert!((update.range - RANGE_OFF).abs() < f32::EPSILON);
    assert!(update.seconds > 0.0);
}

#[test]
fn enhanced_signal_converges_within_expected_frames() {
    let mut render_loop = pumped_loop(false);
    for _ in 0..60 {
        render_loop.frame();
    }

    SignalBridge::new().apply(true, render_loop.lights_mut());

    // Frames needed to close 99% of the gap at the configured rate.
    let frames = (0.01_f32.ln() / (1.0 - SMOOTHING_RATE).ln()).ceil() as usize;
    let mut update = None;
    for _ in 0..frames {
        update = render_loop.frame();
    }
    let update = update.expect("loop is running");

    let gap = BRIGHTNESS_ON - BRIGHTNESS_OFF;
    assert!((BRIGHTNESS_ON - update.brightness).abs() <= gap * 0.01 + 1e-6);
    assert!((RANGE_ON - update.range).abs() <= (RANGE_ON - RANGE_OFF) * 0.01 + 1e-6);
}

#[test]
fn mid_transition_toggle_never_leaves_the_band() {
    let mut render_loop = pumped_loop(false);
    let bridge = SignalBridge::new();

    bridge.apply(true, render_loop.lights_mut());
    for _ in 0..30 {
        render_loop.frame();
    }
    bridge.apply(false, render_loop.lights_mut());

    for _ in 0..600 {
        let update = render_loop.frame().expect("loop is running");
        assert!((BRIGHTNESS_OFF..=BRIGHTNESS_ON).contains(&update.brightness));
        assert!((RANGE_OFF..=RANGE_ON).contains(&update.range));
    }
}

#[test]
fn stop_halts_frame_production_permanently() {
    let mut render_loop = pumped_loop(false);
    assert!(render_loop.frame().is_some());

    render_loop.stop();
    assert_eq!(render_loop.state(), LoopState::Stopped);
    assert!(render_loop.frame().is_none());

    // Restart attempts on a stopped loop stay inert.
    render_loop.start();
    assert!(render_loop.frame().is_none());
}

#[test]
fn time_advances_monotonically_across_frames() {
    let mut render_loop = pumped_loop(true);
    let mut previous = -1.0;
    for _ in 0..100 {
        let update = render_loop.frame().expect("loop is running");
        assert!(update.seconds > previous);
        previous = update.seconds;
    }
}
