use tracing::trace;

use crate::smoothing::LightSmoothing;
use crate::types::{BRIGHTNESS_OFF, BRIGHTNESS_ON, RANGE_OFF, RANGE_ON};

/// Translates the boolean enhancement signal into smoothing targets.
///
/// The bridge is the only external write path into the smoothing state and it
/// touches targets exclusively; the currents keep easing from wherever they
/// are, which is what keeps rapid toggles from popping.
#[derive(Debug, Clone, Copy)]
pub struct SignalBridge {
    enhanced: (f32, f32),
    baseline: (f32, f32),
}

impl SignalBridge {
    pub fn new() -> Self {
        Self {
            enhanced: (BRIGHTNESS_ON, RANGE_ON),
            baseline: (BRIGHTNESS_OFF, RANGE_OFF),
        }
    }

    /// Applies a signal edge immediately; repeated identical edges are idempotent.
    pub fn apply(&self, enhanced: bool, lights: &mut LightSmoothing) {
        let (brightness, range) = if enhanced {
            self.enhanced
        } else {
            self.baseline
        };
        lights.brightness.set_target(brightness);
        lights.range.set_target(range);
        trace!(enhanced, brightness, range, "retargeted light smoothing");
    }
}

impl Default for SignalBridge {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn high_signal_rewrites_targets_only() {
        let bridge = SignalBridge::new();
        let mut lights = LightSmoothing::new(false);

        bridge.apply(true, &mut lights);
        assert_eq!(lights.brightness.target(), BRIGHTNESS_ON);
        assert_eq!(lights.range.target(), RANGE_ON);
        assert_eq!(lights.brightness.current(), BRIGHTNESS_OFF);
        assert_eq!(lights.range.current(), RANGE_OFF);
    }

    #[test]
    fn low_signal_restores_baseline_targets() {
        let bridge = SignalBridge::new();
        let mut lights = LightSmoothing::new(true);

        bridge.apply(false, &mut lights);
        assert_eq!(lights.brightness.target(), BRIGHTNESS_OFF);
        assert_eq!(lights.range.target(), RANGE_OFF);
    }

    #[test]
    fn mid_flight_toggle_stays_between_baseline_and_enhanced() {
        let bridge = SignalBridge::new();
        let mut lights = LightSmoothing::new(false);

        bridge.apply(true, &mut lights);
        for _ in 0..20 {
            lights.step();
        }
        let partway = lights.brightness.current();
        assert!(partway > BRIGHTNESS_OFF && partway < BRIGHTNESS_ON);

        bridge.apply(false, &mut lights);
        for _ in 0..400 {
            let (brightness, range) = lights.step();
            assert!((BRIGHTNESS_OFF..=BRIGHTNESS_ON).contains(&brightness));
            assert!((RANGE_OFF..=RANGE_ON).contains(&range));
        }
        assert!((lights.brightness.current() - BRIGHTNESS_OFF).abs() < 0.01);
    }
}
