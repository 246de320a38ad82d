use crate::types::{BRIGHTNESS_OFF, BRIGHTNESS_ON, RANGE_OFF, RANGE_ON, SMOOTHING_RATE};

/// First-order low-pass filter over one animated quantity.
///
/// Each [`step`](SmoothedParameter::step) closes `rate` of the remaining gap
/// between the current value and the target, so the value converges
/// monotonically and never overshoots for `rate` in `(0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothedParameter {
    current: f32,
    target: f32,
    rate: f32,
}

impl SmoothedParameter {
    /// Creates a parameter resting at `initial` with the given per-frame rate.
    pub fn new(initial: f32, rate: f32) -> Self {
        debug_assert!(rate > 0.0 && rate <= 1.0, "rate must be in (0, 1]");
        Self {
            current: initial,
            target: initial,
            rate,
        }
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    /// Retargets the filter without touching the current value.
    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Advances one frame and returns the new current value.
    pub fn step(&mut self) -> f32 {
        self.current += (self.target - self.current) * self.rate;
        self.current
    }
}

/// The pair of smoothed light parameters the shader consumes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightSmoothing {
    pub brightness: SmoothedParameter,
    pub range: SmoothedParameter,
}

impl LightSmoothing {
    /// Builds both parameters resting at the values matching the initial signal.
    pub fn new(enhanced: bool) -> Self {
        let (brightness, range) = if enhanced {
            (BRIGHTNESS_ON, RANGE_ON)
        } else {
            (BRIGHTNESS_OFF, RANGE_OFF)
        };
        Self {
            brightness: SmoothedParameter::new(brightness, SMOOTHING_RATE),
            range: SmoothedParameter::new(range, SMOOTHING_RATE),
        }
    }

    /// Steps both parameters once and returns `(brightness, range)`.
    pub fn step(&mut self) -> (f32, f32) {
        (self.brightness.step(), self.range.step())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_closes_fixed_fraction_of_gap() {
        let mut param = SmoothedParameter::new(0.0, 0.25);
        param.set_target(1.0);
        assert!((param.step() - 0.25).abs() < 1e-6);
        assert!((param.step() - 0.4375).abs() < 1e-6);
    }

    #[test]
    fn distance_to_target_decreases_monotonically() {
        for rate in [0.03, 0.3, 0.9] {
            let mut param = SmoothedParameter::new(1.0, rate);
            param.set_target(1.3);
            let mut last_gap = (param.target() - param.current()).abs();
            for _ in 0..200 {
                param.step();
                let gap = (param.target() - param.current()).abs();
                // Strict decrease until the gap reaches float resolution.
                if last_gap > 1e-5 {
                    assert!(gap < last_gap, "gap grew at rate {rate}");
                } else {
                    assert!(gap <= last_gap, "gap grew at rate {rate}");
                }
                assert!(param.current() <= param.target() + 1e-6, "overshoot at rate {rate}");
                last_gap = gap;
            }
        }
    }

    #[test]
    fn rate_one_snaps_immediately() {
        let mut param = SmoothedParameter::new(0.0, 1.0);
        param.set_target(5.0);
        assert!((param.step() - 5.0).abs() < 1e-6);
    }

    #[test]
    fn target_is_a_fixed_point() {
        let mut param = SmoothedParameter::new(1.3, 0.03);
        param.set_target(1.3);
        for _ in 0..10 {
            assert_eq!(param.step(), 1.3);
        }
    }

    #[test]
    fn converges_within_expected_step_count() {
        // ceil(ln 0.01 / ln(1 - 0.03)) frames close 99% of the gap.
        let steps = (0.01_f32.ln() / (1.0 - SMOOTHING_RATE).ln()).ceil() as usize;
        let mut param = SmoothedParameter::new(BRIGHTNESS_OFF, SMOOTHING_RATE);
        param.set_target(BRIGHTNESS_ON);
        for _ in 0..steps {
            param.step();
        }
        let remaining = (param.target() - param.current()).abs();
        assert!(remaining <= (BRIGHTNESS_ON - BRIGHTNESS_OFF) * 0.01 + 1e-6);
    }

    #[test]
    fn light_smoothing_starts_at_signal_values() {
        let baseline = LightSmoothing::new(false);
        assert_eq!(baseline.brightness.current(), BRIGHTNESS_OFF);
        assert_eq!(baseline.range.current(), RANGE_OFF);

        let enhanced = LightSmoothing::new(true);
        assert_eq!(enhanced.brightness.current(), BRIGHTNESS_ON);
        assert_eq!(enhanced.range.current(), RANGE_ON);
    }
}
