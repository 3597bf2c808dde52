//! Synthetic sensor state
//!
//! Temperatures are drawn uniformly from a two-degree band that drifts
//! upward by three degrees every 60 ticks. The drift is unbounded and the
//! band never resets downward.

use rand::Rng;

/// Lower bound of the band at startup
const INITIAL_LOW: i32 = 30;

/// Width of the band; the upper bound is always `low + BAND_WIDTH`
const BAND_WIDTH: i32 = 2;

/// Degrees added to both bounds on each band shift
const DRIFT_STEP: i32 = 3;

/// Ticks between band shifts
const TICKS_PER_SHIFT: u32 = 60;

/// Mutable value-generation state for the simulated sensor
#[derive(Debug)]
pub struct SensorSimulator {
    low: i32,
    high: i32,
    cycle_count: u32,
    enabled: bool,
}

impl SensorSimulator {
    pub fn new() -> Self {
        Self {
            low: INITIAL_LOW,
            high: INITIAL_LOW + BAND_WIDTH,
            cycle_count: 0,
            enabled: true,
        }
    }

    /// Advance the band by one tick and draw a temperature from it.
    ///
    /// The returned value lies in `[low, high)`, where `low`/`high` are the
    /// bounds after this tick's shift (if any) has been applied.
    pub fn next_temperature(&mut self, rng: &mut impl Rng) -> i32 {
        self.cycle_count += 1;
        if self.cycle_count >= TICKS_PER_SHIFT {
            self.cycle_count = 0;
            self.low += DRIFT_STEP;
            self.high += DRIFT_STEP;
        }
        rng.gen_range(self.low..self.high)
    }

    /// Current band bounds as `(low, high)`
    pub fn band(&self) -> (i32, i32) {
        (self.low, self.high)
    }

    /// Whether the periodic update is active. Nothing in the running system
    /// clears this; the inbound enable/disable command path was never wired
    /// up (see DESIGN.md).
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Default for SensorSimulator {
    fn default() -> Self {
        Self::new()
    }
}
