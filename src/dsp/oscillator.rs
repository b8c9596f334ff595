//! Waveform sources.
//!
//! Two construction strategies are provided. [`WavetableOsc`] precomputes one
//! cycle of the waveform and advances a fractional phase index each sample,
//! so pitch changes stay phase-continuous (no click). [`TimedOsc`] recomputes
//! the waveform formula from accumulated elapsed time, which is simpler and
//! exact but keeps phase tied to the clock rather than to the note.
//! [`NoiseOsc`] is pitchless and seedable for reproducible renders.

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

use crate::error::BlipwaveError;

/// Number of samples in one precomputed wavetable cycle.
pub const TABLE_SIZE: usize = 4096;

/// Supported periodic waveform shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Waveform {
    Sine,
    Saw,
    Square,
    Triangle,
}

/// A raw waveform source, polled once per output sample.
///
/// `frequency` is the pitch requested for this sample in Hz; implementations
/// that ignore pitch (noise) simply discard it.
pub trait Oscillator {
    /// Produce the next raw sample in [-1, 1] and advance internal state by
    /// one sample period.
    fn sample(&mut self, frequency: f64) -> f64;
}

/// One cycle of `waveform` evaluated at phase `p` in [0, 1).
fn waveform_value(waveform: Waveform, p: f64) -> f64 {
    match waveform {
        Waveform::Sine => (TAU * p).sin(),
        // Ramps from -1 to 1 over one period, discontinuous wrap.
        Waveform::Saw => 2.0 * p - 1.0,
        Waveform::Square => {
            if p < 0.5 {
                -1.0
            } else {
                1.0
            }
        }
        // Ramp up over the first half cycle, back down over the second.
        Waveform::Triangle => {
            if p < 0.5 {
                4.0 * p - 1.0
            } else {
                3.0 - 4.0 * p
            }
        }
    }
}

/// Wavetable oscillator with a fractional phase accumulator.
///
/// The phase advances by `TABLE_SIZE * frequency / sample_rate` per sample
/// and wraps with euclidean modulo, so it never drifts out of range over
/// long notes and changing the frequency mid-note never jumps the phase.
#[derive(Debug, Clone)]
pub struct WavetableOsc {
    table: Vec<f64>,
    phase: f64,
    sample_rate: f64,
}

impl WavetableOsc {
    pub fn new(waveform: Waveform, sample_rate: f64) -> Result<Self, BlipwaveError> {
        if !(sample_rate > 0.0) || !sample_rate.is_finite() {
            return Err(BlipwaveError::InvalidSampleRate { value: sample_rate });
        }
        let table = (0..TABLE_SIZE)
            .map(|i| waveform_value(waveform, i as f64 / TABLE_SIZE as f64))
            .collect();
        Ok(WavetableOsc {
            table,
            phase: 0.0,
            sample_rate,
        })
    }
}

impl Oscillator for WavetableOsc {
    fn sample(&mut self, frequency: f64) -> f64 {
        let len = self.table.len() as f64;
        let value = self.table[self.phase as usize];
        let rate = len * frequency / self.sample_rate;
        self.phase = (self.phase + rate).rem_euclid(len);
        value
    }
}

/// Formula-based oscillator driven by absolute elapsed time.
///
/// Every call evaluates the waveform at `time * frequency` and then advances
/// the clock by one sample period. With a steady pitch this is exact; pitch
/// changes shift the effective phase, which is why the wavetable variant
/// exists.
#[derive(Debug, Clone)]
pub struct TimedOsc {
    waveform: Waveform,
    time: f64,
    seconds_per_sample: f64,
}

impl TimedOsc {
    pub fn new(waveform: Waveform, sample_rate: f64) -> Result<Self, BlipwaveError> {
        if !(sample_rate > 0.0) || !sample_rate.is_finite() {
            return Err(BlipwaveError::InvalidSampleRate { value: sample_rate });
        }
        Ok(TimedOsc {
            waveform,
            time: 0.0,
            seconds_per_sample: 1.0 / sample_rate,
        })
    }
}

impl Oscillator for TimedOsc {
    fn sample(&mut self, frequency: f64) -> f64 {
        let value = waveform_value(self.waveform, (self.time * frequency).rem_euclid(1.0));
        self.time += self.seconds_per_sample;
        value
    }
}

/// White noise: a uniform random value in [-1, 1] per sample, no periodicity.
#[derive(Debug, Clone)]
pub struct NoiseOsc {
    rng: SmallRng,
}

impl NoiseOsc {
    pub fn new() -> Self {
        Self::with_seed(rand::random())
    }

    /// Seeded construction, for byte-identical renders in tests.
    pub fn with_seed(seed: u64) -> Self {
        NoiseOsc {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl Default for NoiseOsc {
    fn default() -> Self {
        Self::new()
    }
}

impl Oscillator for NoiseOsc {
    fn sample(&mut self, _frequency: f64) -> f64 {
        self.rng.random_range(-1.0..=1.0)
    }
}
