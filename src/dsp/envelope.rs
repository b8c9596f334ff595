//! ADSR envelope generator.
//!
//! The envelope is a pull-driven state machine: every call to [`Adsr::step`]
//! consumes the latest release flag and produces exactly one amplitude value
//! in [0, 1]. Once the release ramp hits zero the generator is exhausted and
//! every further call returns `None`. Exhaustion is the normal end of a note,
//! not an error; the voice and writer use it to retire finished voices.

use serde::{Deserialize, Serialize};

use crate::error::BlipwaveError;

/// Envelope shape parameters.
///
/// Attack, decay, and release are durations in seconds and must be strictly
/// positive (the per-sample rates divide by them). Sustain is a level ratio
/// in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdsrParams {
    pub attack: f64,
    pub decay: f64,
    pub sustain: f64,
    pub release: f64,
}

impl Default for AdsrParams {
    fn default() -> Self {
        AdsrParams {
            attack: 0.01,
            decay: 0.01,
            sustain: 0.75,
            release: 0.1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Stage {
    Attack,
    Decay,
    Sustain,
    Release,
    Done,
}

/// A resumable ADSR amplitude generator.
///
/// Stages run strictly in order Attack -> Decay -> Sustain -> Release -> Done,
/// with one exception: a release signal received before sustain is reached
/// jumps straight to the release ramp from whatever value the envelope
/// currently has, skipping decay and sustain entirely.
#[derive(Debug, Clone)]
pub struct Adsr {
    attack_rate: f64,
    decay_rate: f64,
    sustain: f64,
    release_rate: f64,
    stage: Stage,
    value: f64,
    released: bool,
}

impl Adsr {
    /// Build an envelope for the given shape and sample rate.
    ///
    /// Rejects zero or negative segment durations and sample rates up front
    /// rather than dividing by zero later.
    pub fn new(params: AdsrParams, sample_rate: f64) -> Result<Self, BlipwaveError> {
        if !(sample_rate > 0.0) || !sample_rate.is_finite() {
            return Err(BlipwaveError::InvalidSampleRate { value: sample_rate });
        }
        for (field, value) in [
            ("attack", params.attack),
            ("decay", params.decay),
            ("release", params.release),
        ] {
            if !(value > 0.0) || !value.is_finite() {
                return Err(BlipwaveError::InvalidEnvelope { field, value });
            }
        }
        if !(0.0..=1.0).contains(&params.sustain) {
            return Err(BlipwaveError::InvalidEnvelope {
                field: "sustain",
                value: params.sustain,
            });
        }

        Ok(Adsr {
            attack_rate: 1.0 / (params.attack * sample_rate),
            decay_rate: (1.0 - params.sustain) / (params.decay * sample_rate),
            sustain: params.sustain,
            release_rate: params.sustain / (params.release * sample_rate),
            stage: Stage::Attack,
            value: 0.0,
            released: false,
        })
    }

    /// Advance one sample and return the next amplitude value.
    ///
    /// `released` is sticky: once passed as true, every later step behaves as
    /// released. Returns `None` once the envelope is exhausted.
    pub fn step(&mut self, released: bool) -> Option<f64> {
        if released {
            self.released = true;
        }
        if self.released && matches!(self.stage, Stage::Attack | Stage::Decay | Stage::Sustain) {
            self.stage = Stage::Release;
        }

        loop {
            match self.stage {
                Stage::Attack => {
                    if self.value < 1.0 {
                        self.value = (self.value + self.attack_rate).min(1.0);
                        return Some(self.value);
                    }
                    self.stage = Stage::Decay;
                }
                Stage::Decay => {
                    if self.value > self.sustain {
                        self.value = (self.value - self.decay_rate).max(self.sustain);
                        return Some(self.value);
                    }
                    self.stage = Stage::Sustain;
                }
                Stage::Sustain => {
                    return Some(self.value);
                }
                Stage::Release => {
                    if self.value > 0.0 {
                        // A zero sustain level means a zero release rate;
                        // snap to silence instead of holding forever.
                        if self.release_rate <= 0.0 {
                            self.value = 0.0;
                        } else {
                            self.value = (self.value - self.release_rate).max(0.0);
                        }
                        return Some(self.value);
                    }
                    self.stage = Stage::Done;
                }
                Stage::Done => {
                    return None;
                }
            }
        }
    }

    /// True once the envelope has finished its release ramp.
    pub fn is_exhausted(&self) -> bool {
        self.stage == Stage::Done
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adsr(attack: f64, decay: f64, sustain: f64, release: f64, sample_rate: f64) -> Adsr {
        Adsr::new(
            AdsrParams {
                attack,
                decay,
                sustain,
                release,
            },
            sample_rate,
        )
        .expect("valid envelope")
    }

    fn assert_step(env: &mut Adsr, released: bool, expected: f64) {
        let value = env.step(released).expect("envelope still running");
        assert!(
            (value - expected).abs() < 1e-9,
            "expected {expected}, got {value}"
        );
    }

    #[test]
    fn full_cycle_trace() {
        // 10 Hz sample rate keeps the arithmetic readable: attack covers 5
        // steps of 0.2, decay 5 steps of 0.05, release 5 steps of 0.15.
        let mut env = adsr(0.5, 0.5, 0.75, 0.5, 10.0);

        for expected in [0.2, 0.4, 0.6, 0.8, 1.0] {
            assert_step(&mut env, false, expected);
        }
        for expected in [0.95, 0.90, 0.85, 0.80, 0.75] {
            assert_step(&mut env, false, expected);
        }
        assert_step(&mut env, false, 0.75);
        assert_step(&mut env, false, 0.75);

        assert_step(&mut env, true, 0.60);
        for expected in [0.45, 0.30, 0.15, 0.0] {
            assert_step(&mut env, false, expected);
        }

        assert_eq!(env.step(false), None);
        assert!(env.is_exhausted());
        assert_eq!(env.step(false), None, "exhaustion is permanent");
    }

    #[test]
    fn faster_than_one_step_segments_clamp() {
        let mut env = adsr(0.0001, 0.0001, 1.0, 0.0001, 10.0);
        assert_step(&mut env, false, 1.0);
    }

    #[test]
    fn release_mid_attack_skips_decay_and_sustain() {
        let mut env = adsr(0.5, 0.5, 0.75, 0.5, 10.0);
        assert_step(&mut env, false, 0.2);
        assert_step(&mut env, false, 0.4);

        // Release ramps down from the current value at the release rate
        // (sustain / (release * sample_rate) = 0.15 per step).
        assert_step(&mut env, true, 0.25);
        assert_step(&mut env, false, 0.10);
        assert_step(&mut env, false, 0.0);
        assert_eq!(env.step(false), None);
    }

    #[test]
    fn release_flag_is_sticky() {
        let mut env = adsr(0.5, 0.5, 0.75, 0.5, 10.0);
        env.step(true);
        // Passing false afterwards must not resurrect the note.
        let mut last = 1.0;
        while let Some(value) = env.step(false) {
            assert!(value <= last, "release must be monotonic");
            last = value;
        }
        assert!(env.is_exhausted());
    }

    #[test]
    fn zero_sustain_release_reaches_silence() {
        let mut env = adsr(0.5, 0.5, 0.0, 0.5, 10.0);
        env.step(false);
        env.step(true);
        let mut steps = 0;
        while env.step(false).is_some() {
            steps += 1;
            assert!(steps < 10, "zero sustain must not release forever");
        }
    }

    #[test]
    fn rejects_degenerate_parameters() {
        for params in [
            AdsrParams {
                attack: 0.0,
                ..AdsrParams::default()
            },
            AdsrParams {
                decay: -1.0,
                ..AdsrParams::default()
            },
            AdsrParams {
                release: 0.0,
                ..AdsrParams::default()
            },
            AdsrParams {
                sustain: 1.5,
                ..AdsrParams::default()
            },
        ] {
            assert!(Adsr::new(params, 44100.0).is_err(), "{params:?} should be rejected");
        }
        assert!(Adsr::new(AdsrParams::default(), 0.0).is_err());
        assert!(Adsr::new(AdsrParams::default(), -44100.0).is_err());
    }
}
