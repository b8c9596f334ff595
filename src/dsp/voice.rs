//! Voice: a single sounding note combining an oscillator and an envelope.
//!
//! Each voice owns one waveform source and one ADSR envelope, plus mutable
//! volume and pitch. Volume and pitch changes take effect on the next sample;
//! there is no retroactive resampling. `next_sample` returns `None` once the
//! envelope is exhausted (or immediately after `stop`), which is the signal
//! the writer uses to retire the voice.

use crate::error::BlipwaveError;
use crate::pitch::note_to_frequency;

use super::envelope::{Adsr, AdsrParams};
use super::oscillator::{NoiseOsc, Oscillator, Waveform, WavetableOsc};

pub struct Voice {
    oscillator: Box<dyn Oscillator>,
    envelope: Adsr,
    volume: f64,
    pitch: f64,
    frequency: f64,
    released: bool,
    stopped: bool,
}

impl Voice {
    /// Compose a voice from any oscillator and an envelope.
    ///
    /// Starts at note 69 (A4) and full volume; commands adjust both.
    pub fn new(oscillator: Box<dyn Oscillator>, envelope: Adsr) -> Self {
        Voice {
            oscillator,
            envelope,
            volume: 1.0,
            pitch: 69.0,
            frequency: note_to_frequency(69.0),
            released: false,
            stopped: false,
        }
    }

    /// Convenience: a wavetable voice for one of the periodic waveforms.
    pub fn wavetable(
        waveform: Waveform,
        params: AdsrParams,
        sample_rate: f64,
    ) -> Result<Self, BlipwaveError> {
        let osc = WavetableOsc::new(waveform, sample_rate)?;
        let env = Adsr::new(params, sample_rate)?;
        Ok(Voice::new(Box::new(osc), env))
    }

    /// Convenience: a white-noise voice (snares, hats, texture).
    pub fn noise(params: AdsrParams, sample_rate: f64) -> Result<Self, BlipwaveError> {
        let env = Adsr::new(params, sample_rate)?;
        Ok(Voice::new(Box::new(NoiseOsc::new()), env))
    }

    pub fn set_volume(&mut self, volume: f64) {
        self.volume = volume;
    }

    pub fn change_volume(&mut self, delta: f64) {
        self.volume += delta;
    }

    /// Set the pitch as a continuous note number (fractional values legal).
    pub fn set_pitch(&mut self, note: f64) {
        self.pitch = note;
        self.frequency = note_to_frequency(note);
    }

    pub fn change_pitch(&mut self, delta: f64) {
        self.set_pitch(self.pitch + delta);
    }

    pub fn pitch(&self) -> f64 {
        self.pitch
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    /// Signal note-off: the envelope enters its release ramp on the next
    /// sample and the voice dies away.
    pub fn release(&mut self) {
        self.released = true;
    }

    /// Hard cut: the voice produces nothing from the very next sample,
    /// regardless of envelope stage.
    pub fn stop(&mut self) {
        self.stopped = true;
    }

    /// Produce one final sample, or `None` once the voice is exhausted.
    pub fn next_sample(&mut self) -> Option<f64> {
        if self.stopped {
            return None;
        }
        let raw = self.oscillator.sample(self.frequency);
        let amplitude = self.envelope.step(self.released)?;
        Some(raw * self.volume * amplitude)
    }
}
