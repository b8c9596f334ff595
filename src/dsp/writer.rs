//! Writer: mixes voices sample by sample while dispatching timed commands.
//!
//! The writer owns a registry of voices and a time-ordered list of commands.
//! Its render loop is entirely single-threaded and pull-based: per output
//! sample it first executes every command whose trigger time has arrived
//! (inclusive, ties in insertion order), then polls every active voice, sums,
//! hard-clips, and appends. Voices reporting exhaustion are retired. The loop
//! ends exactly when no commands and no active voices remain, so the same
//! inputs always produce the same buffer.

use log::{debug, trace};

use crate::error::BlipwaveError;

use super::voice::Voice;

/// Handle for a voice registered with a [`Writer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VoiceId(usize);

/// A parameter change or lifecycle action aimed at one registered voice.
///
/// Commands are plain values dispatched by id, so a song can be described as
/// data. A command aimed at a voice that has already finished (or was never
/// registered) is a no-op.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Move a registered voice into the active mix.
    Start(VoiceId),
    SetVolume(VoiceId, f64),
    ChangeVolume(VoiceId, f64),
    /// Set the pitch as a continuous note number.
    SetPitch(VoiceId, f64),
    ChangePitch(VoiceId, f64),
    /// Begin the envelope's release ramp.
    Release(VoiceId),
    /// Hard cut: the voice is silent from the next polled sample.
    Stop(VoiceId),
}

struct TimedCommand {
    time: f64,
    command: Command,
}

/// Mixes registered voices into a mono sample buffer under command control.
///
/// Lifecycle is one-shot: register voices, schedule commands, render once.
pub struct Writer {
    sample_rate: f64,
    commands: Vec<TimedCommand>,
    /// Indexed by `VoiceId`; a slot becomes `None` once the voice retires.
    voices: Vec<Option<Voice>>,
    active: Vec<VoiceId>,
}

impl Writer {
    pub fn new(sample_rate: f64) -> Result<Self, BlipwaveError> {
        if !(sample_rate > 0.0) || !sample_rate.is_finite() {
            return Err(BlipwaveError::InvalidSampleRate { value: sample_rate });
        }
        Ok(Writer {
            sample_rate,
            commands: Vec::new(),
            voices: Vec::new(),
            active: Vec::new(),
        })
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Register a voice. It stays inert until a [`Command::Start`] fires.
    pub fn add_voice(&mut self, voice: Voice) -> VoiceId {
        self.voices.push(Some(voice));
        VoiceId(self.voices.len() - 1)
    }

    /// Schedule `command` to execute at `time` seconds into the render.
    ///
    /// Commands sharing a trigger time run in the order they were scheduled.
    pub fn schedule(&mut self, time: f64, command: Command) -> Result<(), BlipwaveError> {
        if !(time >= 0.0) || !time.is_finite() {
            return Err(BlipwaveError::InvalidCommandTime { time });
        }
        self.commands.push(TimedCommand { time, command });
        Ok(())
    }

    /// Run the mix loop and return the clipped mono samples in [-1, 1].
    pub fn render(&mut self) -> Vec<f64> {
        // Stable sort: equal trigger times keep their insertion order.
        self.commands.sort_by(|a, b| a.time.total_cmp(&b.time));

        let mut output = Vec::new();
        let mut next_command = 0;
        let mut sample_index: u64 = 0;

        while next_command < self.commands.len() || !self.active.is_empty() {
            let now = sample_index as f64 / self.sample_rate;

            while next_command < self.commands.len() && self.commands[next_command].time <= now {
                let command = self.commands[next_command].command;
                next_command += 1;
                trace!("t={now:.4}s: {command:?}");
                self.dispatch(command);
            }

            let mut sum = 0.0;
            let voices = &mut self.voices;
            self.active.retain(|&id| match voices[id.0].as_mut() {
                Some(voice) => match voice.next_sample() {
                    Some(sample) => {
                        sum += sample;
                        true
                    }
                    None => {
                        debug!("voice {} exhausted at sample {sample_index}", id.0);
                        voices[id.0] = None;
                        false
                    }
                },
                None => false,
            });

            output.push(sum.clamp(-1.0, 1.0));
            sample_index += 1;
        }

        debug!(
            "rendered {} samples ({:.3}s) at {} Hz",
            output.len(),
            output.len() as f64 / self.sample_rate,
            self.sample_rate
        );
        output
    }

    /// Render and quantize to signed 16-bit PCM.
    pub fn render_pcm_i16(&mut self) -> Vec<i16> {
        self.render().into_iter().map(quantize_i16).collect()
    }

    /// Render and quantize to unsigned 8-bit PCM.
    pub fn render_pcm_u8(&mut self) -> Vec<u8> {
        self.render().into_iter().map(quantize_u8).collect()
    }

    fn dispatch(&mut self, command: Command) {
        match command {
            Command::Start(id) => {
                if self.voices.get(id.0).is_some_and(|slot| slot.is_some())
                    && !self.active.contains(&id)
                {
                    self.active.push(id);
                }
            }
            Command::SetVolume(id, volume) => {
                if let Some(voice) = self.voice_mut(id) {
                    voice.set_volume(volume);
                }
            }
            Command::ChangeVolume(id, delta) => {
                if let Some(voice) = self.voice_mut(id) {
                    voice.change_volume(delta);
                }
            }
            Command::SetPitch(id, note) => {
                if let Some(voice) = self.voice_mut(id) {
                    voice.set_pitch(note);
                }
            }
            Command::ChangePitch(id, delta) => {
                if let Some(voice) = self.voice_mut(id) {
                    voice.change_pitch(delta);
                }
            }
            Command::Release(id) => {
                if let Some(voice) = self.voice_mut(id) {
                    voice.release();
                }
            }
            Command::Stop(id) => {
                if let Some(voice) = self.voice_mut(id) {
                    voice.stop();
                }
            }
        }
    }

    fn voice_mut(&mut self, id: VoiceId) -> Option<&mut Voice> {
        self.voices.get_mut(id.0).and_then(|slot| slot.as_mut())
    }
}

/// Quantize a clipped sample to signed 16-bit (two's complement range).
///
/// The affine map sends -1.0 to -32768 and 1.0 to 32767; truncation toward
/// zero keeps silence at exactly 0.
pub fn quantize_i16(clipped: f64) -> i16 {
    (clipped * 32767.5 - 0.5) as i16
}

/// Quantize a clipped sample to unsigned 8-bit (128 is silence).
pub fn quantize_u8(clipped: f64) -> u8 {
    ((clipped / 2.0 + 0.5) * 255.0).round().clamp(0.0, 255.0) as u8
}
