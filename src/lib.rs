//! blipwave: an offline software synthesizer.
//!
//! Compositions are described as voices plus timed commands. The [`Writer`]
//! advances a global sample clock, dispatches commands as their trigger times
//! arrive, sums the active voices, hard-clips, and quantizes into a mono PCM
//! buffer, which the renderer wraps in a WAV container. The whole pipeline is
//! single-threaded, pull-based, and deterministic: the same commands produce
//! the same bytes, apart from unseeded noise voices.
//!
//! ```no_run
//! use blipwave::{AdsrParams, Command, SampleFormat, Voice, Waveform, Writer};
//!
//! let mut writer = Writer::new(44100.0)?;
//! let voice = Voice::wavetable(Waveform::Saw, AdsrParams::default(), 44100.0)?;
//! let id = writer.add_voice(voice);
//! writer.schedule(0.0, Command::Start(id))?;
//! writer.schedule(0.0, Command::SetPitch(id, 60.0))?;
//! writer.schedule(0.5, Command::Release(id))?;
//! blipwave::write_wav("note.wav", &mut writer, SampleFormat::Int16)?;
//! # Ok::<(), blipwave::BlipwaveError>(())
//! ```

pub mod dsp;
pub mod error;
pub mod pitch;

pub use dsp::envelope::{Adsr, AdsrParams};
pub use dsp::oscillator::{NoiseOsc, Oscillator, TimedOsc, Waveform, WavetableOsc};
pub use dsp::renderer::{SampleFormat, render_wav, write_wav};
pub use dsp::voice::Voice;
pub use dsp::writer::{Command, VoiceId, Writer};
pub use error::BlipwaveError;
pub use pitch::{frequency_to_note, lerp, note_to_frequency};

/// The crate version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
