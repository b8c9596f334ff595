//! Sample-generation pipeline: envelopes, oscillators, voices, and the
//! writer that mixes them into a PCM buffer.

pub mod envelope;
pub mod oscillator;
pub mod renderer;
pub mod voice;
pub mod writer;
