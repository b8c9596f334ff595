//! WAV renderer: runs a [`Writer`] and produces a mono PCM WAV file.
//!
//! The whole render is produced in memory and written once at the end; there
//! is no streaming.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::BlipwaveError;

use super::writer::Writer;

/// Output sample width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleFormat {
    /// Signed 16-bit little-endian PCM.
    Int16,
    /// Unsigned 8-bit PCM (128 is silence).
    Uint8,
}

impl SampleFormat {
    fn bits_per_sample(self) -> u16 {
        match self {
            SampleFormat::Int16 => 16,
            SampleFormat::Uint8 => 8,
        }
    }
}

/// Render the writer's mix and encode it as a WAV byte buffer.
pub fn render_wav(writer: &mut Writer, format: SampleFormat) -> Vec<u8> {
    let sample_rate = writer.sample_rate() as u32;
    let data = match format {
        SampleFormat::Int16 => {
            let pcm = writer.render_pcm_i16();
            let mut bytes = Vec::with_capacity(pcm.len() * 2);
            for sample in pcm {
                bytes.extend_from_slice(&sample.to_le_bytes());
            }
            bytes
        }
        SampleFormat::Uint8 => writer.render_pcm_u8(),
    };
    encode_wav(&data, sample_rate, format.bits_per_sample())
}

/// Render the writer's mix and write it to `path` as a WAV file.
pub fn write_wav<P: AsRef<Path>>(
    path: P,
    writer: &mut Writer,
    format: SampleFormat,
) -> Result<(), BlipwaveError> {
    let bytes = render_wav(writer, format);
    fs::write(path, bytes)?;
    Ok(())
}

/// Encode raw mono PCM data bytes into a WAV byte buffer.
fn encode_wav(data: &[u8], sample_rate: u32, bits_per_sample: u16) -> Vec<u8> {
    let channels: u16 = 1;
    let bytes_per_sample = bits_per_sample / 8;
    let byte_rate = sample_rate * channels as u32 * bytes_per_sample as u32;
    let block_align = channels * bytes_per_sample;
    let data_size = data.len() as u32;
    let file_size = 36 + data_size;

    let mut buf = Vec::with_capacity(44 + data.len());

    // RIFF header
    buf.extend_from_slice(b"RIFF");
    buf.extend_from_slice(&file_size.to_le_bytes());
    buf.extend_from_slice(b"WAVE");

    // fmt chunk
    buf.extend_from_slice(b"fmt ");
    buf.extend_from_slice(&16u32.to_le_bytes()); // chunk size
    buf.extend_from_slice(&1u16.to_le_bytes()); // PCM format
    buf.extend_from_slice(&channels.to_le_bytes());
    buf.extend_from_slice(&sample_rate.to_le_bytes());
    buf.extend_from_slice(&byte_rate.to_le_bytes());
    buf.extend_from_slice(&block_align.to_le_bytes());
    buf.extend_from_slice(&bits_per_sample.to_le_bytes());

    // data chunk
    buf.extend_from_slice(b"data");
    buf.extend_from_slice(&data_size.to_le_bytes());
    buf.extend_from_slice(data);

    buf
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::envelope::AdsrParams;
    use crate::dsp::oscillator::Waveform;
    use crate::dsp::voice::Voice;
    use crate::dsp::writer::Command;

    const SAMPLE_RATE: f64 = 8000.0;

    fn one_note_writer() -> Writer {
        let mut w = Writer::new(SAMPLE_RATE).unwrap();
        let voice = Voice::wavetable(Waveform::Square, AdsrParams::default(), SAMPLE_RATE).unwrap();
        let id = w.add_voice(voice);
        w.schedule(0.0, Command::Start(id)).unwrap();
        w.schedule(0.0, Command::SetPitch(id, 60.0)).unwrap();
        w.schedule(0.1, Command::Release(id)).unwrap();
        w
    }

    fn field_u16(wav: &[u8], at: usize) -> u16 {
        u16::from_le_bytes([wav[at], wav[at + 1]])
    }

    fn field_u32(wav: &[u8], at: usize) -> u32 {
        u32::from_le_bytes([wav[at], wav[at + 1], wav[at + 2], wav[at + 3]])
    }

    #[test]
    fn wav_header_valid_i16() {
        let wav = render_wav(&mut one_note_writer(), SampleFormat::Int16);

        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(&wav[8..12], b"WAVE");
        assert_eq!(&wav[12..16], b"fmt ");
        assert_eq!(&wav[36..40], b"data");

        assert_eq!(field_u16(&wav, 20), 1, "PCM format tag");
        assert_eq!(field_u16(&wav, 22), 1, "mono");
        assert_eq!(field_u32(&wav, 24), 8000, "sample rate");
        assert_eq!(field_u16(&wav, 34), 16, "bits per sample");

        let data_size = field_u32(&wav, 40);
        assert_eq!(wav.len(), 44 + data_size as usize);
        assert_eq!(data_size % 2, 0, "16-bit data is two bytes per sample");
        assert!(data_size > 0, "one note should produce audio data");
    }

    #[test]
    fn wav_header_valid_u8() {
        let wav = render_wav(&mut one_note_writer(), SampleFormat::Uint8);

        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(field_u16(&wav, 34), 8, "bits per sample");
        assert_eq!(field_u32(&wav, 28), 8000, "byte rate = sample rate for mono u8");
        assert_eq!(field_u16(&wav, 32), 1, "block align");

        let data_size = field_u32(&wav, 40);
        assert_eq!(wav.len(), 44 + data_size as usize);
    }

    #[test]
    fn empty_writer_renders_header_only() {
        let mut w = Writer::new(SAMPLE_RATE).unwrap();
        let wav = render_wav(&mut w, SampleFormat::Int16);
        assert_eq!(wav.len(), 44, "no commands and no voices: header only");
        assert_eq!(field_u32(&wav, 40), 0);
    }

    #[test]
    fn u8_data_sits_around_the_midpoint() {
        let wav = render_wav(&mut one_note_writer(), SampleFormat::Uint8);
        let data = &wav[44..];
        // A square note swings around silence (128); the trailing retirement
        // sample is exactly silence.
        assert!(data.iter().any(|&b| b > 128));
        assert!(data.iter().any(|&b| b < 128));
        assert_eq!(*data.last().unwrap(), 128);
    }
}
