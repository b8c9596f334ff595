//! Renders a small demo song (drums, arpeggio, melody) to `demo_song.wav`.

use blipwave::{AdsrParams, BlipwaveError, Command, SampleFormat, Voice, Waveform, Writer};

const SAMPLE_RATE: f64 = 44100.0;
const ROOT_NOTE: f64 = 69.0;

#[derive(Clone, Copy)]
enum Hit {
    Kick,
    Snare,
}

/// Register a voice and schedule its note-on and release.
fn schedule_note(
    writer: &mut Writer,
    voice: Voice,
    time: f64,
    duration: f64,
    note: f64,
    volume: f64,
) -> Result<(), BlipwaveError> {
    let id = writer.add_voice(voice);
    writer.schedule(time, Command::SetPitch(id, note))?;
    writer.schedule(time, Command::SetVolume(id, volume))?;
    writer.schedule(time, Command::Start(id))?;
    writer.schedule(time + duration, Command::Release(id))?;
    Ok(())
}

fn main() -> Result<(), BlipwaveError> {
    env_logger::init();

    let mut writer = Writer::new(SAMPLE_RATE)?;

    let major_scale = [0.0, 2.0, 4.0, 5.0, 7.0, 9.0, 11.0];
    let major_triad = [0.0, 4.0, 7.0];

    // Drum pattern, eighth notes: a low sine thump and a noise snare.
    use Hit::{Kick, Snare};
    let bar: [Option<Hit>; 16] = [
        Some(Kick),
        None,
        None,
        None,
        Some(Snare),
        None,
        Some(Kick),
        Some(Kick),
        Some(Kick),
        None,
        Some(Kick),
        None,
        Some(Snare),
        None,
        None,
        None,
    ];
    let percussion_env = AdsrParams {
        attack: 0.005,
        decay: 0.05,
        sustain: 0.3,
        release: 0.05,
    };
    for (i, hit) in bar.iter().chain(bar.iter()).enumerate() {
        let Some(hit) = hit else { continue };
        let time = i as f64 / 8.0;
        let voice = match hit {
            Kick => Voice::wavetable(Waveform::Sine, percussion_env, SAMPLE_RATE)?,
            Snare => Voice::noise(percussion_env, SAMPLE_RATE)?,
        };
        let note = match hit {
            Kick => ROOT_NOTE - 33.0,
            Snare => ROOT_NOTE,
        };
        schedule_note(&mut writer, voice, time, 1.0 / 16.0, note, 0.1)?;
    }

    // Fast saw arpeggio over the major triad, with a near-instant envelope.
    let pluck_env = AdsrParams {
        attack: 0.0001,
        decay: 0.0001,
        sustain: 1.0,
        release: 0.0001,
    };
    for i in 0..72 {
        let note = ROOT_NOTE + major_triad[i % major_triad.len()];
        let voice = Voice::wavetable(Waveform::Saw, pluck_env, SAMPLE_RATE)?;
        schedule_note(&mut writer, voice, i as f64 / 24.0, 1.0 / 24.0, note, 0.025)?;
    }

    // Melody: up the scale, over the top, and back down.
    let mut melody: Vec<f64> = major_scale.to_vec();
    melody.extend([12.0, 14.0, 12.0]);
    melody.extend(major_scale.iter().rev());
    for (i, offset) in melody.iter().enumerate() {
        let voice = Voice::wavetable(Waveform::Saw, AdsrParams::default(), SAMPLE_RATE)?;
        schedule_note(
            &mut writer,
            voice,
            i as f64 / 4.0,
            1.0 / 8.0,
            ROOT_NOTE + offset,
            0.05,
        )?;
    }

    blipwave::write_wav("demo_song.wav", &mut writer, SampleFormat::Int16)?;
    println!("wrote demo_song.wav");
    Ok(())
}
