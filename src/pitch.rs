//! Pitch utilities: note number to frequency conversion and interpolation.
//!
//! Note numbers follow the MIDI convention (69 = A4 = 440 Hz) but are
//! continuous: fractional note numbers are legal and are what slides and
//! vibrato are built from.

/// Convert a note number to a frequency in Hz.
///
/// Formula: `440 * 2^((note - 69) / 12)`. Defined for any real note number.
pub fn note_to_frequency(note: f64) -> f64 {
    440.0 * (2.0_f64).powf((note - 69.0) / 12.0)
}

/// Convert a frequency in Hz to a note number.
///
/// Exact inverse of [`note_to_frequency`]. Only defined for positive
/// frequencies; non-positive input yields a non-finite result.
pub fn frequency_to_note(frequency: f64) -> f64 {
    69.0 + 12.0 * (frequency / 440.0).log2()
}

/// Linearly interpolate between `a` and `b`.
///
/// `t` is unrestricted: values outside [0, 1] extrapolate, which is useful
/// for ramps that overshoot their endpoints.
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_69_is_concert_a() {
        assert_eq!(note_to_frequency(69.0), 440.0);
    }

    #[test]
    fn note_60_is_middle_c() {
        assert!(
            (note_to_frequency(60.0) - 261.63).abs() < 0.01,
            "middle C should be ~261.63 Hz, got {}",
            note_to_frequency(60.0)
        );
    }

    #[test]
    fn frequency_440_is_note_69() {
        assert_eq!(frequency_to_note(440.0), 69.0);
    }

    #[test]
    fn conversions_are_inverses() {
        for note in [-12.0, 0.0, 33.3, 60.0, 69.0, 100.25, 127.0] {
            let round_trip = frequency_to_note(note_to_frequency(note));
            assert!(
                (round_trip - note).abs() < 1e-9,
                "round trip of {note} gave {round_trip}"
            );
        }
    }

    #[test]
    fn lerp_interpolates_and_extrapolates() {
        assert_eq!(lerp(10.0, 20.0, -0.5), 5.0);
        assert_eq!(lerp(10.0, 20.0, 0.0), 10.0);
        assert_eq!(lerp(10.0, 20.0, 0.5), 15.0);
        assert_eq!(lerp(10.0, 20.0, 1.0), 20.0);
        assert_eq!(lerp(10.0, 20.0, 1.5), 25.0);
    }
}
