use std::fmt;
use std::io;

#[derive(Debug)]
pub enum BlipwaveError {
    /// An envelope segment was given a duration or level it cannot use.
    InvalidEnvelope { field: &'static str, value: f64 },
    /// The sample rate must be a positive, finite number of Hz.
    InvalidSampleRate { value: f64 },
    /// Commands can only be scheduled at non-negative, finite times.
    InvalidCommandTime { time: f64 },
    Io(io::Error),
}

impl fmt::Display for BlipwaveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlipwaveError::InvalidEnvelope { field, value } => {
                write!(f, "Invalid envelope {field}: {value}")
            }
            BlipwaveError::InvalidSampleRate { value } => {
                write!(f, "Invalid sample rate: {value}")
            }
            BlipwaveError::InvalidCommandTime { time } => {
                write!(f, "Invalid command time: {time}")
            }
            BlipwaveError::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for BlipwaveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BlipwaveError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for BlipwaveError {
    fn from(e: io::Error) -> Self {
        BlipwaveError::Io(e)
    }
}
