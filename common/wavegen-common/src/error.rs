use crate::WaveformMode;
use thiserror::Error;

/// Failure of the underlying register accessor.
#[derive(Debug, Error, Copy, Clone, Eq, PartialEq)]
#[non_exhaustive]
pub enum IoError {
    #[error("register block is not mapped")]
    NotMapped,
    #[error("offset {offset:#x} lies outside the register block")]
    OutOfSpan { offset: usize },
    #[error("offset {offset:#x} is not word aligned")]
    Misaligned { offset: usize },
}

#[derive(Debug, Error, Copy, Clone, Eq, PartialEq)]
pub enum ModeError {
    #[error("mode code {0} does not name a waveform")]
    Code(u32),
    #[error("unrecognized waveform mode")]
    Token,
    #[error("{0} is not a periodic waveform mode")]
    NotPeriodic(WaveformMode),
}

#[derive(Debug, Error, Copy, Clone, Eq, PartialEq)]
#[error("channel must be one of `a` or `b`")]
pub struct ParseChannelError;

#[derive(Debug, Error, Copy, Clone, Eq, PartialEq)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] IoError),
    #[error("invalid waveform mode: {0}")]
    InvalidMode(#[from] ModeError),
    #[error("frequency {0} exceeds the maximum of {max}", max = crate::FREQUENCY_MAX)]
    InvalidFrequency(u32),
    #[error("malformed {0}")]
    Malformed(&'static str),
    #[error("failed to format value")]
    Format(#[from] core::fmt::Error),
}
