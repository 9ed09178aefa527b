#![cfg_attr(not(any(test, feature = "std")), no_std)]
//! Register-level driver for the dual-channel waveform generator IP.
//!
//! The peripheral exposes nine 32-bit registers. Most of them hold one field for
//! channel A in the low bits and the same field for channel B directly above it,
//! so every update is a read-modify-write that must leave the other channel alone.

use core::fmt::{Display, Formatter};
use core::str::FromStr;

/// Thin show/store adapters over [`WaveformEngine`](engine::WaveformEngine).
pub mod attr;
/// Channel-aware configuration operations.
pub mod engine;
mod error;
/// Field positions inside the shared registers.
pub mod layout;
/// In-memory register bank, for tests and dry runs.
#[cfg(any(test, feature = "std"))]
pub mod mock;
/// Register names, offsets, and the [`RegisterIo`](regs::RegisterIo) capability.
pub mod regs;
/// Per-device lock.
pub mod sync;

pub use error::{Error, IoError, ModeError, ParseChannelError};

/// Highest programmable frequency, in units of 100 µHz (50 kHz).
pub const FREQUENCY_MAX: u32 = 500_000_000;
/// Highest amplitude, in units of 100 µV (2.5 V).
pub const AMPLITUDE_MAX: u16 = 25_000;
/// Largest offset magnitude, in units of 100 µV.
pub const OFFSET_LIMIT: i16 = 25_000;
/// Duty cycle representing 100 %.
pub const DUTY_CYCLE_MAX: u16 = u16::MAX;
/// Largest phase offset magnitude, in units of 0.01°.
pub const PHASE_OFFSET_LIMIT: i16 = 18_000;

/// One of the two output lines of the peripheral.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Channel {
    A,
    B,
}
impl Channel {
    pub const BOTH: [Channel; 2] = [Channel::A, Channel::B];

    pub const fn index(self) -> usize {
        match self {
            Channel::A => 0,
            Channel::B => 1,
        }
    }

    pub const fn other(self) -> Channel {
        match self {
            Channel::A => Channel::B,
            Channel::B => Channel::A,
        }
    }
}
impl Display for Channel {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Channel::A => write!(f, "A"),
            Channel::B => write!(f, "B"),
        }
    }
}
impl FromStr for Channel {
    type Err = ParseChannelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "a" | "A" => Ok(Channel::A),
            "b" | "B" => Ok(Channel::B),
            _ => Err(ParseChannelError),
        }
    }
}

/// Waveform shape produced by a channel; the discriminant is the 3-bit hardware code.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[repr(u32)]
pub enum WaveformMode {
    Dc = 0,
    Sine = 1,
    Sawtooth = 2,
    Triangle = 3,
    Square = 4,
    Arbitrary = 5,
}
impl WaveformMode {
    pub const ALL: [WaveformMode; 6] = [
        WaveformMode::Dc,
        WaveformMode::Sine,
        WaveformMode::Sawtooth,
        WaveformMode::Triangle,
        WaveformMode::Square,
        WaveformMode::Arbitrary,
    ];

    pub const fn code(self) -> u32 {
        self as u32
    }

    /// Name used by the attribute and command surfaces.
    pub const fn token(self) -> &'static str {
        match self {
            WaveformMode::Dc => "dc",
            WaveformMode::Sine => "sine",
            WaveformMode::Sawtooth => "sawtooth",
            WaveformMode::Triangle => "triangle",
            WaveformMode::Square => "square",
            WaveformMode::Arbitrary => "arb",
        }
    }

    /// Every mode except [`Dc`](WaveformMode::Dc) repeats with a frequency.
    pub const fn is_periodic(self) -> bool {
        !matches!(self, WaveformMode::Dc)
    }
}
impl TryFrom<u32> for WaveformMode {
    type Error = ModeError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => Self::Dc,
            1 => Self::Sine,
            2 => Self::Sawtooth,
            3 => Self::Triangle,
            4 => Self::Square,
            5 => Self::Arbitrary,
            _ => return Err(ModeError::Code(value)),
        })
    }
}
impl FromStr for WaveformMode {
    type Err = ModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("arbitrary") {
            return Ok(WaveformMode::Arbitrary);
        }
        WaveformMode::ALL
            .into_iter()
            .find(|mode| s.eq_ignore_ascii_case(mode.token()))
            .ok_or(ModeError::Token)
    }
}
impl Display for WaveformMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.token())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_codes_round_trip() {
        for mode in WaveformMode::ALL {
            assert_eq!(WaveformMode::try_from(mode.code()), Ok(mode));
        }
        for code in [6, 7] {
            assert_eq!(WaveformMode::try_from(code), Err(ModeError::Code(code)));
        }
    }

    #[test]
    fn mode_tokens() {
        assert_eq!("Sine".parse(), Ok(WaveformMode::Sine));
        assert_eq!("arbitrary".parse(), Ok(WaveformMode::Arbitrary));
        assert_eq!("arb\n".parse(), Ok(WaveformMode::Arbitrary));
        assert_eq!("DC".parse(), Ok(WaveformMode::Dc));
        assert_eq!("noise".parse::<WaveformMode>(), Err(ModeError::Token));
    }

    #[test]
    fn channel_tokens() {
        assert_eq!("a".parse(), Ok(Channel::A));
        assert_eq!("B".parse(), Ok(Channel::B));
        assert_eq!("c".parse::<Channel>(), Err(ParseChannelError));
        assert_eq!(Channel::A.other(), Channel::B);
    }
}
