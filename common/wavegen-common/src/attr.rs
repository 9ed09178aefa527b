//! One named attribute per field per channel, for sysfs-style interactive access.
//!
//! `show` and `store` only parse and format; every value goes through the
//! matching [`WaveformEngine`] getter or setter. Values are in device units.

use crate::engine::WaveformEngine;
use crate::regs::RegisterIo;
use crate::{Channel, Error};
use core::fmt::{Display, Formatter, Write};
use core::str::FromStr;
use lock_api::RawMutex;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Attribute {
    Mode,
    Frequency,
    Amplitude,
    Offset,
    DutyCycle,
    Cycles,
    PhaseOffset,
    /// Shared by both channels.
    Run,
}

impl Attribute {
    pub const ALL: [Attribute; 8] = [
        Attribute::Mode,
        Attribute::Frequency,
        Attribute::Amplitude,
        Attribute::Offset,
        Attribute::DutyCycle,
        Attribute::Cycles,
        Attribute::PhaseOffset,
        Attribute::Run,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Attribute::Mode => "mode",
            Attribute::Frequency => "frequency",
            Attribute::Amplitude => "amplitude",
            Attribute::Offset => "offset",
            Attribute::DutyCycle => "duty_cycle",
            Attribute::Cycles => "cycles",
            Attribute::PhaseOffset => "phase_offset",
            Attribute::Run => "run",
        }
    }
}

impl Display for Attribute {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Attribute {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Attribute::ALL
            .into_iter()
            .find(|a| a.name() == s)
            .ok_or(Error::Malformed("attribute name"))
    }
}

/// Writes the attribute's current value and a newline to `out`.
pub fn show<R, Io, W>(
    engine: &WaveformEngine<R, Io>,
    channel: Channel,
    attribute: Attribute,
    out: &mut W,
) -> Result<(), Error>
where
    R: RawMutex,
    Io: RegisterIo,
    W: Write,
{
    match attribute {
        Attribute::Mode => writeln!(out, "{}", engine.mode(channel)?)?,
        Attribute::Frequency => writeln!(out, "{}", engine.frequency(channel)?)?,
        Attribute::Amplitude => writeln!(out, "{}", engine.amplitude(channel)?)?,
        Attribute::Offset => writeln!(out, "{}", engine.offset(channel)?)?,
        Attribute::DutyCycle => writeln!(out, "{}", engine.duty_cycle(channel)?)?,
        Attribute::Cycles => writeln!(out, "{}", engine.cycle_limit(channel)?)?,
        Attribute::PhaseOffset => writeln!(out, "{}", engine.phase_offset(channel)?)?,
        Attribute::Run => writeln!(out, "{}", u8::from(engine.is_running(channel)?))?,
    }
    Ok(())
}

/// Parses `input` and hands it to the attribute's setter. Nothing is written if
/// `input` does not parse.
pub fn store<R, Io>(
    engine: &WaveformEngine<R, Io>,
    channel: Channel,
    attribute: Attribute,
    input: &str,
) -> Result<(), Error>
where
    R: RawMutex,
    Io: RegisterIo,
{
    let input = input.trim();
    let malformed = Error::Malformed(attribute.name());
    match attribute {
        Attribute::Mode => engine.set_mode(channel, input.parse()?),
        Attribute::Frequency => {
            engine.set_frequency(channel, parse_unsigned(input).ok_or(malformed)?)
        }
        Attribute::Amplitude => {
            engine.set_amplitude(channel, parse_unsigned(input).ok_or(malformed)?)
        }
        Attribute::Offset => engine.set_offset(channel, parse_signed(input).ok_or(malformed)?),
        Attribute::DutyCycle => {
            engine.set_duty_cycle(channel, parse_unsigned(input).ok_or(malformed)?)
        }
        Attribute::Cycles => {
            let cycles = parse_unsigned(input)
                .and_then(|c| u16::try_from(c).ok())
                .ok_or(malformed)?;
            engine.set_cycle_limit(channel, cycles)
        }
        Attribute::PhaseOffset => {
            engine.set_phase_offset(channel, parse_signed(input).ok_or(malformed)?)
        }
        Attribute::Run => match input {
            "1" => engine.start(),
            "0" => engine.stop(),
            _ => Err(malformed),
        },
    }
}

/// Decimal, or hexadecimal with a `0x` prefix.
fn parse_unsigned(s: &str) -> Option<u32> {
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16).ok(),
        None => s.parse().ok(),
    }
}

fn parse_signed(s: &str) -> Option<i32> {
    let (negative, magnitude) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    if magnitude.starts_with(['+', '-']) {
        return None;
    }
    let magnitude = i64::from(parse_unsigned(magnitude)?);
    let value = if negative { -magnitude } else { magnitude };
    i32::try_from(value).ok()
}
