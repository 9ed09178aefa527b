use crate::units;
use eyre::Result;
use lock_api::RawMutex;
use std::io::Write;
use wavegen_common::engine::{ChannelState, WaveformEngine};
use wavegen_common::regs::RegisterIo;
use wavegen_common::{Channel, WaveformMode};

/// One line per channel, in human units.
pub fn describe(channel: Channel, state: &ChannelState) -> String {
    let run = if state.running { "running" } else { "stopped" };
    let cycles = match state.cycle_limit {
        0 => "continuous".to_string(),
        n => format!("{n} cycles"),
    };
    match state.mode {
        WaveformMode::Dc => format!(
            "{channel}: dc {:+.4} V, {run}",
            units::volts(i32::from(state.offset))
        ),
        mode => {
            let mut line = format!(
                "{channel}: {mode} {:.4} Hz, amplitude {:.4} V, offset {:+.4} V",
                units::hz(state.frequency),
                units::volts(i32::from(state.amplitude)),
                units::volts(i32::from(state.offset)),
            );
            if mode == WaveformMode::Square {
                line += &format!(", duty {:.2} %", units::percent(state.duty_cycle));
            }
            line += &format!(
                ", phase {:+.2} deg, {cycles}, {run}",
                units::degrees(state.phase_offset)
            );
            line
        }
    }
}

pub fn print<R, Io, W>(engine: &WaveformEngine<R, Io>, out: &mut W) -> Result<()>
where
    R: RawMutex,
    Io: RegisterIo,
    W: Write,
{
    for channel in Channel::BOTH {
        let state = engine.channel_state(channel)?;
        writeln!(out, "{}", describe(channel, &state))?;
    }
    Ok(())
}
