use crate::args::{AttrCommand, Command, WaveArgs};
use crate::{status, units};
use eyre::Result;
use lock_api::RawMutex;
use std::io::Write;
use wavegen_common::attr;
use wavegen_common::engine::{DcRequest, WaveformEngine, WaveformParameters, WaveformRequest};
use wavegen_common::regs::RegisterIo;
use wavegen_common::WaveformMode;

/// Duty cycle a square wave gets when none is given, in percent.
const DEFAULT_SQUARE_DUTY_CYCLE: f64 = 50.0;

/// Converts the human units of a waveform command into a request. Nothing here
/// touches the hardware, so a bad argument aborts before any register write.
pub fn waveform_request(mode: WaveformMode, wave: &WaveArgs) -> Result<WaveformRequest> {
    let duty_cycle = match (wave.duty_cycle, mode) {
        (Some(percent), _) => percent,
        (None, WaveformMode::Square) => DEFAULT_SQUARE_DUTY_CYCLE,
        (None, _) => 0.0,
    };
    Ok(WaveformRequest {
        channel: wave.channel,
        mode,
        parameters: WaveformParameters {
            frequency: units::frequency_from_hz(wave.frequency)?,
            amplitude: units::amplitude_from_volts(wave.amplitude)?,
            offset: units::offset_from_volts(wave.offset.unwrap_or(0.0))?,
            duty_cycle: units::duty_cycle_from_percent(duty_cycle)?,
            phase_offset: units::phase_from_degrees(wave.phase_offset.unwrap_or(0.0))?,
        },
    })
}

pub fn execute<R, Io, W>(
    engine: &WaveformEngine<R, Io>,
    command: &Command,
    out: &mut W,
) -> Result<()>
where
    R: RawMutex,
    Io: RegisterIo,
    W: Write,
{
    match command {
        Command::Run => engine.start()?,
        Command::Stop => engine.stop()?,
        Command::Dc { channel, offset } => engine.configure_dc(&DcRequest {
            channel: *channel,
            offset: units::offset_from_volts(*offset)?,
        })?,
        Command::Cycles { channel, count } => {
            tracing::info!("channel {channel}: {count}");
            engine.set_cycle_limit(*channel, count.cycles())?
        }
        Command::Sine(wave) => configure(engine, WaveformMode::Sine, wave)?,
        Command::Sawtooth(wave) => configure(engine, WaveformMode::Sawtooth, wave)?,
        Command::Triangle(wave) => configure(engine, WaveformMode::Triangle, wave)?,
        Command::Square(wave) => configure(engine, WaveformMode::Square, wave)?,
        Command::Status => status::print(engine, out)?,
        Command::Attr(AttrCommand::Show { channel, attribute }) => {
            let mut text = String::new();
            attr::show(engine, *channel, *attribute, &mut text)?;
            out.write_all(text.as_bytes())?;
        }
        Command::Attr(AttrCommand::Store {
            channel,
            attribute,
            value,
        }) => attr::store(engine, *channel, *attribute, value)?,
    }
    Ok(())
}

fn configure<R: RawMutex, Io: RegisterIo>(
    engine: &WaveformEngine<R, Io>,
    mode: WaveformMode,
    wave: &WaveArgs,
) -> Result<()> {
    let request = waveform_request(mode, wave)?;
    tracing::info!(
        "channel {}: {mode} at {} Hz",
        request.channel,
        wave.frequency
    );
    engine.configure_waveform(&request)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::Args;
    use clap::Parser;
    use wavegen_common::mock::MockRegisters;
    use wavegen_common::sync::RawSpinLock;
    use wavegen_common::{Channel, Error};

    type TestEngine = WaveformEngine<RawSpinLock, MockRegisters>;

    fn engine() -> (TestEngine, MockRegisters) {
        let bank = MockRegisters::new();
        (WaveformEngine::from_io(bank.clone()), bank)
    }

    fn run(engine: &TestEngine, line: &[&str]) -> Result<String> {
        let args = Args::try_parse_from(std::iter::once("wavegen").chain(line.iter().copied()))?;
        let mut out = Vec::new();
        execute(engine, &args.command, &mut out)?;
        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn square_defaults() {
        let (engine, _) = engine();
        run(&engine, &["square", "a", "1000", "1.2"]).expect("square");
        let state = engine.channel_state(Channel::A).expect("read back");
        assert_eq!(state.mode, WaveformMode::Square);
        assert_eq!(state.frequency, 10_000_000);
        assert_eq!(state.amplitude, 12_000);
        assert_eq!(state.offset, 0);
        assert_eq!(state.duty_cycle, 32_768);
        assert_eq!(state.phase_offset, 0);
    }

    #[test]
    fn sine_with_everything() {
        let (engine, _) = engine();
        run(&engine, &["sine", "B", "440", "3", "-0.5", "10", "200"]).expect("sine");
        let state = engine.channel_state(Channel::B).expect("read back");
        assert_eq!(state.mode, WaveformMode::Sine);
        assert_eq!(state.frequency, 4_400_000);
        assert_eq!(state.amplitude, 25_000);
        assert_eq!(state.offset, -5_000);
        assert_eq!(state.duty_cycle, 6_554);
        assert_eq!(state.phase_offset, 18_000);
    }

    #[test]
    fn negative_duty_cycle_clamps_to_zero() {
        let (engine, _) = engine();
        run(&engine, &["square", "a", "1000", "1", "0", "-10"]).expect("square");
        assert_eq!(engine.duty_cycle(Channel::A), Ok(0));
        assert_eq!(engine.mode(Channel::A), Ok(WaveformMode::Square));
    }

    #[test]
    fn too_fast_is_rejected_before_writing() {
        let (engine, bank) = engine();
        let err = run(&engine, &["triangle", "a", "60000", "1"]).expect_err("too fast");
        assert_eq!(
            err.downcast_ref::<Error>(),
            Some(&Error::InvalidFrequency(600_000_000))
        );
        assert!(bank.writes().is_empty());
    }

    #[test]
    fn run_dc_cycles_and_status() {
        let (engine, _) = engine();
        run(&engine, &["dc", "a", "-0.75"]).expect("dc");
        run(&engine, &["cycles", "b", "4"]).expect("cycles");
        run(&engine, &["sawtooth", "b", "10", "1"]).expect("sawtooth");
        run(&engine, &["run"]).expect("run");
        let status = run(&engine, &["status"]).expect("status");
        let lines: Vec<&str> = status.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "A: dc -0.7500 V, running");
        assert!(lines[1].starts_with("B: sawtooth 10.0000 Hz"), "{}", lines[1]);
        assert!(lines[1].ends_with("4 cycles, running"), "{}", lines[1]);

        run(&engine, &["stop"]).expect("stop");
        assert_eq!(engine.is_running(Channel::B), Ok(false));
        run(&engine, &["cycles", "b", "continuous"]).expect("cycles");
        assert_eq!(engine.cycle_limit(Channel::B), Ok(0));
    }

    #[test]
    fn attributes() {
        let (engine, _) = engine();
        run(&engine, &["attr", "store", "b", "offset", "-300"]).expect("store");
        assert_eq!(run(&engine, &["attr", "show", "b", "offset"]).expect("show"), "-300\n");
        assert!(run(&engine, &["attr", "store", "b", "offset", "low"]).is_err());
    }
}
