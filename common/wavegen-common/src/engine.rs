use crate::layout::{self, from_signed16, to_signed16, FieldLayout, RUN_A, RUN_B};
use crate::regs::{Register, RegisterIo, RegisterMap};
use crate::{
    Channel, Error, ModeError, WaveformMode, AMPLITUDE_MAX, DUTY_CYCLE_MAX, FREQUENCY_MAX,
    OFFSET_LIMIT, PHASE_OFFSET_LIMIT,
};
use lock_api::{Mutex, MutexGuard, RawMutex};

/// Requested waveform parameters, in device units.
///
/// Fields are wider than their registers so that out-of-range requests can be
/// represented; [`clamp`](WaveformParameters::clamp) brings them into range.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub struct WaveformParameters {
    /// Units of 100 µHz.
    pub frequency: u32,
    /// Units of 100 µV.
    pub amplitude: u32,
    /// Units of 100 µV.
    pub offset: i32,
    /// `0..=65535` spans 0 to 100 %.
    pub duty_cycle: u32,
    /// Units of 0.01°.
    pub phase_offset: i32,
}

/// [`WaveformParameters`] after validation, at register width.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ClampedParameters {
    pub frequency: u32,
    pub amplitude: u16,
    pub offset: i16,
    pub duty_cycle: u16,
    pub phase_offset: i16,
}

impl WaveformParameters {
    /// Rejects a frequency above [`FREQUENCY_MAX`] and saturates every other field
    /// to its device range, the way the peripheral itself would.
    pub fn clamp(&self) -> Result<ClampedParameters, Error> {
        Ok(ClampedParameters {
            frequency: check_frequency(self.frequency)?,
            amplitude: clamp_amplitude(self.amplitude),
            offset: clamp_offset(self.offset),
            duty_cycle: clamp_duty_cycle(self.duty_cycle),
            phase_offset: clamp_phase_offset(self.phase_offset),
        })
    }
}

/// Frequency has no natural ceiling to saturate to, so an excess is an error.
pub fn check_frequency(frequency: u32) -> Result<u32, Error> {
    if frequency > FREQUENCY_MAX {
        Err(Error::InvalidFrequency(frequency))
    } else {
        Ok(frequency)
    }
}

pub fn clamp_amplitude(amplitude: u32) -> u16 {
    amplitude.min(u32::from(AMPLITUDE_MAX)) as u16
}

pub fn clamp_offset(offset: i32) -> i16 {
    let limit = i32::from(OFFSET_LIMIT);
    offset.clamp(-limit, limit) as i16
}

pub fn clamp_duty_cycle(duty_cycle: u32) -> u16 {
    duty_cycle.min(u32::from(DUTY_CYCLE_MAX)) as u16
}

pub fn clamp_phase_offset(phase_offset: i32) -> i16 {
    let limit = i32::from(PHASE_OFFSET_LIMIT);
    phase_offset.clamp(-limit, limit) as i16
}

/// Periodic waveform for one channel.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct WaveformRequest {
    pub channel: Channel,
    pub mode: WaveformMode,
    pub parameters: WaveformParameters,
}

/// Constant level for one channel, in units of 100 µV.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct DcRequest {
    pub channel: Channel,
    pub offset: i32,
}

/// Every field of one channel as currently held by the hardware.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ChannelState {
    pub mode: WaveformMode,
    pub frequency: u32,
    pub amplitude: u16,
    pub offset: i16,
    pub duty_cycle: u16,
    pub phase_offset: i16,
    pub cycle_limit: u16,
    pub running: bool,
}

/// Fields zeroed before a channel takes a new periodic waveform. Mode goes first so
/// the channel idles at DC while its parameters are rewritten.
const RESET_FIELDS: [FieldLayout; 6] = [
    layout::MODE,
    layout::FREQUENCY,
    layout::OFFSET,
    layout::AMPLITUDE,
    layout::DUTY_CYCLE,
    layout::PHASE_OFFSET,
];

fn read_field<Io: RegisterIo>(
    registers: &mut RegisterMap<Io>,
    field: &FieldLayout,
    channel: Channel,
) -> Result<u32, Error> {
    let word = registers.read(field.register(channel))?;
    Ok(field.extract(word, channel))
}

fn write_field<Io: RegisterIo>(
    registers: &mut RegisterMap<Io>,
    field: &FieldLayout,
    channel: Channel,
    value: u32,
) -> Result<(), Error> {
    registers.modify(field.register(channel), |word| {
        field.insert(word, channel, value)
    })?;
    Ok(())
}

fn clear_field<Io: RegisterIo>(
    registers: &mut RegisterMap<Io>,
    field: &FieldLayout,
    channel: Channel,
) -> Result<(), Error> {
    registers.modify(field.register(channel), |word| field.clear(word, channel))?;
    Ok(())
}

/// Channel-scoped configuration of one waveform generator.
///
/// The hardware registers are the only state: getters re-read them, setters
/// read-modify-write them. Every operation holds the device lock from its first
/// register access to its last, and all validation happens before the first write,
/// so a rejected request leaves the hardware untouched. Writes that did happen are
/// not rolled back if a later one fails.
pub struct WaveformEngine<R, Io> {
    registers: Mutex<R, RegisterMap<Io>>,
}

impl<R: RawMutex, Io: RegisterIo> WaveformEngine<R, Io> {
    pub fn new(registers: RegisterMap<Io>) -> Self {
        Self {
            registers: Mutex::new(registers),
        }
    }

    pub fn from_io(io: Io) -> Self {
        Self::new(RegisterMap::new(io))
    }

    fn lock(&self) -> MutexGuard<'_, R, RegisterMap<Io>> {
        self.registers.lock()
    }

    /// Unmaps the register block; every later operation fails with
    /// [`IoError::NotMapped`](crate::IoError::NotMapped).
    pub fn close(&self) -> Option<Io> {
        self.lock().close()
    }

    /// Switches `channel` to a constant level. Only the Mode and Offset fields are
    /// touched; the hardware ignores the others in DC mode.
    pub fn configure_dc(&self, request: &DcRequest) -> Result<(), Error> {
        let channel = request.channel;
        let offset = clamp_offset(request.offset);
        let mut guard = self.lock();
        let registers = &mut *guard;
        write_field(registers, &layout::OFFSET, channel, from_signed16(offset))?;
        write_field(
            registers,
            &layout::MODE,
            channel,
            WaveformMode::Dc.code(),
        )?;
        tracing::debug!("channel {channel}: dc, offset {offset}");
        Ok(())
    }

    /// Resets every mode-dependent field of the channel, then programs the new
    /// waveform. The cycle limit is left as it was.
    pub fn configure_waveform(&self, request: &WaveformRequest) -> Result<(), Error> {
        let WaveformRequest {
            channel,
            mode,
            parameters,
        } = *request;
        if !mode.is_periodic() {
            return Err(ModeError::NotPeriodic(mode).into());
        }
        let values = parameters.clamp()?;

        let mut guard = self.lock();
        let registers = &mut *guard;
        for field in &RESET_FIELDS {
            clear_field(registers, field, channel)?;
        }
        write_field(registers, &layout::FREQUENCY, channel, values.frequency)?;
        write_field(
            registers,
            &layout::AMPLITUDE,
            channel,
            u32::from(values.amplitude),
        )?;
        write_field(
            registers,
            &layout::OFFSET,
            channel,
            from_signed16(values.offset),
        )?;
        write_field(
            registers,
            &layout::DUTY_CYCLE,
            channel,
            u32::from(values.duty_cycle),
        )?;
        write_field(
            registers,
            &layout::PHASE_OFFSET,
            channel,
            from_signed16(values.phase_offset),
        )?;
        write_field(registers, &layout::MODE, channel, mode.code())?;
        tracing::debug!("channel {channel}: {mode} {values:?}");
        Ok(())
    }

    /// Zero runs the channel until stopped.
    pub fn set_cycle_limit(&self, channel: Channel, cycles: u16) -> Result<(), Error> {
        write_field(&mut *self.lock(), &layout::CYCLES, channel, u32::from(cycles))?;
        tracing::debug!("channel {channel}: cycle limit {cycles}");
        Ok(())
    }

    pub fn cycle_limit(&self, channel: Channel) -> Result<u16, Error> {
        Ok(read_field(&mut *self.lock(), &layout::CYCLES, channel)? as u16)
    }

    /// Starts both channels with a single write, so they begin on the same clock edge.
    pub fn start(&self) -> Result<(), Error> {
        self.lock().modify(Register::Run, |word| word | RUN_A | RUN_B)?;
        tracing::debug!("run");
        Ok(())
    }

    /// Clears RUN_A and RUN_B; any other bit of the Run register is preserved.
    pub fn stop(&self) -> Result<(), Error> {
        self.lock().modify(Register::Run, |word| word & !(RUN_A | RUN_B))?;
        tracing::debug!("stop");
        Ok(())
    }

    pub fn set_running(&self, running: bool) -> Result<(), Error> {
        if running {
            self.start()
        } else {
            self.stop()
        }
    }

    pub fn is_running(&self, channel: Channel) -> Result<bool, Error> {
        Ok(read_field(&mut *self.lock(), &layout::RUN, channel)? != 0)
    }

    pub fn mode(&self, channel: Channel) -> Result<WaveformMode, Error> {
        let code = read_field(&mut *self.lock(), &layout::MODE, channel)?;
        Ok(WaveformMode::try_from(code)?)
    }

    /// Writes the Mode field alone. Use [`configure_waveform`](Self::configure_waveform)
    /// to switch waveforms with a full reset.
    pub fn set_mode(&self, channel: Channel, mode: WaveformMode) -> Result<(), Error> {
        write_field(&mut *self.lock(), &layout::MODE, channel, mode.code())
    }

    pub fn frequency(&self, channel: Channel) -> Result<u32, Error> {
        read_field(&mut *self.lock(), &layout::FREQUENCY, channel)
    }

    pub fn set_frequency(&self, channel: Channel, frequency: u32) -> Result<(), Error> {
        let frequency = check_frequency(frequency)?;
        write_field(&mut *self.lock(), &layout::FREQUENCY, channel, frequency)
    }

    pub fn amplitude(&self, channel: Channel) -> Result<u16, Error> {
        Ok(read_field(&mut *self.lock(), &layout::AMPLITUDE, channel)? as u16)
    }

    pub fn set_amplitude(&self, channel: Channel, amplitude: u32) -> Result<(), Error> {
        let amplitude = u32::from(clamp_amplitude(amplitude));
        write_field(&mut *self.lock(), &layout::AMPLITUDE, channel, amplitude)
    }

    pub fn offset(&self, channel: Channel) -> Result<i16, Error> {
        Ok(to_signed16(read_field(
            &mut *self.lock(),
            &layout::OFFSET,
            channel,
        )?))
    }

    pub fn set_offset(&self, channel: Channel, offset: i32) -> Result<(), Error> {
        let offset = from_signed16(clamp_offset(offset));
        write_field(&mut *self.lock(), &layout::OFFSET, channel, offset)
    }

    pub fn duty_cycle(&self, channel: Channel) -> Result<u16, Error> {
        Ok(read_field(&mut *self.lock(), &layout::DUTY_CYCLE, channel)? as u16)
    }

    pub fn set_duty_cycle(&self, channel: Channel, duty_cycle: u32) -> Result<(), Error> {
        let duty_cycle = u32::from(clamp_duty_cycle(duty_cycle));
        write_field(&mut *self.lock(), &layout::DUTY_CYCLE, channel, duty_cycle)
    }

    pub fn phase_offset(&self, channel: Channel) -> Result<i16, Error> {
        Ok(to_signed16(read_field(
            &mut *self.lock(),
            &layout::PHASE_OFFSET,
            channel,
        )?))
    }

    pub fn set_phase_offset(&self, channel: Channel, phase_offset: i32) -> Result<(), Error> {
        let phase_offset = from_signed16(clamp_phase_offset(phase_offset));
        write_field(&mut *self.lock(), &layout::PHASE_OFFSET, channel, phase_offset)
    }

    /// Reads every field of `channel` under one acquisition of the lock.
    pub fn channel_state(&self, channel: Channel) -> Result<ChannelState, Error> {
        let mut registers = self.lock();
        let registers = &mut *registers;
        Ok(ChannelState {
            mode: WaveformMode::try_from(read_field(registers, &layout::MODE, channel)?)?,
            frequency: read_field(registers, &layout::FREQUENCY, channel)?,
            amplitude: read_field(registers, &layout::AMPLITUDE, channel)? as u16,
            offset: to_signed16(read_field(registers, &layout::OFFSET, channel)?),
            duty_cycle: read_field(registers, &layout::DUTY_CYCLE, channel)? as u16,
            phase_offset: to_signed16(read_field(registers, &layout::PHASE_OFFSET, channel)?),
            cycle_limit: read_field(registers, &layout::CYCLES, channel)? as u16,
            running: read_field(registers, &layout::RUN, channel)? != 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockRegisters;
    use crate::sync::RawSpinLock;
    use crate::IoError;
    use proptest::prelude::*;

    type TestEngine = WaveformEngine<RawSpinLock, MockRegisters>;

    fn engine() -> (TestEngine, MockRegisters) {
        let bank = MockRegisters::new();
        (WaveformEngine::from_io(bank.clone()), bank)
    }

    fn request(
        channel: Channel,
        mode: WaveformMode,
        parameters: WaveformParameters,
    ) -> WaveformRequest {
        WaveformRequest {
            channel,
            mode,
            parameters,
        }
    }

    const SQUARE: WaveformParameters = WaveformParameters {
        frequency: 10_000_000,
        amplitude: 12_000,
        offset: -3_000,
        duty_cycle: 30_000,
        phase_offset: -9_000,
    };

    #[test]
    fn waveform_reads_back() {
        let (engine, _) = engine();
        engine
            .configure_waveform(&request(Channel::B, WaveformMode::Square, SQUARE))
            .expect("configure should succeed");
        let state = engine.channel_state(Channel::B).expect("read back");
        assert_eq!(
            state,
            ChannelState {
                mode: WaveformMode::Square,
                frequency: 10_000_000,
                amplitude: 12_000,
                offset: -3_000,
                duty_cycle: 30_000,
                phase_offset: -9_000,
                cycle_limit: 0,
                running: false,
            }
        );
        assert_eq!(engine.frequency(Channel::B), Ok(10_000_000));
        assert_eq!(engine.offset(Channel::B), Ok(-3_000));
        assert_eq!(engine.phase_offset(Channel::B), Ok(-9_000));
        assert_eq!(engine.frequency(Channel::A), Ok(0));
    }

    #[test]
    fn reset_precedes_programming() {
        let (engine, bank) = engine();
        for register in Register::ALL {
            bank.poke(register, u32::MAX);
        }
        engine
            .configure_waveform(&request(Channel::A, WaveformMode::Sine, SQUARE))
            .expect("configure should succeed");
        let writes = bank.writes();
        let cleared: Vec<Register> = writes[..6].iter().map(|(r, _)| *r).collect();
        assert_eq!(
            cleared,
            vec![
                Register::Mode,
                Register::FreqA,
                Register::Offset,
                Register::Amplitude,
                Register::DutyCycle,
                Register::PhaseOffset,
            ]
        );
        assert_eq!(writes[0].1, !0b111);
        assert_eq!(writes[1].1, 0);
        for (_, value) in &writes[2..6] {
            assert_eq!(*value, 0xffff_0000);
        }
        assert_eq!(writes.last(), Some(&(Register::Mode, !0b111 | 1)));
        assert_eq!(bank.peek(Register::FreqB), u32::MAX);
        assert_eq!(bank.peek(Register::Cycles), u32::MAX);
    }

    #[test]
    fn mode_switch_drops_duty_cycle() {
        let (engine, _) = engine();
        engine
            .configure_waveform(&request(Channel::A, WaveformMode::Square, SQUARE))
            .expect("square");
        let sine = WaveformParameters {
            duty_cycle: 0,
            ..SQUARE
        };
        engine
            .configure_waveform(&request(Channel::A, WaveformMode::Sine, sine))
            .expect("sine");
        engine
            .set_mode(Channel::A, WaveformMode::Square)
            .expect("back to square");
        assert_eq!(engine.mode(Channel::A), Ok(WaveformMode::Square));
        assert_eq!(engine.duty_cycle(Channel::A), Ok(0));
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let (engine, _) = engine();
        let parameters = WaveformParameters {
            frequency: 100,
            amplitude: 25_000,
            offset: -25_000,
            duty_cycle: 200_000,
            phase_offset: 20_000,
        };
        engine
            .configure_waveform(&request(Channel::A, WaveformMode::Square, parameters))
            .expect("clamped values are accepted");
        let state = engine.channel_state(Channel::A).expect("read back");
        assert_eq!(state.frequency, 100);
        assert_eq!(state.amplitude, 25_000);
        assert_eq!(state.offset, -25_000);
        assert_eq!(state.duty_cycle, 65_535);
        assert_eq!(state.phase_offset, 18_000);

        let parameters = WaveformParameters {
            frequency: FREQUENCY_MAX,
            amplitude: 90_000,
            offset: -40_000,
            duty_cycle: 0,
            phase_offset: -20_000,
        };
        engine
            .configure_waveform(&request(Channel::A, WaveformMode::Triangle, parameters))
            .expect("clamped values are accepted");
        let state = engine.channel_state(Channel::A).expect("read back");
        assert_eq!(state.frequency, FREQUENCY_MAX);
        assert_eq!(state.amplitude, 25_000);
        assert_eq!(state.offset, -25_000);
        assert_eq!(state.phase_offset, -18_000);
    }

    #[test]
    fn excessive_frequency_changes_nothing() {
        let (engine, bank) = engine();
        engine
            .configure_waveform(&request(Channel::A, WaveformMode::Square, SQUARE))
            .expect("square");
        let before = engine.channel_state(Channel::A).expect("read back");
        bank.clear_writes();

        let parameters = WaveformParameters {
            frequency: 500_000_001,
            ..SQUARE
        };
        assert_eq!(
            engine.configure_waveform(&request(Channel::A, WaveformMode::Sine, parameters)),
            Err(Error::InvalidFrequency(500_000_001))
        );
        assert_eq!(
            engine.set_frequency(Channel::A, 500_000_001),
            Err(Error::InvalidFrequency(500_000_001))
        );
        assert!(bank.writes().is_empty());
        assert_eq!(engine.channel_state(Channel::A), Ok(before));
    }

    #[test]
    fn dc_is_not_a_periodic_waveform() {
        let (engine, bank) = engine();
        assert_eq!(
            engine.configure_waveform(&request(Channel::B, WaveformMode::Dc, SQUARE)),
            Err(Error::InvalidMode(ModeError::NotPeriodic(WaveformMode::Dc)))
        );
        assert!(bank.writes().is_empty());
    }

    #[test]
    fn dc_touches_mode_and_offset_only() {
        let (engine, bank) = engine();
        engine
            .configure_waveform(&request(Channel::B, WaveformMode::Sawtooth, SQUARE))
            .expect("sawtooth");
        bank.clear_writes();
        engine
            .configure_dc(&DcRequest {
                channel: Channel::B,
                offset: 30_000,
            })
            .expect("dc");
        let touched: Vec<Register> = bank.writes().iter().map(|(r, _)| *r).collect();
        assert_eq!(touched, vec![Register::Offset, Register::Mode]);
        let state = engine.channel_state(Channel::B).expect("read back");
        assert_eq!(state.mode, WaveformMode::Dc);
        assert_eq!(state.offset, 25_000);
        assert_eq!(state.amplitude, 12_000);
        assert_eq!(engine.mode(Channel::A), Ok(WaveformMode::Dc));
    }

    #[test]
    fn cycle_limit_is_idempotent() {
        let (engine, _) = engine();
        engine.set_cycle_limit(Channel::B, 7).expect("cycles b");
        engine.set_cycle_limit(Channel::A, 0).expect("cycles a");
        engine.set_cycle_limit(Channel::A, 0).expect("cycles a again");
        assert_eq!(engine.cycle_limit(Channel::A), Ok(0));
        assert_eq!(engine.cycle_limit(Channel::B), Ok(7));
        engine.set_cycle_limit(Channel::A, u16::MAX).expect("cycles a");
        assert_eq!(engine.cycle_limit(Channel::A), Ok(u16::MAX));
        assert_eq!(engine.cycle_limit(Channel::B), Ok(7));
    }

    #[test]
    fn start_is_one_write() {
        let (engine, bank) = engine();
        engine.start().expect("start");
        assert_eq!(bank.writes(), vec![(Register::Run, RUN_A | RUN_B)]);
        assert_eq!(engine.is_running(Channel::A), Ok(true));
        assert_eq!(engine.is_running(Channel::B), Ok(true));
    }

    #[test]
    fn stop_clears_run_bits_only() {
        let (engine, bank) = engine();
        bank.poke(Register::Run, 0xf000_00f0 | RUN_A | RUN_B);
        engine.set_running(false).expect("stop");
        assert_eq!(bank.peek(Register::Run), 0xf000_00f0);
        assert_eq!(engine.is_running(Channel::A), Ok(false));
        assert_eq!(engine.is_running(Channel::B), Ok(false));
        engine.set_running(true).expect("start");
        assert_eq!(bank.peek(Register::Run), 0xf000_00f3);
    }

    #[test]
    fn unknown_mode_code_is_reported() {
        let (engine, bank) = engine();
        bank.poke(Register::Mode, 6 << 3);
        assert_eq!(engine.mode(Channel::A), Ok(WaveformMode::Dc));
        assert_eq!(
            engine.mode(Channel::B),
            Err(Error::InvalidMode(ModeError::Code(6)))
        );
        assert!(engine.channel_state(Channel::B).is_err());
    }

    #[test]
    fn closed_engine_fails() {
        let (engine, _) = engine();
        assert!(engine.close().is_some());
        assert_eq!(engine.start(), Err(Error::Io(IoError::NotMapped)));
        assert_eq!(
            engine.amplitude(Channel::A),
            Err(Error::Io(IoError::NotMapped))
        );
        assert!(engine.close().is_none());
    }

    fn any_channel() -> impl Strategy<Value = Channel> {
        prop_oneof![Just(Channel::A), Just(Channel::B)]
    }

    fn any_periodic_mode() -> impl Strategy<Value = WaveformMode> {
        prop_oneof![
            Just(WaveformMode::Sine),
            Just(WaveformMode::Sawtooth),
            Just(WaveformMode::Triangle),
            Just(WaveformMode::Square),
            Just(WaveformMode::Arbitrary),
        ]
    }

    fn any_parameters() -> impl Strategy<Value = WaveformParameters> {
        (
            0..=FREQUENCY_MAX,
            any::<u32>(),
            any::<i32>(),
            any::<u32>(),
            any::<i32>(),
        )
            .prop_map(
                |(frequency, amplitude, offset, duty_cycle, phase_offset)| WaveformParameters {
                    frequency,
                    amplitude,
                    offset,
                    duty_cycle,
                    phase_offset,
                },
            )
    }

    proptest! {
        #[test]
        fn operations_leave_other_channel_alone(
            channel in any_channel(),
            other_mode in any_periodic_mode(),
            other in any_parameters(),
            other_cycles in any::<u16>(),
            mode in any_periodic_mode(),
            parameters in any_parameters(),
            cycles in any::<u16>(),
            op in 0usize..9,
        ) {
            let (engine, _) = engine();
            let other_channel = channel.other();
            engine.configure_waveform(&request(other_channel, other_mode, other)).unwrap();
            engine.set_cycle_limit(other_channel, other_cycles).unwrap();
            let before = engine.channel_state(other_channel).unwrap();

            match op {
                0 => engine.configure_waveform(&request(channel, mode, parameters)).unwrap(),
                1 => {
                    let dc = DcRequest { channel, offset: parameters.offset };
                    engine.configure_dc(&dc).unwrap()
                }
                2 => engine.set_cycle_limit(channel, cycles).unwrap(),
                3 => engine.set_amplitude(channel, parameters.amplitude).unwrap(),
                4 => engine.set_offset(channel, parameters.offset).unwrap(),
                5 => engine.set_duty_cycle(channel, parameters.duty_cycle).unwrap(),
                6 => engine.set_phase_offset(channel, parameters.phase_offset).unwrap(),
                7 => engine.set_frequency(channel, parameters.frequency).unwrap(),
                _ => engine.set_mode(channel, mode).unwrap(),
            }

            prop_assert_eq!(engine.channel_state(other_channel).unwrap(), before);
        }

        #[test]
        fn read_back_matches_clamped_request(
            channel in any_channel(),
            mode in any_periodic_mode(),
            parameters in any_parameters(),
        ) {
            let (engine, _) = engine();
            engine.configure_waveform(&request(channel, mode, parameters)).unwrap();
            let expected = parameters.clamp().unwrap();
            let state = engine.channel_state(channel).unwrap();
            prop_assert_eq!(state.mode, mode);
            prop_assert_eq!(state.frequency, expected.frequency);
            prop_assert_eq!(state.amplitude, expected.amplitude);
            prop_assert_eq!(state.offset, expected.offset);
            prop_assert_eq!(state.duty_cycle, expected.duty_cycle);
            prop_assert_eq!(state.phase_offset, expected.phase_offset);
        }
    }
}
