use crate::IoError;

/// Size of the register block, in bytes.
pub const SPAN_IN_BYTES: usize = 36;

/// Registers of the waveform generator; the discriminant is the byte offset.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[repr(usize)]
pub enum Register {
    Mode = 0,
    Run = 4,
    FreqA = 8,
    FreqB = 12,
    Offset = 16,
    Amplitude = 20,
    DutyCycle = 24,
    Cycles = 28,
    PhaseOffset = 32,
}
impl Register {
    pub const ALL: [Register; 9] = [
        Register::Mode,
        Register::Run,
        Register::FreqA,
        Register::FreqB,
        Register::Offset,
        Register::Amplitude,
        Register::DutyCycle,
        Register::Cycles,
        Register::PhaseOffset,
    ];

    pub const fn offset(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            Register::Mode => "MODE",
            Register::Run => "RUN",
            Register::FreqA => "FREQ_A",
            Register::FreqB => "FREQ_B",
            Register::Offset => "OFFSET",
            Register::Amplitude => "AMPLITUDE",
            Register::DutyCycle => "DTYCYC",
            Register::Cycles => "CYCLES",
            Register::PhaseOffset => "PHASE_OFFS",
        }
    }

    pub fn from_offset(offset: usize) -> Option<Register> {
        Register::ALL.into_iter().find(|r| r.offset() == offset)
    }
}

/// Word access to the register block, at byte offsets from its base.
///
/// Implemented over a `/dev/mem` mapping on the host and over an in-memory bank in
/// tests. Opening is the implementor's constructor, closing is its `Drop`.
pub trait RegisterIo {
    fn read32(&mut self, offset: usize) -> Result<u32, IoError>;
    fn write32(&mut self, offset: usize, value: u32) -> Result<(), IoError>;
}
impl<T: RegisterIo + ?Sized> RegisterIo for &mut T {
    fn read32(&mut self, offset: usize) -> Result<u32, IoError> {
        (**self).read32(offset)
    }

    fn write32(&mut self, offset: usize, value: u32) -> Result<(), IoError> {
        (**self).write32(offset, value)
    }
}

/// Rejects offsets that are not a word inside a block of `span` bytes.
pub const fn check_offset(offset: usize, span: usize) -> Result<(), IoError> {
    if offset % 4 != 0 {
        Err(IoError::Misaligned { offset })
    } else if offset >= span || span - offset < 4 {
        Err(IoError::OutOfSpan { offset })
    } else {
        Ok(())
    }
}

/// Named whole-register access. Nothing is cached: every call goes to the bus.
#[derive(Debug)]
pub struct RegisterMap<Io> {
    io: Option<Io>,
}
impl<Io: RegisterIo> RegisterMap<Io> {
    pub const fn new(io: Io) -> Self {
        Self { io: Some(io) }
    }

    pub fn is_open(&self) -> bool {
        self.io.is_some()
    }

    /// Releases the accessor; later reads and writes fail with [`IoError::NotMapped`].
    pub fn close(&mut self) -> Option<Io> {
        self.io.take()
    }

    fn io(&mut self) -> Result<&mut Io, IoError> {
        self.io.as_mut().ok_or(IoError::NotMapped)
    }

    pub fn read(&mut self, register: Register) -> Result<u32, IoError> {
        self.io()?.read32(register.offset())
    }

    pub fn write(&mut self, register: Register, value: u32) -> Result<(), IoError> {
        tracing::trace!("{} <- {value:#010x}", register.name());
        self.io()?.write32(register.offset(), value)
    }

    /// Reads `register`, writes back `f` of it, and returns the written value.
    pub fn modify<F: FnOnce(u32) -> u32>(
        &mut self,
        register: Register,
        f: F,
    ) -> Result<u32, IoError> {
        let value = f(self.read(register)?);
        self.write(register, value)?;
        Ok(value)
    }
}
