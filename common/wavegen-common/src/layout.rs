//! Every logical field is described once here. Channel A sits at shift 0 and
//! channel B at `stride`; fields that are not shared (frequency) name a separate
//! register per channel and use a stride of 0.

use crate::regs::Register;
use crate::Channel;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct FieldLayout {
    pub name: &'static str,
    /// Register holding the field for channel A and channel B.
    pub registers: [Register; 2],
    /// Width of one channel's field, in bits.
    pub width: u32,
    /// Distance between channel A's and channel B's field, in bits.
    pub stride: u32,
}

impl FieldLayout {
    pub const fn register(&self, channel: Channel) -> Register {
        self.registers[channel.index()]
    }

    pub const fn mask(&self) -> u32 {
        if self.width >= u32::BITS {
            u32::MAX
        } else {
            (1 << self.width) - 1
        }
    }

    pub const fn shift(&self, channel: Channel) -> u32 {
        self.stride * channel.index() as u32
    }

    /// `word` with `channel`'s bits of this field zeroed.
    pub const fn clear(&self, word: u32, channel: Channel) -> u32 {
        word & !(self.mask() << self.shift(channel))
    }

    /// `word` with `channel`'s bits of this field replaced by `value`.
    ///
    /// The clear uses the field's own mask, so the other channel's bits pass through.
    pub const fn insert(&self, word: u32, channel: Channel, value: u32) -> u32 {
        self.clear(word, channel) | ((value & self.mask()) << self.shift(channel))
    }

    pub const fn extract(&self, word: u32, channel: Channel) -> u32 {
        (word >> self.shift(channel)) & self.mask()
    }
}

pub const MODE: FieldLayout = FieldLayout {
    name: "mode",
    registers: [Register::Mode, Register::Mode],
    width: 3,
    stride: 3,
};
pub const RUN: FieldLayout = FieldLayout {
    name: "run",
    registers: [Register::Run, Register::Run],
    width: 1,
    stride: 1,
};
pub const FREQUENCY: FieldLayout = FieldLayout {
    name: "frequency",
    registers: [Register::FreqA, Register::FreqB],
    width: 32,
    stride: 0,
};
pub const OFFSET: FieldLayout = FieldLayout {
    name: "offset",
    registers: [Register::Offset, Register::Offset],
    width: 16,
    stride: 16,
};
pub const AMPLITUDE: FieldLayout = FieldLayout {
    name: "amplitude",
    registers: [Register::Amplitude, Register::Amplitude],
    width: 16,
    stride: 16,
};
pub const DUTY_CYCLE: FieldLayout = FieldLayout {
    name: "duty_cycle",
    registers: [Register::DutyCycle, Register::DutyCycle],
    width: 16,
    stride: 16,
};
pub const CYCLES: FieldLayout = FieldLayout {
    name: "cycles",
    registers: [Register::Cycles, Register::Cycles],
    width: 16,
    stride: 16,
};
pub const PHASE_OFFSET: FieldLayout = FieldLayout {
    name: "phase_offset",
    registers: [Register::PhaseOffset, Register::PhaseOffset],
    width: 16,
    stride: 16,
};

pub const ALL: [FieldLayout; 8] = [
    MODE,
    RUN,
    FREQUENCY,
    OFFSET,
    AMPLITUDE,
    DUTY_CYCLE,
    CYCLES,
    PHASE_OFFSET,
];

/// Run bit of channel A.
pub const RUN_A: u32 = RUN.mask() << RUN.shift(Channel::A);
/// Run bit of channel B.
pub const RUN_B: u32 = RUN.mask() << RUN.shift(Channel::B);

/// Two's complement bits of a signed 16-bit field.
pub const fn from_signed16(value: i16) -> u32 {
    value as u16 as u32
}

/// Sign-extends the low 16 bits of an extracted field.
pub const fn to_signed16(raw: u32) -> i16 {
    raw as u16 as i16
}
