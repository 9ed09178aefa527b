use crate::regs::{check_offset, Register, RegisterIo, SPAN_IN_BYTES};
use crate::IoError;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::vec::Vec;

#[derive(Debug, Default)]
struct Bank {
    words: [u32; SPAN_IN_BYTES / 4],
    writes: Vec<(Register, u32)>,
}

/// Register bank held in memory. Clones share the same bank, so a test can hand
/// one clone to the engine and inspect the other.
#[derive(Debug, Clone, Default)]
pub struct MockRegisters {
    bank: Arc<Mutex<Bank>>,
}

impl MockRegisters {
    pub fn new() -> Self {
        Self::default()
    }

    fn bank(&self) -> MutexGuard<'_, Bank> {
        self.bank.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current contents of `register`, without going through [`RegisterIo`].
    pub fn peek(&self, register: Register) -> u32 {
        self.bank().words[register.offset() / 4]
    }

    /// Sets `register` as the hardware would, without logging a bus write.
    pub fn poke(&self, register: Register, value: u32) {
        self.bank().words[register.offset() / 4] = value;
    }

    /// Every write issued through [`RegisterIo`], oldest first.
    pub fn writes(&self) -> Vec<(Register, u32)> {
        self.bank().writes.clone()
    }

    pub fn clear_writes(&self) {
        self.bank().writes.clear();
    }
}

impl RegisterIo for MockRegisters {
    fn read32(&mut self, offset: usize) -> Result<u32, IoError> {
        check_offset(offset, SPAN_IN_BYTES)?;
        Ok(self.bank().words[offset / 4])
    }

    fn write32(&mut self, offset: usize, value: u32) -> Result<(), IoError> {
        check_offset(offset, SPAN_IN_BYTES)?;
        let register = Register::from_offset(offset).ok_or(IoError::OutOfSpan { offset })?;
        let mut bank = self.bank();
        bank.words[offset / 4] = value;
        bank.writes.push((register, value));
        Ok(())
    }
}
