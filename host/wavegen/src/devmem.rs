use eyre::{eyre, Context, Result};
use libc::c_void;
use nix::sys::mman::{mmap, munmap, MapFlags, ProtFlags};
use std::fs::OpenOptions;
use std::num::NonZeroUsize;
use std::os::unix::fs::OpenOptionsExt;
use std::path::Path;
use std::ptr::NonNull;
use wavegen_common::regs::{check_offset, RegisterIo, SPAN_IN_BYTES};
use wavegen_common::IoError;

/// Register block mapped out of a physical memory device such as `/dev/mem`.
///
/// The mapping is released when this is dropped.
#[derive(Debug)]
pub struct DevMem {
    mapping: NonNull<c_void>,
    mapping_len: usize,
    registers: NonNull<u32>,
}

fn page_size() -> usize {
    let size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
    usize::try_from(size).unwrap_or(4096)
}

impl DevMem {
    /// Maps `SPAN_IN_BYTES` bytes at physical address `base`. `base` must be word
    /// aligned but need not be page aligned.
    pub fn open(device: &Path, base: u64) -> Result<Self> {
        if base % 4 != 0 {
            return Err(eyre!("base address {base:#x} is not word aligned"));
        }
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .custom_flags(libc::O_SYNC)
            .open(device)
            .wrap_err_with(|| format!("failed to open {}", device.display()))?;

        let page = page_size() as u64;
        let page_base = base - base % page;
        let lead = usize::try_from(base - page_base)?;
        let mapping_len = lead + SPAN_IN_BYTES;
        let offset = libc::off_t::try_from(page_base)
            .wrap_err_with(|| format!("base address {base:#x} cannot be mapped"))?;

        let mapping = unsafe {
            mmap(
                None,
                NonZeroUsize::new(mapping_len).ok_or_else(|| eyre!("empty mapping"))?,
                ProtFlags::PROT_READ | ProtFlags::PROT_WRITE,
                MapFlags::MAP_SHARED,
                &file,
                offset,
            )
        }
        .wrap_err_with(|| format!("failed to map {base:#x} from {}", device.display()))?;
        // the mapping outlives the descriptor
        drop(file);

        let registers = unsafe { mapping.cast::<u8>().add(lead) }.cast::<u32>();
        tracing::debug!(
            "mapped {SPAN_IN_BYTES} bytes at {base:#x} from {}",
            device.display()
        );
        Ok(Self {
            mapping,
            mapping_len,
            registers,
        })
    }
}

impl RegisterIo for DevMem {
    fn read32(&mut self, offset: usize) -> Result<u32, IoError> {
        check_offset(offset, SPAN_IN_BYTES)?;
        Ok(unsafe { self.registers.add(offset / 4).read_volatile() })
    }

    fn write32(&mut self, offset: usize, value: u32) -> Result<(), IoError> {
        check_offset(offset, SPAN_IN_BYTES)?;
        unsafe { self.registers.add(offset / 4).write_volatile(value) };
        Ok(())
    }
}

impl Drop for DevMem {
    fn drop(&mut self) {
        if let Err(e) = unsafe { munmap(self.mapping, self.mapping_len) } {
            tracing::warn!("failed to unmap register block: {e}");
        }
    }
}
