//! Port I/O and physical memory access on real x86 hardware.

use core::ptr;

use ::x86_64::instructions::port::Port;
use pc_console_hal::{PhysMemory, PortIo};

/// The machine the kernel is running on.
#[derive(Debug)]
pub struct X86Platform {
    /// Virtual address at which physical memory is mapped.
    phys_offset: usize,
}

impl X86Platform {
    /// Creates the platform handle.
    ///
    /// # Safety
    ///
    /// The caller must be running with I/O privilege (ring 0), and the
    /// physical range holding the text buffers (0xB0000..0xC0000) must be
    /// mapped at `phys_offset + phys`. Only one console may drive the
    /// devices at a time.
    pub const unsafe fn new(phys_offset: usize) -> Self {
        Self { phys_offset }
    }
}

impl PortIo for X86Platform {
    fn read_u8(&mut self, port: u16) -> u8 {
        let mut port = Port::<u8>::new(port);
        // SAFETY: I/O privilege is guaranteed by the constructor's contract.
        // The console only touches the legacy PC ports it was configured with.
        unsafe { port.read() }
    }

    fn write_u8(&mut self, port: u16, value: u8) {
        let mut port = Port::<u8>::new(port);
        // SAFETY: see `read_u8`.
        unsafe { port.write(value) }
    }
}

impl PhysMemory for X86Platform {
    fn read_u16(&mut self, phys: usize) -> u16 {
        // SAFETY: the text buffer range is mapped at `phys_offset` per the
        // constructor's contract. Volatile because the adapter may not decode
        // the address at all, which is exactly what the probe checks.
        unsafe { ptr::read_volatile((self.phys_offset + phys) as *const u16) }
    }

    fn write_u16(&mut self, phys: usize, value: u16) {
        // SAFETY: see `read_u16`.
        unsafe { ptr::write_volatile((self.phys_offset + phys) as *mut u16, value) }
    }
}
