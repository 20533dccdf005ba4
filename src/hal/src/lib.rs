//! PC console Hardware Abstraction Layer (HAL) traits.
//!
//! These traits abstract the two kinds of hardware access the console needs,
//! so the drivers can run against real x86 hardware or an in-memory model.

#![no_std]

/// Trait for x86 port-mapped I/O.
pub trait PortIo {
    /// Reads a byte from an I/O port.
    fn read_u8(&mut self, port: u16) -> u8;
    /// Writes a byte to an I/O port.
    fn write_u8(&mut self, port: u16, value: u8);

    /// Burns a fixed amount of time by reading the POST diagnostic port.
    ///
    /// Each call costs four port reads, roughly 1.6 microseconds on ISA
    /// timing, independent of CPU speed.
    fn io_delay(&mut self) {
        for _ in 0..4 {
            self.read_u8(0x84);
        }
    }
}

/// Trait for 16-bit accesses to physical memory mapped into the kernel.
///
/// Addresses are physical; the implementation applies whatever fixed
/// virtual offset the kernel maps physical memory at.
pub trait PhysMemory {
    /// Reads a 16-bit word at a physical address.
    fn read_u16(&mut self, phys: usize) -> u16;
    /// Writes a 16-bit word at a physical address.
    fn write_u16(&mut self, phys: usize, value: u16);
}

/// Everything the console needs from the machine.
pub trait Platform: PortIo + PhysMemory {}

impl<T: PortIo + PhysMemory> Platform for T {}
