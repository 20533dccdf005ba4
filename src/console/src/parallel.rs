//! Parallel port output.

use pc_console_hal::PortIo;

use crate::config::ConsoleConfig;
use crate::wait::spin_until;

const LPT_DATA: u16 = 0;
const LPT_STATUS: u16 = 1;
/// Printer not busy.
const LPT_STATUS_READY: u8 = 0x80;
const LPT_CONTROL: u16 = 2;
const LPT_CONTROL_STROBE: u8 = 0x01;
const LPT_CONTROL_INIT: u8 = 0x04;
const LPT_CONTROL_SELECT: u8 = 0x08;

/// Write-only byte sink on a Centronics-style port.
#[derive(Debug)]
pub struct ParallelPort {
    base: u16,
    spin_limit: u32,
}

impl ParallelPort {
    /// Creates the driver.
    pub const fn new(config: &ConsoleConfig) -> Self {
        Self {
            base: config.lpt_base,
            spin_limit: config.spin_limit,
        }
    }

    /// Sends a byte, waiting a bounded time for the printer, then pulses
    /// strobe to latch it.
    pub fn transmit(&mut self, io: &mut impl PortIo, byte: u8) {
        let base = self.base;
        spin_until(io, self.spin_limit, |io| {
            io.read_u8(base + LPT_STATUS) & LPT_STATUS_READY != 0
        });
        io.write_u8(self.base + LPT_DATA, byte);
        io.write_u8(
            self.base + LPT_CONTROL,
            LPT_CONTROL_SELECT | LPT_CONTROL_INIT | LPT_CONTROL_STROBE,
        );
        io.write_u8(self.base + LPT_CONTROL, LPT_CONTROL_SELECT);
    }
}
