//! 16550 UART driver.
//!
//! Programs the UART by hand rather than through a generic driver: the
//! console needs the FIFO off, the receive interrupt on, a configurable
//! divisor, and presence detection through the line status register.

use pc_console_common::ConfigError;
use pc_console_hal::PortIo;

use crate::config::ConsoleConfig;
use crate::wait::spin_until;

/// Receive buffer (DLAB=0, read).
const COM_RX: u16 = 0;
/// Transmit holding register (DLAB=0, write).
const COM_TX: u16 = 0;
/// Divisor latch low byte (DLAB=1).
const COM_DLL: u16 = 0;
/// Divisor latch high byte (DLAB=1).
const COM_DLM: u16 = 1;
/// Interrupt enable register.
const COM_IER: u16 = 1;
/// Enable received-data-available interrupt.
const COM_IER_RDI: u8 = 0x01;
/// Interrupt identification register (read).
const COM_IIR: u16 = 2;
/// FIFO control register (write).
const COM_FCR: u16 = 2;
/// Line control register.
const COM_LCR: u16 = 3;
/// Divisor latch access bit.
const COM_LCR_DLAB: u8 = 0x80;
/// Word length: 8 bits.
const COM_LCR_WLEN8: u8 = 0x03;
/// Modem control register.
const COM_MCR: u16 = 4;
/// Line status register.
const COM_LSR: u16 = 5;
/// Data available.
const COM_LSR_DATA: u8 = 0x01;
/// Transmit holding register empty.
const COM_LSR_TXRDY: u8 = 0x20;

/// A UART at a fixed base port.
#[derive(Debug)]
pub struct SerialPort {
    base: u16,
    divisor: u16,
    spin_limit: u32,
    present: bool,
}

impl SerialPort {
    /// Creates the driver. The port is considered absent until [`init`].
    ///
    /// Fails if the configured baud rate has no divisor.
    ///
    /// [`init`]: SerialPort::init
    pub fn new(config: &ConsoleConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            base: config.com_base,
            divisor: config.divisor()?,
            spin_limit: config.spin_limit,
            present: false,
        })
    }

    /// Programs the UART for 8N1 at the configured speed with the receive
    /// interrupt enabled, and detects whether it exists.
    pub fn init(&mut self, io: &mut impl PortIo) {
        // turn off the FIFO
        io.write_u8(self.base + COM_FCR, 0);

        io.write_u8(self.base + COM_LCR, COM_LCR_DLAB);
        io.write_u8(self.base + COM_DLL, self.divisor as u8);
        io.write_u8(self.base + COM_DLM, (self.divisor >> 8) as u8);

        // 8 data bits, 1 stop bit, parity off, DLAB off
        io.write_u8(self.base + COM_LCR, COM_LCR_WLEN8 & !COM_LCR_DLAB);

        io.write_u8(self.base + COM_MCR, 0);
        io.write_u8(self.base + COM_IER, COM_IER_RDI);

        // An unconnected bus floats high.
        self.present = io.read_u8(self.base + COM_LSR) != 0xFF;
        if !self.present {
            return;
        }

        // clear pending interrupt and overrun state
        let _ = io.read_u8(self.base + COM_IIR);
        let _ = io.read_u8(self.base + COM_RX);
    }

    /// Whether [`init`](SerialPort::init) found a UART.
    pub fn is_present(&self) -> bool {
        self.present
    }

    /// Returns the next received byte, if one is waiting.
    pub fn try_receive(&mut self, io: &mut impl PortIo) -> Option<u8> {
        if io.read_u8(self.base + COM_LSR) & COM_LSR_DATA == 0 {
            return None;
        }
        Some(io.read_u8(self.base + COM_RX))
    }

    /// Sends a byte, waiting a bounded time for the transmitter.
    ///
    /// The byte is written even if the wait times out. An absent port's
    /// status floats high, so the wait ends at once.
    pub fn transmit(&mut self, io: &mut impl PortIo, byte: u8) {
        let base = self.base;
        spin_until(io, self.spin_limit, |io| {
            io.read_u8(base + COM_LSR) & COM_LSR_TXRDY != 0
        });
        io.write_u8(self.base + COM_TX, byte);
    }
}
