//! Console hardware configuration.
//!
//! The defaults describe a standard PC: COM1, LPT1, the 8042 keyboard
//! controller, and physical memory mapped at `KERNBASE`.

use pc_console_common::ConfigError;

/// UART base clock divided by 16, the baud rate a divisor of 1 selects.
pub const UART_CLOCK: u32 = 115_200;

/// Number of registers a 16550 UART decodes.
const COM_SPAN: u16 = 8;

/// Number of registers a parallel port decodes.
const LPT_SPAN: u16 = 3;

/// Hardware layout and timing parameters for a [`Console`](crate::Console).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsoleConfig {
    /// Serial port base (COM1 by default).
    pub com_base: u16,
    /// Parallel port base (LPT1 by default).
    pub lpt_base: u16,
    /// Serial line speed.
    pub baud: u32,
    /// Ceiling on busy-wait iterations before a transmit proceeds anyway.
    pub spin_limit: u32,
    /// Keyboard controller status port.
    pub kbd_status_port: u16,
    /// Keyboard controller data port.
    pub kbd_data_port: u16,
    /// Virtual address at which physical memory is mapped.
    pub phys_offset: usize,
}

impl ConsoleConfig {
    /// The standard PC configuration.
    pub const fn new() -> Self {
        Self {
            com_base: 0x3F8,
            lpt_base: 0x378,
            baud: 9600,
            spin_limit: 12_800,
            kbd_status_port: 0x64,
            kbd_data_port: 0x60,
            phys_offset: 0xF000_0000,
        }
    }

    /// UART divisor latch value for the configured baud rate.
    pub fn divisor(&self) -> Result<u16, ConfigError> {
        if self.baud == 0 {
            return Err(ConfigError::ZeroBaud);
        }
        u16::try_from(UART_CLOCK / self.baud).map_err(|_| ConfigError::BaudTooLow(self.baud))
    }

    /// Checks the configuration for values the hardware cannot honour.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.baud == 0 {
            return Err(ConfigError::ZeroBaud);
        }
        if self.baud > UART_CLOCK {
            return Err(ConfigError::BaudTooHigh(self.baud));
        }
        if UART_CLOCK % self.baud != 0 {
            return Err(ConfigError::InexactBaud(self.baud));
        }
        self.divisor()?;
        if self.spin_limit == 0 {
            return Err(ConfigError::ZeroSpinLimit);
        }
        let com = self.com_base as u32..self.com_base as u32 + COM_SPAN as u32;
        let lpt = self.lpt_base as u32..self.lpt_base as u32 + LPT_SPAN as u32;
        if com.start < lpt.end && lpt.start < com.end {
            return Err(ConfigError::PortOverlap {
                com: self.com_base,
                lpt: self.lpt_base,
            });
        }
        Ok(())
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = ConsoleConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.divisor(), Ok(12));
    }

    #[test]
    fn test_rejects_bad_baud() {
        let mut config = ConsoleConfig::new();
        config.baud = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroBaud));
        config.baud = 230_400;
        assert_eq!(config.validate(), Err(ConfigError::BaudTooHigh(230_400)));
        config.baud = 7000;
        assert_eq!(config.validate(), Err(ConfigError::InexactBaud(7000)));
        config.baud = 115_200;
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.divisor(), Ok(1));
    }

    #[test]
    fn test_rejects_divisor_wider_than_latch() {
        let mut config = ConsoleConfig::new();
        config.baud = 1;
        assert_eq!(config.validate(), Err(ConfigError::BaudTooLow(1)));
        assert_eq!(config.divisor(), Err(ConfigError::BaudTooLow(1)));
        config.baud = 2;
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.divisor(), Ok(57_600));
    }

    #[test]
    fn test_divisor_of_zero_baud_is_an_error() {
        let mut config = ConsoleConfig::new();
        config.baud = 0;
        assert_eq!(config.divisor(), Err(ConfigError::ZeroBaud));
    }

    #[test]
    fn test_rejects_zero_spin_limit() {
        let mut config = ConsoleConfig::new();
        config.spin_limit = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroSpinLimit));
    }

    #[test]
    fn test_rejects_overlapping_ports() {
        let mut config = ConsoleConfig::new();
        config.lpt_base = 0x3FC;
        assert_eq!(
            config.validate(),
            Err(ConfigError::PortOverlap { com: 0x3F8, lpt: 0x3FC })
        );
        config.lpt_base = 0x3F6;
        assert!(config.validate().is_err());
        config.lpt_base = 0x3F5;
        assert_eq!(config.validate(), Ok(()));
    }
}
