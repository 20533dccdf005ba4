//! System-wide error types for the console subsystem.

use core::fmt;

/// Reasons a console configuration is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConfigError {
    /// Baud rate of zero
    ZeroBaud,
    /// Baud rate above the UART's 115200 base clock
    BaudTooHigh(u32),
    /// Baud rate that does not divide 115200 evenly
    InexactBaud(u32),
    /// Baud rate whose divisor does not fit the 16-bit divisor latch
    BaudTooLow(u32),
    /// Busy-wait ceiling of zero iterations
    ZeroSpinLimit,
    /// Serial and parallel port register ranges overlap
    PortOverlap {
        /// Serial base port
        com: u16,
        /// Parallel base port
        lpt: u16,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroBaud => write!(f, "baud rate must be non-zero"),
            ConfigError::BaudTooHigh(baud) => {
                write!(f, "baud rate {} exceeds 115200", baud)
            }
            ConfigError::InexactBaud(baud) => {
                write!(f, "baud rate {} does not divide 115200", baud)
            }
            ConfigError::BaudTooLow(baud) => {
                write!(f, "baud rate {} is below the slowest divisor", baud)
            }
            ConfigError::ZeroSpinLimit => write!(f, "busy-wait ceiling must be non-zero"),
            ConfigError::PortOverlap { com, lpt } => write!(
                f,
                "serial port {:#x} overlaps parallel port {:#x}",
                com, lpt
            ),
        }
    }
}
