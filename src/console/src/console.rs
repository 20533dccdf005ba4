//! Device-independent console.
//!
//! Output fans out to the serial port, the parallel port and the text
//! display. Input from the keyboard and the serial port is stashed in a
//! circular buffer by the interrupt drains and handed out by [`Console::input`].
//!
//! Every mutating entry point takes `&mut self`. The drains must not be
//! re-entered from inside themselves; exclusive borrows make that a compile
//! error rather than a convention.

use core::fmt;

use pc_console_common::ConfigError;
use pc_console_hal::Platform;

use crate::config::ConsoleConfig;
use crate::display::TextDisplay;
use crate::keyboard::Keyboard;
use crate::parallel::ParallelPort;
use crate::ring::ConsoleRingBuffer;
use crate::serial::SerialPort;

/// The console: every device plus the input buffer, over one platform.
pub struct Console<P> {
    hw: P,
    serial: SerialPort,
    lpt: ParallelPort,
    display: TextDisplay,
    keyboard: Keyboard,
    input: ConsoleRingBuffer,
}

impl<P: Platform> Console<P> {
    /// Binds a console to the platform. No hardware is touched until
    /// [`init`](Console::init).
    pub fn new(hw: P, config: ConsoleConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            hw,
            serial: SerialPort::new(&config)?,
            lpt: ParallelPort::new(&config),
            display: TextDisplay::new(),
            keyboard: Keyboard::new(&config),
            input: ConsoleRingBuffer::new(),
        })
    }

    /// Initializes the display and serial port and flushes pending
    /// keystrokes. A missing UART is reported, not treated as an error.
    pub fn init(&mut self) {
        self.display.init(&mut self.hw);
        self.keyboard_interrupt();
        self.serial.init(&mut self.hw);

        if !self.serial.is_present() {
            log::warn!("serial port does not exist");
            let _ = fmt::Write::write_str(self, "Serial port does not exist!\n");
        }
    }

    /// Writes a character to every output device.
    pub fn output(&mut self, c: u8) {
        self.serial.transmit(&mut self.hw, c);
        self.lpt.transmit(&mut self.hw, c);
        self.display.put_char(&mut self.hw, c);
    }

    /// Returns the next input character, or `None` if there is none.
    ///
    /// Polls both input devices first, so this works with interrupts
    /// disabled.
    pub fn input(&mut self) -> Option<u8> {
        self.serial_interrupt();
        self.keyboard_interrupt();
        self.input.pop()
    }

    /// Spins until a non-zero input character arrives.
    pub fn blocking_read(&mut self) -> u8 {
        loop {
            match self.input() {
                Some(c) if c != 0 => return c,
                _ => core::hint::spin_loop(),
            }
        }
    }

    /// Serial receive interrupt: moves every waiting byte into the buffer.
    pub fn serial_interrupt(&mut self) {
        if !self.serial.is_present() {
            return;
        }
        while let Some(c) = self.serial.try_receive(&mut self.hw) {
            self.enqueue(c);
        }
    }

    /// Keyboard interrupt: decodes every waiting scancode into the buffer.
    pub fn keyboard_interrupt(&mut self) {
        while let Some(event) = self.keyboard.poll(&mut self.hw) {
            if let Some(c) = event.byte() {
                self.enqueue(c);
            }
        }
    }

    /// Reads a line into `buf`, echoing as it goes, and returns its length.
    ///
    /// Backspace (or DEL) erases the previous character. Input stops at
    /// newline or carriage return, which is echoed but not stored. One byte
    /// of `buf` is kept free so callers can NUL-terminate.
    pub fn read_line(&mut self, prompt: Option<&str>, buf: &mut [u8]) -> usize {
        if let Some(prompt) = prompt {
            let _ = fmt::Write::write_str(self, prompt);
        }

        let mut len = 0;
        loop {
            match self.blocking_read() {
                b'\x08' | 0x7F if len > 0 => {
                    self.output(b'\x08');
                    len -= 1;
                }
                b'\n' | b'\r' => {
                    self.output(b'\n');
                    return len;
                }
                c if (b' '..0x7F).contains(&c) && len + 1 < buf.len() => {
                    self.output(c);
                    buf[len] = c;
                    len += 1;
                }
                _ => {}
            }
        }
    }

    /// Whether a UART answered at init.
    pub fn is_serial_present(&self) -> bool {
        self.serial.is_present()
    }

    /// The text display, e.g. to change colors.
    pub fn display(&mut self) -> &mut TextDisplay {
        &mut self.display
    }

    /// Clears the text display.
    pub fn clear_screen(&mut self) {
        self.display.clear(&mut self.hw);
    }

    /// The underlying platform.
    pub fn platform(&mut self) -> &mut P {
        &mut self.hw
    }

    fn enqueue(&mut self, c: u8) {
        if c != 0 {
            self.input.push(c);
        }
    }
}

impl<P: Platform> fmt::Write for Console<P> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for byte in s.bytes() {
            self.output(byte);
        }
        Ok(())
    }
}
