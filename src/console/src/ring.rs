//! Console input buffer.
//!
//! Bytes received from the keyboard or serial port are stashed here by the
//! interrupt drains and handed out one at a time to the polling reader.

/// Capacity of the console input buffer in bytes.
pub const CONSOLE_BUFFER_SIZE: usize = 512;

/// Fixed-capacity circular byte queue.
///
/// Positions run freely and are reduced modulo the capacity on access, so a
/// full buffer is distinguishable from an empty one. A push into a full
/// buffer overwrites the oldest unread byte without reporting it.
pub struct ConsoleRingBuffer {
    buf: [u8; CONSOLE_BUFFER_SIZE],
    rpos: usize,
    wpos: usize,
}

impl ConsoleRingBuffer {
    /// Creates an empty buffer.
    pub const fn new() -> Self {
        Self {
            buf: [0; CONSOLE_BUFFER_SIZE],
            rpos: 0,
            wpos: 0,
        }
    }

    /// Appends a byte, dropping the oldest unread byte if the buffer is full.
    pub fn push(&mut self, byte: u8) {
        if self.len() == CONSOLE_BUFFER_SIZE {
            self.rpos = self.rpos.wrapping_add(1);
        }
        self.buf[self.wpos % CONSOLE_BUFFER_SIZE] = byte;
        self.wpos = self.wpos.wrapping_add(1);
    }

    /// Removes and returns the oldest unread byte.
    pub fn pop(&mut self) -> Option<u8> {
        if self.is_empty() {
            return None;
        }
        let byte = self.buf[self.rpos % CONSOLE_BUFFER_SIZE];
        self.rpos = self.rpos.wrapping_add(1);
        Some(byte)
    }

    /// Number of unread bytes.
    pub fn len(&self) -> usize {
        self.wpos.wrapping_sub(self.rpos)
    }

    /// Returns true if there is nothing to read.
    pub fn is_empty(&self) -> bool {
        self.rpos == self.wpos
    }
}

impl Default for ConsoleRingBuffer {
    fn default() -> Self {
        Self::new()
    }
}
