//! CGA/MDA text mode display driver.
//!
//! Renders characters into the memory-mapped text buffer and keeps the
//! 6845 CRTC hardware cursor in step with the logical cursor.

use pc_console_hal::{PhysMemory, PortIo};

/// Color text buffer physical address.
const CGA_BUF: usize = 0xB8000;
/// Color CRTC index port.
const CGA_CRTC: u16 = 0x3D4;
/// Monochrome text buffer physical address.
const MONO_BUF: usize = 0xB0000;
/// Monochrome CRTC index port.
const MONO_CRTC: u16 = 0x3B4;

/// CRTC cursor location registers.
const CRTC_CURSOR_HIGH: u8 = 14;
const CRTC_CURSOR_LOW: u8 = 15;

/// Value written to probe for RAM behind the color buffer.
const PROBE_SENTINEL: u16 = 0xA55A;

/// Number of rows in text mode.
pub const CRT_ROWS: u16 = 25;
/// Number of columns in text mode.
pub const CRT_COLS: u16 = 80;
/// Number of character cells.
pub const CRT_SIZE: u16 = CRT_ROWS * CRT_COLS;

const TAB_WIDTH: u16 = 8;

/// The sixteen text-mode palette entries.
///
/// Values 8 and up are the bright variants of 0..8. On a monochrome adapter
/// only the intensity bit of the foreground is visible.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Color {
    Black,
    Blue,
    Green,
    Cyan,
    Red,
    Magenta,
    Brown,
    LightGray,
    DarkGray,
    LightBlue,
    LightGreen,
    LightCyan,
    LightRed,
    Pink,
    Yellow,
    White,
}

/// Attribute byte: background in the high nibble, foreground in the low one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Attribute(u8);

impl Attribute {
    /// Light gray on black.
    const DEFAULT: Attribute = Attribute::new(Color::LightGray, Color::Black);

    const fn new(foreground: Color, background: Color) -> Self {
        Attribute((background as u8) << 4 | foreground as u8)
    }

    /// A cell holding `c` in this attribute.
    const fn cell(self, c: u8) -> u16 {
        (self.0 as u16) << 8 | c as u16
    }
}

/// Which adapter the probe found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adapter {
    /// Color (CGA/EGA/VGA) at 0xB8000.
    Color,
    /// Monochrome (MDA/Hercules) at 0xB0000.
    Monochrome,
}

/// Text mode writer.
///
/// The buffer is hardware memory the kernel does not own; the driver only
/// remembers where it is.
#[derive(Debug)]
pub struct TextDisplay {
    crtc: u16,
    buffer: usize,
    cursor: u16,
    attribute: Attribute,
}

impl TextDisplay {
    /// Creates a display bound to the color adapter. [`init`] probes for the
    /// real one.
    ///
    /// [`init`]: TextDisplay::init
    pub const fn new() -> Self {
        Self {
            crtc: CGA_CRTC,
            buffer: CGA_BUF,
            cursor: 0,
            attribute: Attribute::DEFAULT,
        }
    }

    /// Probes for a color buffer, falling back to monochrome, and adopts the
    /// hardware cursor position.
    pub fn init<P: PortIo + PhysMemory>(&mut self, hw: &mut P) {
        let was = hw.read_u16(CGA_BUF);
        hw.write_u16(CGA_BUF, PROBE_SENTINEL);
        if hw.read_u16(CGA_BUF) != PROBE_SENTINEL {
            self.buffer = MONO_BUF;
            self.crtc = MONO_CRTC;
        } else {
            hw.write_u16(CGA_BUF, was);
            self.buffer = CGA_BUF;
            self.crtc = CGA_CRTC;
        }
        log::debug!("text display: {:?} adapter", self.adapter());

        hw.write_u8(self.crtc, CRTC_CURSOR_HIGH);
        let mut pos = (hw.read_u8(self.crtc + 1) as u16) << 8;
        hw.write_u8(self.crtc, CRTC_CURSOR_LOW);
        pos |= hw.read_u8(self.crtc + 1) as u16;

        self.cursor = pos.min(CRT_SIZE - 1);
    }

    /// Which adapter is in use.
    pub fn adapter(&self) -> Adapter {
        if self.buffer == MONO_BUF {
            Adapter::Monochrome
        } else {
            Adapter::Color
        }
    }

    /// Linear cursor offset.
    pub fn cursor(&self) -> u16 {
        self.cursor
    }

    /// Sets the foreground and background colors for subsequent writes.
    pub fn set_color(&mut self, foreground: Color, background: Color) {
        self.attribute = Attribute::new(foreground, background);
    }

    /// Writes one character at the cursor and advances it.
    ///
    /// Handles newline, carriage return, backspace and tab; scrolls when the
    /// cursor runs off the last row.
    pub fn put_char<P: PortIo + PhysMemory>(&mut self, hw: &mut P, c: u8) {
        match c {
            b'\x08' => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    self.write_cell(hw, self.cursor, b' ');
                }
            }
            b'\n' => {
                self.cursor += CRT_COLS;
                self.cursor -= self.cursor % CRT_COLS;
            }
            b'\r' => self.cursor -= self.cursor % CRT_COLS,
            b'\t' => {
                let stop = TAB_WIDTH - (self.cursor % CRT_COLS) % TAB_WIDTH;
                for _ in 0..stop {
                    self.write_cell(hw, self.cursor, b' ');
                    self.cursor += 1;
                    self.scroll_if_needed(hw);
                }
            }
            c => {
                self.write_cell(hw, self.cursor, c);
                self.cursor += 1;
            }
        }
        self.scroll_if_needed(hw);
        self.sync_cursor(hw);
    }

    /// Blanks the screen and homes the cursor.
    pub fn clear<P: PortIo + PhysMemory>(&mut self, hw: &mut P) {
        for pos in 0..CRT_SIZE {
            self.write_cell(hw, pos, b' ');
        }
        self.cursor = 0;
        self.sync_cursor(hw);
    }

    fn scroll_if_needed(&mut self, hw: &mut impl PhysMemory) {
        if self.cursor < CRT_SIZE {
            return;
        }
        for pos in 0..CRT_SIZE - CRT_COLS {
            let cell = hw.read_u16(self.cell_addr(pos + CRT_COLS));
            hw.write_u16(self.cell_addr(pos), cell);
        }
        for pos in CRT_SIZE - CRT_COLS..CRT_SIZE {
            self.write_cell(hw, pos, b' ');
        }
        self.cursor -= CRT_COLS;
    }

    fn write_cell(&self, hw: &mut impl PhysMemory, pos: u16, c: u8) {
        hw.write_u16(self.cell_addr(pos), self.attribute.cell(c));
    }

    fn cell_addr(&self, pos: u16) -> usize {
        self.buffer + pos as usize * 2
    }

    fn sync_cursor(&self, io: &mut impl PortIo) {
        io.write_u8(self.crtc, CRTC_CURSOR_HIGH);
        io.write_u8(self.crtc + 1, (self.cursor >> 8) as u8);
        io.write_u8(self.crtc, CRTC_CURSOR_LOW);
        io.write_u8(self.crtc + 1, self.cursor as u8);
    }
}

impl Default for TextDisplay {
    fn default() -> Self {
        Self::new()
    }
}
