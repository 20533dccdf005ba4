//! Test infrastructure for the console drivers.
//!
//! [`FakeMachine`] is an in-memory PC: it models the UART line status, the
//! parallel port busy line, the keyboard controller, both CRTC register
//! files and text memory, and records every port write so tests can assert
//! on the exact hardware protocol.
//!
//! [`capture_logs`] installs a `log` backend that records each test thread's
//! records separately, so tests can assert on diagnostics.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::sync::Once;

use log::{Level, LevelFilter, Log, Metadata, Record};

use pc_console_hal::{PhysMemory, PortIo};

/// COM1 base port.
pub const COM: u16 = 0x3F8;
/// LPT1 base port.
pub const LPT: u16 = 0x378;
/// Color CRTC index port.
pub const CGA_CRTC: u16 = 0x3D4;
/// Monochrome CRTC index port.
pub const MONO_CRTC: u16 = 0x3B4;
/// Color text buffer.
pub const CGA_BUF: usize = 0xB8000;
/// Monochrome text buffer.
pub const MONO_BUF: usize = 0xB0000;
/// System control port A.
pub const RESET_PORT: u16 = 0x92;

const DELAY_PORT: u16 = 0x84;
const KBD_STATUS: u16 = 0x64;
const KBD_DATA: u16 = 0x60;
const TEXT_BYTES: usize = 80 * 25 * 2;

/// Scriptable PC hardware model.
pub struct FakeMachine {
    /// Every port write, in order.
    pub writes: Vec<(u16, u8)>,
    /// Every port read, in order.
    pub reads: Vec<u16>,
    /// Scancodes waiting in the keyboard controller.
    pub kbd: VecDeque<u8>,
    /// Bytes waiting in the UART receive buffer.
    pub serial_rx: VecDeque<u8>,
    /// Whether a UART answers at COM1.
    pub serial_present: bool,
    /// Whether the UART reports its transmit holding register empty.
    pub tx_ready: bool,
    /// Whether the printer reports not-busy.
    pub lpt_ready: bool,
    /// Whether RAM answers at the color text buffer address.
    pub color_present: bool,
    /// Number of I/O delays taken.
    pub delays: usize,
    memory: HashMap<usize, u16>,
    crtc_index: HashMap<u16, u8>,
    crtc_regs: HashMap<(u16, u8), u8>,
}

impl FakeMachine {
    /// A machine with every device present and ready.
    pub fn new() -> Self {
        Self {
            writes: Vec::new(),
            reads: Vec::new(),
            kbd: VecDeque::new(),
            serial_rx: VecDeque::new(),
            serial_present: true,
            tx_ready: true,
            lpt_ready: true,
            color_present: true,
            delays: 0,
            memory: HashMap::new(),
            crtc_index: HashMap::new(),
            crtc_regs: HashMap::new(),
        }
    }

    /// Bytes written to one port, in order.
    pub fn writes_to(&self, port: u16) -> Vec<u8> {
        self.writes
            .iter()
            .filter(|(p, _)| *p == port)
            .map(|(_, v)| *v)
            .collect()
    }

    /// How many times `port` was read.
    pub fn reads_of(&self, port: u16) -> usize {
        self.reads.iter().filter(|&&p| p == port).count()
    }

    /// Presets the hardware cursor of the CRTC at `crtc`.
    pub fn set_cursor(&mut self, crtc: u16, pos: u16) {
        self.crtc_regs.insert((crtc, 14), (pos >> 8) as u8);
        self.crtc_regs.insert((crtc, 15), pos as u8);
    }

    /// Current hardware cursor of the CRTC at `crtc`.
    pub fn cursor(&self, crtc: u16) -> u16 {
        let hi = self.crtc_regs.get(&(crtc, 14)).copied().unwrap_or(0) as u16;
        let lo = self.crtc_regs.get(&(crtc, 15)).copied().unwrap_or(0) as u16;
        hi << 8 | lo
    }

    /// Character cell `index` of the text buffer at `base`.
    pub fn cell(&self, base: usize, index: usize) -> u16 {
        self.memory.get(&(base + index * 2)).copied().unwrap_or(0)
    }

    /// Character byte of every cell in row `row`, as a string.
    pub fn row_text(&self, base: usize, row: usize) -> String {
        (0..80)
            .map(|col| (self.cell(base, row * 80 + col) & 0xFF) as u8 as char)
            .collect()
    }

    fn is_color_text(&self, phys: usize) -> bool {
        (CGA_BUF..CGA_BUF + TEXT_BYTES).contains(&phys)
    }
}

impl Default for FakeMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl PortIo for FakeMachine {
    fn read_u8(&mut self, port: u16) -> u8 {
        self.reads.push(port);
        match port {
            DELAY_PORT => {
                self.delays += 1;
                0xFF
            }
            KBD_STATUS => u8::from(!self.kbd.is_empty()),
            KBD_DATA => self.kbd.pop_front().unwrap_or(0),
            p if (COM..COM + 8).contains(&p) && !self.serial_present => 0xFF,
            p if p == COM + 5 => {
                let mut lsr = 0;
                if !self.serial_rx.is_empty() {
                    lsr |= 0x01;
                }
                if self.tx_ready {
                    lsr |= 0x20 | 0x40;
                }
                lsr
            }
            COM => self.serial_rx.pop_front().unwrap_or(0),
            p if p == COM + 2 => 0x01,
            p if p == LPT + 1 => {
                if self.lpt_ready {
                    0x80
                } else {
                    0x00
                }
            }
            p if p == CGA_CRTC + 1 || p == MONO_CRTC + 1 => {
                let crtc = p - 1;
                let index = self.crtc_index.get(&crtc).copied().unwrap_or(0);
                self.crtc_regs.get(&(crtc, index)).copied().unwrap_or(0)
            }
            _ => 0xFF,
        }
    }

    fn write_u8(&mut self, port: u16, value: u8) {
        self.writes.push((port, value));
        match port {
            CGA_CRTC | MONO_CRTC => {
                self.crtc_index.insert(port, value);
            }
            p if p == CGA_CRTC + 1 || p == MONO_CRTC + 1 => {
                let crtc = p - 1;
                let index = self.crtc_index.get(&crtc).copied().unwrap_or(0);
                self.crtc_regs.insert((crtc, index), value);
            }
            _ => {}
        }
    }
}

impl PhysMemory for FakeMachine {
    fn read_u16(&mut self, phys: usize) -> u16 {
        if self.is_color_text(phys) && !self.color_present {
            return 0xFFFF;
        }
        self.memory.get(&phys).copied().unwrap_or(0)
    }

    fn write_u16(&mut self, phys: usize, value: u16) {
        if self.is_color_text(phys) && !self.color_present {
            return;
        }
        self.memory.insert(phys, value);
    }
}

thread_local! {
    static CAPTURED: RefCell<Vec<(Level, String)>> = const { RefCell::new(Vec::new()) };
}

struct CaptureLogger;

impl Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &Record<'_>) {
        CAPTURED.with(|captured| {
            captured
                .borrow_mut()
                .push((record.level(), record.args().to_string()))
        });
    }

    fn flush(&self) {}
}

static CAPTURE_LOGGER: CaptureLogger = CaptureLogger;

/// Starts recording log records emitted on the current thread.
pub fn capture_logs() {
    static INSTALL: Once = Once::new();
    INSTALL.call_once(|| {
        log::set_logger(&CAPTURE_LOGGER).expect("logger already installed");
        log::set_max_level(LevelFilter::Trace);
    });
    CAPTURED.with(|captured| captured.borrow_mut().clear());
}

/// Records emitted on the current thread since [`capture_logs`].
pub fn captured_logs() -> Vec<(Level, String)> {
    CAPTURED.with(|captured| captured.borrow().clone())
}
