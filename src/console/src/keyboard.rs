//! PC/AT keyboard input.
//!
//! [`ScancodeDecoder`] is a table-driven state machine that turns scan code
//! set 1 bytes into characters and virtual keys. [`Keyboard`] wraps it with
//! the 8042 controller's status/data ports and the Ctrl-Alt-Del reset.

use pc_console_common::{DecodedEvent, Modifiers, VirtualKey};
use pc_console_hal::PortIo;

use crate::config::ConsoleConfig;

/// Extended scancode prefix.
const E0_PREFIX: u8 = 0xE0;
/// Set on the release code of every key.
const RELEASE_BIT: u8 = 0x80;

/// Controller status: output buffer full.
const KBS_DIB: u8 = 0x01;
/// System control port A.
const SYSCTL_PORT_A: u16 = 0x92;
/// Fast A20 plus fast reset.
const SYSCTL_RESET: u8 = 0x03;

/// No output.
const NO: u8 = 0;

const HOME: u8 = VirtualKey::Home.code();
const END: u8 = VirtualKey::End.code();
const UP: u8 = VirtualKey::Up.code();
const DN: u8 = VirtualKey::Down.code();
const LF: u8 = VirtualKey::Left.code();
const RT: u8 = VirtualKey::Right.code();
const PGUP: u8 = VirtualKey::PageUp.code();
const PGDN: u8 = VirtualKey::PageDown.code();
const INS: u8 = VirtualKey::Insert.code();
const DEL: u8 = VirtualKey::Delete.code();

type Keymap = [u8; 256];

/// Control character for `c`, e.g. `ctl(b'C') == 0x03`.
const fn ctl(c: u8) -> u8 {
    c.wrapping_sub(b'@')
}

/// Builds a 256-entry table from a dense prefix plus sparse entries.
const fn keymap(prefix: &[u8], sparse: &[(u8, u8)]) -> Keymap {
    let mut map = [NO; 256];
    let mut i = 0;
    while i < prefix.len() {
        map[i] = prefix[i];
        i += 1;
    }
    let mut j = 0;
    while j < sparse.len() {
        map[sparse[j].0 as usize] = sparse[j].1;
        j += 1;
    }
    map
}

/// Extended keys shared by the normal and shifted maps.
const EXTENDED: [(u8, u8); 12] = [
    (0x9C, b'\n'), // keypad enter
    (0xB5, b'/'),  // keypad divide
    (0xC7, HOME),
    (0xC8, UP),
    (0xC9, PGUP),
    (0xCB, LF),
    (0xCD, RT),
    (0xCF, END),
    (0xD0, DN),
    (0xD1, PGDN),
    (0xD2, INS),
    (0xD3, DEL),
];

static SHIFTCODE: Keymap = keymap(
    &[],
    &[
        (0x1D, Modifiers::CTL.bits()),
        (0x2A, Modifiers::SHIFT.bits()),
        (0x36, Modifiers::SHIFT.bits()),
        (0x38, Modifiers::ALT.bits()),
        (0x9D, Modifiers::CTL.bits()),
        (0xB8, Modifiers::ALT.bits()),
    ],
);

static TOGGLECODE: Keymap = keymap(
    &[],
    &[
        (0x3A, Modifiers::CAPSLOCK.bits()),
        (0x45, Modifiers::NUMLOCK.bits()),
        (0x46, Modifiers::SCROLLLOCK.bits()),
    ],
);

#[rustfmt::skip]
static NORMALMAP: Keymap = keymap(
    &[
        NO,   0x1B, b'1', b'2', b'3', b'4', b'5', b'6',  // 0x00
        b'7', b'8', b'9', b'0', b'-', b'=', 0x08, b'\t',
        b'q', b'w', b'e', b'r', b't', b'y', b'u', b'i',  // 0x10
        b'o', b'p', b'[', b']', b'\n', NO,  b'a', b's',
        b'd', b'f', b'g', b'h', b'j', b'k', b'l', b';',  // 0x20
        b'\'', b'`', NO,  b'\\', b'z', b'x', b'c', b'v',
        b'b', b'n', b'm', b',', b'.', b'/', NO,   b'*',  // 0x30
        NO,   b' ', NO,   NO,   NO,   NO,   NO,   NO,
        NO,   NO,   NO,   NO,   NO,   NO,   NO,   b'7',  // 0x40
        b'8', b'9', b'-', b'4', b'5', b'6', b'+', b'1',
        b'2', b'3', b'0', b'.',                          // 0x50
    ],
    &EXTENDED,
);

#[rustfmt::skip]
static SHIFTMAP: Keymap = keymap(
    &[
        NO,   0x1B, b'!', b'@', b'#', b'$', b'%', b'^',  // 0x00
        b'&', b'*', b'(', b')', b'_', b'+', 0x08, b'\t',
        b'Q', b'W', b'E', b'R', b'T', b'Y', b'U', b'I',  // 0x10
        b'O', b'P', b'{', b'}', b'\n', NO,  b'A', b'S',
        b'D', b'F', b'G', b'H', b'J', b'K', b'L', b':',  // 0x20
        b'"', b'~', NO,   b'|', b'Z', b'X', b'C', b'V',
        b'B', b'N', b'M', b'<', b'>', b'?', NO,   b'*',  // 0x30
        NO,   b' ', NO,   NO,   NO,   NO,   NO,   NO,
        NO,   NO,   NO,   NO,   NO,   NO,   NO,   b'7',  // 0x40
        b'8', b'9', b'-', b'4', b'5', b'6', b'+', b'1',
        b'2', b'3', b'0', b'.',                          // 0x50
    ],
    &EXTENDED,
);

#[rustfmt::skip]
static CTLMAP: Keymap = keymap(
    &[
        NO,        NO,        NO,        NO,        NO,        NO,        NO,        NO,
        NO,        NO,        NO,        NO,        NO,        NO,        NO,        NO,
        ctl(b'Q'), ctl(b'W'), ctl(b'E'), ctl(b'R'), ctl(b'T'), ctl(b'Y'), ctl(b'U'), ctl(b'I'),
        ctl(b'O'), ctl(b'P'), NO,        NO,        b'\r',     NO,        ctl(b'A'), ctl(b'S'),
        ctl(b'D'), ctl(b'F'), ctl(b'G'), ctl(b'H'), ctl(b'J'), ctl(b'K'), ctl(b'L'), NO,
        NO,        NO,        NO,        ctl(b'\\'), ctl(b'Z'), ctl(b'X'), ctl(b'C'), ctl(b'V'),
        ctl(b'B'), ctl(b'N'), ctl(b'M'), NO,        NO,        ctl(b'/'), NO,        NO,
    ],
    &[
        (0x9C, b'\r'),
        (0xB5, ctl(b'/')),
        (0xC7, HOME),
        (0xC8, UP),
        (0xC9, PGUP),
        (0xCB, LF),
        (0xCD, RT),
        (0xCF, END),
        (0xD0, DN),
        (0xD1, PGDN),
        (0xD2, INS),
        (0xD3, DEL),
    ],
);

/// Indexed by `modifiers & (CTL | SHIFT)`. Ctrl wins over Shift.
static CHARCODE: [&Keymap; 4] = [&NORMALMAP, &SHIFTMAP, &CTLMAP, &CTLMAP];

/// Scan code set 1 decoder.
#[derive(Debug)]
pub struct ScancodeDecoder {
    modifiers: Modifiers,
    reset_requested: bool,
}

impl ScancodeDecoder {
    /// Creates a decoder with no modifiers held and all locks off.
    pub const fn new() -> Self {
        Self {
            modifiers: Modifiers::empty(),
            reset_requested: false,
        }
    }

    /// Current modifier and lock state.
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Feeds one byte from the keyboard.
    ///
    /// Prefix bytes, releases, modifier presses and unmapped keys all yield
    /// [`DecodedEvent::NoOutput`].
    pub fn decode(&mut self, scancode: u8) -> DecodedEvent {
        let mut data = scancode;

        if data == E0_PREFIX {
            self.modifiers |= Modifiers::E0ESC;
            return DecodedEvent::NoOutput;
        } else if data & RELEASE_BIT != 0 {
            if !self.modifiers.contains(Modifiers::E0ESC) {
                data &= !RELEASE_BIT;
            }
            let released = Modifiers::from_bits_retain(SHIFTCODE[data as usize]);
            self.modifiers.remove(released | Modifiers::E0ESC);
            return DecodedEvent::NoOutput;
        } else if self.modifiers.contains(Modifiers::E0ESC) {
            data |= RELEASE_BIT;
            self.modifiers.remove(Modifiers::E0ESC);
        }

        self.modifiers |= Modifiers::from_bits_retain(SHIFTCODE[data as usize]);
        self.modifiers ^= Modifiers::from_bits_retain(TOGGLECODE[data as usize]);

        let map = (self.modifiers & (Modifiers::CTL | Modifiers::SHIFT)).bits();
        let mut c = CHARCODE[map as usize][data as usize];
        if self.modifiers.contains(Modifiers::CAPSLOCK) && c.is_ascii_alphabetic() {
            c ^= 0x20;
        }

        if c == DEL && self.modifiers.contains(Modifiers::CTL | Modifiers::ALT) {
            self.reset_requested = true;
        }

        DecodedEvent::from_code(c)
    }

    /// Returns and clears the pending Ctrl-Alt-Del request.
    pub fn take_reset_request(&mut self) -> bool {
        core::mem::take(&mut self.reset_requested)
    }
}

impl Default for ScancodeDecoder {
    fn default() -> Self {
        Self::new()
    }
}

/// 8042 keyboard controller front end.
#[derive(Debug)]
pub struct Keyboard {
    status_port: u16,
    data_port: u16,
    decoder: ScancodeDecoder,
}

impl Keyboard {
    /// Creates the driver.
    pub const fn new(config: &ConsoleConfig) -> Self {
        Self {
            status_port: config.kbd_status_port,
            data_port: config.kbd_data_port,
            decoder: ScancodeDecoder::new(),
        }
    }

    /// Reads and decodes one scancode if the controller has one.
    ///
    /// `None` means the controller is empty; `Some(NoOutput)` means a byte
    /// was consumed without producing input. Ctrl-Alt-Del resets the
    /// machine through system control port A.
    pub fn poll(&mut self, io: &mut impl PortIo) -> Option<DecodedEvent> {
        if io.read_u8(self.status_port) & KBS_DIB == 0 {
            return None;
        }
        let scancode = io.read_u8(self.data_port);
        let event = self.decoder.decode(scancode);

        if self.decoder.take_reset_request() {
            log::debug!("ctrl-alt-del: resetting");
            io.write_u8(SYSCTL_PORT_A, SYSCTL_RESET);
        }
        Some(event)
    }

    /// Current modifier and lock state.
    pub fn modifiers(&self) -> Modifiers {
        self.decoder.modifiers()
    }
}
