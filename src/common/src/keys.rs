//! Keyboard-facing types: virtual keys, decoded events and modifier state.

use bitflags::bitflags;

/// Non-printing keys, encoded in the console's byte stream as 0xE0..=0xE9.
///
/// The codes sit above the 7-bit ASCII range so a line reader can tell them
/// apart from characters without a side channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum VirtualKey {
    /// Home key.
    Home = 0xE0,
    /// End key.
    End = 0xE1,
    /// Up arrow.
    Up = 0xE2,
    /// Down arrow.
    Down = 0xE3,
    /// Left arrow.
    Left = 0xE4,
    /// Right arrow.
    Right = 0xE5,
    /// Page Up.
    PageUp = 0xE6,
    /// Page Down.
    PageDown = 0xE7,
    /// Insert.
    Insert = 0xE8,
    /// Delete.
    Delete = 0xE9,
}

impl VirtualKey {
    /// Maps a byte in the virtual-key range back to its key.
    pub const fn from_code(code: u8) -> Option<Self> {
        Some(match code {
            0xE0 => VirtualKey::Home,
            0xE1 => VirtualKey::End,
            0xE2 => VirtualKey::Up,
            0xE3 => VirtualKey::Down,
            0xE4 => VirtualKey::Left,
            0xE5 => VirtualKey::Right,
            0xE6 => VirtualKey::PageUp,
            0xE7 => VirtualKey::PageDown,
            0xE8 => VirtualKey::Insert,
            0xE9 => VirtualKey::Delete,
            _ => return None,
        })
    }

    /// The byte this key occupies in the console input stream.
    pub const fn code(self) -> u8 {
        self as u8
    }
}

/// Result of feeding one scancode byte to the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecodedEvent {
    /// A character (ASCII, control code, or a raw table byte).
    Character(u8),
    /// A navigation/editing key with no character representation.
    VirtualKey(VirtualKey),
    /// The scancode was consumed but produced nothing to enqueue.
    NoOutput,
}

impl DecodedEvent {
    /// Classifies a keymap table value. Zero is the "no output" sentinel.
    pub const fn from_code(code: u8) -> Self {
        if code == 0 {
            return DecodedEvent::NoOutput;
        }
        match VirtualKey::from_code(code) {
            Some(key) => DecodedEvent::VirtualKey(key),
            None => DecodedEvent::Character(code),
        }
    }

    /// The byte to enqueue for this event, if any.
    pub const fn byte(self) -> Option<u8> {
        match self {
            DecodedEvent::Character(c) => Some(c),
            DecodedEvent::VirtualKey(key) => Some(key.code()),
            DecodedEvent::NoOutput => None,
        }
    }
}

bitflags! {
    /// Modifier and lock state tracked across scancodes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT      = 1 << 0;
        const CTL        = 1 << 1;
        const ALT        = 1 << 2;
        const CAPSLOCK   = 1 << 3;
        const NUMLOCK    = 1 << 4;
        const SCROLLLOCK = 1 << 5;
        /// The previous byte was the 0xE0 extended-scancode prefix.
        const E0ESC      = 1 << 6;
    }
}
