//! The kernel-wide console.
//!
//! Wraps the single [`Console`] instance that owns the PC's console devices
//! and exposes the entry points the rest of the kernel calls: character I/O
//! for `print!`/`println!` and the line reader, and the interrupt drains for
//! the trap dispatcher.

use core::fmt::{self, Write};
use spin::Mutex;

use super::logger::flush_deferred;
use super::platform::X86Platform;
use crate::config::ConsoleConfig;
use crate::console::Console;
use crate::display::Color;
use pc_console_common::ConfigError;

/// Global console instance.
///
/// The lock stands for exclusive ownership of the devices. Nothing here is
/// re-entrant: taking the lock again from inside a console operation spins
/// forever.
pub static CONSOLE: spin::Once<Mutex<Console<X86Platform>>> = spin::Once::new();

/// Brings up the console devices.
///
/// Idempotent: only the first successful call configures hardware.
pub fn init(config: ConsoleConfig) -> Result<(), ConfigError> {
    if CONSOLE.is_completed() {
        return Ok(());
    }
    // SAFETY: the kernel runs in ring 0 and maps physical memory at
    // `config.phys_offset`; this is the only place a platform is created.
    let hw = unsafe { X86Platform::new(config.phys_offset) };
    let mut console = Console::new(hw, config)?;
    console.init();
    CONSOLE.call_once(|| Mutex::new(console));
    flush_deferred();
    Ok(())
}

fn with_console<R>(f: impl FnOnce(&mut Console<X86Platform>) -> R) -> Option<R> {
    let result = CONSOLE.get().map(|console| f(&mut console.lock()));
    flush_deferred();
    result
}

/// Writes one character to every console device.
pub fn output(c: u8) {
    with_console(|console| console.output(c));
}

/// Returns the next input character, polling the devices first.
pub fn input() -> Option<u8> {
    with_console(|console| console.input()).flatten()
}

/// Spins until a character arrives. `None` if the console is not up.
pub fn getchar() -> Option<u8> {
    with_console(|console| console.blocking_read())
}

/// Reads an edited line into `buf`; see [`Console::read_line`].
pub fn read_line(prompt: Option<&str>, buf: &mut [u8]) -> Option<usize> {
    with_console(|console| console.read_line(prompt, buf))
}

/// Serial IRQ entry point.
///
/// Skipped if the console is busy: whoever holds it polls the devices
/// before reading anyway.
pub fn serial_interrupt() {
    if let Some(mut console) = CONSOLE.get().and_then(|c| c.try_lock()) {
        console.serial_interrupt();
    }
    flush_deferred();
}

/// Keyboard IRQ entry point. Skipped if the console is busy.
pub fn keyboard_interrupt() {
    if let Some(mut console) = CONSOLE.get().and_then(|c| c.try_lock()) {
        console.keyboard_interrupt();
    }
    flush_deferred();
}

/// Sets the text display colors.
pub fn set_color(foreground: Color, background: Color) {
    with_console(|console| console.display().set_color(foreground, background));
}

/// Clears the text display.
pub fn clear_screen() {
    with_console(|console| console.clear_screen());
}

/// Prints to the console without a newline.
#[macro_export]
macro_rules! print {
    ($($arg:tt)*) => {
        $crate::arch::x86_64::console::_print(format_args!($($arg)*))
    };
}

/// Prints to the console with a newline.
#[macro_export]
macro_rules! println {
    () => ($crate::print!("\n"));
    ($($arg:tt)*) => ($crate::print!("{}\n", format_args!($($arg)*)))
}

/// Internal print function used by macros.
#[doc(hidden)]
pub fn _print(args: fmt::Arguments) {
    with_console(|console| {
        let _ = console.write_fmt(args);
    });
}
