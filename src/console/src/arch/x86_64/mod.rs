//! x86_64 architecture support.
//!
//! Provides the real-hardware platform, the kernel-wide console instance and
//! the `log` backend that writes to it.

pub mod console;
pub mod logger;
pub mod platform;

pub use console::CONSOLE;
pub use platform::X86Platform;
