//! Bounded busy-waiting.
//!
//! Device readiness is polled for a fixed number of iterations, each costing
//! one [`PortIo::io_delay`]. The ceiling is a count, not a clock, so the
//! worst case is the same on every CPU: with the default ceiling of 12,800
//! iterations a wait costs at most 51,200 delay-port reads, on the order of
//! 20 ms at ISA bus speed.

use pc_console_hal::PortIo;

/// Polls `ready` until it returns true or `limit` delays have elapsed.
///
/// Returns whether the condition was observed. Callers proceed either way.
pub fn spin_until<P: PortIo + ?Sized>(
    io: &mut P,
    limit: u32,
    mut ready: impl FnMut(&mut P) -> bool,
) -> bool {
    for _ in 0..limit {
        if ready(io) {
            return true;
        }
        io.io_delay();
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::FakeMachine;

    #[test]
    fn test_ready_immediately() {
        let mut machine = FakeMachine::new();
        assert!(spin_until(&mut machine, 10, |_| true));
        assert_eq!(machine.delays, 0);
    }

    #[test]
    fn test_ready_after_some_polls() {
        let mut machine = FakeMachine::new();
        let mut polls = 0;
        assert!(spin_until(&mut machine, 10, |_| {
            polls += 1;
            polls == 3
        }));
        assert_eq!(machine.delays, 2 * 4);
    }

    #[test]
    fn test_gives_up_at_limit() {
        let mut machine = FakeMachine::new();
        assert!(!spin_until(&mut machine, 5, |_| false));
        assert_eq!(machine.delays, 5 * 4);
    }
}
