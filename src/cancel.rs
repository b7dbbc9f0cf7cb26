//! Cancellation signal for a blocking connect
//!
//! Lets a caller, or an interrupt handler, stop a connect that would
//! otherwise keep polling.

use core::sync::atomic::{AtomicBool, Ordering};

/// Flag checked by the connect loop before every sleep.
///
/// Can live in a `static` and be tripped from an interrupt handler.
#[derive(Debug, Default)]
pub struct CancelToken {
    cancelled: AtomicBool,
}

impl CancelToken {
    pub const fn new() -> Self {
        Self {
            cancelled: AtomicBool::new(false),
        }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Re-arm the token for another attempt
    pub fn reset(&self) {
        self.cancelled.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static TOKEN: CancelToken = CancelToken::new();

    #[test]
    fn cancel_and_reset() {
        assert!(!TOKEN.is_cancelled());
        TOKEN.cancel();
        assert!(TOKEN.is_cancelled());
        TOKEN.reset();
        assert!(!TOKEN.is_cancelled());
    }
}
