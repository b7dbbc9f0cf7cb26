//! Error types
//!
//! Connect outcomes other than a link, and configuration mistakes.

use core::fmt;

/// Why a connect attempt ended without a link.
///
/// With the default [`ConnectPolicy`](crate::ConnectPolicy) only `Begin` can
/// occur; the other variants need a bound, `fail_fast` or a cancel token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectError<E> {
    /// Driver refused to start association
    Begin(E),
    /// Waited `attempts` poll intervals without link-up
    TimedOut { attempts: u32 },
    /// Access point rejected the credentials
    AuthFailed,
    /// Configured network not visible
    NetworkNotFound,
    /// Caller tripped the cancel token
    Cancelled,
}

impl<E: fmt::Debug> fmt::Display for ConnectError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectError::Begin(e) => write!(f, "Failed to start association: {:?}", e),
            ConnectError::TimedOut { attempts } => {
                write!(f, "Timed out after {} retries", attempts)
            }
            ConnectError::AuthFailed => write!(f, "Authentication failed"),
            ConnectError::NetworkNotFound => write!(f, "Network not found"),
            ConnectError::Cancelled => write!(f, "Cancelled"),
        }
    }
}

/// Invalid connect configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyError {
    /// Timeout value is not a whole number of milliseconds
    InvalidTimeout,
}

impl fmt::Display for PolicyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyError::InvalidTimeout => write!(f, "Invalid connect timeout"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        let e: ConnectError<&str> = ConnectError::TimedOut { attempts: 20 };
        assert_eq!(e.to_string(), "Timed out after 20 retries");

        let e: ConnectError<&str> = ConnectError::Begin("radio off");
        assert_eq!(e.to_string(), "Failed to start association: \"radio off\"");

        assert_eq!(PolicyError::InvalidTimeout.to_string(), "Invalid connect timeout");
    }
}
