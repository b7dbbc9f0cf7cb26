//! WiFi station connect helper for ESP32 firmware.
//!
//! [`ConnectionManager`] owns a set of credentials and blocks until the
//! station link is up, printing progress to a serial console. The radio is
//! reached through the [`StationDriver`] trait so the connect loop runs the
//! same against the ESP32 hardware adapter (feature `esp32`) and against
//! host-side fakes.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod cancel;
pub mod credentials;
pub mod driver;
pub mod error;
pub mod manager;
pub mod policy;

#[cfg(feature = "esp32")]
pub mod esp;

#[cfg(test)]
mod testing;

pub use cancel::CancelToken;
pub use credentials::ConnectionCredentials;
pub use driver::{LinkStatus, StationDriver};
pub use error::{ConnectError, PolicyError};
pub use manager::{ConnectionManager, ConnectionState};
pub use policy::ConnectPolicy;
