//! Station credentials
//!
//! Owned copies of the network name and passphrase handed to the driver on
//! every connect.

use alloc::string::String;
use core::fmt;

use secrecy::{ExposeSecret, SecretString};

/// Network name and passphrase used for association.
///
/// Both strings are copied in at construction and never change afterwards.
/// Nothing is validated: an empty identifier is accepted and simply fails at
/// the driver, an empty secret selects an open network.
pub struct ConnectionCredentials {
    identifier: String,
    secret: SecretString,
}

impl ConnectionCredentials {
    pub fn new(identifier: impl Into<String>, secret: impl Into<String>) -> Self {
        let secret: String = secret.into();
        Self {
            identifier: identifier.into(),
            secret: SecretString::from(secret),
        }
    }

    /// Network name (SSID)
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Passphrase, kept out of `Debug` output
    pub fn secret(&self) -> &SecretString {
        &self.secret
    }

    /// True when no passphrase was given
    pub fn is_open(&self) -> bool {
        self.secret.expose_secret().is_empty()
    }
}

impl fmt::Debug for ConnectionCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionCredentials")
            .field("identifier", &self.identifier)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}
