//! Station connect loop
//!
//! Starts association with the stored credentials and polls the driver until
//! the link is up, echoing progress to a serial console:
//!
//! ```text
//! Conectando ao Wi-Fi.....
//! Conectado!
//! Endereço IP: 192.168.0.42
//! ```
//!
//! The loop sleeps the calling context between polls, so nothing else runs on
//! a single-threaded target while connecting.

use core::fmt::{self, Write};
use core::net::Ipv4Addr;

use embedded_hal::delay::DelayNs;
use log::{debug, info, warn};
use secrecy::ExposeSecret;

use crate::cancel::CancelToken;
use crate::credentials::ConnectionCredentials;
use crate::driver::{LinkStatus, StationDriver};
use crate::error::ConnectError;
use crate::policy::ConnectPolicy;

const MSG_CONNECTING: &str = "Conectando ao Wi-Fi...";
const MSG_PROGRESS: &str = ".";
const MSG_CONNECTED: &str = "\nConectado!\n";
const MSG_ADDRESS: &str = "Endereço IP: ";

/// Where the manager is in the connect sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Nothing started, or the last attempt failed
    Idle,
    /// `begin` issued, waiting for link-up. `attempts` counts the waits
    /// that ended in another status check.
    Connecting { attempts: u32 },
    /// Link up with this address
    Connected(Ipv4Addr),
}

/// Owns the credentials and the parts needed to bring the station link up.
pub struct ConnectionManager<D, T, W> {
    credentials: ConnectionCredentials,
    policy: ConnectPolicy,
    driver: D,
    delay: T,
    console: W,
    state: ConnectionState,
    /// Last status check missed; the next `poll` follows a wait
    retry_pending: bool,
}

impl<D, T, W> ConnectionManager<D, T, W>
where
    D: StationDriver,
    T: DelayNs,
    W: Write,
{
    pub fn new(credentials: ConnectionCredentials, driver: D, delay: T, console: W) -> Self {
        Self {
            credentials,
            policy: ConnectPolicy::default(),
            driver,
            delay,
            console,
            state: ConnectionState::Idle,
            retry_pending: false,
        }
    }

    pub fn with_policy(mut self, policy: ConnectPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Associate and block until the link is up.
    ///
    /// Under the default policy this returns only once connected (or if the
    /// driver refuses `begin`); a network that never comes up blocks forever.
    /// Every call starts over with `begin`, even when already connected.
    pub fn connect(&mut self) -> Result<Ipv4Addr, ConnectError<D::Error>> {
        self.run(None)
    }

    /// Like [`connect`](Self::connect), but gives up with
    /// [`ConnectError::Cancelled`] once `cancel` is tripped.
    pub fn connect_with_cancel(
        &mut self,
        cancel: &CancelToken,
    ) -> Result<Ipv4Addr, ConnectError<D::Error>> {
        self.run(Some(cancel))
    }

    fn run(&mut self, cancel: Option<&CancelToken>) -> Result<Ipv4Addr, ConnectError<D::Error>> {
        self.start()?;

        loop {
            if let Some(addr) = self.poll()? {
                return Ok(addr);
            }

            if cancel.is_some_and(CancelToken::is_cancelled) {
                return Err(self.abort(ConnectError::Cancelled));
            }

            self.delay.delay_ms(self.policy.poll_interval_ms);
        }
    }

    /// Issue `begin` and print the start message. First half of a
    /// non-blocking connect; follow with [`poll`](Self::poll).
    pub fn start(&mut self) -> Result<(), ConnectError<D::Error>> {
        self.state = ConnectionState::Idle;
        self.retry_pending = false;

        let identifier = self.credentials.identifier();
        self.driver
            .begin(identifier, self.credentials.secret().expose_secret())
            .map_err(|e| {
                warn!("WiFi: begin failed for '{}': {:?}", identifier, e);
                ConnectError::Begin(e)
            })?;

        info!("WiFi: associating with '{}'...", identifier);
        self.emit(format_args!("{}", MSG_CONNECTING));
        self.state = ConnectionState::Connecting { attempts: 0 };
        Ok(())
    }

    /// Check the link once.
    ///
    /// Returns the address once connected, `None` while still waiting, or an
    /// error when the policy says to stop. The caller sleeps one poll
    /// interval between calls; every call after a miss prints one progress
    /// marker for that wait before checking again.
    pub fn poll(&mut self) -> Result<Option<Ipv4Addr>, ConnectError<D::Error>> {
        let mut attempts = match self.state {
            ConnectionState::Idle => {
                self.start()?;
                0
            }
            ConnectionState::Connecting { attempts } => attempts,
            ConnectionState::Connected(addr) => return Ok(Some(addr)),
        };

        if self.retry_pending {
            self.emit(format_args!("{}", MSG_PROGRESS));
            attempts = attempts.saturating_add(1);
            self.retry_pending = false;
            self.state = ConnectionState::Connecting { attempts };
        }

        let status = self.driver.status();
        if status.is_connected() {
            return Ok(Some(self.finish()));
        }

        if self.policy.fail_fast {
            match status {
                LinkStatus::ConnectFailed => return Err(self.abort(ConnectError::AuthFailed)),
                LinkStatus::NoNetworkFound => {
                    return Err(self.abort(ConnectError::NetworkNotFound));
                }
                _ => {}
            }
        }

        debug!("WiFi: status {:?} after {} waits", status, attempts);
        if self.policy.exhausted(attempts) {
            return Err(self.abort(ConnectError::TimedOut { attempts }));
        }

        self.retry_pending = true;
        Ok(None)
    }

    fn finish(&mut self) -> Ipv4Addr {
        let addr = self.driver.local_ip();
        self.emit(format_args!("{}", MSG_CONNECTED));
        self.emit(format_args!("{}", MSG_ADDRESS));
        self.emit(format_args!("{}\n", addr));

        info!("WiFi: connected to '{}', IP {}", self.credentials.identifier(), addr);
        self.state = ConnectionState::Connected(addr);
        addr
    }

    fn abort(&mut self, error: ConnectError<D::Error>) -> ConnectError<D::Error> {
        self.emit(format_args!("\n"));
        warn!("WiFi: giving up on '{}': {}", self.credentials.identifier(), error);
        self.state = ConnectionState::Idle;
        self.retry_pending = false;
        error
    }

    /// Console output is best effort; a failing sink never stops the connect.
    fn emit(&mut self, args: fmt::Arguments<'_>) {
        if self.console.write_fmt(args).is_err() {
            debug!("WiFi: console write failed");
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn credentials(&self) -> &ConnectionCredentials {
        &self.credentials
    }

    pub fn policy(&self) -> &ConnectPolicy {
        &self.policy
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    pub fn delay(&self) -> &T {
        &self.delay
    }

    pub fn console(&self) -> &W {
        &self.console
    }

    /// Give back the driver, delay and console
    pub fn release(self) -> (D, T, W) {
        (self.driver, self.delay, self.console)
    }
}
