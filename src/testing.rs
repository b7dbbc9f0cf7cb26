//! Host-side fakes for the radio and delay
//!
//! Scripted link statuses, recorded sleeps and console sinks, so the connect
//! loop can be checked without hardware or real time passing.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::net::Ipv4Addr;
use std::string::String;
use std::rc::Rc;
use std::sync::Arc;
use std::vec::Vec;

use embedded_hal::delay::DelayNs;

use crate::cancel::CancelToken;
use crate::driver::{LinkStatus, StationDriver};

pub const FAKE_IP: Ipv4Addr = Ipv4Addr::new(192, 168, 0, 42);

/// Scripted station: hands out queued statuses, then repeats `steady`.
pub struct FakeStation {
    pub begins: Vec<(String, String)>,
    pub status_polls: u32,
    pub refuse_begin: Option<&'static str>,
    script: VecDeque<LinkStatus>,
    steady: LinkStatus,
    ip: Ipv4Addr,
}

impl FakeStation {
    /// Reports `Disconnected` `misses` times, then `Connected`
    pub fn connecting_after(misses: usize) -> Self {
        let mut station = Self::stuck(LinkStatus::Disconnected);
        station.script = core::iter::repeat_n(LinkStatus::Disconnected, misses).collect();
        station.steady = LinkStatus::Connected;
        station
    }

    /// Reports `status` forever
    pub fn stuck(status: LinkStatus) -> Self {
        Self {
            begins: Vec::new(),
            status_polls: 0,
            refuse_begin: None,
            script: VecDeque::new(),
            steady: status,
            ip: FAKE_IP,
        }
    }

    /// Queue another round, e.g. for a second connect
    pub fn then(mut self, statuses: &[LinkStatus]) -> Self {
        self.script.extend(statuses.iter().copied());
        self
    }
}

impl StationDriver for FakeStation {
    type Error = &'static str;

    fn begin(&mut self, identifier: &str, secret: &str) -> Result<(), Self::Error> {
        self.begins.push((identifier.into(), secret.into()));
        match self.refuse_begin {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn status(&mut self) -> LinkStatus {
        self.status_polls += 1;
        self.script.pop_front().unwrap_or(self.steady)
    }

    fn local_ip(&mut self) -> Ipv4Addr {
        self.ip
    }
}

/// Records every millisecond sleep instead of sleeping.
#[derive(Default)]
pub struct FakeDelay {
    pub sleeps: Vec<u32>,
    /// Panic once this many sleeps happened (bounds non-terminating tests)
    pub tripwire: Option<usize>,
    /// Cancel this token after `cancel_after` sleeps
    pub cancel: Option<(Arc<CancelToken>, usize)>,
    /// Note each sleep as `[<ms>ms]` alongside the console text
    pub transcript: Option<Transcript>,
}

impl FakeDelay {
    pub fn with_tripwire(sleeps: usize) -> Self {
        Self {
            tripwire: Some(sleeps),
            ..Self::default()
        }
    }
}

impl DelayNs for FakeDelay {
    fn delay_ns(&mut self, _ns: u32) {}

    fn delay_ms(&mut self, ms: u32) {
        self.sleeps.push(ms);
        if let Some(transcript) = &mut self.transcript {
            let _ = fmt::Write::write_fmt(transcript, format_args!("[{}ms]", ms));
        }
        if let Some((token, after)) = &self.cancel {
            if self.sleeps.len() >= *after {
                token.cancel();
            }
        }
        if let Some(limit) = self.tripwire {
            if self.sleeps.len() >= limit {
                panic!("still polling after {} sleeps", limit);
            }
        }
    }
}

/// Console shared with a [`FakeDelay`] so sleeps and output land in one log.
#[derive(Clone, Default)]
pub struct Transcript(Rc<RefCell<String>>);

impl Transcript {
    pub fn contents(&self) -> String {
        self.0.borrow().clone()
    }
}

impl fmt::Write for Transcript {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0.borrow_mut().push_str(s);
        Ok(())
    }
}

/// Console whose every write fails.
pub struct BrokenConsole;

impl fmt::Write for BrokenConsole {
    fn write_str(&mut self, _s: &str) -> fmt::Result {
        Err(fmt::Error)
    }
}
