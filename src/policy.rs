//! Connect loop configuration
//!
//! Poll cadence and the optional limits that let a connect give up instead
//! of blocking forever.

use crate::error::PolicyError;

/// Delay between link status polls (milliseconds)
pub const POLL_INTERVAL_MS: u32 = 500;

/// How long and how stubbornly `connect` waits for the link.
///
/// The default polls every 500 ms with no limit and ignores driver failure
/// statuses, so a wrong passphrase or missing network blocks forever.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectPolicy {
    /// Sleep between status polls
    pub poll_interval_ms: u32,
    /// Give up after this many poll intervals without link-up (`None` = never)
    pub max_attempts: Option<u32>,
    /// Stop on `ConnectFailed` / `NoNetworkFound` instead of polling on
    pub fail_fast: bool,
}

impl ConnectPolicy {
    pub const fn new() -> Self {
        Self {
            poll_interval_ms: POLL_INTERVAL_MS,
            max_attempts: None,
            fail_fast: false,
        }
    }

    /// Default policy limited to `max_attempts` waits
    pub const fn bounded(max_attempts: u32) -> Self {
        Self::new().with_max_attempts(max_attempts)
    }

    pub const fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    /// Give up once at least `timeout_ms` has been spent waiting.
    ///
    /// Rounds up to whole poll intervals; set the interval first.
    pub const fn with_timeout_ms(mut self, timeout_ms: u32) -> Self {
        let interval = if self.poll_interval_ms == 0 {
            1
        } else {
            self.poll_interval_ms
        };
        self.max_attempts = Some(timeout_ms.div_ceil(interval));
        self
    }

    pub const fn with_poll_interval_ms(mut self, poll_interval_ms: u32) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    pub const fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Build a policy from the optional `WIFI_CONNECT_TIMEOUT_MS` value.
    ///
    /// Missing, blank or `0` keeps the unbounded default.
    pub fn from_timeout_env(value: Option<&str>) -> Result<Self, PolicyError> {
        let value = match value.map(str::trim) {
            None | Some("") => return Ok(Self::new()),
            Some(v) => v,
        };

        let timeout_ms: u32 = value.parse().map_err(|_| PolicyError::InvalidTimeout)?;
        if timeout_ms == 0 {
            return Ok(Self::new());
        }

        Ok(Self::new().with_timeout_ms(timeout_ms).with_fail_fast(true))
    }

    /// True once `attempts` waits have used up the budget
    pub fn exhausted(&self, attempts: u32) -> bool {
        matches!(self.max_attempts, Some(max) if attempts >= max)
    }
}

impl Default for ConnectPolicy {
    fn default() -> Self {
        Self::new()
    }
}
