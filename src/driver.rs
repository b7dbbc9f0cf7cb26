//! Radio capability consumed by the connect loop
//!
//! The connect loop only needs to start association, read the link status
//! and read the assigned address, so that is all a driver provides.

use core::fmt::Debug;
use core::net::Ipv4Addr;

/// Link status as reported by the station driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStatus {
    /// Radio up, association or addressing still in progress
    Idle,
    /// Configured network not visible
    NoNetworkFound,
    /// A scan finished
    ScanCompleted,
    /// Associated and holding an address
    Connected,
    /// Association rejected (usually a wrong passphrase)
    ConnectFailed,
    /// Link dropped after being up
    ConnectionLost,
    /// Not associated
    Disconnected,
}

impl LinkStatus {
    pub fn is_connected(self) -> bool {
        self == LinkStatus::Connected
    }
}

/// Station-mode WiFi driver.
///
/// `begin` only starts association; completion is observed by polling
/// `status` until it reports [`LinkStatus::Connected`].
pub trait StationDriver {
    type Error: Debug;

    /// Start associating with `identifier`. An empty `secret` means an open network.
    fn begin(&mut self, identifier: &str, secret: &str) -> Result<(), Self::Error>;

    /// Current link status
    fn status(&mut self) -> LinkStatus;

    /// Address assigned to the station. Only meaningful once connected.
    fn local_ip(&mut self) -> Ipv4Addr;
}

impl<T: StationDriver + ?Sized> StationDriver for &mut T {
    type Error = T::Error;

    fn begin(&mut self, identifier: &str, secret: &str) -> Result<(), Self::Error> {
        (**self).begin(identifier, secret)
    }

    fn status(&mut self) -> LinkStatus {
        (**self).status()
    }

    fn local_ip(&mut self) -> Ipv4Addr {
        (**self).local_ip()
    }
}
