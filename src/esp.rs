//! ESP32 station driver
//!
//! Implements [`StationDriver`] on top of esp-wifi. The radio only handles
//! association, so a smoltcp interface with a DHCPv4 socket rides along and
//! the link is reported as connected once DHCP has handed out an address.

use alloc::vec::Vec;
use core::fmt;
use core::net::Ipv4Addr;

use esp_wifi::wifi::{
    AuthMethod, ClientConfiguration, Configuration, WifiController, WifiDevice, WifiError,
};
use log::{debug, info};
use smoltcp::iface::{Config, Interface, SocketHandle, SocketSet};
use smoltcp::socket::dhcpv4;
use smoltcp::time::Instant;
use smoltcp::wire::{EthernetAddress, IpCidr};

use crate::driver::{LinkStatus, StationDriver};

/// Errors from the ESP32 station driver
#[derive(Debug)]
pub enum EspStationError {
    /// Network name or passphrase does not fit the driver's buffers
    CredentialsTooLong,
    /// Radio driver error
    Wifi(WifiError),
}

impl From<WifiError> for EspStationError {
    fn from(e: WifiError) -> Self {
        EspStationError::Wifi(e)
    }
}

impl fmt::Display for EspStationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EspStationError::CredentialsTooLong => write!(f, "Credentials too long"),
            EspStationError::Wifi(e) => write!(f, "WiFi error: {:?}", e),
        }
    }
}

fn now() -> Instant {
    let ms = esp_hal::time::Instant::now()
        .duration_since_epoch()
        .as_millis();
    Instant::from_millis(ms as i64)
}

/// Station-mode radio plus the IP interface that receives the DHCP lease.
pub struct EspStation<'d> {
    controller: WifiController<'d>,
    device: WifiDevice<'d>,
    iface: Interface,
    sockets: SocketSet<'static>,
    dhcp: SocketHandle,
    address: Option<Ipv4Addr>,
}

impl<'d> EspStation<'d> {
    pub fn new(controller: WifiController<'d>, mut device: WifiDevice<'d>) -> Self {
        let hardware_addr = EthernetAddress(device.mac_address());
        let config = Config::new(hardware_addr.into());
        let iface = Interface::new(config, &mut device, now());

        let mut sockets = SocketSet::new(Vec::new());
        let dhcp = sockets.add(dhcpv4::Socket::new());

        Self {
            controller,
            device,
            iface,
            sockets,
            dhcp,
            address: None,
        }
    }

    /// Drive the interface once and pick up DHCP events
    fn poll_dhcp(&mut self) {
        self.iface.poll(now(), &mut self.device, &mut self.sockets);

        let lease = match self.sockets.get_mut::<dhcpv4::Socket>(self.dhcp).poll() {
            Some(dhcpv4::Event::Configured(config)) => Some(Some((config.address, config.router))),
            Some(dhcpv4::Event::Deconfigured) => Some(None),
            None => None,
        };

        match lease {
            Some(Some((cidr, router))) => {
                debug!("WiFi: DHCP configured: {:?}", cidr);
                self.iface.update_ip_addrs(|addrs| {
                    addrs.clear();
                    let _ = addrs.push(IpCidr::Ipv4(cidr));
                });
                if let Some(router) = router {
                    self.iface.routes_mut().add_default_ipv4_route(router).ok();
                } else {
                    self.iface.routes_mut().remove_default_ipv4_route();
                }
                self.address = Some(cidr.address());
            }
            Some(None) => {
                debug!("WiFi: DHCP lease lost");
                self.clear_address();
            }
            None => {}
        }
    }

    fn clear_address(&mut self) {
        self.iface.update_ip_addrs(|addrs| addrs.clear());
        self.iface.routes_mut().remove_default_ipv4_route();
        self.address = None;
    }
}

impl StationDriver for EspStation<'_> {
    type Error = EspStationError;

    fn begin(&mut self, identifier: &str, secret: &str) -> Result<(), Self::Error> {
        let auth_method = if secret.is_empty() {
            AuthMethod::None
        } else {
            AuthMethod::WPA2Personal
        };

        let client_config = Configuration::Client(ClientConfiguration {
            ssid: identifier
                .try_into()
                .map_err(|_| EspStationError::CredentialsTooLong)?,
            password: secret
                .try_into()
                .map_err(|_| EspStationError::CredentialsTooLong)?,
            auth_method,
            ..Default::default()
        });

        if self.controller.is_connected()? {
            self.controller.disconnect()?;
        }
        self.clear_address();
        self.sockets.get_mut::<dhcpv4::Socket>(self.dhcp).reset();

        self.controller.set_configuration(&client_config)?;
        if !self.controller.is_started()? {
            self.controller.start()?;
            info!("WiFi: radio started");
        }

        self.controller.connect()?;
        Ok(())
    }

    fn status(&mut self) -> LinkStatus {
        match self.controller.is_connected() {
            Ok(true) => {
                self.poll_dhcp();
                if self.address.is_some() {
                    LinkStatus::Connected
                } else {
                    LinkStatus::Idle
                }
            }
            Ok(false) => {
                if self.address.is_some() {
                    self.clear_address();
                    return LinkStatus::ConnectionLost;
                }
                LinkStatus::Disconnected
            }
            Err(e) => {
                debug!("WiFi: status error: {:?}", e);
                LinkStatus::Disconnected
            }
        }
    }

    fn local_ip(&mut self) -> Ipv4Addr {
        self.address.unwrap_or(Ipv4Addr::UNSPECIFIED)
    }
}

/// Serial console sink backed by `esp_println`.
pub struct EspConsole;

impl fmt::Write for EspConsole {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        esp_println::print!("{}", s);
        Ok(())
    }
}
