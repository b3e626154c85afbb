//! WiFi station-mode adapter.
//!
//! Brings the station up once at boot so the HTTP API is reachable.  The
//! control loop never depends on the network: if every attempt fails the
//! firmware keeps irrigating offline.
//!
//! - **`target_os = "espidf"`**: real ESP-IDF WiFi driver via `BlockingWifi`.
//! - **all other targets**: simulation stub with injectable failures.
//!
//! Up to [`WIFI_MAX_RETRY`] connect attempts are made back to back.

use core::fmt;

use log::{info, warn};

#[cfg(target_os = "espidf")]
use esp_idf_svc::wifi::{AuthMethod, BlockingWifi, ClientConfiguration, Configuration, EspWifi};

use crate::config::WIFI_MAX_RETRY;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WifiError {
    NoCredentials,
    InvalidSsid,
    InvalidPassword,
    ConnectionFailed { attempts: u32 },
}

impl fmt::Display for WifiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCredentials => f.write_str("no station credentials"),
            Self::InvalidSsid => f.write_str("SSID must be 1-32 printable ASCII bytes"),
            Self::InvalidPassword => {
                f.write_str("password must be 8-64 bytes, or empty for an open network")
            }
            Self::ConnectionFailed { attempts } => {
                write!(f, "no connection to the AP after {} attempts", attempts)
            }
        }
    }
}

impl std::error::Error for WifiError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WifiState {
    Disconnected,
    Connected,
    Failed,
}

/// Station credentials that fit the IDF client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    ssid: heapless::String<32>,
    password: heapless::String<64>,
}

impl Credentials {
    /// An empty `password` selects an open network.
    pub fn new(ssid: &str, password: &str) -> Result<Self, WifiError> {
        if ssid.is_empty() || !ssid.bytes().all(|b| (0x20..=0x7E).contains(&b)) {
            return Err(WifiError::InvalidSsid);
        }
        if !password.is_empty() && password.len() < 8 {
            return Err(WifiError::InvalidPassword);
        }
        Ok(Self {
            ssid: ssid.try_into().map_err(|_| WifiError::InvalidSsid)?,
            password: password.try_into().map_err(|_| WifiError::InvalidPassword)?,
        })
    }

    pub fn ssid(&self) -> &str {
        &self.ssid
    }

    pub fn is_open(&self) -> bool {
        self.password.is_empty()
    }
}

pub struct WifiAdapter {
    state: WifiState,
    credentials: Option<Credentials>,
    #[cfg(target_os = "espidf")]
    wifi: BlockingWifi<EspWifi<'static>>,
    /// Simulation: number of upcoming attempts that will fail.
    #[cfg(not(target_os = "espidf"))]
    sim_failures: u32,
    #[cfg(not(target_os = "espidf"))]
    sim_attempts: u32,
}

impl WifiAdapter {
    #[cfg(target_os = "espidf")]
    pub fn new(wifi: BlockingWifi<EspWifi<'static>>) -> Self {
        Self {
            state: WifiState::Disconnected,
            credentials: None,
            wifi,
        }
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new() -> Self {
        Self {
            state: WifiState::Disconnected,
            credentials: None,
            sim_failures: 0,
            sim_attempts: 0,
        }
    }

    pub fn state(&self) -> WifiState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state == WifiState::Connected
    }

    pub fn set_credentials(&mut self, ssid: &str, password: &str) -> Result<(), WifiError> {
        let creds = Credentials::new(ssid, password)?;
        info!("WiFi: station SSID '{}'", creds.ssid());
        self.credentials = Some(creds);
        Ok(())
    }

    /// Join the configured AP.  Already being connected is success.
    pub fn connect(&mut self) -> Result<(), WifiError> {
        let Some(creds) = self.credentials.clone() else {
            return Err(WifiError::NoCredentials);
        };
        if self.is_connected() {
            return Ok(());
        }

        for attempt in 1..=WIFI_MAX_RETRY {
            info!("WiFi: connecting to '{}' ({}/{})", creds.ssid(), attempt, WIFI_MAX_RETRY);
            if self.attempt(&creds) {
                self.state = WifiState::Connected;
                return Ok(());
            }
            warn!("WiFi: retry to connect to the AP");
        }

        self.state = WifiState::Failed;
        warn!("WiFi: giving up on '{}'", creds.ssid());
        Err(WifiError::ConnectionFailed {
            attempts: WIFI_MAX_RETRY,
        })
    }

    #[cfg(target_os = "espidf")]
    fn attempt(&mut self, creds: &Credentials) -> bool {
        if let Err(e) = self.join(creds) {
            warn!("WiFi: {}", e);
            let _ = self.wifi.disconnect();
            return false;
        }
        true
    }

    #[cfg(target_os = "espidf")]
    fn join(&mut self, creds: &Credentials) -> anyhow::Result<()> {
        let client = ClientConfiguration {
            ssid: creds
                .ssid
                .as_str()
                .try_into()
                .map_err(|_| anyhow::anyhow!("SSID does not fit"))?,
            password: creds
                .password
                .as_str()
                .try_into()
                .map_err(|_| anyhow::anyhow!("password does not fit"))?,
            auth_method: if creds.is_open() {
                AuthMethod::None
            } else {
                AuthMethod::WPA2Personal
            },
            ..Default::default()
        };
        self.wifi.set_configuration(&Configuration::Client(client))?;
        if !self.wifi.is_started()? {
            self.wifi.start()?;
        }
        self.wifi.connect()?;
        self.wifi.wait_netif_up()?;
        let ip = self.wifi.wifi().sta_netif().get_ip_info()?;
        info!("WiFi: got ip {}", ip.ip);
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn attempt(&mut self, creds: &Credentials) -> bool {
        self.sim_attempts += 1;
        if self.sim_failures > 0 {
            self.sim_failures -= 1;
            warn!("WiFi(sim): attempt {} failed", self.sim_attempts);
            return false;
        }
        info!("WiFi(sim): joined '{}'", creds.ssid());
        true
    }

    /// Make the next `n` simulated attempts fail.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_fail_next(&mut self, n: u32) {
        self.sim_failures = n;
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn sim_attempts(&self) -> u32 {
        self.sim_attempts
    }
}

#[cfg(not(target_os = "espidf"))]
impl Default for WifiAdapter {
    fn default() -> Self {
        Self::new()
    }
}
