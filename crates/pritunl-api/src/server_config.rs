//! Typed settings for creating a VPN server.
//!
//! [`ServerConfig`] is the checked entry point for `create_server`. Loosely
//! typed input (for example a map coming from a configuration layer) goes
//! through [`ServerConfig::from_fields`], which rejects unknown keys and values
//! of the wrong shape before anything is sent.

use crate::models::{NetworkMode, Server};
use pritunl_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Settings accepted when creating a server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Server name.
    #[serde(default)]
    pub name: String,
    /// Transport protocol (`udp` or `tcp`).
    #[serde(default)]
    pub protocol: Option<String>,
    /// Data channel cipher.
    #[serde(default)]
    pub cipher: Option<String>,
    /// HMAC digest.
    #[serde(default)]
    pub hash: Option<String>,
    /// Listening port.
    #[serde(default)]
    pub port: Option<u16>,
    /// Address the server binds to.
    #[serde(default)]
    pub bind_address: Option<String>,
    /// User groups allowed to connect.
    #[serde(default)]
    pub groups: Option<Vec<String>>,
    /// DNS servers pushed to clients.
    #[serde(default)]
    pub dns_servers: Option<Vec<String>>,
    /// DNS search domain pushed to clients.
    #[serde(default)]
    pub search_domain: Option<String>,
    /// VPN network CIDR.
    #[serde(default)]
    pub network: Option<String>,
    /// WireGuard network CIDR.
    #[serde(default)]
    pub network_wg: Option<String>,
    /// WireGuard port.
    #[serde(default)]
    pub port_wg: Option<u16>,
    /// Tunnel or bridge mode.
    #[serde(default)]
    pub network_mode: Option<NetworkMode>,
    /// First bridge address.
    #[serde(default)]
    pub network_start: Option<String>,
    /// Last bridge address.
    #[serde(default)]
    pub network_end: Option<String>,
    /// Enable IPv6.
    #[serde(default)]
    pub ipv6: Option<bool>,
    /// Diffie-Hellman parameter size.
    #[serde(default)]
    pub dh_param_bits: Option<u32>,
    /// Client ping interval in seconds.
    #[serde(default)]
    pub ping_interval: Option<u32>,
    /// Client ping timeout in seconds.
    #[serde(default)]
    pub ping_timeout: Option<u32>,
    /// Link ping interval in seconds.
    #[serde(default)]
    pub link_ping_interval: Option<u32>,
    /// Link ping timeout in seconds.
    #[serde(default)]
    pub link_ping_timeout: Option<u32>,
    /// Session timeout in seconds.
    #[serde(default)]
    pub session_timeout: Option<u32>,
    /// Inactivity timeout in seconds.
    #[serde(default)]
    pub inactive_timeout: Option<u32>,
    /// Maximum connected clients.
    #[serde(default)]
    pub max_clients: Option<u32>,
    /// Maximum devices per user.
    #[serde(default)]
    pub max_devices: Option<u32>,
    /// Number of hosts the server runs on.
    #[serde(default)]
    pub replica_count: Option<u32>,
    /// TCP MSS clamp.
    #[serde(default)]
    pub mss_fix: Option<u32>,
    /// Message shown before connecting.
    #[serde(default)]
    pub pre_connect_msg: Option<String>,
    /// Allowed device class.
    #[serde(default)]
    pub allowed_devices: Option<String>,
    /// Allow several devices per user.
    #[serde(default)]
    pub multi_device: Option<bool>,
    /// Verbose server logging.
    #[serde(default)]
    pub debug: Option<bool>,
    /// Only route listed networks.
    #[serde(default)]
    pub restrict_routes: Option<bool>,
    /// Block DNS outside the tunnel (Windows clients).
    #[serde(default)]
    pub block_outside_dns: Option<bool>,
    /// Map client names in DNS.
    #[serde(default)]
    pub dns_mapping: Option<bool>,
    /// Allow traffic between clients.
    #[serde(default)]
    pub inter_client: Option<bool>,
    /// Use VXLAN between replicas.
    #[serde(default)]
    pub vxlan: Option<bool>,
    /// Require two-step authentication.
    #[serde(default)]
    pub otp_auth: Option<bool>,
    /// Require single sign-on.
    #[serde(default)]
    pub sso_auth: Option<bool>,
    /// Require device authentication.
    #[serde(default)]
    pub device_auth: Option<bool>,
    /// Enable the dynamic firewall.
    #[serde(default)]
    pub dynamic_firewall: Option<bool>,
}

impl ServerConfig {
    /// Create a configuration with only a name set.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Build a configuration from a loosely typed JSON object.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for unknown keys or mistyped values.
    pub fn from_fields(fields: serde_json::Value) -> Result<Self> {
        serde_json::from_value(fields)
            .map_err(|e| Error::Validation(format!("invalid server settings: {e}")))
    }

    /// Set the transport protocol.
    #[must_use]
    pub fn with_protocol(mut self, protocol: impl Into<String>) -> Self {
        self.protocol = Some(protocol.into());
        self
    }

    /// Set the listening port.
    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Set the VPN network CIDR.
    #[must_use]
    pub fn with_network(mut self, network: impl Into<String>) -> Self {
        self.network = Some(network.into());
        self
    }

    /// Enable WireGuard on the given network and port.
    #[must_use]
    pub fn with_wireguard(mut self, network: impl Into<String>, port: u16) -> Self {
        self.network_wg = Some(network.into());
        self.port_wg = Some(port);
        self
    }

    /// Switch to bridge mode with the given address range.
    #[must_use]
    pub fn with_bridge(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.network_mode = Some(NetworkMode::Bridge);
        self.network_start = Some(start.into());
        self.network_end = Some(end.into());
        self
    }

    /// Set the network mode.
    #[must_use]
    pub const fn with_network_mode(mut self, mode: NetworkMode) -> Self {
        self.network_mode = Some(mode);
        self
    }

    /// Set the groups allowed to connect.
    #[must_use]
    pub fn with_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups = Some(groups.into_iter().map(Into::into).collect());
        self
    }

    /// Set the DNS servers pushed to clients.
    #[must_use]
    pub fn with_dns_servers<I, S>(mut self, servers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dns_servers = Some(servers.into_iter().map(Into::into).collect());
        self
    }

    /// Require single sign-on.
    #[must_use]
    pub const fn with_sso_auth(mut self, enabled: bool) -> Self {
        self.sso_auth = Some(enabled);
        self
    }

    /// Require two-step authentication.
    #[must_use]
    pub const fn with_otp_auth(mut self, enabled: bool) -> Self {
        self.otp_auth = Some(enabled);
        self
    }

    /// Check cross-field rules.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] when bridge mode lacks a start or end address.
    pub fn validate(&self) -> Result<()> {
        let missing = |value: &Option<String>| value.as_deref().map_or(true, str::is_empty);

        if self.network_mode == Some(NetworkMode::Bridge)
            && (missing(&self.network_start) || missing(&self.network_end))
        {
            return Err(Error::Validation(format!(
                "the attribute network_mode = {} requires network_start and network_end attributes",
                NetworkMode::Bridge.as_str()
            )));
        }
        Ok(())
    }

    /// True when both a WireGuard network and a non-zero port are set.
    #[must_use]
    pub fn wireguard_enabled(&self) -> bool {
        self.network_wg.as_deref().is_some_and(|n| !n.is_empty())
            && self.port_wg.is_some_and(|p| p > 0)
    }

    /// Convert into the request body for `create_server`.
    #[must_use]
    pub fn to_server(&self) -> Server {
        Server {
            id: None,
            name: self.name.clone(),
            status: None,
            protocol: self.protocol.clone(),
            cipher: self.cipher.clone(),
            hash: self.hash.clone(),
            port: self.port,
            bind_address: self.bind_address.clone(),
            groups: self.groups.clone(),
            dns_servers: self.dns_servers.clone(),
            search_domain: self.search_domain.clone(),
            network: self.network.clone(),
            network_wg: self.network_wg.clone(),
            port_wg: self.port_wg,
            wg: Some(self.wireguard_enabled()),
            network_mode: self.network_mode,
            network_start: self.network_start.clone(),
            network_end: self.network_end.clone(),
            ipv6: self.ipv6,
            dh_param_bits: self.dh_param_bits,
            ping_interval: self.ping_interval,
            ping_timeout: self.ping_timeout,
            link_ping_interval: self.link_ping_interval,
            link_ping_timeout: self.link_ping_timeout,
            session_timeout: self.session_timeout,
            inactive_timeout: self.inactive_timeout,
            max_clients: self.max_clients,
            max_devices: self.max_devices,
            replica_count: self.replica_count,
            mss_fix: self.mss_fix,
            pre_connect_msg: self.pre_connect_msg.clone(),
            allowed_devices: self.allowed_devices.clone(),
            multi_device: self.multi_device,
            debug: self.debug,
            restrict_routes: self.restrict_routes,
            block_outside_dns: self.block_outside_dns,
            dns_mapping: self.dns_mapping,
            inter_client: self.inter_client,
            vxlan: self.vxlan,
            otp_auth: self.otp_auth,
            sso_auth: self.sso_auth,
            device_auth: self.device_auth,
            dynamic_firewall: self.dynamic_firewall,
        }
    }
}
