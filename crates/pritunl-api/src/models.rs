//! Pritunl entity models.
//!
//! The management API is loose about its JSON: list fields come back as
//! `null`, and a few location host counters arrive as either numbers or
//! strings. The deserializers at the bottom of this module absorb those
//! quirks so callers see plain Rust types.

use pritunl_core::id::{
    HostId, LinkId, LocationHostId, LocationId, LocationRouteId, OrganizationId, RouteId,
    ServerId, UserId,
};
use pritunl_core::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize};

/// Link type used for site-to-site links.
pub const LINK_TYPE_SITE_TO_SITE: &str = "site_to_site";
/// Default link action on disconnect.
pub const LINK_ACTION_RESTART: &str = "restart";
/// Default IKE proposal for new links.
pub const DEFAULT_PREFERRED_IKE: &str = "aes128-sha256-x25519";
/// Default ESP proposal for new links.
pub const DEFAULT_PREFERRED_ESP: &str = "aes128gcm128-x25519";

/// A Pritunl organization.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Organization {
    /// Organization id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<OrganizationId>,
    /// Display name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Whether API access is enabled for the organization.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_api: Option<bool>,
    /// Number of users (read-only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_count: Option<u32>,
}

/// A user within an organization.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    /// User id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<UserId>,
    /// Owning organization; set by the client from the call arguments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<OrganizationId>,
    /// Organization name (read-only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_name: Option<String>,
    /// User name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// User type (`client`, `server`, ...).
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub user_type: Option<String>,
    /// Authentication source (`local`, `saml`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_type: Option<String>,
    /// E-mail address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Group memberships.
    #[serde(default, deserialize_with = "null_as_default")]
    pub groups: Vec<String>,
    /// Whether the user is disabled.
    #[serde(default, deserialize_with = "null_as_default")]
    pub disabled: bool,
    /// Optional PIN.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pin: Option<String>,
    /// Networks linked to this user.
    #[serde(default, deserialize_with = "null_as_default")]
    pub network_links: Vec<String>,
    /// Skip secondary authentication.
    #[serde(default, deserialize_with = "null_as_default")]
    pub bypass_secondary: bool,
    /// Allow client-to-client traffic.
    #[serde(default, deserialize_with = "null_as_default")]
    pub client_to_client: bool,
    /// Per-user DNS servers.
    #[serde(default, deserialize_with = "null_as_default")]
    pub dns_servers: Vec<String>,
    /// Per-user DNS suffix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dns_suffix: Option<String>,
    /// Allowed MAC addresses.
    #[serde(default, deserialize_with = "null_as_default")]
    pub mac_addresses: Vec<String>,
    /// Port forwarding rules.
    #[serde(default, deserialize_with = "null_as_default")]
    pub port_forwarding: Vec<PortForwarding>,
}

/// Port forwarding rule attached to a user.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PortForwarding {
    /// Protocol (`tcp` or `udp`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    /// Port or port range on the client.
    #[serde(default, deserialize_with = "null_as_default")]
    pub port: String,
    /// Destination port on the server side.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dport: Option<String>,
}

/// Runtime status of a VPN server.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ServerStatus {
    /// Server is running.
    Online,
    /// Server is stopped.
    Offline,
    /// Any status this client does not know about.
    #[serde(other)]
    Unknown,
}

/// Network mode of a VPN server.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum NetworkMode {
    /// Routed tunnel (default).
    #[default]
    Tunnel,
    /// Layer 2 bridge; requires a start and end address.
    Bridge,
}

impl NetworkMode {
    /// Wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tunnel => "tunnel",
            Self::Bridge => "bridge",
        }
    }
}

/// A VPN server.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Server {
    /// Server id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ServerId>,
    /// Display name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Runtime status (read-only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ServerStatus>,
    /// Transport protocol (`udp` or `tcp`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    /// Data channel cipher.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cipher: Option<String>,
    /// HMAC digest.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    /// Listening port.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    /// Address the server binds to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind_address: Option<String>,
    /// User groups allowed to connect.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<String>>,
    /// DNS servers pushed to clients.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dns_servers: Option<Vec<String>>,
    /// DNS search domain pushed to clients.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_domain: Option<String>,
    /// VPN network CIDR.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
    /// WireGuard network CIDR.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_wg: Option<String>,
    /// WireGuard port.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port_wg: Option<u16>,
    /// WireGuard enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wg: Option<bool>,
    /// Tunnel or bridge mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_mode: Option<NetworkMode>,
    /// First bridge address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_start: Option<String>,
    /// Last bridge address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_end: Option<String>,
    /// Enable IPv6.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv6: Option<bool>,
    /// Diffie-Hellman parameter size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dh_param_bits: Option<u32>,
    /// Client ping interval in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ping_interval: Option<u32>,
    /// Client ping timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ping_timeout: Option<u32>,
    /// Link ping interval in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_ping_interval: Option<u32>,
    /// Link ping timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_ping_timeout: Option<u32>,
    /// Session timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_timeout: Option<u32>,
    /// Inactivity timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inactive_timeout: Option<u32>,
    /// Maximum connected clients.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_clients: Option<u32>,
    /// Maximum devices per user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_devices: Option<u32>,
    /// Number of hosts the server runs on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replica_count: Option<u32>,
    /// TCP MSS clamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mss_fix: Option<u32>,
    /// Message shown before connecting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_connect_msg: Option<String>,
    /// Allowed device class.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_devices: Option<String>,
    /// Allow several devices per user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multi_device: Option<bool>,
    /// Verbose server logging.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug: Option<bool>,
    /// Only route listed networks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restrict_routes: Option<bool>,
    /// Block DNS outside the tunnel (Windows clients).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_outside_dns: Option<bool>,
    /// Map client names in DNS.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dns_mapping: Option<bool>,
    /// Allow traffic between clients.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inter_client: Option<bool>,
    /// Use VXLAN between replicas.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vxlan: Option<bool>,
    /// Require two-step authentication.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub otp_auth: Option<bool>,
    /// Require single sign-on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sso_auth: Option<bool>,
    /// Require device authentication.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_auth: Option<bool>,
    /// Enable the dynamic firewall.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dynamic_firewall: Option<bool>,
}

impl Server {
    /// True when the server reports itself online.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.status == Some(ServerStatus::Online)
    }
}

/// A network route on a VPN server.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Route {
    /// Route id. Pritunl derives it from the network when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RouteId>,
    /// Owning server (read-only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<ServerId>,
    /// Routed network CIDR.
    #[serde(default, deserialize_with = "null_as_default")]
    pub network: String,
    /// Free-form comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Route metric.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric: Option<u32>,
    /// NAT traffic for this route.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nat: Option<bool>,
    /// Interface used for NAT.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nat_interface: Option<String>,
    /// NAT netmap network.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nat_netmap: Option<String>,
    /// Route through the server gateway.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub net_gateway: Option<bool>,
    /// Advertise the route to cloud providers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advertise: Option<bool>,
}

impl Route {
    /// Create a route for the given network.
    #[must_use]
    pub fn new(network: impl Into<String>) -> Self {
        Self {
            network: network.into(),
            ..Self::default()
        }
    }

    /// Identifier used in route paths.
    ///
    /// Falls back to the lowercase hex encoding of the network, which is how
    /// Pritunl keys server routes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the route has neither an id nor a network.
    pub fn route_id(&self) -> Result<RouteId> {
        if let Some(id) = &self.id {
            return Ok(id.clone());
        }
        if self.network.is_empty() {
            return Err(Error::Validation(
                "route has neither an id nor a network".to_string(),
            ));
        }
        RouteId::try_from(hex::encode(self.network.as_bytes()))
    }
}

/// A Pritunl host (node).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Host {
    /// Host id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<HostId>,
    /// Display name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Host name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    /// `online` or `offline`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Public IPv4 address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_addr: Option<String>,
    /// Public IPv6 address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_addr6: Option<String>,
    /// Local IPv4 address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_addr: Option<String>,
    /// Local IPv6 address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_addr6: Option<String>,
    /// Availability group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability_group: Option<String>,
    /// Software version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// A site-to-site link.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Link {
    /// Link id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<LinkId>,
    /// Display name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Link type, usually `site_to_site`.
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub link_type: String,
    /// Action on disconnect (`hold`, `restart`, ...).
    #[serde(default, deserialize_with = "null_as_default")]
    pub action: String,
    /// Preferred IKE proposal.
    #[serde(default, deserialize_with = "null_as_default")]
    pub preferred_ike: String,
    /// Preferred ESP proposal.
    #[serde(default, deserialize_with = "null_as_default")]
    pub preferred_esp: String,
    /// Check host reachability.
    #[serde(default, deserialize_with = "null_as_default")]
    pub host_check: bool,
    /// Enable IPv6.
    #[serde(default, deserialize_with = "null_as_default")]
    pub ipv6: bool,
    /// Only use the preferred proposals.
    #[serde(default, deserialize_with = "null_as_default")]
    pub force_preferred: bool,
    /// Link status (read-only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl Link {
    /// Create a site-to-site link with the usual defaults.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            link_type: LINK_TYPE_SITE_TO_SITE.to_string(),
            action: LINK_ACTION_RESTART.to_string(),
            preferred_ike: DEFAULT_PREFERRED_IKE.to_string(),
            preferred_esp: DEFAULT_PREFERRED_ESP.to_string(),
            host_check: false,
            ipv6: false,
            force_preferred: true,
            status: None,
        }
    }
}

/// One page of the link listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Links {
    /// Current page (zero when unpaged).
    #[serde(default, deserialize_with = "null_as_default")]
    pub page: u32,
    /// Number of pages.
    #[serde(default, deserialize_with = "null_as_default")]
    pub page_total: u32,
    /// Links on this page.
    #[serde(default, deserialize_with = "null_as_default")]
    pub links: Vec<Link>,
}

/// A location within a link.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Location {
    /// Location id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<LocationId>,
    /// Display name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Location type.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub location_type: Option<String>,
    /// Enable IPv6.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "std::ops::Not::not"
    )]
    pub ipv6: bool,
    /// Owning link; set by the client from the call arguments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_id: Option<LinkId>,
    /// Type of the owning link.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_type: Option<String>,
    /// Embedded hosts (read representation).
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub hosts: Vec<LocationHost>,
    /// Embedded routes (read representation).
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub routes: Vec<LocationRoute>,
    /// Peer state, passed through untouched.
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub peers: Vec<serde_json::Value>,
}

impl Location {
    /// Create a location with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// A route within a link location.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LocationRoute {
    /// Route id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<LocationRouteId>,
    /// Routed network CIDR.
    #[serde(default, deserialize_with = "null_as_default")]
    pub network: String,
    /// Owning link.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_id: Option<LinkId>,
    /// Owning location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_id: Option<LocationId>,
}

impl LocationRoute {
    /// Create a route for the given network.
    #[must_use]
    pub fn new(network: impl Into<String>) -> Self {
        Self {
            network: network.into(),
            ..Self::default()
        }
    }
}

/// A host endpoint within a link location.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LocationHost {
    /// Host id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<LocationHostId>,
    /// Display name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Owning link.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_id: Option<LinkId>,
    /// Owning location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_id: Option<LocationId>,
    /// Connection status (read-only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Host list reported by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hosts: Option<String>,
    /// Available hosts.
    #[serde(default, deserialize_with = "null_as_default")]
    pub hosts_state_available: u32,
    /// Total hosts.
    #[serde(default, deserialize_with = "null_as_default")]
    pub hosts_state_total: u32,
    /// Connection timeout in seconds.
    #[serde(default, deserialize_with = "lenient_i64", skip_serializing_if = "Option::is_none")]
    pub timeout: Option<i64>,
    /// Host priority.
    #[serde(default, deserialize_with = "null_as_default")]
    pub priority: i64,
    /// Reconnect backoff in seconds.
    #[serde(default, deserialize_with = "lenient_i64", skip_serializing_if = "Option::is_none")]
    pub backoff: Option<i64>,
    /// Ping timestamp TTL in seconds.
    #[serde(default, deserialize_with = "lenient_i64", skip_serializing_if = "Option::is_none")]
    pub ping_timestamp_ttl: Option<i64>,
    /// Static host (no dynamic address).
    #[serde(rename = "static", default, deserialize_with = "null_as_default")]
    pub is_static: bool,
    /// Public address.
    #[serde(default, deserialize_with = "null_as_default")]
    pub public_address: String,
    /// Local address.
    #[serde(default, deserialize_with = "null_as_default")]
    pub local_address: String,
    /// IPv6 address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address6: Option<String>,
    /// Software version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Connection URI, filled in from the `/uri` sub-resource.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

impl LocationHost {
    /// Create a host with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Body of the location host `/uri` sub-resource.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct HostUri {
    /// Host id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<LocationHostId>,
    /// Connection URI.
    #[serde(default, deserialize_with = "null_as_default")]
    pub uri: String,
}

/// Treat an explicit JSON `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accept an integer given as a number, a numeric string, an empty string or null.
fn lenient_i64<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Int(i64),
        Float(f64),
        Text(String),
    }

    match Option::<NumberOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrString::Int(value)) => Ok(Some(value)),
        #[allow(clippy::cast_possible_truncation)]
        Some(NumberOrString::Float(value)) => Ok(Some(value as i64)),
        Some(NumberOrString::Text(text)) => {
            let text = text.trim();
            if text.is_empty() {
                return Ok(None);
            }
            text.parse::<i64>()
                .map(Some)
                .map_err(|e| serde::de::Error::custom(format!("invalid integer {text:?}: {e}")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn route_id_prefers_explicit_id() {
        let route = Route {
            id: Some(RouteId::parse_str("abc").unwrap()),
            network: "10.0.0.0/24".into(),
            ..Route::default()
        };
        assert_eq!(route.route_id().unwrap().as_str(), "abc");
    }

    #[test]
    fn route_id_falls_back_to_hex_network() {
        let route = Route::new("10.0.0.0/24");
        assert_eq!(route.route_id().unwrap().as_str(), "31302e302e302e302f3234");
    }

    #[test]
    fn route_id_requires_network() {
        let err = Route::default().route_id().unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn link_new_applies_defaults() {
        let link = Link::new("l1");
        assert_eq!(link.link_type, "site_to_site");
        assert_eq!(link.action, "restart");
        assert_eq!(link.preferred_ike, "aes128-sha256-x25519");
        assert_eq!(link.preferred_esp, "aes128gcm128-x25519");
        assert!(link.force_preferred);
        assert!(!link.host_check);
    }

    #[test]
    fn server_status_unknown_value() {
        let server: Server =
            serde_json::from_value(json!({"id": "s1", "name": "vpn", "status": "pending"}))
                .unwrap();
        assert_eq!(server.status, Some(ServerStatus::Unknown));
        assert!(!server.is_running());

        let running: Server = serde_json::from_value(json!({"status": "online"})).unwrap();
        assert!(running.is_running());
    }

    #[test]
    fn user_null_lists_become_empty() {
        let user: User = serde_json::from_value(json!({
            "id": "u1",
            "name": "alice",
            "groups": null,
            "dns_servers": null,
            "port_forwarding": null
        }))
        .unwrap();
        assert!(user.groups.is_empty());
        assert!(user.dns_servers.is_empty());
        assert!(user.port_forwarding.is_empty());
    }

    #[test]
    fn location_host_lenient_numbers() {
        let host: LocationHost = serde_json::from_value(json!({
            "id": "h1",
            "name": "edge",
            "timeout": null,
            "backoff": "30",
            "ping_timestamp_ttl": 120,
            "priority": null,
            "static": true,
            "public_address": null
        }))
        .unwrap();
        assert_eq!(host.timeout, None);
        assert_eq!(host.backoff, Some(30));
        assert_eq!(host.ping_timestamp_ttl, Some(120));
        assert_eq!(host.priority, 0);
        assert!(host.is_static);
        assert!(host.public_address.is_empty());
    }

    #[test]
    fn location_host_rejects_garbage_number() {
        let result = serde_json::from_value::<LocationHost>(json!({"timeout": "soon"}));
        assert!(result.is_err());
    }

    #[test]
    fn location_serializes_without_empty_collections() {
        let mut location = Location::new("loc1");
        location.link_id = Some(LinkId::parse_str("l1").unwrap());
        let value = serde_json::to_value(&location).unwrap();
        assert_eq!(value, json!({"name": "loc1", "link_id": "l1"}));
    }

    #[test]
    fn links_page_with_null_links() {
        let links: Links =
            serde_json::from_value(json!({"page": 0, "page_total": 0, "links": null})).unwrap();
        assert!(links.links.is_empty());
    }

    #[test]
    fn scalar_nulls_become_defaults() {
        let links: Links = serde_json::from_value(json!({
            "page": null,
            "page_total": null,
            "links": [{"id": "a", "name": null, "preferred_ike": null, "host_check": null}]
        }))
        .unwrap();
        assert_eq!(links.page, 0);
        assert_eq!(links.page_total, 0);
        assert!(links.links[0].name.is_empty());
        assert!(links.links[0].preferred_ike.is_empty());
        assert!(!links.links[0].host_check);

        let org: Organization = serde_json::from_value(json!({"id": "o1", "name": null})).unwrap();
        assert!(org.name.is_empty());

        let location: Location =
            serde_json::from_value(json!({"id": "l1", "name": "loc", "ipv6": null})).unwrap();
        assert!(!location.ipv6);

        let user: User = serde_json::from_value(json!({
            "name": "bob",
            "disabled": null,
            "client_to_client": null
        }))
        .unwrap();
        assert!(!user.disabled);
    }

    #[test]
    fn invalid_ids_in_responses_are_rejected() {
        let result = serde_json::from_value::<Link>(json!({"id": "a/b", "name": "l1"}));
        assert!(result.is_err());
    }
}
