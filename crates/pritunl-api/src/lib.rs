//! Pritunl management API client.
//!
//! Provides typed models for organizations, users, servers, links and
//! locations, and an asynchronous client that signs every request with the
//! API token and secret.
//!
//! ```no_run
//! use pritunl_api::{PritunlApi, PritunlClient};
//!
//! # async fn run() -> pritunl_api::Result<()> {
//! let client = PritunlClient::new("https://vpn.example.com", "token", "secret")?;
//! client.check_connection().await?;
//! for server in client.list_servers().await? {
//!     println!("{} running={}", server.name, server.is_running());
//! }
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]

pub mod api;
pub mod client;
pub mod models;
pub mod server_config;

pub use api::PritunlApi;
pub use client::{PritunlClient, PritunlClientBuilder};
pub use models::{
    Host, HostUri, Link, Links, Location, LocationHost, LocationRoute, NetworkMode, Organization,
    PortForwarding, Route, Server, ServerStatus, User,
};
pub use pritunl_core::id::{
    HostId, LinkId, LocationHostId, LocationId, LocationRouteId, OrganizationId, RouteId,
    ServerId, UserId,
};
pub use pritunl_core::Error;
pub use server_config::ServerConfig;

/// Convenient result alias that reuses the shared Pritunl error type.
pub type Result<T> = pritunl_core::Result<T>;
