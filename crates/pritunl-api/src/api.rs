//! The Pritunl management API as a trait.
//!
//! Consumers hold a `dyn PritunlApi` (usually a [`PritunlClient`]) so their
//! logic can be tested against the generated `MockPritunlApi`.
//!
//! Composite keys are always passed parent first: `(link_id, location_id, id)`.
//!
//! [`PritunlClient`]: crate::PritunlClient

use crate::models::{
    Host, Link, Location, LocationHost, LocationRoute, Organization, Route, Server, User,
};
use crate::server_config::ServerConfig;
use crate::Result;
use async_trait::async_trait;
use pritunl_core::id::{
    HostId, LinkId, LocationHostId, LocationId, LocationRouteId, OrganizationId, ServerId, UserId,
};

/// Operations exposed by a Pritunl server.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PritunlApi: Send + Sync {
    /// Verify that the server is reachable and accepts the credentials.
    async fn check_connection(&self) -> Result<()>;

    // Organizations

    /// List all organizations.
    async fn list_organizations(&self) -> Result<Vec<Organization>>;
    /// Fetch one organization.
    async fn get_organization(&self, id: &OrganizationId) -> Result<Organization>;
    /// Create an organization with the given name.
    async fn create_organization(&self, name: &str) -> Result<Organization>;
    /// Replace an organization's settings.
    async fn update_organization(
        &self,
        id: &OrganizationId,
        organization: &Organization,
    ) -> Result<()>;
    /// Delete an organization.
    async fn delete_organization(&self, id: &OrganizationId) -> Result<()>;

    // Users

    /// Fetch one user.
    async fn get_user(&self, organization_id: &OrganizationId, id: &UserId) -> Result<User>;
    /// Create a user in the organization.
    async fn create_user(&self, organization_id: &OrganizationId, user: &User) -> Result<User>;
    /// Replace a user's settings.
    async fn update_user(
        &self,
        organization_id: &OrganizationId,
        id: &UserId,
        user: &User,
    ) -> Result<()>;
    /// Delete a user.
    async fn delete_user(&self, organization_id: &OrganizationId, id: &UserId) -> Result<()>;

    // Servers

    /// List all VPN servers.
    async fn list_servers(&self) -> Result<Vec<Server>>;
    /// Fetch one VPN server.
    async fn get_server(&self, id: &ServerId) -> Result<Server>;
    /// Validate the settings and create a server.
    ///
    /// Validation failures are reported before any request is sent.
    async fn create_server(&self, config: &ServerConfig) -> Result<Server>;
    /// Replace a server's settings. The server must be stopped.
    async fn update_server(&self, id: &ServerId, server: &Server) -> Result<()>;
    /// Delete a server.
    async fn delete_server(&self, id: &ServerId) -> Result<()>;
    /// Start a server.
    async fn start_server(&self, id: &ServerId) -> Result<()>;
    /// Stop a server.
    async fn stop_server(&self, id: &ServerId) -> Result<()>;

    // Server organizations

    /// List organizations attached to a server.
    async fn list_server_organizations(&self, server_id: &ServerId) -> Result<Vec<Organization>>;
    /// Attach an organization to a server.
    async fn attach_organization_to_server(
        &self,
        server_id: &ServerId,
        organization_id: &OrganizationId,
    ) -> Result<()>;
    /// Detach an organization from a server.
    async fn detach_organization_from_server(
        &self,
        server_id: &ServerId,
        organization_id: &OrganizationId,
    ) -> Result<()>;

    // Server routes

    /// List routes of a server.
    async fn list_server_routes(&self, server_id: &ServerId) -> Result<Vec<Route>>;
    /// Add one route to a server.
    async fn add_route_to_server(&self, server_id: &ServerId, route: &Route) -> Result<()>;
    /// Add several routes to a server in one request.
    async fn add_routes_to_server(&self, server_id: &ServerId, routes: &[Route]) -> Result<()>;
    /// Update a server route, addressed by [`Route::route_id`].
    async fn update_route_on_server(&self, server_id: &ServerId, route: &Route) -> Result<()>;
    /// Remove a server route, addressed by [`Route::route_id`].
    async fn delete_route_from_server(&self, server_id: &ServerId, route: &Route) -> Result<()>;

    // Hosts

    /// List all Pritunl hosts.
    async fn list_hosts(&self) -> Result<Vec<Host>>;
    /// List hosts attached to a server.
    async fn list_server_hosts(&self, server_id: &ServerId) -> Result<Vec<Host>>;
    /// Attach a host to a server.
    async fn attach_host_to_server(&self, server_id: &ServerId, host_id: &HostId) -> Result<()>;
    /// Detach a host from a server.
    async fn detach_host_from_server(&self, server_id: &ServerId, host_id: &HostId)
        -> Result<()>;

    // Links

    /// List all links across every page.
    async fn list_links(&self) -> Result<Vec<Link>>;
    /// Find a link by id.
    async fn get_link(&self, id: &LinkId) -> Result<Link>;
    /// Create a link.
    async fn create_link(&self, link: &Link) -> Result<Link>;
    /// Replace a link's settings.
    async fn update_link(&self, id: &LinkId, link: &Link) -> Result<()>;
    /// Delete a link.
    async fn delete_link(&self, id: &LinkId) -> Result<()>;

    // Locations

    /// List locations of a link.
    async fn list_locations(&self, link_id: &LinkId) -> Result<Vec<Location>>;
    /// Find a location by id, after checking the link exists.
    async fn get_location(&self, link_id: &LinkId, id: &LocationId) -> Result<Location>;
    /// Create a location under a link.
    async fn create_location(&self, link_id: &LinkId, location: &Location) -> Result<Location>;
    /// Replace a location's settings.
    async fn update_location(
        &self,
        link_id: &LinkId,
        id: &LocationId,
        location: &Location,
    ) -> Result<()>;
    /// Delete a location.
    async fn delete_location(&self, link_id: &LinkId, id: &LocationId) -> Result<()>;

    // Location routes

    /// Find a route among the ones embedded in its location.
    async fn get_location_route(
        &self,
        link_id: &LinkId,
        location_id: &LocationId,
        id: &LocationRouteId,
    ) -> Result<LocationRoute>;
    /// Create a route in a location.
    async fn create_location_route(
        &self,
        link_id: &LinkId,
        location_id: &LocationId,
        route: &LocationRoute,
    ) -> Result<LocationRoute>;
    /// Replace a location route.
    async fn update_location_route(
        &self,
        link_id: &LinkId,
        location_id: &LocationId,
        id: &LocationRouteId,
        route: &LocationRoute,
    ) -> Result<()>;
    /// Delete a location route.
    async fn delete_location_route(
        &self,
        link_id: &LinkId,
        location_id: &LocationId,
        id: &LocationRouteId,
    ) -> Result<()>;

    // Location hosts

    /// Find a host among the ones embedded in its location and attach its URI.
    ///
    /// A non-empty `known_uri` is used as-is; otherwise the URI is fetched
    /// with one extra request.
    async fn get_location_host(
        &self,
        link_id: &LinkId,
        location_id: &LocationId,
        id: &LocationHostId,
        known_uri: Option<String>,
    ) -> Result<LocationHost>;
    /// Fetch the connection URI of a location host.
    async fn get_location_host_uri(
        &self,
        link_id: &LinkId,
        location_id: &LocationId,
        id: &LocationHostId,
    ) -> Result<String>;
    /// Create a host in a location and attach its URI.
    async fn create_location_host(
        &self,
        link_id: &LinkId,
        location_id: &LocationId,
        host: &LocationHost,
    ) -> Result<LocationHost>;
    /// Replace a location host.
    async fn update_location_host(
        &self,
        link_id: &LinkId,
        location_id: &LocationId,
        id: &LocationHostId,
        host: &LocationHost,
    ) -> Result<()>;
    /// Delete a location host.
    async fn delete_location_host(
        &self,
        link_id: &LinkId,
        location_id: &LocationId,
        id: &LocationHostId,
    ) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ServerStatus;
    use mockall::predicate::eq;
    use pritunl_core::Error;

    // Restart-if-running, as a consumer would write it against the trait.
    async fn restart_if_running(api: &dyn PritunlApi, id: &ServerId) -> Result<bool> {
        let server = api.get_server(id).await?;
        if !server.is_running() {
            return Ok(false);
        }
        api.stop_server(id).await?;
        api.start_server(id).await?;
        Ok(true)
    }

    fn server_id() -> ServerId {
        ServerId::parse_str("5f1e3c9a2b4d6e8f0a1b2c3d").unwrap()
    }

    #[tokio::test]
    async fn restart_running_server() {
        let id = server_id();
        let mut api = MockPritunlApi::new();
        api.expect_get_server()
            .with(eq(id.clone()))
            .times(1)
            .returning(|_| {
                Ok(Server {
                    status: Some(ServerStatus::Online),
                    ..Server::default()
                })
            });
        api.expect_stop_server().times(1).returning(|_| Ok(()));
        api.expect_start_server().times(1).returning(|_| Ok(()));

        assert!(restart_if_running(&api, &id).await.unwrap());
    }

    #[tokio::test]
    async fn stopped_server_is_left_alone() {
        let mut api = MockPritunlApi::new();
        api.expect_get_server().returning(|_| {
            Ok(Server {
                status: Some(ServerStatus::Offline),
                ..Server::default()
            })
        });
        api.expect_stop_server().never();
        api.expect_start_server().never();

        assert!(!restart_if_running(&api, &server_id()).await.unwrap());
    }

    #[tokio::test]
    async fn stop_failure_propagates() {
        let mut api = MockPritunlApi::new();
        api.expect_get_server().returning(|_| {
            Ok(Server {
                status: Some(ServerStatus::Online),
                ..Server::default()
            })
        });
        api.expect_stop_server().returning(|_| {
            Err(Error::UnexpectedStatus {
                operation: "stop_server",
                status: 500,
                body: "boom".into(),
            })
        });
        api.expect_start_server().never();

        let err = restart_if_running(&api, &server_id()).await.unwrap_err();
        assert_eq!(err.status(), Some(500));
    }
}
