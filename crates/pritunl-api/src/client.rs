//! Asynchronous Pritunl client implementation.

use crate::api::PritunlApi;
use crate::models::{
    Host, HostUri, Link, Links, Location, LocationHost, LocationRoute, Organization, Route,
    Server, User,
};
use crate::server_config::ServerConfig;
use crate::Result;
use async_trait::async_trait;
use pritunl_core::client::{ClientConfig, ServiceClient, ServiceClientBuilder};
use pritunl_core::config::PritunlConfig;
use pritunl_core::id::{
    HostId, LinkId, LocationHostId, LocationId, LocationRouteId, OrganizationId, ServerId, UserId,
};
use pritunl_core::Error;
use reqwest::Method;
use secrecy::SecretString;
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

const USER_AGENT: &str = concat!("pritunl-api/", env!("CARGO_PKG_VERSION"));

/// Builder for [`PritunlClient`].
#[derive(Debug, Clone)]
pub struct PritunlClientBuilder {
    inner: ServiceClientBuilder,
    has_credentials: bool,
}

impl PritunlClientBuilder {
    /// Create a builder for the specified base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        let inner = ServiceClientBuilder::new(base_url)?.with_user_agent(USER_AGENT);
        Ok(Self {
            inner,
            has_credentials: false,
        })
    }

    /// Create a builder from a [`PritunlConfig`].
    ///
    /// # Errors
    ///
    /// Returns an error if the configured URL is invalid.
    pub fn from_config(config: PritunlConfig) -> Result<Self> {
        let inner = ServiceClientBuilder::from_config(config)?.with_user_agent(USER_AGENT);
        Ok(Self {
            inner,
            has_credentials: true,
        })
    }

    /// Set the API token and secret used to sign requests.
    #[must_use]
    pub fn with_credentials(mut self, token: impl Into<String>, secret: SecretString) -> Self {
        self.inner = self.inner.with_credentials(token, secret);
        self.has_credentials = true;
        self
    }

    /// Skip TLS certificate verification.
    #[must_use]
    pub fn with_insecure(mut self, insecure: bool) -> Self {
        self.inner = self.inner.with_tls_verify(!insecure);
        self
    }

    /// Override the HTTP client configuration.
    #[must_use]
    pub fn with_http_config(mut self, config: ClientConfig) -> Self {
        self.inner = self.inner.with_http_config(config);
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns an error if no credentials were set or the HTTP client cannot be built.
    pub fn build(self) -> Result<PritunlClient> {
        if !self.has_credentials {
            return Err(Error::Config(
                "Pritunl API token and secret are required".to_string(),
            ));
        }
        let inner = self.inner.build()?;
        Ok(PritunlClient { inner })
    }
}

/// Asynchronous Pritunl client.
///
/// Holds no per-call state; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct PritunlClient {
    inner: ServiceClient,
}

impl PritunlClient {
    /// Construct a client from a base URL and API credentials.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn new(
        base_url: impl AsRef<str>,
        token: impl Into<String>,
        secret: impl Into<String>,
    ) -> Result<Self> {
        PritunlClientBuilder::new(base_url)?
            .with_credentials(token, SecretString::from(secret.into()))
            .build()
    }

    /// Start building a client for the given base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn builder(base_url: impl AsRef<str>) -> Result<PritunlClientBuilder> {
        PritunlClientBuilder::new(base_url)
    }

    /// Construct a client from `PRITUNL_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the environment is incomplete or invalid.
    pub fn from_env() -> Result<Self> {
        PritunlClientBuilder::from_config(PritunlConfig::from_env()?)?.build()
    }

    /// Return the base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        self.inner.base_url()
    }

    async fn send_json<B, R>(
        &self,
        operation: &'static str,
        method: Method,
        segments: &[&str],
        body: Option<&B>,
    ) -> Result<R>
    where
        B: Serialize + ?Sized + Sync,
        R: DeserializeOwned,
    {
        self.inner
            .execute(operation, method, segments, &[], body)
            .await?
            .json()
    }

    async fn send_json_with_body<B, R>(
        &self,
        operation: &'static str,
        method: Method,
        segments: &[&str],
        body: Option<&B>,
    ) -> Result<(R, String)>
    where
        B: Serialize + ?Sized + Sync,
        R: DeserializeOwned,
    {
        self.inner
            .execute(operation, method, segments, &[], body)
            .await?
            .json_with_body()
    }

    async fn send_empty<B>(
        &self,
        operation: &'static str,
        method: Method,
        segments: &[&str],
        body: Option<&B>,
    ) -> Result<()>
    where
        B: Serialize + ?Sized + Sync,
    {
        self.inner
            .execute(operation, method, segments, &[], body)
            .await?
            .ensure_ok()
            .map(|_| ())
    }

    async fn get_json<R: DeserializeOwned>(
        &self,
        operation: &'static str,
        segments: &[&str],
    ) -> Result<R> {
        self.send_json::<(), R>(operation, Method::GET, segments, None)
            .await
    }

    async fn list_links_page(&self, page: Option<u32>) -> Result<Links> {
        let params = page.map(|p| vec![("page", p.to_string())]).unwrap_or_default();
        self.inner
            .execute::<()>("list_links", Method::GET, &["link"], &params, None)
            .await?
            .json()
    }
}

fn not_found(operation: &'static str, resource: &'static str, id: &str) -> Error {
    tracing::debug!(operation, resource, id, "lookup found no matching entry");
    Error::NotFound {
        operation,
        resource,
        id: id.to_string(),
    }
}

#[async_trait]
impl PritunlApi for PritunlClient {
    async fn check_connection(&self) -> Result<()> {
        self.send_empty::<()>("check_connection", Method::GET, &["state"], None)
            .await
    }

    async fn list_organizations(&self) -> Result<Vec<Organization>> {
        self.get_json("list_organizations", &["organization"]).await
    }

    async fn get_organization(&self, id: &OrganizationId) -> Result<Organization> {
        self.get_json("get_organization", &["organization", id.as_str()])
            .await
    }

    async fn create_organization(&self, name: &str) -> Result<Organization> {
        let body = Organization {
            name: name.to_string(),
            ..Organization::default()
        };
        self.send_json(
            "create_organization",
            Method::POST,
            &["organization"],
            Some(&body),
        )
        .await
    }

    async fn update_organization(
        &self,
        id: &OrganizationId,
        organization: &Organization,
    ) -> Result<()> {
        self.send_empty(
            "update_organization",
            Method::PUT,
            &["organization", id.as_str()],
            Some(organization),
        )
        .await
    }

    async fn delete_organization(&self, id: &OrganizationId) -> Result<()> {
        self.send_empty::<()>(
            "delete_organization",
            Method::DELETE,
            &["organization", id.as_str()],
            None,
        )
        .await
    }

    async fn get_user(&self, organization_id: &OrganizationId, id: &UserId) -> Result<User> {
        self.get_json("get_user", &["user", organization_id.as_str(), id.as_str()])
            .await
    }

    async fn create_user(&self, organization_id: &OrganizationId, user: &User) -> Result<User> {
        const OPERATION: &str = "create_user";

        let mut body = user.clone();
        body.organization = Some(organization_id.clone());

        let (created, raw): (Vec<User>, String) = self
            .send_json_with_body(
                OPERATION,
                Method::POST,
                &["user", organization_id.as_str()],
                Some(&body),
            )
            .await?;

        created.into_iter().next().ok_or_else(|| Error::Decode {
            operation: OPERATION,
            message: "server returned no user".to_string(),
            body: raw,
        })
    }

    async fn update_user(
        &self,
        organization_id: &OrganizationId,
        id: &UserId,
        user: &User,
    ) -> Result<()> {
        let mut body = user.clone();
        body.organization = Some(organization_id.clone());
        self.send_empty(
            "update_user",
            Method::PUT,
            &["user", organization_id.as_str(), id.as_str()],
            Some(&body),
        )
        .await
    }

    async fn delete_user(&self, organization_id: &OrganizationId, id: &UserId) -> Result<()> {
        self.send_empty::<()>(
            "delete_user",
            Method::DELETE,
            &["user", organization_id.as_str(), id.as_str()],
            None,
        )
        .await
    }

    async fn list_servers(&self) -> Result<Vec<Server>> {
        self.get_json("list_servers", &["server"]).await
    }

    async fn get_server(&self, id: &ServerId) -> Result<Server> {
        self.get_json("get_server", &["server", id.as_str()]).await
    }

    async fn create_server(&self, config: &ServerConfig) -> Result<Server> {
        config.validate()?;
        let body = config.to_server();
        self.send_json("create_server", Method::POST, &["server"], Some(&body))
            .await
    }

    async fn update_server(&self, id: &ServerId, server: &Server) -> Result<()> {
        self.send_empty(
            "update_server",
            Method::PUT,
            &["server", id.as_str()],
            Some(server),
        )
        .await
    }

    async fn delete_server(&self, id: &ServerId) -> Result<()> {
        self.send_empty::<()>("delete_server", Method::DELETE, &["server", id.as_str()], None)
            .await
    }

    async fn start_server(&self, id: &ServerId) -> Result<()> {
        self.send_empty::<()>(
            "start_server",
            Method::PUT,
            &["server", id.as_str(), "operation", "start"],
            None,
        )
        .await
    }

    async fn stop_server(&self, id: &ServerId) -> Result<()> {
        self.send_empty::<()>(
            "stop_server",
            Method::PUT,
            &["server", id.as_str(), "operation", "stop"],
            None,
        )
        .await
    }

    async fn list_server_organizations(&self, server_id: &ServerId) -> Result<Vec<Organization>> {
        self.get_json(
            "list_server_organizations",
            &["server", server_id.as_str(), "organization"],
        )
        .await
    }

    async fn attach_organization_to_server(
        &self,
        server_id: &ServerId,
        organization_id: &OrganizationId,
    ) -> Result<()> {
        self.send_empty::<()>(
            "attach_organization_to_server",
            Method::PUT,
            &[
                "server",
                server_id.as_str(),
                "organization",
                organization_id.as_str(),
            ],
            None,
        )
        .await
    }

    async fn detach_organization_from_server(
        &self,
        server_id: &ServerId,
        organization_id: &OrganizationId,
    ) -> Result<()> {
        self.send_empty::<()>(
            "detach_organization_from_server",
            Method::DELETE,
            &[
                "server",
                server_id.as_str(),
                "organization",
                organization_id.as_str(),
            ],
            None,
        )
        .await
    }

    async fn list_server_routes(&self, server_id: &ServerId) -> Result<Vec<Route>> {
        self.get_json("list_server_routes", &["server", server_id.as_str(), "route"])
            .await
    }

    async fn add_route_to_server(&self, server_id: &ServerId, route: &Route) -> Result<()> {
        self.send_empty(
            "add_route_to_server",
            Method::POST,
            &["server", server_id.as_str(), "route"],
            Some(route),
        )
        .await
    }

    async fn add_routes_to_server(&self, server_id: &ServerId, routes: &[Route]) -> Result<()> {
        self.send_empty(
            "add_routes_to_server",
            Method::POST,
            &["server", server_id.as_str(), "routes"],
            Some(routes),
        )
        .await
    }

    async fn update_route_on_server(&self, server_id: &ServerId, route: &Route) -> Result<()> {
        let route_id = route.route_id()?;
        self.send_empty(
            "update_route_on_server",
            Method::PUT,
            &["server", server_id.as_str(), "route", route_id.as_str()],
            Some(route),
        )
        .await
    }

    async fn delete_route_from_server(&self, server_id: &ServerId, route: &Route) -> Result<()> {
        let route_id = route.route_id()?;
        self.send_empty::<()>(
            "delete_route_from_server",
            Method::DELETE,
            &["server", server_id.as_str(), "route", route_id.as_str()],
            None,
        )
        .await
    }

    async fn list_hosts(&self) -> Result<Vec<Host>> {
        self.get_json("list_hosts", &["host"]).await
    }

    async fn list_server_hosts(&self, server_id: &ServerId) -> Result<Vec<Host>> {
        self.get_json("list_server_hosts", &["server", server_id.as_str(), "host"])
            .await
    }

    async fn attach_host_to_server(&self, server_id: &ServerId, host_id: &HostId) -> Result<()> {
        self.send_empty::<()>(
            "attach_host_to_server",
            Method::PUT,
            &["server", server_id.as_str(), "host", host_id.as_str()],
            None,
        )
        .await
    }

    async fn detach_host_from_server(
        &self,
        server_id: &ServerId,
        host_id: &HostId,
    ) -> Result<()> {
        self.send_empty::<()>(
            "detach_host_from_server",
            Method::DELETE,
            &["server", server_id.as_str(), "host", host_id.as_str()],
            None,
        )
        .await
    }

    async fn list_links(&self) -> Result<Vec<Link>> {
        let first = self.list_links_page(None).await?;
        let page_total = first.page_total;
        let mut page = first.page;
        let mut links = first.links;

        while page < page_total {
            let next = page + 1;
            let batch = self.list_links_page(Some(next)).await?;
            if batch.links.is_empty() || batch.page != next {
                break;
            }
            links.extend(batch.links);
            page = next;
        }

        Ok(links)
    }

    async fn get_link(&self, id: &LinkId) -> Result<Link> {
        self.list_links()
            .await?
            .into_iter()
            .find(|link| link.id.as_ref() == Some(id))
            .ok_or_else(|| not_found("get_link", "link", id.as_str()))
    }

    async fn create_link(&self, link: &Link) -> Result<Link> {
        self.send_json("create_link", Method::POST, &["link"], Some(link))
            .await
    }

    async fn update_link(&self, id: &LinkId, link: &Link) -> Result<()> {
        self.send_empty("update_link", Method::PUT, &["link", id.as_str()], Some(link))
            .await
    }

    async fn delete_link(&self, id: &LinkId) -> Result<()> {
        self.send_empty::<()>("delete_link", Method::DELETE, &["link", id.as_str()], None)
            .await
    }

    async fn list_locations(&self, link_id: &LinkId) -> Result<Vec<Location>> {
        self.get_json("list_locations", &["link", link_id.as_str(), "location"])
            .await
    }

    async fn get_location(&self, link_id: &LinkId, id: &LocationId) -> Result<Location> {
        self.get_link(link_id).await?;

        self.list_locations(link_id)
            .await?
            .into_iter()
            .find(|location| location.id.as_ref() == Some(id))
            .ok_or_else(|| not_found("get_location", "location", id.as_str()))
    }

    async fn create_location(&self, link_id: &LinkId, location: &Location) -> Result<Location> {
        let mut body = location.clone();
        body.link_id = Some(link_id.clone());
        self.send_json(
            "create_location",
            Method::POST,
            &["link", link_id.as_str(), "location"],
            Some(&body),
        )
        .await
    }

    async fn update_location(
        &self,
        link_id: &LinkId,
        id: &LocationId,
        location: &Location,
    ) -> Result<()> {
        let mut body = location.clone();
        body.link_id = Some(link_id.clone());
        self.send_empty(
            "update_location",
            Method::PUT,
            &["link", link_id.as_str(), "location", id.as_str()],
            Some(&body),
        )
        .await
    }

    async fn delete_location(&self, link_id: &LinkId, id: &LocationId) -> Result<()> {
        self.send_empty::<()>(
            "delete_location",
            Method::DELETE,
            &["link", link_id.as_str(), "location", id.as_str()],
            None,
        )
        .await
    }

    async fn get_location_route(
        &self,
        link_id: &LinkId,
        location_id: &LocationId,
        id: &LocationRouteId,
    ) -> Result<LocationRoute> {
        let location = self.get_location(link_id, location_id).await?;
        let mut route = location
            .routes
            .into_iter()
            .find(|route| route.id.as_ref() == Some(id))
            .ok_or_else(|| not_found("get_location_route", "location route", id.as_str()))?;

        route.link_id.get_or_insert_with(|| link_id.clone());
        route.location_id.get_or_insert_with(|| location_id.clone());
        Ok(route)
    }

    async fn create_location_route(
        &self,
        link_id: &LinkId,
        location_id: &LocationId,
        route: &LocationRoute,
    ) -> Result<LocationRoute> {
        let mut body = route.clone();
        body.link_id = Some(link_id.clone());
        body.location_id = Some(location_id.clone());
        self.send_json(
            "create_location_route",
            Method::POST,
            &[
                "link",
                link_id.as_str(),
                "location",
                location_id.as_str(),
                "route",
            ],
            Some(&body),
        )
        .await
    }

    async fn update_location_route(
        &self,
        link_id: &LinkId,
        location_id: &LocationId,
        id: &LocationRouteId,
        route: &LocationRoute,
    ) -> Result<()> {
        let mut body = route.clone();
        body.link_id = Some(link_id.clone());
        body.location_id = Some(location_id.clone());
        self.send_empty(
            "update_location_route",
            Method::PUT,
            &[
                "link",
                link_id.as_str(),
                "location",
                location_id.as_str(),
                "route",
                id.as_str(),
            ],
            Some(&body),
        )
        .await
    }

    async fn delete_location_route(
        &self,
        link_id: &LinkId,
        location_id: &LocationId,
        id: &LocationRouteId,
    ) -> Result<()> {
        self.send_empty::<()>(
            "delete_location_route",
            Method::DELETE,
            &[
                "link",
                link_id.as_str(),
                "location",
                location_id.as_str(),
                "route",
                id.as_str(),
            ],
            None,
        )
        .await
    }

    async fn get_location_host(
        &self,
        link_id: &LinkId,
        location_id: &LocationId,
        id: &LocationHostId,
        known_uri: Option<String>,
    ) -> Result<LocationHost> {
        let location = self.get_location(link_id, location_id).await?;
        let mut host = location
            .hosts
            .into_iter()
            .find(|host| host.id.as_ref() == Some(id))
            .ok_or_else(|| not_found("get_location_host", "location host", id.as_str()))?;

        let uri = match known_uri.filter(|uri| !uri.is_empty()) {
            Some(uri) => uri,
            None => self.get_location_host_uri(link_id, location_id, id).await?,
        };

        host.link_id.get_or_insert_with(|| link_id.clone());
        host.location_id.get_or_insert_with(|| location_id.clone());
        host.uri = Some(uri);
        Ok(host)
    }

    async fn get_location_host_uri(
        &self,
        link_id: &LinkId,
        location_id: &LocationId,
        id: &LocationHostId,
    ) -> Result<String> {
        let response: HostUri = self
            .get_json(
                "get_location_host_uri",
                &[
                    "link",
                    link_id.as_str(),
                    "location",
                    location_id.as_str(),
                    "host",
                    id.as_str(),
                    "uri",
                ],
            )
            .await?;
        Ok(response.uri)
    }

    async fn create_location_host(
        &self,
        link_id: &LinkId,
        location_id: &LocationId,
        host: &LocationHost,
    ) -> Result<LocationHost> {
        const OPERATION: &str = "create_location_host";

        let mut body = host.clone();
        body.link_id = Some(link_id.clone());
        body.location_id = Some(location_id.clone());
        body.uri = None;

        let (mut created, raw): (LocationHost, String) = self
            .send_json_with_body(
                OPERATION,
                Method::POST,
                &[
                    "link",
                    link_id.as_str(),
                    "location",
                    location_id.as_str(),
                    "host",
                ],
                Some(&body),
            )
            .await?;

        let Some(id) = created.id.clone() else {
            return Err(Error::Decode {
                operation: OPERATION,
                message: "created host has no id".to_string(),
                body: raw,
            });
        };

        let uri = self.get_location_host_uri(link_id, location_id, &id).await?;
        created.link_id.get_or_insert_with(|| link_id.clone());
        created.location_id.get_or_insert_with(|| location_id.clone());
        created.uri = Some(uri);
        Ok(created)
    }

    async fn update_location_host(
        &self,
        link_id: &LinkId,
        location_id: &LocationId,
        id: &LocationHostId,
        host: &LocationHost,
    ) -> Result<()> {
        let mut body = host.clone();
        body.link_id = Some(link_id.clone());
        body.location_id = Some(location_id.clone());
        body.uri = None;
        self.send_empty(
            "update_location_host",
            Method::PUT,
            &[
                "link",
                link_id.as_str(),
                "location",
                location_id.as_str(),
                "host",
                id.as_str(),
            ],
            Some(&body),
        )
        .await
    }

    async fn delete_location_host(
        &self,
        link_id: &LinkId,
        location_id: &LocationId,
        id: &LocationHostId,
    ) -> Result<()> {
        self.send_empty::<()>(
            "delete_location_host",
            Method::DELETE,
            &[
                "link",
                link_id.as_str(),
                "location",
                location_id.as_str(),
                "host",
                id.as_str(),
            ],
            None,
        )
        .await
    }
}
