//! End-to-end link workflow against a mock Pritunl server.
//!
//! The mock server keeps just enough state to behave like the real API for
//! links, locations and location routes: created objects show up in later
//! listings and in the location's embedded route list.

use pritunl_api::{
    Error, Link, LinkId, Location, LocationId, LocationRoute, LocationRouteId, PritunlApi,
    PritunlClient,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use wiremock::matchers::{header_exists, method, path, path_regex};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

const LINK_ID: &str = "6a1b2c3d4e5f60718293a4b5";
const LOCATION_ID: &str = "6a1b2c3d4e5f60718293a4c0";
const ROUTE_ID: &str = "6a1b2c3d4e5f60718293a4e1";

#[derive(Default)]
struct State {
    links: Vec<Value>,
    locations: Vec<Value>,
}

type Shared = Arc<Mutex<State>>;

struct CreateLink(Shared);

impl Respond for CreateLink {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let mut link: Value = serde_json::from_slice(&request.body).unwrap();
        link["id"] = json!(LINK_ID);
        self.0.lock().unwrap().links.push(link.clone());
        ResponseTemplate::new(200).set_body_json(link)
    }
}

struct ListLinks(Shared);

impl Respond for ListLinks {
    fn respond(&self, _: &Request) -> ResponseTemplate {
        let links = self.0.lock().unwrap().links.clone();
        ResponseTemplate::new(200).set_body_json(json!({
            "page": 0,
            "page_total": 0,
            "links": links
        }))
    }
}

struct CreateLocation(Shared);

impl Respond for CreateLocation {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let mut location: Value = serde_json::from_slice(&request.body).unwrap();
        location["id"] = json!(LOCATION_ID);
        location["routes"] = json!([]);
        location["hosts"] = json!([]);
        self.0.lock().unwrap().locations.push(location.clone());
        ResponseTemplate::new(200).set_body_json(location)
    }
}

struct ListLocations(Shared);

impl Respond for ListLocations {
    fn respond(&self, _: &Request) -> ResponseTemplate {
        let locations = self.0.lock().unwrap().locations.clone();
        ResponseTemplate::new(200).set_body_json(locations)
    }
}

struct CreateRoute(Shared);

impl Respond for CreateRoute {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let mut route: Value = serde_json::from_slice(&request.body).unwrap();
        route["id"] = json!(ROUTE_ID);

        let mut state = self.0.lock().unwrap();
        let Some(location) = state
            .locations
            .iter_mut()
            .find(|l| l["id"] == route["location_id"])
        else {
            return ResponseTemplate::new(404).set_body_string("location not found");
        };
        if let Some(routes) = location["routes"].as_array_mut() {
            routes.push(route.clone());
        }
        ResponseTemplate::new(200).set_body_json(route)
    }
}

async fn stateful_server() -> MockServer {
    let server = MockServer::start().await;
    let state: Shared = Arc::default();

    Mock::given(method("POST"))
        .and(path("/link"))
        .and(header_exists("Auth-Signature"))
        .respond_with(CreateLink(state.clone()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/link"))
        .respond_with(ListLinks(state.clone()))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path_regex(r"^/link/[^/]+/location$"))
        .respond_with(CreateLocation(state.clone()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/link/[^/]+/location$"))
        .respond_with(ListLocations(state.clone()))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path_regex(r"^/link/[^/]+/location/[^/]+/route$"))
        .respond_with(CreateRoute(state))
        .mount(&server)
        .await;

    server
}

fn client(server: &MockServer) -> PritunlClient {
    PritunlClient::new(server.uri(), "token", "secret").unwrap()
}

#[tokio::test]
async fn link_location_route_round_trip() {
    let server = stateful_server().await;
    let api = client(&server);

    let link = api
        .create_link(&Link {
            name: "l1".into(),
            link_type: "site_to_site".into(),
            ..Link::default()
        })
        .await
        .unwrap();
    let link_id = link.id.clone().unwrap();

    let location = api
        .create_location(&link_id, &Location::new("loc1"))
        .await
        .unwrap();
    let location_id = location.id.clone().unwrap();
    assert_eq!(location.link_id.as_ref(), Some(&link_id));

    let route = api
        .create_location_route(&link_id, &location_id, &LocationRoute::new("10.0.0.0/24"))
        .await
        .unwrap();
    let route_id = route.id.clone().unwrap();

    let fetched = api
        .get_location_route(&link_id, &location_id, &route_id)
        .await
        .unwrap();
    assert_eq!(fetched.network, "10.0.0.0/24");
    assert_eq!(fetched.link_id, Some(link_id.clone()));
    assert_eq!(fetched.location_id, Some(location_id.clone()));
    assert_eq!(fetched, route);

    let fetched_link = api.get_link(&link_id).await.unwrap();
    assert_eq!(fetched_link, link);

    let fetched_location = api.get_location(&link_id, &location_id).await.unwrap();
    assert_eq!(fetched_location.routes, vec![route]);
    assert_eq!(
        Location {
            routes: Vec::new(),
            ..fetched_location
        },
        location
    );
}

#[tokio::test]
async fn lookups_report_missing_entries() {
    let server = stateful_server().await;
    let api = client(&server);

    let link = api.create_link(&Link::new("l1")).await.unwrap();
    let link_id = link.id.unwrap();
    let location = api
        .create_location(&link_id, &Location::new("loc1"))
        .await
        .unwrap();
    let location_id = location.id.unwrap();

    let missing_link = LinkId::parse_str("000000000000000000000000").unwrap();
    let err = api.get_link(&missing_link).await.unwrap_err();
    assert!(matches!(err, Error::NotFound { resource: "link", .. }));

    let missing_location = LocationId::parse_str("000000000000000000000001").unwrap();
    let err = api
        .get_location(&link_id, &missing_location)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound { resource: "location", .. }));

    let missing_route = LocationRouteId::parse_str("000000000000000000000002").unwrap();
    let err = api
        .get_location_route(&link_id, &location_id, &missing_route)
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    assert!(err.to_string().contains("000000000000000000000002"));
}

#[tokio::test]
async fn non_200_responses_carry_the_body() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path(format!("/link/{LINK_ID}").as_str()))
        .respond_with(
            ResponseTemplate::new(400).set_body_string("{\"error\": \"link_in_use\"}"),
        )
        .mount(&server)
        .await;

    let err = client(&server)
        .delete_link(&LinkId::parse_str(LINK_ID).unwrap())
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(400));
    assert!(err.to_string().contains("{\"error\": \"link_in_use\"}"));
}
