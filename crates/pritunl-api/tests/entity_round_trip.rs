//! Create-then-get round trips for organizations, users and servers.
//!
//! The mock server stores every created object under its resource path and
//! serves it back on `GET`, so whatever the client sends on create must come
//! back unchanged on the next fetch.

use pritunl_api::{
    NetworkMode, Organization, OrganizationId, PortForwarding, PritunlApi, PritunlClient, Server,
    ServerConfig, User,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use wiremock::matchers::{method, path_regex};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

#[derive(Default)]
struct Store {
    next_id: u64,
    objects: HashMap<String, Value>,
}

type Shared = Arc<Mutex<Store>>;

/// Stores the posted object under `<collection>/<new id>`.
struct Create {
    store: Shared,
    /// `POST /user/{org}` answers with a one-element array.
    as_list: bool,
    defaults: Value,
}

impl Respond for Create {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let mut object: Value = serde_json::from_slice(&request.body).unwrap();
        let mut store = self.store.lock().unwrap();
        store.next_id += 1;
        let id = format!("{:024x}", store.next_id);

        object["id"] = json!(id);
        if let (Some(target), Some(defaults)) = (object.as_object_mut(), self.defaults.as_object())
        {
            for (key, value) in defaults {
                target.entry(key.clone()).or_insert_with(|| value.clone());
            }
        }
        store
            .objects
            .insert(format!("{}/{id}", request.url.path()), object.clone());

        let body = if self.as_list { json!([object]) } else { object };
        ResponseTemplate::new(200).set_body_json(body)
    }
}

struct Fetch(Shared);

impl Respond for Fetch {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        match self.0.lock().unwrap().objects.get(request.url.path()) {
            Some(object) => ResponseTemplate::new(200).set_body_json(object),
            None => ResponseTemplate::new(404).set_body_string("not found"),
        }
    }
}

async fn stateful_server() -> MockServer {
    let server = MockServer::start().await;
    let store: Shared = Arc::default();

    Mock::given(method("POST"))
        .and(path_regex(r"^/organization$"))
        .respond_with(Create {
            store: store.clone(),
            as_list: false,
            defaults: json!({"user_count": 0}),
        })
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path_regex(r"^/user/[^/]+$"))
        .respond_with(Create {
            store: store.clone(),
            as_list: true,
            defaults: json!({}),
        })
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path_regex(r"^/server$"))
        .respond_with(Create {
            store: store.clone(),
            as_list: false,
            defaults: json!({"status": "offline"}),
        })
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/(organization|server)/[^/]+$"))
        .respond_with(Fetch(store.clone()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/user/[^/]+/[^/]+$"))
        .respond_with(Fetch(store))
        .mount(&server)
        .await;

    server
}

fn client(server: &MockServer) -> PritunlClient {
    PritunlClient::new(server.uri(), "token", "secret").unwrap()
}

#[tokio::test]
async fn organization_round_trip() {
    let server = stateful_server().await;
    let api = client(&server);

    let created = api.create_organization("acme").await.unwrap();
    let id = created.id.clone().unwrap();
    assert_eq!(created.name, "acme");

    let fetched = api.get_organization(&id).await.unwrap();
    assert_eq!(fetched, created);
    assert_eq!(
        Organization {
            id: None,
            user_count: None,
            ..fetched
        },
        Organization {
            name: "acme".into(),
            ..Organization::default()
        }
    );
}

#[tokio::test]
async fn user_round_trip() {
    let server = stateful_server().await;
    let api = client(&server);
    let org = api.create_organization("acme").await.unwrap().id.unwrap();

    let user = User {
        name: "alice".into(),
        user_type: Some("client".into()),
        auth_type: Some("local".into()),
        email: Some("alice@example.com".into()),
        groups: vec!["ops".into(), "dev".into()],
        disabled: true,
        pin: Some("123456".into()),
        network_links: vec!["10.50.0.0/24".into()],
        bypass_secondary: true,
        client_to_client: true,
        dns_servers: vec!["10.0.0.53".into()],
        dns_suffix: Some("corp.example.com".into()),
        mac_addresses: vec!["00:11:22:33:44:55".into()],
        port_forwarding: vec![PortForwarding {
            protocol: Some("tcp".into()),
            port: "8080".into(),
            dport: Some("80".into()),
        }],
        ..User::default()
    };

    let created = api.create_user(&org, &user).await.unwrap();
    let id = created.id.clone().unwrap();

    let fetched = api.get_user(&org, &id).await.unwrap();
    assert_eq!(fetched, created);
    assert_eq!(
        User { id: None, ..fetched },
        User {
            organization: Some(org.clone()),
            ..user
        }
    );
}

#[tokio::test]
async fn user_lookup_is_scoped_to_organization() {
    let server = stateful_server().await;
    let api = client(&server);
    let org = api.create_organization("acme").await.unwrap().id.unwrap();
    let user = api
        .create_user(
            &org,
            &User {
                name: "bob".into(),
                ..User::default()
            },
        )
        .await
        .unwrap();

    let other = OrganizationId::parse_str("ffffffffffffffffffffffff").unwrap();
    let err = api
        .get_user(&other, user.id.as_ref().unwrap())
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn server_round_trip() {
    let server = stateful_server().await;
    let api = client(&server);

    let config = ServerConfig::from_fields(json!({
        "name": "corp-vpn",
        "protocol": "udp",
        "cipher": "aes256",
        "hash": "sha256",
        "port": 1194,
        "network": "10.100.0.0/16",
        "network_wg": "10.101.0.0/16",
        "port_wg": 51820,
        "groups": ["ops"],
        "dns_servers": ["8.8.8.8"],
        "search_domain": "corp.example.com",
        "ipv6": false,
        "max_clients": 500,
        "inactive_timeout": 3600,
        "otp_auth": true,
        "restrict_routes": true
    }))
    .unwrap();

    let created = api.create_server(&config).await.unwrap();
    let id = created.id.clone().unwrap();
    assert!(!created.is_running());

    let fetched = api.get_server(&id).await.unwrap();
    assert_eq!(fetched, created);
    assert_eq!(fetched.wg, Some(true));
    assert_eq!(
        Server {
            id: None,
            status: None,
            ..fetched
        },
        config.to_server()
    );
}

#[tokio::test]
async fn bridge_server_round_trip() {
    let server = stateful_server().await;
    let api = client(&server);

    let config = ServerConfig::new("lab-bridge")
        .with_network("10.20.0.0/16")
        .with_bridge("10.20.5.10", "10.20.5.200")
        .with_port(1195);

    let created = api.create_server(&config).await.unwrap();
    let fetched = api.get_server(created.id.as_ref().unwrap()).await.unwrap();

    assert_eq!(fetched.network_mode, Some(NetworkMode::Bridge));
    assert_eq!(
        Server {
            id: None,
            status: None,
            ..fetched
        },
        config.to_server()
    );
}
