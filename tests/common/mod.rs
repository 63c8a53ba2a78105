#![allow(dead_code)]

use std::{
    collections::{BTreeMap, BTreeSet, HashMap},
    net::SocketAddr,
    path::Path,
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use bunny_storage_adapter::{
    adapters::outbound::{
        settings::InMemorySettingsStore,
        storage::{BunnyClient, BunnyStorageProvider, StorageEndpoints},
    },
    domain::models::ProviderSettings,
};
use serde_json::json;
use tokio::net::TcpListener;

pub const ZONE: &str = "media";
pub const API_KEY: &str = "zone-password";

/// One request received by the mock
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub access_key: Option<String>,
    pub content_type: Option<String>,
    pub body: Bytes,
}

#[derive(Debug, Clone)]
struct Zone {
    password: String,
    region: Option<String>,
}

#[derive(Default)]
struct MockState {
    zones: BTreeMap<String, Zone>,
    // "zone/path/to/key" -> contents
    objects: BTreeMap<String, Bytes>,
    scripted: HashMap<(Method, String), (u16, String)>,
    requests: Vec<RecordedRequest>,
}

/// In-process stand-in for the Bunny storage and purge APIs.
pub struct MockBunny {
    pub addr: SocketAddr,
    state: Arc<Mutex<MockState>>,
}

impl MockBunny {
    pub async fn start() -> Self {
        let state = Arc::new(Mutex::new(MockState::default()));

        let app = Router::new().fallback(handle).with_state(state.clone());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    /// Mock with the default zone registered
    pub async fn with_zone() -> Self {
        let mock = Self::start().await;
        mock.add_zone(ZONE, API_KEY, None);
        mock
    }

    pub fn endpoints(&self) -> StorageEndpoints {
        StorageEndpoints {
            scheme: "http".to_string(),
            storage_host: self.addr.to_string(),
            api_base: format!("http://{}", self.addr),
        }
    }

    pub fn client(&self) -> BunnyClient {
        BunnyClient::new(self.endpoints(), Duration::from_secs(5))
    }

    /// Client whose `<region>.localhost` storage host resolves to the mock
    pub fn regional_client(&self, region: &str) -> BunnyClient {
        let http = reqwest::Client::builder()
            .resolve(&format!("{}.localhost", region), self.addr)
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();

        let endpoints = StorageEndpoints {
            storage_host: format!("localhost:{}", self.addr.port()),
            ..self.endpoints()
        };

        BunnyClient::with_http_client(http, endpoints)
    }

    pub fn add_zone(&self, zone: &str, password: &str, region: Option<&str>) {
        self.state.lock().unwrap().zones.insert(
            zone.to_string(),
            Zone {
                password: password.to_string(),
                region: region.map(str::to_string),
            },
        );
    }

    pub fn put_object(&self, zone: &str, key: &str, body: impl Into<Bytes>) {
        self.state
            .lock()
            .unwrap()
            .objects
            .insert(format!("{}/{}", zone, key), body.into());
    }

    pub fn object(&self, zone: &str, key: &str) -> Option<Bytes> {
        self.state
            .lock()
            .unwrap()
            .objects
            .get(&format!("{}/{}", zone, key))
            .cloned()
    }

    /// Answer `method path` with a fixed status and body
    pub fn fail(&self, method: Method, path: &str, status: u16, body: &str) {
        self.state
            .lock()
            .unwrap()
            .scripted
            .insert((method, path.to_string()), (status, body.to_string()));
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn requests_with(&self, method: Method) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method)
            .collect()
    }

    /// URLs sent to the purge endpoint, in order
    pub fn purged_urls(&self) -> Vec<String> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == Method::POST && r.path == "/purge")
            .filter_map(|r| serde_json::from_slice::<serde_json::Value>(&r.body).ok())
            .filter_map(|v| v["url"].as_str().map(str::to_string))
            .collect()
    }
}

async fn handle(
    State(state): State<Arc<Mutex<MockState>>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path().to_string();
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    let mut state = state.lock().unwrap();
    state.requests.push(RecordedRequest {
        method: method.clone(),
        path: path.clone(),
        access_key: header("accesskey"),
        content_type: header("content-type"),
        body: body.clone(),
    });

    if let Some((status, body)) = state.scripted.get(&(method.clone(), path.clone())) {
        return (StatusCode::from_u16(*status).unwrap(), body.clone()).into_response();
    }

    if method == Method::POST && path == "/purge" {
        return StatusCode::OK.into_response();
    }

    let decoded = urlencoding::decode(&path)
        .map(|p| p.into_owned())
        .unwrap_or_else(|_| path.clone());
    let trimmed = decoded.trim_start_matches('/');
    let (zone_name, key) = trimmed.split_once('/').unwrap_or((trimmed, ""));

    let Some(zone) = state.zones.get(zone_name).cloned() else {
        return not_found();
    };

    if header("accesskey").as_deref() != Some(zone.password.as_str()) {
        return (
            StatusCode::UNAUTHORIZED,
            axum::Json(json!({"HttpCode": 401, "Message": "Unauthorized"})),
        )
            .into_response();
    }

    let object_path = format!("{}/{}", zone_name, key);

    match method {
        Method::HEAD if key.is_empty() => {
            let mut response = StatusCode::OK.into_response();
            if let Some(region) = zone.region {
                response
                    .headers_mut()
                    .insert("x-storagezoneregion", region.parse().unwrap());
            }
            response
        }
        Method::HEAD if state.objects.contains_key(&object_path) => StatusCode::OK.into_response(),
        Method::HEAD => StatusCode::NOT_FOUND.into_response(),
        Method::PUT => {
            state.objects.insert(object_path, body);
            (
                StatusCode::CREATED,
                axum::Json(json!({"HttpCode": 201, "Message": "File uploaded."})),
            )
                .into_response()
        }
        Method::DELETE => match state.objects.remove(&object_path) {
            Some(_) => (
                StatusCode::OK,
                axum::Json(json!({"HttpCode": 200, "Message": "File deleted successfuly."})),
            )
                .into_response(),
            None => not_found(),
        },
        Method::GET => match state.objects.get(&object_path) {
            Some(contents) => (StatusCode::OK, contents.clone()).into_response(),
            None if is_directory(&state.objects, zone_name, key) => {
                listing(&state.objects, zone_name, key)
            }
            None => not_found(),
        },
        _ => StatusCode::METHOD_NOT_ALLOWED.into_response(),
    }
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        axum::Json(json!({"HttpCode": 404, "Message": "Object Not Found"})),
    )
        .into_response()
}

// The zone root, or a prefix some stored object lives under
fn is_directory(objects: &BTreeMap<String, Bytes>, zone: &str, dir: &str) -> bool {
    let dir = dir.trim_end_matches('/');
    if dir.is_empty() {
        return true;
    }

    let prefix = format!("{}/{}/", zone, dir);
    objects.keys().any(|path| path.starts_with(&prefix))
}

// Direct children of `dir` in `zone`, in the storage API's listing shape
fn listing(objects: &BTreeMap<String, Bytes>, zone: &str, dir: &str) -> Response {
    let dir = dir.trim_end_matches('/');
    let prefix = if dir.is_empty() {
        format!("{}/", zone)
    } else {
        format!("{}/{}/", zone, dir)
    };

    let mut files = Vec::new();
    let mut dirs = BTreeSet::new();

    for (path, contents) in objects.range(prefix.clone()..) {
        let Some(rest) = path.strip_prefix(&prefix) else {
            break;
        };

        match rest.split_once('/') {
            Some((child, _)) => {
                dirs.insert(child.to_string());
            }
            None => files.push(json!({
                "Guid": format!("guid-{}", rest),
                "StorageZoneName": zone,
                "Path": format!("/{}", prefix),
                "ObjectName": rest,
                "Length": contents.len(),
                "LastChanged": "2024-01-18T08:08:19.781",
                "DateCreated": "2024-01-18T08:08:19.781",
                "IsDirectory": false,
            })),
        }
    }

    let mut entries: Vec<_> = dirs
        .into_iter()
        .map(|name| {
            json!({
                "StorageZoneName": zone,
                "Path": format!("/{}", prefix),
                "ObjectName": name,
                "Length": 0,
                "IsDirectory": true,
            })
        })
        .collect();
    entries.extend(files);

    (StatusCode::OK, axum::Json(serde_json::Value::Array(entries))).into_response()
}

pub fn settings() -> ProviderSettings {
    ProviderSettings {
        storage_zone: ZONE.to_string(),
        api_key: API_KEY.to_string(),
        ..Default::default()
    }
}

/// Provider wired to the mock, with a handle to change settings
pub fn provider_for(
    mock: &MockBunny,
    settings: ProviderSettings,
    temp_dir: &Path,
) -> (BunnyStorageProvider, InMemorySettingsStore) {
    let store = InMemorySettingsStore::new(settings);
    let provider =
        BunnyStorageProvider::with_temp_dir(mock.client(), Arc::new(store.clone()), temp_dir);
    (provider, store)
}

/// Whether `dir` has no entries left
pub fn is_empty_dir(dir: &Path) -> bool {
    std::fs::read_dir(dir).unwrap().next().is_none()
}
