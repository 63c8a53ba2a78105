use std::{path::Path, time::Duration};

use bytes::Bytes;
use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE},
    Client, Method, StatusCode,
};
use tracing::{debug, instrument};

use crate::adapters::outbound::storage::error::{BunnyError, BunnyResult};

/// Host of the storage API; regions are prepended as a subdomain.
pub const STORAGE_HOST: &str = "storage.bunnycdn.com";

/// Host of the account API that serves cache purges.
pub const CDN_API_HOST: &str = "api.bunny.net";

/// Header carrying the storage zone password / account API key.
pub const ACCESS_KEY_HEADER: &str = "accesskey";

/// Response header reporting the region of a storage zone.
pub const STORAGE_ZONE_REGION_HEADER: &str = "x-storagezoneregion";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Where the storage and purge APIs live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEndpoints {
    /// URL scheme for storage requests
    pub scheme: String,
    /// Storage host without region, may include a port
    pub storage_host: String,
    /// Base URL of the account API (scheme and host)
    pub api_base: String,
}

impl Default for StorageEndpoints {
    fn default() -> Self {
        Self {
            scheme: "https".to_string(),
            storage_host: STORAGE_HOST.to_string(),
            api_base: format!("https://{}", CDN_API_HOST),
        }
    }
}

impl StorageEndpoints {
    /// URL of the purge endpoint
    pub fn purge_endpoint(&self) -> String {
        format!("{}/purge", self.api_base.trim_end_matches('/'))
    }
}

/// A successful (2xx) response, fully read.
#[derive(Debug, Clone)]
pub struct StorageResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl StorageResponse {
    /// Value of a response header, if present and valid UTF-8
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Client for the Bunny storage and purge HTTP APIs.
///
/// Every call is exactly one HTTP exchange. Non-2xx responses never count as
/// success and come back as typed [`BunnyError`]s.
#[derive(Debug, Clone)]
pub struct BunnyClient {
    http: Client,
    endpoints: StorageEndpoints,
}

impl BunnyClient {
    /// Create a new client with the given endpoints and request timeout
    pub fn new(endpoints: StorageEndpoints, timeout: Duration) -> Self {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();

        Self { http, endpoints }
    }

    /// Create a client from an existing reqwest client
    pub fn with_http_client(http: Client, endpoints: StorageEndpoints) -> Self {
        Self { http, endpoints }
    }

    pub fn endpoints(&self) -> &StorageEndpoints {
        &self.endpoints
    }

    /// Build the URL of an object (or of the zone root when `key` is empty).
    pub fn build_url(&self, zone: &str, key: &str, region: &str) -> String {
        let zone = zone.trim_start_matches('/').trim_end_matches('/');
        let key = key.trim_start_matches('/');

        let host = if region.is_empty() {
            self.endpoints.storage_host.clone()
        } else {
            format!("{}.{}", region, self.endpoints.storage_host)
        };

        format!(
            "{}://{}/{}/{}",
            self.endpoints.scheme,
            host,
            encode_path(zone),
            encode_path(key)
        )
    }

    /// Perform a single request against the storage API.
    ///
    /// Default headers are `AccessKey`, `Accept: application/json` and
    /// `Content-Type: application/octet-stream`; entries in `headers` replace
    /// them.
    #[allow(clippy::too_many_arguments)]
    #[instrument(
        level = "debug",
        skip(self, method, api_key, body, headers),
        fields(method = %method)
    )]
    pub async fn request(
        &self,
        method: Method,
        zone: &str,
        key: &str,
        api_key: &str,
        body: Option<Bytes>,
        headers: &HeaderMap,
        region: &str,
    ) -> BunnyResult<StorageResponse> {
        if zone.is_empty() {
            return Err(BunnyError::MissingStorageZone);
        }

        if api_key.is_empty() {
            return Err(BunnyError::MissingApiKey);
        }

        let url = self.build_url(zone, key, region);

        let mut request_headers = HeaderMap::new();
        request_headers.insert(
            HeaderName::from_static(ACCESS_KEY_HEADER),
            header_value(api_key)?,
        );
        request_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        request_headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/octet-stream"),
        );
        for (name, value) in headers {
            request_headers.insert(name.clone(), value.clone());
        }

        let mut request = self
            .http
            .request(method, &url)
            .headers(request_headers);

        if let Some(body) = body {
            request = request.body(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let response_headers = response.headers().clone();
        let body = response.bytes().await?;

        debug!(%url, status = status.as_u16(), "Bunny storage request completed");

        if !status.is_success() {
            return Err(BunnyError::Http {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
                body: String::from_utf8_lossy(&body).into_owned(),
                url,
            });
        }

        Ok(StorageResponse {
            status,
            headers: response_headers,
            body,
        })
    }

    /// Best-effort JSON decode of a response body.
    ///
    /// Empty bodies, invalid JSON and scalar values all decode to an empty
    /// array.
    pub fn decode_json_body(response: &StorageResponse) -> serde_json::Value {
        if response.body.is_empty() {
            return serde_json::Value::Array(Vec::new());
        }

        match serde_json::from_slice::<serde_json::Value>(&response.body) {
            Ok(value) if value.is_array() || value.is_object() => value,
            _ => serde_json::Value::Array(Vec::new()),
        }
    }

    /// Upload a local file to `zone/key`.
    #[instrument(level = "debug", skip(self, api_key, headers))]
    pub async fn upload(
        &self,
        zone: &str,
        key: &str,
        source: &Path,
        api_key: &str,
        region: &str,
        headers: &HeaderMap,
    ) -> BunnyResult<StorageResponse> {
        if source.as_os_str().is_empty() || !tokio::fs::try_exists(source).await? {
            return Err(BunnyError::MissingSourceFile {
                path: source.to_path_buf(),
            });
        }

        let contents = tokio::fs::read(source).await?;

        self.request(
            Method::PUT,
            zone,
            key,
            api_key,
            Some(Bytes::from(contents)),
            headers,
            region,
        )
        .await
    }

    /// Delete an object.
    pub async fn delete(
        &self,
        zone: &str,
        key: &str,
        api_key: &str,
        region: &str,
    ) -> BunnyResult<StorageResponse> {
        self.request(Method::DELETE, zone, key, api_key, None, &HeaderMap::new(), region)
            .await
    }

    /// Retrieve an object.
    pub async fn get(
        &self,
        zone: &str,
        key: &str,
        api_key: &str,
        region: &str,
    ) -> BunnyResult<StorageResponse> {
        self.request(Method::GET, zone, key, api_key, None, &HeaderMap::new(), region)
            .await
    }

    /// Existence probe for an object, or for the zone when `key` is empty.
    pub async fn head(
        &self,
        zone: &str,
        key: &str,
        api_key: &str,
        region: &str,
    ) -> BunnyResult<StorageResponse> {
        self.request(Method::HEAD, zone, key, api_key, None, &HeaderMap::new(), region)
            .await
    }

    /// List the objects at a given path.
    pub async fn list(
        &self,
        zone: &str,
        prefix: &str,
        api_key: &str,
        region: &str,
    ) -> BunnyResult<StorageResponse> {
        self.request(
            Method::GET,
            zone,
            prefix.trim_end_matches('/'),
            api_key,
            None,
            &HeaderMap::new(),
            region,
        )
        .await
    }

    /// Purge a URL from the CDN cache.
    #[instrument(level = "debug", skip(self, api_key))]
    pub async fn purge_url(&self, api_key: &str, url: &str) -> BunnyResult<StorageResponse> {
        if api_key.is_empty() {
            return Err(BunnyError::MissingApiKey);
        }

        if url.is_empty() {
            return Err(BunnyError::MissingUrl);
        }

        let endpoint = self.endpoints.purge_endpoint();

        let response = self
            .http
            .post(&endpoint)
            .header(HeaderName::from_static(ACCESS_KEY_HEADER), header_value(api_key)?)
            .json(&serde_json::json!({ "url": url }))
            .send()
            .await?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        debug!(%endpoint, status = status.as_u16(), "Bunny purge request completed");

        if !status.is_success() {
            return Err(BunnyError::PurgeFailed {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
                body: String::from_utf8_lossy(&body).into_owned(),
                url: url.to_string(),
            });
        }

        Ok(StorageResponse {
            status,
            headers,
            body,
        })
    }
}

impl Default for BunnyClient {
    fn default() -> Self {
        Self::new(StorageEndpoints::default(), DEFAULT_TIMEOUT)
    }
}

fn header_value(api_key: &str) -> BunnyResult<HeaderValue> {
    HeaderValue::from_str(api_key).map_err(|_| BunnyError::InvalidApiKey)
}

// Percent-encode every segment so `#`, `?` and friends stay part of the path.
fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment))
        .collect::<Vec<_>>()
        .join("/")
}
