mod client;
mod provider;
mod temp_buffer;

pub use client::{
    BunnyClient, StorageEndpoints, StorageResponse, ACCESS_KEY_HEADER, CDN_API_HOST,
    STORAGE_HOST, STORAGE_ZONE_REGION_HEADER,
};
pub use provider::{
    BunnyStorageProvider, CONNECTION_TEST_KEY, CONSOLE_URL, DEFAULT_DOMAIN, PRIVATE_ACL,
    PROVIDER_KEY, PROVIDER_NAME, PROVIDER_SERVICE_NAME, PUBLIC_ACL, SERVICE_KEY, SERVICE_NAME,
    STREAM_WRAPPER_PROTOCOL,
};
pub use temp_buffer::TempUploadBuffer;
