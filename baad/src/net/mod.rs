//! Buffered HTTP plumbing: client seam and catalog fetching.

mod catalog_client;
mod http;

pub use catalog_client::{load_snapshot, save_snapshot, CatalogClient, SNAPSHOT_FILE};
pub use http::{HttpClient, HttpError, ReqwestClient};

#[cfg(test)]
pub use http::tests::MockHttpClient;
