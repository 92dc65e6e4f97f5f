//! S3 implementation of [`ObjectIO`] on top of `object_store`.
//!
//! `object_store` is async; [`S3ObjectIO`] owns a current-thread Tokio runtime and
//! blocks on each request, matching the synchronous [`ObjectIO`] interface.
//! Credentials and region come from the usual `AWS_*` environment variables.

use crate::io::cloud::traits::{CloudIOError, CloudResult, ErrorKind, ObjectIO};
use object_store::aws::AmazonS3Builder;
use object_store::path::Path;
use object_store::{ObjectStore, PutPayload, RetryConfig};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::runtime::Runtime;
use tracing::debug;

/// Connection settings layered over the ambient AWS environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct S3Settings {
    pub region: Option<String>,
    pub endpoint: Option<String>,
}

/// Blocking S3 client.
///
/// `object_store` binds a store to one bucket, so stores are built lazily per
/// bucket and cached for the lifetime of the client.
pub struct S3ObjectIO {
    settings: S3Settings,
    runtime: Runtime,
    stores: Mutex<HashMap<String, Arc<dyn ObjectStore>>>,
}

impl S3ObjectIO {
    /// Build a client with its own runtime.
    ///
    /// # Errors
    ///
    /// Returns an error if the Tokio runtime cannot be started.
    pub fn new(settings: S3Settings) -> CloudResult<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| {
                CloudIOError::new(ErrorKind::Other, "failed to start async runtime")
                    .with_source(e.to_string())
            })?;
        Ok(Self {
            settings,
            runtime,
            stores: Mutex::new(HashMap::new()),
        })
    }

    fn store_for(&self, bucket: &str) -> CloudResult<Arc<dyn ObjectStore>> {
        let mut stores = self.stores.lock().expect("stores mutex poisoned");
        if let Some(store) = stores.get(bucket) {
            return Ok(Arc::clone(store));
        }

        // Retries belong to whoever schedules the job.
        let retry = RetryConfig {
            max_retries: 0,
            ..RetryConfig::default()
        };
        let mut builder = AmazonS3Builder::from_env()
            .with_bucket_name(bucket)
            .with_retry(retry);
        if let Some(region) = &self.settings.region {
            builder = builder.with_region(region);
        }
        if let Some(endpoint) = &self.settings.endpoint {
            builder = builder
                .with_endpoint(endpoint)
                .with_virtual_hosted_style_request(false)
                .with_allow_http(true);
        }
        let store: Arc<dyn ObjectStore> = Arc::new(builder.build().map_err(map_store_error)?);
        debug!(bucket, "built S3 store");
        stores.insert(bucket.to_string(), Arc::clone(&store));
        Ok(store)
    }
}

impl ObjectIO for S3ObjectIO {
    fn put_object(&self, bucket: &str, key: &str, data: &[u8]) -> CloudResult<()> {
        let store = self.store_for(bucket)?;
        let path = Path::from(key);
        let payload = PutPayload::from(data.to_vec());
        self.runtime
            .block_on(store.put(&path, payload))
            .map_err(map_store_error)?;
        Ok(())
    }

    fn get_object(&self, bucket: &str, key: &str) -> CloudResult<Vec<u8>> {
        let store = self.store_for(bucket)?;
        let path = Path::from(key);
        let bytes = self
            .runtime
            .block_on(async {
                let result = store.get(&path).await?;
                result.bytes().await
            })
            .map_err(map_store_error)?;
        Ok(bytes.to_vec())
    }
}

/// Classify an `object_store` error into an [`ErrorKind`].
fn map_store_error(err: object_store::Error) -> CloudIOError {
    let kind = match &err {
        object_store::Error::NotFound { .. } => ErrorKind::NotFound,
        object_store::Error::PermissionDenied { .. } => ErrorKind::Authorization,
        object_store::Error::Unauthenticated { .. } => ErrorKind::Authentication,
        object_store::Error::InvalidPath { .. }
        | object_store::Error::UnknownConfigurationKey { .. }
        | object_store::Error::NotSupported { .. } => ErrorKind::InvalidInput,
        _ => ErrorKind::Network,
    };
    CloudIOError::new(kind, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_not_found() {
        let err = object_store::Error::NotFound {
            path: "data.csv".to_string(),
            source: "404".into(),
        };
        assert_eq!(map_store_error(err).kind, ErrorKind::NotFound);
    }

    #[test]
    fn generic_maps_to_network() {
        let err = object_store::Error::Generic {
            store: "S3",
            source: "connection reset".into(),
        };
        let mapped = map_store_error(err);
        assert_eq!(mapped.kind, ErrorKind::Network);
        assert!(mapped.message.contains("connection reset"));
    }

    #[test]
    fn stores_are_cached_per_bucket() {
        let client = S3ObjectIO::new(S3Settings {
            region: Some("us-east-1".to_string()),
            endpoint: Some("http://localhost:9000".to_string()),
        })
        .unwrap();
        let a = client.store_for("in-bucket").unwrap();
        let b = client.store_for("in-bucket").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(client.stores.lock().unwrap().len(), 1);
    }
}
