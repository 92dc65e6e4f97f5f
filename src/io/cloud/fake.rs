//! Fake implementations for testing.
//!
//! These implementations use in-memory data structures to simulate an object store,
//! making them ideal for unit testing the job without network access.

use crate::io::cloud::traits::{CloudIOError, CloudResult, ErrorKind, ObjectIO};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

type BucketStorage = Arc<Mutex<HashMap<String, HashMap<String, Vec<u8>>>>>;

// ============================================================================
// FakeObjectIO
// ============================================================================

/// In-memory object store with optional failure injection.
///
/// Clones share the same buckets, so a test can hand one clone to the job and keep
/// another to inspect what was written.
#[derive(Clone)]
pub struct FakeObjectIO {
    storage: BucketStorage,
    fail_gets: Arc<Mutex<Option<ErrorKind>>>,
    fail_puts: Arc<Mutex<Option<ErrorKind>>>,
    puts: Arc<Mutex<u64>>,
}

impl FakeObjectIO {
    #[must_use]
    pub fn new() -> Self {
        Self {
            storage: Arc::new(Mutex::new(HashMap::new())),
            fail_gets: Arc::new(Mutex::new(None)),
            fail_puts: Arc::new(Mutex::new(None)),
            puts: Arc::new(Mutex::new(0)),
        }
    }

    /// Make every subsequent `get_object` fail with `kind`.
    pub fn fail_gets(&self, kind: ErrorKind) {
        *self.fail_gets.lock().expect("fail_gets mutex poisoned") = Some(kind);
    }

    /// Make every subsequent `put_object` fail with `kind`.
    pub fn fail_puts(&self, kind: ErrorKind) {
        *self.fail_puts.lock().expect("fail_puts mutex poisoned") = Some(kind);
    }

    /// Number of successful `put_object` calls so far.
    #[must_use]
    pub fn put_count(&self) -> u64 {
        *self.puts.lock().expect("puts mutex poisoned")
    }

    /// Whether `bucket/key` currently holds an object.
    #[must_use]
    pub fn contains(&self, bucket: &str, key: &str) -> bool {
        let storage = self.storage.lock().expect("storage mutex poisoned");
        storage.get(bucket).is_some_and(|b| b.contains_key(key))
    }
}

impl Default for FakeObjectIO {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectIO for FakeObjectIO {
    fn put_object(&self, bucket: &str, key: &str, data: &[u8]) -> CloudResult<()> {
        if let Some(kind) = *self.fail_puts.lock().expect("fail_puts mutex poisoned") {
            return Err(CloudIOError::new(
                kind,
                format!("Injected failure writing {bucket}/{key}"),
            ));
        }
        self.storage
            .lock()
            .expect("storage mutex poisoned")
            .entry(bucket.to_string())
            .or_default()
            .insert(key.to_string(), data.to_vec());
        *self.puts.lock().expect("puts mutex poisoned") += 1;
        Ok(())
    }

    fn get_object(&self, bucket: &str, key: &str) -> CloudResult<Vec<u8>> {
        if let Some(kind) = *self.fail_gets.lock().expect("fail_gets mutex poisoned") {
            return Err(CloudIOError::new(
                kind,
                format!("Injected failure reading {bucket}/{key}"),
            ));
        }
        let storage = self.storage.lock().expect("storage mutex poisoned");
        storage
            .get(bucket)
            .and_then(|b| b.get(key))
            .cloned()
            .ok_or_else(|| {
                CloudIOError::new(
                    ErrorKind::NotFound,
                    format!("Object {bucket}/{key} not found"),
                )
            })
    }
}
