use std::collections::BTreeMap;
use std::sync::Arc;

use bytes::Bytes;
use fanin::errors::errno;
use parking_lot::Mutex;
use tracing::debug;

/// A failed operation on a store, as a negated errno.
pub type Status = i32;

/// An in-memory store of one replica group.
///
/// Clones share the same data.
#[derive(Debug, Clone)]
pub struct MemStore {
    group: u32,
    address: String,
    inner: Arc<Mutex<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    records: BTreeMap<String, Bytes>,

    /// If set, every operation fails with this status.
    fail: Option<Status>,
}

impl MemStore {
    pub fn new(group: u32) -> Self {
        Self {
            group,
            address: format!("127.0.0.1:{}", 1025 + group),
            inner: Arc::new(Mutex::new(Inner::default())),
        }
    }

    pub fn group(&self) -> u32 {
        self.group
    }

    /// The address of the node serving this group.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Make every following operation fail with `status`, or recover with
    /// `None`.
    pub fn set_fail(&self, status: Option<Status>) {
        debug!(
            "MemStore::set_fail: group={}, status={:?}",
            self.group, status
        );
        self.inner.lock().fail = status;
    }

    /// Store `data` under `key`, returns the size of the record.
    pub fn write(&self, key: &str, data: Bytes) -> Result<u64, Status> {
        let mut inner = self.inner.lock();
        inner.check()?;

        let size = data.len() as u64;
        inner.records.insert(key.to_string(), data);

        debug!(
            "MemStore::write: group={}, key={}, size={}",
            self.group, key, size
        );
        Ok(size)
    }

    pub fn read(&self, key: &str) -> Result<Bytes, Status> {
        let inner = self.inner.lock();
        inner.check()?;

        let got = inner.records.get(key).cloned();
        debug!(
            "MemStore::read: group={}, key={}, found={}",
            self.group,
            key,
            got.is_some()
        );
        got.ok_or(-errno::ENOENT)
    }

    /// The size of the record stored under `key`.
    pub fn lookup(&self, key: &str) -> Result<u64, Status> {
        let inner = self.inner.lock();
        inner.check()?;

        inner
            .records
            .get(key)
            .map(|d| d.len() as u64)
            .ok_or(-errno::ENOENT)
    }

    pub fn remove(&self, key: &str) -> Result<(), Status> {
        let mut inner = self.inner.lock();
        inner.check()?;

        debug!("MemStore::remove: group={}, key={}", self.group, key);
        inner.records.remove(key).map(|_| ()).ok_or(-errno::ENOENT)
    }
}

impl Inner {
    fn check(&self) -> Result<(), Status> {
        match self.fail {
            Some(status) => Err(status),
            None => Ok(()),
        }
    }
}
