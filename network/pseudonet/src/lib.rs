//! An in-process network for `fanin`.
//!
//! Every operation is sent to all replica groups at once, each group
//! replies from its own tokio task after a random latency, and the
//! operation completes when every group has replied or when the session
//! wait timeout elapses.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use fanin::CallbackEntry;
use fanin::CmdStatus;
use fanin::LookupEntry;
use fanin::OpError;
use fanin::ReadEntry;
use fanin::Reply;
use fanin::ResultHandle;
use fanin::Session;
use futures::future::abortable;
use futures::future::join_all;
use futures::FutureExt;
use memstore::MemStore;
use rand::Rng;
use tokio::runtime::Handle;
use tracing::debug;
use tracing::warn;


/// Fans operations out to a set of in-memory replica groups.
///
/// Must be created within a tokio runtime: replies are produced by tasks
/// spawned on it.
#[derive(Clone)]
pub struct PseudoNet {
    rt: Handle,
    session: Session,
    groups: BTreeMap<u32, MemStore>,

    /// Every reply is delayed by `latency` plus a random duration up to
    /// `jitter`.
    latency: Duration,
    jitter: Duration,
}

impl PseudoNet {
    pub fn new(
        session: Session,
        groups: impl IntoIterator<Item = u32>,
    ) -> Self {
        let groups = groups.into_iter().map(|g| (g, MemStore::new(g)));

        Self {
            rt: Handle::current(),
            session,
            groups: groups.collect(),
            latency: Duration::default(),
            jitter: Duration::default(),
        }
    }

    pub fn with_latency(
        mut self,
        latency: Duration,
        jitter: Duration,
    ) -> Self {
        self.latency = latency;
        self.jitter = jitter;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// The store of `group`, e.g., for failure injection.
    pub fn store(&self, group: u32) -> Option<&MemStore> {
        self.groups.get(&group)
    }

    /// Write `data` to every group. Each group replies with a lookup entry
    /// of the record just written.
    #[tracing::instrument(level = "debug", skip(self, data))]
    pub fn write(&self, key: &str, data: Bytes) -> ResultHandle<LookupEntry> {
        let key = key.to_string();

        self.fan_out("write", move |store| {
            let group = store.group();
            let reply = match store.write(&key, data.clone()) {
                Ok(size) => {
                    let cmd = CmdStatus::new(group, 0);
                    LookupEntry::new(cmd, &key, size, store.address())
                }
                Err(status) => {
                    LookupEntry::failed(CmdStatus::new(group, status), &key)
                }
            };
            vec![reply]
        })
    }

    /// Read `key` from every group.
    ///
    /// A group that has the record replies with the data, flagged as
    /// followed by more replies, then with a terminal acknowledgement.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn read(&self, key: &str) -> ResultHandle<ReadEntry> {
        let key = key.to_string();

        self.fan_out("read", move |store| {
            let group = store.group();
            match store.read(&key) {
                Ok(data) => {
                    let cmd = CmdStatus::new(group, 0);
                    let more = cmd.with_flags(CmdStatus::FLAG_MORE);
                    vec![
                        ReadEntry::new(more, &key, data),
                        ReadEntry::new(cmd, &key, Bytes::new()),
                    ]
                }
                Err(status) => {
                    let cmd = CmdStatus::new(group, status);
                    vec![ReadEntry::new(cmd, &key, Bytes::new())]
                }
            }
        })
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub fn lookup(&self, key: &str) -> ResultHandle<LookupEntry> {
        let key = key.to_string();

        self.fan_out("lookup", move |store| {
            let group = store.group();
            let reply = match store.lookup(&key) {
                Ok(size) => {
                    let cmd = CmdStatus::new(group, 0);
                    LookupEntry::new(cmd, &key, size, store.address())
                }
                Err(status) => {
                    LookupEntry::failed(CmdStatus::new(group, status), &key)
                }
            };
            vec![reply]
        })
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub fn remove(&self, key: &str) -> ResultHandle<CallbackEntry> {
        let key = key.to_string();

        self.fan_out("remove", move |store| {
            let status = store.remove(&key).err().unwrap_or(0);
            let cmd = CmdStatus::new(store.group(), status);
            vec![CallbackEntry::ack(cmd)]
        })
    }

    fn fan_out<T, F>(&self, op: &'static str, reply_of: F) -> ResultHandle<T>
    where
        T: Reply + Clone + Send + 'static,
        F: Fn(&MemStore) -> Vec<T> + Send + Sync + 'static,
    {
        let (result, producer) = self.session.async_result::<T>();
        producer.set_total(self.groups.len());

        let reply_of = Arc::new(reply_of);
        let mut aborts = Vec::with_capacity(self.groups.len());
        let mut tasks = Vec::with_capacity(self.groups.len());

        for store in self.groups.values() {
            let store = store.clone();
            let producer = producer.clone();
            let reply_of = reply_of.clone();
            let delay = self.delay();

            let (task, abort) = abortable(async move {
                tokio::time::sleep(delay).await;

                for reply in reply_of(&store) {
                    producer.process(reply);
                }
            });

            aborts.push(abort);
            tasks.push(self.rt.spawn(task));
        }

        let timeout = self.session.config().wait_timeout();

        self.rt.spawn(async move {
            let all = join_all(tasks);

            futures::select_biased! {
                res = all.fuse() => {
                    for r in res {
                        if let Err(e) = r {
                            warn!("{}: replica task failed: {}", op, e);
                        }
                    }
                    producer.complete(None);
                }
                _ = tokio::time::sleep(timeout).fuse() => {
                    for abort in aborts {
                        abort.abort();
                    }
                    producer.complete(Some(OpError::timeout(timeout, op)));
                }
            }
        });

        debug!("{}: sent to {} groups", op, self.groups.len());
        result
    }

    fn delay(&self) -> Duration {
        if self.jitter.is_zero() {
            return self.latency;
        }

        let jitter =
            rand::thread_rng().gen_range(Duration::ZERO..self.jitter);
        self.latency + jitter
    }
}
