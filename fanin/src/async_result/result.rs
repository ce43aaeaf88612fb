use std::sync::Arc;

use tokio::sync::oneshot;
use tracing::debug;

use crate::async_result::aggregator::Aggregator;
use crate::async_result::shared::Shared;
use crate::async_result::FinalFn;
use crate::async_result::ResultFn;
use crate::async_result::ResultIter;
use crate::entry::Reply;
use crate::errors::errno;
use crate::session::Checker;
use crate::session::Filter;
use crate::ExceptionsPolicy;
use crate::OpError;
use crate::ProducerHandle;
use crate::Session;

/// The consuming side of a fanned-out operation.
///
/// Created by [`Session::async_result`] along with the [`ProducerHandle`]
/// that feeds it.
///
/// Blocking calls must not be made from a subscribed result callback, and
/// must not be made on an async runtime worker: use [`get_async`] there.
///
/// [`get_async`]: ResultHandle::get_async
pub struct ResultHandle<T> {
    shared: Arc<Shared<T>>,
}

impl<T> ResultHandle<T>
where T: Reply + Clone + Send + 'static
{
    /// Create a result with the filter, checker and exceptions policy of a
    /// session.
    pub fn new(session: &Session) -> Self {
        Self::with_strategies(
            session.filter(),
            session.checker(),
            session.exceptions_policy(),
        )
    }

    pub(crate) fn with_strategies(
        filter: Filter,
        checker: Checker,
        policy: ExceptionsPolicy,
    ) -> Self {
        Self {
            shared: Arc::new(Shared::new(filter, checker, policy)),
        }
    }

    /// Build another producer feeding this result.
    pub fn producer(&self) -> ProducerHandle<T> {
        ProducerHandle::new(self.shared.clone())
    }

    /// The exceptions policy copied from the session.
    pub fn policy(&self) -> ExceptionsPolicy {
        self.shared.policy
    }

    /// Subscribe to every visible reply and to the completion.
    ///
    /// `on_result` is first called with every reply buffered so far, in
    /// arrival order, then with every new reply as it is processed. It runs
    /// while the result is locked and must not call back into this result.
    ///
    /// `on_final` is called once with the final error. If the operation has
    /// already completed it is called at once, on the current thread. It
    /// runs unlocked, but must not block on this result: `wait()` returns
    /// only after every final callback has returned.
    ///
    /// Replies are still buffered while subscribed: a later [`get`] or
    /// [`iter`] returns every visible reply, including those already passed
    /// to `on_result`.
    ///
    /// [`get`]: Self::get
    /// [`iter`]: Self::iter
    pub fn connect<R, F>(&self, on_result: R, on_final: F)
    where
        R: FnMut(&T) + Send + 'static,
        F: FnOnce(Option<OpError>) + Send + 'static,
    {
        self.connect_handlers(
            Some(Box::new(on_result)),
            Some(Box::new(on_final)),
        )
    }

    /// Subscribe to every visible reply only.
    ///
    /// See [`connect`](Self::connect).
    pub fn connect_result<R>(&self, on_result: R)
    where R: FnMut(&T) + Send + 'static {
        self.connect_handlers(Some(Box::new(on_result)), None)
    }

    /// Subscribe to the completion only.
    ///
    /// See [`connect`](Self::connect).
    pub fn connect_final<F>(&self, on_final: F)
    where F: FnOnce(Option<OpError>) + Send + 'static {
        self.connect_handlers(None, Some(Box::new(on_final)))
    }

    /// Subscribe to the completion, receiving all visible replies at once
    /// along with the final error.
    pub fn connect_all<F>(&self, on_all: F)
    where F: FnOnce(Vec<T>, Option<OpError>) + Send + 'static {
        let aggregator = Aggregator::new(&self.shared, on_all);
        self.connect_handlers(
            None,
            Some(Box::new(move |error| aggregator.fire(error))),
        )
    }

    /// Forward every visible reply and the completion to another result.
    ///
    /// `producer` must not feed this same result.
    pub fn connect_producer(&self, producer: ProducerHandle<T>) {
        let forward = producer.clone();
        self.connect(
            move |reply: &T| forward.process(reply.clone()),
            move |error| producer.complete(error),
        )
    }

    fn connect_handlers(
        &self,
        on_result: Option<ResultFn<T>>,
        on_final: Option<FinalFn>,
    ) {
        let fire_now = {
            let mut guard = self.shared.data.lock();
            let st = &mut *guard;

            if let Some(mut handler) = on_result {
                debug!("connect: replay {} results", st.results.len());

                for reply in st.results.iter() {
                    handler(reply);
                }
                st.result_handlers.push(handler);
            }

            match on_final {
                Some(handler) if st.finished => {
                    Some((handler, st.error.clone()))
                }
                Some(handler) => {
                    st.final_handlers.push(handler);
                    None
                }
                None => None,
            }
        };

        if let Some((handler, error)) = fire_now {
            handler(error);
        }
    }

    /// Block until the operation completes.
    ///
    /// Returns the stored error if the policy has
    /// [`ExceptionsPolicy::THROW_AT_WAIT`].
    pub fn wait(&self) -> Result<(), OpError> {
        self.wait_with(ExceptionsPolicy::THROW_AT_WAIT)
    }

    /// Block until the operation completes.
    ///
    /// Returns the stored error if the policy of this result has any bit of
    /// `surface`, otherwise returns `Ok` even if the operation failed.
    pub fn wait_with(&self, surface: ExceptionsPolicy) -> Result<(), OpError> {
        let mut st = self.shared.data.lock();
        while !st.handlers_done {
            self.shared.cond.wait(&mut st);
        }

        if self.shared.policy.intersects(surface) {
            if let Some(e) = &st.error {
                return Err(e.clone());
            }
        }
        Ok(())
    }

    /// The stored error. `None` before completion.
    pub fn error(&self) -> Option<OpError> {
        self.shared.data.lock().error.clone()
    }

    /// Whether the operation has completed. The final callbacks may still
    /// be running.
    pub fn is_finished(&self) -> bool {
        self.shared.data.lock().finished
    }

    /// The checker verdict.
    ///
    /// `None` before completion, or if the network layer completed with an
    /// error, in which case the checker is not consulted. `Some(false)` may
    /// come with no [`error`](Self::error): the checker rejected the
    /// operation but some nodes succeeded.
    pub fn check_passed(&self) -> Option<bool> {
        self.shared.data.lock().check_passed
    }

    /// Block until the operation completes and return every visible reply.
    ///
    /// Returns the stored error instead if the policy has
    /// [`ExceptionsPolicy::THROW_AT_GET`].
    pub fn get(&self) -> Result<Vec<T>, OpError> {
        self.wait_with(ExceptionsPolicy::THROW_AT_GET)?;
        Ok(self.shared.data.lock().results.clone())
    }

    /// Block until the operation completes and store the first successful
    /// reply with a payload into `entry`.
    ///
    /// Returns `Ok(false)` and leaves `entry` untouched if there is none.
    pub fn get_one_into(&self, entry: &mut T) -> Result<bool, OpError> {
        self.wait_with(ExceptionsPolicy::THROW_AT_GET)?;

        let st = self.shared.data.lock();
        let found =
            st.results.iter().find(|r| r.status() == 0 && !r.is_empty());

        match found {
            Some(r) => {
                *entry = r.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Like [`get_one_into`](Self::get_one_into), but returns a default reply
    /// if there is no successful reply with a payload.
    pub fn get_one(&self) -> Result<T, OpError>
    where T: Default {
        let mut entry = T::default();
        self.get_one_into(&mut entry)?;
        Ok(entry)
    }

    /// Wait for the completion without blocking the current thread, and
    /// return every visible reply, like [`get`](Self::get).
    ///
    /// If every producer is dropped without completing, it returns an `EIO`
    /// error.
    pub async fn get_async(self) -> Result<Vec<T>, OpError> {
        let (tx, rx) = oneshot::channel();

        self.connect_all(move |results, error| {
            let _ = tx.send((results, error));
        });

        // Only the producers keep the state alive while waiting.
        let policy = self.shared.policy;
        drop(self);

        let (results, error) = rx.await.map_err(|_| {
            OpError::new(-errno::EIO, "result dropped before completion")
        })?;

        if policy.intersects(ExceptionsPolicy::THROW_AT_GET) {
            if let Some(e) = error {
                return Err(e);
            }
        }
        Ok(results)
    }

    /// Create a new iterator over the visible replies.
    ///
    /// Every iterator is fed by its own subscription and yields every reply,
    /// no matter when it is created.
    pub fn iter(&self) -> ResultIter<T> {
        ResultIter::new(self)
    }
}

impl<T> TryFrom<ResultHandle<T>> for Vec<T>
where T: Reply + Clone + Send + 'static
{
    type Error = OpError;

    /// Same as [`ResultHandle::get`].
    fn try_from(result: ResultHandle<T>) -> Result<Self, Self::Error> {
        result.get()
    }
}

impl<T> IntoIterator for &ResultHandle<T>
where T: Reply + Clone + Send + 'static
{
    type Item = Result<T, OpError>;
    type IntoIter = ResultIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> IntoIterator for ResultHandle<T>
where T: Reply + Clone + Send + 'static
{
    type Item = Result<T, OpError>;
    type IntoIter = ResultIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
