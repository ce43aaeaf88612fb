use std::collections::VecDeque;
use std::iter::FusedIterator;
use std::sync::Arc;
use std::sync::Weak;

use parking_lot::Condvar;
use parking_lot::Mutex;
use tracing::trace;

use crate::entry::Reply;
use crate::ExceptionsPolicy;
use crate::IterError;
use crate::OpError;
use crate::ResultHandle;

/// A blocking, single pass iterator over the visible replies of a result.
///
/// It subscribes to the result when created and buffers replies in a queue
/// of its own. Advancing blocks until the next reply arrives or the
/// operation completes. The subscription only holds a weak reference to the
/// queue: dropping the iterator early turns the remaining deliveries into
/// no-ops, and the iterator does not keep the result alive.
///
/// Reaching the end returns the stored error if the exceptions policy has
/// [`ExceptionsPolicy::THROW_AT_ITERATOR_END`].
///
/// Besides [`Iterator`], it provides a cursor interface:
/// [`current`](Self::current), [`advance`](Self::advance) and
/// [`at_end`](Self::at_end).
pub struct ResultIter<T> {
    queue: Option<Arc<IterQueue<T>>>,
    state: IterState<T>,
}

enum IterState<T> {
    /// No cached reply, fetch one on demand.
    Waiting,
    Ready(T),
    AtEnd,
}

struct IterQueue<T> {
    data: Mutex<IterData<T>>,
    cond: Condvar,
    policy: ExceptionsPolicy,
}

struct IterData<T> {
    results: VecDeque<T>,
    finished: bool,
    error: Option<OpError>,
}

impl<T> IterQueue<T> {
    fn push(weak: &Weak<Self>, reply: &T)
    where T: Clone {
        let Some(queue) = weak.upgrade() else {
            trace!("{}: iterator dropped", func_name!());
            return;
        };

        let mut d = queue.data.lock();
        d.results.push_back(reply.clone());
        queue.cond.notify_all();
    }

    fn finish(weak: &Weak<Self>, error: Option<OpError>) {
        let Some(queue) = weak.upgrade() else {
            trace!("{}: iterator dropped", func_name!());
            return;
        };

        let mut d = queue.data.lock();
        d.finished = true;
        d.error = error;
        queue.cond.notify_all();
    }
}

impl<T> ResultIter<T>
where T: Reply + Clone + Send + 'static
{
    pub(crate) fn new(result: &ResultHandle<T>) -> Self {
        let queue = Arc::new(IterQueue {
            data: Mutex::new(IterData {
                results: VecDeque::new(),
                finished: false,
                error: None,
            }),
            cond: Condvar::new(),
            policy: result.policy(),
        });

        let on_result = Arc::downgrade(&queue);
        let on_final = on_result.clone();

        result.connect(
            move |reply: &T| IterQueue::push(&on_result, reply),
            move |error| IterQueue::finish(&on_final, error),
        );

        Self {
            queue: Some(queue),
            state: IterState::Waiting,
        }
    }
}

impl<T> ResultIter<T> {
    /// An iterator that is already at the end.
    pub fn end() -> Self {
        Self {
            queue: None,
            state: IterState::AtEnd,
        }
    }

    /// If no reply is cached, block until one arrives or the operation
    /// completes.
    fn ensure_data(&mut self) -> Result<(), OpError> {
        if !matches!(self.state, IterState::Waiting) {
            return Ok(());
        }

        let Some(queue) = &self.queue else {
            self.state = IterState::AtEnd;
            return Ok(());
        };

        let mut d = queue.data.lock();
        while !d.finished && d.results.is_empty() {
            queue.cond.wait(&mut d);
        }

        if let Some(reply) = d.results.pop_front() {
            self.state = IterState::Ready(reply);
            return Ok(());
        }

        self.state = IterState::AtEnd;

        if queue.policy.contains(ExceptionsPolicy::THROW_AT_ITERATOR_END) {
            if let Some(e) = &d.error {
                return Err(e.clone());
            }
        }
        Ok(())
    }

    /// Whether there are no more replies, blocking until it is known.
    pub fn at_end(&mut self) -> Result<bool, OpError> {
        self.ensure_data()?;
        Ok(matches!(self.state, IterState::AtEnd))
    }

    /// The current reply.
    pub fn current(&mut self) -> Result<&T, IterError> {
        self.ensure_data()?;
        match &self.state {
            IterState::Ready(reply) => Ok(reply),
            _ => Err(IterError::EndOfSequence { op: "current" }),
        }
    }

    /// Move to the next reply, blocking until it arrives or the end is
    /// reached.
    pub fn advance(&mut self) -> Result<(), IterError> {
        self.ensure_data()?;
        if matches!(self.state, IterState::AtEnd) {
            return Err(IterError::EndOfSequence { op: "advance" });
        }

        self.state = IterState::Waiting;
        self.ensure_data()?;
        Ok(())
    }

    /// Two iterators are at the same position if both or neither are at
    /// the end.
    pub fn same_position(
        &mut self,
        other: &mut Self,
    ) -> Result<bool, OpError> {
        Ok(self.at_end()? == other.at_end()?)
    }
}

impl<T> Default for ResultIter<T> {
    fn default() -> Self {
        Self::end()
    }
}

impl<T> Iterator for ResultIter<T> {
    type Item = Result<T, OpError>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Err(e) = self.ensure_data() {
            return Some(Err(e));
        }

        match std::mem::replace(&mut self.state, IterState::Waiting) {
            IterState::Ready(reply) => Some(Ok(reply)),
            other => {
                self.state = other;
                None
            }
        }
    }
}

impl<T> FusedIterator for ResultIter<T> {}
