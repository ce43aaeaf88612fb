use std::sync::Arc;

use tracing::debug;
use tracing::trace;
use tracing::warn;

use crate::async_result::shared::Shared;
use crate::entry::Reply;
use crate::OpError;

/// The producing side of a fanned-out operation.
///
/// It is handed to the network layer, which calls [`process`] for every node
/// reply and [`complete`] once all nodes replied, or once the operation
/// failed as a whole.
///
/// ### Clone
///
/// Cloning is cheap: all clones feed the same result. Each node connection
/// usually holds one clone.
///
/// [`process`]: ProducerHandle::process
/// [`complete`]: ProducerHandle::complete
pub struct ProducerHandle<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Clone for ProducerHandle<T> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<T> ProducerHandle<T>
where T: Reply + Clone + Send + 'static
{
    pub(crate) fn new(shared: Arc<Shared<T>>) -> Self {
        Self { shared }
    }

    /// Set the number of terminal replies to expect, e.g., one per replica
    /// group.
    ///
    /// The checker receives it as the total. It should be set before any
    /// reply arrives.
    pub fn set_total(&self, total: usize) {
        self.shared.data.lock().total = total;
    }

    /// The number of terminal replies to expect. 0 if never set.
    pub fn total(&self) -> usize {
        self.shared.data.lock().total
    }

    /// Feed one node reply.
    ///
    /// A terminal reply is always recorded for the checker. The reply is
    /// then passed to the subscribed callbacks and buffered, unless the
    /// filter rejects it.
    ///
    /// Subscribed callbacks run on the calling thread while the result is
    /// locked.
    pub fn process(&self, reply: T) {
        let mut guard = self.shared.data.lock();
        let st = &mut *guard;

        if st.finished {
            warn!(
                "{}: reply after completion is ignored: {}",
                func_name!(),
                reply.command()
            );
            return;
        }

        if reply.is_final() {
            st.statuses.push(*reply.command());
        }

        let visible: &dyn Reply = &reply;
        if !(self.shared.filter)(visible) {
            trace!("filtered out: {}", reply.command());
            return;
        }

        trace!("accepted: {}", reply.command());

        for handler in st.result_handlers.iter_mut() {
            handler(&reply);
        }
        st.results.push(reply);
    }

    /// Complete the operation, with the error reported by the network layer,
    /// if any.
    ///
    /// Without a network error the checker decides the outcome. Subscribed
    /// final callbacks are called after the result is unlocked, with the
    /// final error. Then every thread blocked on the result is woken up, so
    /// that a returned `wait()` implies the final callbacks have run.
    pub fn complete(&self, error: Option<OpError>) {
        let (handlers, error) = {
            let mut guard = self.shared.data.lock();
            let st = &mut *guard;

            if st.finished {
                warn!(
                    "{}: already completed, ignore error: {:?}",
                    func_name!(),
                    error
                );
                return;
            }

            st.finished = true;
            st.error = match error {
                Some(e) => Some(e),
                None => {
                    let (passed, err) = self.shared.check(st);
                    st.check_passed = Some(passed);
                    err
                }
            };

            debug!(
                "completed: results: {}, statuses: {}/{}, checked: {:?}, {:?}",
                st.results.len(),
                st.statuses.len(),
                st.total,
                st.check_passed,
                st.error
            );

            (std::mem::take(&mut st.final_handlers), st.error.clone())
        };

        for handler in handlers {
            handler(error.clone());
        }

        self.shared.data.lock().handlers_done = true;
        self.shared.cond.notify_all();
    }

    /// Run the checker against the terminal replies received so far.
    ///
    /// Returns the checker verdict and the error that [`complete`] would
    /// store if the network layer reported none.
    ///
    /// [`complete`]: ProducerHandle::complete
    pub fn check(&self) -> (bool, Option<OpError>) {
        let st = self.shared.data.lock();
        self.shared.check(&st)
    }
}
