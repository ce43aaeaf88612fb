use parking_lot::Condvar;
use parking_lot::Mutex;

use crate::async_result::FinalFn;
use crate::async_result::ResultFn;
use crate::entry::CmdStatus;
use crate::session::Checker;
use crate::session::Filter;
use crate::ExceptionsPolicy;
use crate::OpError;

/// The state shared by every handle of one fanned-out operation.
///
/// The strategies are copied from the session when the operation starts and
/// are never changed afterwards. Everything else is guarded by `data`.
pub(crate) struct Shared<T> {
    pub(crate) data: Mutex<State<T>>,

    /// Notified once, when the operation completes and its final handlers
    /// have returned.
    pub(crate) cond: Condvar,

    pub(crate) filter: Filter,
    pub(crate) checker: Checker,
    pub(crate) policy: ExceptionsPolicy,
}

pub(crate) struct State<T> {
    /// Every reply that passed the filter, in arrival order.
    pub(crate) results: Vec<T>,

    /// Status of every terminal reply, filtered or not.
    pub(crate) statuses: Vec<CmdStatus>,

    /// Number of terminal replies the producer expects.
    pub(crate) total: usize,

    pub(crate) finished: bool,

    /// Set after `finished`, once the final handlers have returned. Waiters
    /// wait for this one.
    pub(crate) handlers_done: bool,

    pub(crate) error: Option<OpError>,

    /// The checker verdict, if the checker has been consulted at completion.
    pub(crate) check_passed: Option<bool>,

    pub(crate) result_handlers: Vec<ResultFn<T>>,
    pub(crate) final_handlers: Vec<FinalFn>,
}

impl<T> Shared<T> {
    pub(crate) fn new(
        filter: Filter,
        checker: Checker,
        policy: ExceptionsPolicy,
    ) -> Self {
        Self {
            data: Mutex::new(State {
                results: vec![],
                statuses: vec![],
                total: 0,
                finished: false,
                handlers_done: false,
                error: None,
                check_passed: None,
                result_handlers: vec![],
                final_handlers: vec![],
            }),
            cond: Condvar::new(),
            filter,
            checker,
            policy,
        }
    }

    /// Run the checker against the terminal statuses received so far.
    ///
    /// If the checker rejects the operation, an error is synthesized only if
    /// no node succeeded: the first node error if there is one, otherwise an
    /// insufficient-results error.
    pub(crate) fn check(&self, st: &State<T>) -> (bool, Option<OpError>) {
        if (self.checker)(&st.statuses, st.total) {
            return (true, None);
        }

        let mut success = 0;
        let mut first_failure = None;

        for cmd in st.statuses.iter() {
            if cmd.is_success() {
                success += 1;
            } else if first_failure.is_none() {
                first_failure = Some(cmd);
            }
        }

        if success > 0 {
            return (false, None);
        }

        let err = match first_failure {
            Some(cmd) => OpError::from_status(cmd),
            None => OpError::insufficient_results(
                success,
                st.total,
                st.statuses.len(),
            ),
        };

        (false, Some(err))
    }
}
