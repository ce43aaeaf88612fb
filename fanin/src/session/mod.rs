//! Per-client settings every result is created with.

pub mod checkers;
pub mod filters;


use std::sync::Arc;

use crate::entry::CmdStatus;
use crate::entry::Reply;
use crate::ExceptionsPolicy;
use crate::ProducerHandle;
use crate::ResultHandle;
use crate::SessionConfig;

/// Decides whether a reply is visible to the consumers of a result.
pub type Filter = Arc<dyn Fn(&dyn Reply) -> bool + Send + Sync + 'static>;

/// Decides from the statuses of all terminal replies and the expected number
/// of them whether an operation succeeded.
pub type Checker =
    Arc<dyn Fn(&[CmdStatus], usize) -> bool + Send + Sync + 'static>;

/// A client session.
///
/// It holds the strategies every [`ResultHandle`] it creates is bound to.
/// Changing a strategy affects only results created afterwards.
///
/// ### Clone
///
/// Cloning is cheap, and the clone can be changed independently.
#[derive(Clone)]
pub struct Session {
    config: Arc<SessionConfig>,
    filter: Filter,
    checker: Checker,
    policy: ExceptionsPolicy,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Arc::new(SessionConfig::default()))
    }
}

impl Session {
    pub fn new(config: Arc<SessionConfig>) -> Self {
        Self {
            filter: config.filter.to_filter(),
            checker: config.checker.to_checker(),
            policy: config.exceptions_policy(),
            config,
        }
    }

    pub fn config(&self) -> &Arc<SessionConfig> {
        &self.config
    }

    pub fn filter(&self) -> Filter {
        self.filter.clone()
    }

    pub fn set_filter<F>(&mut self, filter: F)
    where F: Fn(&dyn Reply) -> bool + Send + Sync + 'static {
        self.filter = Arc::new(filter);
    }

    pub fn checker(&self) -> Checker {
        self.checker.clone()
    }

    pub fn set_checker<F>(&mut self, checker: F)
    where F: Fn(&[CmdStatus], usize) -> bool + Send + Sync + 'static {
        self.checker = Arc::new(checker);
    }

    pub fn exceptions_policy(&self) -> ExceptionsPolicy {
        self.policy
    }

    pub fn set_exceptions_policy(&mut self, policy: ExceptionsPolicy) {
        self.policy = policy;
    }

    /// Start a new operation: returns the result to consume and the producer
    /// to hand to the network layer.
    pub fn async_result<T>(&self) -> (ResultHandle<T>, ProducerHandle<T>)
    where T: Reply + Clone + Send + 'static {
        let result = ResultHandle::new(self);
        let producer = result.producer();
        (result, producer)
    }
}
