//! Testing utilities for fanin.

use crate::entry::CmdStatus;
use crate::entry::Reply;
use crate::session::Checker;
use crate::session::Filter;
use crate::ExceptionsPolicy;
use crate::ResultHandle;

/// A reply with a string payload, for testing purposes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestReply {
    pub cmd: CmdStatus,
    pub payload: String,
}

impl Reply for TestReply {
    fn command(&self) -> &CmdStatus {
        &self.cmd
    }

    fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}

/// A successful terminal reply from `group`.
pub fn ok(group: u32, payload: impl ToString) -> TestReply {
    TestReply {
        cmd: CmdStatus::new(group, 0),
        payload: payload.to_string(),
    }
}

/// A successful reply from `group` that is followed by more replies.
pub fn more(group: u32, payload: impl ToString) -> TestReply {
    TestReply {
        cmd: CmdStatus::new(group, 0).with_flags(CmdStatus::FLAG_MORE),
        payload: payload.to_string(),
    }
}

/// A successful terminal reply without payload.
pub fn ack(group: u32) -> TestReply {
    ok(group, "")
}

/// A failed terminal reply from `group`.
pub fn failed(group: u32, status: i32) -> TestReply {
    TestReply {
        cmd: CmdStatus::new(group, status),
        payload: String::new(),
    }
}

/// Build a result that is bound to the specified strategies, without a
/// session.
pub fn new_result<T>(
    filter: Filter,
    checker: Checker,
    policy: ExceptionsPolicy,
) -> ResultHandle<T>
where
    T: Reply + Clone + Send + 'static,
{
    ResultHandle::with_strategies(filter, checker, policy)
}
