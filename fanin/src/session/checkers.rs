//! Standard success checkers.
//!
//! A checker receives the status of every terminal reply and the number of
//! terminal replies the producer expected.

use crate::entry::CmdStatus;

fn success_count(statuses: &[CmdStatus]) -> usize {
    statuses.iter().filter(|s| s.is_success()).count()
}

/// Always succeeds.
pub fn no_check(_statuses: &[CmdStatus], _total: usize) -> bool {
    true
}

pub fn at_least_one(statuses: &[CmdStatus], _total: usize) -> bool {
    success_count(statuses) > 0
}

/// Every expected reply succeeded.
pub fn all(statuses: &[CmdStatus], total: usize) -> bool {
    success_count(statuses) == total
}

/// A strict majority of the expected replies succeeded.
pub fn quorum(statuses: &[CmdStatus], total: usize) -> bool {
    success_count(statuses) > total / 2
}
