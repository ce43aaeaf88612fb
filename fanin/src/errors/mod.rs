//! Error types exposed by this crate.

use std::fmt;
use std::time::Duration;

use tracing::error;

use crate::entry::CmdStatus;


/// Error numbers used as operation error codes.
///
/// A storage node reports a failure as a negated errno in
/// [`CmdStatus::status`], and errors built locally follow the same
/// convention, e.g., `-ENOENT`.
pub mod errno {
    pub const ENOENT: i32 = 2;
    pub const EIO: i32 = 5;
    pub const ENXIO: i32 = 6;
    pub const ETIMEDOUT: i32 = 110;
}

/// The single aggregated error of a fanned-out operation.
///
/// It is either reported by the network layer at completion, or synthesized
/// from the reply statuses when the checker rejects the operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[derive(serde::Deserialize, serde::Serialize)]
#[error("{message} (code: {code})")]
pub struct OpError {
    pub code: i32,
    pub message: String,
}

impl OpError {
    pub fn new(code: i32, message: impl ToString) -> Self {
        Self {
            code,
            message: message.to_string(),
        }
    }

    /// Build an error from the status of a failed reply.
    ///
    /// The error code is the reply status as is.
    pub fn from_status(cmd: &CmdStatus) -> Self {
        Self::new(cmd.status, format!("remote node failed: {}", cmd))
    }

    /// The checker rejected the operation and no node reported an error.
    pub fn insufficient_results(
        success: usize,
        total: usize,
        received: usize,
    ) -> Self {
        let e = Self::new(
            -errno::ENXIO,
            format!(
                "insufficient results count due to checker: {} of {} ({})",
                success, total, received
            ),
        );
        error!("{}", e);
        e
    }

    pub fn timeout(after: Duration, op: impl fmt::Display) -> Self {
        Self::new(
            -errno::ETIMEDOUT,
            format!("{} timeout after {:?}", op, after),
        )
    }
}

/// Error returned when a [`ResultIter`] is consumed.
///
/// [`ResultIter`]: crate::ResultIter
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IterError {
    /// Dereferenced or advanced an iterator that is already at the end.
    #[error("{op}: end iterator")]
    EndOfSequence { op: &'static str },

    #[error(transparent)]
    Operation(#[from] OpError),
}

impl IterError {
    /// The error code in the negated errno convention of [`OpError`].
    pub fn code(&self) -> i32 {
        match self {
            IterError::EndOfSequence { .. } => -errno::ENOENT,
            IterError::Operation(e) => e.code,
        }
    }
}
