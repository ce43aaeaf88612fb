use anyerror::AnyError;

use crate::config::PolicyBit;

/// Error variants related to configuration.
#[derive(Debug, thiserror::Error)]
#[derive(PartialEq, Eq)]
pub enum ConfigError {
    #[error("ParseError: {source} while parsing ({args:?})")]
    ParseError { source: AnyError, args: Vec<String> },

    /// The network layer would give up an operation at once.
    #[error("wait_timeout must be > 0")]
    ZeroTimeout,

    #[error("exceptions policy {policy:?} can not be combined with no-exceptions")]
    ConflictingPolicy { policy: Vec<PolicyBit> },
}
