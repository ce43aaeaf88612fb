//! Session configuration.

use std::sync::Arc;
use std::time::Duration;

use anyerror::AnyError;
use clap::Parser;
use clap::ValueEnum;

use crate::config::errors::ConfigError;
use crate::entry::CmdStatus;
use crate::entry::Reply;
use crate::session::checkers;
use crate::session::filters;
use crate::session::Checker;
use crate::session::Filter;
use crate::ExceptionsPolicy;

/// The configuration of a client [`Session`].
///
/// It selects the standard filter, checker and exceptions policy that every
/// result of the session is created with, and how long the network layer
/// waits for replicas before failing an operation.
///
/// A session may replace the filter and the checker with its own closures,
/// see [`Session::set_filter`] and [`Session::set_checker`].
///
/// [`Session`]: crate::Session
/// [`Session::set_filter`]: crate::Session::set_filter
/// [`Session::set_checker`]: crate::Session::set_checker
#[derive(Clone, Debug, Parser)]
#[derive(serde::Deserialize, serde::Serialize)]
pub struct SessionConfig {
    /// The consumption surfaces at which a failed operation is returned as an
    /// error, comma separated.
    #[clap(long,
           value_enum,
           value_delimiter = ',',
           default_values_t = [
               PolicyBit::ThrowAtWait,
               PolicyBit::ThrowAtGet,
               PolicyBit::ThrowAtIteratorEnd,
           ]
    )]
    pub exceptions_policy: Vec<PolicyBit>,

    /// Which replies are visible to the consumer.
    #[clap(long, value_enum, default_value_t = FilterKind::All)]
    pub filter: FilterKind,

    /// How the success of a whole operation is decided.
    #[clap(long, value_enum, default_value_t = CheckerKind::AtLeastOne)]
    pub checker: CheckerKind,

    /// The time in milliseconds the network layer waits for all replicas
    /// before completing an operation with a timeout error.
    #[clap(long, default_value = "5000")]
    pub wait_timeout: u64,
}

/// One bit of an [`ExceptionsPolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[derive(serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PolicyBit {
    NoExceptions,
    ThrowAtWait,
    ThrowAtGet,
    ThrowAtIteratorEnd,
}

impl PolicyBit {
    pub fn to_policy(self) -> ExceptionsPolicy {
        match self {
            PolicyBit::NoExceptions => ExceptionsPolicy::NO_EXCEPTIONS,
            PolicyBit::ThrowAtWait => ExceptionsPolicy::THROW_AT_WAIT,
            PolicyBit::ThrowAtGet => ExceptionsPolicy::THROW_AT_GET,
            PolicyBit::ThrowAtIteratorEnd => {
                ExceptionsPolicy::THROW_AT_ITERATOR_END
            }
        }
    }
}

/// The standard filters, see [`filters`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[derive(serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterKind {
    Positive,
    PositiveWithAck,
    PositiveFinal,
    Negative,
    All,
    AllWithAck,
    AllFinal,
}

impl FilterKind {
    pub fn to_filter(self) -> Filter {
        let f: fn(&dyn Reply) -> bool = match self {
            FilterKind::Positive => filters::positive,
            FilterKind::PositiveWithAck => filters::positive_with_ack,
            FilterKind::PositiveFinal => filters::positive_final,
            FilterKind::Negative => filters::negative,
            FilterKind::All => filters::all,
            FilterKind::AllWithAck => filters::all_with_ack,
            FilterKind::AllFinal => filters::all_final,
        };
        Arc::new(f)
    }
}

/// The standard checkers, see [`checkers`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[derive(serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CheckerKind {
    NoCheck,
    AtLeastOne,
    All,
    Quorum,
}

impl CheckerKind {
    pub fn to_checker(self) -> Checker {
        let f: fn(&[CmdStatus], usize) -> bool = match self {
            CheckerKind::NoCheck => checkers::no_check,
            CheckerKind::AtLeastOne => checkers::at_least_one,
            CheckerKind::All => checkers::all,
            CheckerKind::Quorum => checkers::quorum,
        };
        Arc::new(f)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        <Self as Parser>::parse_from(Vec::<&'static str>::new())
    }
}

impl SessionConfig {
    /// Build a `SessionConfig` instance from a series of command line
    /// arguments.
    ///
    /// The first element in `args` must be the application name.
    pub fn build(args: &[&str]) -> Result<SessionConfig, ConfigError> {
        let config = <Self as Parser>::try_parse_from(args).map_err(|e| {
            ConfigError::ParseError {
                source: AnyError::from(&e),
                args: args.iter().map(|x| x.to_string()).collect(),
            }
        })?;
        config.validate()
    }

    /// Validate the state of this config.
    pub fn validate(self) -> Result<SessionConfig, ConfigError> {
        if self.wait_timeout == 0 {
            return Err(ConfigError::ZeroTimeout);
        }

        let no_exceptions =
            self.exceptions_policy.contains(&PolicyBit::NoExceptions);
        if no_exceptions && self.exceptions_policy.len() > 1 {
            return Err(ConfigError::ConflictingPolicy {
                policy: self.exceptions_policy.clone(),
            });
        }

        Ok(self)
    }

    pub fn exceptions_policy(&self) -> ExceptionsPolicy {
        self.exceptions_policy
            .iter()
            .fold(ExceptionsPolicy::NO_EXCEPTIONS, |acc, bit| {
                acc | bit.to_policy()
            })
    }

    pub fn wait_timeout(&self) -> Duration {
        Duration::from_millis(self.wait_timeout)
    }
}
