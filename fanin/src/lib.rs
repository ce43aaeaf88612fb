#![doc = include_str!("lib_readme.md")]
#![allow(clippy::bool_assert_comparison)]
#![allow(clippy::bool_comparison)]
#![allow(clippy::result_large_err)]
#![allow(clippy::type_complexity)]
#![deny(unused_qualifications)]

macro_rules! func_name {
    () => {{
        fn f() {}
        fn type_name_of<T>(_: T) -> &'static str {
            std::any::type_name::<T>()
        }
        let name = type_name_of(f);
        let n = &name[..name.len() - 3];
        let nn = n.replace("::{{closure}}", "");
        nn
    }};
}

mod config;

pub mod async_result;
pub mod entry;
pub mod errors;
pub mod policy;
pub mod session;
pub mod testing;

pub use anyerror;
pub use anyerror::AnyError;

pub use crate::async_result::ProducerHandle;
pub use crate::async_result::ResultHandle;
pub use crate::async_result::ResultIter;
pub use crate::config::CheckerKind;
pub use crate::config::ConfigError;
pub use crate::config::FilterKind;
pub use crate::config::PolicyBit;
pub use crate::config::SessionConfig;
pub use crate::entry::CallbackEntry;
pub use crate::entry::CmdStatus;
pub use crate::entry::LookupEntry;
pub use crate::entry::ReadEntry;
pub use crate::entry::Reply;
pub use crate::errors::IterError;
pub use crate::errors::OpError;
pub use crate::policy::ExceptionsPolicy;
pub use crate::session::Session;
