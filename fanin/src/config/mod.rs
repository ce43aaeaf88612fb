#[allow(clippy::module_inception)]
mod config;
mod errors;


pub use config::CheckerKind;
pub use config::FilterKind;
pub use config::PolicyBit;
pub use config::SessionConfig;
pub use errors::ConfigError;
