//! Fixtures for testing fanin over an in-process network.

#![allow(dead_code)]

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use fanin::Session;
use fanin::SessionConfig;
use lazy_static::lazy_static;
use pseudonet::PseudoNet;
use tracing_subscriber::EnvFilter;

lazy_static! {
    static ref GLOBAL_TEST_LOGGER: () = init_test_logging();
}

fn init_test_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("debug"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .with_ansi(false)
        .try_init();
}

/// Runs an async test on a multi-thread tokio runtime, with logging
/// initialized once for the whole test binary.
pub fn ut_harness<F, Fut>(f: F) -> anyhow::Result<()>
where
    F: FnOnce() -> Fut + 'static,
    Fut: Future<Output = anyhow::Result<()>> + 'static,
{
    #[allow(clippy::let_unit_value)]
    let _g = *GLOBAL_TEST_LOGGER;

    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(4)
        .enable_all()
        .build()?;

    let res = rt.block_on(f());
    if let Err(e) = &res {
        tracing::error!("test failed: {:?}", e);
    }
    res
}

/// Build a network of `groups` with a session configured by command line
/// style `args`, e.g., `["--checker=all"]`.
pub fn new_net(
    args: &[&str],
    groups: impl IntoIterator<Item = u32>,
) -> anyhow::Result<PseudoNet> {
    let mut argv = vec!["fanin-test"];
    argv.extend_from_slice(args);

    let config = SessionConfig::build(&argv)?;
    let net = PseudoNet::new(Session::new(Arc::new(config)), groups)
        .with_latency(Duration::ZERO, Duration::from_millis(10));
    Ok(net)
}

/// Run a blocking consumer call off the runtime workers.
pub async fn blocking<F, T>(f: F) -> anyhow::Result<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    Ok(tokio::task::spawn_blocking(f).await?)
}
