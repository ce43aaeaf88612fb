use anyhow::Result;
use bytes::Bytes;
use fanin::errors::errno;
use fanin::CmdStatus;
use fanin::Reply;
use pretty_assertions::assert_eq;

use crate::fixtures::blocking;
use crate::fixtures::new_net;
use crate::fixtures::ut_harness;

/// A session may replace the standard strategies with its own.
#[tracing::instrument]
#[test_harness::test(harness = ut_harness)]
async fn custom_strategies() -> Result<()> {
    let mut net = new_net(&[], [1, 2, 3, 4])?;

    // Succeeds only if group 1 succeeds.
    net.session_mut().set_checker(|statuses: &[CmdStatus], _total| {
        statuses.iter().any(|s| s.group == 1 && s.status == 0)
    });
    net.session_mut().set_filter(|r: &dyn Reply| r.command().group != 4);

    let got = net.write("k", Bytes::from("v")).get_async().await?;
    assert_eq!(3, got.len(), "group 4 is filtered out");

    if let Some(s) = net.store(1) {
        s.set_fail(Some(-errno::EIO));
    }

    // Other groups succeeded: rejected by the checker, without an error.
    let written = net.write("k", Bytes::from("v"));
    let (got, passed) =
        blocking(move || (written.get(), written.check_passed())).await?;

    assert_eq!(3, got?.len());
    assert_eq!(Some(false), passed);

    Ok(())
}
