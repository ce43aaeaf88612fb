use std::collections::BTreeSet;
use std::time::Duration;

use anyhow::Result;
use bytes::Bytes;
use fanin::Reply;
use maplit::btreeset;
use pretty_assertions::assert_eq;

use crate::fixtures::blocking;
use crate::fixtures::new_net;
use crate::fixtures::ut_harness;

/// `get()` blocks until all groups replied and returns every visible reply.
#[tracing::instrument]
#[test_harness::test(harness = ut_harness)]
async fn get_all_groups() -> Result<()> {
    let net = new_net(&[], [1, 2, 3])?;

    tracing::info!("--- write to 3 groups");
    let written = net.write("k", Bytes::from("v"));
    let got = blocking(move || written.get()).await??;

    let groups = got.iter().map(|l| l.cmd.group).collect::<BTreeSet<_>>();
    assert_eq!(btreeset! {1, 2, 3}, groups);

    tracing::info!("--- read back, acks are filtered out");
    let read = net.read("k");
    let got = blocking(move || read.get()).await??;
    assert_eq!(3, got.len());
    assert!(got.iter().all(|r| r.has_more()));

    Ok(())
}

/// Repeated `get()` after completion returns the same replies.
#[tracing::instrument]
#[test_harness::test(harness = ut_harness)]
async fn get_is_stable() -> Result<()> {
    let net = new_net(&[], [1, 2, 3])?;

    let written = net.write("k", Bytes::from("v"));
    let (first, second, third) = blocking(move || {
        (written.get(), written.get(), written.get_one())
    })
    .await?;

    let first = first?;
    assert_eq!(first, second?);
    assert!(first.contains(&third?));

    Ok(())
}

/// `wait()` reports the error only with the throw-at-wait policy.
#[tracing::instrument]
#[test_harness::test(harness = ut_harness)]
async fn wait_by_policy() -> Result<()> {
    let net = new_net(&["--exceptions-policy=throw-at-get"], [1, 2])?;

    let read = net.read("no-such-key");
    let (waited, got, err) = blocking(move || {
        (read.wait(), read.get(), read.error())
    })
    .await?;

    assert!(waited.is_ok(), "not thrown at wait");
    assert!(got.is_err());
    assert_eq!(got.err(), err);

    let net = new_net(&["--exceptions-policy=no-exceptions"], [1, 2])?;

    let read = net.read("no-such-key");
    let got = blocking(move || read.get()).await??;
    assert_eq!(2, got.len(), "failed replies are visible");

    Ok(())
}

/// A consumer blocked in `get()` is woken when the last group replies.
#[tracing::instrument]
#[test_harness::test(harness = ut_harness)]
async fn get_blocks_for_slow_groups() -> Result<()> {
    let net = new_net(&[], [1, 2, 3])?
        .with_latency(Duration::from_millis(50), Duration::from_millis(50));

    let written = net.write("k", Bytes::from("v"));
    assert_eq!(false, written.is_finished());

    let got = blocking(move || written.get()).await??;
    assert_eq!(3, got.len());

    Ok(())
}
