use std::time::Duration;

use anyhow::Result;
use bytes::Bytes;
use fanin::errors::errno;
use fanin::IterError;
use pretty_assertions::assert_eq;

use crate::fixtures::blocking;
use crate::fixtures::new_net;
use crate::fixtures::ut_harness;

/// An iterator yields replies as they arrive, then ends.
#[tracing::instrument]
#[test_harness::test(harness = ut_harness)]
async fn iterate_while_arriving() -> Result<()> {
    let net = new_net(&["--filter=all-with-ack"], [1, 2, 3, 4])?
        .with_latency(Duration::from_millis(5), Duration::from_millis(40));

    net.write("k", Bytes::from("v")).get_async().await?;

    let read = net.read("k");
    let it = read.iter();

    let got = blocking(move || {
        it.map(|r| r.map(|e| e.cmd)).collect::<Result<Vec<_>, _>>()
    })
    .await??;

    // Every group replies with data, then an ack, in this order.
    assert_eq!(8, got.len());
    for g in 1..=4 {
        let of_group = got
            .iter()
            .filter(|c| c.group == g)
            .map(|c| c.has_more())
            .collect::<Vec<_>>();
        assert_eq!(vec![true, false], of_group);
    }

    Ok(())
}

/// Iterators created at different times each see every reply.
#[tracing::instrument]
#[test_harness::test(harness = ut_harness)]
async fn independent_iterators() -> Result<()> {
    let net = new_net(&[], [1, 2, 3])?
        .with_latency(Duration::ZERO, Duration::from_millis(30));

    let written = net.write("k", Bytes::from("v"));
    let early = written.iter();

    let n = blocking(move || {
        let early_n = early.count();
        let late_n = written.iter().count();
        (early_n, late_n)
    })
    .await?;

    assert_eq!((3, 3), n);

    Ok(())
}

/// Reaching the end of a failed operation returns the error with the
/// throw-at-iterator-end policy.
#[tracing::instrument]
#[test_harness::test(harness = ut_harness)]
async fn iterate_failed() -> Result<()> {
    let net = new_net(&[], [1, 2])?;

    let read = net.read("no-such-key");
    let mut it = read.iter();

    let (items, after) = blocking(move || {
        let items = it.by_ref().collect::<Vec<_>>();
        (items, it.current().err())
    })
    .await?;

    assert_eq!(3, items.len());
    assert!(items[..2].iter().all(|r| r.is_ok()), "failed replies visible");
    assert_eq!(
        Some(-errno::ENOENT),
        items[2].as_ref().err().map(|e| e.code)
    );
    assert!(matches!(after, Some(IterError::EndOfSequence { .. })));

    Ok(())
}
