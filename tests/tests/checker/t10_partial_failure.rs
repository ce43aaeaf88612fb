use anyhow::Result;
use bytes::Bytes;
use fanin::errors::errno;
use pretty_assertions::assert_eq;

use crate::fixtures::blocking;
use crate::fixtures::new_net;
use crate::fixtures::ut_harness;

/// One of three groups fails: each standard checker decides differently.
#[tracing::instrument]
#[test_harness::test(harness = ut_harness)]
async fn one_of_three_failed() -> Result<()> {
    let cases = [
        ("--checker=no-check", true),
        ("--checker=at-least-one", true),
        ("--checker=quorum", true),
        // The checker fails but some groups succeeded: no error is made up.
        ("--checker=all", false),
    ];

    for (arg, want_passed) in cases {
        tracing::info!("--- {}", arg);

        let net = new_net(&[arg], [1, 2, 3])?;
        if let Some(s) = net.store(2) {
            s.set_fail(Some(-errno::EIO));
        }

        let written = net.write("k", Bytes::from("v"));
        let (got, passed, err) = blocking(move || {
            (written.get(), written.check_passed(), written.error())
        })
        .await?;

        assert_eq!(3, got?.len(), "{}", arg);
        assert_eq!(Some(want_passed), passed, "{}", arg);
        assert_eq!(None, err, "{}", arg);
    }

    Ok(())
}

/// Quorum is lost, but one group succeeded: no error is made up and the
/// verdict reports the failure. Once every group fails, the error comes
/// from a failed reply.
#[tracing::instrument]
#[test_harness::test(harness = ut_harness)]
async fn quorum_lost() -> Result<()> {
    let net = new_net(&["--checker=quorum"], [1, 2, 3])?;
    net.write("k", Bytes::from("v")).get_async().await?;

    for g in [1, 3] {
        if let Some(s) = net.store(g) {
            s.set_fail(Some(-errno::EIO));
        }
    }

    tracing::info!("--- read with 2 of 3 groups failing");
    let read = net.read("k");
    let (got, passed, err) = blocking(move || {
        (read.get(), read.check_passed(), read.error())
    })
    .await?;

    assert_eq!(3, got?.len(), "one data reply and two failures");
    assert_eq!(Some(false), passed);
    assert_eq!(None, err);

    tracing::info!("--- read with all groups failing");
    if let Some(s) = net.store(2) {
        s.set_fail(Some(-errno::EIO));
    }

    let read = net.read("k");
    let (got, passed) =
        blocking(move || (read.get(), read.check_passed())).await?;

    assert_eq!(Some(-errno::EIO), got.err().map(|e| e.code));
    assert_eq!(Some(false), passed);

    Ok(())
}

/// No group replied with a failure, but the checker still fails: the
/// operation fails with ENXIO.
#[tracing::instrument]
#[test_harness::test(harness = ut_harness)]
async fn no_replies_at_all() -> Result<()> {
    let net = new_net(&[], Vec::new())?;

    let written = net.write("k", Bytes::from("v"));
    let res = written.get_async().await;

    let err = res.unwrap_err();
    assert_eq!(-errno::ENXIO, err.code);
    assert!(err.message.contains("0 of 0 (0)"), "{}", err);

    Ok(())
}

/// Filtered out replies still count for the checker.
#[tracing::instrument]
#[test_harness::test(harness = ut_harness)]
async fn filtered_replies_are_checked() -> Result<()> {
    let net = new_net(&["--filter=negative", "--checker=all"], [1, 2, 3])?;

    let written = net.write("k", Bytes::from("v"));
    let (got, passed) =
        blocking(move || (written.get(), written.check_passed())).await?;

    assert_eq!(0, got?.len());
    assert_eq!(Some(true), passed);

    let removed = net.remove("no-such-key");
    let got = removed.get_async().await;
    assert_eq!(Some(-errno::ENOENT), got.err().map(|e| e.code));

    Ok(())
}
