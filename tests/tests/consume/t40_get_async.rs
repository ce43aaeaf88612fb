use anyhow::Result;
use bytes::Bytes;
use fanin::errors::errno;
use futures::future::join_all;
use maplit::btreemap;
use pretty_assertions::assert_eq;

use crate::fixtures::new_net;
use crate::fixtures::ut_harness;

/// Many operations in flight at once, awaited together.
#[tracing::instrument]
#[test_harness::test(harness = ut_harness)]
async fn concurrent_operations() -> Result<()> {
    let net = new_net(&[], [1, 2, 3])?;

    let data = btreemap! {
        "a" => "1",
        "b" => "22",
        "c" => "333",
    };

    let writes = data
        .iter()
        .map(|(k, v)| net.write(k, Bytes::from(v.to_string())).get_async());
    for res in join_all(writes).await {
        assert_eq!(3, res?.len());
    }

    let lookups = data.keys().map(|k| net.lookup(k).get_async());
    let sizes = join_all(lookups)
        .await
        .into_iter()
        .map(|res| res.map(|found| found[0].size))
        .collect::<Result<Vec<_>, _>>()?;

    assert_eq!(vec![1, 2, 3], sizes);

    Ok(())
}

/// The error of a failed operation is returned by `get_async()` with the
/// throw-at-get policy.
#[tracing::instrument]
#[test_harness::test(harness = ut_harness)]
async fn get_async_failed() -> Result<()> {
    let net = new_net(&[], [1, 2, 3])?;

    let res = net.lookup("no-such-key").get_async().await;
    assert_eq!(Some(-errno::ENOENT), res.err().map(|e| e.code));

    let net = new_net(&["--exceptions-policy=throw-at-wait"], [1, 2, 3])?;

    let got = net.lookup("no-such-key").get_async().await?;
    assert_eq!(3, got.len());

    Ok(())
}
