use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Result;
use bytes::Bytes;
use fanin::LookupEntry;
use maplit::btreeset;
use pretty_assertions::assert_eq;

use crate::fixtures::new_net;
use crate::fixtures::ut_harness;

/// Blocking consumers, iterators and callbacks on different threads observe
/// the same replies of one operation.
#[tracing::instrument]
#[test_harness::test(harness = ut_harness)]
async fn consumers_on_many_threads() -> Result<()> {
    let net = new_net(&[], [1, 2, 3, 4, 5])?
        .with_latency(Duration::from_millis(5), Duration::from_millis(30));

    let written = Arc::new(net.write("k", Bytes::from("v")));

    let seen = Arc::new(Mutex::new(Vec::new()));
    {
        let seen = seen.clone();
        written.connect_result(move |l: &LookupEntry| {
            seen.lock().unwrap().push(l.cmd.group)
        });
    }

    let mut handles = Vec::new();
    for i in 0..4 {
        let written = written.clone();
        handles.push(tokio::task::spawn_blocking(move || {
            if i % 2 == 0 {
                written.get().map(|v| v.len())
            } else {
                written.iter().collect::<Result<Vec<_>, _>>().map(|v| v.len())
            }
        }));
    }

    for h in handles {
        assert_eq!(5, h.await??);
    }

    let mut seen = seen.lock().unwrap().clone();
    seen.sort();
    assert_eq!(vec![1, 2, 3, 4, 5], seen);

    let got = written.get()?;
    let groups = got.iter().map(|l| l.cmd.group).collect::<BTreeSet<_>>();
    assert_eq!(btreeset! {1, 2, 3, 4, 5}, groups);

    Ok(())
}
