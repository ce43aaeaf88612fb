mod logging;

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use clap::Parser;
use fanin::errors::errno;
use fanin::Reply;
use fanin::Session;
use fanin::SessionConfig;
use futures::future::join_all;
use pseudonet::PseudoNet;
use tokio::sync::oneshot;

use crate::logging::init_logging;
use crate::logging::LogArgs;

/// Writes, reads, looks up and removes a key on a set of in-memory replica
/// groups, consuming each result in a different way.
#[derive(Debug, Parser)]
struct Args {
    #[clap(flatten)]
    session: SessionConfig,

    #[clap(flatten)]
    log: LogArgs,

    /// Replica group ids.
    #[clap(long, value_delimiter = ',', default_value = "1,2,3")]
    groups: Vec<u32>,

    /// Make one group fail every operation with EIO.
    #[clap(long)]
    fail_group: Option<u32>,

    /// Max random latency of a reply in milliseconds.
    #[clap(long, default_value = "20")]
    jitter: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let g = init_logging("hello", &args.log)?;
    Box::leak(Box::new(g));

    let config = Arc::new(args.session.validate()?);
    let net = PseudoNet::new(Session::new(config), args.groups.clone())
        .with_latency(Duration::ZERO, Duration::from_millis(args.jitter));

    if let Some(group) = args.fail_group {
        match net.store(group) {
            Some(store) => store.set_fail(Some(-errno::EIO)),
            None => println!("no such group: {}", group),
        }
    }

    // Await all replies at once.
    let written = net.write("hello", Bytes::from("world")).get_async().await?;
    for w in written.iter() {
        println!("write: {}", w);
    }

    // Iterate replies as they arrive, off the runtime workers.
    let read = net.read("hello");
    tokio::task::spawn_blocking(move || {
        for r in &read {
            match r {
                Ok(entry) => println!("read: {}", entry),
                Err(e) => println!("read failed: {}", e),
            }
        }
    })
    .await?;

    // Subscribe callbacks.
    let lookup = net.lookup("hello");
    let (tx, rx) = oneshot::channel();
    lookup.connect(
        |l| println!("lookup: {}", l),
        move |error| {
            let _ = tx.send(error);
        },
    );
    if let Some(e) = rx.await? {
        println!("lookup failed: {}", e);
    }

    // Many operations in flight at once.
    let keys = ["a", "b", "c"];
    let writes = keys
        .iter()
        .map(|k| net.write(k, Bytes::from(k.to_string())).get_async());
    for (k, res) in keys.iter().zip(join_all(writes).await) {
        println!("write {}: {} replies", k, res.map(|x| x.len()).unwrap_or(0));
    }

    let removed = net.remove("hello");
    let (res, passed) = tokio::task::spawn_blocking(move || {
        (removed.wait(), removed.check_passed())
    })
    .await?;
    println!("remove: {:?}, checker passed: {:?}", res, passed);

    let lookup = net.lookup("hello").get_async().await;
    match lookup {
        Ok(found) => {
            let n = found.iter().filter(|l| l.status() == 0).count();
            println!("lookup after remove: found on {} groups", n)
        }
        Err(e) => println!("lookup after remove: {}", e),
    }

    Ok(())
}
