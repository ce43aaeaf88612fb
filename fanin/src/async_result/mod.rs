//! The result of a fanned-out operation.
//!
//! A [`ResultHandle`] and its paired [`ProducerHandle`] share one state:
//! the producer, driven by the network layer, feeds node replies and
//! completes the operation exactly once; consumers read the result in any
//! of these ways, on any thread:
//!
//! - block until completion: [`ResultHandle::wait`], [`ResultHandle::get`],
//!   [`ResultHandle::get_one`];
//! - subscribe callbacks: [`ResultHandle::connect`],
//!   [`ResultHandle::connect_all`], [`ResultHandle::connect_producer`];
//! - pull replies one by one as they arrive: [`ResultIter`];
//! - await it: [`ResultHandle::get_async`].
//!
//! A subscriber that connects late first receives every reply buffered so
//! far, in arrival order, then the live ones. Replay and the switch to live
//! delivery happen under one lock, so no reply is missed or delivered twice.

mod aggregator;
mod iter;
mod producer;
mod result;
mod shared;


pub use iter::ResultIter;
pub use producer::ProducerHandle;
pub use result::ResultHandle;

use crate::OpError;

/// Callback for every reply that passes the filter.
pub(crate) type ResultFn<T> = Box<dyn FnMut(&T) + Send + 'static>;

/// Callback for the completion, with the final error.
pub(crate) type FinalFn = Box<dyn FnOnce(Option<OpError>) + Send + 'static>;
