#![allow(clippy::bool_assert_comparison)]

#[path = "../fixtures/mod.rs"]
mod fixtures;

// The number indicates the preferred running order for these case.
// The later tests may depend on the earlier ones.

mod t10_get_and_wait;
mod t20_iterate;
mod t40_get_async;
