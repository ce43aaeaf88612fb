#![allow(clippy::bool_assert_comparison)]

#[path = "../fixtures/mod.rs"]
mod fixtures;

// The number indicates the preferred running order for these case.
// The later tests may depend on the earlier ones.

mod t10_partial_failure;
mod t20_custom_checker;
