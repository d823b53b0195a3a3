//! End-to-end tests driving the `vore` binary with stand-in tools.

#![cfg(unix)]

mod common;

mod build_tests;
mod dist_tests;
