//! Integration tests against a real SQLite store

pub mod http_remote_test;
pub mod run_loop_test;
