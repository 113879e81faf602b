//! Integration test suite entry point.

mod helpers;

mod concurrency_test;
mod permission_test;
mod workflow_test;
