//! Loader tests, grouped by configuration source.
//!
//! Every test that touches process environment or the working directory runs
//! under `#[serial]` and holds `env_lock()`.

use std::sync::Mutex;

pub mod dotenv_tests;

pub fn env_lock() -> &'static Mutex<()> {
    crate::test_util::global_test_lock()
}
