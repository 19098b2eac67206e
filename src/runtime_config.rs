//! Environment-based runtime configuration.
//!
//! Handlers run on `may` coroutines whose stack size is fixed at spawn time,
//! so it has to be chosen before anything is registered. `ARMORY_STACK_SIZE`
//! accepts a decimal byte count or a `0x`-prefixed hex value:
//!
//! ```bash
//! export ARMORY_STACK_SIZE=0x8000   # 32 KiB
//! export ARMORY_STACK_SIZE=32768    # same thing
//! ```
//!
//! The default of 16 KiB is plenty for these handlers; raise it if a handler
//! grows deep call chains or large locals.

use std::env;

const DEFAULT_STACK_SIZE: usize = 0x4000;

/// Runtime configuration loaded from environment variables.
///
/// Load once at startup with [`RuntimeConfig::from_env`] and apply via
/// `may::config().set_stack_size(..)` before registering handlers.
#[derive(Debug, Clone, Copy)]
pub struct RuntimeConfig {
    /// Coroutine stack size in bytes (default 16 KiB).
    pub stack_size: usize,
}

impl RuntimeConfig {
    /// Load configuration from environment variables. Unparseable values fall
    /// back to the default rather than failing startup.
    pub fn from_env() -> Self {
        let stack_size = match env::var("ARMORY_STACK_SIZE") {
            Ok(val) => parse_stack_size(&val).unwrap_or(DEFAULT_STACK_SIZE),
            Err(_) => DEFAULT_STACK_SIZE,
        };
        RuntimeConfig { stack_size }
    }
}

fn parse_stack_size(val: &str) -> Option<usize> {
    if let Some(hex) = val.strip_prefix("0x") {
        usize::from_str_radix(hex, 16).ok()
    } else {
        val.parse().ok()
    }
}
