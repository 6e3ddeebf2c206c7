//! Process exit codes. Part of the public CLI contract.

use beacon_core::ConfigError;

pub const SUCCESS: i32 = 0;
/// Quality gate below minimum, or critical alerts with `--fail-on-critical`.
pub const GATE_FAILED: i32 = 1;
/// Bad or missing explicit config, invalid thresholds or weights.
pub const CONFIG_ERROR: i32 = 2;
/// Unreadable or malformed input files, write failures.
pub const IO_ERROR: i32 = 3;

/// Map a fatal error onto its exit code.
pub fn for_error(err: &anyhow::Error) -> i32 {
    if err.chain().any(|c| c.downcast_ref::<ConfigError>().is_some()) {
        CONFIG_ERROR
    } else {
        IO_ERROR
    }
}
