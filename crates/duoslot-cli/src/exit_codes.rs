//! Exit codes for the duoslot CLI.

pub const SUCCESS: i32 = 0;
pub const NOT_FOUND: i32 = 1; // get: no complete value stored
pub const INTERNAL_ERROR: i32 = 2; // storage or config error
pub const WRITE_FAILED: i32 = 3; // set: commit aborted, previous value kept
