//! The report aggregation engine.
//!
//! Pure, synchronous, stateless: raw device/rule/exception/trip collections
//! in, normalized (headers, rows, chart series) out. All I/O lives elsewhere;
//! every function here is safe to call repeatedly on the same inputs and
//! yields identical output.

pub mod aggregate;
pub mod dispatch;
pub mod matcher;
pub mod names;
pub mod report;
