//! Plain data exchanged with callers: order input, per-order outcomes and the run report.

pub mod order_data;
pub mod outcome;
pub mod report;

pub use order_data::*;
pub use outcome::*;
pub use report::*;
