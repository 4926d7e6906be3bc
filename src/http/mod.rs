//! HTTP protocol layer module
//!
//! Protocol-level building blocks shared by the request handler: the fixed
//! security header set, MIME detection, conditional-request validators,
//! byte-range resolution, and response builders.

pub mod cond;
pub mod headers;
pub mod mime;
pub mod range;
pub mod response;

// Re-export commonly used items
pub use headers::SecurityHeaders;
pub use range::{resolve_range, RangeOutcome};
pub use response::{method_not_allowed, not_found, not_modified, range_not_satisfiable};
