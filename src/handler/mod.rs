//! Request handler module
//!
//! Request dispatch and static file serving for the document root.

pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
