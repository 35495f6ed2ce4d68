//! Request handler module
//!
//! Serves files from the document root and decorates every response with
//! cache headers.

pub mod path;
pub mod request;
pub mod static_files;

// Re-export main entry point
pub use request::handle_request;
