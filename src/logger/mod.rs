//! Logger module
//!
//! Provides logging utilities for the HTTP server including:
//! - Server lifecycle messages
//! - Access logging in Common Log Format
//! - Error and warning logging

mod format;

pub use format::AccessLogEntry;

use crate::http::cache::NO_CACHE_EXTENSIONS;

/// Write to info/access log
fn write_info(message: &str) {
    println!("{message}");
}

/// Write to error log
fn write_error(message: &str) {
    eprintln!("{message}");
}

pub fn log_server_start(port: u16) {
    write_info(&format!("Server running at http://localhost:{port}/"));
    write_info(&format!(
        "Cache disabled for: {} files",
        NO_CACHE_EXTENSIONS.join(", ")
    ));
    write_info("Press Ctrl+C to stop");
}

pub fn log_shutdown() {
    write_info("\nServer stopped");
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(&format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry) {
    write_info(&entry.to_string());
}
