//! HTTP protocol layer module
//!
//! Cache policy, content types, directory listings and response builders,
//! independent of how requests are dispatched.

pub mod body;
pub mod cache;
pub mod listing;
pub mod mime;
pub mod response;

// Re-export commonly used types
pub use body::ResponseBody;
pub use cache::{decorate_response, ExtensionCachePolicy, HeaderDecorator};
pub use response::{
    build_304_response, build_403_response, build_404_response, build_501_response,
    build_file_response, build_html_response, build_redirect_response,
};
