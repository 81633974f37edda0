//! HTTP request handlers for the web server.

mod helpers;
mod pages;
mod static_files;
mod upload;

// Re-export handlers for use by the router
pub use pages::{home, results_image, results_page, upload_form};
pub use static_files::serve_css;
pub use upload::upload_submit;

pub use helpers::SESSION_COOKIE;
