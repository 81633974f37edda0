//! Shared utility functions.
//!
//! - `html`: HTML escaping for rendered model output

mod html;

pub use html::html_escape;
