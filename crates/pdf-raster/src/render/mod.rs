//! PDF rendering modules for imposed output
//!
//! This module handles all PDF-specific operations:
//! - Encoding composited sheets as Image XObjects
//! - Building output pages and the page tree

mod page;
mod xobject;

pub use page::*;
pub use xobject::{create_image_xobject, encode_jpeg};
