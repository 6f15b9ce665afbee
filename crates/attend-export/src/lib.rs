//! attend-export
//!
//! Markdown screening reports rendered from Tera templates.

pub mod error;
pub mod render;
