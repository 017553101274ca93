//! Formatting module - turning conversions into chat text.

mod formatter;
pub mod messages;

pub use formatter::{DisplayMode, Formatter};
