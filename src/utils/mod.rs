pub mod path_ops;
pub mod time_format;

pub use time_format::{format_elapsed, format_timestamp};
