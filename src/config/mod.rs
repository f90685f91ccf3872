pub mod defaults;
pub mod settings;

pub use settings::{Config, FilterConfig, RenameConfig, ScanConfig};
