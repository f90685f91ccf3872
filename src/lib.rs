pub mod config;
pub mod error;
pub mod models;
pub mod operations;
pub mod scanner;
pub mod utils;

// 重新导出常用模块
pub use error::RenameError;
pub use operations::{run_from_list, run_rename, RenameExecutor, RenameOptions, RunSettings};
pub use scanner::{new_abort_flag, AbortFlag, DirectoryIterator, ScanHandler, TreeScanner};
