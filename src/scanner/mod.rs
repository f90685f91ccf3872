pub mod directory;
pub mod filters;
pub mod tree_scanner;

pub use directory::{DirEntry, DirectoryIterator};
pub use filters::{Pattern, PatternList, ScanFilters};
pub use tree_scanner::{new_abort_flag, AbortFlag, ScanHandler, TreeScanner};
