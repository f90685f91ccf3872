pub mod executor;
pub mod pair_list;
pub mod parts;
pub mod planner;
pub mod runner;
pub mod transform;

pub use executor::{RenameExecutor, RenameOptions};
pub use parts::PartsTemplate;
pub use planner::RenamePlanner;
pub use runner::{run_from_list, run_rename, RunSettings};
pub use transform::{CaseFold, NameTransform, Substitution};
