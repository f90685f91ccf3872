pub mod rename_plan;
pub mod summary;

pub use rename_plan::RenamePlan;
pub use summary::{RenameTarget, RunSummary};
