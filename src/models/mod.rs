pub mod outcome;
pub mod process;
pub mod usage;
