pub mod disks;
pub mod files;
pub mod metrics;
