pub mod cleanup;
pub mod history;
pub mod human;
