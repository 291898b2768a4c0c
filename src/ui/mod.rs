pub mod charts;
pub mod console;
pub mod theme;
