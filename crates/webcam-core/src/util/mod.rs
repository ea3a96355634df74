// Utility modules

pub mod format;
pub mod label;
