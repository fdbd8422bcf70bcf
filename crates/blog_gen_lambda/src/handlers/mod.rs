pub mod entry;
pub mod generation;
pub mod persistence;
