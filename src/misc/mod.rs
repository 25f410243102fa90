//! Miscellaneous support code that doesn't belong to a particular solving
//! phase.

pub mod log;
