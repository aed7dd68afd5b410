//! Live transcript listeners

pub mod console;
